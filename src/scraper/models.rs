use serde::Deserialize;
use serde_json::Value;

/// One scraped sale or listing entry.
///
/// Both fields are optional because the live card table can omit either
/// attribute. Consumers decide what an absent value means.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub price: Option<f64>,
    pub title: Option<String>,
}

impl Listing {
    pub fn new(price: f64, title: impl Into<String>) -> Self {
        Self {
            price: Some(price),
            title: Some(title.into()),
        }
    }

    /// Price that can take part in statistics: present, finite and non-negative.
    pub fn usable_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p >= 0.0)
    }
}

/// What one adapter call returns. `source_url` is set even when nothing was found.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub source_url: String,
    pub listings: Vec<Listing>,
}

// envelope
//  └── body: "<json string>"
//       └── [ { price, title }, ... ]

#[derive(Debug, Deserialize)]
pub struct SalesEnvelope {
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaleEntry {
    // Seen both as "$12.50" and as a bare number.
    pub price: Option<Value>,
    pub title: Option<String>,
}
