// src/domain/stats.rs

use crate::scraper::Listing;

/// Highest, lowest and mean of a non-empty price set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
}

/// Summary of a listing set. `range` is `Some` exactly when `count > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceStats {
    pub count: usize,
    pub range: Option<PriceRange>,
}

impl PriceStats {
    pub fn highest(&self) -> Option<f64> {
        self.range.map(|r| r.highest)
    }

    pub fn lowest(&self) -> Option<f64> {
        self.range.map(|r| r.lowest)
    }

    pub fn average(&self) -> Option<f64> {
        self.range.map(|r| r.average)
    }
}

/// Aggregates the usable prices in `listings`. Listings without one are skipped, not counted as zero.
pub fn aggregate(listings: &[Listing]) -> PriceStats {
    let prices: Vec<f64> = listings.iter().filter_map(Listing::usable_price).collect();

    if prices.is_empty() {
        return PriceStats::default();
    }

    let count = prices.len();
    let highest = prices.iter().copied().fold(f64::MIN, f64::max);
    let lowest = prices.iter().copied().fold(f64::MAX, f64::min);
    let average = prices.iter().sum::<f64>() / count as f64;

    PriceStats {
        count,
        range: Some(PriceRange {
            highest,
            lowest,
            average,
        }),
    }
}
