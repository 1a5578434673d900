// point130.rs
use crate::config::BROWSER_USER_AGENT;
use crate::domain::normalize_price;
use crate::scraper::ebay::parse_selector;
use crate::scraper::http::Transport;
use crate::scraper::models::{SaleEntry, SalesEnvelope};
use crate::scraper::platform::Marketplace;
use crate::scraper::{Listing, ScraperError, SearchResult};
use scraper::Html;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

pub const SALES_URL: &str = "https://back.130point.com/sales/";
pub const CARDS_URL: &str = "https://back.130point.com/cards/";
pub const REFERER: &str = "https://130point.com/";

const ROW_SELECTOR: &str = "tr#dRow";
const ROW_TITLE_SELECTOR: &str = "#titleText a";

fn encode_form(pairs: &[(&str, &str)]) -> String {
    // form_urlencoded already writes spaces as '+'.
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn within(price: f64, min_price: Option<f64>, max_price: Option<f64>) -> bool {
    min_price.map_or(true, |min| price >= min) && max_price.map_or(true, |max| price <= max)
}

/// Sold-history search. The response is a JSON envelope whose `body` is itself JSON.
#[derive(Debug, Clone)]
pub struct SoldHistory {
    pub session_cookie: String,
}

impl SoldHistory {
    pub fn new(session_cookie: impl Into<String>) -> Self {
        Self {
            session_cookie: session_cookie.into(),
        }
    }

    pub fn form_body(search_content: &str) -> String {
        encode_form(&[("query", search_content), ("type", "2"), ("subcat", "-1")])
    }

    /// Malformed JSON at either level yields no listings.
    pub fn parse_listings(body: &str) -> Vec<Listing> {
        let envelope: SalesEnvelope = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("sales response is not JSON, treating as empty: {e}");
                return Vec::new();
            }
        };

        let Some(inner) = envelope.body else {
            return Vec::new();
        };

        let entries: Vec<SaleEntry> = match serde_json::from_str(&inner) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("sales body is not a JSON array, treating as empty: {e}");
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| {
                let title = entry.title?;
                let price = match entry.price? {
                    Value::String(text) => normalize_price(&text),
                    Value::Number(n) => n.as_f64().unwrap_or(0.0),
                    _ => 0.0,
                };
                (price > 0.0).then(|| Listing::new(price, title))
            })
            .collect()
    }
}

impl Marketplace for SoldHistory {
    fn name(&self) -> &'static str {
        "130point"
    }

    fn search(
        &self,
        http: &dyn Transport,
        search_content: &str,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<SearchResult, ScraperError> {
        let body = Self::form_body(search_content);
        let source_url = format!("{SALES_URL}?{body}");

        let resp = http.post_form(
            SALES_URL,
            &[
                ("User-Agent", BROWSER_USER_AGENT),
                ("Cookie", self.session_cookie.as_str()),
            ],
            &body,
        )?;

        if !resp.is_ok() {
            return Err(ScraperError::RetryNeeded {
                platform: self.name(),
                status: resp.status,
            });
        }

        let listings: Vec<Listing> = Self::parse_listings(&resp.body)
            .into_iter()
            .filter(|l| l.price.is_some_and(|p| within(p, min_price, max_price)))
            .collect();
        debug!(source_url, found = listings.len(), "parsed sold history");

        Ok(SearchResult {
            source_url,
            listings,
        })
    }
}

/// Live card search across all marketplace tabs, returned as an HTML table.
#[derive(Debug, Clone)]
pub struct AllTabs {
    pub session_cookie: String,
}

impl AllTabs {
    pub fn new(session_cookie: impl Into<String>) -> Self {
        Self {
            session_cookie: session_cookie.into(),
        }
    }

    pub fn form_body(search_content: &str) -> String {
        encode_form(&[
            ("query", search_content),
            ("sort", "EndTimeSoonest"),
            ("tz", "America/New_York"),
            ("width", "1280"),
            ("height", "720"),
            ("mp", "all"),
        ])
    }

    /// One listing per result row. Missing attributes become `None` instead of dropping the row.
    pub fn parse_listings(html: &str) -> Result<Vec<Listing>, ScraperError> {
        let document = Html::parse_document(html);
        let row = parse_selector(ROW_SELECTOR)?;
        let title = parse_selector(ROW_TITLE_SELECTOR)?;

        let listings = document
            .select(&row)
            .map(|tr| Listing {
                price: tr
                    .value()
                    .attr("data-price")
                    .and_then(|p| p.trim().parse::<f64>().ok()),
                title: tr
                    .select(&title)
                    .next()
                    .map(|a| a.text().collect::<String>().trim().to_string()),
            })
            .collect();

        Ok(listings)
    }
}

impl Marketplace for AllTabs {
    fn name(&self) -> &'static str {
        "130point-all"
    }

    fn search(
        &self,
        http: &dyn Transport,
        search_content: &str,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<SearchResult, ScraperError> {
        let body = Self::form_body(search_content);
        let source_url = format!("{CARDS_URL}?{body}");

        let resp = http.post_form(
            CARDS_URL,
            &[
                ("User-Agent", BROWSER_USER_AGENT),
                ("Cookie", self.session_cookie.as_str()),
                ("X-Requested-With", "XMLHttpRequest"),
                ("Referer", REFERER),
            ],
            &body,
        )?;

        if !resp.is_ok() {
            return Err(ScraperError::RetryNeeded {
                platform: self.name(),
                status: resp.status,
            });
        }

        // Bounds only apply where there is a price to compare.
        let listings: Vec<Listing> = Self::parse_listings(&resp.body)?
            .into_iter()
            .filter(|l| l.price.map_or(true, |p| within(p, min_price, max_price)))
            .collect();
        debug!(source_url, found = listings.len(), "parsed live card table");

        Ok(SearchResult {
            source_url,
            listings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_form_uses_plus_for_spaces() {
        assert_eq!(
            SoldHistory::form_body("charizard base set"),
            "query=charizard+base+set&type=2&subcat=-1"
        );
    }

    #[test]
    fn cards_form_has_sort_locale_and_viewport() {
        let body = AllTabs::form_body("blastoise psa 9");
        assert!(body.starts_with("query=blastoise+psa+9&"));
        assert!(body.contains("sort=EndTimeSoonest"));
        assert!(body.contains("tz=America%2FNew_York"));
        assert!(body.contains("width=1280&height=720"));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(within(10.0, Some(10.0), Some(20.0)));
        assert!(within(20.0, Some(10.0), Some(20.0)));
        assert!(!within(20.01, Some(10.0), Some(20.0)));
        assert!(within(1e9, None, None));
    }

    #[test]
    fn sale_prices_accept_text_or_numbers() {
        let body = serde_json::json!({
            "body": serde_json::json!([
                {"price": "$1,050.00", "title": "Lugia Neo Genesis PSA 9"},
                {"price": 42.5, "title": "Lugia Neo Genesis PSA 8"},
                {"price": "Best offer", "title": "ignored"},
                {"title": "no price"}
            ]).to_string()
        })
        .to_string();

        let listings = SoldHistory::parse_listings(&body);
        assert_eq!(
            listings,
            vec![
                Listing::new(1050.0, "Lugia Neo Genesis PSA 9"),
                Listing::new(42.5, "Lugia Neo Genesis PSA 8"),
            ]
        );
    }

    #[test]
    fn broken_inner_body_is_empty() {
        assert!(SoldHistory::parse_listings(r#"{"body": "not json"}"#).is_empty());
        assert!(SoldHistory::parse_listings(r#"{"status": 1}"#).is_empty());
    }
}
