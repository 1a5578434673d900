// ebay.rs
use crate::config::BROWSER_USER_AGENT;
use crate::domain::normalize_price;
use crate::scraper::http::Transport;
use crate::scraper::platform::Marketplace;
use crate::scraper::{Listing, ScraperError, SearchResult};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::form_urlencoded;

pub const SEARCH_URL: &str = "https://www.ebay.com/sch/i.html";

const CARD_SELECTOR: &str = r#"li[data-viewport^='{"trackableId'] .s-item__wrapper .s-item__info"#;
const PRICE_SELECTOR: &str = ".s-item__price";
const TITLE_SELECTOR: &str = ".s-item__title";

/// Completed and sold auction listings.
#[derive(Debug, Clone, Default)]
pub struct EbaySold;

impl EbaySold {
    pub fn search_url(search_content: &str, min_price: Option<f64>, max_price: Option<f64>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("_nkw", search_content);
        if let Some(min) = min_price {
            query.append_pair("_udlo", &min.to_string());
        }
        if let Some(max) = max_price {
            query.append_pair("_udhi", &max.to_string());
        }
        query.append_pair("LH_Sold", "1");
        query.append_pair("LH_Complete", "1");

        format!("{SEARCH_URL}?{}", query.finish())
    }

    pub fn parse_listings(html: &str) -> Result<Vec<Listing>, ScraperError> {
        let document = Html::parse_document(html);
        let card = parse_selector(CARD_SELECTOR)?;
        let price = parse_selector(PRICE_SELECTOR)?;
        let title = parse_selector(TITLE_SELECTOR)?;

        let listings = document
            .select(&card)
            .filter_map(|item| {
                let price_text: String = item.select(&price).next()?.text().collect();
                let title_text: String = item.select(&title).next()?.text().collect();

                let value = normalize_price(&price_text);
                (value > 0.0).then(|| Listing::new(value, title_text.trim()))
            })
            .collect();

        Ok(listings)
    }
}

impl Marketplace for EbaySold {
    fn name(&self) -> &'static str {
        "ebay"
    }

    fn search(
        &self,
        http: &dyn Transport,
        search_content: &str,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<SearchResult, ScraperError> {
        let url = Self::search_url(search_content, min_price, max_price);
        let resp = http.get(&url, &[("User-Agent", BROWSER_USER_AGENT)])?;

        if !resp.is_ok() {
            warn!(url, status = resp.status, "unexpected status, parsing body anyway");
        }

        let listings = Self::parse_listings(&resp.body)?;
        debug!(url, found = listings.len(), "parsed sold listings");

        Ok(SearchResult {
            source_url: url,
            listings,
        })
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_bounds_and_sold_flags() {
        let url = EbaySold::search_url("charizard 4/102 cgc 7", Some(10.0), Some(250.5));
        assert_eq!(
            url,
            "https://www.ebay.com/sch/i.html?_nkw=charizard+4%2F102+cgc+7&_udlo=10&_udhi=250.5&LH_Sold=1&LH_Complete=1"
        );
    }

    #[test]
    fn url_omits_missing_bounds() {
        let url = EbaySold::search_url("pikachu", None, None);
        assert!(!url.contains("_udlo"));
        assert!(!url.contains("_udhi"));
        assert!(url.contains("_nkw=pikachu"));
    }
}
