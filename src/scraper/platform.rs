// platform.rs
use crate::config::HttpConfig;
use crate::scraper::ebay::EbaySold;
use crate::scraper::http::Transport;
use crate::scraper::point130::{AllTabs, SoldHistory};
use crate::scraper::{ScraperError, SearchResult};
use std::fmt;
use std::str::FromStr;

/// A marketplace that can be searched for priced listings.
pub trait Marketplace {
    fn name(&self) -> &'static str;

    fn search(
        &self,
        http: &dyn Transport,
        search_content: &str,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<SearchResult, ScraperError>;
}

/// The supported platform identifiers. Anything else is rejected on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ebay,
    Point130Sales,
    Point130Cards,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Ebay, Platform::Point130Sales, Platform::Point130Cards];

    pub fn id(self) -> &'static str {
        match self {
            Platform::Ebay => "ebay",
            Platform::Point130Sales => "130point",
            Platform::Point130Cards => "130point-all",
        }
    }

    pub fn adapter(self, config: &HttpConfig) -> Adapter {
        match self {
            Platform::Ebay => Adapter::Ebay(EbaySold),
            Platform::Point130Sales => {
                Adapter::SoldHistory(SoldHistory::new(config.session_cookie.clone()))
            }
            Platform::Point130Cards => Adapter::AllTabs(AllTabs::new(config.session_cookie.clone())),
        }
    }
}

impl FromStr for Platform {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| ScraperError::UnsupportedPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Closed set of adapters; dispatch is a plain match.
#[derive(Debug, Clone)]
pub enum Adapter {
    Ebay(EbaySold),
    SoldHistory(SoldHistory),
    AllTabs(AllTabs),
}

impl Marketplace for Adapter {
    fn name(&self) -> &'static str {
        match self {
            Adapter::Ebay(a) => a.name(),
            Adapter::SoldHistory(a) => a.name(),
            Adapter::AllTabs(a) => a.name(),
        }
    }

    fn search(
        &self,
        http: &dyn Transport,
        search_content: &str,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<SearchResult, ScraperError> {
        match self {
            Adapter::Ebay(a) => a.search(http, search_content, min_price, max_price),
            Adapter::SoldHistory(a) => a.search(http, search_content, min_price, max_price),
            Adapter::AllTabs(a) => a.search(http, search_content, min_price, max_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_identifiers() {
        assert_eq!("ebay".parse::<Platform>().unwrap(), Platform::Ebay);
        assert_eq!(" 130Point ".parse::<Platform>().unwrap(), Platform::Point130Sales);
        assert_eq!("130point-all".parse::<Platform>().unwrap(), Platform::Point130Cards);
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        match "mercari".parse::<Platform>() {
            Err(ScraperError::UnsupportedPlatform(name)) => assert_eq!(name, "mercari"),
            other => panic!("expected UnsupportedPlatform, got {other:?}"),
        }
    }

    #[test]
    fn adapter_names_round_trip_to_ids() {
        let config = HttpConfig::default();
        for platform in Platform::ALL {
            assert_eq!(platform.adapter(&config).name(), platform.id());
        }
    }
}
