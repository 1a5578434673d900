// pipeline.rs
use crate::config::HttpConfig;
use crate::domain::{aggregate, matches, PriceStats};
use crate::scraper::{Adapter, Listing, Marketplace, Platform, ScraperError, SearchResult, Transport};
use tracing::info;

/// One phrase to price, with an optional grade filter and price bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRequest {
    pub search_content: String,
    pub level: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchRequest {
    pub fn new(search_content: impl Into<String>) -> Self {
        Self {
            search_content: search_content.into(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_bounds(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.search_content.trim().is_empty()
    }
}

/// Aggregated prices for one request, plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub search_content: String,
    pub level: Option<String>,
    pub stats: PriceStats,
    pub source: String,
}

impl OutputRecord {
    pub fn highest(&self) -> Option<f64> {
        self.stats.highest()
    }

    pub fn lowest(&self) -> Option<f64> {
        self.stats.lowest()
    }

    pub fn average(&self) -> Option<f64> {
        self.stats.average()
    }

    pub fn count(&self) -> usize {
        self.stats.count
    }
}

/// A fatal adapter error stopped the batch. Records finished before it are kept.
#[derive(Debug, thiserror::Error)]
#[error("stopped at \"{failed_on}\" after {} completed searches: {source}", .completed.len())]
pub struct RunAborted {
    pub completed: Vec<OutputRecord>,
    pub failed_on: String,
    pub source: ScraperError,
}

/// Listings that keep a usable price and, when a level is given, mention it in the title.
pub fn filter_listings(listings: Vec<Listing>, level: Option<&str>) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| l.usable_price().is_some())
        .filter(|l| match level {
            Some(level) => l.title.as_deref().is_some_and(|t| matches(level, t)),
            None => true,
        })
        .collect()
}

pub fn build_record(request: &SearchRequest, result: SearchResult) -> OutputRecord {
    let survivors = filter_listings(result.listings, request.level.as_deref());

    OutputRecord {
        search_content: request.search_content.clone(),
        level: request.level.clone(),
        stats: aggregate(&survivors),
        source: result.source_url,
    }
}

/// Runs requests one after another against a single marketplace.
pub struct Pipeline<'a> {
    adapter: Adapter,
    http: &'a dyn Transport,
}

impl<'a> Pipeline<'a> {
    pub fn new(adapter: Adapter, http: &'a dyn Transport) -> Self {
        Self { adapter, http }
    }

    /// Resolves the platform id first, so an unknown one fails before any request is sent.
    pub fn for_platform(
        platform: &str,
        config: &HttpConfig,
        http: &'a dyn Transport,
    ) -> Result<Self, ScraperError> {
        let platform: Platform = platform.parse()?;
        Ok(Self::new(platform.adapter(config), http))
    }

    pub fn platform_name(&self) -> &'static str {
        self.adapter.name()
    }

    pub fn resolve(&self, request: &SearchRequest) -> Result<OutputRecord, ScraperError> {
        let result = self.adapter.search(
            self.http,
            request.search_content.trim(),
            request.min_price,
            request.max_price,
        )?;
        Ok(build_record(request, result))
    }

    /// One record per non-blank request, in input order.
    pub fn run(&self, requests: &[SearchRequest]) -> Result<Vec<OutputRecord>, RunAborted> {
        let mut completed = Vec::new();

        for (i, request) in requests.iter().enumerate() {
            if request.is_blank() {
                continue;
            }

            info!(
                platform = self.platform_name(),
                "[{}/{}] searching \"{}\"",
                i + 1,
                requests.len(),
                request.search_content
            );

            match self.resolve(request) {
                Ok(record) => {
                    info!(count = record.count(), source = %record.source, "resolved");
                    completed.push(record);
                }
                Err(source) => {
                    return Err(RunAborted {
                        completed,
                        failed_on: request.search_content.clone(),
                        source,
                    });
                }
            }
        }

        Ok(completed)
    }
}
