pub mod ebay;
pub mod http;
mod models;
pub mod platform;
pub mod point130;
mod scraper_error;

pub use http::{HttpClient, HttpResponse, RetryPolicy, Transport};
pub use models::{Listing, SearchResult};
pub use platform::{Adapter, Marketplace, Platform};
pub use scraper_error::ScraperError;
