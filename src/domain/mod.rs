pub mod level;
pub mod price;
pub mod stats;

pub use level::matches;
pub use price::normalize_price;
pub use stats::{aggregate, PriceRange, PriceStats};
