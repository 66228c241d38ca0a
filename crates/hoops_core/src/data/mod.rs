//! Static inputs consumed before the clock starts.

pub mod catalog;
pub mod seed;

pub use catalog::{Catalog, DEMO_CATALOG_JSON};
pub use seed::{simulate_first_three_quarters, SeedScore};
