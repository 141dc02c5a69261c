pub mod models;
mod scraper_error;
mod ss_com;

pub use models::RawListing;
pub use scraper_error::ScraperError;
pub use ss_com::SsComScraper;
