pub mod fetcher;
pub mod sitemap;
pub mod web;

pub use fetcher::{FetchError, PageFetcher};
pub use sitemap::{SitemapError, SitemapReader};
pub use web::HttpFetcher;
