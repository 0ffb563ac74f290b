//! Clients for the external data APIs

pub mod google_news;
pub mod newsapi;
pub mod sheets;
pub mod yahoo;

pub use google_news::GoogleNewsClient;
pub use newsapi::NewsApiClient;
pub use sheets::SheetsClient;
pub use yahoo::YahooFinanceClient;
