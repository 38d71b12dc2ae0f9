mod csv_feed;
mod fund_pages;

pub use csv_feed::CsvFeedFetcher;
pub use fund_pages::FundPageFetcher;
