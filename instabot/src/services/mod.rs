//! Service implementations
//!
//! Real implementations of the traits in [`crate::traits`]: the JSON state
//! file, clocks, the WebDriver HTTP client and the site layer on top of it.

pub mod clock;
pub mod state_file;
pub mod web_site;
pub mod webdriver;

#[cfg(test)]
mod tests;

pub use clock::{FixedClock, SystemClock};
pub use state_file::JsonStateFile;
pub use web_site::{SiteLayout, WebSite};
pub use webdriver::WebDriverClient;
