//! Driver layer for rendering pages in a real browser.
//!
//! Static fetches miss metadata that pages inject with JavaScript; this crate
//! opens a WebDriver session, navigates with a bounded budget, and hands back
//! the rendered HTML.
//!
//! - [`browser::driver::PreviewDriver`]: WebDriver client wrapper
//! - [`browser::page::PreviewPage`]: navigation budget and page accessors
//! - [`browser::stealth`]: stealth profiles and JS evasions
pub mod browser;

pub use browser::driver::{DriverOptions, PreviewDriver};
pub use browser::page::{NavigationBudget, PreviewPage};
pub use browser::stealth::StealthProfile;
