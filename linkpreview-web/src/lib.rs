//! Page acquisition and metadata extraction.
//!
//! - HTML metadata parsing with field fallbacks (`extract`)
//! - Browser capture trait and Fantoccini-backed implementation (`browser`)
//! - The static-then-browser extraction chain (`extractor`)
//! - Fixed replacement records for known unreadable pages (`overrides`)

pub mod browser;
pub mod extract;
pub mod extractor;
pub mod overrides;

pub use browser::{BrowserCapturer, FantocciniCapturer, PageCapture};
pub use extract::parse_metadata;
pub use extractor::MetadataExtractor;
pub use overrides::apply_known_overrides;
