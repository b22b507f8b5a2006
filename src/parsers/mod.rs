pub mod detail;
pub mod listing;
pub mod path;
pub mod text;

pub use detail::*;
pub use listing::*;
pub use text::*;

use scraper::Html;

/// Parses fetched bytes into a document tree. Invalid UTF-8 is replaced, not rejected.
pub fn parse_markup(raw: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(raw))
}
