use scraper::Html;

use crate::error::ParseError;
use crate::models::SummaryRecord;
use crate::parsers::path::{descend, first, leading_text, nth, own_text, selector, Step};
use crate::parsers::text::{parse_date, split_by_char_class, PAGE_DATE_FORMAT};

/// Where each summary field lives inside a listing item.
#[derive(Debug, Clone, Copy)]
pub struct ListingLayout {
    /// CSS selector for one item container.
    pub item: &'static str,
    pub anchor: &'static [Step],
    /// Element whose own text nodes carry the reference name.
    pub name: &'static [Step],
    pub counters: &'static [Step],
    pub signatures_index: usize,
    /// Paragraph whose own text is the closing date.
    pub closing: &'static [Step],
    /// Characters separating path and query parts in the anchor href.
    pub href_separators: &'static str,
    pub signatures_suffix: &'static str,
}

pub const QLD_LISTING_LAYOUT: ListingLayout = ListingLayout {
    item: r#"div[class="petitions-item"]"#,
    anchor: &[Step::child("div"), Step::child("div"), Step::child("a")],
    name: &[Step::child("div"), Step::child("div")],
    counters: &[
        Step::child("div"),
        Step::child("div"),
        Step::child("p"),
        Step::child("span"),
    ],
    signatures_index: 1,
    closing: &[Step::child("div"), Step::child("div"), Step::child("p")],
    href_separators: "/=?",
    signatures_suffix: "Signatures",
};

/// Summary records in listing order. An absent page yields no records.
pub fn parse_listing(
    document: Option<&Html>,
    layout: &ListingLayout,
    detail_url: impl Fn(&str) -> String,
) -> Result<Vec<SummaryRecord>, ParseError> {
    let Some(document) = document else {
        return Ok(Vec::new());
    };

    let item_selector = selector(layout.item)?;
    let mut records = Vec::new();

    for item in document.select(&item_selector) {
        let anchor = first(item, layout.anchor, "anchor")?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or(ParseError::MissingAttribute {
                field: "reference_num",
                attribute: "href",
            })?;
        let reference_num = split_by_char_class(href, layout.href_separators)
            .pop()
            .unwrap_or_default()
            .trim()
            .to_string();

        let reference_name = descend(item, layout.name)
            .into_iter()
            .flat_map(own_text)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .trim_matches(|c: char| c == '-' || c == ' ')
            .to_string();

        let title = leading_text(anchor, "title")?.trim().to_string();

        let counter = nth(item, layout.counters, layout.signatures_index, "signatures")?;
        let signatures = leading_text(counter, "signatures")?
            .replace(layout.signatures_suffix, "")
            .trim()
            .to_string();

        let closing_text = descend(item, layout.closing)
            .into_iter()
            .flat_map(own_text)
            .collect::<Vec<_>>()
            .join(" ");
        let closed_at = parse_date(closing_text.trim(), PAGE_DATE_FORMAT)?;

        records.push(SummaryRecord {
            url: detail_url(&reference_num),
            reference_num,
            reference_name,
            title,
            signatures,
            closed_at,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const LISTING: &str = include_str!("../../tests/fixtures/listing.html");

    fn detail_url(reference_num: &str) -> String {
        format!("https://example.test/petition-details?id={}", reference_num)
    }

    #[test]
    fn parses_items_in_listing_order() {
        let html = Html::parse_document(LISTING);
        let records = parse_listing(Some(&html), &QLD_LISTING_LAYOUT, detail_url).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            SummaryRecord {
                reference_num: "1234".to_string(),
                reference_name: "1234-24".to_string(),
                title: "Save the Koalas".to_string(),
                url: "https://example.test/petition-details?id=1234".to_string(),
                signatures: "50".to_string(),
                closed_at: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            }
        );
        assert_eq!(records[1].reference_num, "1240");
        assert_eq!(records[1].signatures, "1,204");
    }

    #[test]
    fn absent_document_yields_nothing() {
        let records = parse_listing(None, &QLD_LISTING_LAYOUT, detail_url).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn page_without_items_yields_nothing() {
        let html = Html::parse_document("<html><body><p>No current petitions</p></body></html>");
        let records = parse_listing(Some(&html), &QLD_LISTING_LAYOUT, detail_url).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn item_missing_counter_fails_the_page() {
        let html = Html::parse_document(
            r#"<div class="petitions-item"><div><div>
                <a href="petition-details?id=9">Title</a>
                <p>01/01/2025<span>Closing</span></p>
            </div></div></div>"#,
        );
        let err = parse_listing(Some(&html), &QLD_LISTING_LAYOUT, detail_url).unwrap_err();
        assert!(matches!(err, ParseError::MissingNode { field: "signatures", .. }));
    }

    #[test]
    fn malformed_closing_date_fails_the_page() {
        let html = Html::parse_document(
            r#"<div class="petitions-item"><div><div>
                <a href="petition-details?id=9">Title</a>
                <p>soon<span>Closing</span><span>3 Signatures</span></p>
            </div></div></div>"#,
        );
        let err = parse_listing(Some(&html), &QLD_LISTING_LAYOUT, detail_url).unwrap_err();
        assert!(matches!(err, ParseError::DateFormat { .. }));
    }
}
