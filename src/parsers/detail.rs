use chrono::{DateTime, FixedOffset};
use scraper::Html;

use crate::error::ParseError;
use crate::models::DetailRecord;
use crate::parsers::path::{
    descend, describe, first, full_text, leading_text, nth, own_text, select_first, selector,
    Step,
};
use crate::parsers::text::{collapse_newlines, collapse_whitespace, parse_date, PAGE_DATE_FORMAT};

/// Structural location of every detail field, relative to the content box.
///
/// The meta paragraphs are addressed by position. If the site reorders them
/// the indices here must change; nothing tries to guess.
#[derive(Debug, Clone, Copy)]
pub struct DetailLayout {
    /// CSS selector for the content box, searched across the whole page.
    pub content: &'static str,
    /// CSS selector for the subject heading, searched inside the content box.
    pub subject: &'static str,
    pub principal: &'static [Step],
    pub meta_paragraphs: &'static [Step],
    pub sponsor_index: usize,
    pub posted_index: usize,
    pub closed_index: usize,
    pub signatures: &'static [Step],
    pub body: &'static [Step],
    pub eligibility: &'static [Step],
    pub eligibility_prefix: &'static str,
    pub addressed_to: &'static [Step],
    pub addressed_to_prefix: &'static str,
}

const WRAPPER: [Step; 3] = [Step::child("div"), Step::child("div"), Step::child("div")];

pub const QLD_DETAIL_LAYOUT: DetailLayout = DetailLayout {
    content: r#"div[class="standard-box standard-box-content"]"#,
    subject: "div > h2",
    principal: &[WRAPPER[0], WRAPPER[1], WRAPPER[2], Step::child("blockquote")],
    meta_paragraphs: &[WRAPPER[0], WRAPPER[1], WRAPPER[2], Step::child("p")],
    sponsor_index: 2,
    posted_index: 3,
    closed_index: 4,
    signatures: &[
        WRAPPER[0],
        WRAPPER[1],
        WRAPPER[2],
        Step::child("p"),
        Step::child("span"),
    ],
    body: &[Step::with_class("div", "petitionBody")],
    eligibility: &[Step::with_class("h3", "eligibility")],
    eligibility_prefix: "Eligibility -",
    addressed_to: &[Step::with_class("div", "petitionHeading"), Step::child("strong")],
    addressed_to_prefix: "TO:",
};

/// Builds the full record for one petition from its detail page.
pub fn parse_detail(
    reference_num: &str,
    url: &str,
    observed_at: DateTime<FixedOffset>,
    document: &Html,
    layout: &DetailLayout,
) -> Result<DetailRecord, ParseError> {
    let content = select_first(document, layout.content, "content")?;

    let subject_selector = selector(layout.subject)?;
    let subject = content
        .select(&subject_selector)
        .next()
        .map(full_text)
        .ok_or_else(|| ParseError::MissingNode {
            field: "subject",
            path: layout.subject.to_string(),
        })?
        .trim()
        .to_string();

    let principal = collapse_whitespace(&full_text(first(content, layout.principal, "principal")?))
        .trim()
        .to_string();

    let meta_text = |index: usize, field: &'static str| -> Result<String, ParseError> {
        let paragraph = nth(content, layout.meta_paragraphs, index, field)?;
        own_text(paragraph)
            .first()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ParseError::MissingNode {
                field,
                path: format!("({})[{}]/text()", describe(layout.meta_paragraphs), index + 1),
            })
    };

    let sponsor = meta_text(layout.sponsor_index, "sponsor")?;
    let posted_at = parse_date(&meta_text(layout.posted_index, "posted_at")?, PAGE_DATE_FORMAT)?;
    let closed_at = parse_date(&meta_text(layout.closed_index, "closed_at")?, PAGE_DATE_FORMAT)?;

    let signatures = descend(content, layout.signatures)
        .into_iter()
        .flat_map(own_text)
        .next()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| ParseError::MissingNode {
            field: "signatures",
            path: format!("{}/text()", describe(layout.signatures)),
        })?;

    let body_text = full_text(first(content, layout.body, "body")?);
    let body = collapse_whitespace(&collapse_newlines(body_text.trim()))
        .trim()
        .to_string();

    let eligibility = strip_label(
        leading_text(first(content, layout.eligibility, "eligibility")?, "eligibility")?,
        layout.eligibility_prefix,
    );

    let addressed_to = strip_label(
        leading_text(first(content, layout.addressed_to, "addressed_to")?, "addressed_to")?,
        layout.addressed_to_prefix,
    );

    Ok(DetailRecord {
        retrieved_at: observed_at,
        url: url.to_string(),
        reference_num: reference_num.to_string(),
        subject,
        signatures,
        closed_at,
        body,
        principal,
        eligibility,
        sponsor,
        posted_at,
        addressed_to,
    })
}

fn strip_label(text: &str, label: &str) -> String {
    let text = text.trim();
    text.strip_prefix(label).unwrap_or(text).trim().to_string()
}
