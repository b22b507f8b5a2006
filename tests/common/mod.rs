#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use qld_petitions::config::Config;
use qld_petitions::utils::http::Fetcher;

pub const DETAIL: &str = include_str!("../fixtures/detail.html");
pub const LISTING: &str = include_str!("../fixtures/listing.html");

pub const LISTING_URL: &str = "https://example.test/current-epetitions";

pub fn config(db_path: &Path) -> Config {
    Config {
        listing_url: LISTING_URL.to_string(),
        detail_url_template: "https://example.test/petition-details?id={}".to_string(),
        database_path: db_path.to_path_buf(),
        ..Config::default()
    }
}

pub fn detail_url(reference_num: &str) -> String {
    format!("https://example.test/petition-details?id={}", reference_num)
}

/// Listing page with one item per `(reference_num, signatures)`.
pub fn listing_page(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(reference_num, signatures)| {
            format!(
                r#"<div class="petitions-item"><div><div>
                    <a href="/work-of-assembly/petitions/petition-details?id={reference_num}">Petition {reference_num}</a>
                    - {reference_num}-24
                    <p>30/06/2025<span>Closing</span><span>{signatures} Signatures</span></p>
                </div></div></div>"#
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", body)
}

/// The detail fixture with a different signature count.
pub fn detail_page(signatures: &str) -> String {
    DETAIL.replace("<span>50</span>", &format!("<span>{}</span>", signatures))
}

/// Serves canned pages; anything else is absent.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into().into_bytes());
        self
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        self.pages.get(url).cloned()
    }
}

pub fn stored_rows(db_path: &Path) -> Vec<(String, String, String)> {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    let mut stmt = conn
        .prepare("SELECT reference_num, signatures, retrieved_at FROM data ORDER BY rowid")
        .unwrap();
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}
