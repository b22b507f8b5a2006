use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{format_date, format_timestamp};

/// A petition as summarised on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub reference_num: String,
    pub reference_name: String,
    pub title: String,
    pub url: String,
    pub signatures: String,
    pub closed_at: NaiveDate,
}

/// A petition as shown on its own detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub retrieved_at: DateTime<FixedOffset>,
    pub url: String,
    pub reference_num: String,
    pub subject: String,
    pub signatures: String,
    pub closed_at: NaiveDate,
    pub body: String,
    pub principal: String,
    pub eligibility: String,
    pub sponsor: String,
    pub posted_at: NaiveDate,
    pub addressed_to: String,
}

/// One row of the `data` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub retrieved_at: String,
    pub url: String,
    pub reference_name: String,
    pub reference_num: String,
    pub subject: String,
    pub signatures: String,
    pub closed_at: String,
    pub body: String,
    pub principal: String,
    pub eligibility: String,
    pub sponsor: String,
    pub posted_at: String,
    pub addressed_to: String,
}

/// `(reference_num, signatures)`: a new signature count is a new observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub reference_num: String,
    pub signatures: String,
}

impl SummaryRecord {
    /// Field values keyed by storage column name.
    pub fn field_values(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("reference_num", self.reference_num.clone()),
            ("reference_name", self.reference_name.clone()),
            ("title", self.title.clone()),
            ("url", self.url.clone()),
            ("signatures", self.signatures.clone()),
            ("closed_at", format_date(self.closed_at)),
        ])
    }
}

impl DetailRecord {
    /// Field values keyed by storage column name.
    pub fn field_values(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("retrieved_at", format_timestamp(self.retrieved_at.naive_local())),
            ("url", self.url.clone()),
            ("reference_num", self.reference_num.clone()),
            ("subject", self.subject.clone()),
            ("signatures", self.signatures.clone()),
            ("closed_at", format_date(self.closed_at)),
            ("body", self.body.clone()),
            ("principal", self.principal.clone()),
            ("eligibility", self.eligibility.clone()),
            ("sponsor", self.sponsor.clone()),
            ("posted_at", format_date(self.posted_at)),
            ("addressed_to", self.addressed_to.clone()),
        ])
    }
}

impl CanonicalRow {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            reference_num: self.reference_num.clone(),
            signatures: self.signatures.clone(),
        }
    }
}
