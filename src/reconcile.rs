use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::models::{format_date, format_timestamp, CanonicalRow, DetailRecord, SummaryRecord};
use crate::parsers::normalise_text;

/// Fields whose listing and detail renditions differ in formatting only.
pub const BENIGN_MISMATCH_FIELDS: &[&str] = &["principal"];

/// A shared field on which the listing and the detail page disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: &'static str,
    pub summary: String,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct Reconciled {
    pub row: CanonicalRow,
    pub mismatches: Vec<FieldMismatch>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Log mismatches at WARN instead of DEBUG.
    pub report_mismatches: bool,
    /// Pass free-text columns through [`normalise_text`].
    pub ascii_text: bool,
}

/// Compares every field present in both views, skipping [`BENIGN_MISMATCH_FIELDS`].
pub fn cross_check(
    summary: &BTreeMap<&'static str, String>,
    detail: &BTreeMap<&'static str, String>,
) -> Vec<FieldMismatch> {
    summary
        .iter()
        .filter(|(field, _)| !BENIGN_MISMATCH_FIELDS.contains(*field))
        .filter_map(|(field, summary_value)| {
            let detail_value = detail.get(field)?;
            (detail_value != summary_value).then(|| FieldMismatch {
                field: *field,
                summary: summary_value.clone(),
                detail: detail_value.clone(),
            })
        })
        .collect()
}

/// Merges both views into one row. Detail values win; `reference_name` comes
/// from the listing. Disagreements are logged and returned, never fatal.
pub fn reconcile(
    summary: &SummaryRecord,
    detail: &DetailRecord,
    options: ReconcileOptions,
) -> Reconciled {
    let mismatches = cross_check(&summary.field_values(), &detail.field_values());
    for mismatch in &mismatches {
        if options.report_mismatches {
            warn!(
                "Petition {}: listing {} '{}' differs from detail '{}'",
                detail.reference_num, mismatch.field, mismatch.summary, mismatch.detail
            );
        } else {
            debug!(
                "Petition {}: listing {} '{}' differs from detail '{}'",
                detail.reference_num, mismatch.field, mismatch.summary, mismatch.detail
            );
        }
    }

    let text = |value: &str| {
        if options.ascii_text {
            normalise_text(Some(value))
        } else {
            value.to_string()
        }
    };

    let row = CanonicalRow {
        retrieved_at: format_timestamp(detail.retrieved_at.naive_local()),
        url: detail.url.clone(),
        reference_name: summary.reference_name.clone(),
        reference_num: detail.reference_num.clone(),
        subject: text(&detail.subject),
        signatures: detail.signatures.clone(),
        closed_at: format_date(detail.closed_at),
        body: text(&detail.body),
        principal: text(&detail.principal),
        eligibility: text(&detail.eligibility),
        sponsor: text(&detail.sponsor),
        posted_at: format_date(detail.posted_at),
        addressed_to: text(&detail.addressed_to),
    };

    Reconciled { row, mismatches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BRISBANE;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;

    fn summary() -> SummaryRecord {
        SummaryRecord {
            reference_num: "1234".to_string(),
            reference_name: "1234-24".to_string(),
            title: "Save the Koalas".to_string(),
            url: "https://example.test/petition-details?id=1234".to_string(),
            signatures: "50".to_string(),
            closed_at: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        }
    }

    fn detail() -> DetailRecord {
        DetailRecord {
            retrieved_at: BRISBANE.with_ymd_and_hms(2025, 5, 20, 9, 30, 5).unwrap(),
            url: "https://example.test/petition-details?id=1234".to_string(),
            reference_num: "1234".to_string(),
            subject: "Save the Koalas".to_string(),
            signatures: "50".to_string(),
            closed_at: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            body: "Protect habitat.".to_string(),
            principal: "Jane Citizen Brisbane".to_string(),
            eligibility: "Queensland residents".to_string(),
            sponsor: "Mr Sam Sponsor MP".to_string(),
            posted_at: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            addressed_to: "The Clerk".to_string(),
        }
    }

    #[test]
    fn builds_row_with_fixed_offset_timestamps() {
        let reconciled = reconcile(&summary(), &detail(), ReconcileOptions::default());

        assert!(reconciled.mismatches.is_empty());
        assert_eq!(
            reconciled.row,
            CanonicalRow {
                retrieved_at: "2025-05-20T09:30:05+10:00".to_string(),
                url: "https://example.test/petition-details?id=1234".to_string(),
                reference_name: "1234-24".to_string(),
                reference_num: "1234".to_string(),
                subject: "Save the Koalas".to_string(),
                signatures: "50".to_string(),
                closed_at: "2025-06-30T00:00:00+10:00".to_string(),
                body: "Protect habitat.".to_string(),
                principal: "Jane Citizen Brisbane".to_string(),
                eligibility: "Queensland residents".to_string(),
                sponsor: "Mr Sam Sponsor MP".to_string(),
                posted_at: "2025-05-01T00:00:00+10:00".to_string(),
                addressed_to: "The Clerk".to_string(),
            }
        );
    }

    #[test]
    fn detail_values_win_and_disagreement_is_recorded() {
        let mut listed = summary();
        listed.signatures = "48".to_string();

        let reconciled = reconcile(&listed, &detail(), ReconcileOptions::default());

        assert_eq!(reconciled.row.signatures, "50");
        assert_eq!(
            reconciled.mismatches,
            vec![FieldMismatch {
                field: "signatures",
                summary: "48".to_string(),
                detail: "50".to_string(),
            }]
        );
    }

    #[test]
    fn principal_differences_are_not_mismatches() {
        let mut listed = summary().field_values();
        listed.insert("principal", "Jane  Citizen\nBrisbane".to_string());
        listed.insert("closed_at", "2025-07-01T00:00:00+10:00".to_string());

        let mismatches = cross_check(&listed, &detail().field_values());

        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].field, "closed_at");
    }

    #[test]
    fn listing_only_fields_are_not_compared() {
        let mut listed = summary();
        listed.title = "Something else".to_string();
        listed.reference_name = "9999-99".to_string();

        let reconciled = reconcile(&listed, &detail(), ReconcileOptions::default());

        assert!(reconciled.mismatches.is_empty());
        assert_eq!(reconciled.row.reference_name, "9999-99");
    }

    #[test]
    fn ascii_option_normalises_free_text() {
        let mut page = detail();
        page.subject = "Queensland\u{2019}s koalas".to_string();

        let options = ReconcileOptions {
            ascii_text: true,
            ..ReconcileOptions::default()
        };
        let reconciled = reconcile(&summary(), &page, options);

        assert_eq!(reconciled.row.subject, "Queensland's koalas");
        assert_eq!(reconciled.row.signatures, "50");
    }
}
