use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PipelineError, StorageError};
use crate::models::{SummaryRecord, BRISBANE};
use crate::parsers::{
    parse_detail, parse_listing, parse_markup, DetailLayout, ListingLayout, QLD_DETAIL_LAYOUT,
    QLD_LISTING_LAYOUT,
};
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::storage::{RowStore, SqliteStorage};
use crate::utils::http::Fetcher;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub added: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.added + self.skipped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetitionOutcome {
    Added { row_id: i64 },
    AlreadyExists,
}

/// Everything one harvest run needs, threaded through explicitly.
pub struct RunContext<'a> {
    pub config: &'a Config,
    pub fetcher: &'a dyn Fetcher,
    pub store: &'a dyn RowStore,
    pub listing_layout: ListingLayout,
    pub detail_layout: DetailLayout,
    /// Capture time shared by every row of the run.
    pub retrieved_at: DateTime<FixedOffset>,
}

impl<'a> RunContext<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn Fetcher, store: &'a dyn RowStore) -> Self {
        Self {
            config,
            fetcher,
            store,
            listing_layout: QLD_LISTING_LAYOUT,
            detail_layout: QLD_DETAIL_LAYOUT,
            retrieved_at: Utc::now().with_timezone(&*BRISBANE),
        }
    }

    fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            report_mismatches: self.config.report_mismatches,
            ascii_text: self.config.ascii_text,
        }
    }

    async fn read_listing(&self) -> Vec<SummaryRecord> {
        let raw = self.fetcher.fetch(&self.config.listing_url).await;
        let document = raw.as_deref().map(parse_markup);

        match parse_listing(document.as_ref(), &self.listing_layout, |reference_num| {
            self.config.detail_url(reference_num)
        }) {
            Ok(records) => records,
            Err(e) => {
                warn!("Listing page could not be parsed, treating it as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch, parse, reconcile and store one petition.
    pub async fn process(&self, item: &SummaryRecord) -> Result<PetitionOutcome, PipelineError> {
        let url = self.config.detail_url(&item.reference_num);
        let raw = self
            .fetcher
            .fetch(&url)
            .await
            .ok_or_else(|| PipelineError::DetailUnavailable {
                reference_num: item.reference_num.clone(),
                url: url.clone(),
            })?;

        let detail = {
            let document = parse_markup(&raw);
            parse_detail(
                &item.reference_num,
                &url,
                self.retrieved_at,
                &document,
                &self.detail_layout,
            )
            .map_err(|source| PipelineError::DetailParse {
                reference_num: item.reference_num.clone(),
                source,
            })?
        };

        let row = reconcile(item, &detail, self.reconcile_options()).row;

        let key = row.dedup_key();
        if self.store.exists(&key.reference_num, &key.signatures).await? {
            info!("Already exists {} - \"{}\"", row.reference_num, row.subject);
            return Ok(PetitionOutcome::AlreadyExists);
        }

        match self.store.insert(&row).await {
            Ok(row_id) => {
                info!("Adding {} - \"{}\"", row.reference_num, row.subject);
                debug!("Stored petition {} as row {}", row.reference_num, row_id);
                Ok(PetitionOutcome::Added { row_id })
            }
            Err(StorageError::ConstraintViolation { .. }) => {
                info!("Already exists {} - \"{}\"", row.reference_num, row.subject);
                Ok(PetitionOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Processes every listed petition in listing order. The first detail
    /// failure ends the run; rows committed before it stay.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        info!("Reading petition list");
        let items = self.read_listing().await;

        info!("Reading petitions");
        let mut summary = RunSummary::default();
        for item in &items {
            match self.process(item).await? {
                PetitionOutcome::Added { .. } => summary.added += 1,
                PetitionOutcome::AlreadyExists => summary.skipped += 1,
            }
        }

        info!(
            "Added {}, skipped {}, total {}",
            summary.added,
            summary.skipped,
            summary.total()
        );
        Ok(summary)
    }
}

/// Opens the configured SQLite store, runs once and releases the store on
/// every exit path.
pub async fn run_with_sqlite(config: &Config, fetcher: &dyn Fetcher) -> Result<RunSummary> {
    let store = SqliteStorage::open(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;

    let outcome: Result<RunSummary, PipelineError> = async {
        store.migrate().await?;
        RunContext::new(config, fetcher, &store).run().await
    }
    .await;

    let closed = store.close();
    let summary = outcome.context("Petition run failed")?;
    closed.context("Failed to close database")?;
    Ok(summary)
}
