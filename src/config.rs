use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_LISTING_URL: &str =
    "https://www.parliament.qld.gov.au/work-of-assembly/petitions/current-epetitions";
pub const DEFAULT_DETAIL_URL_TEMPLATE: &str =
    "https://www.parliament.qld.gov.au/work-of-assembly/petitions/petition-details?id={}";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// Name of the optional config file, looked up in the working directory.
const CONFIG_FILE: &str = "petitions";
const ENV_PREFIX: &str = "PETITIONS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listing_url: String,
    pub detail_url_template: String,
    pub database_path: PathBuf,
    pub cache_enabled: bool,
    pub cache_dir: PathBuf,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub report_mismatches: bool,
    pub ascii_text: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            detail_url_template: DEFAULT_DETAIL_URL_TEMPLATE.to_string(),
            database_path: PathBuf::from("data.sqlite"),
            cache_enabled: false,
            cache_dir: PathBuf::from("cache"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 25,
            report_mismatches: false,
            ascii_text: false,
        }
    }
}

impl Config {
    /// Defaults, then `petitions.toml` (or `$PETITIONS_CONFIG`), then `PETITIONS_*` env vars.
    pub fn load() -> Result<Self> {
        let file = std::env::var("PETITIONS_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        let defaults = Config::default();

        let settings = config::Config::builder()
            .set_default("listing_url", defaults.listing_url)?
            .set_default("detail_url_template", defaults.detail_url_template)?
            .set_default("database_path", defaults.database_path.to_string_lossy().to_string())?
            .set_default("cache_enabled", defaults.cache_enabled)?
            .set_default("cache_dir", defaults.cache_dir.to_string_lossy().to_string())?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("timeout_seconds", defaults.timeout_seconds as i64)?
            .set_default("report_mismatches", defaults.report_mismatches)?
            .set_default("ascii_text", defaults.ascii_text)?
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to assemble configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Invalid petitions configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.detail_url_template.contains("{}") {
            anyhow::bail!(
                "detail_url_template must contain a '{{}}' placeholder: {}",
                self.detail_url_template
            );
        }
        Ok(())
    }

    /// Detail page URL for one petition reference number.
    pub fn detail_url(&self, reference_num: &str) -> String {
        self.detail_url_template.replacen("{}", reference_num, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_url_substitutes_reference_number() {
        let config = Config::default();
        assert_eq!(
            config.detail_url("3712-22"),
            "https://www.parliament.qld.gov.au/work-of-assembly/petitions/petition-details?id=3712-22"
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let config = Config {
            detail_url_template: "https://example.com/petition".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn cache_is_disabled_by_default() {
        let config = Config::default();
        assert!(!config.cache_enabled);
        assert!(!config.report_mismatches);
    }
}
