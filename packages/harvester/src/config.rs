//! Configuration constants, run settings and validation functions for the harvester.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;

use crate::enumerate::BillIdTable;
use crate::error::{HarvesterError, Result};
use crate::types::{Chamber, IntroducedDateMode};

/// Base URL of the ProPublica Congress API (version 1).
pub const API_BASE_URL: &str = "https://api.propublica.org/congress/v1";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "PROPUBLICA_API_KEY";

/// Highest bill number accepted in an id table.
pub const MAX_BILL_NUMBER: u32 = 99_999;

/// Default directory for exported CSV files.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Default directory for run logs.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Date stamp pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static STAMP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Session pattern: one to three digits, no leading zero.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SESSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]\d{0,2}$").expect("valid regex"));

/// Parse and validate a congress session number.
///
/// # Examples
/// ```
/// use congress_harvester::config::parse_session;
///
/// assert_eq!(parse_session("116").unwrap(), 116);
/// assert!(parse_session("0").is_err());
/// assert!(parse_session("abc").is_err());
/// ```
pub fn parse_session(session: &str) -> Result<u32> {
    if !SESSION_PATTERN.is_match(session) {
        return Err(HarvesterError::InvalidSession(session.to_string()));
    }
    session
        .parse()
        .map_err(|_| HarvesterError::InvalidSession(session.to_string()))
}

/// Validate a file name date stamp (YYYY-MM-DD, real calendar date).
///
/// # Examples
/// ```
/// use congress_harvester::config::validate_stamp;
///
/// assert!(validate_stamp("2019-10-09").is_ok());
/// assert!(validate_stamp("2019-13-09").is_err());
/// ```
pub fn validate_stamp(stamp: &str) -> Result<()> {
    if !STAMP_PATTERN.is_match(stamp) {
        return Err(HarvesterError::InvalidStamp(stamp.to_string()));
    }
    chrono::NaiveDate::parse_from_str(stamp, "%Y-%m-%d")
        .map_err(|_| HarvesterError::InvalidStamp(stamp.to_string()))?;
    Ok(())
}

/// Build the lookup URL for one bill.
///
/// # Examples
/// ```
/// use congress_harvester::config::{bill_url, API_BASE_URL};
/// use congress_harvester::types::Chamber;
///
/// assert_eq!(
///     bill_url(API_BASE_URL, 116, Chamber::Senate, 12),
///     "https://api.propublica.org/congress/v1/116/bills/s12.json"
/// );
/// ```
pub fn bill_url(base_url: &str, session: u32, chamber: Chamber, number: u32) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/{session}/bills/{chamber}{number}.json")
}

/// Which of the two exported datasets a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    General,
    Actions,
}

impl Dataset {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Actions => "actions",
        }
    }
}

/// Settings for one harvest run.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
#[derive(Clone)]
pub struct HarvestConfig {
    pub chamber: Chamber,
    pub session: u32,
    pub api_key: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Date embedded in output file names.
    pub stamp: String,
    /// Echo status lines to stdout.
    pub loud: bool,
    pub introduced_date_mode: IntroducedDateMode,
    pub id_table: BillIdTable,
}

impl HarvestConfig {
    /// Create a config with defaults for everything but the run target and key.
    ///
    /// The stamp defaults to today's date.
    pub fn new(chamber: Chamber, session: u32, api_key: impl Into<String>) -> Self {
        Self {
            chamber,
            session,
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            stamp: Local::now().format("%Y-%m-%d").to_string(),
            loud: true,
            introduced_date_mode: IntroducedDateMode::default(),
            id_table: BillIdTable::builtin(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = stamp.into();
        self
    }

    pub fn with_loud(mut self, loud: bool) -> Self {
        self.loud = loud;
        self
    }

    pub fn with_introduced_date_mode(mut self, mode: IntroducedDateMode) -> Self {
        self.introduced_date_mode = mode;
        self
    }

    pub fn with_id_table(mut self, table: BillIdTable) -> Self {
        self.id_table = table;
        self
    }

    /// Check the settings that can be wrong before any request is made.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(HarvesterError::MissingConfig(format!(
                "API key (pass --api-key or set {API_KEY_ENV})"
            )));
        }
        if self.session == 0 {
            return Err(HarvesterError::InvalidSession(self.session.to_string()));
        }
        validate_stamp(&self.stamp)
    }

    /// Path of an exported dataset for the enumerated id bounds.
    ///
    /// # Examples
    /// ```
    /// use congress_harvester::config::{Dataset, HarvestConfig};
    /// use congress_harvester::types::Chamber;
    ///
    /// let config = HarvestConfig::new(Chamber::Senate, 116, "key").with_stamp("2019-10-09");
    /// assert_eq!(
    ///     config.dataset_path(Dataset::General, 1, 2594),
    ///     std::path::Path::new("data/2019-10-09_s116_general_1-2594.csv")
    /// );
    /// ```
    #[must_use]
    pub fn dataset_path(&self, dataset: Dataset, first: u32, last: u32) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}{}_{}_{}-{}.csv",
            self.stamp,
            self.chamber,
            self.session,
            dataset.as_str(),
            first,
            last
        ))
    }

    /// Path of the run log for a run started at `started`.
    #[must_use]
    pub fn log_path(&self, started: &DateTime<Local>) -> PathBuf {
        log_file_path(&self.log_dir, started)
    }
}

/// Build the log file path `<dir>/log_<YYYY-mm-dd_HH-MM-SS>.txt`.
pub fn log_file_path(dir: &Path, started: &DateTime<Local>) -> PathBuf {
    dir.join(format!("log_{}.txt", started.format("%Y-%m-%d_%H-%M-%S")))
}
