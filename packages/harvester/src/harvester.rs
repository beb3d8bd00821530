//! Main harvester service that ties all components together.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use indicatif::ProgressBar;
use reqwest::blocking::Client;

use crate::config::{Dataset, HarvestConfig};
use crate::error::{HarvesterError, Result};
use crate::export::Table;
use crate::fetch::fetch_bill;
use crate::http::create_client;
use crate::parse::{parse_actions, parse_general};
use crate::status::StatusLog;
use crate::types::{ActionRecord, BillKey, BillRecord};

/// Records accumulated over one run.
#[derive(Debug, Default)]
pub struct Harvest {
    pub bills: Vec<BillRecord>,
    pub actions: Vec<ActionRecord>,
    /// Bill labels that were requested but yielded no records.
    pub skipped: Vec<String>,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct HarvestReport {
    pub requested: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub actions: usize,
    pub general_path: PathBuf,
    pub actions_path: PathBuf,
    pub log_path: PathBuf,
}

/// Harvest all bills for the configured chamber and session and export them.
///
/// Requests are sequential. Fetch and API-level failures skip the bill;
/// a bill that passes those checks but cannot be parsed aborts the run
/// before anything is written.
///
/// # Arguments
/// * `config` - Run settings
/// * `progress` - Advanced once per requested bill (use `ProgressBar::hidden()` to disable)
pub fn run_harvest(config: &HarvestConfig, progress: &ProgressBar) -> Result<HarvestReport> {
    config.validate()?;

    let ids = config.id_table.enumerate(config.chamber, config.session)?;
    let (first, last) = match (ids.first(), ids.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(HarvesterError::EmptyBillRange {
                chamber: config.chamber.to_string(),
                session: config.session,
            })
        }
    };

    fs::create_dir_all(&config.log_dir)?;
    let log = StatusLog::new(config.log_path(&Local::now()), config.loud);

    log.message(&format!(
        "{} total bills; last bill is {}{}",
        ids.len(),
        config.chamber,
        last
    ))?;

    let client = create_client()?;
    progress.set_length(ids.len() as u64);

    let mut harvest = Harvest::default();
    for number in &ids {
        let key = BillKey::new(config.chamber, *number, config.session);
        progress.set_message(key.label());
        harvest_bill(&client, config, &log, &key, &mut harvest)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    log.message("--> converting to tables")?;
    let general_table = Table::from_records(&harvest.bills);
    let actions_table = Table::from_records(&harvest.actions);

    log.message("--> saving datasets")?;
    let general_path =
        general_table.write_csv(&config.dataset_path(Dataset::General, first, last))?;
    let actions_path =
        actions_table.write_csv(&config.dataset_path(Dataset::Actions, first, last))?;

    Ok(HarvestReport {
        requested: ids.len(),
        fetched: harvest.bills.len(),
        skipped: harvest.skipped.len(),
        actions: harvest.actions.len(),
        general_path,
        actions_path,
        log_path: log.path().to_path_buf(),
    })
}

/// Fetch, check and parse a single bill into `harvest`.
///
/// Returns `Ok(())` for skipped bills; only parse and log failures are errors.
pub fn harvest_bill(
    client: &Client,
    config: &HarvestConfig,
    log: &StatusLog,
    key: &BillKey,
    harvest: &mut Harvest,
) -> Result<()> {
    let label = key.label();
    log.message(&format!("--> parsing {label}"))?;

    let response = match fetch_bill(client, &config.base_url, &config.api_key, key) {
        Ok(response) => response,
        Err(source) => {
            let err = HarvesterError::Fetch {
                bill: label.clone(),
                source,
            };
            tracing::warn!(error = %err, "Skipping bill");
            log.message(&format!("--> error, request failed: {err}"))?;
            harvest.skipped.push(label);
            return Ok(());
        }
    };

    if !response.is_ok() {
        tracing::warn!(bill = %label, status = %response.status, "API reported failure");
        log.message(&format!("--> error, got status: {}", response.status))?;
        harvest.skipped.push(label);
        return Ok(());
    }

    let bill = match response.results.as_slice() {
        [bill] => bill,
        results => {
            tracing::warn!(bill = %label, count = results.len(), "Unexpected result count");
            log.message(&format!(
                "--> error, expecting 1 result, got {}",
                results.len()
            ))?;
            harvest.skipped.push(label);
            return Ok(());
        }
    };

    // Parse both before touching either collection
    let general = parse_general(bill, config.introduced_date_mode)?;
    let actions = parse_actions(bill)?;

    harvest.bills.push(general);
    harvest.actions.extend(actions);
    Ok(())
}
