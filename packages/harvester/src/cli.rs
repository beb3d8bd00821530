//! Command-line interface for the harvester.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{
    parse_session, validate_stamp, HarvestConfig, API_BASE_URL, API_KEY_ENV, DEFAULT_LOG_DIR,
    DEFAULT_OUTPUT_DIR,
};
use crate::enumerate::BillIdTable;
use crate::error::Result;
use crate::harvester::run_harvest;
use crate::types::{Chamber, IntroducedDateMode};

/// Congress Harvester - Download bill data from the ProPublica Congress API.
#[derive(Parser)]
#[command(name = "congress-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download all bills of a chamber and session and export them as CSV.
    Harvest {
        /// Chamber tag: hr (House) or s (Senate)
        chamber: String,

        /// Congress session number (e.g., 116)
        session: String,

        /// ProPublica API key
        #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
        api_key: String,

        /// API base URL
        #[arg(long, env = "PROPUBLICA_BASE_URL", default_value = API_BASE_URL)]
        base_url: String,

        /// Output directory for CSV files
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Directory for run logs
        #[arg(long, default_value = DEFAULT_LOG_DIR)]
        log_dir: PathBuf,

        /// Date stamp for output file names in YYYY-MM-DD format (default: today)
        #[arg(long)]
        stamp: Option<String>,

        /// YAML file with bill id ranges (default: built-in table)
        #[arg(long)]
        ids: Option<PathBuf>,

        /// Do not echo status lines; show a progress bar instead
        #[arg(short, long)]
        quiet: bool,

        /// Read introduced_date as %Y-%M-%d, as older datasets did
        #[arg(long)]
        legacy_introduced_date: bool,
    },

    /// Show the bill numbers that would be requested.
    Ids {
        /// Chamber tag: hr (House) or s (Senate)
        chamber: String,

        /// Congress session number (e.g., 116)
        session: String,

        /// YAML file with bill id ranges (default: built-in table)
        #[arg(long)]
        ids: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Harvest {
            chamber,
            session,
            api_key,
            base_url,
            output,
            log_dir,
            stamp,
            ids,
            quiet,
            legacy_introduced_date,
        } => {
            let mut config = HarvestConfig::new(chamber.parse()?, parse_session(&session)?, api_key)
                .with_base_url(base_url)
                .with_output_dir(output)
                .with_log_dir(log_dir)
                .with_loud(!quiet)
                .with_id_table(load_table(ids.as_deref())?);
            if let Some(stamp) = stamp {
                validate_stamp(&stamp)?;
                config = config.with_stamp(stamp);
            }
            if legacy_introduced_date {
                config = config.with_introduced_date_mode(IntroducedDateMode::Legacy);
            }
            harvest_command(&config)
        }
        Commands::Ids {
            chamber,
            session,
            ids,
        } => ids_command(
            chamber.parse()?,
            parse_session(&session)?,
            &load_table(ids.as_deref())?,
        ),
    }
}

fn load_table(path: Option<&std::path::Path>) -> Result<BillIdTable> {
    match path {
        Some(path) => BillIdTable::load(path),
        None => Ok(BillIdTable::builtin()),
    }
}

/// Execute the harvest command.
fn harvest_command(config: &HarvestConfig) -> Result<()> {
    println!(
        "{} {}{} into {}",
        style("Harvesting").bold(),
        style(config.chamber).cyan(),
        style(config.session).cyan(),
        style(config.output_dir.display()).green()
    );
    println!();

    let pb = if config.loud {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid template"),
        );
        pb
    };

    let report = run_harvest(config, &pb)?;

    println!();
    println!("  Requested: {}", report.requested);
    println!("  Fetched: {}", style(report.fetched).green());
    if report.skipped > 0 {
        println!("  Skipped: {}", style(report.skipped).yellow().bold());
    }
    println!("  Actions: {}", report.actions);
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        report.general_path.display()
    );
    println!("          {}", report.actions_path.display());
    println!("{} {}", style("Log:").bold(), report.log_path.display());

    Ok(())
}

/// Execute the ids command.
fn ids_command(chamber: Chamber, session: u32, table: &BillIdTable) -> Result<()> {
    let ids = table.enumerate(chamber, session)?;
    let (first, last) = (ids.first().copied(), ids.last().copied());

    println!(
        "{} bills for {}{}",
        style(ids.len()).bold(),
        style(chamber).cyan(),
        style(session).cyan()
    );
    if let (Some(first), Some(last)) = (first, last) {
        println!("  First: {chamber}{first}");
        println!("  Last: {chamber}{last}");
        let span = (last - first + 1) as usize;
        if span > ids.len() {
            println!("  Gaps: {}", style(span - ids.len()).yellow());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_harvest() {
        let cli = Cli::parse_from([
            "congress-harvester",
            "harvest",
            "s",
            "116",
            "--api-key",
            "secret",
        ]);

        let Commands::Harvest {
            chamber,
            session,
            api_key,
            output,
            stamp,
            quiet,
            legacy_introduced_date,
            ..
        } = cli.command
        else {
            panic!("expected harvest command");
        };
        assert_eq!(chamber, "s");
        assert_eq!(session, "116");
        assert_eq!(api_key, "secret");
        assert_eq!(output, PathBuf::from("data"));
        assert!(stamp.is_none());
        assert!(!quiet);
        assert!(!legacy_introduced_date);
    }

    #[test]
    fn test_cli_parse_harvest_with_options() {
        let cli = Cli::parse_from([
            "congress-harvester",
            "harvest",
            "hr",
            "116",
            "--api-key",
            "secret",
            "--stamp",
            "2019-10-09",
            "--output",
            "out",
            "--base-url",
            "http://127.0.0.1:9",
            "--quiet",
            "--legacy-introduced-date",
        ]);

        let Commands::Harvest {
            stamp,
            output,
            base_url,
            quiet,
            legacy_introduced_date,
            ..
        } = cli.command
        else {
            panic!("expected harvest command");
        };
        assert_eq!(stamp, Some("2019-10-09".to_string()));
        assert_eq!(output, PathBuf::from("out"));
        assert_eq!(base_url, "http://127.0.0.1:9");
        assert!(quiet);
        assert!(legacy_introduced_date);
    }

    #[test]
    fn test_cli_parse_ids() {
        let cli = Cli::parse_from(["congress-harvester", "ids", "hr", "116"]);

        let Commands::Ids {
            chamber,
            session,
            ids,
        } = cli.command
        else {
            panic!("expected ids command");
        };
        assert_eq!(chamber, "hr");
        assert_eq!(session, "116");
        assert!(ids.is_none());
    }
}
