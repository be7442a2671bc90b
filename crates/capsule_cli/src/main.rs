//! Command-line host for the capsule page core.
//!
//! # Responsibility
//! - Simulate one page load per invocation against a durable store.
//! - Map subcommands onto page events and print what the page shows.

use capsule_core::db::open_db;
use capsule_core::{
    core_version, default_document, default_log_level, init_logging, CapsulePage, EventOutcome,
    EventStatus, KeyValueStore, PageBindings, PageEvent, SqliteKeyValueStore, StoreConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "capsule", version, about = "Film capsule page core")]
struct Cli {
    /// Database file standing in for the browser profile.
    #[arg(long, default_value = "capsules.db")]
    db: PathBuf,

    /// Origin the stored keys are scoped to.
    #[arg(long, default_value = capsule_core::config::DEFAULT_ORIGIN)]
    origin: String,

    /// Per-origin storage quota in UTF-16 code units.
    #[arg(long)]
    quota: Option<usize>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seal a new capsule.
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        memory: String,
    },
    /// Remove every stored capsule.
    Clear,
    /// List stored capsules, newest first.
    List,
    /// Show or flip the page theme.
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// Print the rendered page markup.
    Render,
    /// Print storage diagnostics.
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("warning: {err}");
        }
    }

    match run(&cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, String> {
    let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
    let config = StoreConfig {
        origin: cli.origin.clone(),
        quota_units: cli.quota.or(StoreConfig::default().quota_units),
    };
    let store = SqliteKeyValueStore::try_new(&conn, &config).map_err(|err| err.to_string())?;
    let mut page = CapsulePage::open(&store, default_document(&PageBindings::default()));
    info!(
        "event=cli_run module=cli status=start version={} visits={}",
        core_version(),
        page.visit_count()
    );

    let code = match &cli.command {
        Command::Submit {
            title,
            year,
            memory,
        } => {
            page.fill_form(title, year, memory);
            let outcome = page.dispatch(PageEvent::SubmitCapsule);
            report(&page, &outcome)
        }
        Command::Clear => {
            let outcome = page.dispatch(PageEvent::ClearCapsules);
            report(&page, &outcome)
        }
        Command::List => {
            for (position, record) in page.records().iter().rev().enumerate() {
                println!(
                    "{}. {} ({}): {}",
                    position + 1,
                    record.title,
                    record.year,
                    record.memory
                );
            }
            ExitCode::SUCCESS
        }
        Command::Theme {
            action: ThemeAction::Show,
        } => {
            println!("theme={}", page.theme());
            ExitCode::SUCCESS
        }
        Command::Theme {
            action: ThemeAction::Toggle,
        } => {
            let outcome = page.dispatch(PageEvent::ToggleTheme);
            println!("theme={}", page.theme());
            report(&page, &outcome)
        }
        Command::Render => {
            println!("{}", page.document().to_html());
            ExitCode::SUCCESS
        }
        Command::Status => {
            let usage = store.usage().map_err(|err| err.to_string())?;
            println!("origin={}", store.origin());
            println!("visits={}", page.visit_count());
            println!("theme={}", page.theme());
            println!("records={}", page.records().len());
            println!("log_state={:?}", page.log_state());
            println!("usage_units={usage}");
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

fn report<R, S, Z>(page: &CapsulePage<R, S, Z>, outcome: &EventOutcome) -> ExitCode
where
    R: capsule_core::RecordLogRepository,
    S: capsule_core::SettingsRepository,
    Z: capsule_core::Sanitizer,
{
    if let Some(status) = page.status() {
        println!("{}", status.text);
    }
    match &outcome.status {
        EventStatus::Applied => ExitCode::SUCCESS,
        EventStatus::Rejected(err) => {
            eprintln!("rejected: {err}");
            ExitCode::from(2)
        }
        EventStatus::Degraded(err) => {
            eprintln!("not persisted: {err}");
            ExitCode::from(3)
        }
        EventStatus::Ignored => {
            eprintln!("ignored: page is missing the element for this action");
            ExitCode::from(4)
        }
    }
}
