//! `givetrack` - CLI for recording donations and volunteer hours
//!
//! Each invocation opens the store, performs one command, and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use givetrack::cli::{Cli, Command, ConfigCommand, DonationCommand, VolunteerCommand};
use givetrack::store::{open_durable, SqliteStore};
use givetrack::{
    init_logging, BufferedView, Collection, Config, Donation, DonationTracker, Error,
    KeyValueStore, OutputFormat, TableEntry, VolunteerLog, VolunteerTracker,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Donation(cmd) => handle_donation(&config, cmd),
        Command::Volunteer(cmd) => handle_volunteer(&config, cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json).map(|()| ExitCode::SUCCESS),
        Command::Config(cmd) => handle_config(&config, cmd).map(|()| ExitCode::SUCCESS),
    }
}

fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    Ok(open_durable(&config.database_path())?)
}

/// Print the error region for a rejected form, or propagate anything else.
fn rejected_or(err: Error, view: &BufferedView) -> anyhow::Result<ExitCode> {
    if err.is_validation() {
        eprintln!("{}", view.error.trim_end());
        Ok(ExitCode::FAILURE)
    } else {
        Err(err.into())
    }
}

fn print_collection<S, R>(
    collection: &Collection<S, R>,
    view: &BufferedView,
    format: OutputFormat,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    R: TableEntry + Serialize,
{
    if format == OutputFormat::Json {
        let records = collection.load()?;
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", view.to_text(R::HEADERS, R::TOTAL_CAPTION, format));
    }
    Ok(())
}

fn handle_donation(config: &Config, cmd: DonationCommand) -> anyhow::Result<ExitCode> {
    let mut store = open_store(config)?;
    let mut tracker = DonationTracker::new(&mut store).with_policy(config.storage.on_malformed);
    let mut view = BufferedView::new();
    let format = config.display.default_format;

    match cmd {
        DonationCommand::Add(args) => {
            if let Err(err) = tracker.submit(&args.into(), &mut view) {
                return rejected_or(err, &view);
            }
            println!("{}", view.result);
            print_collection(tracker.donations(), &view, format)?;
        }
        DonationCommand::List(args) => {
            tracker.render(&mut view)?;
            print_collection(tracker.donations(), &view, args.format.unwrap_or(format))?;
        }
        DonationCommand::Delete { index } => {
            if tracker.delete(index, &mut view)?.is_none() {
                eprintln!("No donation at position {index}.");
                return Ok(ExitCode::FAILURE);
            }
            print_collection(tracker.donations(), &view, format)?;
        }
        DonationCommand::Clear(args) => {
            if !args.yes {
                println!("This will delete every recorded donation.");
                println!("Use --yes to confirm.");
                return Ok(ExitCode::FAILURE);
            }
            tracker.clear(&mut view)?;
            println!("All donations deleted.");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_volunteer(config: &Config, cmd: VolunteerCommand) -> anyhow::Result<ExitCode> {
    let mut store = open_store(config)?;
    let mut tracker = VolunteerTracker::new(&mut store).with_policy(config.storage.on_malformed);
    let mut view = BufferedView::new();
    let format = config.display.default_format;

    match cmd {
        VolunteerCommand::Add(args) => {
            let (form, star) = args.into_form();
            if let Some(star) = star {
                tracker.select_star(star);
            }
            match tracker.submit(&form, &mut view) {
                Ok(log) => println!("Volunteer log {} recorded.", log.id),
                Err(err) => return rejected_or(err, &view),
            }
            print_collection(tracker.logs(), &view, format)?;
        }
        VolunteerCommand::List(args) => {
            tracker.render(&mut view)?;
            print_collection(tracker.logs(), &view, args.format.unwrap_or(format))?;
        }
        VolunteerCommand::Delete { id } => {
            if tracker.delete(id, &mut view)? == 0 {
                eprintln!("No volunteer log with id {id}.");
                return Ok(ExitCode::FAILURE);
            }
            print_collection(tracker.logs(), &view, format)?;
        }
        VolunteerCommand::Clear(args) => {
            if !args.yes {
                println!("This will delete every recorded volunteer log.");
                println!("Use --yes to confirm.");
                return Ok(ExitCode::FAILURE);
            }
            tracker.clear(&mut view)?;
            println!("All volunteer logs deleted.");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Record count for a collection, or why it could not be read.
fn describe_count<R: givetrack::Record>(store: &mut SqliteStore, config: &Config) -> String {
    match Collection::<_, R>::new(store)
        .with_policy(config.storage.on_malformed)
        .load()
    {
        Ok(records) => records.len().to_string(),
        Err(err) => format!("unreadable ({err})"),
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let stats = store.stats()?;
    let donations = describe_count::<Donation>(&mut store, config);
    let volunteer_logs = describe_count::<VolunteerLog>(&mut store, config);

    if json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "database_bytes": stats.db_size_bytes,
            "keys": store.keys()?,
            "last_write": stats.last_write,
            "donations": donations,
            "volunteer_logs": volunteer_logs,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("givetrack status");
        println!("----------------");
        println!("Database:        {}", store.path().display());
        println!("Size (bytes):    {}", stats.db_size_bytes);
        println!(
            "Last write:      {}",
            stats.last_write.as_deref().unwrap_or("never")
        );
        println!("Donations:       {donations}");
        println!("Volunteer logs:  {volunteer_logs}");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:   {}", config.database_path().display());
                println!("  On malformed:    {}", config.storage.on_malformed);
                println!();
                println!("[Display]");
                println!("  Default format:  {:?}", config.display.default_format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
