//! Extended Find - Command-line driver
//!
//! Opens a file as an in-memory document, counts the matches for a pattern
//! and steps through them, printing the counter the way a find panel shows it.

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use extended_find::config::{load_config, save_config_silent};
use extended_find::error::Result;
use extended_find::search::{
    QueryPatch, SearchHost, SearchSession, SharedQuery, SystemClock, TextDocument,
};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::thread;

/// Application name constant.
const APP_NAME: &str = "Extended Find";

#[derive(Parser, Debug)]
#[command(name = "extended-find")]
#[command(author, version, about = "Count and step through matches in a text file", long_about = None)]
struct Args {
    /// File to search
    file: PathBuf,

    /// Text (or regular expression with --regex) to find
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pattern: String,

    /// Treat the pattern as a regular expression
    #[arg(short, long)]
    regex: bool,

    /// Match case
    #[arg(short, long)]
    case: bool,

    /// Only match whole words
    #[arg(short, long)]
    word: bool,

    /// Number of find-next steps to print
    #[arg(short, long, default_value_t = 3)]
    steps: usize,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let text = fs::read_to_string(&args.file)?;
    info!(
        "Loaded {} ({} bytes), capacity {}",
        args.file.display(),
        text.len(),
        settings.capacity
    );

    // A single session; with sharing on it adopts the active query
    let active = SharedQuery::from_settings(&settings);
    let shared = SharedQuery::for_session(&settings, &active);
    let mut session = SearchSession::new(TextDocument::new(text), shared, settings, SystemClock);

    let patch = QueryPatch {
        search: Some(args.pattern),
        case_sensitive: Some(args.case),
        whole_word: Some(args.word),
        regexp: Some(args.regex),
        ..QueryPatch::default()
    };
    session.commit(&patch);

    // Let the debounce window elapse the way an idle event loop would
    while !session.tick() {
        match session.scheduler().time_until_fire() {
            Some(wait) => thread::sleep(wait),
            None => break,
        }
    }

    if let Err(e) = session.query().compile() {
        session.close();
        return Err(e);
    }

    println!("{}", session.counter_text());
    for _ in 0..args.steps {
        if !session.find_next() {
            break;
        }
        let selected = session
            .host()
            .selection()
            .map(|s| format!("{}..{}", s.from, s.to))
            .unwrap_or_default();
        println!("{}  [{}]", session.counter_text(), selected);
    }

    session.close();
    if session.settings().remember_last_query {
        save_config_silent(session.settings());
    }
    Ok(())
}
