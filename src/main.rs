use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use inistore::{FormatError, IoError, Store};
use terrors::OneOf;
use tracing_subscriber::EnvFilter;

/// Look values up in an INI file.
#[derive(Debug, Parser)]
#[command(name = "inistore", version)]
struct Cli {
    /// INI file to read.
    path: Utf8PathBuf,

    /// Keys to print. The whole file is printed when none are given.
    keys: Vec<String>,

    /// Update a value in memory before the lookups.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,

    /// Print the parsed file as JSON.
    #[arg(long, conflicts_with = "keys")]
    json: bool,
}

#[derive(Debug)]
struct UnknownKey(String);

impl std::fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot set unknown key: {}", self.0)
    }
}

#[derive(Debug)]
struct JsonFailed(serde_json::Error);

impl std::fmt::Display for JsonFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to encode json: {}", self.0)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("inistore: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested key was found.
fn run(cli: &Cli) -> Result<bool, OneOf<(IoError, FormatError, UnknownKey, JsonFailed)>> {
    let mut store = inistore::parse(&cli.path).map_err(OneOf::broaden)?;

    for (key, value) in &cli.assignments {
        if store.set(key, value.as_str()).is_none() {
            return Err(OneOf::new(UnknownKey(key.clone())));
        }
    }

    let found = if cli.json {
        let json = serde_json::to_string_pretty(&store).map_err(|e| OneOf::new(JsonFailed(e)))?;
        println!("{json}");
        true
    } else if cli.keys.is_empty() {
        print_store(&store);
        true
    } else {
        print_keys(&store, &cli.keys)
    };

    inistore::release(store);
    Ok(found)
}

fn print_store(store: &Store) {
    for (i, section) in store.sections().iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("[{}]", section.name());
        for entry in section.entries() {
            println!("{}={}", entry.key(), entry.value());
        }
    }
}

fn print_keys(store: &Store, keys: &[String]) -> bool {
    let mut all_found = true;
    for key in keys {
        match inistore::get(store, key) {
            Some(value) => println!("{key}: {value}"),
            None => {
                println!("{key}: <not found>");
                all_found = false;
            }
        }
    }
    all_found
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}
