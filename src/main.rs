//! workflow-context: command-line access to Alfred workflow helpers
//!
//! Lets shell-based workflows resolve their storage folders, read and write
//! settings and files, and turn a JSON item list into feedback XML.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use workflow_context::config::FixedVersionProbe;
use workflow_context::Workflow;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "workflow-context")]
#[command(about = "Helpers for Alfred workflow scripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Bundle id to use instead of the one in info.plist
    #[arg(long, global = true)]
    bundle_id: Option<String>,

    /// Alfred major version to use instead of probing /Applications
    #[arg(long, global = true)]
    host_version: Option<u32>,

    /// Home directory to resolve storage folders under
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv); logs go to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bundle id, host version and storage locations
    Info,

    /// Resolve a file name against a base location
    Path {
        /// One of: cache, data, path, home
        base: String,

        /// File name relative to the base
        name: String,
    },

    /// Read a value from a plist settings file
    Get {
        /// Settings file (bare names are looked up in data, then cache)
        file: String,

        /// Key to read
        key: String,
    },

    /// Write one or more values to a plist settings file
    Set {
        /// Settings file (bare names are looked up in data, then cache)
        file: String,

        /// Values as KEY=VALUE
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Print a file, pretty-printing JSON content
    Read {
        /// File to read (bare names are looked up in data, then cache)
        file: String,
    },

    /// Write data to a file
    Write {
        /// File to write (bare names go to the data directory)
        file: String,

        /// Content to write
        data: String,

        /// Treat the data as JSON and store it compactly
        #[arg(long)]
        json: bool,

        /// Write to a temp file and rename it into place
        #[arg(short, long)]
        atomic: bool,

        /// Temp file suffix for atomic writes (default: atomictmp)
        #[arg(long, requires = "atomic")]
        suffix: Option<String>,
    },

    /// Run a Spotlight metadata search
    Search {
        /// Search query
        query: String,

        /// Pass the query to mdfind unquoted (for mdfind options)
        #[arg(long)]
        raw: bool,
    },

    /// Fetch a URL and print the response body
    Request {
        url: String,

        /// HTTP method (default: GET)
        #[arg(short = 'X', long)]
        method: Option<String>,

        /// Timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Extra header as 'Name: value'
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Render a JSON item list as Alfred feedback XML
    Feedback {
        /// Items as JSON (reads stdin if omitted)
        #[arg(long)]
        json: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(logging::level_from_occurrences(cli.verbose))?;

    let mut builder = Workflow::builder();
    if let Some(bundle_id) = cli.bundle_id {
        builder = builder.bundle_id(bundle_id);
    }
    if let Some(version) = cli.host_version {
        builder = builder.probe(FixedVersionProbe(Some(version)));
    }
    if let Some(home) = cli.home {
        builder = builder.home(home);
    }
    let workflow = builder
        .build()
        .context("Failed to initialize the workflow context")?;
    if workflow.is_placeholder_bundle() {
        eprintln!(
            "{} no bundle id found, using {}",
            "warning:".yellow(),
            workflow.bundle_id()
        );
    }

    match cli.command {
        Commands::Info => {
            println!("{}", commands::info::execute(&workflow));
        }

        Commands::Path { base, name } => {
            let path = workflow.resolve_path(&base, &name)?;
            println!("{}", path.display());
        }

        Commands::Get { file, key } => {
            println!("{}", commands::settings::get(&workflow, &file, &key)?);
        }

        Commands::Set { file, pairs } => {
            let count = commands::settings::set(&workflow, &file, &pairs)?;
            eprintln!("{} {} value(s)", "Set:".green(), count);
        }

        Commands::Read { file } => {
            println!("{}", commands::file::read(&workflow, &file)?);
        }

        Commands::Write {
            file,
            data,
            json,
            atomic,
            suffix,
        } => {
            let options = commands::file::WriteOptions {
                json,
                atomic,
                suffix: suffix.as_deref(),
            };
            let written = commands::file::write(&workflow, &file, &data, &options)?;
            eprintln!("{} {} bytes", "Wrote:".green(), written);
        }

        Commands::Search { query, raw } => {
            let output = commands::search::execute(&workflow, &query, raw);
            if !output.is_empty() {
                println!("{}", output);
            }
        }

        Commands::Request {
            url,
            method,
            timeout,
            headers,
            data,
        } => {
            let options = commands::request::options(method, timeout, &headers, data)?;
            print!("{}", commands::request::execute(&workflow, &url, &options)?);
        }

        Commands::Feedback { json } => {
            println!("{}", commands::feedback::execute(&workflow, json)?);
        }
    }

    Ok(())
}
