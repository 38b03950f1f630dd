//! Command-line driver for the resume vault core.
//!
//! # Responsibility
//! - Import saved extraction payloads into the local vault.
//! - Expose a few store operations (tags, job deletion, counts) for
//!   inspection without a UI.

use clap::{Parser, Subcommand};
use resume_core::{
    init_logging_from_config, open_vault, CoreConfig, ImportService, ImportSummary,
    JsonPayloadExtractor, SourceDocument, SqliteKeyValueStore, StoreRegistry,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "resume", version, about = "Reconcile extracted resume data into a local vault")]
struct Cli {
    /// SQLite vault file (overrides RESUME_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides RESUME_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile one or more extraction payload files, in order.
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List tag names containing QUERY (case-insensitive).
    SearchTags { query: String },
    /// Resolve a tag name to its id, creating it when missing.
    AddTag { name: String },
    /// Delete a job and its description lines.
    DeleteJob { id: String },
    /// Print record counts per collection.
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }
    init_logging_from_config(&config)?;

    let conn = open_vault(&config.db_path).map_err(|err| err.to_string())?;
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);

    match cli.command {
        Command::Import { files } => {
            let service = ImportService::new(JsonPayloadExtractor::new(config.max_document_bytes));

            // One entry per input file: the index of its readable document,
            // or the read error, so results print in input order.
            let mut listing: Vec<Result<usize, std::io::Error>> = Vec::with_capacity(files.len());
            let mut documents = Vec::with_capacity(files.len());
            for path in &files {
                match SourceDocument::from_path(path) {
                    Ok(document) => {
                        listing.push(Ok(documents.len()));
                        documents.push(document);
                    }
                    Err(err) => {
                        log::warn!(
                            "event=import_read module=cli status=error error_code=read_failed error={err}"
                        );
                        listing.push(Err(err));
                    }
                }
            }

            let summary = service.import_documents(&mut stores, &documents);
            let outcomes = outcomes_in_input_order(&listing, &summary);
            for (path, imported) in files.iter().zip(&outcomes) {
                let status = if *imported { "imported" } else { "failed" };
                println!("{status:<9} {}", path.display());
            }
            let failed = outcomes.iter().filter(|imported| !**imported).count();
            println!("{} imported, {} failed", outcomes.len() - failed, failed);
            Ok(if failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::SearchTags { query } => {
            for name in stores.tags.search(&query) {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::AddTag { name } => {
            let id = stores
                .tags
                .resolve_or_create(&name)
                .map_err(|err| err.to_string())?;
            println!("{id}");
            Ok(ExitCode::SUCCESS)
        }
        Command::DeleteJob { id } => {
            if stores.jobs.get(&id).is_none() {
                return Err(format!("job not found: {id}"));
            }
            let removed = stores.delete_job(&id).map_err(|err| err.to_string())?;
            println!("deleted job {id} and {removed} description(s)");
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let counts = stores.counts();
            println!("persons           {}", counts.persons);
            println!("jobs              {}", counts.jobs);
            println!("job descriptions  {}", counts.job_descriptions);
            println!("skills            {}", counts.skill_names);
            println!("skill types       {}", counts.skill_types);
            println!("education         {}", counts.education);
            println!("certifications    {}", counts.certifications);
            println!("volunteer         {}", counts.volunteers);
            println!("projects          {}", counts.projects);
            println!("summaries         {}", counts.summaries);
            println!("tags              {}", counts.tags);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Success flag per input file, in input order; unreadable files failed.
fn outcomes_in_input_order<E>(listing: &[Result<usize, E>], summary: &ImportSummary) -> Vec<bool> {
    listing
        .iter()
        .map(|entry| match entry {
            Ok(index) => summary
                .documents
                .get(*index)
                .is_some_and(|document| document.succeeded()),
            Err(_) => false,
        })
        .collect()
}
