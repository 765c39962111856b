use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use crate::core::error::{BitsError, Result};
use crate::core::formatter::{format_file_line, format_jobs_by_id, format_jobs_by_name};
use crate::core::job::{JobAttribute, JobId, JobPriority};
use crate::core::manager::Manager;
use crate::core::runner::{BitsConfig, DEFAULT_PROGRAM};
use crate::repl;
use crate::util::parse_script_file;

#[derive(Debug, Parser)]
#[command(name = "bitsflow", version, about = "Control Windows BITS transfer jobs through bitsadmin")]
pub struct Cli {
    /// Path to the bitsadmin executable
    #[arg(long, env = "BITSADMIN", default_value = DEFAULT_PROGRAM, global = true)]
    pub bitsadmin: PathBuf,

    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> BitsConfig {
        BitsConfig::new(&self.bitsadmin)
    }
}

/// Same subcommands, without the global options; used for REPL and batch lines.
#[derive(Debug, Parser)]
#[command(name = "bitsflow", no_binary_name = true)]
pub struct LineCli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List all jobs by name
    List {
        /// Key the listing by job id instead of name
        #[arg(long)]
        by_id: bool,
    },
    /// Create a new, suspended job
    Create { name: String },
    /// Print the full job report
    Info { id: JobId },
    /// List the files of a job
    Files { id: JobId },
    /// Add a file to a job
    AddFile {
        id: JobId,
        url: String,
        local_name: String,
    },
    Suspend { id: JobId },
    Resume { id: JobId },
    Cancel { id: JobId },
    Complete { id: JobId },
    /// Print the job's current state
    State { id: JobId },
    /// Read a single job attribute
    Get { id: JobId, attribute: JobAttribute },
    SetName { id: JobId, name: String },
    SetDescription { id: JobId, description: String },
    SetPriority { id: JobId, priority: JobPriority },
    /// Cancel every job
    Reset,
    /// Print the BITS version
    Version,
    /// Start an interactive session
    Repl,
    /// Run commands from a file, one per line
    Batch { file: PathBuf },
}

pub fn parse_line(line: &str) -> std::result::Result<Commands, String> {
    let tokens = shell_words::split(line).map_err(|err| err.to_string())?;
    let parsed = LineCli::try_parse_from(tokens).map_err(|err| err.to_string())?;
    Ok(parsed.command)
}

/// Top-level dispatch for the binary.
pub fn run(manager: &Manager, command: Commands) -> Result<()> {
    match command {
        Commands::Repl => repl::run(manager),
        Commands::Batch { file } => {
            let stdout = io::stdout();
            run_batch(manager, &file, &mut stdout.lock())
        }
        other => {
            let stdout = io::stdout();
            execute(manager, other, &mut stdout.lock())
        }
    }
}

pub fn run_batch<W: Write>(manager: &Manager, file: &std::path::Path, out: &mut W) -> Result<()> {
    let lines = parse_script_file(file)?;
    for line in lines {
        let command = parse_line(&line).map_err(|message| BitsError::InvalidCommand { message })?;
        execute(manager, command, out)?;
    }
    Ok(())
}

fn write_raw<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

pub fn execute<W: Write>(manager: &Manager, command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::List { by_id } => {
            let lines = if by_id {
                format_jobs_by_id(&manager.jobs_by_id()?)
            } else {
                format_jobs_by_name(&manager.jobs()?)
            };
            for line in lines {
                writeln!(out, "{line}")?;
            }
        }
        Commands::Create { name } => {
            let job = manager.create_job(&name)?;
            writeln!(out, "{{{}}}", job.id())?;
        }
        Commands::Info { id } => write_raw(out, &manager.job(id).info()?)?,
        Commands::Files { id } => {
            for file in manager.job(id).files()? {
                writeln!(out, "{}", format_file_line(&file))?;
            }
        }
        Commands::AddFile { id, url, local_name } => manager.job(id).add_file(&url, &local_name)?,
        Commands::Suspend { id } => write_raw(out, &manager.job(id).suspend()?)?,
        Commands::Resume { id } => write_raw(out, &manager.job(id).resume()?)?,
        Commands::Cancel { id } => write_raw(out, &manager.job(id).cancel()?)?,
        Commands::Complete { id } => write_raw(out, &manager.job(id).complete()?)?,
        Commands::State { id } => writeln!(out, "{}", manager.job(id).state()?)?,
        Commands::Get { id, attribute } => write_raw(out, &manager.job(id).get(attribute)?)?,
        Commands::SetName { id, name } => manager.job(id).set_name(&name)?,
        Commands::SetDescription { id, description } => {
            manager.job(id).set_description(&description)?
        }
        Commands::SetPriority { id, priority } => manager.job(id).set_priority(priority)?,
        Commands::Reset => write_raw(out, &manager.cancel_all_jobs()?)?,
        Commands::Version => match manager.version()? {
            Some(version) => writeln!(out, "{version}")?,
            None => writeln!(out, "unknown")?,
        },
        Commands::Repl | Commands::Batch { .. } => {
            return Err(BitsError::InvalidCommand {
                message: "repl and batch are only available from the command line".to_string(),
            });
        }
    }

    Ok(())
}
