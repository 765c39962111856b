use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::cli::{execute, parse_line, Commands};
use crate::core::error::Result;
use crate::core::manager::Manager;

pub fn run(manager: &Manager) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with(manager, stdin.lock(), &mut stdout.lock())
}

pub fn run_with<R: BufRead, W: Write>(manager: &Manager, mut input: R, out: &mut W) -> Result<()> {
    let mut line = String::new();

    loop {
        line.clear();
        write!(out, "bitsflow> ")?;
        out.flush()?;

        let bytes_read = input.read_line(&mut line)?;

        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        debug!(line = trimmed, "repl command");

        match parse_line(trimmed) {
            Ok(Commands::Repl) => {
                writeln!(out, "Already in REPL.")?;
            }
            Ok(other) => {
                if let Err(err) = execute(manager, other, out) {
                    writeln!(out, "error: {err}")?;
                }
            }
            Err(err) => {
                writeln!(out, "{err}")?;
            }
        }
    }

    Ok(())
}
