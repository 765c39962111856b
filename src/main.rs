use clap::Parser;

use bitsflow::cli::{self, Cli};
use bitsflow::Manager;

fn main() {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let manager = Manager::with_config(args.config());

    if let Err(err) = cli::run(&manager, args.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
