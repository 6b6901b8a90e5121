//! ott-errors CLI binary entry point.

use clap::Parser;
use ott_errors::cli::{run, Cli};
use ott_errors::config::MessageConfig;

fn main() {
    let cli = Cli::parse();
    let config = MessageConfig::from_env();

    match run(cli.command, &config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
