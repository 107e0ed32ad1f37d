mod address;
mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod document;
mod input;
mod loader;
mod navigator;
mod notes;
mod parser;
mod render;
mod theme;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(&cli);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

/// RUST_LOG wins; otherwise -v / -q pick the level.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let others = if cli.quiet { "error" } else { "warn" };
        EnvFilter::new(format!("{others},hashdeck={}", cli.log_level()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();
}
