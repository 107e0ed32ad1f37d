use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{Config, KEYS};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    println!();
    for line in describe(&config) {
        println!("  {line}");
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green().bold(),
        key,
        value,
        path.display()
    );
    Ok(())
}

/// One `key = value` line per known key, marking defaults.
fn describe(config: &Config) -> Vec<String> {
    KEYS.iter()
        .map(|key| {
            let (value, is_default) = match *key {
                "defaults.theme" => match config.theme() {
                    Some(theme) => (theme.to_string(), false),
                    None => ("light".to_string(), true),
                },
                "defaults.windowed" => (
                    config.windowed().to_string(),
                    config.defaults.as_ref().and_then(|d| d.windowed).is_none(),
                ),
                "loader.timeout_secs" => (
                    config.loader_timeout().as_secs().to_string(),
                    config.loader.as_ref().and_then(|l| l.timeout_secs).is_none(),
                ),
                _ => (String::new(), true),
            };
            if is_default {
                format!("{key} = {value} {}", "(default)".dimmed())
            } else {
                format!("{key} = {value}")
            }
        })
        .collect()
}
