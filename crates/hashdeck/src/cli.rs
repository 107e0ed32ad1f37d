use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::deck::DeckLink;

#[derive(Parser)]
#[command(name = "hashdeck")]
#[command(author, version, about)]
#[command(long_about = "A keyboard and touch driven slide viewer.\n\n\
    Every slide has an address, so a deck can be opened on any slide.\n\n\
    Examples:\n  \
    hashdeck talk.yaml                 Open a deck (fullscreen)\n  \
    hashdeck talk.yaml#slide-5         Open on the sixth slide\n  \
    hashdeck talk.md --windowed        Open a markdown deck in a window\n  \
    hashdeck check talk.yaml           Load a deck and report on it")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck to present, optionally followed by #slide-N
    pub file: Option<DeckLink>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Color theme (light or dark), overriding the deck and config
    #[arg(long, global = false, value_parser = ["light", "dark"])]
    pub theme: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a deck without opening a window and report on its slides
    Check {
        /// Deck file (.yaml manifest or .md)
        file: PathBuf,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (defaults.theme, defaults.windowed, loader.timeout_secs)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log level implied by -v / -q when RUST_LOG is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Check { file }) => crate::commands::check::run(&file, self.quiet),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("hashdeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(link) = self.file {
                    if !link.path.exists() {
                        anyhow::bail!("File not found: {}", link.path.display());
                    }
                    crate::app::run(link, self.windowed, self.theme)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deck_link_argument() {
        let cli = Cli::try_parse_from(["hashdeck", "talk.yaml#slide-4", "--windowed"]).unwrap();
        let link = cli.file.unwrap();
        assert_eq!(link.path, PathBuf::from("talk.yaml"));
        assert_eq!(link.fragment.as_deref(), Some("slide-4"));
        assert!(cli.windowed);
    }

    #[test]
    fn test_log_level_from_flags() {
        let cli = Cli::try_parse_from(["hashdeck", "version"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
        let cli = Cli::try_parse_from(["hashdeck", "-vv", "version"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
        let cli = Cli::try_parse_from(["hashdeck", "-v", "-q", "version"]).unwrap();
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["hashdeck", "talk.md", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
