//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "patient-search", version)]
#[command(about = "Search FHIR Patient resources by family name and time cached vs. uncached searches")]
pub struct Cli {
    /// File with one family name per line. Without it, a single family name
    /// is searched and the matching patients are listed. A blank value uses
    /// search.names_file (default: SampleClient-FamilyNames.txt, resolved
    /// against the working directory).
    pub names_file: Option<String>,

    /// FHIR server base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Family name to search when no names file is given
    #[arg(long)]
    pub family: Option<String>,

    /// Number of timed passes over the names file
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Let the final pass use the server cache too
    #[arg(long)]
    pub keep_cache_on_final: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Environment file to load instead of ./.env (must exist)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Log level for this tool's crates (RUST_LOG takes precedence)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

/// What a run does, decided from the arguments and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// List the patients matching one family name
    List { family: String },
    /// Time searches for every name in a file
    Timing { names_file: PathBuf },
}

impl Cli {
    /// A blank names file argument falls back to the configured names file.
    pub fn mode(&self, config: &Config) -> Mode {
        match self.names_file.as_deref().map(str::trim) {
            None => Mode::List {
                family: config.search.family_name.clone(),
            },
            Some("") => Mode::Timing {
                names_file: config.search.names_file.clone(),
            },
            Some(path) => Mode::Timing {
                names_file: PathBuf::from(path),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_for(args: &[&str]) -> Mode {
        let cli = Cli::parse_from(std::iter::once("patient-search").chain(args.iter().copied()));
        let config = Config::defaults().unwrap().with_cli_overrides(&cli);
        cli.mode(&config)
    }

    #[test]
    fn test_no_arguments_lists_default_family() {
        assert_eq!(
            mode_for(&[]),
            Mode::List {
                family: "SMITH".to_string()
            }
        );
    }

    #[test]
    fn test_family_flag() {
        assert_eq!(
            mode_for(&["--family", "Lee"]),
            Mode::List {
                family: "Lee".to_string()
            }
        );
    }

    #[test]
    fn test_names_file_is_trimmed() {
        assert_eq!(
            mode_for(&[" names.txt "]),
            Mode::Timing {
                names_file: PathBuf::from("names.txt")
            }
        );
    }

    #[test]
    fn test_blank_names_file_uses_default() {
        assert_eq!(
            mode_for(&["   "]),
            Mode::Timing {
                names_file: PathBuf::from("SampleClient-FamilyNames.txt")
            }
        );
    }
}
