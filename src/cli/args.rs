//! Command-line argument parsing for vqesim
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// vqesim - Simulated VQE convergence runs in the terminal
#[derive(Parser, Debug)]
#[command(name = "vqesim")]
#[command(version)]
#[command(about = "Simulated VQE convergence visualizer", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except JSON output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute one or more simulated runs
    Run(RunArgs),

    /// Display the effective configuration
    Config {
        /// Write the defaults to the config path
        #[arg(long)]
        init: bool,
    },
}

/// Options for the `run` subcommand
#[derive(ClapArgs, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Number of consecutive runs
    #[arg(long, default_value_t = 1)]
    pub runs: u32,

    /// Seed for the noise generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable noise entirely (same as `--noise zero`)
    #[arg(long)]
    pub no_noise: bool,

    /// Named noise source: uniform, seeded or zero
    #[arg(long, value_name = "NAME")]
    pub noise: Option<String>,

    /// Print each finished run as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the tick period in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Run options, falling back to defaults when no subcommand was given
    pub fn run_args(&self) -> Option<RunArgs> {
        match &self.command {
            Some(Commands::Run(run)) => Some(run.clone()),
            Some(Commands::Config { .. }) => None,
            None => Some(RunArgs {
                runs: 1,
                ..RunArgs::default()
            }),
        }
    }

    /// Check argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.quiet && self.verbose > 0 {
            return Err("Cannot combine --quiet with --verbose.".to_string());
        }

        if let Some(Commands::Run(run)) = &self.command {
            if run.runs == 0 {
                return Err("--runs must be at least 1.".to_string());
            }
            if run.interval_ms == Some(0) {
                return Err("--interval-ms must be greater than 0.".to_string());
            }
            if run.no_noise && run.seed.is_some() {
                return Err("Cannot combine --seed with --no-noise.".to_string());
            }
            if run.no_noise && run.noise.is_some() {
                return Err("Cannot combine --noise with --no-noise.".to_string());
            }
        }

        Ok(())
    }
}

impl RunArgs {
    /// Chosen noise source name, if any
    pub fn noise_name(&self) -> Option<&str> {
        if self.no_noise {
            Some("zero")
        } else {
            self.noise.as_deref()
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Parse the config-file spelling
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "very_verbose" => Some(Verbosity::VeryVerbose),
            _ => None,
        }
    }

    /// Default tracing filter directive
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress bars
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show per-sample lines
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(parse(&["vqesim", "-q"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["vqesim"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["vqesim", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["vqesim", "-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_default_command_is_single_run() {
        let run = parse(&["vqesim"]).run_args().unwrap();
        assert_eq!(run.runs, 1);
        assert!(!run.json);
    }

    #[test]
    fn test_run_options() {
        let args = parse(&["vqesim", "run", "--runs", "3", "--seed", "7", "--json"]);
        let run = args.run_args().unwrap();
        assert_eq!(run.runs, 3);
        assert_eq!(run.seed, Some(7));
        assert!(run.json);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_noise_name() {
        let run = parse(&["vqesim", "run", "--noise", "seeded", "--seed", "4"])
            .run_args()
            .unwrap();
        assert_eq!(run.noise_name(), Some("seeded"));

        let run = parse(&["vqesim", "run", "--no-noise"]).run_args().unwrap();
        assert_eq!(run.noise_name(), Some("zero"));

        assert_eq!(parse(&["vqesim"]).run_args().unwrap().noise_name(), None);
    }

    #[test]
    fn test_config_command_has_no_run() {
        let args = parse(&["vqesim", "config", "--init"]);
        assert!(args.run_args().is_none());
        assert!(matches!(args.command, Some(Commands::Config { init: true })));
    }

    #[test]
    fn test_validate_rejects_bad_combinations() {
        assert!(parse(&["vqesim", "-q", "-v"]).validate().is_err());
        assert!(parse(&["vqesim", "run", "--runs", "0"]).validate().is_err());
        assert!(parse(&["vqesim", "run", "--interval-ms", "0"]).validate().is_err());
        assert!(parse(&["vqesim", "run", "--no-noise", "--seed", "1"]).validate().is_err());
        assert!(parse(&["vqesim", "run", "--no-noise", "--noise", "zero"]).validate().is_err());
    }

    #[test]
    fn test_verbosity_round_trip_names() {
        for verbosity in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::VeryVerbose,
        ] {
            assert_eq!(Verbosity::parse(verbosity.as_str()), Some(verbosity));
        }
        assert_eq!(Verbosity::parse("loud"), None);
    }
}
