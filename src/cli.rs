use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tracewatch - incremental EcmaScript 6 build tool
#[derive(Parser, Debug)]
#[command(name = "tracewatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile all eligible files once
    Build {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Watch for changes and recompile continuously
    Watch {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_defaults() {
        let cli = Cli::try_parse_from(["tracewatch", "build"]).unwrap();
        match cli.command {
            Commands::Build { project } => assert_eq!(project, PathBuf::from(".")),
            _ => panic!("expected build"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_watch_with_project_and_json() {
        let cli = Cli::try_parse_from(["tracewatch", "watch", "--project", "demo", "--json"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Watch { project } => assert_eq!(project, PathBuf::from("demo")),
            _ => panic!("expected watch"),
        }
    }
}
