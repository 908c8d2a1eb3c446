//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// rkboot - Inspect boot configuration with environment and flag overrides
#[derive(Parser, Debug)]
#[command(name = "rkboot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Override inputs shared by every command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct OverrideArgs {
    /// Override assignments, e.g. "gin[0].port=8080,logger.level=debug"
    ///
    /// May be given more than once. Applied after environment overrides.
    #[arg(long = "rkset", value_name = "ASSIGNMENTS")]
    pub rkset: Vec<String>,

    /// Prefix of environment variables carrying overrides
    #[arg(long, value_name = "PREFIX", default_value = rk_override::DEFAULT_PREFIX, env = "RKBOOT_ENV_PREFIX")]
    pub env_prefix: String,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print a boot document with all overrides applied
    ///
    /// Examples:
    ///   rkboot render boot.yaml
    ///   rkboot render boot.yaml --rkset "gin[0].port=8080"
    ///   RK_LOGGER_LEVEL=debug rkboot render boot.yaml --json
    Render {
        /// Path to the boot document
        file: PathBuf,

        #[command(flatten)]
        overrides: OverrideArgs,

        /// Keep document and override keys as written instead of lower-casing them
        #[arg(long)]
        preserve_case: bool,

        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Show the overrides collected from the environment and flags
    Overrides {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_render_with_repeated_rkset() {
        let cli = Cli::try_parse_from([
            "rkboot",
            "render",
            "boot.yaml",
            "--rkset",
            "a=1",
            "--rkset=b[0]=2",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                file,
                overrides,
                preserve_case,
                json,
            } => {
                assert_eq!(file, PathBuf::from("boot.yaml"));
                assert_eq!(overrides.rkset, vec!["a=1", "b[0]=2"]);
                assert!(!preserve_case);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_overrides_custom_prefix() {
        let cli = Cli::try_parse_from(["rkboot", "-v", "overrides", "--env-prefix", "APP"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Overrides { overrides } => {
                assert_eq!(overrides.env_prefix, "APP");
                assert!(overrides.rkset.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn render_requires_a_file() {
        assert!(Cli::try_parse_from(["rkboot", "render"]).is_err());
    }
}
