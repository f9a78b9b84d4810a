//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::accumulate::SnapshotPolicy;

/// Route metadata resolver CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Manifest file path (default: route.toml)
    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = "route.toml",
        value_hint = clap::ValueHint::FilePath
    )]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the route's metadata and print it as JSON
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Validate the manifest without resolving
    #[command(visible_alias = "c")]
    Check,
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Route param override, `name=value` (repeatable)
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Search param override, `name=value` (repeatable)
    #[arg(short = 's', long = "search", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub search_params: Vec<(String, String)>,

    /// Override the manifest's parent snapshot policy
    #[arg(long, value_enum)]
    pub snapshot: Option<SnapshotArg>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Filter out null/empty values from output
    #[arg(short = 'E', long)]
    pub filter_empty: bool,

    /// Filter output to specific fields (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotArg {
    Detached,
    Shared,
}

impl From<SnapshotArg> for SnapshotPolicy {
    fn from(arg: SnapshotArg) -> Self {
        match arg {
            SnapshotArg::Detached => Self::Detached,
            SnapshotArg::Shared => Self::Shared,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("missing name in `{raw}`"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_verbose_and_version() {
        let cli = Cli::try_parse_from(["route-meta", "-v", "check"]).unwrap();
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["route-meta", "-V"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "route-meta",
            "-C",
            "site/route.toml",
            "resolve",
            "--param",
            "slug=hello",
            "-p",
            "lang=en",
            "--snapshot",
            "shared",
            "--fields",
            "title,description",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("site/route.toml"));
        let Commands::Resolve { args } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(
            args.params,
            [
                ("slug".to_owned(), "hello".to_owned()),
                ("lang".to_owned(), "en".to_owned())
            ]
        );
        assert_eq!(args.snapshot, Some(SnapshotArg::Shared));
        assert_eq!(
            args.fields,
            Some(vec!["title".to_owned(), "description".to_owned()])
        );
        assert!(args.pretty);
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["route-meta", "check", "--verbose"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("route.toml"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_invalid_param() {
        assert!(Cli::try_parse_from(["route-meta", "resolve", "-p", "noequals"]).is_err());
        assert!(Cli::try_parse_from(["route-meta", "resolve", "-p", "=v"]).is_err());
    }

    #[test]
    fn test_param_value_may_contain_equals() {
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_owned(), "a=b".to_owned())
        );
    }
}
