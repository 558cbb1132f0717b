use std::io;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::logging::{LogConfig, LogFormat, init_logging};
use crate::policy::{PolicyArgs, run_policy};
use crate::reorder::{ReorderArgs, run_reorder};
use crate::replay::{ReplayArgs, run_replay};

#[derive(Debug, Parser)]
#[command(
    name = "sortkit",
    about = "Drag-and-drop list reordering: one-shot moves, pointer replays, policy checks",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Move one item next to another and print the new order.
    Reorder(ReorderArgs),

    /// Replay a JSON pointer script against a strip layout.
    Replay(ReplayArgs),

    /// Print or validate the effective list policy.
    Policy(PolicyArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Reorder(args) => run_reorder(args, &mut out),
        Commands::Replay(args) => run_replay(args, &mut out),
        Commands::Policy(args) => run_policy(args, &mut out),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use sortkit_core::edge::{Axis, Edge};

    use super::{Cli, Commands, run};
    use crate::error::EXIT_CONFIG;
    use crate::policy::PolicyArgs;

    #[test]
    fn parses_reorder_arguments() {
        let cli = Cli::try_parse_from([
            "sortkit", "-vv", "reorder", "--items", "A,B,C", "--source", "A", "--target", "C",
            "--edge", "right", "--axis", "horizontal",
        ])
        .expect("valid arguments");
        assert_eq!(cli.verbose, 2);
        let Commands::Reorder(args) = cli.command else {
            panic!("expected reorder");
        };
        assert_eq!(args.items, vec!["A", "B", "C"]);
        assert_eq!(args.edge, Some(Edge::Right));
        assert_eq!(args.axis, Axis::Horizontal);
    }

    #[test]
    fn unknown_edge_is_a_parse_error() {
        let err = Cli::try_parse_from([
            "sortkit", "reorder", "--items", "A,B", "--source", "A", "--target", "B", "--edge",
            "middle",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn replay_requires_a_script() {
        assert!(Cli::try_parse_from(["sortkit", "replay"]).is_err());
    }

    #[test]
    fn policy_command_dispatches_successfully() {
        let result = run(Cli {
            verbose: 0,
            log_format: crate::logging::LogFormat::Compact,
            command: Commands::Policy(PolicyArgs {
                config: None,
                check: true,
            }),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn missing_policy_file_is_config_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = run(Cli {
            verbose: 0,
            log_format: crate::logging::LogFormat::Pretty,
            command: Commands::Policy(PolicyArgs {
                config: Some(dir.path().join("absent.toml")),
                check: true,
            }),
        });
        let error = result.expect_err("missing file should fail");
        assert_eq!(error.exit_code(), EXIT_CONFIG);
    }
}
