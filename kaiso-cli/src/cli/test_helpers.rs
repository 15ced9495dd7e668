//! Small helpers shared across CLI tests.

use clap::Parser;

use super::{Cli, CliError, ClusterOutput, run_cli};

/// The four-point example: two tight pairs on orthogonal axes.
pub(super) const FOUR_POINTS: &str = r#"{
    "ids": ["a", "b", "c", "d"],
    "embeddings": [[1.0, 0.0], [0.99, 0.01], [0.0, 1.0], [0.01, 0.99]]
}"#;

pub(super) fn parse_cli(args: &[&str]) -> Cli {
    let argv = std::iter::once("kaiso").chain(args.iter().copied());
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments {args:?} must parse: {err}"),
    }
}

pub(super) fn run_with(args: &[&str], payload: &str) -> Result<ClusterOutput, CliError> {
    run_cli(&parse_cli(args), payload.as_bytes())
}

pub(super) fn run_expecting_error(args: &[&str], payload: &str, panic_msg: &str) -> CliError {
    match run_with(args, payload) {
        Ok(output) => panic!("{panic_msg}: {output:?}"),
        Err(err) => err,
    }
}
