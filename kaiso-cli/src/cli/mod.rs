//! Command-line interface for the `kaiso` binary.
//!
//! Reads one `{ids, embeddings}` record from stdin, clusters the embeddings
//! and returns the `{labels, ids, n_clusters, n_noise}` record for stdout.

mod commands;
mod payload;

pub use commands::{
    Cli, CliError, SelectionMethod, cluster_input, read_input, render_output, run_cli,
};
pub use payload::{ClusterInput, ClusterOutput, Identifier};

#[cfg(test)]
mod test_helpers;
