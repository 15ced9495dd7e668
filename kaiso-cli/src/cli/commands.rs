//! Argument parsing and command execution for the `kaiso` binary.

use std::io::{self, Read, Write};

use clap::{Parser, ValueEnum};
use kaiso_core::{
    ALL_CORES, ClusterSelectionMethod, DEFAULT_MIN_CLUSTER_SIZE, DataSourceError,
    DataSourceErrorCode, EmbeddingMatrix, Hdbscan, HdbscanBuilder, HdbscanError, Metric,
};
use thiserror::Error;
use tracing::{info, instrument};

use super::payload::{ClusterInput, ClusterOutput};

/// Name reported by the data source built from the stdin payload.
const SOURCE_NAME: &str = "stdin";

/// Command-line options parsed by [`clap`].
///
/// The payload itself is read from stdin, so there are no positional
/// arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "kaiso",
    version,
    about = "Cluster JSON embeddings read from stdin with HDBSCAN."
)]
pub struct Cli {
    /// Smallest group of points treated as a cluster.
    #[arg(long, default_value_t = DEFAULT_MIN_CLUSTER_SIZE)]
    pub min_cluster_size: usize,

    /// Neighbourhood size for core distances (defaults to --min-cluster-size).
    #[arg(long)]
    pub min_samples: Option<usize>,

    /// Distance metric: euclidean, cosine, manhattan or chebyshev.
    #[arg(long, default_value_t = Metric::Euclidean.as_str().to_owned())]
    pub metric: String,

    /// Worker threads for the engine; -1 uses every core, -2 all but one.
    #[arg(long, default_value_t = ALL_CORES, allow_negative_numbers = true)]
    pub core_dist_n_jobs: isize,

    /// How flat clusters are picked from the condensed tree.
    #[arg(long, value_enum, default_value_t = SelectionMethod::Eom)]
    pub cluster_selection_method: SelectionMethod,

    /// Allow the whole dataset to be returned as one cluster.
    #[arg(long)]
    pub allow_single_cluster: bool,

    /// Scale applied to raw distances before mutual reachability.
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f32,
}

/// Cluster selection strategies accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectionMethod {
    /// Excess of mass.
    Eom,
    /// Leaves of the condensed tree.
    Leaf,
}

impl From<SelectionMethod> for ClusterSelectionMethod {
    fn from(method: SelectionMethod) -> Self {
        match method {
            SelectionMethod::Eom => Self::Eom,
            SelectionMethod::Leaf => Self::Leaf,
        }
    }
}

impl Cli {
    /// Validates the options and freezes them into an engine.
    ///
    /// # Errors
    /// Returns [`CliError::Core`] when the metric is unknown or a numeric
    /// option is out of range.
    pub fn build_hdbscan(&self) -> Result<Hdbscan, CliError> {
        let metric: Metric = self.metric.parse()?;
        let hdbscan = HdbscanBuilder::new()
            .with_min_cluster_size(self.min_cluster_size)
            .with_min_samples(self.min_samples)
            .with_metric(metric)
            .with_core_dist_n_jobs(self.core_dist_n_jobs)
            .with_cluster_selection_method(self.cluster_selection_method.into())
            .with_allow_single_cluster(self.allow_single_cluster)
            .with_alpha(self.alpha)
            .build()?;
        Ok(hdbscan)
    }
}

/// Errors surfaced while executing the command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading stdin failed.
    #[error("failed to read input: {source}")]
    ReadInput {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Stdin did not hold a valid input record.
    #[error("failed to decode input JSON: {source}")]
    DecodeInput {
        /// Parser error, including line and column.
        #[source]
        source: serde_json::Error,
    },
    /// The payload paired a different number of ids and embeddings.
    #[error("payload has {ids} ids but {embeddings} embeddings")]
    LengthMismatch {
        /// Number of identifiers supplied.
        ids: usize,
        /// Number of embedding rows supplied.
        embeddings: usize,
    },
    /// Embedding rows failed validation.
    #[error("invalid embeddings: {0}")]
    InvalidData(#[from] DataSourceError),
    /// Engine configuration or execution failed.
    #[error(transparent)]
    Core(#[from] HdbscanError),
    /// The result record could not be written.
    #[error("failed to write output: {source}")]
    WriteOutput {
        /// Serialisation or I/O failure.
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ReadInput { .. } => "CLI_READ_INPUT",
            Self::DecodeInput { .. } => "CLI_DECODE_INPUT",
            Self::LengthMismatch { .. } => "CLI_LENGTH_MISMATCH",
            Self::InvalidData(_) => "CLI_INVALID_DATA",
            Self::Core(err) => err.code().as_str(),
            Self::WriteOutput { .. } => "CLI_WRITE_OUTPUT",
        }
    }

    /// Code of the underlying data source failure, when there is one.
    #[must_use]
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::InvalidData(err) => Some(err.code()),
            Self::Core(err) => err.data_source_code(),
            _ => None,
        }
    }
}

/// Clusters the payload read from `reader` using the options in `cli`.
///
/// Options are validated before any input is read.
///
/// # Errors
/// Returns [`CliError`] when the options are invalid, the payload cannot be
/// read or decoded, or clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use kaiso_cli::cli::{Cli, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli::try_parse_from(["kaiso", "--min-cluster-size", "2", "--min-samples", "1"])?;
/// let payload = r#"{
///     "ids": ["a", "b", "c", "d"],
///     "embeddings": [[1.0, 0.0], [0.99, 0.01], [0.0, 1.0], [0.01, 0.99]]
/// }"#;
/// let output = run_cli(&cli, payload.as_bytes())?;
/// assert_eq!(output.labels, vec![0, 0, 1, 1]);
/// assert_eq!(output.n_clusters, 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip_all)]
pub fn run_cli(cli: &Cli, reader: impl Read) -> Result<ClusterOutput, CliError> {
    let hdbscan = cli.build_hdbscan()?;
    let input = read_input(reader)?;
    cluster_input(&hdbscan, input)
}

/// Reads and decodes one input record.
///
/// # Errors
/// Returns [`CliError::ReadInput`] or [`CliError::DecodeInput`].
#[instrument(name = "cli.read_input", err, skip_all)]
pub fn read_input(mut reader: impl Read) -> Result<ClusterInput, CliError> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .map_err(|source| CliError::ReadInput { source })?;
    serde_json::from_str(&raw).map_err(|source| CliError::DecodeInput { source })
}

/// Normalises and clusters `input` with `hdbscan`.
///
/// An empty payload short-circuits to [`ClusterOutput::empty`].
///
/// # Errors
/// Returns [`CliError::LengthMismatch`], [`CliError::InvalidData`] or
/// [`CliError::Core`].
#[instrument(name = "cli.cluster", err, skip_all)]
pub fn cluster_input(hdbscan: &Hdbscan, input: ClusterInput) -> Result<ClusterOutput, CliError> {
    let ClusterInput { ids, embeddings } = input;
    if ids.len() != embeddings.len() {
        return Err(CliError::LengthMismatch {
            ids: ids.len(),
            embeddings: embeddings.len(),
        });
    }

    info!(vectors = ids.len(), "loaded {} vectors", ids.len());
    info!(
        min_cluster_size = hdbscan.min_cluster_size().get(),
        min_samples = hdbscan.min_samples().get(),
        metric = %hdbscan.metric(),
        core_dist_n_jobs = hdbscan.core_dist_n_jobs(),
        cluster_selection_method = %hdbscan.cluster_selection_method(),
        allow_single_cluster = hdbscan.allow_single_cluster(),
        alpha = hdbscan.alpha(),
        "hdbscan configuration"
    );

    if ids.is_empty() {
        info!("no vectors supplied, emitting empty result");
        return Ok(ClusterOutput::empty());
    }

    let mut matrix = EmbeddingMatrix::try_new(SOURCE_NAME, embeddings, hdbscan.metric())?;
    if hdbscan.metric().normalizes_input() {
        matrix.l2_normalize();
    }

    let result = hdbscan.fit_predict(&matrix)?;
    info!(
        clusters = result.cluster_count(),
        noise = result.noise_count(),
        "found {} clusters, {} noise points",
        result.cluster_count(),
        result.noise_count()
    );
    Ok(ClusterOutput::from_result(ids, &result))
}

/// Writes `output` to `writer` as one compact JSON line.
///
/// # Errors
/// Returns [`CliError::WriteOutput`] when serialisation or writing fails.
///
/// # Examples
/// ```
/// # use kaiso_cli::cli::{ClusterOutput, render_output};
/// let mut buffer = Vec::new();
/// render_output(&ClusterOutput::empty(), &mut buffer)?;
/// assert_eq!(buffer, b"{\"labels\":[],\"ids\":[],\"n_clusters\":0,\"n_noise\":0}\n");
/// # Ok::<(), kaiso_cli::cli::CliError>(())
/// ```
pub fn render_output(output: &ClusterOutput, mut writer: impl Write) -> Result<(), CliError> {
    serde_json::to_writer(&mut writer, output)
        .map_err(|source| CliError::WriteOutput { source })?;
    writer
        .write_all(b"\n")
        .map_err(|err| CliError::WriteOutput {
            source: serde_json::Error::io(err),
        })
}
