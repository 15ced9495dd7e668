//! Error types for the kaiso core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::result::NonContiguousClusterIds;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DataSource`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested row that exceeded the source bounds.
        index: usize,
    },
    /// A row's length differed from the first row's length.
    #[error("row {row} has length {actual} but expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Dimension established by the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// A row contained NaN or an infinity.
    #[error("row {row} contains a non-finite value at position {column}")]
    NonFinite {
        /// Index of the offending row.
        row: usize,
        /// Position of the offending value within the row.
        column: usize,
    },
    /// Data source contained no rows.
    #[error("data source contains no rows")]
    EmptyData,
    /// Data source rows must have positive dimension.
    #[error("data source vectors must have positive dimension")]
    ZeroDimension,
}

define_error_codes! {
    /// Stable codes describing [`DataSourceError`] variants.
    enum DataSourceErrorCode for DataSourceError {
        /// Requested index was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATA_SOURCE_OUT_OF_BOUNDS",
        /// A row's length differed from the first row's length.
        RaggedRow => RaggedRow { .. } => "DATA_SOURCE_RAGGED_ROW",
        /// A row contained NaN or an infinity.
        NonFinite => NonFinite { .. } => "DATA_SOURCE_NON_FINITE",
        /// Data source contained no rows.
        EmptyData => EmptyData => "DATA_SOURCE_EMPTY",
        /// Data source rows must have positive dimension.
        ZeroDimension => ZeroDimension => "DATA_SOURCE_ZERO_DIMENSION",
    }
}

/// Error type produced when configuring or running [`crate::Hdbscan`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HdbscanError {
    /// Minimum cluster size must be at least two.
    #[error("min_cluster_size must be at least 2 (got {got})")]
    InvalidMinClusterSize {
        /// The invalid minimum cluster size supplied by the caller.
        got: usize,
    },
    /// Minimum samples must be at least one.
    #[error("min_samples must be at least 1 (got {got})")]
    InvalidMinSamples {
        /// The invalid minimum samples value supplied by the caller.
        got: usize,
    },
    /// Alpha must be a finite, strictly positive scale factor.
    #[error("alpha must be finite and greater than 0 (got {got})")]
    InvalidAlpha {
        /// The invalid alpha supplied by the caller.
        got: f32,
    },
    /// A job count of zero has no meaning.
    #[error("core_dist_n_jobs must be non-zero (use -1 for all cores)")]
    InvalidJobCount {
        /// The invalid job count supplied by the caller.
        got: isize,
    },
    /// The requested metric name is not supported.
    #[error("unknown metric `{name}`; expected one of: euclidean, cosine, manhattan, chebyshev")]
    UnknownMetric {
        /// Metric name as supplied by the caller.
        name: Arc<str>,
    },
    /// The supplied [`crate::DataSource`] contained no items.
    #[error("data source `{data_source}` contains no items")]
    EmptySource {
        /// Identifier for the empty data source.
        data_source: Arc<str>,
    },
    /// A [`crate::DataSource`] operation failed while running the algorithm.
    #[error("data source `{data_source}` failed: {error}")]
    DataSource {
        /// Identifier for the data source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying data source error bubbled up by the algorithm.
        error: DataSourceError,
    },
    /// The worker pool sized by `core_dist_n_jobs` could not be created.
    #[error("failed to build worker pool with {threads} threads: {message}")]
    ThreadPool {
        /// Requested worker count (`0` means "all cores").
        threads: usize,
        /// Message reported by the pool builder.
        message: Arc<str>,
    },
    /// Minimum spanning tree construction failed.
    #[error("minimum spanning tree failed ({code}): {message}")]
    MstFailure {
        /// Stable code of the underlying [`crate::MstError`].
        code: Arc<str>,
        /// Rendered message of the underlying error.
        message: Arc<str>,
    },
    /// Hierarchy extraction failed.
    #[error("hierarchy extraction failed ({code}): {message}")]
    HierarchyFailure {
        /// Stable code of the underlying [`crate::HierarchyError`].
        code: Arc<str>,
        /// Rendered message of the underlying error.
        message: Arc<str>,
    },
    /// Extracted labels violated the contiguity invariant.
    #[error("extracted labels are invalid: {source}")]
    InvalidLabels {
        /// Contiguity violation reported by [`crate::ClusteringResult`].
        #[from]
        source: NonContiguousClusterIds,
    },
}

define_error_codes! {
    /// Stable codes describing [`HdbscanError`] variants.
    enum HdbscanErrorCode for HdbscanError {
        /// Minimum cluster size must be at least two.
        InvalidMinClusterSize => InvalidMinClusterSize { .. } => "HDBSCAN_INVALID_MIN_CLUSTER_SIZE",
        /// Minimum samples must be at least one.
        InvalidMinSamples => InvalidMinSamples { .. } => "HDBSCAN_INVALID_MIN_SAMPLES",
        /// Alpha must be finite and positive.
        InvalidAlpha => InvalidAlpha { .. } => "HDBSCAN_INVALID_ALPHA",
        /// Job count must be non-zero.
        InvalidJobCount => InvalidJobCount { .. } => "HDBSCAN_INVALID_JOB_COUNT",
        /// The requested metric name is not supported.
        UnknownMetric => UnknownMetric { .. } => "HDBSCAN_UNKNOWN_METRIC",
        /// The supplied [`crate::DataSource`] contained no items.
        EmptySource => EmptySource { .. } => "HDBSCAN_EMPTY_SOURCE",
        /// A [`crate::DataSource`] operation failed while running the algorithm.
        DataSourceFailure => DataSource { .. } => "HDBSCAN_DATA_SOURCE_FAILURE",
        /// The worker pool could not be created.
        ThreadPoolFailure => ThreadPool { .. } => "HDBSCAN_THREAD_POOL_FAILURE",
        /// Minimum spanning tree construction failed.
        MstFailure => MstFailure { .. } => "HDBSCAN_MST_FAILURE",
        /// Hierarchy extraction failed.
        HierarchyFailure => HierarchyFailure { .. } => "HDBSCAN_HIERARCHY_FAILURE",
        /// Extracted labels violated the contiguity invariant.
        InvalidLabels => InvalidLabels { .. } => "HDBSCAN_INVALID_LABELS",
    }
}

impl HdbscanError {
    /// Retrieve the inner [`DataSourceErrorCode`] when the error originated in a [`crate::DataSource`].
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::DataSource { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, HdbscanError>;
