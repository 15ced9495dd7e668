//! Distance primitives for built-in numeric metrics.
//!
//! Each metric exposes a validating entry point that rejects empty,
//! mismatched, or non-finite input, plus an unchecked kernel the clustering
//! pipeline uses once a matrix has been validated up front.

mod chebyshev;
mod cosine;
mod euclidean;
mod helpers;
mod manhattan;
mod metric;
mod types;

pub use self::chebyshev::chebyshev_distance;
pub use self::cosine::cosine_distance;
pub use self::euclidean::euclidean_distance;
pub use self::helpers::l2_norm;
pub use self::manhattan::manhattan_distance;
pub use self::metric::Metric;
pub use self::types::{Distance, DistanceError, VectorKind};

pub(crate) use self::helpers::saturate_to_f32;
