//! JSON records exchanged over stdin and stdout.

use std::fmt;

use kaiso_core::ClusteringResult;
use serde::{Deserialize, Serialize};

/// Caller-supplied identifier, echoed back untouched.
///
/// Integers round-trip exactly, so `7` is never rewritten as `7.0`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Identifier {
    /// A JSON string identifier.
    Text(String),
    /// A JSON number identifier.
    Number(serde_json::Number),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Payload read from stdin.
///
/// # Examples
/// ```
/// use kaiso_cli::cli::ClusterInput;
///
/// let input: ClusterInput =
///     serde_json::from_str(r#"{"ids": ["a", 2], "embeddings": [[0.0], [1.0]]}"#)?;
/// assert_eq!(input.ids.len(), 2);
/// assert_eq!(input.embeddings[1], vec![1.0]);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ClusterInput {
    /// One identifier per embedding, in the same order.
    pub ids: Vec<Identifier>,
    /// Row-major embedding vectors.
    pub embeddings: Vec<Vec<f32>>,
}

/// Result record written to stdout. Field order is the wire order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterOutput {
    /// Cluster label per input row; `-1` marks noise.
    pub labels: Vec<i64>,
    /// Identifiers in input order.
    pub ids: Vec<Identifier>,
    /// Number of distinct non-noise labels.
    pub n_clusters: usize,
    /// Number of rows labelled as noise.
    pub n_noise: usize,
}

impl ClusterOutput {
    /// Output for a payload with no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            ids: Vec::new(),
            n_clusters: 0,
            n_noise: 0,
        }
    }

    /// Pairs `result` with the identifiers it was computed for.
    #[must_use]
    pub fn from_result(ids: Vec<Identifier>, result: &ClusteringResult) -> Self {
        Self {
            labels: result.labels(),
            ids,
            n_clusters: result.cluster_count(),
            n_noise: result.noise_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kaiso_core::ClusterId;
    use rstest::rstest;

    #[rstest]
    #[case::string(r#""doc-1""#, Identifier::from("doc-1"))]
    #[case::integer("42", Identifier::from(42))]
    fn identifiers_accept_strings_and_numbers(#[case] raw: &str, #[case] expected: Identifier) {
        let parsed: Identifier = serde_json::from_str(raw).expect("identifier must parse");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn identifiers_reject_other_json_types() {
        assert!(serde_json::from_str::<Identifier>("[1]").is_err());
        assert!(serde_json::from_str::<Identifier>("null").is_err());
    }

    #[test]
    fn numeric_identifiers_serialise_unchanged() {
        let parsed: Vec<Identifier> =
            serde_json::from_str("[3, -1, 2.5, \"x\"]").expect("identifiers must parse");
        let rendered = serde_json::to_string(&parsed).expect("identifiers must serialise");
        assert_eq!(rendered, r#"[3,-1,2.5,"x"]"#);
    }

    #[test]
    fn input_requires_both_keys() {
        let err = serde_json::from_str::<ClusterInput>(r#"{"ids": []}"#)
            .expect_err("missing embeddings must fail");
        assert!(err.to_string().contains("embeddings"));
    }

    #[test]
    fn output_keys_follow_wire_order() {
        let result = ClusteringResult::try_from_assignments(vec![Some(ClusterId::new(0)), None])
            .expect("assignments are contiguous");
        let output = ClusterOutput::from_result(vec!["a".into(), "b".into()], &result);
        let rendered = serde_json::to_string(&output).expect("output must serialise");
        assert_eq!(
            rendered,
            r#"{"labels":[0,-1],"ids":["a","b"],"n_clusters":1,"n_noise":1}"#
        );
    }

    #[test]
    fn empty_output_has_zero_counts() {
        let rendered =
            serde_json::to_string(&ClusterOutput::empty()).expect("output must serialise");
        assert_eq!(
            rendered,
            r#"{"labels":[],"ids":[],"n_clusters":0,"n_noise":0}"#
        );
    }
}
