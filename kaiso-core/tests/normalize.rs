//! Property tests for L2 row normalisation.

use kaiso_core::{DataSource, EmbeddingMatrix, Metric, NORM_FLOOR, l2_norm, l2_normalize};
use kaiso_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::prelude::*;

fn config() -> ProptestConfig {
    let profile = ProptestRunProfile::load(128, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

fn row() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0e3_f32..1.0e3, 1..16)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn rows_above_the_floor_become_unit_length(mut values in row()) {
        let before = l2_norm(&values);
        prop_assume!(before > 1.0e-3);
        l2_normalize(&mut values);
        prop_assert!((l2_norm(&values) - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn normalisation_preserves_direction(mut values in row()) {
        let original = values.clone();
        let norm = l2_norm(&original).max(NORM_FLOOR);
        l2_normalize(&mut values);
        for (scaled, raw) in values.iter().zip(&original) {
            prop_assert!((scaled * norm - raw).abs() <= 1.0e-3 * raw.abs().max(1.0));
        }
    }

    #[test]
    fn matrix_normalisation_matches_row_helper(
        rows in prop::collection::vec(prop::collection::vec(-50.0_f32..50.0, 3), 1..20),
    ) {
        let mut matrix = EmbeddingMatrix::try_new("prop", rows.clone(), Metric::Euclidean)
            .expect("generated rows are valid");
        matrix.l2_normalize();
        prop_assert_eq!(matrix.len(), rows.len());
        for (index, mut expected) in rows.into_iter().enumerate() {
            l2_normalize(&mut expected);
            prop_assert_eq!(matrix.row(index), Some(expected.as_slice()));
        }
    }
}

#[test]
fn zero_rows_stay_zero() {
    let mut values = vec![0.0_f32; 4];
    l2_normalize(&mut values);
    assert_eq!(values, vec![0.0; 4]);
}
