//! Core distances: how far each point must reach to gather `min_samples`
//! neighbours.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{datasource::DataSource, error::DataSourceError};

/// Returns the distance from every point to its `min_samples`-th nearest
/// *other* point.
///
/// `min_samples` is clamped into `1..=len - 1`. Sources with fewer than two
/// points have no neighbours and report a core distance of `0.0`.
///
/// Runs on the current Rayon pool, one task per point.
#[instrument(
    name = "core.core_distances",
    err,
    skip(source),
    fields(data_source = %source.name(), items = source.len()),
)]
pub(crate) fn core_distances<D: DataSource + Sync>(
    source: &D,
    min_samples: usize,
) -> Result<Vec<f32>, DataSourceError> {
    let items = source.len();
    if items < 2 {
        return Ok(vec![0.0; items]);
    }
    let rank = min_samples.clamp(1, items - 1) - 1;
    let everyone: Vec<usize> = (0..items).collect();

    let cores = everyone
        .par_iter()
        .map(|&point| {
            let mut distances = source.batch_distances(point, &everyone)?;
            distances.swap_remove(point);
            let (_, kth, _) = distances.select_nth_unstable_by(rank, f32::total_cmp);
            Ok(*kth)
        })
        .collect::<Result<Vec<_>, DataSourceError>>()?;

    debug!(neighbour_rank = rank + 1, "core distances computed");
    Ok(cores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::line;
    use rstest::rstest;

    #[rstest]
    #[case::first_neighbour(1, vec![1.0, 1.0, 2.0, 3.0])]
    #[case::second_neighbour(2, vec![3.0, 2.0, 3.0, 5.0])]
    #[case::clamped_to_len(10, vec![6.0, 5.0, 3.0, 6.0])]
    #[case::zero_is_raised_to_one(0, vec![1.0, 1.0, 2.0, 3.0])]
    fn picks_the_kth_other_point(#[case] min_samples: usize, #[case] expected: Vec<f32>) {
        let source = line(&[0.0, 1.0, 3.0, 6.0]);
        let cores = core_distances(&source, min_samples).expect("valid source");
        assert_eq!(cores, expected);
    }

    #[test]
    fn duplicates_have_zero_core_distance() {
        let source = line(&[2.0, 2.0, 9.0]);
        let cores = core_distances(&source, 1).expect("valid source");
        assert_eq!(cores, vec![0.0, 0.0, 7.0]);
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::single(&[4.0])]
    fn tiny_sources_report_zero(#[case] points: &[f32]) {
        let cores = core_distances(&line(points), 3).expect("valid source");
        assert!(cores.iter().all(|&core| core == 0.0));
        assert_eq!(cores.len(), points.len());
    }
}
