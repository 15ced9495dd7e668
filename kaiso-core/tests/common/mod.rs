use kaiso_core::{EmbeddingMatrix, Metric};

/// Two tight 2-D blobs of `per_blob` points plus one far-away outlier.
///
/// Points are laid out deterministically on small circles so no RNG is
/// needed; the outlier is always the last row.
#[must_use]
pub fn blobs_with_outlier(per_blob: usize) -> Vec<Vec<f32>> {
    let mut rows = Vec::with_capacity(2 * per_blob + 1);
    for centre in [(0.0_f32, 0.0_f32), (20.0, 20.0)] {
        for step in 0..per_blob {
            let angle = step as f32 * std::f32::consts::TAU / per_blob as f32;
            let radius = 0.2 + 0.05 * (step % 3) as f32;
            rows.push(vec![
                centre.0 + radius * angle.cos(),
                centre.1 + radius * angle.sin(),
            ]);
        }
    }
    rows.push(vec![-40.0, 55.0]);
    rows
}

#[must_use]
pub fn matrix(rows: Vec<Vec<f32>>, metric: Metric) -> EmbeddingMatrix {
    EmbeddingMatrix::try_new("fixture", rows, metric).expect("fixture rows are valid")
}
