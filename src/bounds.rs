use serde::Serialize;

use crate::error::{PlyError, Result};
use crate::options::ParseOptions;
use crate::vertex_batch::RawVertexBatch;

/// The affine map applied to every kept position:
/// `out = (file - center) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizeTransform {
    pub center: [f64; 3],
    pub scale: f64,
}

impl NormalizeTransform {
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        [
            (p[0] - self.center[0]) * self.scale,
            (p[1] - self.center[1]) * self.scale,
            (p[2] - self.center[2]) * self.scale,
        ]
    }

    /// Maps an output position back into file coordinates.
    pub fn invert(&self, p: [f64; 3]) -> [f64; 3] {
        [
            p[0] / self.scale + self.center[0],
            p[1] / self.scale + self.center[1],
            p[2] / self.scale + self.center[2],
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoints {
    /// Flat `x, y, z` triples.
    pub positions: Vec<f32>,
    /// Flat `r, g, b` triples, parallel to `positions`.
    pub colors: Vec<f32>,
    pub bbox_min: [f32; 3],
    pub bbox_max: [f32; 3],
    pub transform: NormalizeTransform,
    /// Vertices removed by the magnitude threshold.
    pub filtered: usize,
}

impl NormalizedPoints {
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn within(p: &[f64; 3], max_coord: f64) -> bool {
    p.iter().all(|c| c.abs() <= max_coord)
}

/// Drops vertices outside `+/-max_coord`, then centers the bounding box of
/// the rest on the origin and scales its largest axis to `target_span`.
///
/// A zero, subnormal or non-finite extent falls back to a scale of 1.
pub fn filter_and_normalize(batch: &RawVertexBatch, opts: &ParseOptions) -> Result<NormalizedPoints> {
    opts.validate()?;
    let keep: Vec<usize> = (0..batch.len())
        .filter(|&i| within(&batch.positions[i], opts.max_coord))
        .collect();
    let filtered = batch.len() - keep.len();
    if keep.is_empty() {
        return Err(PlyError::AllVerticesFiltered {
            dropped: filtered,
            max_coord: opts.max_coord,
        });
    }

    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for &i in &keep {
        let p = batch.positions[i];
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }

    let center = [
        min[0] + (max[0] - min[0]) / 2.0,
        min[1] + (max[1] - min[1]) / 2.0,
        min[2] + (max[2] - min[2]) / 2.0,
    ];
    let max_extent = (0..3).map(|a| max[a] - min[a]).fold(0.0f64, f64::max);
    let scale = opts.target_span / max_extent;
    let scale = if max_extent > 0.0 && max_extent.is_finite() && scale.is_finite() {
        scale
    } else {
        1.0
    };
    let transform = NormalizeTransform { center, scale };

    let mut positions = Vec::with_capacity(keep.len() * 3);
    let mut colors = Vec::with_capacity(keep.len() * 3);
    let mut bbox_min = [f32::INFINITY; 3];
    let mut bbox_max = [f32::NEG_INFINITY; 3];
    for &i in &keep {
        let p = transform.apply(batch.positions[i]).map(|c| c as f32);
        for axis in 0..3 {
            bbox_min[axis] = bbox_min[axis].min(p[axis]);
            bbox_max[axis] = bbox_max[axis].max(p[axis]);
        }
        positions.extend_from_slice(&p);
        colors.extend_from_slice(&batch.colors[i]);
    }

    log::debug!(
        "PLY: kept {} of {} vertices within +/-{}, center={:?}, scale={}",
        keep.len(),
        batch.len(),
        opts.max_coord,
        center,
        scale
    );

    Ok(NormalizedPoints {
        positions,
        colors,
        bbox_min,
        bbox_max,
        transform,
        filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_COLOR;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn batch(points: &[[f64; 3]]) -> RawVertexBatch {
        RawVertexBatch {
            positions: points.to_vec(),
            colors: points
                .iter()
                .enumerate()
                .map(|(i, _)| [i as f32 / 10.0, 0.0, 0.0])
                .collect(),
            ..RawVertexBatch::default()
        }
    }

    #[test]
    fn drops_points_beyond_threshold_with_their_colors() {
        let b = batch(&[[1000.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, -300.0, 0.0], [1.0, 1.0, 1.0]]);
        let out = filter_and_normalize(&b, &ParseOptions::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.filtered, 2);
        assert_eq!(out.colors, vec![0.1, 0.0, 0.0, 0.3, 0.0, 0.0]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let b = batch(&[[250.0, 0.0, 0.0], [-250.0, 0.0, 0.0]]);
        let out = filter_and_normalize(&b, &ParseOptions::default()).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn everything_filtered_is_an_error() {
        let b = batch(&[[251.0, 0.0, 0.0]]);
        let err = filter_and_normalize(&b, &ParseOptions::default()).unwrap_err();
        assert_eq!(
            err,
            PlyError::AllVerticesFiltered {
                dropped: 1,
                max_coord: 250.0
            }
        );
    }

    #[test]
    fn centers_and_scales_dominant_axis() {
        let b = batch(&[[0.0, 0.0, 0.0], [4.0, 1.0, 2.0]]);
        let out = filter_and_normalize(&b, &ParseOptions::default()).unwrap();
        assert_relative_eq!(out.transform.scale, 5.0);
        assert_eq!(out.transform.center, [2.0, 0.5, 1.0]);
        assert_eq!(out.positions, vec![-10.0, -2.5, -5.0, 10.0, 2.5, 5.0]);
        assert_eq!(out.bbox_min, [-10.0, -2.5, -5.0]);
        assert_eq!(out.bbox_max, [10.0, 2.5, 5.0]);
    }

    #[test]
    fn single_point_uses_unit_scale() {
        let b = batch(&[[3.0, -4.0, 5.0]]);
        let out = filter_and_normalize(&b, &ParseOptions::default()).unwrap();
        assert_eq!(out.transform.scale, 1.0);
        assert_eq!(out.positions, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn custom_options_apply() {
        let b = batch(&[[-5.0, 0.0, 0.0], [5.0, 0.0, 0.0], [20.0, 0.0, 0.0]]);
        let opts = ParseOptions {
            max_coord: 10.0,
            target_span: 2.0,
        };
        let out = filter_and_normalize(&b, &opts).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.positions, vec![-1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn transform_inverts() {
        let t = NormalizeTransform {
            center: [1.0, 2.0, 3.0],
            scale: 0.5,
        };
        let back = t.invert(t.apply([7.0, -1.0, 0.25]));
        assert_relative_eq!(back[0], 7.0);
        assert_relative_eq!(back[1], -1.0);
        assert_relative_eq!(back[2], 0.25);
    }

    #[test]
    fn colors_pass_through_unchanged() {
        let mut b = batch(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        b.colors = vec![DEFAULT_COLOR, [0.2, 0.4, 0.6]];
        let out = filter_and_normalize(&b, &ParseOptions::default()).unwrap();
        assert_eq!(out.colors, vec![0.7, 0.8, 1.0, 0.2, 0.4, 0.6]);
    }

    #[test]
    fn huge_coordinates_stay_finite() {
        let b = batch(&[[8.0e307, 0.0, 0.0], [8.9e307, 0.0, 0.0]]);
        let opts = ParseOptions {
            max_coord: f64::MAX / 2.0,
            ..ParseOptions::default()
        };
        let out = filter_and_normalize(&b, &opts).unwrap();
        assert!(out.transform.center[0].is_finite());
        assert!(out.positions.iter().all(|c| c.is_finite()));
        assert_relative_eq!(out.positions[0], -10.0, epsilon = 1e-4);
        assert_relative_eq!(out.positions[3], 10.0, epsilon = 1e-4);
    }

    #[test]
    fn widest_accepted_span_stays_finite() {
        let b = batch(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let opts = ParseOptions {
            target_span: 2.0 * f32::MAX as f64,
            ..ParseOptions::default()
        };
        let out = filter_and_normalize(&b, &opts).unwrap();
        assert!(out.positions.iter().all(|c| c.is_finite()));
        assert_eq!(out.positions[3], f32::MAX);
    }

    #[test]
    fn subnormal_extent_falls_back_to_unit_scale() {
        let b = batch(&[[0.0, 0.0, 0.0], [f64::from_bits(1), 0.0, 0.0]]);
        let out = filter_and_normalize(&b, &ParseOptions::default()).unwrap();
        assert_eq!(out.transform.scale, 1.0);
        assert!(out.positions.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn unvalidated_options_are_rejected() {
        let b = batch(&[[0.0, 0.0, 0.0]]);
        let opts = ParseOptions {
            target_span: 1e40,
            ..ParseOptions::default()
        };
        assert!(matches!(
            filter_and_normalize(&b, &opts),
            Err(PlyError::InvalidOptions(_))
        ));
    }

    proptest! {
        #[test]
        fn output_box_is_centered_with_target_span(
            pts in prop::collection::vec(
                (-200.0f64..200.0, -200.0f64..200.0, -200.0f64..200.0),
                2..100
            )
        ) {
            let points: Vec<[f64; 3]> = pts.iter().map(|p| [p.0, p.1, p.2]).collect();
            let extent = (0..3)
                .map(|a| {
                    let lo = points.iter().map(|p| p[a]).fold(f64::INFINITY, f64::min);
                    let hi = points.iter().map(|p| p[a]).fold(f64::NEG_INFINITY, f64::max);
                    hi - lo
                })
                .fold(0.0f64, f64::max);
            prop_assume!(extent > 1e-3);

            let out = filter_and_normalize(&batch(&points), &ParseOptions::default()).unwrap();
            prop_assert_eq!(out.len(), points.len());
            let spans: Vec<f32> = (0..3).map(|a| out.bbox_max[a] - out.bbox_min[a]).collect();
            let widest = spans.iter().cloned().fold(0.0f32, f32::max);
            prop_assert!((widest - 20.0).abs() < 1e-3, "widest span {}", widest);
            for a in 0..3 {
                let mid = (out.bbox_max[a] + out.bbox_min[a]) / 2.0;
                prop_assert!(mid.abs() < 1e-3, "axis {} midpoint {}", a, mid);
            }
        }
    }
}
