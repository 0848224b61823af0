use std::f64::consts::TAU;

use lidarbox_tensor::{Backend, Eager, Graph, NodeId};

use crate::error::CodecError;

/// Width in radians of one class bin.
fn bin_width(num_bins: usize) -> f64 {
    TAU / num_bins as f64
}

/// Wrap angles into [0, 2*pi) and check the result.
///
/// The range check is a contract check: a violation means the wrap itself
/// misbehaved (e.g. on NaN input) and is a caller bug, not a recoverable
/// condition.
fn normalize_angles(angles: &[f64]) -> Vec<f64> {
    let wrapped: Vec<f64> = angles.iter().map(|a| a.rem_euclid(TAU)).collect();
    assert!(
        wrapped.iter().all(|&a| (0.0..=TAU).contains(&a)),
        "normalized angle out of [0, 2*pi]"
    );
    wrapped
}

/// Discretization body shared by both execution backends.
///
/// Expects angles already wrapped into [0, 2*pi). Bins are centered on
/// multiples of the bin width, so the input is shifted by half a bin and
/// re-wrapped before the floor. The residual parameterizes the position
/// within the bin, with the bin center at 0.5.
fn angle_body<B: Backend>(
    backend: &mut B,
    angle: &B::Value,
    num_bins: usize,
) -> (B::Value, B::Value) {
    let width = bin_width(num_bins);
    let half_bin = backend.splat(width / 2.0);
    let width_lane = backend.splat(width);

    let shifted = {
        let moved = backend.add(angle, &half_bin);
        backend.rem_euclid(&moved, TAU)
    };
    let class = {
        let quotient = backend.div(&shifted, &width_lane);
        backend.floor(&quotient)
    };
    let residual = {
        let base = backend.mul(&class, &width_lane);
        let leftover = backend.sub(&shifted, &base);
        backend.div(&leftover, &width_lane)
    };
    (class, residual)
}

/// Discretize heading angles into class bins with a normalized residual.
///
/// Angles may be in any range; they are wrapped into [0, 2*pi) first. Bin
/// boundaries sit halfway between multiples of the bin width, so e.g. with
/// four bins the angle 0 lands in the middle of class 0.
///
/// # Arguments
///
/// * `angles` - Heading angles in radians, one per box.
/// * `num_bins` - Number of angular class bins.
///
/// # Returns
///
/// Class ids in [0, num_bins) and residuals in [0, 1], one per angle.
///
/// # Errors
///
/// If `num_bins` is zero.
///
/// # Example
///
/// ```
/// use lidarbox_codec::encode_angle_to_class;
/// use std::f64::consts::PI;
///
/// let (class, residual) = encode_angle_to_class(&[0.0, PI], 4).unwrap();
/// assert_eq!(class, [0, 2]);
/// assert_eq!(residual, [0.5, 0.5]);
/// ```
pub fn encode_angle_to_class(
    angles: &[f64],
    num_bins: usize,
) -> Result<(Vec<i64>, Vec<f64>), CodecError> {
    if num_bins == 0 {
        return Err(CodecError::InvalidBinCount);
    }
    let wrapped = normalize_angles(angles);

    let mut backend = Eager::new(angles.len());
    let (class, residual) = angle_body(&mut backend, &wrapped, num_bins);
    Ok((class.into_iter().map(|c| c as i64).collect(), residual))
}

/// An angle discretizer compiled into a deferred computation graph.
///
/// The graph is built once per bin count and can be evaluated against any
/// number of angle columns, producing the same numbers as
/// [`encode_angle_to_class`].
#[derive(Debug, Clone)]
pub struct AngleGraph {
    graph: Graph,
    class: NodeId,
    residual: NodeId,
}

impl AngleGraph {
    /// Build the discretization graph for `num_bins` class bins.
    ///
    /// # Errors
    ///
    /// If `num_bins` is zero.
    pub fn new(num_bins: usize) -> Result<Self, CodecError> {
        if num_bins == 0 {
            return Err(CodecError::InvalidBinCount);
        }
        let mut graph = Graph::new();
        let angle = graph.input();
        let (class, residual) = angle_body(&mut graph, &angle, num_bins);
        Ok(Self {
            graph,
            class,
            residual,
        })
    }

    /// Evaluate the graph on a column of heading angles.
    ///
    /// # Errors
    ///
    /// If graph evaluation fails.
    pub fn encode(&self, angles: &[f64]) -> Result<(Vec<i64>, Vec<f64>), CodecError> {
        let wrapped = normalize_angles(angles);
        let mut out = self.graph.eval(&[self.class, self.residual], &[&wrapped])?;
        let residual = out.swap_remove(1);
        let class = out.swap_remove(0).into_iter().map(|c| c as i64).collect();
        Ok((class, residual))
    }
}
