use lidarbox_tensor::{Backend, Eager, Graph, NodeId};

use crate::error::CodecError;
use crate::util::{check_paired, split_axes, zip_axes};

fn inputs3(graph: &mut Graph) -> [NodeId; 3] {
    std::array::from_fn(|_| graph.input())
}

/// Log-anchor body shared by both execution backends.
///
/// Offsets are `[length, height, width]` triples; the horizontal center
/// deltas are normalized by the anchor's planar diagonal and the vertical
/// delta by the anchor height.
fn log_anchor_body<B: Backend>(
    backend: &mut B,
    gt_ctr: &[B::Value; 3],
    gt_offset: &[B::Value; 3],
    anchor_ctr: &[B::Value; 3],
    anchor_offset: &[B::Value; 3],
) -> ([B::Value; 3], [B::Value; 3]) {
    let [gt_x, gt_y, gt_z] = gt_ctr;
    let [anchor_x, anchor_y, anchor_z] = anchor_ctr;
    let [anchor_l, anchor_h, anchor_w] = anchor_offset;

    let anchor_d = backend.hypot(anchor_l, anchor_w);

    let encode_x = {
        let delta = backend.sub(gt_x, anchor_x);
        backend.div(&delta, &anchor_d)
    };
    let encode_y = {
        let delta = backend.sub(gt_y, anchor_y);
        backend.div(&delta, anchor_h)
    };
    let encode_z = {
        let delta = backend.sub(gt_z, anchor_z);
        backend.div(&delta, &anchor_d)
    };

    let offset = std::array::from_fn(|i| {
        let ratio = backend.div(&gt_offset[i], &anchor_offset[i]);
        backend.ln(&ratio)
    });

    ([encode_x, encode_y, encode_z], offset)
}

/// Dist-anchor body shared by both execution backends.
fn dist_anchor_body<B: Backend>(
    backend: &mut B,
    gt_ctr: &[B::Value; 3],
    gt_offset: &[B::Value; 3],
    anchor_ctr: &[B::Value; 3],
    anchor_offset: &[B::Value; 3],
) -> ([B::Value; 3], [B::Value; 3]) {
    let ctr = std::array::from_fn(|i| backend.sub(&gt_ctr[i], &anchor_ctr[i]));
    let offset = std::array::from_fn(|i| {
        let delta = backend.sub(&gt_offset[i], &anchor_offset[i]);
        backend.div(&delta, &anchor_offset[i])
    });
    (ctr, offset)
}

/// Anchor-free body shared by both execution backends.
///
/// The ground-truth center is assumed to be a base point; lifting it by
/// half the height gives the geometric center, which is then expressed
/// relative to the anchor center. Anchor geometry never enters.
fn dist_anchor_free_body<B: Backend>(
    backend: &mut B,
    gt_ctr: &[B::Value; 3],
    gt_offset: &[B::Value; 3],
    anchor_ctr: &[B::Value; 3],
) -> ([B::Value; 3], [B::Value; 3]) {
    let half_offset: [B::Value; 3] = std::array::from_fn(|i| backend.scale(&gt_offset[i], 0.5));

    let encode_x = backend.sub(&gt_ctr[0], &anchor_ctr[0]);
    let encode_y = {
        let centered = backend.sub(&gt_ctr[1], &half_offset[1]);
        backend.sub(&centered, &anchor_ctr[1])
    };
    let encode_z = backend.sub(&gt_ctr[2], &anchor_ctr[2]);

    ([encode_x, encode_y, encode_z], half_offset)
}

/// Encode ground-truth boxes against anchors in log space.
///
/// Horizontal center deltas are normalized by the anchor's planar diagonal
/// `sqrt(length^2 + width^2)`, the vertical delta by the anchor height, and
/// dimensions are encoded as the natural log of the ground-truth/anchor
/// ratio per component.
///
/// # Arguments
///
/// * `gt_ctr` - Ground-truth box centers as `[x, y, z]` triples.
/// * `gt_offset` - Ground-truth box dimensions as `[length, height, width]` triples.
/// * `anchor_ctr` - Anchor box centers.
/// * `anchor_offset` - Anchor box dimensions.
///
/// # Returns
///
/// Encoded centers and offsets, one triple per box.
///
/// # Errors
///
/// If the slices disagree in length.
///
/// Boxes with zero or negative anchor dimensions produce non-finite
/// outputs; inputs are expected to be validated upstream.
///
/// # Example
///
/// ```
/// use lidarbox_codec::encode_log_anchor;
///
/// let (ctr, offset) = encode_log_anchor(
///     &[[1.0, 2.0, 3.0]],
///     &[[2.0, 2.0, 2.0]],
///     &[[0.0, 0.0, 0.0]],
///     &[[2.0, 2.0, 2.0]],
/// )
/// .unwrap();
/// assert_eq!(ctr[0][1], 1.0);
/// assert_eq!(offset[0], [0.0, 0.0, 0.0]);
/// ```
pub fn encode_log_anchor(
    gt_ctr: &[[f64; 3]],
    gt_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
    anchor_offset: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    check_paired(gt_ctr, gt_offset)?;
    check_paired(gt_ctr, anchor_ctr)?;
    check_paired(gt_ctr, anchor_offset)?;

    let mut backend = Eager::new(gt_ctr.len());
    let (ctr, offset) = log_anchor_body(
        &mut backend,
        &split_axes(gt_ctr),
        &split_axes(gt_offset),
        &split_axes(anchor_ctr),
        &split_axes(anchor_offset),
    );
    Ok((
        zip_axes(&ctr[0], &ctr[1], &ctr[2]),
        zip_axes(&offset[0], &offset[1], &offset[2]),
    ))
}

/// Encode ground-truth boxes against anchors as plain distances.
///
/// Centers are encoded as the raw delta to the anchor center and
/// dimensions as the delta relative to the anchor dimension,
/// `(gt - anchor) / anchor`.
///
/// # Arguments
///
/// * `gt_ctr` - Ground-truth box centers as `[x, y, z]` triples.
/// * `gt_offset` - Ground-truth box dimensions as `[length, height, width]` triples.
/// * `anchor_ctr` - Anchor box centers.
/// * `anchor_offset` - Anchor box dimensions.
///
/// # Returns
///
/// Encoded centers and offsets, one triple per box.
///
/// # Errors
///
/// If the slices disagree in length.
///
/// Boxes with zero anchor dimensions produce non-finite outputs; inputs
/// are expected to be validated upstream.
///
/// # Example
///
/// ```
/// use lidarbox_codec::encode_dist_anchor;
///
/// let (ctr, offset) = encode_dist_anchor(
///     &[[1.0, 2.0, 3.0]],
///     &[[2.0, 4.0, 6.0]],
///     &[[0.0, 0.0, 0.0]],
///     &[[1.0, 2.0, 3.0]],
/// )
/// .unwrap();
/// assert_eq!(ctr[0], [1.0, 2.0, 3.0]);
/// assert_eq!(offset[0], [1.0, 1.0, 1.0]);
/// ```
pub fn encode_dist_anchor(
    gt_ctr: &[[f64; 3]],
    gt_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
    anchor_offset: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    check_paired(gt_ctr, gt_offset)?;
    check_paired(gt_ctr, anchor_ctr)?;
    check_paired(gt_ctr, anchor_offset)?;

    let mut backend = Eager::new(gt_ctr.len());
    let (ctr, offset) = dist_anchor_body(
        &mut backend,
        &split_axes(gt_ctr),
        &split_axes(gt_offset),
        &split_axes(anchor_ctr),
        &split_axes(anchor_offset),
    );
    Ok((
        zip_axes(&ctr[0], &ctr[1], &ctr[2]),
        zip_axes(&offset[0], &offset[1], &offset[2]),
    ))
}

/// Encode ground-truth boxes without anchor geometry.
///
/// The regression target for the dimensions is simply half the
/// ground-truth dimensions. The center target lifts the ground-truth base
/// point by half the height to reach the geometric center, then expresses
/// it relative to the anchor center.
///
/// `anchor_offset` is accepted for signature parity with the other codecs
/// but never used; only the anchor center participates.
///
/// # Arguments
///
/// * `gt_ctr` - Ground-truth box base points as `[x, y, z]` triples.
/// * `gt_offset` - Ground-truth box dimensions as `[length, height, width]` triples.
/// * `anchor_ctr` - Anchor centers.
/// * `anchor_offset` - Ignored.
///
/// # Returns
///
/// Recentered relative centers and half-dimensions, one triple per box.
///
/// # Errors
///
/// If the slices disagree in length.
///
/// # Example
///
/// ```
/// use lidarbox_codec::encode_dist_anchor_free;
///
/// let (ctr, half) = encode_dist_anchor_free(
///     &[[0.0, 0.0, 0.0]],
///     &[[2.0, 4.0, 6.0]],
///     &[[0.0, 1.0, 0.0]],
///     None,
/// )
/// .unwrap();
/// assert_eq!(ctr[0], [0.0, -3.0, 0.0]);
/// assert_eq!(half[0], [1.0, 2.0, 3.0]);
/// ```
pub fn encode_dist_anchor_free(
    gt_ctr: &[[f64; 3]],
    gt_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
    _anchor_offset: Option<&[[f64; 3]]>,
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    check_paired(gt_ctr, gt_offset)?;
    check_paired(gt_ctr, anchor_ctr)?;

    let mut backend = Eager::new(gt_ctr.len());
    let (ctr, half_offset) = dist_anchor_free_body(
        &mut backend,
        &split_axes(gt_ctr),
        &split_axes(gt_offset),
        &split_axes(anchor_ctr),
    );
    Ok((
        zip_axes(&ctr[0], &ctr[1], &ctr[2]),
        zip_axes(&half_offset[0], &half_offset[1], &half_offset[2]),
    ))
}

/// A box codec compiled into a deferred computation graph.
///
/// The graph is built once per encoding scheme and can be evaluated against
/// any number of box sets, producing the same numbers as the eager
/// functions.
///
/// Input columns are bound in a fixed order: ground-truth centers,
/// ground-truth offsets, anchor centers, anchor offsets (the anchor-free
/// graph stops after the anchor centers).
#[derive(Debug, Clone)]
pub struct BoxGraph {
    graph: Graph,
    ctr: [NodeId; 3],
    offset: [NodeId; 3],
}

impl BoxGraph {
    /// Compile the log-anchor encoder.
    pub fn log_anchor() -> Self {
        let mut graph = Graph::new();
        let gt_ctr = inputs3(&mut graph);
        let gt_offset = inputs3(&mut graph);
        let anchor_ctr = inputs3(&mut graph);
        let anchor_offset = inputs3(&mut graph);
        let (ctr, offset) =
            log_anchor_body(&mut graph, &gt_ctr, &gt_offset, &anchor_ctr, &anchor_offset);
        Self { graph, ctr, offset }
    }

    /// Compile the dist-anchor encoder.
    pub fn dist_anchor() -> Self {
        let mut graph = Graph::new();
        let gt_ctr = inputs3(&mut graph);
        let gt_offset = inputs3(&mut graph);
        let anchor_ctr = inputs3(&mut graph);
        let anchor_offset = inputs3(&mut graph);
        let (ctr, offset) =
            dist_anchor_body(&mut graph, &gt_ctr, &gt_offset, &anchor_ctr, &anchor_offset);
        Self { graph, ctr, offset }
    }

    /// Compile the anchor-free encoder.
    pub fn dist_anchor_free() -> Self {
        let mut graph = Graph::new();
        let gt_ctr = inputs3(&mut graph);
        let gt_offset = inputs3(&mut graph);
        let anchor_ctr = inputs3(&mut graph);
        let (ctr, offset) = dist_anchor_free_body(&mut graph, &gt_ctr, &gt_offset, &anchor_ctr);
        Self { graph, ctr, offset }
    }

    /// Evaluate the compiled encoder on a set of boxes.
    ///
    /// `anchor_offset` is ignored by the anchor-free graph, which never
    /// binds it.
    ///
    /// # Errors
    ///
    /// If the bound slices disagree in length.
    pub fn encode(
        &self,
        gt_ctr: &[[f64; 3]],
        gt_offset: &[[f64; 3]],
        anchor_ctr: &[[f64; 3]],
        anchor_offset: &[[f64; 3]],
    ) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
        check_paired(gt_ctr, gt_offset)?;
        check_paired(gt_ctr, anchor_ctr)?;
        if self.graph.num_inputs() == 12 {
            check_paired(gt_ctr, anchor_offset)?;
        }

        let columns = [
            split_axes(gt_ctr),
            split_axes(gt_offset),
            split_axes(anchor_ctr),
            split_axes(anchor_offset),
        ];
        let mut bindings: Vec<&[f64]> = Vec::with_capacity(12);
        for triple in &columns {
            for column in triple {
                bindings.push(column);
            }
        }
        bindings.truncate(self.graph.num_inputs());

        let out = self.graph.eval(
            &[
                self.ctr[0],
                self.ctr[1],
                self.ctr[2],
                self.offset[0],
                self.offset[1],
                self.offset[2],
            ],
            &bindings,
        )?;
        Ok((
            zip_axes(&out[0], &out[1], &out[2]),
            zip_axes(&out[3], &out[4], &out[5]),
        ))
    }
}
