use serde::{Deserialize, Serialize};

use crate::decode::{decode_dist_anchor, decode_dist_anchor_free, decode_log_anchor};
use crate::encode::{encode_dist_anchor, encode_dist_anchor_free, encode_log_anchor};
use crate::error::CodecError;

/// Available conventions for expressing a ground-truth box relative to an
/// anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxEncoding {
    /// Diagonal-normalized center deltas and log-ratio dimensions.
    LogAnchor,
    /// Raw center deltas and ratio-relative dimension deltas.
    DistAnchor,
    /// Recentered deltas and half-dimension targets; ignores anchor geometry.
    DistAnchorFree,
}

/// Structure to define the target codec parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Box encoding convention to use.
    pub encoding: BoxEncoding,
    /// Number of heading-angle class bins.
    pub angle_bins: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encoding: BoxEncoding::LogAnchor,
            angle_bins: 12,
        }
    }
}

/// Encode ground-truth boxes against anchors with the selected convention.
///
/// # Arguments
///
/// * `encoding` - Box encoding convention.
/// * `gt_ctr` - Ground-truth box centers as `[x, y, z]` triples.
/// * `gt_offset` - Ground-truth box dimensions as `[length, height, width]` triples.
/// * `anchor_ctr` - Anchor box centers.
/// * `anchor_offset` - Anchor box dimensions (ignored by the anchor-free convention).
///
/// # Returns
///
/// Encoded centers and offsets, one triple per box.
///
/// # Errors
///
/// If the slices disagree in length.
pub fn encode_boxes(
    encoding: BoxEncoding,
    gt_ctr: &[[f64; 3]],
    gt_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
    anchor_offset: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    log::debug!("Encoding {} boxes with {:?}", gt_ctr.len(), encoding);
    match encoding {
        BoxEncoding::LogAnchor => encode_log_anchor(gt_ctr, gt_offset, anchor_ctr, anchor_offset),
        BoxEncoding::DistAnchor => encode_dist_anchor(gt_ctr, gt_offset, anchor_ctr, anchor_offset),
        BoxEncoding::DistAnchorFree => {
            encode_dist_anchor_free(gt_ctr, gt_offset, anchor_ctr, Some(anchor_offset))
        }
    }
}

/// Decode regression targets back into boxes with the selected convention.
///
/// # Arguments
///
/// * `encoding` - Box encoding convention used for encoding.
/// * `encoded_ctr` - Encoded centers.
/// * `encoded_offset` - Encoded offsets.
/// * `anchor_ctr` - Anchor box centers.
/// * `anchor_offset` - Anchor box dimensions (ignored by the anchor-free convention).
///
/// # Returns
///
/// Box centers and dimensions, one triple per box.
///
/// # Errors
///
/// If the slices disagree in length.
pub fn decode_boxes(
    encoding: BoxEncoding,
    encoded_ctr: &[[f64; 3]],
    encoded_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
    anchor_offset: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    log::debug!("Decoding {} boxes with {:?}", encoded_ctr.len(), encoding);
    match encoding {
        BoxEncoding::LogAnchor => {
            decode_log_anchor(encoded_ctr, encoded_offset, anchor_ctr, anchor_offset)
        }
        BoxEncoding::DistAnchor => {
            decode_dist_anchor(encoded_ctr, encoded_offset, anchor_ctr, anchor_offset)
        }
        BoxEncoding::DistAnchorFree => {
            decode_dist_anchor_free(encoded_ctr, encoded_offset, anchor_ctr)
        }
    }
}
