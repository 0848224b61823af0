//! Inverse transforms used at inference time to turn regression outputs
//! back into boxes. Decoding always runs eagerly on materialized
//! predictions, so no graph variants exist here.

use std::f64::consts::TAU;

use crate::error::CodecError;
use crate::util::check_paired;

/// Reconstruct heading angles from class ids and residuals.
///
/// The inverse of [`crate::encode_angle_to_class`]: the bin center sits at
/// residual 0.5, and bins are centered on multiples of the bin width.
///
/// # Arguments
///
/// * `class` - Class ids, one per box.
/// * `residual` - Normalized residuals in [0, 1], one per box.
/// * `num_bins` - Number of angular class bins used for encoding.
///
/// # Returns
///
/// Heading angles wrapped into [0, 2*pi).
///
/// # Errors
///
/// If `num_bins` is zero or the slices disagree in length.
///
/// # Example
///
/// ```
/// use lidarbox_codec::decode_class_to_angle;
///
/// let angles = decode_class_to_angle(&[0], &[0.5], 4).unwrap();
/// assert_eq!(angles, [0.0]);
/// ```
pub fn decode_class_to_angle(
    class: &[i64],
    residual: &[f64],
    num_bins: usize,
) -> Result<Vec<f64>, CodecError> {
    if num_bins == 0 {
        return Err(CodecError::InvalidBinCount);
    }
    if class.len() != residual.len() {
        return Err(CodecError::ShapeMismatch(
            vec![class.len()],
            vec![residual.len()],
        ));
    }
    let width = TAU / num_bins as f64;
    Ok(class
        .iter()
        .zip(residual.iter())
        .map(|(&c, &r)| ((c as f64 + r) * width - width / 2.0).rem_euclid(TAU))
        .collect())
}

/// Reconstruct boxes from log-anchor targets.
///
/// The inverse of [`crate::encode_log_anchor`].
///
/// # Arguments
///
/// * `encoded_ctr` - Encoded centers.
/// * `encoded_offset` - Encoded log-ratio dimensions.
/// * `anchor_ctr` - Anchor box centers.
/// * `anchor_offset` - Anchor box dimensions as `[length, height, width]` triples.
///
/// # Returns
///
/// Ground-truth centers and dimensions, one triple per box.
///
/// # Errors
///
/// If the slices disagree in length.
pub fn decode_log_anchor(
    encoded_ctr: &[[f64; 3]],
    encoded_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
    anchor_offset: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    check_paired(encoded_ctr, encoded_offset)?;
    check_paired(encoded_ctr, anchor_ctr)?;
    check_paired(encoded_ctr, anchor_offset)?;

    let mut ctr = Vec::with_capacity(encoded_ctr.len());
    let mut offset = Vec::with_capacity(encoded_ctr.len());
    for i in 0..encoded_ctr.len() {
        let [enc_x, enc_y, enc_z] = encoded_ctr[i];
        let [enc_l, enc_h, enc_w] = encoded_offset[i];
        let [anchor_x, anchor_y, anchor_z] = anchor_ctr[i];
        let [anchor_l, anchor_h, anchor_w] = anchor_offset[i];

        let anchor_d = anchor_l.hypot(anchor_w);
        ctr.push([
            enc_x * anchor_d + anchor_x,
            enc_y * anchor_h + anchor_y,
            enc_z * anchor_d + anchor_z,
        ]);
        offset.push([
            anchor_l * enc_l.exp(),
            anchor_h * enc_h.exp(),
            anchor_w * enc_w.exp(),
        ]);
    }
    Ok((ctr, offset))
}

/// Reconstruct boxes from dist-anchor targets.
///
/// The inverse of [`crate::encode_dist_anchor`].
///
/// # Errors
///
/// If the slices disagree in length.
pub fn decode_dist_anchor(
    encoded_ctr: &[[f64; 3]],
    encoded_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
    anchor_offset: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    check_paired(encoded_ctr, encoded_offset)?;
    check_paired(encoded_ctr, anchor_ctr)?;
    check_paired(encoded_ctr, anchor_offset)?;

    let mut ctr = Vec::with_capacity(encoded_ctr.len());
    let mut offset = Vec::with_capacity(encoded_ctr.len());
    for i in 0..encoded_ctr.len() {
        ctr.push(std::array::from_fn(|k| {
            encoded_ctr[i][k] + anchor_ctr[i][k]
        }));
        offset.push(std::array::from_fn(|k| {
            anchor_offset[i][k] * (1.0 + encoded_offset[i][k])
        }));
    }
    Ok((ctr, offset))
}

/// Reconstruct boxes from anchor-free targets.
///
/// The inverse of [`crate::encode_dist_anchor_free`]: dimensions are twice
/// the half-dimension targets, and the base point is recovered by undoing
/// the recentering against the anchor center.
///
/// # Errors
///
/// If the slices disagree in length.
pub fn decode_dist_anchor_free(
    encoded_ctr: &[[f64; 3]],
    half_offset: &[[f64; 3]],
    anchor_ctr: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), CodecError> {
    check_paired(encoded_ctr, half_offset)?;
    check_paired(encoded_ctr, anchor_ctr)?;

    let mut ctr = Vec::with_capacity(encoded_ctr.len());
    let mut offset = Vec::with_capacity(encoded_ctr.len());
    for i in 0..encoded_ctr.len() {
        let translate = [0.0, half_offset[i][1], 0.0];
        ctr.push(std::array::from_fn(|k| {
            encoded_ctr[i][k] + anchor_ctr[i][k] + translate[k]
        }));
        offset.push(std::array::from_fn(|k| 2.0 * half_offset[i][k]));
    }
    Ok((ctr, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::encode_angle_to_class;
    use crate::encode::{encode_dist_anchor, encode_dist_anchor_free, encode_log_anchor};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f64::consts::TAU;

    fn random_boxes(rng: &mut StdRng, len: usize) -> (Vec<[f64; 3]>, Vec<[f64; 3]>) {
        let ctr = (0..len)
            .map(|_| std::array::from_fn(|_| rng.random_range(-50.0..50.0)))
            .collect();
        let offset = (0..len)
            .map(|_| std::array::from_fn(|_| rng.random_range(0.1..10.0)))
            .collect();
        (ctr, offset)
    }

    #[test]
    fn test_angle_roundtrip() -> Result<(), CodecError> {
        let angles = [0.0, 0.3, 1.234, 2.0, 5.0, 6.1];
        for num_bins in [1, 4, 7, 12] {
            let (class, residual) = encode_angle_to_class(&angles, num_bins)?;
            let decoded = decode_class_to_angle(&class, &residual, num_bins)?;
            for (angle, dec) in angles.iter().zip(decoded.iter()) {
                assert_relative_eq!(angle.rem_euclid(TAU), *dec, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_angle_reencode_is_stable() -> Result<(), CodecError> {
        let angles = [0.25, 1.1, 3.7, 5.9];
        let (class, residual) = encode_angle_to_class(&angles, 8)?;
        let decoded = decode_class_to_angle(&class, &residual, 8)?;
        let (class_again, residual_again) = encode_angle_to_class(&decoded, 8)?;
        assert_eq!(class_again, class);
        for (&r, &r_again) in residual.iter().zip(residual_again.iter()) {
            assert_relative_eq!(r, r_again, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_angle_decode_shape_mismatch() {
        assert_eq!(
            decode_class_to_angle(&[0, 1], &[0.5], 4),
            Err(CodecError::ShapeMismatch(vec![2], vec![1]))
        );
    }

    #[test]
    fn test_log_anchor_roundtrip() -> Result<(), CodecError> {
        let mut rng = StdRng::seed_from_u64(11);
        let (gt_ctr, gt_offset) = random_boxes(&mut rng, 32);
        let (anchor_ctr, anchor_offset) = random_boxes(&mut rng, 32);

        let (enc_ctr, enc_offset) =
            encode_log_anchor(&gt_ctr, &gt_offset, &anchor_ctr, &anchor_offset)?;
        let (ctr, offset) = decode_log_anchor(&enc_ctr, &enc_offset, &anchor_ctr, &anchor_offset)?;

        for i in 0..gt_ctr.len() {
            for k in 0..3 {
                assert_relative_eq!(ctr[i][k], gt_ctr[i][k], epsilon = 1e-9);
                assert_relative_eq!(offset[i][k], gt_offset[i][k], epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_dist_anchor_roundtrip() -> Result<(), CodecError> {
        let mut rng = StdRng::seed_from_u64(13);
        let (gt_ctr, gt_offset) = random_boxes(&mut rng, 32);
        let (anchor_ctr, anchor_offset) = random_boxes(&mut rng, 32);

        let (enc_ctr, enc_offset) =
            encode_dist_anchor(&gt_ctr, &gt_offset, &anchor_ctr, &anchor_offset)?;
        let (ctr, offset) = decode_dist_anchor(&enc_ctr, &enc_offset, &anchor_ctr, &anchor_offset)?;

        for i in 0..gt_ctr.len() {
            for k in 0..3 {
                assert_relative_eq!(ctr[i][k], gt_ctr[i][k], epsilon = 1e-9);
                assert_relative_eq!(offset[i][k], gt_offset[i][k], epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_dist_anchor_free_roundtrip() -> Result<(), CodecError> {
        let mut rng = StdRng::seed_from_u64(17);
        let (gt_ctr, gt_offset) = random_boxes(&mut rng, 32);
        let (anchor_ctr, _) = random_boxes(&mut rng, 32);

        let (enc_ctr, half) = encode_dist_anchor_free(&gt_ctr, &gt_offset, &anchor_ctr, None)?;
        let (ctr, offset) = decode_dist_anchor_free(&enc_ctr, &half, &anchor_ctr)?;

        for i in 0..gt_ctr.len() {
            for k in 0..3 {
                assert_relative_eq!(ctr[i][k], gt_ctr[i][k], epsilon = 1e-9);
                assert_relative_eq!(offset[i][k], gt_offset[i][k], epsilon = 1e-9);
            }
        }
        Ok(())
    }
}
