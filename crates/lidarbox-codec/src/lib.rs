#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Heading-angle discretization into class bins.
pub mod angle;

/// Codec selection and dispatch.
pub mod config;

/// Decoding regression targets back into boxes.
pub mod decode;

/// Encoding ground-truth boxes into regression targets.
pub mod encode;

/// Error types for the box codecs.
pub mod error;

mod util;

pub use angle::{encode_angle_to_class, AngleGraph};
pub use config::{decode_boxes, encode_boxes, BoxEncoding, CodecConfig};
pub use decode::{
    decode_class_to_angle, decode_dist_anchor, decode_dist_anchor_free, decode_log_anchor,
};
pub use encode::{encode_dist_anchor, encode_dist_anchor_free, encode_log_anchor, BoxGraph};
pub use error::CodecError;
