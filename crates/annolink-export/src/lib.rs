//! annolink-export: Pure overlay serializers (sans-IO)
//!
//! Turns a frame's detections and accepted connections into output
//! formats. Currently supports SVG.

pub mod palette;
pub mod svg;

pub use palette::{LABEL_ALPHA, LabelPalette, Rgba, label_hue};
pub use svg::{Overlay, SvgMetadata, to_svg};
