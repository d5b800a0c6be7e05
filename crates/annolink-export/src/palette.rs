//! Per-label colors for detection boxes.
//!
//! Each distinct label gets one color for the lifetime of the palette.
//! Hues are derived from a keyed hash of the label, so the same label is
//! drawn in the same color across runs and machines.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hasher;

use siphasher::sip::SipHasher13;

/// Opacity applied to every palette color.
pub const LABEL_ALPHA: f32 = 0.8;

/// An RGBA color with 8-bit channels and a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Color used for detections without a label.
    pub const UNLABELED: Self = Self {
        r: 128,
        g: 128,
        b: 128,
        a: LABEL_ALPHA,
    };

    /// Fully saturated, full-brightness color at `hue` degrees.
    #[must_use]
    pub fn from_hue(hue: f64, a: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let x = 1.0 - (h.rem_euclid(2.0) - 1.0).abs();
        let (r, g, b) = match h {
            h if h < 1.0 => (1.0, x, 0.0),
            h if h < 2.0 => (x, 1.0, 0.0),
            h if h < 3.0 => (0.0, 1.0, x),
            h if h < 4.0 => (0.0, x, 1.0),
            h if h < 5.0 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a,
        }
    }

    /// CSS `rgba(...)` notation.
    #[must_use]
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Hue in degrees for `label`, stable for a given label.
#[must_use]
pub fn label_hue(label: &str) -> f64 {
    let mut hasher = SipHasher13::new();
    hasher.write(label.as_bytes());
    let tenths = u16::try_from(hasher.finish() % 3600).unwrap_or(0);
    f64::from(tenths) / 10.0
}

/// Cache of label colors for one session.
#[derive(Debug, Clone, Default)]
pub struct LabelPalette {
    colors: HashMap<String, Rgba>,
}

impl LabelPalette {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `label`, assigning one on first use.
    pub fn color(&mut self, label: Option<&str>) -> Rgba {
        let Some(label) = label else {
            return Rgba::UNLABELED;
        };
        *self
            .colors
            .entry(label.to_owned())
            .or_insert_with(|| Rgba::from_hue(label_hue(label), LABEL_ALPHA))
    }

    /// Color already assigned to `label`, if any.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<Rgba> {
        self.colors.get(label).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Forget every assigned color.
    pub fn clear(&mut self) {
        self.colors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        let red = Rgba::from_hue(0.0, 1.0);
        assert_eq!((red.r, red.g, red.b), (255, 0, 0));
        let green = Rgba::from_hue(120.0, 1.0);
        assert_eq!((green.r, green.g, green.b), (0, 255, 0));
        let blue = Rgba::from_hue(240.0, 1.0);
        assert_eq!((blue.r, blue.g, blue.b), (0, 0, 255));
        let wrapped = Rgba::from_hue(360.0, 1.0);
        assert_eq!(wrapped, red);
    }

    #[test]
    fn css_notation() {
        let color = Rgba::from_hue(60.0, LABEL_ALPHA);
        assert_eq!(color.to_css(), "rgba(255, 255, 0, 0.8)");
    }

    #[test]
    fn same_label_same_color() {
        let mut palette = LabelPalette::new();
        let first = palette.color(Some("screw"));
        let second = palette.color(Some("screw"));
        assert_eq!(first, second);
        assert_eq!(palette.len(), 1);

        let mut other = LabelPalette::new();
        assert_eq!(other.color(Some("screw")), first);
    }

    #[test]
    fn unlabeled_is_not_cached() {
        let mut palette = LabelPalette::new();
        assert_eq!(palette.color(None), Rgba::UNLABELED);
        assert!(palette.is_empty());
    }

    #[test]
    fn clear_forgets_labels() {
        let mut palette = LabelPalette::new();
        palette.color(Some("washer"));
        assert!(palette.get("washer").is_some());
        palette.clear();
        assert!(palette.get("washer").is_none());
    }

    #[test]
    fn hue_in_range() {
        for label in ["", "nail", "bolt", "a much longer label with spaces"] {
            let hue = label_hue(label);
            assert!((0.0..360.0).contains(&hue));
        }
    }
}
