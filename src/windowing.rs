use ndarray::{Array2, ArrayView2};
use thiserror::Error;

/// Fallback window center when the series carries no usable windowing
/// metadata. Together with [`DEFAULT_WIDTH`] this approximates a soft-tissue
/// window and guarantees a non-degenerate starting view.
pub const DEFAULT_CENTER: f32 = 30.0;
/// Fallback window width, see [`DEFAULT_CENTER`].
pub const DEFAULT_WIDTH: f32 = 400.0;

#[derive(Debug, Error)]
pub enum WindowLevelError {
    #[error("Window width must be positive, got {0}")]
    InvalidWidth(f32),
}

/// A window/level pair: the midpoint and span of the visible intensity range.
///
/// The pair travels as one value with named fields through every render and
/// export call, so two call sites cannot disagree on which number is the
/// center and which is the width. Construction goes through
/// [`WindowLevel::new`], which rejects non-positive widths; every existing
/// `WindowLevel` is therefore valid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowLevel {
    center: f32,
    width: f32,
}

impl WindowLevel {
    /// Create a window from its center and width.
    ///
    /// # Errors
    ///
    /// Returns [`WindowLevelError::InvalidWidth`] if `width` is not positive.
    pub fn new(center: f32, width: f32) -> Result<Self, WindowLevelError> {
        if width <= 0.0 {
            return Err(WindowLevelError::InvalidWidth(width));
        }
        Ok(Self { center, width })
    }

    pub fn center(&self) -> f32 {
        self.center
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Lower bound of the visible range, `center - width / 2`.
    pub fn lower(&self) -> f32 {
        self.center - self.width / 2.0
    }

    /// Upper bound of the visible range, `center + width / 2`.
    pub fn upper(&self) -> f32 {
        self.center + self.width / 2.0
    }

    /// Map a single intensity sample into the displayable 8-bit range.
    ///
    /// Samples at or below the lower bound map to 0, samples at or above the
    /// upper bound map to 255, and the range in between is scaled linearly.
    #[inline]
    pub fn apply(&self, value: f32) -> u8 {
        let lower = self.lower();
        if value <= lower {
            return 0;
        }
        if value >= self.upper() {
            return 255;
        }
        (255.0 * (value - lower) / self.width).round() as u8
    }
}

impl Default for WindowLevel {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            width: DEFAULT_WIDTH,
        }
    }
}

/// Derive a session's starting window from optional slice metadata.
///
/// The metadata values are used only when both are present and the width is
/// positive; otherwise the fixed [`DEFAULT_CENTER`]/[`DEFAULT_WIDTH`]
/// constants apply.
pub fn derive_defaults(center: Option<f32>, width: Option<f32>) -> WindowLevel {
    match (center, width) {
        (Some(center), Some(width)) if width > 0.0 => WindowLevel { center, width },
        _ => WindowLevel::default(),
    }
}

/// Apply the window/level transform to every sample of a 2D plane.
pub fn apply_window_level(plane: ArrayView2<'_, f32>, window: WindowLevel) -> Array2<u8> {
    plane.mapv(|value| window.apply(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn exact_at_range_bounds() {
        let window = WindowLevel::new(80.0, 160.0).unwrap();
        assert_eq!(window.apply(window.lower()), 0);
        assert_eq!(window.apply(window.upper()), 255);
        assert_eq!(window.apply(window.lower() - 500.0), 0);
        assert_eq!(window.apply(window.upper() + 500.0), 255);
    }

    #[test]
    fn midpoint_maps_to_128() {
        let window = WindowLevel::new(80.0, 160.0).unwrap();
        assert_eq!(window.apply(80.0), 128);
    }

    #[test]
    fn rejects_non_positive_width() {
        assert!(matches!(
            WindowLevel::new(0.0, 0.0),
            Err(WindowLevelError::InvalidWidth(_))
        ));
        assert!(matches!(
            WindowLevel::new(40.0, -1.0),
            Err(WindowLevelError::InvalidWidth(_))
        ));
    }

    #[test]
    fn derive_defaults_prefers_metadata() {
        let window = derive_defaults(Some(-600.0), Some(1500.0));
        assert_eq!(window.center(), -600.0);
        assert_eq!(window.width(), 1500.0);
    }

    #[test]
    fn derive_defaults_falls_back_without_metadata() {
        for (center, width) in [
            (None, None),
            (Some(50.0), None),
            (None, Some(350.0)),
            (Some(50.0), Some(0.0)),
            (Some(50.0), Some(-10.0)),
        ] {
            let window = derive_defaults(center, width);
            assert_eq!(window.center(), DEFAULT_CENTER);
            assert_eq!(window.width(), DEFAULT_WIDTH);
        }
    }

    #[test]
    fn windows_a_whole_plane() {
        let plane = array![[0.0_f32, 80.0], [160.0, -40.0]];
        let window = WindowLevel::new(80.0, 160.0).unwrap();
        let out = apply_window_level(plane.view(), window);
        assert_eq!(out, array![[0u8, 128], [255, 0]]);
    }

    proptest! {
        #[test]
        fn monotone_and_clamped(
            center in -2000.0_f32..2000.0,
            width in 1.0_f32..4000.0,
            a in -5000.0_f32..5000.0,
            b in -5000.0_f32..5000.0,
        ) {
            let window = WindowLevel::new(center, width).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(window.apply(lo) <= window.apply(hi));
        }

        #[test]
        fn construction_accepts_any_positive_width(
            center in -2000.0_f32..2000.0,
            width in 1.0_f32..4000.0,
        ) {
            let window = WindowLevel::new(center, width).unwrap();
            prop_assert_eq!(window.center(), center);
            prop_assert_eq!(window.width(), width);
        }
    }
}
