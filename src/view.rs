use crate::enums::Orientation;
use crate::volume::Volume;
use crate::windowing::{WindowLevel, WindowLevelError};

/// Mutable state of one viewing session: the axis being browsed, the slice
/// index along it, and the current window/level.
///
/// The index is clamped on every mutation, so it is always valid for the
/// current axis; renders driven by a `ViewState` cannot go out of range.
/// The window is only replaced by valid values; a rejected update leaves the
/// previous window in effect.
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    orientation: Orientation,
    index: usize,
    window: WindowLevel,
}

impl ViewState {
    /// Start a session at the middle axial slice with the volume's default
    /// window.
    pub fn new(volume: &Volume) -> Self {
        Self {
            orientation: Orientation::Axial,
            index: volume.extent(Orientation::Axial) / 2,
            window: volume.default_window(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn window(&self) -> WindowLevel {
        self.window
    }

    /// Switch the viewing axis, clamping the index into the new axis's
    /// extent. Extents differ per axis, so an index valid on the previous
    /// axis may be clamped here.
    pub fn set_orientation(&mut self, orientation: Orientation, volume: &Volume) {
        self.orientation = orientation;
        self.index = Self::clamp(self.index, volume.extent(orientation));
    }

    /// Jump to a slice, clamping into the current axis's extent.
    pub fn set_index(&mut self, index: usize, volume: &Volume) {
        self.index = Self::clamp(index, volume.extent(self.orientation));
    }

    /// Advance one slice, saturating at the last index.
    pub fn step_forward(&mut self, volume: &Volume) {
        self.set_index(self.index + 1, volume);
    }

    /// Go back one slice, saturating at index 0.
    pub fn step_back(&mut self, volume: &Volume) {
        self.set_index(self.index.saturating_sub(1), volume);
    }

    /// Replace the window/level from two slider readings.
    ///
    /// # Errors
    ///
    /// An invalid width is rejected with [`WindowLevelError::InvalidWidth`]
    /// and the previous window stays in effect.
    pub fn set_window(&mut self, center: f32, width: f32) -> Result<(), WindowLevelError> {
        self.window = WindowLevel::new(center, width)?;
        Ok(())
    }

    fn clamp(index: usize, extent: usize) -> usize {
        index.min(extent.saturating_sub(1))
    }
}
