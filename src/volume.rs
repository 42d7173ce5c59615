use crate::enums::Interpolation;
use crate::enums::Orientation;
use crate::interpolator::Interpolator;
use crate::windowing::WindowLevel;

use image::ImageBuffer;
use image::Luma;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::s;
use rayon::prelude::*;
use thiserror::Error;

/// An 8-bit grayscale image produced by [`Volume::render`].
pub type SliceImage = ImageBuffer<Luma<u8>, Vec<u8>>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Slice index {index} out of range for axis with extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },

    #[error("Slice dimensions do not form a valid image buffer")]
    ImageAssembly,
}

/// A 3D stack of slices from one acquisition folder.
///
/// Voxels are stored as (Z, Y, X) with Z as the stacking axis, already in
/// modality units (rescale slope/intercept applied at load time). The volume
/// is immutable for the lifetime of a viewing session; opening another
/// folder produces a new `Volume` rather than mutating this one.
pub struct Volume {
    data: Array3<f32>,
    spacing: Option<(f32, f32, f32)>,
    default_window: WindowLevel,
}

impl Volume {
    pub fn new(
        data: Array3<f32>,
        spacing: Option<(f32, f32, f32)>,
        default_window: WindowLevel,
    ) -> Self {
        Self {
            data,
            spacing,
            default_window,
        }
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Physical spacing (x, y, z) in millimeters, when the series carried it.
    pub fn spacing(&self) -> Option<(f32, f32, f32)> {
        self.spacing
    }

    /// Window/level seed for a fresh viewing session.
    pub fn default_window(&self) -> WindowLevel {
        self.default_window
    }

    /// Number of slices along the given axis.
    pub fn extent(&self, orientation: Orientation) -> usize {
        let dim = self.data.dim();
        match orientation {
            Orientation::Axial => dim.0,
            Orientation::Coronal => dim.1,
            Orientation::Sagittal => dim.2,
        }
    }

    /// Extract the 2D plane orthogonal to `orientation` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::IndexOutOfRange`] if `index` is not within
    /// `[0, extent)` for the chosen axis.
    pub fn slice_at(
        &self,
        orientation: Orientation,
        index: usize,
    ) -> Result<ArrayView2<'_, f32>, RenderError> {
        let extent = self.extent(orientation);
        if index >= extent {
            return Err(RenderError::IndexOutOfRange { index, extent });
        }
        Ok(match orientation {
            Orientation::Axial => self.data.slice(s![index, .., ..]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            Orientation::Sagittal => self.data.slice(s![.., .., index]),
        })
    }

    /// Render one slice as a displayable 8-bit image.
    ///
    /// This is the single entry point behind both on-screen display and file
    /// export: callers pass the same [`WindowLevel`] value to both paths, so
    /// a saved slice is pixel-identical to the displayed one at the same
    /// settings. Rendering is stateless; identical arguments produce
    /// byte-identical output.
    pub fn render(
        &self,
        orientation: Orientation,
        index: usize,
        window: WindowLevel,
        interpolation: Interpolation,
    ) -> Result<SliceImage, RenderError> {
        let plane = self.slice_at(orientation, index)?;

        match interpolation {
            Interpolation::None => Self::plane_to_image(&plane, window),
            Interpolation::Bilinear => {
                // Axial planes are already isotropic in-plane.
                if matches!(orientation, Orientation::Axial) {
                    return Self::plane_to_image(&plane, window);
                }
                match self.spacing {
                    Some(spacing) => {
                        let (width, height) = self.output_dimensions(spacing, orientation);
                        Self::resample_to_image(&plane, width, height, window)
                    }
                    None => Self::plane_to_image(&plane, window),
                }
            }
        }
    }

    // Always (width, height) - standard image convention.
    fn output_dimensions(
        &self,
        spacing: (f32, f32, f32),
        orientation: Orientation,
    ) -> (u32, u32) {
        let iso = Interpolator::isotropic_dimensions(spacing, self.data.dim());
        match orientation {
            // Looking down Z-axis: X is width, Y is height
            Orientation::Axial => (iso.2, iso.1),
            // Looking down Y-axis: X is width, Z is height
            Orientation::Coronal => (iso.2, iso.0),
            // Looking down X-axis: Y is width, Z is height
            Orientation::Sagittal => (iso.1, iso.0),
        }
    }

    fn plane_to_image(
        plane: &ArrayView2<'_, f32>,
        window: WindowLevel,
    ) -> Result<SliceImage, RenderError> {
        let (height, width) = plane.dim();
        let pixel_data: Vec<u8> = plane
            .into_par_iter()
            .map(|&value| window.apply(value))
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
            .ok_or(RenderError::ImageAssembly)
    }

    fn resample_to_image(
        plane: &ArrayView2<'_, f32>,
        width: u32,
        height: u32,
        window: WindowLevel,
    ) -> Result<SliceImage, RenderError> {
        let (plane_height, plane_width) = plane.dim();

        let pixel_data: Vec<u8> = (0..height)
            .into_par_iter()
            .flat_map(|y| {
                (0..width)
                    .map(|x| {
                        // Normalized coordinates with half-pixel offset.
                        let norm_x = (x as f32 + 0.5) / width as f32;
                        let norm_y = (y as f32 + 0.5) / height as f32;

                        let src_x = norm_x * plane_width as f32 - 0.5;
                        let src_y = norm_y * plane_height as f32 - 0.5;

                        let src_x = src_x.max(0.0).min((plane_width - 1) as f32);
                        let src_y = src_y.max(0.0).min((plane_height - 1) as f32);

                        let value = Interpolator::bilinear_interpolate(plane, src_y, src_x);
                        window.apply(value)
                    })
                    .collect::<Vec<u8>>()
            })
            .collect();

        ImageBuffer::from_raw(width, height, pixel_data).ok_or(RenderError::ImageAssembly)
    }
}
