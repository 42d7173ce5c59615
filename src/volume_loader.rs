use crate::volume::Volume;
use crate::windowing::{self, WindowLevel};

use dicom::{
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use ndarray::{Array2, Array3, s};
use std::{fs, path::Path};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No files with readable pixel data found")]
    NoValidFiles,

    #[error("Slices have mismatched in-plane dimensions")]
    InconsistentGeometry,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from DICOM objects already in memory.
    ///
    /// Objects without decodable pixel data are skipped. Slices are sorted
    /// ascending by the z component of `ImagePositionPatient` (falling back
    /// per record to `InstanceNumber`); if any surviving record lacks both,
    /// the given order is kept unchanged. The rescale slope/intercept is
    /// applied during decoding, so the stacked voxels are already in
    /// modality units.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeLoaderError::NoValidFiles`] if no object yields pixel
    /// data, or [`VolumeLoaderError::InconsistentGeometry`] if the slices
    /// disagree on in-plane dimensions. Either failure is terminal; no
    /// partial volume is produced.
    pub fn load_from_dicom_objects(
        objects: &[FileDicomObject<InMemDicomObject>],
    ) -> Result<Volume, VolumeLoaderError> {
        let mut slices: Vec<_> = objects
            .iter()
            .filter_map(|object| Self::extract_slice_with_order(object))
            .collect();

        if slices.is_empty() {
            return Err(VolumeLoaderError::NoValidFiles);
        }

        Self::sort_slices(&mut slices);

        let default_window = Self::derive_default_window(slices[0].2);
        let spacing = Self::spacing(objects);

        let images: Vec<_> = slices.into_iter().map(|(_, image, _)| image).collect();
        Self::validate_dimensions(&images)?;

        let voxels = Self::build_volume_array(&images);
        info!(
            "Assembled volume with shape {:?} from {} slices",
            voxels.dim(),
            images.len()
        );

        Ok(Volume::new(voxels, spacing, default_window))
    }

    /// Load a volume from explicit file paths.
    ///
    /// Unlike directory loading, a path that fails to parse is an error here:
    /// the caller asked for these exact files.
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path>],
    ) -> Result<Volume, VolumeLoaderError> {
        let objects: Result<Vec<_>, _> =
            paths.iter().map(|path| open_file(path.as_ref())).collect();

        Self::load_from_dicom_objects(&objects?)
    }

    /// Load a volume from a directory of per-slice files (non-recursive).
    ///
    /// Files that fail to parse as DICOM are skipped silently, so a folder
    /// may freely mix slice files with stray artifacts. Lexical filename
    /// order is the fallback stacking order when the slices carry no
    /// position metadata.
    pub fn load_from_directory(path: impl AsRef<Path>) -> Result<Volume, VolumeLoaderError> {
        let mut paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let objects: Vec<_> = paths
            .iter()
            .filter_map(|path| match open_file(path) {
                Ok(object) => Some(object),
                Err(err) => {
                    debug!("Skipping {}: {}", path.display(), err);
                    None
                }
            })
            .collect();

        if objects.is_empty() {
            return Err(VolumeLoaderError::NoValidFiles);
        }

        Self::load_from_dicom_objects(&objects)
    }

    fn extract_slice_with_order(
        object: &FileDicomObject<InMemDicomObject>,
    ) -> Option<(Option<f32>, Array2<f32>, &FileDicomObject<InMemDicomObject>)> {
        let image = Self::decode_image(object)?;
        Some((Self::slice_position(object), image, object))
    }

    fn decode_image(object: &FileDicomObject<InMemDicomObject>) -> Option<Array2<f32>> {
        let pixel_data = object.decode_pixel_data().ok()?;
        // Rescale slope/intercept is folded in here; windowing stays ours.
        let options = ConvertOptions::new()
            .with_modality_lut(ModalityLutOption::Default)
            .with_voi_lut(VoiLutOption::Identity);
        pixel_data
            .to_ndarray_with_options::<f32>(&options)
            .ok()
            .map(|arr| arr.slice_move(s![0, .., .., 0]))
    }

    fn slice_position(object: &FileDicomObject<InMemDicomObject>) -> Option<f32> {
        let position = object
            .element(tags::IMAGE_POSITION_PATIENT)
            .ok()
            .and_then(|element| element.to_multi_float32().ok())
            .and_then(|values| values.get(2).copied());
        if position.is_some() {
            return position;
        }
        object
            .element(tags::INSTANCE_NUMBER)
            .ok()
            .and_then(|element| element.to_int::<i32>().ok())
            .map(|number| number as f32)
    }

    fn sort_slices(
        slices: &mut [(Option<f32>, Array2<f32>, &FileDicomObject<InMemDicomObject>)],
    ) {
        // Keys are all-or-nothing: a partially keyed series keeps the
        // caller's (filename) order instead of mixing key types.
        if slices.iter().all(|(order, _, _)| order.is_some()) {
            slices.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        }
    }

    fn derive_default_window(object: &FileDicomObject<InMemDicomObject>) -> WindowLevel {
        windowing::derive_defaults(
            Self::first_float(object, tags::WINDOW_CENTER),
            Self::first_float(object, tags::WINDOW_WIDTH),
        )
    }

    fn first_float(object: &FileDicomObject<InMemDicomObject>, tag: dicom::core::Tag) -> Option<f32> {
        object
            .element(tag)
            .ok()
            .and_then(|element| element.to_multi_float32().ok())
            .and_then(|values| values.first().copied())
    }

    fn validate_dimensions(images: &[Array2<f32>]) -> Result<(), VolumeLoaderError> {
        let first_dim = images[0].dim();
        if images.iter().any(|image| image.dim() != first_dim) {
            return Err(VolumeLoaderError::InconsistentGeometry);
        }
        Ok(())
    }

    fn build_volume_array(images: &[Array2<f32>]) -> Array3<f32> {
        let (height, width) = images[0].dim();
        let depth = images.len();
        let mut volume = Array3::<f32>::zeros((depth, height, width));

        for (i, image) in images.iter().enumerate() {
            volume.slice_mut(s![i, .., ..]).assign(image);
        }

        volume
    }

    fn spacing(objects: &[FileDicomObject<InMemDicomObject>]) -> Option<(f32, f32, f32)> {
        objects.iter().find_map(|object| {
            let pixel_spacing = object
                .element(tags::PIXEL_SPACING)
                .ok()?
                .to_multi_float32()
                .ok()?;

            let slice_thickness = object
                .element(tags::SLICE_THICKNESS)
                .ok()?
                .to_float32()
                .ok()?;

            Some((pixel_spacing[0], pixel_spacing[1], slice_thickness))
        })
    }
}
