//! # DICOM series viewer core
//!
//! This crate assembles a folder of per-slice DICOM files into a single 3D
//! volume and serves windowed 2D slices from it for display and export.
//!
//! It is built on the dicom-rs ecosystem. A volume is loaded either from
//! multiple [`FileDicomObject<InMemDicomObject>`] or from a folder, where
//! every readable file contributes one slice and everything else is skipped.
//! Slices are stacked along the acquisition axis, ordered by their patient
//! position when the metadata carries one, and can be cut along the three
//! medical axes:
//!  - Axial
//!  - Coronal
//!  - Sagittal
//!
//! Rendering applies a window/level transform: a [`WindowLevel`] pair picks
//! the visible intensity range, and [`Volume::render`] maps the chosen plane
//! onto 8-bit grayscale. The same call backs both on-screen display and PNG
//! export, so a saved slice is always pixel-identical to the displayed one
//! at the same settings. Consumers can additionally ask for bilinear
//! resampling of coronal and sagittal slices to preserve aspect ratios when
//! the series records its physical spacing.
//!
//! Interactive front-ends plug in through the [`surface::DisplaySurface`]
//! trait; the built-in headless surface loads a folder, writes the middle
//! axial slice and exits.
//!
//! # Examples
//!
//! ## Reading a folder into a volume and exporting a slice
//!
//! Read all slice files from the dicom/ directory, then save the windowed
//! image at the center of the volume in the sagittal axis.
//!
//! ```no_run
//! # use dicom_series_viewer::{Interpolation, Orientation, VolumeLoader, WindowLevel};
//! # use std::path::PathBuf;
//! let volume = VolumeLoader::load_from_directory(PathBuf::from("dicom"))
//!     .expect("should have loaded files from directory");
//! let window = WindowLevel::new(40.0, 400.0).expect("width is positive");
//! let image = volume
//!     .render(
//!         Orientation::Sagittal,
//!         volume.extent(Orientation::Sagittal) / 2,
//!         window,
//!         Interpolation::Bilinear,
//!     )
//!     .expect("index is within the sagittal extent");
//! image.save("result.png").expect("should have written the image");
//! ```
//!
//! [`FileDicomObject<InMemDicomObject>`]: https://docs.rs/dicom-object/latest/dicom_object/struct.FileDicomObject.html

pub mod config;
pub mod enums;
mod interpolator;
pub mod surface;
pub mod view;
pub mod volume;
pub mod volume_loader;
pub mod windowing;

pub use enums::{Interpolation, Orientation};
pub use view::ViewState;
pub use volume::{RenderError, SliceImage, Volume};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
pub use windowing::{WindowLevel, WindowLevelError};
