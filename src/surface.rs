use crate::config::ViewerConfig;
use crate::enums::Interpolation;
use crate::view::ViewState;
use crate::volume::RenderError;
use crate::volume_loader::{VolumeLoader, VolumeLoaderError};

use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Fixed output filename used by the headless surface when no export path is
/// configured.
pub const HEADLESS_OUTPUT_FILENAME: &str = "slice_mid.png";

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Failed to load volume: {0}")]
    Load(#[from] VolumeLoaderError),

    #[error("Failed to render slice: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to write image: {0}")]
    Export(#[from] image::ImageError),
}

/// The interactive shell around the volume pipeline.
///
/// A surface owns its event loop, widgets and dialogs, and maps its own
/// control order explicitly onto [`WindowLevel`](crate::WindowLevel)'s named
/// fields. The pipeline itself never branches on which surface is running.
pub trait DisplaySurface {
    fn name(&self) -> &'static str;

    /// Whether this surface can run in the current environment.
    fn is_available(&self) -> bool;

    /// Take over the session until the user quits or the work is done.
    fn run(&self, config: &ViewerConfig) -> Result<(), SurfaceError>;
}

/// Fallback surface for environments without an interactive toolkit.
///
/// Loads the configured folder, renders the middle axial slice at the
/// volume's default window/level, writes it as PNG and returns. This is the
/// minimum viable behavior that exercises the whole pipeline without a UI.
pub struct HeadlessSurface;

impl DisplaySurface for HeadlessSurface {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn run(&self, config: &ViewerConfig) -> Result<(), SurfaceError> {
        let volume = VolumeLoader::load_from_directory(&config.folder)?;
        let view = ViewState::new(&volume);
        let image = volume.render(
            view.orientation(),
            view.index(),
            view.window(),
            Interpolation::None,
        )?;

        let output = config
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(HEADLESS_OUTPUT_FILENAME));
        image.save(&output)?;
        info!("Wrote slice {} to {}", view.index(), output.display());
        Ok(())
    }
}

/// Walk the fallback chain and return the first surface that can run.
///
/// Interactive toolkit adapters register ahead of the fallback; when none is
/// given or available, probing resolves to [`HeadlessSurface`], which is
/// always available.
pub fn probe(surfaces: Vec<Box<dyn DisplaySurface>>) -> Box<dyn DisplaySurface> {
    surfaces
        .into_iter()
        .find(|surface| surface.is_available())
        .unwrap_or_else(|| Box::new(HeadlessSurface))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnavailableSurface;

    impl DisplaySurface for UnavailableSurface {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn is_available(&self) -> bool {
            false
        }

        fn run(&self, _config: &ViewerConfig) -> Result<(), SurfaceError> {
            unreachable!("an unavailable surface must never be run")
        }
    }

    #[test]
    fn probe_falls_back_to_headless() {
        let surface = probe(vec![Box::new(UnavailableSurface)]);
        assert_eq!(surface.name(), "headless");
        let surface = probe(Vec::new());
        assert_eq!(surface.name(), "headless");
    }

    #[test]
    fn probe_prefers_an_available_surface() {
        let surface = probe(vec![
            Box::new(UnavailableSurface),
            Box::new(HeadlessSurface),
        ]);
        assert_eq!(surface.name(), "headless");
    }

    #[test]
    fn missing_folder_reports_load_failure() {
        let config = ViewerConfig {
            folder: PathBuf::from("/nonexistent/series"),
            output: None,
        };
        assert!(matches!(
            HeadlessSurface.run(&config),
            Err(SurfaceError::Load(_))
        ));
    }
}
