/// Anatomical axis along which a 2D plane is taken from the volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Axial,
    Coronal,
    Sagittal,
}

/// Resampling applied to a rendered plane for aspect-correct presentation.
///
/// Bilinear resampling only affects coronal and sagittal planes of volumes
/// with known spacing; axial planes are already isotropic in-plane.
#[derive(Clone, Copy, Debug, Default)]
pub enum Interpolation {
    Bilinear,
    #[default]
    None,
}
