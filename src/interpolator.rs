use ndarray::ArrayView2;

pub(crate) struct Interpolator;

impl Interpolator {
    /// Output dimensions (z, y, x) that make the volume isotropic at the
    /// finest spacing of the three axes.
    pub(crate) fn isotropic_dimensions(
        spacing: (f32, f32, f32),
        dim: (usize, usize, usize),
    ) -> (u32, u32, u32) {
        let (x_spacing, y_spacing, z_spacing) = spacing;
        let min_spacing = x_spacing.min(y_spacing).min(z_spacing);
        let inv_min_spacing = 1.0 / min_spacing;

        // dim is (depth, height, width) corresponding to (z, y, x)
        let new_x = (dim.2 as f32 * x_spacing * inv_min_spacing) as u32;
        let new_y = (dim.1 as f32 * y_spacing * inv_min_spacing) as u32;
        let new_z = (dim.0 as f32 * z_spacing * inv_min_spacing) as u32;

        (new_z, new_y, new_x)
    }

    /// Sample a plane of raw intensity values at a fractional position.
    #[inline]
    pub(crate) fn bilinear_interpolate(plane: &ArrayView2<f32>, y: f32, x: f32) -> f32 {
        let (height, width) = plane.dim();

        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(height - 1);
        let x1 = (x0 + 1).min(width - 1);

        let dy = y - y0 as f32;
        let dx = x - x0 as f32;
        let one_minus_dx = 1.0 - dx;
        let one_minus_dy = 1.0 - dy;

        let v00 = plane[[y0, x0]];
        let v01 = plane[[y0, x1]];
        let v10 = plane[[y1, x0]];
        let v11 = plane[[y1, x1]];

        let v0 = v00.mul_add(one_minus_dx, v01 * dx);
        let v1 = v10.mul_add(one_minus_dx, v11 * dx);

        v0.mul_add(one_minus_dy, v1 * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn isotropic_dimensions_stretch_the_coarse_axis() {
        let dims = Interpolator::isotropic_dimensions((1.0, 1.0, 4.0), (4, 8, 8));
        assert_eq!(dims, (16, 8, 8));
    }

    #[test]
    fn interpolates_between_grid_points() {
        let plane = array![[0.0_f32, 10.0], [20.0, 30.0]];
        let view = plane.view();
        assert_eq!(Interpolator::bilinear_interpolate(&view, 0.0, 0.0), 0.0);
        assert_eq!(Interpolator::bilinear_interpolate(&view, 0.0, 0.5), 5.0);
        assert_eq!(Interpolator::bilinear_interpolate(&view, 0.5, 0.0), 10.0);
        assert_eq!(Interpolator::bilinear_interpolate(&view, 0.5, 0.5), 15.0);
    }
}
