//! Contains the PlaneMapper struct, which describes a relationship
//! between a grid of pixels with an origin at 0,0 and a rectangle on
//! the complex plane defined by its leftlower and rightupper corners.
//!
//! Unlike a renderer that samples pixel *cells*, the mapping here is
//! inclusive at both ends: column 0 lands on the left edge of the
//! complex rectangle and column `width - 1` lands on the right edge.
use num::Complex;

use crate::error::Error;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// A column, row pair on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of an integral plane onto points of a complex plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    /// The size of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane, and two
    /// points describing the complex plane.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<PlaneMapper, Error> {
        if width < 2 || height < 2 {
            return Err(Error::InvalidGrid {
                reason: format!("a {}x{} grid needs at least two pixels per side", width, height),
            });
        }

        let corners = [leftlower.re, leftlower.im, rightupper.re, rightupper.im];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidGrid {
                reason: "the complex plane corners must be finite".to_string(),
            });
        }

        if rightupper.re <= leftlower.re {
            return Err(Error::InvalidGrid {
                reason: "the left lower corner is not to the left of the right upper corner"
                    .to_string(),
            });
        }

        if rightupper.im <= leftlower.im {
            return Err(Error::InvalidGrid {
                reason: "the left lower corner is not lower than the right upper corner"
                    .to_string(),
            });
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(leftlower, rightupper),
        })
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// point on the complex plane it samples.  The arithmetic is
    /// `min + (max - min) * n / (len - 1)`, in that order, so the
    /// result is bit-for-bit reproducible.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let IntegralPlane(width, height) = self.integral_plane;
        let ComplexPlane(ll, ru) = self.complex_plane;
        Complex::new(
            ll.re + (ru.re - ll.re) * pixel.0 as f64 / (width - 1) as f64,
            ll.im + (ru.im - ll.im) * pixel.1 as f64 / (height - 1) as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_degenerate_grid() {
        let pm = PlaneMapper::new(1, 4, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 0, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_nan_corner() {
        let pm = PlaneMapper::new(4, 4, Complex::new(std::f64::NAN, -1.0), Complex::new(1.0, 1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        assert!(pm.is_ok());
        assert_eq!(pm.unwrap().len(), 16);
    }

    #[test]
    fn corners_map_to_corners() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 3)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 0)), Complex::new(2.0, -2.0));
    }

    #[test]
    fn interior_pixels_interpolate_linearly() {
        let pm = PlaneMapper::new(5, 3, Complex::new(0.0, 0.0), Complex::new(4.0, 1.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(1, 1)), Complex::new(1.0, 0.5));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 1.0));
    }
}
