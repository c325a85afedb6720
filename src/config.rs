// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run configuration.  [`GridSpec`] holds the image parameters, which
//! are fixed for a build; [`RunConfig`] adds the things the process
//! bootstrap decides, such as how many workers to start.

use num::Complex;
use std::path::PathBuf;

use crate::error::Error;
use crate::partition::RemainderPolicy;
use crate::planes::{ComplexPlane, IntegralPlane, Pixel, PlaneMapper};

/// Default image width in pixels.
pub const WIDTH: usize = 800;
/// Default image height in pixels.
pub const HEIGHT: usize = 800;
/// Default real-axis minimum.
pub const XMIN: f64 = -2.0;
/// Default real-axis maximum.
pub const XMAX: f64 = 2.0;
/// Default imaginary-axis minimum.
pub const YMIN: f64 = -2.0;
/// Default imaginary-axis maximum.
pub const YMAX: f64 = 2.0;
/// Default iteration bound.
pub const MAX_ITERATIONS: usize = 256;
/// Default output file.
pub const OUTPUT: &str = "mandelbrot.ppm";

/// The immutable description of the image being computed.  Built
/// once, then handed by reference to everything that needs it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSpec {
    plane: PlaneMapper,
    max_iterations: usize,
}

impl GridSpec {
    /// Validates the grid and the complex rectangle and builds the
    /// spec.  `leftlower` carries (xmin, ymin) and `rightupper`
    /// carries (xmax, ymax).
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
        max_iterations: usize,
    ) -> Result<Self, Error> {
        Ok(GridSpec {
            plane: PlaneMapper::new(width, height, leftlower, rightupper)?,
            max_iterations,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.plane.integral_plane.0
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.plane.integral_plane.1
    }

    /// The iteration bound handed to the escape-time kernel.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Bytes in one RGB row.
    pub fn row_len(&self) -> usize {
        3 * self.width()
    }

    /// The complex point sampled by the pixel at `column`, `row`.
    pub fn point(&self, column: usize, row: usize) -> Complex<f64> {
        self.plane.pixel_to_point(&Pixel(column, row))
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            plane: PlaneMapper {
                integral_plane: IntegralPlane(WIDTH, HEIGHT),
                complex_plane: ComplexPlane(Complex::new(XMIN, YMIN), Complex::new(XMAX, YMAX)),
            },
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// Everything a run needs: the image, and how to spread the work.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// The image to compute.
    pub grid: GridSpec,
    /// Number of workers, each owning one band of rows.
    pub workers: usize,
    /// Threads each worker may use inside its own band.
    pub threads: usize,
    /// What happens to rows left over when the height does not divide.
    pub remainder: RemainderPolicy,
    /// Where the coordinator writes the image.
    pub output: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            grid: GridSpec::default(),
            workers: num_cpus::get(),
            threads: 1,
            remainder: RemainderPolicy::default(),
            output: PathBuf::from(OUTPUT),
        }
    }
}
