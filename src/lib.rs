#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Band-partitioned Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which `z = z * z + c`, starting from zero, never runs off to
//! infinity.  Points outside the set are coloured by how many
//! iterations it took them to escape.
//!
//! Every pixel can be computed on its own, so the image is cut into
//! horizontal bands, one per worker.  Workers render their bands
//! without talking to each other, meet at a barrier, and then hand
//! their bands to a single coordinator through a gather.  The
//! coordinator stacks the bands in rank order and writes the result
//! out as a binary PPM.
//!
//! The workers here are threads, but they only ever communicate
//! through the [`Communicator`] trait, which is the same barrier and
//! gather pair a message-passing runtime would offer.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod aggregate;
pub mod cluster;
pub mod comm;
pub mod config;
pub mod error;
pub mod escape;
pub mod output;
pub mod palette;
pub mod partition;
pub mod planes;
pub mod render;
pub mod timing;
pub mod worker;

pub use cluster::{render_distributed, run};
pub use comm::{Communicator, ThreadComm};
pub use config::{GridSpec, RunConfig};
pub use error::Error;
pub use escape::escape_count;
pub use output::{save, write_ppm, GlobalBuffer};
pub use palette::{to_color, PixelColor};
pub use partition::{partition, Partition, RemainderPolicy, WorkerShard};
pub use render::{render, render_threaded, LocalBuffer};
pub use timing::Timings;
