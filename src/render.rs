// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders one worker's band of the image.
//!
//! Every pixel is independent of every other, so a band can be split
//! further: `render_threaded` hands disjoint runs of rows to scoped
//! threads, each writing into its own slice of the band's buffer.  No
//! locks are needed because no byte is written by more than one
//! thread.

use itertools::iproduct;
use log::trace;

use crate::config::GridSpec;
use crate::error::Error;
use crate::escape::escape_count;
use crate::palette::{to_color, PixelColor};
use crate::partition::WorkerShard;

/// A worker's rendered band: row-major RGB bytes covering exactly the
/// rows of its shard.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalBuffer {
    shard: WorkerShard,
    width: usize,
    pixels: Vec<u8>,
}

impl LocalBuffer {
    /// The shard this buffer covers.
    pub fn shard(&self) -> WorkerShard {
        self.shard
    }

    /// The raw RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// The colour of the pixel at `column` on image row `row`, which
    /// must fall inside the shard.
    pub fn pixel(&self, column: usize, row: usize) -> PixelColor {
        let offset = 3 * ((row - self.shard.row_start) * self.width + column);
        PixelColor {
            r: self.pixels[offset],
            g: self.pixels[offset + 1],
            b: self.pixels[offset + 2],
        }
    }

    /// Consumes the buffer and splits it into the first `chunk_len`
    /// bytes, which go to the gather, and whatever rows are left after
    /// them, which only the last worker of an uneven split has.
    pub fn into_chunk(mut self, chunk_len: usize) -> Result<(Vec<u8>, Vec<u8>), Error> {
        if self.pixels.len() < chunk_len {
            return Err(Error::ChunkMismatch {
                rank: self.shard.rank,
                expected: chunk_len,
                found: self.pixels.len(),
            });
        }
        let remainder = self.pixels.split_off(chunk_len);
        Ok((self.pixels, remainder))
    }
}

/// Fill `band` with whole image rows, the first of which is
/// `first_row`.
fn render_rows(spec: &GridSpec, first_row: usize, band: &mut [u8]) {
    let rows = band.len() / spec.row_len();
    let max_iterations = spec.max_iterations();
    let coordinates = iproduct!(first_row..first_row + rows, 0..spec.width());
    for (pixel, (row, column)) in band.chunks_mut(3).zip(coordinates) {
        let count = escape_count(spec.point(column, row), max_iterations);
        pixel.copy_from_slice(&to_color(count).to_bytes());
    }
}

/// Render every pixel of `shard` on the calling thread.
pub fn render(shard: &WorkerShard, spec: &GridSpec) -> LocalBuffer {
    let mut pixels = vec![0 as u8; shard.rows() * spec.row_len()];
    render_rows(spec, shard.row_start, &mut pixels);
    LocalBuffer {
        shard: *shard,
        width: spec.width(),
        pixels,
    }
}

/// Render `shard` using up to `threads` scoped threads, each taking a
/// contiguous run of rows.  The result is identical to [`render`].
pub fn render_threaded(
    shard: &WorkerShard,
    spec: &GridSpec,
    threads: usize,
) -> Result<LocalBuffer, Error> {
    if threads <= 1 || shard.rows() <= 1 {
        return Ok(render(shard, spec));
    }

    let row_len = spec.row_len();
    let rows_per_thread = (shard.rows() + threads - 1) / threads;
    let mut pixels = vec![0 as u8; shard.rows() * row_len];
    {
        let bands: Vec<&mut [u8]> = pixels.chunks_mut(rows_per_thread * row_len).collect();
        crossbeam::scope(|spawner| {
            let mut first_row = shard.row_start;
            for band in bands {
                let rows = band.len() / row_len;
                trace!(
                    "worker {} rendering rows {}..{}",
                    shard.rank,
                    first_row,
                    first_row + rows
                );
                spawner.spawn(move |_| render_rows(spec, first_row, band));
                first_row += rows;
            }
        })
        .map_err(|_| Error::WorkerPanicked { rank: shard.rank })?;
    }

    Ok(LocalBuffer {
        shard: *shard,
        width: spec.width(),
        pixels,
    })
}
