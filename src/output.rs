// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The finished image and how it is written out: a binary PPM, which
//! is a short text header followed by raw RGB bytes.

use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::palette::PixelColor;

/// The assembled image, held by the coordinator alone.
#[derive(Clone, Debug)]
pub struct GlobalBuffer(RgbImage);

impl GlobalBuffer {
    /// Wrap `pixels`, which must be exactly `3 * width * height`
    /// row-major RGB bytes.
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, Error> {
        let len = pixels.len();
        if len != 3 * width * height {
            return Err(Error::BufferSize { width, height, len });
        }
        RgbImage::from_raw(width as u32, height as u32, pixels)
            .map(GlobalBuffer)
            .ok_or(Error::BufferSize { width, height, len })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.0.width() as usize
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.0.height() as usize
    }

    /// The raw row-major RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &*self.0
    }

    /// The colour at `column`, `row`.
    pub fn pixel(&self, column: usize, row: usize) -> PixelColor {
        let offset = 3 * (row * self.width() + column);
        let bytes = self.as_bytes();
        PixelColor {
            r: bytes[offset],
            g: bytes[offset + 1],
            b: bytes[offset + 2],
        }
    }

    /// Give up the bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.0.into_raw()
    }
}

/// Write `image` to `writer` as a binary PPM: the header
/// `P6\n{width} {height}\n255\n` followed by every pixel's R, G, B
/// with no padding.
pub fn write_ppm<W: Write>(mut writer: W, image: &GlobalBuffer) -> Result<(), Error> {
    write!(writer, "P6\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(image.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write `image` into it.
pub fn save<P: AsRef<Path>>(path: P, image: &GlobalBuffer) -> Result<(), Error> {
    let output = File::create(path.as_ref())?;
    write_ppm(BufWriter::new(output), image)
}
