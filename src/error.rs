// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong during a run.  None of these are
//! transient: the computation is deterministic, so the only recovery
//! is to fix the configuration and rerun the whole job.

use std::io;

/// The error type for every fallible operation in the crate.
#[derive(Debug, Fail)]
pub enum Error {
    /// The pixel grid or the complex plane is unusable.
    #[fail(display = "invalid grid: {}", reason)]
    InvalidGrid {
        /// What was wrong with it.
        reason: String,
    },

    /// A run was requested with no workers at all.
    #[fail(display = "at least one worker is required")]
    NoWorkers,

    /// The height does not divide evenly and the remainder policy
    /// refuses to guess what to do with the leftover rows.
    #[fail(
        display = "height {} is not evenly divisible by {} workers ({} rows left over)",
        height, workers, remainder
    )]
    UnevenPartition {
        /// Total rows in the image.
        height: usize,
        /// Number of workers.
        workers: usize,
        /// `height % workers`.
        remainder: usize,
    },

    /// More workers than rows: some worker would own nothing.
    #[fail(display = "{} workers cannot share {} rows", workers, height)]
    TooManyWorkers {
        /// Total rows in the image.
        height: usize,
        /// Number of workers.
        workers: usize,
    },

    /// A direct message arrived from a rank other than the one expected.
    #[fail(display = "expected a message from rank {}, got one from rank {}", expected, found)]
    UnexpectedSender {
        /// The rank the receiver was waiting on.
        expected: usize,
        /// The rank that actually sent.
        found: usize,
    },

    /// A participant in a gather contributed a chunk whose length
    /// disagrees with everyone else's.
    #[fail(
        display = "rank {} contributed {} bytes to the gather, expected {}",
        rank, found, expected
    )]
    ChunkMismatch {
        /// The offending rank.
        rank: usize,
        /// The uniform chunk length.
        expected: usize,
        /// What the rank actually sent.
        found: usize,
    },

    /// A pixel buffer does not match the dimensions it claims.
    #[fail(
        display = "buffer of {} bytes cannot hold a {}x{} RGB image",
        len, width, height
    )]
    BufferSize {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
        /// Actual byte length.
        len: usize,
    },

    /// A collective peer went away before the operation finished.
    #[fail(display = "a peer left the collective before rank {} finished", rank)]
    Disconnected {
        /// The rank that noticed.
        rank: usize,
    },

    /// A worker thread panicked.
    #[fail(display = "worker {} panicked", rank)]
    WorkerPanicked {
        /// The rank of the dead worker.
        rank: usize,
    },

    /// Writing the image failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
