// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Static row partitioning.  Every worker owns one contiguous band of
//! rows, `height / workers` tall.  When the division leaves a
//! remainder, a [`RemainderPolicy`] decides what happens to the
//! leftover rows; they are never lost silently.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::Error;

/// What to do with the `height % workers` rows the integer division
/// leaves over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// The last worker's band runs to the bottom of the image.
    LastWorker,
    /// Nobody renders the leftover rows.  They are reported by
    /// [`Partition::dropped_rows`] and come out black.
    Truncate,
    /// An uneven height is a configuration error.
    Reject,
}

impl Default for RemainderPolicy {
    fn default() -> Self {
        RemainderPolicy::LastWorker
    }
}

impl RemainderPolicy {
    /// The names accepted by `from_str`, for command-line help.
    pub const NAMES: &'static [&'static str] = &["last-worker", "truncate", "reject"];
}

impl FromStr for RemainderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-worker" => Ok(RemainderPolicy::LastWorker),
            "truncate" => Ok(RemainderPolicy::Truncate),
            "reject" => Ok(RemainderPolicy::Reject),
            _ => Err(format!("unknown remainder policy '{}'", s)),
        }
    }
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RemainderPolicy::LastWorker => "last-worker",
            RemainderPolicy::Truncate => "truncate",
            RemainderPolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// The band of rows owned by one worker, `row_start..row_end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerShard {
    /// The owning worker.
    pub rank: usize,
    /// First row, inclusive.
    pub row_start: usize,
    /// Last row, exclusive.
    pub row_end: usize,
}

impl WorkerShard {
    /// Number of rows in the band.
    pub fn rows(&self) -> usize {
        self.row_end - self.row_start
    }

    /// The band as a range of row indices.
    pub fn range(&self) -> Range<usize> {
        self.row_start..self.row_end
    }
}

/// The naive split: worker `rank` of `workers` gets rows
/// `rank * (height / workers)` up to the next multiple.  Rows past
/// `workers * (height / workers)` belong to nobody.
pub fn partition(height: usize, workers: usize, rank: usize) -> (usize, usize) {
    let rows_per_worker = height / workers;
    let row_start = rank * rows_per_worker;
    (row_start, row_start + rows_per_worker)
}

/// How a run's rows are laid out across its workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    height: usize,
    workers: usize,
    policy: RemainderPolicy,
}

impl Partition {
    /// Checks the worker count against the height under `policy`.
    pub fn new(height: usize, workers: usize, policy: RemainderPolicy) -> Result<Self, Error> {
        if workers == 0 {
            return Err(Error::NoWorkers);
        }
        if workers > height {
            return Err(Error::TooManyWorkers { height, workers });
        }
        let remainder = height % workers;
        if remainder != 0 && policy == RemainderPolicy::Reject {
            return Err(Error::UnevenPartition {
                height,
                workers,
                remainder,
            });
        }
        Ok(Partition {
            height,
            workers,
            policy,
        })
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The remainder policy in force.
    pub fn policy(&self) -> RemainderPolicy {
        self.policy
    }

    /// The rows owned by `rank`.
    pub fn shard(&self, rank: usize) -> WorkerShard {
        assert!(rank < self.workers, "rank {} out of {}", rank, self.workers);
        let (row_start, mut row_end) = partition(self.height, self.workers, rank);
        if rank == self.workers - 1 && self.policy == RemainderPolicy::LastWorker {
            row_end = self.height;
        }
        WorkerShard {
            rank,
            row_start,
            row_end,
        }
    }

    /// Every shard, in rank order.
    pub fn shards<'a>(&'a self) -> impl Iterator<Item = WorkerShard> + 'a {
        (0..self.workers).map(move |rank| self.shard(rank))
    }

    /// Rows every worker contributes to the gather: `height / workers`.
    /// Always at least one, since there are never more workers than rows.
    pub fn chunk_rows(&self) -> usize {
        self.height / self.workers
    }

    /// Rows the last worker renders beyond its gather chunk.  They go
    /// to the coordinator directly rather than through the gather, and
    /// are empty unless the policy is `LastWorker` and the height does
    /// not divide.
    pub fn remainder_rows(&self) -> Range<usize> {
        let start = self.workers * self.chunk_rows();
        if self.policy == RemainderPolicy::LastWorker {
            start..self.height
        } else {
            start..start
        }
    }

    /// Rows rendered by nobody.  Empty unless the policy is
    /// `Truncate` and the height does not divide.
    pub fn dropped_rows(&self) -> Range<usize> {
        self.shard(self.workers - 1).row_end..self.height
    }
}
