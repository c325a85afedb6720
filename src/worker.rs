// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What one worker does, start to finish: render its band with no
//! communication at all, meet everyone at the barrier, then take part
//! in the gather.  Only the coordinator comes back with an image.
//!
//! A worker whose render failed still goes through the barrier and the
//! gather, contributing an empty chunk, so that its peers fail with a
//! `ChunkMismatch` instead of waiting forever.

use log::{debug, error};
use std::time::Duration;

use crate::aggregate::{assemble, chunk_len};
use crate::comm::Communicator;
use crate::config::GridSpec;
use crate::error::Error;
use crate::output::GlobalBuffer;
use crate::partition::Partition;
use crate::render::render_threaded;
use crate::timing::{Stopwatch, Timings};

/// The coordinator's share of a finished run.
#[derive(Debug)]
pub struct Gathered {
    /// The whole image.
    pub image: GlobalBuffer,
    /// The coordinator's timings.
    pub timings: Timings,
}

/// Run one worker to completion.  Every worker in the group must call
/// this with the same `spec` and `partition`, or the gather stalls or
/// fails.
pub fn run_worker<C: Communicator>(
    comm: &C,
    spec: &GridSpec,
    partition: &Partition,
    threads: usize,
) -> Result<Option<Gathered>, Error> {
    let shard = partition.shard(comm.rank());

    let watch = Stopwatch::start();
    let rendered = render_threaded(&shard, spec, threads)
        .and_then(|local| local.into_chunk(chunk_len(partition, spec)));
    let runtime = watch.elapsed();
    debug!(
        "worker {} rendered rows {}..{} in {:?}",
        shard.rank, shard.row_start, shard.row_end, runtime
    );

    combine(comm, spec, partition, rendered, runtime)
}

/// The communication half of [`run_worker`].  `rendered` is this
/// worker's gather chunk and the extra rows it owns past that chunk,
/// or the reason it has neither.
pub fn combine<C: Communicator>(
    comm: &C,
    spec: &GridSpec,
    partition: &Partition,
    rendered: Result<(Vec<u8>, Vec<u8>), Error>,
    runtime: Duration,
) -> Result<Option<Gathered>, Error> {
    comm.barrier();
    let watch = Stopwatch::start();

    let (chunk, remainder) = match rendered {
        Ok(parts) => parts,
        Err(err) => {
            error!("worker {} has nothing to contribute: {}", comm.rank(), err);
            let _ = comm.gather(Vec::new());
            return Err(err);
        }
    };

    let sent = if remainder.is_empty() {
        Ok(())
    } else {
        comm.send_to_coordinator(remainder)
    };
    let gathered = comm.gather(chunk);
    sent?;

    match gathered? {
        None => Ok(None),
        Some(bytes) => {
            let remainder = if partition.remainder_rows().is_empty() {
                Vec::new()
            } else {
                comm.receive_from(partition.workers() - 1)?
            };
            let image = assemble(partition, spec, bytes, remainder)?;
            let timings = Timings {
                runtime,
                communication: watch.elapsed(),
            };
            Ok(Some(Gathered { image, timings }))
        }
    }
}
