// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Starts a group of workers, one scoped thread per rank, and hands
//! the coordinator's result back to the caller.

use crossbeam::thread::ScopedJoinHandle;
use log::info;

use crate::comm::{ThreadComm, COORDINATOR};
use crate::config::{GridSpec, RunConfig};
use crate::error::Error;
use crate::output::save;
use crate::partition::{Partition, RemainderPolicy};
use crate::timing::Timings;
use crate::worker::{run_worker, Gathered};

/// Render `spec` across `workers` threads, each owning one band of
/// rows and using up to `threads` threads of its own.
pub fn render_distributed(
    spec: &GridSpec,
    workers: usize,
    threads: usize,
    policy: RemainderPolicy,
) -> Result<Gathered, Error> {
    let partition = Partition::new(spec.height(), workers, policy)?;
    let partition = &partition;

    let results: Vec<Result<Option<Gathered>, Error>> = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Result<Option<Gathered>, Error>>> =
            ThreadComm::world(workers)
                .into_iter()
                .map(|comm| spawner.spawn(move |_| run_worker(&comm, spec, partition, threads)))
                .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(Error::WorkerPanicked { rank }))
            })
            .collect()
    })
    .map_err(|_| Error::WorkerPanicked { rank: COORDINATOR })?;

    let mut coordinator = None;
    for result in results {
        if let Some(gathered) = result? {
            coordinator = Some(gathered);
        }
    }
    coordinator.ok_or(Error::Disconnected { rank: COORDINATOR })
}

/// Run the whole job described by `config`: render, gather, write the
/// image, and return the coordinator's timings.
pub fn run(config: &RunConfig) -> Result<Timings, Error> {
    info!(
        "rendering {}x{} with {} workers ({} threads each, remainder policy {})",
        config.grid.width(),
        config.grid.height(),
        config.workers,
        config.threads,
        config.remainder
    );
    let Gathered { image, timings } = render_distributed(
        &config.grid,
        config.workers,
        config.threads,
        config.remainder,
    )?;
    save(&config.output, &image)?;
    info!("wrote {}", config.output.display());
    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;
    use std::fs;

    fn spec(width: usize, height: usize) -> GridSpec {
        GridSpec::new(
            width,
            height,
            Complex::new(-2.0, -2.0),
            Complex::new(2.0, 2.0),
            10,
        )
        .unwrap()
    }

    #[test]
    fn four_by_four_is_reproducible() {
        let spec = spec(4, 4);
        let first = render_distributed(&spec, 1, 1, RemainderPolicy::Reject).unwrap();
        let second = render_distributed(&spec, 1, 1, RemainderPolicy::Reject).unwrap();
        assert_eq!(first.image.as_bytes().len(), 48);
        assert_eq!(first.image.as_bytes(), second.image.as_bytes());
    }

    #[test]
    fn two_workers_match_one() {
        let spec = spec(4, 4);
        let one = render_distributed(&spec, 1, 1, RemainderPolicy::Reject).unwrap();
        let two = render_distributed(&spec, 2, 1, RemainderPolicy::Reject).unwrap();
        assert_eq!(one.image.as_bytes(), two.image.as_bytes());
    }

    #[test]
    fn uneven_split_with_last_worker_matches_one() {
        let spec = spec(9, 11);
        let one = render_distributed(&spec, 1, 1, RemainderPolicy::LastWorker).unwrap();
        for &workers in &[2, 3, 4, 5, 6, 10, 11] {
            for threads in 1..3 {
                let many =
                    render_distributed(&spec, workers, threads, RemainderPolicy::LastWorker)
                        .unwrap();
                assert_eq!(one.image.as_bytes(), many.image.as_bytes());
            }
        }
    }

    #[test]
    fn more_workers_than_rows_is_refused() {
        match render_distributed(&spec(4, 5), 6, 1, RemainderPolicy::LastWorker) {
            Err(Error::TooManyWorkers {
                height: 5,
                workers: 6,
            }) => {}
            other => panic!("unexpected {:?}", other.map(|g| g.timings)),
        }
    }

    #[test]
    fn truncate_blacks_out_the_tail() {
        let spec = spec(5, 7);
        let full = render_distributed(&spec, 1, 1, RemainderPolicy::Truncate).unwrap();
        let cut = render_distributed(&spec, 3, 1, RemainderPolicy::Truncate).unwrap();
        let row_len = spec.row_len();
        assert_eq!(cut.image.as_bytes().len(), 7 * row_len);
        assert_eq!(&cut.image.as_bytes()[..6 * row_len], &full.image.as_bytes()[..6 * row_len]);
        assert!(cut.image.as_bytes()[6 * row_len..].iter().all(|&b| b == 0));
    }

    #[test]
    fn reject_stops_before_rendering() {
        match render_distributed(&spec(4, 5), 2, 1, RemainderPolicy::Reject) {
            Err(Error::UnevenPartition { .. }) => {}
            other => panic!("unexpected {:?}", other.map(|g| g.timings)),
        }
    }

    #[test]
    fn run_writes_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            grid: spec(4, 4),
            workers: 2,
            threads: 1,
            remainder: RemainderPolicy::Reject,
            output: dir.path().join("mandelbrot.ppm"),
        };
        run(&config).unwrap();
        let written = fs::read(&config.output).unwrap();
        let header = b"P6\n4 4\n255\n";
        assert!(written.starts_with(header));
        assert_eq!(written.len(), header.len() + 48);
    }
}
