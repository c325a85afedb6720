// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Collective operations between workers.
//!
//! A worker only ever talks to its peers through a [`Communicator`]:
//! a barrier, where everyone waits until everyone has arrived, and a
//! gather, where everyone hands over one chunk and the coordinator
//! receives all of them, concatenated in rank order.  Neither has a
//! timeout.  A worker that never shows up stalls the group.  Besides
//! the collectives there is one point-to-point path, from any worker
//! straight to the coordinator, for data that does not fit the
//! gather's uniform chunks.
//!
//! [`ThreadComm`] implements all of it for workers running as threads
//! in a single process, using a shared barrier and channels to the
//! coordinator.

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::trace;
use std::sync::{Arc, Barrier};

use crate::aggregate::concatenate;
use crate::error::Error;

/// The rank that receives the result of a gather.
pub const COORDINATOR: usize = 0;

/// A worker's view of its group.
pub trait Communicator {
    /// This worker's rank, in `0..size()`.
    fn rank(&self) -> usize;

    /// Number of workers in the group.
    fn size(&self) -> usize;

    /// Block until every worker in the group has called `barrier`.
    fn barrier(&self);

    /// Contribute `chunk` to the group's gather.  Blocks until every
    /// worker has contributed.  The coordinator gets `Some` with every
    /// chunk concatenated in rank order; everybody else gets `None`.
    /// All chunks must be the same length.
    fn gather(&self, chunk: Vec<u8>) -> Result<Option<Vec<u8>>, Error>;

    /// Send `payload` straight to the coordinator.  Does not wait for
    /// it to be received.
    fn send_to_coordinator(&self, payload: Vec<u8>) -> Result<(), Error>;

    /// On the coordinator, block until the next direct message arrives
    /// and check that it came from `rank`.
    fn receive_from(&self, rank: usize) -> Result<Vec<u8>, Error>;

    /// Whether this worker is the one that receives gathers.
    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR
    }
}

type Envelope = (usize, Vec<u8>);

/// A member of a group of worker threads.
pub struct ThreadComm {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
    outbox: Option<Sender<Envelope>>,
    inbox: Option<Receiver<Envelope>>,
    direct_outbox: Sender<Envelope>,
    direct_inbox: Option<Receiver<Envelope>>,
}

impl ThreadComm {
    /// Build a group of `size` communicators, one per worker, in rank
    /// order.  Each one is meant to be moved into its own thread.
    pub fn world(size: usize) -> Vec<ThreadComm> {
        let barrier = Arc::new(Barrier::new(size));
        let (sender, receiver) = unbounded();
        let (direct_sender, direct_receiver) = unbounded();
        let mut inbox = Some(receiver);
        let mut direct_inbox = Some(direct_receiver);
        (0..size)
            .map(|rank| {
                let coordinator = rank == COORDINATOR;
                ThreadComm {
                    rank,
                    size,
                    barrier: barrier.clone(),
                    outbox: if coordinator {
                        None
                    } else {
                        Some(sender.clone())
                    },
                    inbox: if coordinator { inbox.take() } else { None },
                    direct_outbox: direct_sender.clone(),
                    direct_inbox: if coordinator {
                        direct_inbox.take()
                    } else {
                        None
                    },
                }
            })
            .collect()
    }

    fn collect(&self, inbox: &Receiver<Envelope>, own: Vec<u8>) -> Result<Vec<Vec<u8>>, Error> {
        let mut chunks: Vec<Option<Vec<u8>>> = vec![None; self.size];
        chunks[self.rank] = Some(own);
        for _ in 1..self.size {
            let (rank, chunk) = inbox
                .recv()
                .map_err(|_| Error::Disconnected { rank: self.rank })?;
            trace!("coordinator received {} bytes from rank {}", chunk.len(), rank);
            chunks[rank] = Some(chunk);
        }
        chunks
            .into_iter()
            .map(|chunk| chunk.ok_or(Error::Disconnected { rank: self.rank }))
            .collect()
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) {
        self.barrier.wait();
    }

    fn gather(&self, chunk: Vec<u8>) -> Result<Option<Vec<u8>>, Error> {
        match (&self.inbox, &self.outbox) {
            (Some(inbox), _) => {
                let chunks = self.collect(inbox, chunk);
                // Release the senders before reporting anything.
                self.barrier.wait();
                concatenate(chunks?).map(Some)
            }
            (None, Some(outbox)) => {
                let sent = outbox
                    .send((self.rank, chunk))
                    .map_err(|_| Error::Disconnected { rank: self.rank });
                self.barrier.wait();
                sent.map(|_| None)
            }
            (None, None) => Err(Error::Disconnected { rank: self.rank }),
        }
    }

    fn send_to_coordinator(&self, payload: Vec<u8>) -> Result<(), Error> {
        self.direct_outbox
            .send((self.rank, payload))
            .map_err(|_| Error::Disconnected { rank: self.rank })
    }

    fn receive_from(&self, rank: usize) -> Result<Vec<u8>, Error> {
        let inbox = self
            .direct_inbox
            .as_ref()
            .ok_or(Error::Disconnected { rank: self.rank })?;
        let (found, payload) = inbox
            .recv()
            .map_err(|_| Error::Disconnected { rank: self.rank })?;
        if found != rank {
            return Err(Error::UnexpectedSender {
                expected: rank,
                found,
            });
        }
        trace!("coordinator received {} direct bytes from rank {}", payload.len(), rank);
        Ok(payload)
    }
}
