// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Combining the workers' bands into one image.
//!
//! The gather itself only knows about uniform byte chunks, so every
//! worker contributes exactly [`Partition::chunk_rows`] rows to it.
//! When the last worker owns more rows than that, the extra rows reach
//! the coordinator as a separate direct message, and [`assemble`]
//! appends them after the gathered bands.  Nothing is ever padded, so
//! the bytes in flight never exceed the size of the image.

use log::warn;

use crate::config::GridSpec;
use crate::error::Error;
use crate::output::GlobalBuffer;
use crate::partition::Partition;

/// Join per-rank chunks, given in rank order, into one buffer.  Every
/// chunk must be as long as the first; a mismatch is an error, never
/// silently truncated or padded.  The first chunk's allocation is
/// reused and each later chunk is freed as soon as it is copied in.
pub fn concatenate(chunks: Vec<Vec<u8>>) -> Result<Vec<u8>, Error> {
    let expected = chunks.first().map_or(0, |chunk| chunk.len());
    if let Some((rank, chunk)) = chunks
        .iter()
        .enumerate()
        .find(|(_, chunk)| chunk.len() != expected)
    {
        return Err(Error::ChunkMismatch {
            rank,
            expected,
            found: chunk.len(),
        });
    }

    let total = expected * chunks.len();
    let mut chunks = chunks.into_iter();
    let mut combined = chunks.next().unwrap_or_default();
    combined.reserve_exact(total - combined.len());
    for chunk in chunks {
        combined.extend_from_slice(&chunk);
    }
    Ok(combined)
}

/// Length in bytes of the chunk every worker contributes.
pub fn chunk_len(partition: &Partition, spec: &GridSpec) -> usize {
    partition.chunk_rows() * spec.row_len()
}

/// Length in bytes of the last worker's extra rows, sent outside the
/// gather.  Zero when the height divides evenly.
pub fn remainder_len(partition: &Partition, spec: &GridSpec) -> usize {
    partition.remainder_rows().len() * spec.row_len()
}

/// Turn the coordinator's gathered bytes, plus the last worker's extra
/// rows, back into a full image.  Any rows the partition left to nobody
/// are filled with black.
pub fn assemble(
    partition: &Partition,
    spec: &GridSpec,
    gathered: Vec<u8>,
    remainder: Vec<u8>,
) -> Result<GlobalBuffer, Error> {
    let gathered_rows = partition.workers() * partition.chunk_rows();
    if gathered.len() != gathered_rows * spec.row_len() {
        return Err(Error::BufferSize {
            width: spec.width(),
            height: gathered_rows,
            len: gathered.len(),
        });
    }
    if remainder.len() != remainder_len(partition, spec) {
        return Err(Error::BufferSize {
            width: spec.width(),
            height: partition.remainder_rows().len(),
            len: remainder.len(),
        });
    }

    let mut pixels = gathered;
    pixels.extend_from_slice(&remainder);

    let dropped = partition.dropped_rows();
    if !dropped.is_empty() {
        warn!(
            "rows {}..{} were assigned to no worker and are left black",
            dropped.start, dropped.end
        );
        pixels.resize(spec.row_len() * spec.height(), 0);
    }

    GlobalBuffer::from_raw(spec.width(), spec.height(), pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::RemainderPolicy;
    use num::Complex;

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
    fn concatenate_keeps_rank_order() {
        let combined = concatenate(vec![vec![0; 24], vec![1; 24]]).unwrap();
        assert_eq!(combined.len(), 48);
        assert!(combined[..24].iter().all(|&b| b == 0));
        assert!(combined[24..].iter().all(|&b| b == 1));
    }

    #[test]
    fn concatenate_rejects_uneven_chunks() {
        match concatenate(vec![vec![0; 24], vec![0; 24], vec![0; 21]]) {
            Err(Error::ChunkMismatch {
                rank: 2,
                expected: 24,
                found: 21,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn concatenate_of_nothing_is_empty() {
        assert_eq!(concatenate(vec![]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn assemble_appends_the_extra_rows() {
        // 3 rows over 2 workers: one row each through the gather, and
        // rank 1's second row sent on its own.
        let spec = spec(2, 3);
        let partition = Partition::new(3, 2, RemainderPolicy::LastWorker).unwrap();
        assert_eq!(chunk_len(&partition, &spec), 6);
        assert_eq!(remainder_len(&partition, &spec), 6);
        let mut gathered = vec![1; 6];
        gathered.extend(vec![2; 6]);
        let image = assemble(&partition, &spec, gathered, vec![3; 6]).unwrap();
        let mut expected = vec![1; 6];
        expected.extend(vec![2; 6]);
        expected.extend(vec![3; 6]);
        assert_eq!(image.as_bytes(), &expected[..]);
    }

    #[test]
    fn bytes_in_flight_never_exceed_the_image() {
        let spec = GridSpec::default();
        let image_len = spec.row_len() * spec.height();
        for &workers in &[1, 3, 7, 401, 500, 799, 800] {
            let partition =
                Partition::new(spec.height(), workers, RemainderPolicy::LastWorker).unwrap();
            let in_flight =
                chunk_len(&partition, &spec) * workers + remainder_len(&partition, &spec);
            assert_eq!(in_flight, image_len, "{} workers", workers);
        }
    }

    #[test]
    fn assemble_blanks_dropped_rows() {
        let spec = spec(2, 3);
        let partition = Partition::new(3, 2, RemainderPolicy::Truncate).unwrap();
        assert_eq!(remainder_len(&partition, &spec), 0);
        let image = assemble(&partition, &spec, vec![7; 12], Vec::new()).unwrap();
        let mut expected = vec![7; 12];
        expected.extend(vec![0; 6]);
        assert_eq!(image.as_bytes(), &expected[..]);
    }

    #[test]
    fn assemble_checks_the_gathered_length() {
        let spec = spec(2, 4);
        let partition = Partition::new(4, 2, RemainderPolicy::Reject).unwrap();
        assert!(assemble(&partition, &spec, vec![0; 23], Vec::new()).is_err());
    }

    #[test]
    fn assemble_checks_the_extra_rows() {
        let spec = spec(2, 3);
        let partition = Partition::new(3, 2, RemainderPolicy::LastWorker).unwrap();
        match assemble(&partition, &spec, vec![0; 12], vec![0; 12]) {
            Err(Error::BufferSize {
                width: 2,
                height: 1,
                len: 12,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
