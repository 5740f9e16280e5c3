use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::buffer::SequenceBuffer;
use crate::context::{render_context, CONTEXT_PADDING};
use crate::errors::{ScanError, ScanResult};
use crate::results::ScanSummary;

/// Contiguous range of candidate start positions owned by one worker.
///
/// A worker reads pattern bytes past `end` when a match straddles the
/// partition seam, but it only ever treats positions in `[start, end)` as
/// candidates, so adjacent workers cannot double-count a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Match/trial totals; shared once per scan behind a mutex that workers
/// take exactly once each, at merge time.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    matches: u64,
    trials: u64,
}

/// Splits the candidate start positions of `seq_len` among `workers`.
///
/// The base split is `floor(seq_len / workers)` positions per worker; the
/// last worker's range is extended over the `seq_len % workers` remainder so
/// every position is owned by exactly one worker. All ranges are clamped to
/// `[0, seq_len - pattern_len + 1)`: positions whose comparison window would
/// run past the end of the sequence can never match and are not trials.
/// Workers left with an empty range after clamping are not spawned.
fn partition_candidates(seq_len: usize, pattern_len: usize, workers: usize) -> Vec<Partition> {
    debug_assert!(pattern_len >= 1 && pattern_len <= seq_len && workers >= 1);
    let candidate_end = seq_len - pattern_len + 1;
    let chunk = seq_len / workers;

    if chunk == 0 {
        // Fewer bytes than workers; one worker covers everything.
        return vec![Partition {
            start: 0,
            end: candidate_end,
        }];
    }

    let mut partitions = Vec::with_capacity(workers);
    for i in 0..workers {
        let raw_start = i * chunk;
        let raw_end = if i + 1 == workers {
            seq_len
        } else {
            (i + 1) * chunk
        };
        let partition = Partition {
            start: raw_start.min(candidate_end),
            end: raw_end.min(candidate_end),
        };
        if partition.len() > 0 {
            partitions.push(partition);
        }
    }
    partitions
}

/// Walks one partition's start positions in increasing order, tallying every
/// position as a trial and every pattern-length byte equality as a match.
/// Private counters merge into the shared tally under the lock once, at the
/// end; the scan itself never takes the lock.
fn scan_partition(
    sequence: &[u8],
    pattern: &[u8],
    partition: Partition,
    emit_context: bool,
    shared: &Mutex<Tally>,
) {
    let mut local = Tally::default();

    for pos in partition.start..partition.end {
        local.trials += 1;
        if &sequence[pos..pos + pattern.len()] == pattern {
            local.matches += 1;
            if emit_context {
                println!("{}", render_context(sequence, pos, pattern.len(), CONTEXT_PADDING));
            }
        }
    }

    let mut tally = match shared.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    tally.matches += local.matches;
    tally.trials += local.trials;
}

/// Scans `buffer` for every occurrence of the literal `pattern` using
/// `thread_count` parallel workers.
///
/// The buffer is borrowed immutably for the whole call, so ingestion is
/// necessarily complete and nothing can mutate the sequence mid-scan. One OS
/// thread per non-empty partition is spawned fresh and joined before the call
/// returns; a worker that fails to join is a fatal error.
///
/// An empty pattern or one longer than the loaded sequence yields a zero
/// summary without spawning any workers.
///
/// With `emit_context` set, each worker prints one context line per match to
/// stdout; output from different workers interleaves in no particular order.
pub fn scan(
    buffer: &SequenceBuffer,
    pattern: &[u8],
    thread_count: NonZeroUsize,
    emit_context: bool,
) -> ScanResult<ScanSummary> {
    let started = Instant::now();

    if pattern.is_empty() || pattern.len() > buffer.len() {
        debug!(
            "degenerate scan: pattern length {} against {} buffered bytes",
            pattern.len(),
            buffer.len()
        );
        return Ok(ScanSummary::degenerate(started.elapsed()));
    }

    let partitions = partition_candidates(buffer.len(), pattern.len(), thread_count.get());
    info!(
        "scanning {} bytes with {} worker(s)",
        buffer.len(),
        partitions.len()
    );
    debug!("partitions: {:?}", partitions);

    let sequence = buffer.as_bytes();
    let shared = Mutex::new(Tally::default());

    thread::scope(|scope| -> ScanResult<()> {
        let shared = &shared;
        let mut handles = Vec::with_capacity(partitions.len());
        for partition in &partitions {
            let partition = *partition;
            handles.push(scope.spawn(move || {
                scan_partition(sequence, pattern, partition, emit_context, shared)
            }));
        }
        for handle in handles {
            handle.join().map_err(|_| ScanError::thread_error("join"))?;
        }
        Ok(())
    })?;

    let elapsed = started.elapsed();
    let tally = match shared.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    Ok(ScanSummary {
        match_count: tally.matches,
        trial_count: tally.trials,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_from(bytes: &[u8]) -> SequenceBuffer {
        let mut buffer = SequenceBuffer::with_capacity(bytes.len());
        buffer.append(bytes).unwrap();
        buffer
    }

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_partitions_tile_candidate_space() {
        // len 9, pattern 2: candidates are [0, 8).
        let partitions = partition_candidates(9, 2, 3);
        assert_eq!(
            partitions,
            vec![
                Partition { start: 0, end: 3 },
                Partition { start: 3, end: 6 },
                Partition { start: 6, end: 8 },
            ]
        );
    }

    #[test]
    fn test_last_partition_takes_remainder() {
        // len 10, 3 workers: chunk 3, remainder byte goes to the last worker.
        let partitions = partition_candidates(10, 1, 3);
        assert_eq!(partitions.last(), Some(&Partition { start: 6, end: 10 }));
        let covered: usize = partitions.iter().map(|p| p.len()).sum();
        assert_eq!(covered, 10);
    }

    #[test]
    fn test_more_workers_than_bytes_collapses_to_one() {
        let partitions = partition_candidates(3, 2, 8);
        assert_eq!(partitions, vec![Partition { start: 0, end: 2 }]);
    }

    #[test]
    fn test_long_pattern_empties_trailing_partitions() {
        // len 8, pattern 7: candidates [0, 2); later workers have nothing.
        let partitions = partition_candidates(8, 7, 4);
        assert_eq!(partitions, vec![Partition { start: 0, end: 2 }]);
    }

    #[test]
    fn test_single_worker_counts() {
        let buffer = buffer_from(b"ACGTACGTACGT");
        let summary = scan(&buffer, b"ACGT", workers(1), false).unwrap();
        assert_eq!(summary.match_count, 3);
        assert_eq!(summary.trial_count, 9);
    }

    #[test]
    fn test_match_straddling_partition_seam() {
        // 3 workers over 9 bytes: ranges 0-2, 3-5, 6-7 (clamped). The "BB"
        // at offsets 3 and 4 must be counted exactly once each.
        let buffer = buffer_from(b"AAABBBAAA");
        let summary = scan(&buffer, b"BB", workers(3), false).unwrap();
        assert_eq!(summary.match_count, 2);
    }

    #[test]
    fn test_no_match() {
        let buffer = buffer_from(b"AAAAAAAA");
        for n in [1, 2, 3, 8] {
            let summary = scan(&buffer, b"CCC", workers(n), false).unwrap();
            assert_eq!(summary.match_count, 0);
        }
    }

    #[test]
    fn test_empty_pattern_short_circuits() {
        let buffer = buffer_from(b"ACGT");
        let summary = scan(&buffer, b"", workers(4), false).unwrap();
        assert_eq!(summary.match_count, 0);
        assert_eq!(summary.trial_count, 0);
    }

    #[test]
    fn test_pattern_longer_than_buffer_short_circuits() {
        let buffer = buffer_from(b"ACG");
        let summary = scan(&buffer, b"ACGT", workers(2), false).unwrap();
        assert_eq!(summary.match_count, 0);
        assert_eq!(summary.trial_count, 0);
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        // 12 bytes: 1, 2, 3, 4, and 6 all divide evenly.
        let buffer = buffer_from(b"ACGTACGTACGT");
        let baseline = scan(&buffer, b"ACGT", workers(1), false).unwrap();
        for n in [2, 3, 4, 6] {
            let summary = scan(&buffer, b"ACGT", workers(n), false).unwrap();
            assert_eq!(summary.match_count, baseline.match_count, "workers = {n}");
        }
    }

    #[test]
    fn test_repeated_scans_are_idempotent() {
        let buffer = buffer_from(b"GGCCGGCCGGCC");
        let first = scan(&buffer, b"GGCC", workers(3), false).unwrap();
        let second = scan(&buffer, b"GGCC", workers(3), false).unwrap();
        assert_eq!(first.match_count, second.match_count);
        assert_eq!(first.trial_count, second.trial_count);
    }

    #[test]
    fn test_match_at_final_position() {
        let buffer = buffer_from(b"AAAAAGGCC");
        let summary = scan(&buffer, b"GGCC", workers(4), false).unwrap();
        assert_eq!(summary.match_count, 1);
    }

    #[test]
    fn test_pattern_equal_to_buffer() {
        let buffer = buffer_from(b"ACGT");
        let summary = scan(&buffer, b"ACGT", workers(2), false).unwrap();
        assert_eq!(summary.match_count, 1);
        assert_eq!(summary.trial_count, 1);
    }

    #[test]
    fn test_overlapping_matches_counted() {
        let buffer = buffer_from(b"AAAA");
        let summary = scan(&buffer, b"AA", workers(1), false).unwrap();
        assert_eq!(summary.match_count, 3);
        assert_eq!(summary.trial_count, 3);
    }
}
