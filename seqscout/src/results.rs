use std::time::Duration;

/// Aggregate outcome of one scan over the sequence buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Occurrences of the pattern found
    pub match_count: u64,
    /// Candidate start positions examined
    pub trial_count: u64,
    /// Wall time from worker spawn to final join
    pub elapsed: Duration,
}

impl ScanSummary {
    /// Summary for a scan that could not contain a match (empty pattern,
    /// pattern longer than the buffer). No workers run; counts are zero.
    pub fn degenerate(elapsed: Duration) -> Self {
        Self {
            match_count: 0,
            trial_count: 0,
            elapsed,
        }
    }
}
