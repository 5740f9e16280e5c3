use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seqscout::{scan, SequenceBuffer};
use std::num::NonZeroUsize;

// Deterministic pseudo-random residues so runs are comparable.
fn synthetic_sequence(len: usize) -> Vec<u8> {
    const RESIDUES: [u8; 4] = *b"ACGT";
    let mut state: u64 = 0x5eed_5eed_5eed_5eed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            RESIDUES[(state >> 33) as usize % 4]
        })
        .collect()
}

fn bench_scan_thread_counts(c: &mut Criterion) {
    let sequence = synthetic_sequence(4 * 1024 * 1024);
    let mut buffer = SequenceBuffer::with_capacity(sequence.len());
    buffer.append(&sequence).unwrap();

    let mut group = c.benchmark_group("scan_4mb");
    for threads in [1usize, 2, 4, 8] {
        group.bench_function(format!("{threads}_threads"), |b| {
            let workers = NonZeroUsize::new(threads).unwrap();
            b.iter(|| {
                let summary = scan(&buffer, black_box(b"GATTACA"), workers, false).unwrap();
                black_box(summary.match_count)
            })
        });
    }
    group.finish();
}

fn bench_pattern_lengths(c: &mut Criterion) {
    let sequence = synthetic_sequence(1024 * 1024);
    let mut buffer = SequenceBuffer::with_capacity(sequence.len());
    buffer.append(&sequence).unwrap();
    let workers = NonZeroUsize::new(4).unwrap();

    let mut group = c.benchmark_group("pattern_length_1mb");
    for pattern in [&b"AC"[..], b"GATTACA", b"ACGTACGTACGTACGT"] {
        group.bench_function(format!("len_{}", pattern.len()), |b| {
            b.iter(|| {
                let summary = scan(&buffer, black_box(pattern), workers, false).unwrap();
                black_box(summary.trial_count)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan_thread_counts, bench_pattern_lengths);
criterion_main!(benches);
