/// Bytes of surrounding sequence shown on each side of a match.
pub const CONTEXT_PADDING: usize = 8;

/// Width of the right-aligned offset column in a rendered context line.
const OFFSET_COLUMN_WIDTH: usize = 15;

/// Renders a match and its surrounding bytes for diagnostic output.
///
/// The window is `[match_start - padding, match_start + match_len + padding)`
/// clamped to the valid sequence; the matched span is wrapped in `[` `]` and
/// space padding keeps the columns aligned when the window is clamped at
/// either end of the buffer. The line ends with the match's offset into the
/// sequence, right-aligned.
///
/// Read-only over shared data, so workers may call it concurrently.
///
/// # Panics
///
/// Panics if `match_start + match_len` exceeds `seq.len()`; callers only pass
/// spans they have already verified as matches.
pub fn render_context(seq: &[u8], match_start: usize, match_len: usize, padding: usize) -> String {
    let match_end = match_start + match_len;
    assert!(match_end <= seq.len(), "match span out of bounds");

    let first = match_start.saturating_sub(padding);
    let last = (match_end + padding).min(seq.len());

    let mut out = String::with_capacity(last - first + 2 * padding + OFFSET_COLUMN_WIDTH + 2);

    // Left padding compensates for a window clamped at the start of the
    // sequence so the bracket column lines up across matches.
    for _ in 0..(padding - (match_start - first)) {
        out.push(' ');
    }

    for (pos, &byte) in seq[first..last].iter().enumerate().map(|(i, b)| (first + i, b)) {
        if pos == match_start {
            out.push('[');
        }
        out.push(byte as char);
        if pos + 1 == match_end {
            out.push(']');
        }
    }

    for _ in 0..(padding - (last - match_end)) {
        out.push(' ');
    }

    out.push_str(&format!("{:>width$}", match_start, width = OFFSET_COLUMN_WIDTH));
    out
}
