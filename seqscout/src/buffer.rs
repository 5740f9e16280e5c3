use crate::errors::{ScanError, ScanResult};

/// Fixed-capacity arena for concatenated genomic residue bytes.
///
/// The arena is allocated once, up front, at a caller-supplied capacity and
/// never grows: sequence data routinely runs to gigabytes, and reallocating
/// mid-load would double peak memory. An append that would overflow the
/// capacity is an error, not a truncation.
///
/// Bytes `[0, len)` are valid residue data with headers and line terminators
/// already stripped by the loader. Once a scan borrows the buffer it is
/// read-only for the duration of the borrow.
#[derive(Debug)]
pub struct SequenceBuffer {
    arena: Vec<u8>,
    capacity: usize,
}

impl SequenceBuffer {
    /// Allocates the full arena immediately. Allocation failure aborts the
    /// process, which is the intended behavior for an explicit memory budget.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Copies `bytes` in at the append cursor.
    ///
    /// Fails with [`ScanError::CapacityExceeded`] if the append would push
    /// the stored length past the fixed capacity; the buffer is left
    /// unchanged in that case.
    pub fn append(&mut self, bytes: &[u8]) -> ScanResult<()> {
        if self.arena.len() + bytes.len() > self.capacity {
            return Err(ScanError::CapacityExceeded {
                length: self.arena.len(),
                requested: bytes.len(),
                capacity: self.capacity,
            });
        }
        self.arena.extend_from_slice(bytes);
        Ok(())
    }

    /// Read-only view of the valid `[0, len)` region.
    pub fn as_bytes(&self) -> &[u8] {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_advances_length() {
        let mut buffer = SequenceBuffer::with_capacity(16);
        assert!(buffer.is_empty());

        buffer.append(b"ACGT").unwrap();
        buffer.append(b"GGCC").unwrap();

        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.as_bytes(), b"ACGTGGCC");
        assert_eq!(buffer.capacity(), 16);
    }

    #[test]
    fn test_append_to_exact_capacity() {
        let mut buffer = SequenceBuffer::with_capacity(4);
        buffer.append(b"ACGT").unwrap();
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_append_past_capacity_fails() {
        let mut buffer = SequenceBuffer::with_capacity(6);
        buffer.append(b"ACGT").unwrap();

        let err = buffer.append(b"ACGT").unwrap_err();
        assert!(matches!(
            err,
            ScanError::CapacityExceeded {
                length: 4,
                requested: 4,
                capacity: 6,
            }
        ));

        // Failed append leaves the buffer untouched.
        assert_eq!(buffer.as_bytes(), b"ACGT");
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut buffer = SequenceBuffer::with_capacity(4);
        buffer.append(b"").unwrap();
        assert!(buffer.is_empty());
    }
}
