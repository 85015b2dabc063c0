use std::iter::FusedIterator;

pub const CHUNK_SIZE: usize = 65_536;
const CHUNK_BYTES: u64 = 65_536;

static FILLER: [u8; CHUNK_SIZE] = [b'x'; CHUNK_SIZE];

/// Upload payload: `size` bytes of `x`, yielded in chunks of at most
/// [`CHUNK_SIZE`] bytes. Only the last chunk may be shorter.
#[derive(Debug, Clone)]
pub struct TestData {
    remaining: u64,
}

impl TestData {
    #[must_use]
    pub const fn new(size: u64) -> Self {
        Self { remaining: size }
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for TestData {
    type Item = &'static [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let len = usize::try_from(self.remaining).map_or(CHUNK_SIZE, |left| left.min(CHUNK_SIZE));
        let taken = u64::try_from(len).unwrap_or(self.remaining);
        self.remaining = self.remaining.saturating_sub(taken);
        FILLER.get(..len)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let chunks = self.remaining.div_ceil(CHUNK_BYTES);
        let chunks = usize::try_from(chunks).unwrap_or(usize::MAX);
        (chunks, Some(chunks))
    }
}

impl FusedIterator for TestData {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_boundaries() -> Result<(), String> {
        let cases: [(u64, usize, usize); 6] = [
            (0, 0, 0),
            (1, 1, 1),
            (65_535, 1, 65_535),
            (65_536, 1, 65_536),
            (65_537, 2, 1),
            (10_485_760, 160, 65_536),
        ];
        for (size, expected_chunks, expected_last) in cases {
            let chunks: Vec<&[u8]> = TestData::new(size).collect();
            if chunks.len() != expected_chunks {
                return Err(format!("{} bytes gave {} chunks", size, chunks.len()));
            }
            let total: u64 = chunks
                .iter()
                .map(|chunk| u64::try_from(chunk.len()).unwrap_or(u64::MAX))
                .sum();
            if total != size {
                return Err(format!("{} bytes summed to {}", size, total));
            }
            if chunks.iter().any(|chunk| chunk.len() > CHUNK_SIZE) {
                return Err(format!("Oversized chunk for {} bytes", size));
            }
            let last = chunks.last().map_or(0, |chunk| chunk.len());
            if last != expected_last {
                return Err(format!("{} bytes ended with a {} byte chunk", size, last));
            }
            if chunks
                .iter()
                .any(|chunk| chunk.iter().any(|byte| *byte != b'x'))
            {
                return Err("Unexpected payload byte".to_owned());
            }
        }
        Ok(())
    }

    #[test]
    fn size_hint_is_exact() -> Result<(), String> {
        let mut data = TestData::new(65_537);
        if data.size_hint() != (2, Some(2)) {
            return Err(format!("Unexpected size hint {:?}", data.size_hint()));
        }
        let _first = data.next();
        if data.size_hint() != (1, Some(1)) || data.remaining() != 1 {
            return Err("Unexpected state after one chunk".to_owned());
        }
        Ok(())
    }

    #[test]
    fn exhausted_payload_stays_empty() -> Result<(), String> {
        let mut data = TestData::new(3);
        let _first = data.next();
        if data.next().is_some() || data.next().is_some() {
            return Err("Payload restarted after exhaustion".to_owned());
        }
        Ok(())
    }
}
