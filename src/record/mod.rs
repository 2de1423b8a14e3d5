pub mod sample;

pub use sample::Sample;

/// Encodes `samples` back to back into the front of `out`.
///
/// Returns the number of bytes written, or `None` if `out` is too short.
pub fn encode_into(samples: &[Sample], out: &mut [u8]) -> Option<usize> {
    let len = samples.len().checked_mul(Sample::SIZE)?;
    let out = out.get_mut(..len)?;
    for (chunk, sample) in out.chunks_exact_mut(Sample::SIZE).zip(samples) {
        chunk.copy_from_slice(&sample.to_bytes());
    }
    Some(len)
}

/// Decodes as many whole records as fit in both `bytes` and `out`.
///
/// Returns the number of records decoded.
pub fn decode_from(bytes: &[u8], out: &mut [Sample]) -> usize {
    let mut count = 0;
    for (chunk, slot) in bytes.chunks_exact(Sample::SIZE).zip(out.iter_mut()) {
        let mut raw = [0u8; Sample::SIZE];
        raw.copy_from_slice(chunk);
        *slot = Sample::from_bytes(&raw);
        count += 1;
    }
    count
}
