//! Binary codec
//!
//! Encoding and decoding of the checksummed record format described in the
//! module docs of [`crate::codec`].

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::dictionary::{key_problem, MAX_KEY_LEN, MIN_KEY_LEN};
use crate::error::{DictError, Result};
use crate::id::Id;

use super::{Records, CHECKSUM_SIZE, RECORD_SEPARATOR};

/// Smallest record: id + 1-byte key + separator
pub fn min_record_size<W: Id>() -> usize {
    W::SIZE + MIN_KEY_LEN + 1
}

/// Largest record: id + 128-byte key + separator
pub fn max_record_size<W: Id>() -> usize {
    W::SIZE + MAX_KEY_LEN + 1
}

/// Upper bound on the encoded size of `entries` records, header included
pub fn encoded_len_bound<W: Id>(entries: usize) -> usize {
    CHECKSUM_SIZE + W::SIZE + max_record_size::<W>() * entries
}

/// Soft ceiling on a blob holding every id of width `W`. Not enforced.
pub fn max_blob_size<W: Id>() -> u64 {
    W::MAX.to_u64() * max_record_size::<W>() as u64
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode `last_id` and `(key, id)` entries.
///
/// Format: crc32 (4) + last_id (W) + [id (W) + key + 0x1E]*
pub fn encode<'a, W, I>(last_id: W, entries: I) -> Bytes
where
    W: Id,
    I: ExactSizeIterator<Item = (&'a str, W)>,
{
    let mut buf = BytesMut::with_capacity(encoded_len_bound::<W>(entries.len()));

    // Checksum slot, filled in once the payload is complete
    buf.put_u32(0);
    last_id.put(&mut buf);

    for (key, id) in entries {
        id.put(&mut buf);
        buf.put_slice(key.as_bytes());
        buf.put_u8(RECORD_SEPARATOR);
    }

    let crc = crc32fast::hash(&buf[CHECKSUM_SIZE..]);
    buf[..CHECKSUM_SIZE].copy_from_slice(&crc.to_be_bytes());

    buf.freeze()
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a blob produced by [`encode`].
///
/// Fails with `Corrupt` on a checksum mismatch, a zero id, a record without
/// a separator, a short header, or a key that is not UTF-8 or would be
/// rejected by [`crate::validate_key`]. Trailing bytes too short to form a
/// record are ignored.
pub fn decode<W: Id>(raw: &[u8]) -> Result<Records<W>> {
    let header_size = CHECKSUM_SIZE + W::SIZE;
    if raw.len() < header_size {
        return Err(corrupt(format!(
            "blob is {} bytes, header needs {}",
            raw.len(),
            header_size
        )));
    }

    let (mut checksum, payload) = raw.split_at(CHECKSUM_SIZE);
    let stored = checksum.get_u32();
    let computed = crc32fast::hash(payload);
    if stored != computed {
        return Err(corrupt(format!(
            "checksum mismatch: stored 0x{:08x}, computed 0x{:08x}",
            stored, computed
        )));
    }

    let mut buf = payload;
    let last_id = W::get(&mut buf);

    let min_record = min_record_size::<W>();
    let mut entries = Vec::with_capacity(buf.len() / min_record);

    while buf.remaining() >= min_record {
        let offset = raw.len() - buf.remaining();

        let id = W::get(&mut buf);
        if id.is_zero() {
            return Err(corrupt(format!("zero id in record at offset {}", offset)));
        }

        let key_len = buf
            .iter()
            .position(|&b| b == RECORD_SEPARATOR)
            .ok_or_else(|| {
                corrupt(format!(
                    "record for id {} at offset {} has no separator",
                    id, offset
                ))
            })?;

        let key = std::str::from_utf8(&buf[..key_len])
            .map_err(|e| {
                corrupt(format!(
                    "key for id {} at offset {} is not UTF-8: {}",
                    id, offset, e
                ))
            })?
            .to_owned();
        if let Some(reason) = key_problem(&key) {
            return Err(corrupt(format!(
                "key for id {} at offset {}: {}",
                id, offset, reason
            )));
        }

        buf.advance(key_len + 1);
        entries.push((id, key));
    }

    Ok(Records { last_id, entries })
}

fn corrupt(reason: String) -> DictError {
    warn!(%reason, "rejecting dictionary blob");
    DictError::Corrupt(reason)
}
