//! The structural view of an attestation artifact that C3 needs.
//!
//! Hook payloads otherwise travel as opaque `Bytes` (design note in
//! `spec.md` §9: decode lazily, only where structure is required). This is
//! the one place structure is required: the re-aggregation pipeline groups
//! attestations by data root and merges their aggregation bitfields. No
//! cryptographic validation of the payload is performed or implied — the
//! "data root" below is a content hash used purely as a dedup/group key, as
//! per the Non-goals in `spec.md` §1.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("attestation artifact truncated")]
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttestation {
    /// Opaque `AttestationData`-equivalent bytes; only ever compared by
    /// content hash, never interpreted.
    pub data: Bytes,
    pub slot: u64,
    /// One entry per committee member; `true` means that member's vote is
    /// already folded into this attestation.
    pub aggregation_bits: Vec<bool>,
}

impl RawAttestation {
    pub fn new(data: Bytes, slot: u64, aggregation_bits: Vec<bool>) -> Self {
        RawAttestation {
            data,
            slot,
            aggregation_bits,
        }
    }

    /// Content hash of `data`, used as the dedup/group key (spec.md §4.3
    /// step 1). Not a cryptographic commitment to the attestation's
    /// validity — just a stable grouping key over opaque bytes.
    pub fn data_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        hasher.finish_into()
    }

    pub fn bit_count(&self) -> usize {
        self.aggregation_bits.iter().filter(|b| **b).count()
    }

    /// `true` iff every bit set in `other` is also set in `self`.
    pub fn bits_contain(&self, other: &RawAttestation) -> bool {
        if self.aggregation_bits.len() != other.aggregation_bits.len() {
            return false;
        }
        self.aggregation_bits
            .iter()
            .zip(other.aggregation_bits.iter())
            .all(|(mine, theirs)| *mine || !*theirs)
    }

    /// Bitwise OR of two same-length bitfields, used to merge a max-cover
    /// selection into one attestation (spec.md §4.3 step 2).
    pub fn merge_bits(a: &[bool], b: &[bool]) -> Vec<bool> {
        a.iter().zip(b.iter()).map(|(x, y)| *x || *y).collect()
    }

    /// A minimal internal wire encoding (not SSZ — no consensus-layer
    /// encoding is in scope per the Non-goals): slot, then the opaque data
    /// blob length-prefixed, then the bitfield length-prefixed and packed.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16 + self.data.len() + self.aggregation_bits.len() / 8 + 1);
        buf.put_u64_le(self.slot);
        buf.put_u32_le(self.data.len() as u32);
        buf.put_slice(&self.data);
        buf.put_u32_le(self.aggregation_bits.len() as u32);
        for chunk in self.aggregation_bits.chunks(8) {
            let mut byte = 0u8;
            for (i, bit) in chunk.iter().enumerate() {
                if *bit {
                    byte |= 1 << i;
                }
            }
            buf.put_u8(byte);
        }
        buf.freeze()
    }

    pub fn decode(mut bytes: Bytes) -> Result<Self, DecodeError> {
        if bytes.len() < 16 {
            return Err(DecodeError::Truncated);
        }
        let slot = bytes.get_u64_le();
        let data_len = bytes.get_u32_le() as usize;
        if bytes.len() < data_len + 4 {
            return Err(DecodeError::Truncated);
        }
        let data = bytes.copy_to_bytes(data_len);
        let bit_len = bytes.get_u32_le() as usize;
        let byte_len = bit_len.div_ceil(8);
        if bytes.len() < byte_len {
            return Err(DecodeError::Truncated);
        }
        let packed = bytes.copy_to_bytes(byte_len);
        let mut aggregation_bits = Vec::with_capacity(bit_len);
        for i in 0..bit_len {
            let byte = packed[i / 8];
            aggregation_bits.push(byte & (1 << (i % 8)) != 0);
        }
        Ok(RawAttestation {
            data,
            slot,
            aggregation_bits,
        })
    }
}

trait FinishInto {
    fn finish_into(self) -> [u8; 32];
}

impl FinishInto for Sha256 {
    fn finish_into(self) -> [u8; 32] {
        self.finalize().into()
    }
}
