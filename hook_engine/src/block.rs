//! The structural view of a block artifact (spec.md §3): just enough to
//! read/rewrite its attestation list for `rePackAttestation`. Grounded on
//! the same "decode lazily, stay opaque otherwise" design note as
//! `aggregation::RawAttestation`; no SSZ or consensus-level block encoding
//! is in scope (Non-goals).
//!
//! The core supports exactly one block variant, `Deneb`; every other tag
//! decodes fine but is rejected by actions that need to rewrite the block
//! (spec.md §9 design note, resolved per the Open Question: the Deneb
//! branch succeeds, every other branch is `UnsupportedBlockVariant`).

use aggregation::RawAttestation;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("block artifact truncated")]
    Truncated,
    #[error("unsupported block variant {0}")]
    UnsupportedVariant(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockVariant {
    Deneb,
    Other,
}

impl BlockVariant {
    fn tag(self) -> u8 {
        match self {
            BlockVariant::Deneb => 0,
            BlockVariant::Other => 255,
        }
    }

    fn from_tag(tag: u8) -> Self {
        match tag {
            0 => BlockVariant::Deneb,
            _ => BlockVariant::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub slot: u64,
    pub variant: BlockVariant,
    pub attestations: Vec<RawAttestation>,
}

impl RawBlock {
    pub fn new(slot: u64, variant: BlockVariant, attestations: Vec<RawAttestation>) -> Self {
        RawBlock {
            slot,
            variant,
            attestations,
        }
    }

    /// Fails for every variant but `Deneb` — the one the core can rewrite.
    /// Mirrors the Go source's `GetDenebBlockFromGenericSignedBlock`, fixed
    /// per the Open Question: success on `Deneb`, error elsewhere.
    pub fn require_deneb(&self) -> Result<(), BlockError> {
        match self.variant {
            BlockVariant::Deneb => Ok(()),
            BlockVariant::Other => Err(BlockError::UnsupportedVariant("Other".to_string())),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_u64_le(self.slot);
        buf.put_u8(self.variant.tag());
        buf.put_u32_le(self.attestations.len() as u32);
        for att in &self.attestations {
            let encoded = att.encode();
            buf.put_u32_le(encoded.len() as u32);
            buf.put_slice(&encoded);
        }
        buf.freeze()
    }

    pub fn decode(mut bytes: Bytes) -> Result<Self, BlockError> {
        if bytes.len() < 13 {
            return Err(BlockError::Truncated);
        }
        let slot = bytes.get_u64_le();
        let variant = BlockVariant::from_tag(bytes.get_u8());
        let count = bytes.get_u32_le() as usize;
        let mut attestations = Vec::with_capacity(count);
        for _ in 0..count {
            if bytes.len() < 4 {
                return Err(BlockError::Truncated);
            }
            let len = bytes.get_u32_le() as usize;
            if bytes.len() < len {
                return Err(BlockError::Truncated);
            }
            let chunk = bytes.copy_to_bytes(len);
            attestations.push(RawAttestation::decode(chunk).map_err(|_| BlockError::Truncated)?);
        }
        Ok(RawBlock {
            slot,
            variant,
            attestations,
        })
    }
}
