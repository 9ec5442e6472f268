//! Attestation re-aggregation (component C3). Used by `block.get_attestations`
//! and `block.get_attestations_for_block` hook handlers to repack cached
//! attestations into the smallest profitable set before proposal.

mod attestation;
mod cover;
mod dedup;
mod group;
mod pipeline;
mod profitability;

pub use attestation::{DecodeError, RawAttestation};
pub use pipeline::repack;
