//! The full re-aggregation pipeline (spec.md §4.3, `rePackAttestation`):
//!
//! 1. dedup by containment
//! 2. max-cover merge per data-root group
//! 3. dedup by containment again (merging can produce new containments)
//! 4. sort by profitability
//! 5. cap at the block's maximum attestation count
//!
//! Grounded on the Go service's `RepackAttestations` orchestration over
//! `Dedup` / max-cover aggregate / `SortByProfitabilityUsingMaxCover` /
//! `LimitToMaxAttestations` in `atts.go`.

use crate::attestation::RawAttestation;
use crate::dedup::dedup_by_containment;
use crate::group::merge_groups;
use crate::profitability::sort_by_profitability;

pub fn repack(atts: Vec<RawAttestation>, max_attestations: usize) -> Vec<RawAttestation> {
    let deduped = dedup_by_containment(atts);
    let merged = merge_groups(deduped);
    let deduped_again = dedup_by_containment(merged);
    let mut sorted = sort_by_profitability(deduped_again);
    sorted.truncate(max_attestations);
    sorted
}
