//! Step 1 of the re-aggregation pipeline (spec.md §4.3): drop attestations
//! whose bits are already a subset of another attestation covering the same
//! data root. Grounded on the Go service's `Dedup` over `atts.go`.

use crate::attestation::RawAttestation;
use std::collections::HashMap;

/// Removes any attestation whose aggregation bits are a subset of another
/// attestation sharing its data root. Ties (equal bitsets) keep the first
/// occurrence. Grouping is by data root; attestations in different groups
/// never shadow each other.
pub fn dedup_by_containment(atts: Vec<RawAttestation>) -> Vec<RawAttestation> {
    let mut groups: HashMap<[u8; 32], Vec<RawAttestation>> = HashMap::new();
    for att in atts {
        groups.entry(att.data_root()).or_default().push(att);
    }

    let mut out = Vec::new();
    for (_, group) in groups {
        out.extend(dedup_group(group));
    }
    out
}

fn dedup_group(group: Vec<RawAttestation>) -> Vec<RawAttestation> {
    let mut kept: Vec<RawAttestation> = Vec::with_capacity(group.len());
    'outer: for candidate in group {
        let mut i = 0;
        while i < kept.len() {
            if kept[i].bits_contain(&candidate) {
                // an existing kept attestation already covers candidate.
                continue 'outer;
            }
            if candidate.bits_contain(&kept[i]) {
                kept.remove(i);
                continue;
            }
            i += 1;
        }
        kept.push(candidate);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn att(data: &'static [u8], slot: u64, bits: &[bool]) -> RawAttestation {
        RawAttestation::new(Bytes::from_static(data), slot, bits.to_vec())
    }

    #[test]
    fn subset_is_dropped() {
        let sup = att(b"x", 1, &[true, true, false]);
        let sub = att(b"x", 1, &[true, false, false]);
        let out = dedup_by_containment(vec![sup.clone(), sub]);
        assert_eq!(out, vec![sup]);
    }

    #[test]
    fn disjoint_attestations_both_survive() {
        let a = att(b"x", 1, &[true, false]);
        let b = att(b"x", 1, &[false, true]);
        let out = dedup_by_containment(vec![a.clone(), b.clone()]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn different_data_roots_never_shadow() {
        let a = att(b"x", 1, &[true]);
        let b = att(b"y", 1, &[true]);
        let out = dedup_by_containment(vec![a, b]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn exact_duplicates_collapse_to_one() {
        let a = att(b"x", 1, &[true, false]);
        let b = att(b"x", 1, &[true, false]);
        let out = dedup_by_containment(vec![a, b]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(dedup_by_containment(vec![]).is_empty());
    }
}
