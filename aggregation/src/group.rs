//! Step 2 of the re-aggregation pipeline (spec.md §4.3): per data-root
//! max-cover merge, producing a minimal set of merged attestations whose
//! union of bits equals the group's union (overlaps across output
//! attestations are permitted). Grounded on the Go service's use of a
//! max-cover aggregator in `atts.go` ahead of `SortByProfitabilityUsingMaxCover`.

use crate::attestation::RawAttestation;
use crate::cover::greedy_cover;
use std::collections::HashMap;

/// Merges each data-root group independently; attestations in different
/// groups are untouched by each other.
pub fn merge_groups(atts: Vec<RawAttestation>) -> Vec<RawAttestation> {
    let mut groups: HashMap<[u8; 32], Vec<RawAttestation>> = HashMap::new();
    for att in atts {
        groups.entry(att.data_root()).or_default().push(att);
    }

    let mut out = Vec::new();
    for (_, group) in groups {
        out.extend(merge_group(group));
    }
    out
}

/// Greedily covers the group's bit union, then for each selected seed tries
/// to fold in any other candidate whose bits are disjoint from what's
/// already folded in (a merge that would double-count no bit).
fn merge_group(mut group: Vec<RawAttestation>) -> Vec<RawAttestation> {
    if group.len() <= 1 {
        return group;
    }

    let bitfields: Vec<Vec<bool>> = group.iter().map(|a| a.aggregation_bits.clone()).collect();
    let (selected, _) = greedy_cover(&bitfields);

    let mut used = vec![false; group.len()];
    let mut merged_out = Vec::with_capacity(selected.len());

    for &seed_idx in &selected {
        if used[seed_idx] {
            continue;
        }
        used[seed_idx] = true;
        let mut merged_bits = group[seed_idx].aggregation_bits.clone();

        loop {
            let mut folded_any = false;
            for i in 0..group.len() {
                if used[i] {
                    continue;
                }
                let candidate = &group[i].aggregation_bits;
                let disjoint = merged_bits
                    .iter()
                    .zip(candidate.iter())
                    .all(|(m, c)| !(*m && *c));
                let adds_coverage = candidate.iter().zip(merged_bits.iter()).any(|(c, m)| *c && !*m);
                if disjoint && adds_coverage {
                    merged_bits = RawAttestation::merge_bits(&merged_bits, candidate);
                    used[i] = true;
                    folded_any = true;
                }
            }
            if !folded_any {
                break;
            }
        }

        let seed = &group[seed_idx];
        merged_out.push(RawAttestation::new(seed.data.clone(), seed.slot, merged_bits));
    }

    // anything the cover pass left unselected (fully redundant, zero new
    // coverage) never had a bit that mattered, so it is safely dropped.
    let _ = std::mem::take(&mut group);
    merged_out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn att(data: &'static [u8], slot: u64, bits: &[bool]) -> RawAttestation {
        RawAttestation::new(Bytes::from_static(data), slot, bits.to_vec())
    }

    fn union(a: &RawAttestation) -> usize {
        a.bit_count()
    }

    #[test]
    fn disjoint_same_root_attestations_merge_into_one() {
        let a = att(b"x", 1, &[true, false, false]);
        let b = att(b"x", 1, &[false, true, false]);
        let out = merge_groups(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(union(&out[0]), 2);
    }

    #[test]
    fn single_attestation_group_is_unchanged() {
        let a = att(b"x", 1, &[true, false]);
        let out = merge_groups(vec![a.clone()]);
        assert_eq!(out, vec![a]);
    }

    #[test]
    fn distinct_data_roots_never_merge() {
        let a = att(b"x", 1, &[true, false]);
        let b = att(b"y", 1, &[false, true]);
        let out = merge_groups(vec![a, b]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn overlapping_attestations_are_not_folded_together() {
        // a and b overlap on bit 0, so merging them would double count it;
        // the merge step must keep them separate.
        let a = att(b"x", 1, &[true, true, false]);
        let b = att(b"x", 1, &[true, false, true]);
        let out = merge_groups(vec![a, b]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(merge_groups(vec![]).is_empty());
    }
}
