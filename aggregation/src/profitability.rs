//! Step 4 of the re-aggregation pipeline (spec.md §4.3): order attestations
//! by profitability for block inclusion. Grounded on the Go service's
//! `SortByProfitabilityUsingMaxCover` in `atts.go`: group by slot (highest
//! slot first), and within each slot group run a greedy max-cover selection
//! so attestations that usefully extend coverage sort ahead of redundant
//! ones, each half ordered by descending bit count.

use crate::attestation::RawAttestation;
use crate::cover::greedy_cover;
use std::collections::BTreeMap;

pub fn sort_by_profitability(atts: Vec<RawAttestation>) -> Vec<RawAttestation> {
    let mut by_slot: BTreeMap<u64, Vec<RawAttestation>> = BTreeMap::new();
    for att in atts {
        by_slot.entry(att.slot).or_default().push(att);
    }

    let mut out = Vec::new();
    for (_, group) in by_slot.into_iter().rev() {
        out.extend(order_slot_group(group));
    }
    out
}

fn order_slot_group(group: Vec<RawAttestation>) -> Vec<RawAttestation> {
    let bitfields: Vec<Vec<bool>> = group.iter().map(|a| a.aggregation_bits.clone()).collect();
    let (selected, leftover) = greedy_cover(&bitfields);

    let mut selected_atts: Vec<RawAttestation> = selected.iter().map(|&i| group[i].clone()).collect();
    let mut leftover_atts: Vec<RawAttestation> = leftover.iter().map(|&i| group[i].clone()).collect();

    selected_atts.sort_by(|a, b| b.bit_count().cmp(&a.bit_count()));
    leftover_atts.sort_by(|a, b| b.bit_count().cmp(&a.bit_count()));

    selected_atts.extend(leftover_atts);
    selected_atts
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn att(data: &'static [u8], slot: u64, bits: &[bool]) -> RawAttestation {
        RawAttestation::new(Bytes::from_static(data), slot, bits.to_vec())
    }

    #[test]
    fn higher_slots_sort_first() {
        let low = att(b"a", 1, &[true]);
        let high = att(b"b", 2, &[true]);
        let out = sort_by_profitability(vec![low, high.clone()]);
        assert_eq!(out[0].slot, 2);
    }

    #[test]
    fn within_slot_selected_come_before_leftover() {
        let a = att(b"x", 1, &[true, true, false]);
        let b = att(b"y", 1, &[true, false, false]); // redundant, covered by a already
        let out = sort_by_profitability(vec![a.clone(), b.clone()]);
        assert_eq!(out[0], a);
        assert_eq!(out[1], b);
    }

    #[test]
    fn within_selection_higher_bit_count_first() {
        let small = att(b"x", 1, &[true, false, false]);
        let big = att(b"y", 1, &[false, true, true]);
        let out = sort_by_profitability(vec![small, big.clone()]);
        assert_eq!(out[0], big);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(sort_by_profitability(vec![]).is_empty());
    }
}
