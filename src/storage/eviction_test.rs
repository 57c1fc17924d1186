use std::collections::HashMap;

use bytes::Bytes;

use super::*;
use crate::EvictionPolicy;
use crate::Record;

fn records(scores: &[(&'static str, u64)]) -> HashMap<Bytes, Record<Bytes>> {
    scores
        .iter()
        .map(|(k, score)| {
            let mut r = Record::new(Bytes::from(*k), Bytes::from("v"), 0);
            r.set_eviction_criteria_number(*score);
            (Bytes::from(*k), r)
        })
        .collect()
}

#[test]
fn test_lru_score_is_last_access_time() {
    let mut r = Record::new(Bytes::from("k"), Bytes::from("v"), 0);
    r.get_value(123);

    update_eviction_criteria(EvictionPolicy::Lru, &mut r);

    assert_eq!(r.eviction_criteria_number(), 123);
}

#[test]
fn test_lfu_score_is_hit_count() {
    let mut r = Record::new(Bytes::from("k"), Bytes::from("v"), 0);
    r.get_value(1);
    r.get_value(2);
    r.get_value(3);

    update_eviction_criteria(EvictionPolicy::Lfu, &mut r);

    assert_eq!(r.eviction_criteria_number(), 3);
}

#[test]
fn test_none_policy_leaves_score_untouched() {
    let mut r = Record::new(Bytes::from("k"), Bytes::from("v"), 0);
    r.set_eviction_criteria_number(9);
    r.get_value(50);

    update_eviction_criteria(EvictionPolicy::None, &mut r);

    assert_eq!(r.eviction_criteria_number(), 9);
}

#[test]
fn test_candidates_are_lowest_scores_first() {
    let map = records(&[("a", 30), ("b", 10), ("c", 20), ("d", 40)]);

    let victims = select_eviction_candidates(&map, 2, None);

    assert_eq!(victims, vec![Bytes::from("b"), Bytes::from("c")]);
}

#[test]
fn test_candidates_skip_excluded_key() {
    let map = records(&[("a", 1), ("b", 2)]);

    let victims = select_eviction_candidates(&map, 1, Some(&Bytes::from("a")));

    assert_eq!(victims, vec![Bytes::from("b")]);
}

#[test]
fn test_zero_count_selects_nothing() {
    let map = records(&[("a", 1)]);
    assert!(select_eviction_candidates(&map, 0, None).is_empty());
}
