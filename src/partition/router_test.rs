use super::*;

#[test]
fn test_route_is_deterministic() {
    let router = HashPartitionRouter::new(271);
    assert_eq!(router.route(b"orders"), router.route(b"orders"));
}

#[test]
fn test_route_stays_in_range() {
    let router = HashPartitionRouter::new(7);
    for i in 0..1000u32 {
        assert!(router.route(&i.to_be_bytes()) < 7);
    }
}

#[test]
fn test_route_spreads_keys() {
    let router = HashPartitionRouter::new(4);
    let mut hit = [false; 4];
    for i in 0..100u32 {
        hit[router.route(format!("key-{i}").as_bytes()) as usize] = true;
    }
    assert!(hit.iter().all(|h| *h));
}

#[test]
fn test_zero_partitions_is_clamped() {
    let router = HashPartitionRouter::new(0);
    assert_eq!(router.partition_count(), 1);
    assert_eq!(router.route(b"k"), 0);
}
