use betai::access::{AccessController, AccessTier, visible_subset};

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("m{i}")).collect()
}

#[test]
fn given_eight_records_when_advancing_through_tiers_then_visible_grows_3_6_8() {
    let records = ids(8);
    let mut controller = AccessController::new();

    assert_eq!(controller.tier(), AccessTier::Tier1);
    assert_eq!(controller.visible(&records).len(), 3);
    assert_eq!(controller.remaining(&records), 5);

    assert_eq!(controller.advance(), AccessTier::Tier2);
    assert_eq!(controller.visible(&records).len(), 6);
    assert_eq!(controller.remaining(&records), 2);

    assert_eq!(controller.advance(), AccessTier::FullAccess);
    assert_eq!(controller.visible(&records).len(), 8);
    assert_eq!(controller.remaining(&records), 0);
    assert!(!controller.gate_available(&records));
}

#[test]
fn given_two_records_when_at_tier1_then_gate_is_suppressed() {
    let records = ids(2);
    let controller = AccessController::new();

    assert_eq!(controller.visible(&records).len(), 2);
    assert_eq!(controller.remaining(&records), 0);
    assert!(!controller.gate_available(&records));
    assert!(controller.unlock_offer(&records).is_none());
}

#[test]
fn given_empty_set_when_queried_at_any_tier_then_nothing_is_visible() {
    let records: Vec<String> = Vec::new();
    for tier in [AccessTier::Tier1, AccessTier::Tier2, AccessTier::FullAccess] {
        assert!(visible_subset(&records, tier).is_empty());
    }
}

#[test]
fn given_any_set_size_when_tier_grows_then_visible_sets_are_nested_prefixes() {
    for n in 0..15 {
        let records = ids(n);
        let tier1 = visible_subset(&records, AccessTier::Tier1);
        let tier2 = visible_subset(&records, AccessTier::Tier2);
        let full = visible_subset(&records, AccessTier::FullAccess);

        assert_eq!(tier1.len(), n.min(3));
        assert_eq!(tier2.len(), n.min(6));
        assert_eq!(full, records.as_slice());
        assert_eq!(tier1, &records[..tier1.len()]);
        assert_eq!(tier1, &tier2[..tier1.len()]);
        assert_eq!(tier2, &full[..tier2.len()]);
    }
}

#[test]
fn given_full_access_when_advanced_repeatedly_then_tier_stays_full_access() {
    let mut controller = AccessController::new();
    controller.advance();
    controller.advance();

    for _ in 0..10 {
        assert_eq!(controller.advance(), AccessTier::FullAccess);
    }
    assert!(controller.tier().is_terminal());
}

#[test]
fn given_any_advance_sequence_then_tier_never_decreases() {
    let mut controller = AccessController::new();
    let mut previous = controller.tier();
    for _ in 0..5 {
        let next = controller.advance();
        assert!(next >= previous);
        previous = next;
    }
}
