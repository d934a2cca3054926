//! Resource Pile Tests
//!
//! Tests for:
//! - Dense packing: active prefix holds valid ids, tail holds the sentinel
//! - Compaction: removal preserves insertion order of the survivors
//! - Lookup: indexed and scanning strategies agree, missing names
//! - Hash collisions: reject and alias policies, zero-hash remap

use cairn::{
    CollisionPolicy, HashId, LookupStrategy, RegistrySettings, ResourceRegistry,
};

fn registry_with(capacity: usize, lookup: LookupStrategy) -> ResourceRegistry {
    ResourceRegistry::new(RegistrySettings {
        capacity,
        lookup,
        ..Default::default()
    })
    .unwrap()
}

fn names(registry: &ResourceRegistry) -> Vec<String> {
    registry.iter().map(|view| view.name().to_owned()).collect()
}

fn assert_dense(registry: &ResourceRegistry) {
    let pile = registry.pile();
    assert!(pile.is_densely_packed());
    for i in 0..pile.capacity() {
        let id = pile.slot_id(i).unwrap();
        if i < pile.len() {
            assert!(id.is_valid(), "active slot {i} holds the sentinel");
        } else {
            assert_eq!(id, HashId::NONE, "free slot {i} is occupied");
        }
    }
    assert!(pile.slot_id(pile.capacity()).is_none());
}

/// Small deterministic generator so the churn test needs no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

// ============================================================================
// Dense Packing
// ============================================================================

#[test]
fn pile_stays_dense_under_register_destroy_churn() {
    for lookup in [LookupStrategy::Indexed, LookupStrategy::Scan] {
        let mut registry = registry_with(32, lookup);
        let mut rng = Lcg(7);

        for step in 0..500 {
            let name = format!("res_{}", rng.next() % 48);
            if rng.next() % 3 == 0 {
                registry.destroy(&name);
            } else {
                let _ = registry.create_from_memory(&name, name.as_bytes());
            }
            assert_dense(&registry);
            assert!(registry.len() <= 32, "step {step} overflowed the pile");
        }
    }
}

#[test]
fn destroy_at_front_middle_and_back_keeps_packing() {
    let mut registry = registry_with(8, LookupStrategy::Indexed);
    for name in ["a", "b", "c", "d", "e"] {
        registry.create_from_memory(name, name.as_bytes()).unwrap();
    }

    assert!(registry.destroy_at(4));
    assert_dense(&registry);
    assert!(registry.destroy_at(0));
    assert_dense(&registry);
    assert!(registry.destroy_at(1));
    assert_dense(&registry);

    assert_eq!(names(&registry), ["b", "d"]);
}

#[test]
fn destroy_at_out_of_range_is_noop() {
    let mut registry = registry_with(4, LookupStrategy::Indexed);
    registry.create_from_memory("a", &[1]).unwrap();

    assert!(!registry.destroy_at(1));
    assert!(!registry.destroy_at(usize::MAX));
    assert_eq!(registry.len(), 1);
    assert_dense(&registry);
}

// ============================================================================
// Compaction Order
// ============================================================================

#[test]
fn destroying_first_entry_preserves_order() {
    let mut registry = ResourceRegistry::default();
    for name in ["a", "b", "c"] {
        registry.create_from_memory(name, name.as_bytes()).unwrap();
    }

    assert!(registry.destroy("a"));

    assert!(registry.get("b").is_some());
    assert!(registry.get("c").is_some());
    assert_eq!(names(&registry), ["b", "c"]);
    assert_eq!(registry.get("b").unwrap().index(), 0);
    assert_eq!(registry.get("c").unwrap().index(), 1);
}

#[test]
fn pop_is_last_in_first_out() {
    let mut registry = ResourceRegistry::default();
    for name in ["a", "b", "c"] {
        registry.create_from_memory(name, name.as_bytes()).unwrap();
    }

    let pile = registry.pile_mut();
    assert_eq!(pile.pop().unwrap().name(), "c");
    assert_eq!(pile.pop().unwrap().name(), "b");
    assert_eq!(pile.pop().unwrap().name(), "a");
    assert!(pile.pop().is_none());
    assert!(pile.is_densely_packed());
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn missing_lookup_on_empty_pile() {
    for lookup in [LookupStrategy::Indexed, LookupStrategy::Scan] {
        let registry = registry_with(16, lookup);
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.get_by_id(HashId::NONE).is_none());
    }
}

#[test]
fn missing_lookup_on_non_matching_pile() {
    for lookup in [LookupStrategy::Indexed, LookupStrategy::Scan] {
        let mut registry = registry_with(16, lookup);
        registry.create_from_memory("a", &[1]).unwrap();
        registry.create_from_memory("b", &[2]).unwrap();

        assert!(registry.get("nonexistent").is_none());
        assert!(!registry.contains("nonexistent"));
    }
}

#[test]
fn indexed_and_scan_lookups_agree() {
    let mut indexed = registry_with(64, LookupStrategy::Indexed);
    let mut scan = registry_with(64, LookupStrategy::Scan);

    for registry in [&mut indexed, &mut scan] {
        for i in 0..40 {
            let name = format!("asset_{i}");
            registry.create_from_memory(&name, &[i as u8; 3]).unwrap();
        }
        for i in (0..40).step_by(3) {
            registry.destroy(&format!("asset_{i}"));
        }
    }

    for i in 0..40 {
        let name = format!("asset_{i}");
        let a = indexed.get(&name).map(|v| (v.index(), v.bytes().to_vec()));
        let b = scan.get(&name).map(|v| (v.index(), v.bytes().to_vec()));
        assert_eq!(a, b, "lookups disagree for {name}");
    }
}

#[test]
fn lookup_by_id_matches_lookup_by_name() {
    let mut registry = ResourceRegistry::default();
    let id = registry.create_from_memory("mesh", &[9, 9]).unwrap().id();

    let by_id = registry.get_by_id(id).unwrap();
    assert_eq!(by_id.name(), "mesh");
    assert_eq!(by_id.bytes(), &[9, 9]);
}

// ============================================================================
// Hash Collisions
// ============================================================================

fn constant_hash(_: &str) -> u64 {
    0xC0FFEE
}

fn zero_hash(_: &str) -> u64 {
    0
}

#[test]
fn colliding_name_is_rejected_by_default() {
    let mut registry =
        ResourceRegistry::with_hash_fn(RegistrySettings::default(), constant_hash).unwrap();
    registry.create_from_memory("first", &[1]).unwrap();

    let err = registry.create_from_memory("second", &[2]).unwrap_err();
    assert_eq!(err.kind(), cairn::ErrorKind::HashCollision);
    assert!(registry.get("second").is_none());
    assert_eq!(registry.get("first").unwrap().bytes(), &[1]);
    assert!(!registry.destroy("second"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn colliding_name_aliases_under_alias_policy() {
    let settings = RegistrySettings {
        collision_policy: CollisionPolicy::Alias,
        ..Default::default()
    };
    let mut registry = ResourceRegistry::with_hash_fn(settings, constant_hash).unwrap();
    registry.create_from_memory("first", &[1]).unwrap();

    let err = registry.create_from_memory("second", &[2]).unwrap_err();
    assert_eq!(err.kind(), cairn::ErrorKind::DuplicateName);
    assert_eq!(registry.get("second").unwrap().name(), "first");

    assert!(registry.destroy("second"));
    assert!(registry.is_empty());
}

#[test]
fn zero_hash_never_becomes_the_sentinel() {
    let mut registry =
        ResourceRegistry::with_hash_fn(RegistrySettings::default(), zero_hash).unwrap();
    let id = registry.create_from_memory("anything", &[1]).unwrap().id();

    assert_eq!(id.get(), HashId::ZERO_SUBSTITUTE);
    assert!(registry.get("anything").is_some());
    assert_dense(&registry);
}
