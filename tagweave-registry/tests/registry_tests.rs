mod common;

use common::{Arch, tag};
use pretty_assertions::assert_eq;
use tagweave_model::{Entity, EntityId};
use tagweave_registry::{EntityRegistry, EntryState, RegistryError, RegistryKey};

// ── Lookups ──────────────────────────────────────────────────────

#[test]
fn new_registry_is_empty() {
    let registry: EntityRegistry<Arch> = EntityRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert_eq!(registry.type_name(), "Arch");
}

#[test]
fn lookups_return_none_when_absent() {
    let registry: EntityRegistry<Arch> = EntityRegistry::default();
    assert!(registry.lookup_by_tag("nope").is_none());
    assert!(registry.lookup_by_identifier(&EntityId::new()).is_none());
    assert!(registry.state("nope").is_none());
    assert!(registry.handle("nope").is_none());
}

#[test]
fn registered_entity_found_by_both_keys() {
    let mut registry = EntityRegistry::new();
    let arch = Arch::new(1, "sval_A", "arch_arch1");
    let id = arch.id;
    let handle = registry.register_complete(arch.clone()).unwrap();

    assert_eq!(handle.id(), id);
    assert_eq!(registry.lookup_by_tag("arch_arch1"), Some(&arch));
    assert_eq!(registry.lookup_by_identifier(&id), Some(&arch));
    assert_eq!(registry.get(&handle), Some(&arch));
    assert_eq!(registry.state("arch_arch1"), Some(EntryState::Complete));
}

// ── register_complete ────────────────────────────────────────────

#[test]
fn registering_same_entity_twice_is_silent() {
    let mut registry = EntityRegistry::new();
    let arch = Arch::new(1, "x", "a1");
    registry.register_complete(arch.clone()).unwrap();
    registry.register_complete(arch.clone()).unwrap();
    assert_eq!(registry.len(), 1);
}

#[test]
fn reregistering_equal_identifier_keeps_original_value() {
    let mut registry = EntityRegistry::new();
    let arch = Arch::new(1, "x", "a1");
    let mut edited = arch.clone();
    edited.int_value = 99;
    registry.register_complete(arch).unwrap();
    registry.register_complete(edited).unwrap();
    assert_eq!(registry.lookup_by_tag("a1").unwrap().int_value, 1);
}

#[test]
fn different_entity_with_same_tag_is_duplicate() {
    let mut registry = EntityRegistry::new();
    registry.register_complete(Arch::new(1, "x", "a1")).unwrap();
    let err = registry
        .register_complete(Arch::new(2, "y", "a1"))
        .unwrap_err();
    match err {
        RegistryError::DuplicateKey { type_name, key } => {
            assert_eq!(type_name, "Arch");
            assert_eq!(key, RegistryKey::Tag(tag("a1")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn same_identifier_under_new_tag_is_duplicate() {
    let mut registry = EntityRegistry::new();
    let arch = Arch::new(1, "x", "a1");
    let mut renamed = arch.clone();
    renamed.tag = tag("a2");
    registry.register_complete(arch.clone()).unwrap();
    let err = registry.register_complete(renamed).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::DuplicateKey { key: RegistryKey::Identifier(id), .. } if id == arch.id
    ));
    assert!(!registry.contains_tag("a2"));
}

#[test]
fn untagged_entity_is_rejected() {
    let mut registry = EntityRegistry::new();
    let err = registry.register_complete(Arch::default()).unwrap_err();
    assert!(matches!(err, RegistryError::EmptyTag { type_name: "Arch" }));
}

// ── Placeholders ─────────────────────────────────────────────────

#[test]
fn partial_has_key_and_default_state() {
    let mut registry: EntityRegistry<Arch> = EntityRegistry::new();
    let handle = registry.register_partial(tag("B1")).unwrap();

    let partial = registry.lookup_partial("B1").unwrap();
    assert_eq!(partial.id, handle.id());
    assert_eq!(partial.tag, tag("B1"));
    assert_eq!(partial.int_value, 0);
    assert!(partial.string_value.is_empty());

    assert!(registry.lookup_by_tag("B1").is_none());
    assert!(registry.lookup_by_identifier(&handle.id()).is_none());
    assert_eq!(registry.state("B1"), Some(EntryState::Partial));
}

#[test]
fn partial_for_existing_tag_is_duplicate() {
    let mut registry = EntityRegistry::new();
    registry.register_complete(Arch::new(1, "x", "a1")).unwrap();
    registry.register_partial(tag("B1")).unwrap();

    assert!(matches!(
        registry.register_partial(tag("a1")),
        Err(RegistryError::DuplicateKey { .. })
    ));
    assert!(matches!(
        registry.register_partial(tag("B1")),
        Err(RegistryError::DuplicateKey { .. })
    ));
}

#[test]
fn handle_is_shared_until_completion() {
    let mut registry: EntityRegistry<Arch> = EntityRegistry::new();
    let created = registry.register_partial(tag("B1")).unwrap();
    let looked_up = registry.handle("B1").unwrap();
    assert_eq!(created, looked_up);
}

#[test]
fn completing_placeholder_promotes_it() {
    let mut registry: EntityRegistry<Arch> = EntityRegistry::new();
    let handle = registry.register_partial(tag("B1")).unwrap();

    let mut filled = Arch::default();
    filled.assign_key(handle.id(), tag("B1"));
    filled.int_value = 7;
    let promoted = registry.register_complete(filled).unwrap();

    assert_eq!(promoted, handle);
    assert_eq!(registry.state("B1"), Some(EntryState::Complete));
    assert!(registry.lookup_partial("B1").is_none());
    assert_eq!(registry.lookup_by_tag("B1").unwrap().int_value, 7);
    assert_eq!(registry.len(), 1);
    assert!(registry.pending_tags().is_empty());
}

#[test]
fn unrelated_entity_cannot_take_pending_tag() {
    let mut registry: EntityRegistry<Arch> = EntityRegistry::new();
    registry.register_partial(tag("B1")).unwrap();
    let err = registry
        .register_complete(Arch::new(3, "z", "B1"))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::PartialStillPending { ref tag, .. } if tag.as_str() == "B1"
    ));
    assert_eq!(registry.state("B1"), Some(EntryState::Partial));
}

#[test]
fn pending_tags_in_creation_order() {
    let mut registry: EntityRegistry<Arch> = EntityRegistry::new();
    registry.register_partial(tag("z")).unwrap();
    registry.register_complete(Arch::new(1, "x", "done")).unwrap();
    registry.register_partial(tag("a")).unwrap();
    assert_eq!(registry.pending_tags(), vec![tag("z"), tag("a")]);
    assert_eq!(registry.partial_len(), 2);
    assert_eq!(registry.complete_len(), 1);
}

// ── Removal ──────────────────────────────────────────────────────

#[test]
fn unregister_frees_both_keys() {
    let mut registry = EntityRegistry::new();
    let arch = Arch::new(1, "x", "a1");
    let id = arch.id;
    registry.register_complete(arch).unwrap();

    let removed = registry.unregister(&id).unwrap();
    assert_eq!(removed.int_value, 1);
    assert!(registry.lookup_by_tag("a1").is_none());
    assert!(registry.unregister(&id).is_none());

    registry.register_complete(Arch::new(2, "y", "a1")).unwrap();
    assert_eq!(registry.lookup_by_tag("a1").unwrap().int_value, 2);
}

#[test]
fn reset_clears_everything() {
    let mut registry = EntityRegistry::new();
    registry.register_complete(Arch::new(1, "x", "a1")).unwrap();
    registry.register_partial(tag("B1")).unwrap();
    registry.reset();
    assert!(registry.is_empty());
    assert!(registry.pending_tags().is_empty());
    assert!(!registry.contains_tag("a1"));
}

#[test]
fn iter_yields_complete_in_registration_order() {
    let mut registry = EntityRegistry::new();
    registry.register_complete(Arch::new(2, "b", "second")).unwrap();
    registry.register_partial(tag("ghost")).unwrap();
    registry.register_complete(Arch::new(1, "a", "first")).unwrap();
    let tags: Vec<_> = registry.iter().map(|a| a.tag.as_str()).collect();
    assert_eq!(tags, vec!["second", "first"]);
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn error_messages_name_type_and_key() {
    let err = RegistryError::DuplicateKey {
        type_name: "Arch",
        key: RegistryKey::Tag(tag("a1")),
    };
    let msg = err.to_string();
    assert!(msg.contains("Arch"));
    assert!(msg.contains("tag 'a1'"));

    let err = RegistryError::PartialStillPending {
        type_name: "Arch",
        tag: tag("B1"),
    };
    assert!(err.to_string().contains("pending placeholder"));
}
