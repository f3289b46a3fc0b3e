//! Element identity generation
//!
//! Structural copies of elements (redo, paste, duplicate) must never reuse a
//! `(dom_id, oid)` pair that may still be live in a frame, so every copy asks
//! an [`IdGenerator`] for fresh ids.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Prefix of generated live-surface ids
pub const DOM_ID_PREFIX: &str = "odid-";

/// Source of unique element ids for one editing session
pub trait IdGenerator: Send + Sync {
    /// A new live-surface id
    fn create_dom_id(&self) -> String;

    /// A new origin id
    fn create_oid(&self) -> String;
}

/// Random UUID-based ids
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn create_dom_id(&self) -> String {
        format!("{DOM_ID_PREFIX}{}", Uuid::new_v4())
    }

    fn create_oid(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic counter-based ids
///
/// Useful for replaying an action log or writing tests that assert on exact
/// identities. Ids are unique for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting at `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl IdGenerator for SequentialIds {
    fn create_dom_id(&self) -> String {
        format!("{DOM_ID_PREFIX}{}", self.bump())
    }

    fn create_oid(&self) -> String {
        format!("oid-{}", self.bump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_are_unique() {
        let ids = RandomIds;
        let mut seen = HashSet::new();
        for _ in 0..256 {
            assert!(seen.insert(ids.create_dom_id()));
            assert!(seen.insert(ids.create_oid()));
        }
    }

    #[test]
    fn test_random_dom_ids_are_prefixed() {
        assert!(RandomIds.create_dom_id().starts_with(DOM_ID_PREFIX));
    }

    #[test]
    fn test_sequential_ids_never_repeat_across_kinds() {
        let ids = SequentialIds::new();
        assert_eq!(ids.create_dom_id(), "odid-0");
        assert_eq!(ids.create_oid(), "oid-1");
        assert_eq!(ids.create_dom_id(), "odid-2");
    }

    #[test]
    fn test_sequential_ids_starting_at() {
        let ids = SequentialIds::starting_at(40);
        assert_eq!(ids.create_oid(), "oid-40");
    }
}
