use std::collections::hash_map::Entry;
use std::collections::HashMap;

use titlemap_core::Cell;

use crate::config::DuplicatePolicy;
use crate::error::ReconError;
use crate::model::{CatalogRecord, DatasetRole, TitleValue};
use crate::normalize::TitleNormalizer;

// ---------------------------------------------------------------------------
// Lookup map
// ---------------------------------------------------------------------------

/// normalized title → identifier, one identifier per key.
#[derive(Debug, Clone)]
pub struct LookupMap {
    entries: HashMap<String, String>,
    conflicts: usize,
}

impl LookupMap {
    /// Build from catalog records in row order.
    ///
    /// Every row is keyed, including titles that normalize to `""` and blank
    /// identifiers. When two rows share a key with different identifiers the
    /// policy decides which one stays.
    pub fn build(
        role: DatasetRole,
        records: &[CatalogRecord],
        policy: DuplicatePolicy,
    ) -> Result<Self, ReconError> {
        let mut entries: HashMap<String, String> = HashMap::with_capacity(records.len());
        let mut conflicts = 0;

        for record in records {
            match entries.entry(record.normalized_title.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record.identifier.clone());
                }
                Entry::Occupied(mut slot) => {
                    if slot.get() == &record.identifier {
                        continue;
                    }
                    conflicts += 1;
                    match policy {
                        DuplicatePolicy::FirstSeen => {
                            log::debug!(
                                "{role}: '{}' keeps '{}', ignoring '{}'",
                                slot.key(),
                                slot.get(),
                                record.identifier
                            );
                        }
                        DuplicatePolicy::LastSeen => {
                            log::debug!(
                                "{role}: '{}' replaces '{}' with '{}'",
                                slot.key(),
                                slot.get(),
                                record.identifier
                            );
                            slot.insert(record.identifier.clone());
                        }
                        DuplicatePolicy::Reject => {
                            return Err(ReconError::DuplicateKey {
                                role,
                                key: slot.key().clone(),
                                kept: slot.get().clone(),
                                rejected: record.identifier.clone(),
                            });
                        }
                    }
                }
            }
        }

        if conflicts > 0 {
            log::warn!("{role}: {conflicts} row(s) share a title key with a different identifier ({policy:?})");
        }

        Ok(Self { entries, conflicts })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows whose identifier lost (or won) against an earlier row with the same key.
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }
}

// ---------------------------------------------------------------------------
// Tiered resolution
// ---------------------------------------------------------------------------

/// Tier results for one statement row, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub normalized_title: String,
    pub tier1: String,
    pub tier2: String,
}

impl Resolution {
    pub fn primary_hit(&self) -> bool {
        self.tier1 != self.normalized_title
    }

    pub fn master_hit_only(&self) -> bool {
        !self.primary_hit() && self.tier2 != self.normalized_title
    }
}

/// Primary (channel) lookup with master fallback.
#[derive(Debug)]
pub struct MultiStageMatcher<'n> {
    normalizer: &'n TitleNormalizer,
    primary: LookupMap,
    master: LookupMap,
}

impl<'n> MultiStageMatcher<'n> {
    pub fn new(normalizer: &'n TitleNormalizer, primary: LookupMap, master: LookupMap) -> Self {
        Self { normalizer, primary, master }
    }

    pub fn primary(&self) -> &LookupMap {
        &self.primary
    }

    pub fn master(&self) -> &LookupMap {
        &self.master
    }

    /// `tier1 = primary[T] ?? T`, `tier2 = master[T] ?? tier1`.
    pub fn resolve_key(&self, normalized_title: &str) -> Resolution {
        let tier1 = self
            .primary
            .get(normalized_title)
            .unwrap_or(normalized_title)
            .to_string();
        let tier2 = match self.master.get(normalized_title) {
            Some(id) => id.to_string(),
            None => tier1.clone(),
        };

        Resolution {
            normalized_title: normalized_title.to_string(),
            tier1,
            tier2,
        }
    }

    pub fn resolve(&self, raw_title: &Cell) -> Resolution {
        let key = self.normalizer.normalize(&TitleValue::from(raw_title));
        self.resolve_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, id: &str) -> CatalogRecord {
        CatalogRecord {
            raw_title: Cell::from(title),
            normalized_title: crate::normalize::normalize_str(title),
            identifier: id.to_string(),
        }
    }

    #[test]
    fn first_seen_wins_by_default() {
        let records = vec![rec("Alpha 제1권", "CH-001"), rec("Alpha 제2권", "CH-002")];
        let map = LookupMap::build(DatasetRole::Channel, &records, DuplicatePolicy::default()).unwrap();
        assert_eq!(map.get("Alpha"), Some("CH-001"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.conflicts(), 1);
    }

    #[test]
    fn last_seen_replaces() {
        let records = vec![rec("Alpha 제1권", "CH-001"), rec("Alpha 제2권", "CH-002")];
        let map = LookupMap::build(DatasetRole::Channel, &records, DuplicatePolicy::LastSeen).unwrap();
        assert_eq!(map.get("Alpha"), Some("CH-002"));
    }

    #[test]
    fn reject_fails_on_conflict() {
        let records = vec![rec("Alpha 제1권", "CH-001"), rec("Alpha(완결)", "CH-002")];
        let err = LookupMap::build(DatasetRole::Master, &records, DuplicatePolicy::Reject).unwrap_err();
        match err {
            ReconError::DuplicateKey { role, key, kept, rejected } => {
                assert_eq!(role, DatasetRole::Master);
                assert_eq!(key, "Alpha");
                assert_eq!(kept, "CH-001");
                assert_eq!(rejected, "CH-002");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reject_allows_repeated_identical_identifier() {
        let records = vec![rec("Alpha 제1권", "CH-001"), rec("Alpha 제2권", "CH-001")];
        let map = LookupMap::build(DatasetRole::Channel, &records, DuplicatePolicy::Reject).unwrap();
        assert_eq!(map.get("Alpha"), Some("CH-001"));
        assert_eq!(map.conflicts(), 0);
    }

    #[test]
    fn empty_keys_and_identifiers_are_kept() {
        let records = vec![rec("(완결)", "CH-001"), rec("Beta", ""), rec("Beta 2권", "CH-002")];
        let map = LookupMap::build(DatasetRole::Channel, &records, DuplicatePolicy::default()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(""), Some("CH-001"));
        // A blank identifier seen first still holds its key.
        assert_eq!(map.get("Beta"), Some(""));
        assert_eq!(map.conflicts(), 1);
    }

    #[test]
    fn tiers_fall_back_in_order() {
        let norm = TitleNormalizer::default();
        let primary = LookupMap::build(
            DatasetRole::Channel,
            &[rec("Alpha", "CH-001"), rec("Both", "CH-002")],
            DuplicatePolicy::default(),
        )
        .unwrap();
        let master = LookupMap::build(
            DatasetRole::Master,
            &[rec("Beta", "MC-001"), rec("Both", "MC-002")],
            DuplicatePolicy::default(),
        )
        .unwrap();
        let matcher = MultiStageMatcher::new(&norm, primary, master);

        let a = matcher.resolve(&Cell::from("Alpha (완결)"));
        assert_eq!((a.tier1.as_str(), a.tier2.as_str()), ("CH-001", "CH-001"));
        assert!(a.primary_hit());

        let b = matcher.resolve(&Cell::from("Beta"));
        assert_eq!((b.tier1.as_str(), b.tier2.as_str()), ("Beta", "MC-001"));
        assert!(b.master_hit_only());

        // Master overrides the final identifier even after a primary hit.
        let both = matcher.resolve(&Cell::from("Both"));
        assert_eq!((both.tier1.as_str(), both.tier2.as_str()), ("CH-002", "MC-002"));

        let none = matcher.resolve(&Cell::from("Gamma 3권"));
        assert_eq!(none.normalized_title, "Gamma");
        assert_eq!((none.tier1.as_str(), none.tier2.as_str()), ("Gamma", "Gamma"));
        assert!(!none.primary_hit() && !none.master_hit_only());
    }
}
