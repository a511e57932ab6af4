//! In-memory company store keyed by registrable domain.
//!
//! The first sighting of a domain fixes its name, website and confidence;
//! later sightings only move `last_seen` forward. Records iterate in
//! first-seen order so exported tables are reproducible.

use crate::config::Publishers;
use crate::models::CompanyRecord;
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

/// What an [`CompanyStore::upsert`] did with its candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Merged,
    /// Empty domain or a publisher domain; nothing was stored.
    Rejected,
}

#[derive(Debug, Default)]
pub struct CompanyStore {
    records: IndexMap<String, CompanyRecord>,
    publishers: Publishers,
}

impl CompanyStore {
    pub fn new(publishers: Publishers) -> Self {
        Self {
            records: IndexMap::new(),
            publishers,
        }
    }

    /// True if `domain` belongs to a configured publisher and must not be stored.
    pub fn reject_if_publisher(&self, domain: &str) -> bool {
        self.publishers.contains_domain(domain)
    }

    /// Insert `candidate`, or merge its `last_seen` into the existing record
    /// for the same domain.
    ///
    /// # Arguments
    ///
    /// * `candidate` - A freshly resolved record; its domain is trimmed and
    ///   lower-cased before lookup.
    ///
    /// # Returns
    ///
    /// [`UpsertOutcome::Inserted`] for a new domain, [`UpsertOutcome::Merged`]
    /// when the domain was already stored (only `last_seen` can change), and
    /// [`UpsertOutcome::Rejected`] for an empty or publisher domain.
    pub fn upsert(&mut self, candidate: CompanyRecord) -> UpsertOutcome {
        let domain = candidate.domain.trim().to_lowercase();
        if domain.is_empty() || self.reject_if_publisher(&domain) {
            debug!(%domain, "Rejected company record");
            return UpsertOutcome::Rejected;
        }

        match self.records.entry(domain) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.last_seen = existing.last_seen.max(candidate.last_seen);
                debug!(domain = %slot.key(), last_seen = %slot.get().last_seen, "Merged company sighting");
                UpsertOutcome::Merged
            }
            Entry::Vacant(slot) => {
                let domain = slot.key().clone();
                slot.insert(CompanyRecord { domain, ..candidate });
                UpsertOutcome::Inserted
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, domain: &str) -> Option<&CompanyRecord> {
        self.records.get(domain)
    }

    /// Records in first-seen order.
    #[cfg(test)]
    pub fn records(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<CompanyRecord> {
        self.records.into_values().collect()
    }
}
