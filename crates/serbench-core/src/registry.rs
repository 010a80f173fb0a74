//! Codec registration table.
//!
//! Registration follows a strict two-phase lifecycle, enforced at the type
//! level rather than by a runtime flag: entries accumulate in a
//! [`RegistryBuilder`] during single-threaded startup, then [`freeze`]
//! produces the read-only [`Registry`] every verification and timing pass
//! reads from. Decoupling "what codecs exist" from "how they are exercised"
//! is the extensibility axis of the whole harness — a new codec is one
//! `register` call, with zero change to the verifier or driver.
//!
//! [`freeze`]: RegistryBuilder::freeze

use tracing::{debug, warn};

use crate::entry::CodecEntry;

/// An ordered sequence of entries tagged with a format-family label
/// (e.g. `"json"`, `"binary"`).
///
/// Order is significant for report readability only; it carries no
/// semantic weight.
pub struct Group<J> {
    label: String,
    entries: Vec<CodecEntry<J>>,
}

impl<J> Group<J> {
    /// Family label this group was registered under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[CodecEntry<J>] {
        &self.entries
    }
}

/// Mutable registration table, alive only during the setup phase.
pub struct RegistryBuilder<J> {
    groups: Vec<Group<J>>,
}

impl<J> RegistryBuilder<J> {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Append entries to the named group, preserving call order.
    ///
    /// Safe to call repeatedly with the same label; entries accumulate and
    /// the group keeps its original position. Entry-name uniqueness is a
    /// caller obligation — collisions are logged and kept.
    pub fn register(&mut self, label: &str, entries: Vec<CodecEntry<J>>) {
        for entry in &entries {
            if self.contains(entry.name()) {
                warn!(
                    entry = %entry.name(),
                    group = %label,
                    "duplicate entry name registered; reports will be ambiguous"
                );
            }
        }
        debug!(group = %label, count = entries.len(), "registering entries");
        match self.groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.entries.extend(entries),
            None => self.groups.push(Group {
                label: label.to_string(),
                entries,
            }),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .any(|e| e.name() == name)
    }

    /// End the setup phase. The returned table is read-only for the
    /// remainder of the process; subsequent reads need no synchronization.
    pub fn freeze(self) -> Registry<J> {
        let total: usize = self.groups.iter().map(|g| g.entries.len()).sum();
        debug!(groups = self.groups.len(), entries = total, "registry frozen");
        Registry {
            groups: self.groups,
        }
    }
}

impl<J> Default for RegistryBuilder<J> {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen, read-only view of the registration table.
pub struct Registry<J> {
    groups: Vec<Group<J>>,
}

impl<J> Registry<J> {
    /// Groups in first-registration order.
    pub fn groups(&self) -> &[Group<J>] {
        &self.groups
    }

    /// All entries flattened in registration order, preserving group
    /// adjacency.
    pub fn all_entries(&self) -> impl Iterator<Item = &CodecEntry<J>> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    /// Entry at the given flattened position.
    pub fn entry_at(&self, index: usize) -> Option<&CodecEntry<J>> {
        self.all_entries().nth(index)
    }

    /// Look up an entry by display name (first match wins).
    pub fn find(&self, name: &str) -> Option<&CodecEntry<J>> {
        self.all_entries().find(|e| e.name() == name)
    }

    /// Total entry count across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.entries.is_empty())
    }
}
