//! # Citation Forest
//!
//! Parent/child reference links between publications.
//!
//! A publication has at most one parent (the publication that cites it) and
//! any number of children (the publications it cites). Attaching a child
//! that already has another parent moves it: the old parent loses the child
//! in the same step, so the two directions never disagree.
//!
//! The forest does not know which publications exist; callers check that
//! before attaching or querying.

use crate::PublicationId;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of [`CitationForest::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// The child had no parent before.
    Attached,
    /// The child was detached from `previous` and attached to the new parent.
    Moved { previous: PublicationId },
    /// The child was already attached to this parent.
    Unchanged,
}

/// Single-parent citation links.
#[derive(Debug, Clone, Default)]
pub struct CitationForest {
    /// child -> parent
    parent: BTreeMap<PublicationId, PublicationId>,
    /// parent -> children, in attachment order
    children: BTreeMap<PublicationId, Vec<PublicationId>>,
}

impl CitationForest {
    /// Create an empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every link.
    pub fn clear(&mut self) {
        self.parent.clear();
        self.children.clear();
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: PublicationId, parent: PublicationId) -> Attachment {
        let outcome = match self.parent.insert(child, parent) {
            Some(previous) if previous == parent => return Attachment::Unchanged,
            Some(previous) => {
                self.unlist_child(previous, child);
                Attachment::Moved { previous }
            }
            None => Attachment::Attached,
        };
        self.children.entry(parent).or_default().push(child);
        outcome
    }

    /// Remove `id` from the forest.
    ///
    /// Its parent forgets it and each of its children becomes a root.
    pub fn remove(&mut self, id: PublicationId) {
        if let Some(parent) = self.parent.remove(&id) {
            self.unlist_child(parent, id);
        }
        for child in self.children.remove(&id).unwrap_or_default() {
            if self.parent.get(&child) == Some(&id) {
                self.parent.remove(&child);
            }
        }
    }

    /// The publication that cites `id`, if any.
    #[must_use]
    pub fn parent_of(&self, id: PublicationId) -> Option<PublicationId> {
        self.parent.get(&id).copied()
    }

    /// Publications directly cited by `id`, in attachment order.
    #[must_use]
    pub fn children_of(&self, id: PublicationId) -> &[PublicationId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every ancestor of `id`, nearest first, each at most once.
    ///
    /// Stops at the first repeated publication, so a cyclic chain terminates.
    #[must_use]
    pub fn ancestors(&self, id: PublicationId) -> Vec<PublicationId> {
        let mut chain = Vec::new();
        let mut visited = BTreeSet::from([id]);
        let mut current = id;

        while let Some(&parent) = self.parent.get(&current) {
            if !visited.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Every descendant of `id` in depth-first pre-order, each at most once.
    #[must_use]
    pub fn descendants(&self, id: PublicationId) -> Vec<PublicationId> {
        let mut result = Vec::new();
        let mut visited = BTreeSet::from([id]);
        let mut stack: Vec<PublicationId> = self.children_of(id).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children_of(current).iter().rev().copied());
        }
        result
    }

    /// The nearest ancestor shared by `a` and `b`.
    #[must_use]
    pub fn closest_common_ancestor(&self, a: PublicationId, b: PublicationId) -> Option<PublicationId> {
        let first = self.ancestors(a);
        let second = self.ancestors(b);
        first.into_iter().find(|candidate| second.contains(candidate))
    }

    /// Number of child → parent links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.parent.len()
    }

    fn unlist_child(&mut self, parent: PublicationId, child: PublicationId) {
        if let Some(list) = self.children.get_mut(&parent) {
            list.retain(|c| *c != child);
            if list.is_empty() {
                self.children.remove(&parent);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
