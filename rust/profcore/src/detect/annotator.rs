//! Annotator: identity-based dedup and marking
//!
//! The DetectedSet only grows. Once a node is in it, neither the scanner nor
//! the annotator will look at it again for the lifetime of the page.

use std::collections::HashSet;
use std::hash::Hash;

use super::scanner::{scan_with_stats, HostDocument, ScanStats};

/// A proposed name cell and the normalized text it held when detected.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateElement<N> {
    pub node: N,
    pub name: String,
}

/// Monotonic record of processed node identities
#[derive(Debug, Clone)]
pub struct DetectedSet<K> {
    keys: HashSet<K>,
}

impl<K: Eq + Hash> Default for DetectedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> DetectedSet<K> {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Returns true when `key` was not present before.
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Owns the DetectedSet and applies the marker to accepted nodes.
#[derive(Debug)]
pub struct Annotator<K> {
    detected: DetectedSet<K>,
}

impl<K: Copy + Eq + Hash> Default for Annotator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> Annotator<K> {
    pub fn new() -> Self {
        Self {
            detected: DetectedSet::new(),
        }
    }

    pub fn detected(&self) -> &DetectedSet<K> {
        &self.detected
    }

    /// Keep only genuinely new candidates, marking each one on the page.
    pub fn mark<D>(&mut self, doc: &D, candidates: Vec<CandidateElement<D::Node>>) -> Vec<CandidateElement<D::Node>>
    where
        D: HostDocument<Key = K>,
    {
        candidates
            .into_iter()
            .filter(|candidate| {
                if !self.detected.insert(doc.key(&candidate.node)) {
                    return false;
                }
                doc.mark_detected(&candidate.node, &candidate.name);
                true
            })
            .collect()
    }

    /// Scanner → Validator → Annotator in one pass.
    pub fn detect<D>(&mut self, doc: &D) -> (Vec<CandidateElement<D::Node>>, ScanStats)
    where
        D: HostDocument<Key = K>,
    {
        let (candidates, stats) = scan_with_stats(doc, &self.detected);
        (self.mark(doc, candidates), stats)
    }
}
