//! Scanner - finds "Instructor" labels and proposes nearby name cells
//!
//! The scanner never touches the DOM directly; it walks a `HostDocument`,
//! which the browser layer implements over web-sys and tests implement over
//! an in-memory page.
//!
//! # Pipeline
//! 1. Enumerate header cells, data cells and generic containers
//! 2. Keep those whose normalized text starts with "instructor"
//! 3. Pick a strategy by role (header column / next cell + column / siblings)
//! 4. Validate each proposed cell's text, drop already-detected nodes

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::annotator::{CandidateElement, DetectedSet};
use super::strategy::{sibling_candidates, table_candidates, CellGrid, CellPos, LabelRole, MAX_SIBLING_PROBES};
use super::validator::is_plausible_name;

const LABEL_PREFIX: &str = "instructor";

/// Read/annotate access to the host page.
pub trait HostDocument {
    /// Handle to an element; cheap to clone.
    type Node: Clone;
    /// Stable identity of an element for the lifetime of the page.
    type Key: Copy + Eq + Hash + Debug;
    /// Table view used by the header and data-cell strategies.
    type Grid: CellGrid<Cell = Self::Node>;

    fn key(&self, node: &Self::Node) -> Self::Key;

    /// Raw text content of the element.
    fn text(&self, node: &Self::Node) -> String;

    /// Every table header, table cell and generic container, in document order.
    fn structural_elements(&self) -> Vec<(Self::Node, LabelRole)>;

    /// The table containing `cell` and the cell's coordinate inside it.
    fn locate_cell(&self, cell: &Self::Node) -> Option<(Self::Grid, CellPos)>;

    /// Up to `limit` following element siblings.
    fn following_siblings(&self, node: &Self::Node, limit: usize) -> Vec<Self::Node>;

    /// Flag the element as processed and remember the extracted name on it.
    fn mark_detected(&self, node: &Self::Node, name: &str);

    /// Name previously stored by `mark_detected`.
    fn detected_name(&self, node: &Self::Node) -> Option<String>;
}

/// Counters for one scan pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub elements_seen: usize,
    pub labels_found: usize,
    pub cells_probed: usize,
    pub candidates: usize,
}

/// Collapse whitespace runs and trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "Instructor", "INSTRUCTORS", "Instructor(s):" ...
pub fn is_instructor_label(text: &str) -> bool {
    normalize_text(text).to_lowercase().starts_with(LABEL_PREFIX)
}

/// Cells the strategy for `role` proposes around `label`.
fn propose<D: HostDocument>(doc: &D, label: &D::Node, role: LabelRole) -> Vec<D::Node> {
    match role {
        LabelRole::Header | LabelRole::DataCell => match doc.locate_cell(label) {
            Some((grid, pos)) => table_candidates(&grid, role, pos),
            // header/cell markup outside a real table: treat like a container
            None => sibling_candidates(doc.following_siblings(label, MAX_SIBLING_PROBES)),
        },
        LabelRole::Container => {
            sibling_candidates(doc.following_siblings(label, MAX_SIBLING_PROBES))
        }
    }
}

/// Propose new candidates. Nodes already in `detected` are skipped, and a node
/// reachable from several labels is reported once.
pub fn scan<D: HostDocument>(doc: &D, detected: &DetectedSet<D::Key>) -> Vec<CandidateElement<D::Node>> {
    scan_with_stats(doc, detected).0
}

pub fn scan_with_stats<D: HostDocument>(
    doc: &D,
    detected: &DetectedSet<D::Key>,
) -> (Vec<CandidateElement<D::Node>>, ScanStats) {
    let mut stats = ScanStats::default();
    let mut seen: HashSet<D::Key> = HashSet::new();
    let mut candidates = Vec::new();

    for (element, role) in doc.structural_elements() {
        stats.elements_seen += 1;
        if !is_instructor_label(&doc.text(&element)) {
            continue;
        }
        stats.labels_found += 1;

        for node in propose(doc, &element, role) {
            stats.cells_probed += 1;
            let name = normalize_text(&doc.text(&node));
            if !is_plausible_name(&name) {
                continue;
            }
            let key = doc.key(&node);
            if detected.contains(&key) || !seen.insert(key) {
                continue;
            }
            candidates.push(CandidateElement { node, name });
        }
    }

    stats.candidates = candidates.len();
    (candidates, stats)
}
