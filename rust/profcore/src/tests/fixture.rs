//! In-memory stand-ins for the browser: a synthetic page, a hand-cranked
//! clock, a recording popup surface and a canned transport.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use serde_json::json;

use crate::detect::{CellPos, HostDocument, LabelRole, VecGrid};
use crate::fetch::{RawResponse, Transport, TransportError};
use crate::popup::{Placement, PopupId, PopupSurface, Scheduler, TimerKind, TimerToken};

// ============================================================================
// SyntheticPage
// ============================================================================

#[derive(Debug, Clone)]
struct PageNode {
    text: String,
    role: LabelRole,
    cell: Option<(usize, CellPos)>,
    /// (sibling run, index inside the run)
    run: (usize, usize),
}

/// A flat page: tables plus runs of sibling elements. Node ids double as keys.
#[derive(Debug, Default)]
pub struct SyntheticPage {
    nodes: Vec<PageNode>,
    runs: Vec<Vec<usize>>,
    tables: Vec<VecGrid<usize>>,
    marks: RefCell<HashMap<usize, String>>,
}

impl SyntheticPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, text: &str, role: LabelRole, cell: Option<(usize, CellPos)>, run: usize) -> usize {
        let id = self.nodes.len();
        let index = self.runs[run].len();
        self.runs[run].push(id);
        self.nodes.push(PageNode {
            text: text.to_string(),
            role,
            cell,
            run: (run, index),
        });
        id
    }

    /// Add a table. The first `header_rows` rows are header cells. Returns
    /// node ids laid out like `rows`.
    pub fn table(&mut self, header_rows: usize, rows: &[&[&str]]) -> Vec<Vec<usize>> {
        let table = self.tables.len();
        let mut ids = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let run = self.runs.len();
            self.runs.push(Vec::new());
            let role = if r < header_rows {
                LabelRole::Header
            } else {
                LabelRole::DataCell
            };
            let row_ids: Vec<usize> = row
                .iter()
                .enumerate()
                .map(|(c, text)| self.push(text, role, Some((table, CellPos::new(r, c))), run))
                .collect();
            ids.push(row_ids);
        }
        self.tables.push(VecGrid { rows: ids.clone() });
        ids
    }

    /// Add sibling elements of one role that are not part of any table.
    pub fn run(&mut self, role: LabelRole, texts: &[&str]) -> Vec<usize> {
        let run = self.runs.len();
        self.runs.push(Vec::new());
        texts.iter().map(|text| self.push(text, role, None, run)).collect()
    }

    /// Sibling `<div>`s.
    pub fn containers(&mut self, texts: &[&str]) -> Vec<usize> {
        self.run(LabelRole::Container, texts)
    }

    pub fn set_text(&mut self, id: usize, text: &str) {
        self.nodes[id].text = text.to_string();
    }

    pub fn mark_of(&self, id: usize) -> Option<String> {
        self.marks.borrow().get(&id).cloned()
    }

    pub fn mark_count(&self) -> usize {
        self.marks.borrow().len()
    }
}

impl HostDocument for SyntheticPage {
    type Node = usize;
    type Key = usize;
    type Grid = VecGrid<usize>;

    fn key(&self, node: &usize) -> usize {
        *node
    }

    fn text(&self, node: &usize) -> String {
        self.nodes[*node].text.clone()
    }

    fn structural_elements(&self) -> Vec<(usize, LabelRole)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(id, node)| (id, node.role))
            .collect()
    }

    fn locate_cell(&self, cell: &usize) -> Option<(VecGrid<usize>, CellPos)> {
        let (table, pos) = self.nodes[*cell].cell?;
        Some((self.tables[table].clone(), pos))
    }

    fn following_siblings(&self, node: &usize, limit: usize) -> Vec<usize> {
        let (run, index) = self.nodes[*node].run;
        self.runs[run].iter().skip(index + 1).take(limit).copied().collect()
    }

    fn mark_detected(&self, node: &usize, name: &str) {
        self.marks.borrow_mut().insert(*node, name.to_string());
    }

    fn detected_name(&self, node: &usize) -> Option<String> {
        self.mark_of(*node)
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Virtual clock; timers only fire from `advance`.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: u64,
    queue: Vec<(u64, TimerToken)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.queue.iter().filter(|(_, t)| t.kind == kind).count()
    }

    pub fn tokens(&self) -> Vec<TimerToken> {
        self.queue.iter().map(|(_, t)| *t).collect()
    }

    /// Move the clock forward and hand back every token that came due, in order.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerToken> {
        self.now += ms;
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) = self.queue.drain(..).partition(|(at, _)| *at <= now);
        self.queue = rest;
        due.sort_by_key(|(at, t)| (*at, t.seq));
        due.into_iter().map(|(_, t)| t).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, token: TimerToken, delay_ms: u32) {
        self.queue.push((self.now + u64::from(delay_ms), token));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.queue.retain(|(_, t)| *t != token);
    }
}

// ============================================================================
// RecordingSurface
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AttachedPopup {
    pub placement: Placement,
    pub html: String,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub attached: HashMap<PopupId, AttachedPopup>,
    pub attach_count: usize,
    pub detach_count: usize,
    pub replace_count: usize,
    /// What `measured_height` reports; `None` models an unmeasurable surface.
    pub height: Option<f64>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(height: f64) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn live_count(&self) -> usize {
        self.attached.len()
    }

    pub fn html(&self, id: PopupId) -> Option<&str> {
        self.attached.get(&id).map(|p| p.html.as_str())
    }
}

impl PopupSurface for RecordingSurface {
    fn attach(&mut self, id: PopupId, placement: Placement, html: &str) {
        self.attach_count += 1;
        self.attached.insert(
            id,
            AttachedPopup {
                placement,
                html: html.to_string(),
            },
        );
    }

    fn replace_content(&mut self, id: PopupId, html: &str) {
        if let Some(popup) = self.attached.get_mut(&id) {
            self.replace_count += 1;
            popup.html = html.to_string();
        }
    }

    fn reposition(&mut self, id: PopupId, placement: Placement) {
        if let Some(popup) = self.attached.get_mut(&id) {
            popup.placement = placement;
        }
    }

    fn detach(&mut self, id: PopupId) {
        if self.attached.remove(&id).is_some() {
            self.detach_count += 1;
        }
    }

    fn measured_height(&self, id: PopupId) -> Option<f64> {
        self.attached.get(&id).and(self.height)
    }
}

// ============================================================================
// StubTransport
// ============================================================================

/// Replays queued results and records every request.
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    pub requests: RefCell<Vec<(String, u32)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }
}

impl Transport for StubTransport {
    async fn get(&self, url: &str, timeout_ms: u32) -> Result<RawResponse, TransportError> {
        self.requests.borrow_mut().push((url.to_string(), timeout_ms));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no response queued".into())))
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// A success body with `reviews` numbered review entries.
pub fn record_json(name: &str, rating: f64, reviews: usize) -> String {
    let reviews: Vec<_> = (1..=reviews)
        .map(|i| {
            json!({
                "rating": 5.0 - (i % 5) as f64,
                "text": format!("Review number {}", i),
                "course": format!("TCSS {}", 140 + i),
                "date": format!("2024-03-{:02}", i),
            })
        })
        .collect();
    json!({
        "name": name,
        "rating": rating,
        "summary": "Clear lectures, fair exams.",
        "reviews": reviews,
    })
    .to_string()
}
