//! HoverController: debounce state machine
//!
//! # States (per anchor)
//! ```text
//!   Idle ──hover start──▶ Pending ──delay elapsed──▶ Active
//!    ▲                      │                          │
//!    └──────hover end───────┘      grace elapsed / close
//!    ▲                                                 │
//!    └─────────────────────────────────────────────────┘
//! ```
//!
//! One pointer means one hover intent: at most one Pending timer exists at a
//! time, and at most one anchor is Active. Timers go through a `Scheduler` so
//! tests can drive time by hand.

use std::fmt::Debug;

/// Which deferred action a timer stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Debounced popup open
    Open,
    /// Grace period before auto-dismiss
    Dismiss,
}

/// Identity of one scheduled timer. Sequence numbers are never reused, so a
/// late firing of a cancelled timer cannot be mistaken for the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub seq: u64,
}

/// Deferred-callback capability. Firing is reported back through
/// `HoverController::timer_fired`.
pub trait Scheduler {
    fn schedule(&mut self, token: TimerToken, delay_ms: u32);
    fn cancel(&mut self, token: TimerToken);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Pending,
    Active,
}

/// What the caller has to do after a timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverAction<K> {
    Open(K),
    Close,
}

#[derive(Debug)]
pub struct HoverController<K> {
    hover_delay_ms: u32,
    dismiss_grace_ms: u32,
    next_seq: u64,
    pending: Option<(K, TimerToken)>,
    active: Option<K>,
    dismiss: Option<TimerToken>,
}

impl<K: Copy + Eq + Debug> HoverController<K> {
    pub fn new(hover_delay_ms: u32, dismiss_grace_ms: u32) -> Self {
        Self {
            hover_delay_ms,
            dismiss_grace_ms,
            next_seq: 0,
            pending: None,
            active: None,
            dismiss: None,
        }
    }

    fn token(&mut self, kind: TimerKind) -> TimerToken {
        self.next_seq += 1;
        TimerToken {
            kind,
            seq: self.next_seq,
        }
    }

    pub fn state_of(&self, key: K) -> HoverState {
        if self.active == Some(key) {
            HoverState::Active
        } else if matches!(self.pending, Some((k, _)) if k == key) {
            HoverState::Pending
        } else {
            HoverState::Idle
        }
    }

    pub fn active(&self) -> Option<K> {
        self.active
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn has_pending_dismiss(&self) -> bool {
        self.dismiss.is_some()
    }

    /// Pointer entered an anchor.
    pub fn hover_start<S: Scheduler>(&mut self, key: K, scheduler: &mut S) {
        if self.active == Some(key) {
            // back on the anchor of the open popup
            self.cancel_dismiss(scheduler);
            return;
        }
        if let Some((pending_key, token)) = self.pending {
            if pending_key == key {
                return;
            }
            scheduler.cancel(token);
        }
        let token = self.token(TimerKind::Open);
        scheduler.schedule(token, self.hover_delay_ms);
        self.pending = Some((key, token));
    }

    /// Pointer left an anchor.
    pub fn hover_end<S: Scheduler>(&mut self, key: K, scheduler: &mut S) {
        if let Some((pending_key, token)) = self.pending {
            if pending_key == key {
                scheduler.cancel(token);
                self.pending = None;
            }
        }
        if self.active == Some(key) {
            self.schedule_dismiss(scheduler);
        }
    }

    /// Pointer entered the popup.
    pub fn popup_enter<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.cancel_dismiss(scheduler);
    }

    /// Pointer left the popup.
    pub fn popup_leave<S: Scheduler>(&mut self, scheduler: &mut S) {
        if self.active.is_some() {
            self.schedule_dismiss(scheduler);
        }
    }

    /// The popup went away for a reason other than our dismiss timer.
    pub fn popup_closed<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.cancel_dismiss(scheduler);
        self.active = None;
    }

    /// A scheduled timer elapsed. Unknown or superseded tokens are ignored.
    pub fn timer_fired<S: Scheduler>(&mut self, token: TimerToken, scheduler: &mut S) -> Option<HoverAction<K>> {
        match token.kind {
            TimerKind::Open => {
                let (key, live) = self.pending?;
                if live != token {
                    return None;
                }
                self.pending = None;
                self.cancel_dismiss(scheduler);
                self.active = Some(key);
                Some(HoverAction::Open(key))
            }
            TimerKind::Dismiss => {
                if self.dismiss != Some(token) {
                    return None;
                }
                self.dismiss = None;
                self.active = None;
                Some(HoverAction::Close)
            }
        }
    }

    fn schedule_dismiss<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.cancel_dismiss(scheduler);
        let token = self.token(TimerKind::Dismiss);
        scheduler.schedule(token, self.dismiss_grace_ms);
        self.dismiss = Some(token);
    }

    fn cancel_dismiss<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(token) = self.dismiss.take() {
            scheduler.cancel(token);
        }
    }
}
