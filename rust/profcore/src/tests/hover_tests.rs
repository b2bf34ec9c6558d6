use super::fixture::ManualScheduler;
use crate::popup::{HoverAction, HoverController, HoverState, TimerKind};

const DELAY: u32 = 300;
const GRACE: u32 = 500;

fn controller() -> (HoverController<u32>, ManualScheduler) {
    (HoverController::new(DELAY, GRACE), ManualScheduler::new())
}

/// Advance the clock and feed every due timer back into the controller.
fn tick(hover: &mut HoverController<u32>, sched: &mut ManualScheduler, ms: u64) -> Vec<HoverAction<u32>> {
    sched
        .advance(ms)
        .into_iter()
        .filter_map(|token| hover.timer_fired(token, sched))
        .collect()
}

fn open(hover: &mut HoverController<u32>, sched: &mut ManualScheduler, key: u32) {
    hover.hover_start(key, sched);
    assert_eq!(tick(hover, sched, u64::from(DELAY)), vec![HoverAction::Open(key)]);
}

// ============================================================================
// Debounce
// ============================================================================

#[test]
fn test_sustained_hover_opens_after_delay() {
    let (mut hover, mut sched) = controller();

    hover.hover_start(1, &mut sched);
    assert_eq!(hover.state_of(1), HoverState::Pending);
    assert!(tick(&mut hover, &mut sched, 299).is_empty());

    assert_eq!(tick(&mut hover, &mut sched, 1), vec![HoverAction::Open(1)]);
    assert_eq!(hover.state_of(1), HoverState::Active);
    assert!(!hover.has_pending());
}

#[test]
fn test_leaving_before_delay_cancels() {
    let (mut hover, mut sched) = controller();

    hover.hover_start(1, &mut sched);
    tick(&mut hover, &mut sched, 200);
    hover.hover_end(1, &mut sched);

    assert_eq!(sched.pending(), 0);
    assert!(tick(&mut hover, &mut sched, 1_000).is_empty());
    assert_eq!(hover.state_of(1), HoverState::Idle);
}

#[test]
fn test_only_one_pending_hover_globally() {
    let (mut hover, mut sched) = controller();

    hover.hover_start(1, &mut sched);
    tick(&mut hover, &mut sched, 100);
    hover.hover_start(2, &mut sched);

    assert_eq!(sched.pending_of(TimerKind::Open), 1);
    assert_eq!(hover.state_of(1), HoverState::Idle);
    assert_eq!(tick(&mut hover, &mut sched, u64::from(DELAY)), vec![HoverAction::Open(2)]);
}

#[test]
fn test_repeated_enter_on_pending_anchor_keeps_first_deadline() {
    let (mut hover, mut sched) = controller();

    hover.hover_start(1, &mut sched);
    tick(&mut hover, &mut sched, 200);
    hover.hover_start(1, &mut sched);

    assert_eq!(tick(&mut hover, &mut sched, 100), vec![HoverAction::Open(1)]);
}

#[test]
fn test_cancelled_token_is_ignored() {
    let (mut hover, mut sched) = controller();

    hover.hover_start(1, &mut sched);
    let stale = sched.tokens()[0];
    hover.hover_end(1, &mut sched);

    assert_eq!(hover.timer_fired(stale, &mut sched), None);
    assert_eq!(hover.active(), None);
}

// ============================================================================
// Dismissal
// ============================================================================

#[test]
fn test_leaving_anchor_closes_after_grace() {
    let (mut hover, mut sched) = controller();
    open(&mut hover, &mut sched, 1);

    hover.hover_end(1, &mut sched);
    assert!(hover.has_pending_dismiss());
    assert!(tick(&mut hover, &mut sched, 499).is_empty());
    assert_eq!(tick(&mut hover, &mut sched, 1), vec![HoverAction::Close]);
    assert_eq!(hover.active(), None);
}

#[test]
fn test_entering_popup_cancels_pending_dismissal() {
    let (mut hover, mut sched) = controller();
    open(&mut hover, &mut sched, 1);

    hover.hover_end(1, &mut sched);
    tick(&mut hover, &mut sched, 200);
    hover.popup_enter(&mut sched);

    assert!(!hover.has_pending_dismiss());
    assert!(tick(&mut hover, &mut sched, 5_000).is_empty());
    assert_eq!(hover.active(), Some(1));

    hover.popup_leave(&mut sched);
    assert_eq!(tick(&mut hover, &mut sched, u64::from(GRACE)), vec![HoverAction::Close]);
}

#[test]
fn test_returning_to_anchor_cancels_pending_dismissal() {
    let (mut hover, mut sched) = controller();
    open(&mut hover, &mut sched, 1);

    hover.hover_end(1, &mut sched);
    hover.hover_start(1, &mut sched);

    assert_eq!(sched.pending(), 0);
    assert_eq!(hover.state_of(1), HoverState::Active);
}

#[test]
fn test_hovering_another_anchor_replaces_active_without_grace() {
    let (mut hover, mut sched) = controller();
    open(&mut hover, &mut sched, 1);

    hover.hover_end(1, &mut sched);
    hover.hover_start(2, &mut sched);

    // the new popup opens before the old grace period would have run out
    assert_eq!(tick(&mut hover, &mut sched, u64::from(DELAY)), vec![HoverAction::Open(2)]);
    assert!(!hover.has_pending_dismiss());
    assert!(tick(&mut hover, &mut sched, 1_000).is_empty());
    assert_eq!(hover.active(), Some(2));
}

#[test]
fn test_explicit_close_clears_active_and_dismissal() {
    let (mut hover, mut sched) = controller();
    open(&mut hover, &mut sched, 1);
    hover.hover_end(1, &mut sched);

    hover.popup_closed(&mut sched);

    assert_eq!(hover.active(), None);
    assert_eq!(sched.pending(), 0);
    assert!(tick(&mut hover, &mut sched, 1_000).is_empty());
}

#[test]
fn test_popup_leave_without_active_popup_schedules_nothing() {
    let (mut hover, mut sched) = controller();
    hover.popup_leave(&mut sched);
    assert_eq!(sched.pending(), 0);
}
