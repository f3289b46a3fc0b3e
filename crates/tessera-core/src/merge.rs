//! Coalescing of actions pushed during a transaction
//!
//! An interactive gesture (scrubbing a color picker, dragging an element)
//! pushes many actions in a burst. Inside a transaction they collapse into
//! one pending action per kind, so the gesture commits as a single history
//! entry whose inverse restores the state from before the gesture started.

use crate::action::{Action, StyleActionTarget, UpdateStyleAction};

/// Fold `incoming` into the pending actions of an open transaction
///
/// - No pending action of the same kind: `incoming` is appended.
/// - Pending `update-style`: merged per target (see [`merge_style_actions`]).
/// - Any other kind: `incoming` replaces the pending action of that kind.
pub fn update_transaction_actions(pending: &mut Vec<Action>, incoming: Action) {
    let kind = incoming.kind();
    let Some(index) = pending.iter().position(|a| a.kind() == kind) else {
        pending.push(incoming);
        return;
    };

    match (&mut pending[index], incoming) {
        (Action::UpdateStyle(existing), Action::UpdateStyle(incoming)) => {
            merge_style_actions(existing, incoming);
        }
        (existing, incoming) => *existing = incoming,
    }
}

/// Merge a later style action into an earlier one
///
/// For an element present in both, style keys are unioned: `updated` takes
/// the latest value, `original` keeps the value from the first time the key
/// was touched. Elements only present in `incoming` are appended.
pub fn merge_style_actions(existing: &mut UpdateStyleAction, incoming: UpdateStyleAction) {
    for target in incoming.targets {
        match existing.targets.iter_mut().find(|t| t.same_element(&target)) {
            Some(current) => merge_style_target(current, target),
            None => existing.targets.push(target),
        }
    }
}

fn merge_style_target(current: &mut StyleActionTarget, incoming: StyleActionTarget) {
    let StyleActionTarget { oid, change, .. } = incoming;
    if current.oid.is_none() {
        current.oid = oid;
    }
    for (property, value) in change.original {
        current.change.original.entry(property).or_insert(value);
    }
    current.change.updated.extend(change.updated);
}
