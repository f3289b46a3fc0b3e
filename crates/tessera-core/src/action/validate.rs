//! Invariant checks the type system cannot express

use super::{Action, StyleActionTarget};
use crate::{Error, Result};

impl Action {
    /// Check that this action is well formed
    ///
    /// Rejects empty target lists, style changes whose `original` and
    /// `updated` maps have different keys, and code diffs without a path.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        let empty_targets = || Error::invalid(kind, "action has no targets");

        match self {
            Self::UpdateStyle(action) => {
                if action.targets.is_empty() {
                    return Err(empty_targets());
                }
                for target in &action.targets {
                    check_style_keys(target)?;
                }
            }
            Self::InsertElement(action) | Self::RemoveElement(action) => {
                if action.targets.is_empty() {
                    return Err(empty_targets());
                }
            }
            Self::MoveElement(action) => {
                if action.targets.is_empty() {
                    return Err(empty_targets());
                }
            }
            Self::EditText(action) => {
                if action.targets.is_empty() {
                    return Err(empty_targets());
                }
            }
            Self::GroupElements(action) | Self::UngroupElements(action) => {
                if action.children.is_empty() {
                    return Err(Error::invalid(kind, "group has no children"));
                }
            }
            Self::WriteCode(action) => {
                if let Some(diff) = action.diffs.iter().find(|d| d.path.is_empty()) {
                    return Err(Error::invalid(
                        kind,
                        format!("diff without a path (generated {} bytes)", diff.generated.len()),
                    ));
                }
            }
            Self::InsertImage(action) | Self::RemoveImage(action) => {
                if action.targets.is_empty() {
                    return Err(empty_targets());
                }
            }
        }
        Ok(())
    }
}

fn check_style_keys(target: &StyleActionTarget) -> Result<()> {
    let original = target.change.original.keys();
    let updated = target.change.updated.keys();
    if original.eq(updated) {
        return Ok(());
    }
    Err(Error::invalid(
        super::ActionKind::UpdateStyle,
        format!(
            "style change on {} has mismatched keys: original {:?}, updated {:?}",
            target.dom_id,
            target.change.original.keys().collect::<Vec<_>>(),
            target.change.updated.keys().collect::<Vec<_>>()
        ),
    ))
}
