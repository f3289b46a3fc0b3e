//! The edit log: every user mutation as a serializable value
//!
//! An [`Action`] describes one edit completely enough to apply it to a live
//! frame, mirror it into source files, and derive its opposite. Actions are
//! stored by value and never mutated after they are recorded; every
//! transformation produces a new action.
//!
//! Actions serialize as internally tagged JSON (`{"type": "update-style", ...}`)
//! with camelCase fields.

mod element;
mod target;
mod validate;

pub use element::{
    ActionElement, ActionLocation, CodeDiff, DOM_ID_ATTRIBUTE, GroupContainer, INSERTED_ATTRIBUTE,
    ImageContent, IndexActionLocation, OID_ATTRIBUTE, PasteParams,
};
pub use target::{ActionTarget, Change, StyleActionTarget, StyleChange, StyleChangeKind, StyleMap};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Style changes on one or more elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStyleAction {
    pub targets: Vec<StyleActionTarget>,
}

/// Payload shared by `insert-element` and `remove-element`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAction {
    pub targets: Vec<ActionTarget>,
    pub element: ActionElement,
    pub location: ActionLocation,
    #[serde(default)]
    pub edit_text: Option<bool>,
    #[serde(default)]
    pub paste_params: Option<PasteParams>,
    #[serde(default)]
    pub code_block: Option<String>,
}

/// Reorder elements within their parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveElementAction {
    pub targets: Vec<ActionTarget>,
    pub location: IndexActionLocation,
}

/// Replace the text content of elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTextAction {
    pub targets: Vec<ActionTarget>,
    pub original_content: String,
    pub new_content: String,
}

/// Payload shared by `group-elements` and `ungroup-elements`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAction {
    pub parent: ActionTarget,
    pub container: GroupContainer,
    pub children: Vec<ActionTarget>,
}

/// Literal source rewrites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteCodeAction {
    pub diffs: Vec<CodeDiff>,
}

/// Payload shared by `insert-image` and `remove-image`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAction {
    pub targets: Vec<ActionTarget>,
    pub image: ImageContent,
}

/// A single user edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    UpdateStyle(UpdateStyleAction),
    InsertElement(ElementAction),
    RemoveElement(ElementAction),
    MoveElement(MoveElementAction),
    EditText(EditTextAction),
    GroupElements(GroupAction),
    UngroupElements(GroupAction),
    WriteCode(WriteCodeAction),
    InsertImage(ImageAction),
    RemoveImage(ImageAction),
}

/// The discriminant of an [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    UpdateStyle,
    InsertElement,
    RemoveElement,
    MoveElement,
    EditText,
    GroupElements,
    UngroupElements,
    WriteCode,
    InsertImage,
    RemoveImage,
}

impl ActionKind {
    /// The wire name of this kind, e.g. `"update-style"`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateStyle => "update-style",
            Self::InsertElement => "insert-element",
            Self::RemoveElement => "remove-element",
            Self::MoveElement => "move-element",
            Self::EditText => "edit-text",
            Self::GroupElements => "group-elements",
            Self::UngroupElements => "ungroup-elements",
            Self::WriteCode => "write-code",
            Self::InsertImage => "insert-image",
            Self::RemoveImage => "remove-image",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::UpdateStyle(_) => ActionKind::UpdateStyle,
            Self::InsertElement(_) => ActionKind::InsertElement,
            Self::RemoveElement(_) => ActionKind::RemoveElement,
            Self::MoveElement(_) => ActionKind::MoveElement,
            Self::EditText(_) => ActionKind::EditText,
            Self::GroupElements(_) => ActionKind::GroupElements,
            Self::UngroupElements(_) => ActionKind::UngroupElements,
            Self::WriteCode(_) => ActionKind::WriteCode,
            Self::InsertImage(_) => ActionKind::InsertImage,
            Self::RemoveImage(_) => ActionKind::RemoveImage,
        }
    }

    /// Frames touched by this action, in first-seen order
    pub fn frame_ids(&self) -> Vec<&str> {
        let seen: Vec<&str> = match self {
            Self::UpdateStyle(action) => action.targets.iter().map(|t| t.frame_id.as_str()).collect(),
            Self::InsertElement(action) | Self::RemoveElement(action) => {
                action.targets.iter().map(|t| t.frame_id.as_str()).collect()
            }
            Self::MoveElement(action) => action.targets.iter().map(|t| t.frame_id.as_str()).collect(),
            Self::EditText(action) => action.targets.iter().map(|t| t.frame_id.as_str()).collect(),
            Self::GroupElements(action) | Self::UngroupElements(action) => {
                vec![action.parent.frame_id.as_str()]
            }
            Self::WriteCode(_) => Vec::new(),
            Self::InsertImage(action) | Self::RemoveImage(action) => {
                action.targets.iter().map(|t| t.frame_id.as_str()).collect()
            }
        };

        let mut frames = Vec::with_capacity(seen.len());
        for frame in seen {
            if !frames.contains(&frame) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Parse an action from its JSON form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this action to JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_action() -> Action {
        let mut original = StyleMap::new();
        original.insert("color".into(), StyleChange::value("black"));
        let mut updated = StyleMap::new();
        updated.insert("color".into(), StyleChange::value("red"));
        Action::UpdateStyle(UpdateStyleAction {
            targets: vec![StyleActionTarget {
                frame_id: "f1".into(),
                dom_id: "d1".into(),
                oid: Some("o1".into()),
                change: Change::new(original, updated),
            }],
        })
    }

    #[test]
    fn test_kind_matches_serde_tag() {
        let action = style_action();
        let json = serde_json::to_value(&action).unwrap_or_default();
        assert_eq!(json["type"], action.kind().as_str());
        assert_eq!(json["targets"][0]["frameId"], "f1");
        assert_eq!(json["targets"][0]["change"]["updated"]["color"]["value"], "red");
    }

    #[test]
    fn test_parse_from_editor_json() {
        let json = r#"{
            "type": "edit-text",
            "targets": [{"frameId": "f1", "domId": "d1", "oid": "o1"}],
            "originalContent": "Hello",
            "newContent": "Hello world"
        }"#;
        let action = Action::from_json(json);
        assert!(matches!(
            action,
            Ok(Action::EditText(EditTextAction { ref new_content, .. })) if new_content == "Hello world"
        ));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"type": "teleport-element", "targets": []}"#;
        assert!(Action::from_json(json).is_err());
    }

    #[test]
    fn test_frame_ids_deduplicated() {
        let action = Action::EditText(EditTextAction {
            targets: vec![
                ActionTarget::new("f1", "d1", Some("o1")),
                ActionTarget::new("f2", "d2", Some("o2")),
                ActionTarget::new("f1", "d3", Some("o3")),
            ],
            original_content: String::new(),
            new_content: "x".into(),
        });
        assert_eq!(action.frame_ids(), vec!["f1", "f2"]);
        assert_eq!(
            Action::WriteCode(WriteCodeAction { diffs: vec![] }).frame_ids(),
            Vec::<&str>::new()
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ActionKind::UngroupElements.to_string(), "ungroup-elements");
        assert_eq!(style_action().kind(), ActionKind::UpdateStyle);
    }
}
