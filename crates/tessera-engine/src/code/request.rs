//! Per-element source edit descriptors

use serde::{Deserialize, Serialize};
use tessera_core::action::{
    Action, ActionElement, ActionLocation, ActionTarget, GroupContainer, ImageContent,
    IndexActionLocation, PasteParams, StyleMap,
};

/// A structural edit applied to the element with the request's oid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StructureChange {
    /// Insert a new child
    #[serde(rename_all = "camelCase")]
    Insert {
        element: ActionElement,
        location: ActionLocation,
        paste_params: Option<PasteParams>,
    },
    /// Remove this element
    Remove { oid: String },
    /// Move the child `oid` to a new index
    Move {
        oid: String,
        location: IndexActionLocation,
    },
    /// Wrap children in a new container
    Group {
        container: GroupContainer,
        children: Vec<ActionTarget>,
    },
    /// Unwrap a container
    Ungroup {
        container: GroupContainer,
        children: Vec<ActionTarget>,
    },
    /// Set an image on this element
    InsertImage { image: ImageContent },
    /// Clear the image on this element
    RemoveImage,
}

/// Everything to change on one source element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEditRequest {
    pub oid: String,
    #[serde(default)]
    pub styles: StyleMap,
    pub text_content: Option<String>,
    #[serde(default)]
    pub structure_changes: Vec<StructureChange>,
}

impl CodeEditRequest {
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            ..Self::default()
        }
    }
}

/// Requests keyed by oid, in first-use order
#[derive(Default)]
struct RequestSet {
    requests: Vec<CodeEditRequest>,
}

impl RequestSet {
    fn entry(&mut self, oid: &str) -> &mut CodeEditRequest {
        let index = match self.requests.iter().position(|r| r.oid == oid) {
            Some(index) => index,
            None => {
                self.requests.push(CodeEditRequest::new(oid));
                self.requests.len() - 1
            }
        };
        &mut self.requests[index]
    }

    /// Look up the request for `oid`, logging and skipping when it is missing
    fn for_target(&mut self, oid: Option<&str>, dom_id: &str) -> Option<&mut CodeEditRequest> {
        match oid {
            Some(oid) => Some(self.entry(oid)),
            None => {
                tracing::warn!(dom_id, "No oid for target, skipping source edit");
                None
            }
        }
    }
}

/// Convert an action into the source edits that mirror it
///
/// `write-code` actions produce no requests; their diffs are applied as-is.
pub fn edit_requests(action: &Action) -> Vec<CodeEditRequest> {
    let mut set = RequestSet::default();

    match action {
        Action::UpdateStyle(action) => {
            for target in &action.targets {
                if let Some(request) = set.for_target(target.oid.as_deref(), &target.dom_id) {
                    request.styles.extend(
                        target
                            .change
                            .updated
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone())),
                    );
                }
            }
        }
        Action::InsertElement(action) => {
            let location = &action.location;
            if let Some(request) = set.for_target(location.target_oid(), location.target_dom_id()) {
                request.structure_changes.push(StructureChange::Insert {
                    element: action.element.clone(),
                    location: location.clone(),
                    paste_params: action.paste_params.clone(),
                });
            }
        }
        Action::RemoveElement(action) => {
            let oid = action.element.oid.clone();
            set.entry(&oid)
                .structure_changes
                .push(StructureChange::Remove { oid: oid.clone() });
        }
        Action::MoveElement(action) => {
            let location = &action.location;
            for target in &action.targets {
                let Some(oid) = target.oid.clone() else {
                    tracing::warn!(dom_id = %target.dom_id, "No oid for moved element, skipping source edit");
                    continue;
                };
                if let Some(request) =
                    set.for_target(location.target_oid.as_deref(), &location.target_dom_id)
                {
                    request.structure_changes.push(StructureChange::Move {
                        oid,
                        location: location.clone(),
                    });
                }
            }
        }
        Action::EditText(action) => {
            for target in &action.targets {
                if let Some(request) = set.for_target(target.oid.as_deref(), &target.dom_id) {
                    request.text_content = Some(action.new_content.clone());
                }
            }
        }
        Action::GroupElements(group) => {
            let parent = &group.parent;
            if let Some(request) = set.for_target(parent.oid.as_deref(), &parent.dom_id) {
                request.structure_changes.push(StructureChange::Group {
                    container: group.container.clone(),
                    children: group.children.clone(),
                });
            }
        }
        Action::UngroupElements(group) => {
            let parent = &group.parent;
            if let Some(request) = set.for_target(parent.oid.as_deref(), &parent.dom_id) {
                request.structure_changes.push(StructureChange::Ungroup {
                    container: group.container.clone(),
                    children: group.children.clone(),
                });
            }
        }
        Action::InsertImage(action) => {
            for target in &action.targets {
                if let Some(request) = set.for_target(target.oid.as_deref(), &target.dom_id) {
                    request.structure_changes.push(StructureChange::InsertImage {
                        image: action.image.clone(),
                    });
                }
            }
        }
        Action::RemoveImage(action) => {
            for target in &action.targets {
                if let Some(request) = set.for_target(target.oid.as_deref(), &target.dom_id) {
                    request.structure_changes.push(StructureChange::RemoveImage);
                }
            }
        }
        Action::WriteCode(_) => {}
    }

    set.requests
}
