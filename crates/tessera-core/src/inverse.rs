//! Inverse and redo transforms
//!
//! [`invert`] derives the action that undoes a recorded action. [`clean_for_redo`]
//! derives the forward action to re-apply when a recorded action is redone:
//! the same direction, but with fresh identities wherever an element or
//! group container is created again, since the ids it carried may have been
//! invalidated by re-renders in the meantime. Removals keep their ids: they
//! must name the node the undo put back.
//!
//! Both are pure and never touch their input.

use crate::action::{
    Action, ActionElement, DOM_ID_ATTRIBUTE, EditTextAction, ElementAction, GroupAction,
    GroupContainer, INSERTED_ATTRIBUTE, MoveElementAction, OID_ATTRIBUTE, StyleActionTarget,
    UpdateStyleAction, WriteCodeAction,
};
use crate::identity::IdGenerator;

/// The action that reverses `action`
///
/// `invert(&invert(a)) == a` for every action whose insert payload carries no
/// edit-text, paste or code-block fields; a removal's inverse is always a
/// plain re-insertion.
pub fn invert(action: &Action) -> Action {
    match action {
        Action::UpdateStyle(action) => Action::UpdateStyle(UpdateStyleAction {
            targets: action
                .targets
                .iter()
                .map(|target| StyleActionTarget {
                    change: target.change.reversed(),
                    ..target.clone()
                })
                .collect(),
        }),
        Action::InsertElement(action) => Action::RemoveElement(action.clone()),
        Action::RemoveElement(action) => Action::InsertElement(ElementAction {
            edit_text: None,
            paste_params: None,
            code_block: None,
            ..action.clone()
        }),
        Action::MoveElement(action) => Action::MoveElement(MoveElementAction {
            targets: action.targets.clone(),
            location: action.location.reversed(),
        }),
        Action::EditText(action) => Action::EditText(EditTextAction {
            targets: action.targets.clone(),
            original_content: action.new_content.clone(),
            new_content: action.original_content.clone(),
        }),
        Action::GroupElements(action) => Action::UngroupElements(mirror_group(action)),
        Action::UngroupElements(action) => Action::GroupElements(mirror_group(action)),
        Action::WriteCode(action) => Action::WriteCode(WriteCodeAction {
            diffs: action.diffs.iter().map(|diff| diff.reversed()).collect(),
        }),
        Action::InsertImage(action) => Action::RemoveImage(action.clone()),
        Action::RemoveImage(action) => Action::InsertImage(action.clone()),
    }
}

/// The forward action to apply when `action` is redone
///
/// Inserted elements and new group containers get fresh identities. Every
/// other variant, removals included, is copied unchanged.
pub fn clean_for_redo(action: &Action, ids: &dyn IdGenerator) -> Action {
    match action {
        Action::InsertElement(action) => Action::InsertElement(fresh_element(action, ids)),
        Action::GroupElements(action) => Action::GroupElements(fresh_group(action, ids)),
        Action::RemoveElement(_)
        | Action::UngroupElements(_)
        | Action::UpdateStyle(_)
        | Action::MoveElement(_)
        | Action::EditText(_)
        | Action::WriteCode(_)
        | Action::InsertImage(_)
        | Action::RemoveImage(_) => action.clone(),
    }
}

fn mirror_group(action: &GroupAction) -> GroupAction {
    GroupAction {
        parent: action.parent.clone(),
        container: action.container.clone(),
        children: action.children.clone(),
    }
}

fn fresh_element(action: &ElementAction, ids: &dyn IdGenerator) -> ElementAction {
    ElementAction {
        targets: action.targets.clone(),
        element: action.element.cleaned(ids),
        location: action.location.clone(),
        edit_text: action.edit_text,
        paste_params: action.paste_params.clone(),
        code_block: action.code_block.clone(),
    }
}

fn fresh_group(action: &GroupAction, ids: &dyn IdGenerator) -> GroupAction {
    GroupAction {
        parent: action.parent.clone(),
        container: action.container.cleaned(ids),
        children: action.children.clone(),
    }
}

impl ActionElement {
    /// A structural copy of this subtree where every node has fresh ids
    ///
    /// Identity attributes are rewritten to match and every node is marked
    /// as editor-inserted.
    pub fn cleaned(&self, ids: &dyn IdGenerator) -> ActionElement {
        let dom_id = ids.create_dom_id();
        let oid = ids.create_oid();

        let mut attributes = self.attributes.clone();
        attributes.insert(DOM_ID_ATTRIBUTE.to_string(), dom_id.clone());
        attributes.insert(OID_ATTRIBUTE.to_string(), oid.clone());
        attributes.insert(INSERTED_ATTRIBUTE.to_string(), "true".to_string());

        ActionElement {
            tag_name: self.tag_name.clone(),
            attributes,
            styles: self.styles.clone(),
            text_content: self.text_content.clone(),
            children: self.children.iter().map(|child| child.cleaned(ids)).collect(),
            dom_id,
            oid,
        }
    }
}

impl GroupContainer {
    /// A copy of this container with fresh ids
    pub fn cleaned(&self, ids: &dyn IdGenerator) -> GroupContainer {
        let dom_id = ids.create_dom_id();
        let oid = ids.create_oid();

        let mut attributes = self.attributes.clone();
        attributes.insert(DOM_ID_ATTRIBUTE.to_string(), dom_id.clone());
        attributes.insert(OID_ATTRIBUTE.to_string(), oid.clone());

        GroupContainer {
            dom_id,
            oid,
            tag_name: self.tag_name.clone(),
            attributes,
        }
    }
}
