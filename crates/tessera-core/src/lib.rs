//! # Tessera Core
//!
//! The edit log of a visual web editor.
//!
//! Every user mutation of a live page (style change, element insert, remove
//! or move, text edit, grouping, image insert, raw code write) is recorded as
//! an [`Action`](action::Action). This crate holds the action model and the
//! pure transforms the history engine is built on:
//!
//! - [`inverse::invert`] derives the action that undoes an action
//! - [`inverse::clean_for_redo`] derives the forward action for a redo, with
//!   fresh element identities where elements are recreated
//! - [`merge::update_transaction_actions`] coalesces a burst of edits into
//!   one history entry
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_core::prelude::*;
//!
//! let json = r#"{
//!     "type": "move-element",
//!     "targets": [{"frameId": "f1", "domId": "d1", "oid": "o1"}],
//!     "location": {"targetDomId": "list", "targetOid": null, "index": 3, "originalIndex": 1}
//! }"#;
//! let action = Action::from_json(json)?;
//! let undo = invert(&action);
//!
//! let Action::MoveElement(undo) = undo else { unreachable!() };
//! assert_eq!(undo.location.index, 1);
//! # Ok::<(), tessera_core::Error>(())
//! ```

pub mod action;
pub mod identity;
pub mod inverse;
pub mod merge;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Action model
    pub use crate::action::{
        Action, ActionElement, ActionKind, ActionLocation, ActionTarget, Change, CodeDiff,
        EditTextAction, ElementAction, GroupAction, GroupContainer, ImageAction, ImageContent,
        IndexActionLocation, MoveElementAction, PasteParams, StyleActionTarget, StyleChange,
        StyleChangeKind, StyleMap, UpdateStyleAction, WriteCodeAction,
    };

    // Transforms
    pub use crate::inverse::{clean_for_redo, invert};
    pub use crate::merge::update_transaction_actions;

    // Identity
    pub use crate::identity::{IdGenerator, RandomIds, SequentialIds};

    // Error handling
    pub use crate::{Error, Result};
}
