//! Targets and style changes carried by actions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of an element in a live frame
///
/// `dom_id` is the live-surface identity and may be regenerated on re-render.
/// `oid` is the origin id, stable across renders, and is the key used to find
/// the element in source code. Elements that were never mapped to source have
/// no oid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTarget {
    pub frame_id: String,
    pub dom_id: String,
    pub oid: Option<String>,
}

impl ActionTarget {
    pub fn new(
        frame_id: impl Into<String>,
        dom_id: impl Into<String>,
        oid: Option<impl Into<String>>,
    ) -> Self {
        Self {
            frame_id: frame_id.into(),
            dom_id: dom_id.into(),
            oid: oid.map(Into::into),
        }
    }

    /// Whether two targets point at the same live element
    pub fn same_element(&self, other: &Self) -> bool {
        self.frame_id == other.frame_id && self.dom_id == other.dom_id
    }
}

/// A before/after pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change<T> {
    pub original: T,
    pub updated: T,
}

impl<T: Clone> Change<T> {
    pub fn new(original: T, updated: T) -> Self {
        Self { original, updated }
    }

    /// The same change applied in the opposite direction
    pub fn reversed(&self) -> Self {
        Self {
            original: self.updated.clone(),
            updated: self.original.clone(),
        }
    }
}

/// How a style value should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StyleChangeKind {
    /// A literal CSS value
    #[default]
    Value,
    /// A named theme color that must be resolved before reaching the surface
    Custom,
}

/// A single style property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleChange {
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: StyleChangeKind,
}

impl StyleChange {
    /// A literal CSS value
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: StyleChangeKind::Value,
        }
    }

    /// A named theme color reference
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            value: name.into(),
            kind: StyleChangeKind::Custom,
        }
    }
}

/// Style property name to value, ordered for deterministic output
pub type StyleMap = BTreeMap<String, StyleChange>;

/// An element whose styles change, with the full before/after values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleActionTarget {
    pub frame_id: String,
    pub dom_id: String,
    pub oid: Option<String>,
    pub change: Change<StyleMap>,
}

impl StyleActionTarget {
    /// The bare element identity of this target
    pub fn target(&self) -> ActionTarget {
        ActionTarget {
            frame_id: self.frame_id.clone(),
            dom_id: self.dom_id.clone(),
            oid: self.oid.clone(),
        }
    }

    /// Whether both targets point at the same live element
    pub fn same_element(&self, other: &Self) -> bool {
        self.frame_id == other.frame_id && self.dom_id == other.dom_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_reversed() {
        let change = Change::new("a".to_string(), "b".to_string());
        let reversed = change.reversed();
        assert_eq!(reversed.original, "b");
        assert_eq!(reversed.updated, "a");
        assert_eq!(reversed.reversed(), change);
    }

    #[test]
    fn test_style_change_kind_serializes_as_type() {
        let json = serde_json::to_value(StyleChange::custom("brand-500")).unwrap_or_default();
        assert_eq!(json["type"], "custom");
        assert_eq!(json["value"], "brand-500");
    }

    #[test]
    fn test_same_element_ignores_oid() {
        let a = ActionTarget::new("f1", "d1", Some("o1"));
        let b = ActionTarget::new("f1", "d1", None::<String>);
        let c = ActionTarget::new("f2", "d1", Some("o1"));
        assert!(a.same_element(&b));
        assert!(!a.same_element(&c));
    }
}
