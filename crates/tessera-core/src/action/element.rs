//! Element trees, locations and other structural payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute holding an element's live-surface id
pub const DOM_ID_ATTRIBUTE: &str = "data-odid";

/// Attribute holding an element's origin id
pub const OID_ATTRIBUTE: &str = "data-oid";

/// Attribute marking an element created by the editor rather than by source
pub const INSERTED_ATTRIBUTE: &str = "data-onlook-inserted";

/// A detached element subtree, as inserted into or removed from a frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionElement {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    pub text_content: Option<String>,
    #[serde(default)]
    pub children: Vec<ActionElement>,
    pub dom_id: String,
    pub oid: String,
}

impl ActionElement {
    /// Create an element with no attributes, styles or children
    pub fn new(tag_name: impl Into<String>, dom_id: impl Into<String>, oid: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text_content: None,
            children: Vec::new(),
            dom_id: dom_id.into(),
            oid: oid.into(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: ActionElement) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this element and every descendant, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ActionElement)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// The wrapper element created by grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupContainer {
    pub dom_id: String,
    pub oid: String,
    pub tag_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Position addressed by child index within a parent
///
/// `index` is where the element ends up, `original_index` where it was
/// before the action. Both are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexActionLocation {
    pub target_dom_id: String,
    pub target_oid: Option<String>,
    pub index: usize,
    pub original_index: usize,
}

impl IndexActionLocation {
    /// The same location with `index` and `original_index` swapped
    pub fn reversed(&self) -> Self {
        Self {
            target_dom_id: self.target_dom_id.clone(),
            target_oid: self.target_oid.clone(),
            index: self.original_index,
            original_index: self.index,
        }
    }
}

/// Where an element is inserted or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionLocation {
    /// First child of the target
    #[serde(rename_all = "camelCase")]
    Prepend {
        target_dom_id: String,
        target_oid: Option<String>,
    },
    /// Last child of the target
    #[serde(rename_all = "camelCase")]
    Append {
        target_dom_id: String,
        target_oid: Option<String>,
    },
    /// Explicit child index of the target
    Index(IndexActionLocation),
}

impl ActionLocation {
    pub fn target_dom_id(&self) -> &str {
        match self {
            Self::Prepend { target_dom_id, .. } | Self::Append { target_dom_id, .. } => {
                target_dom_id
            }
            Self::Index(location) => &location.target_dom_id,
        }
    }

    pub fn target_oid(&self) -> Option<&str> {
        match self {
            Self::Prepend { target_oid, .. } | Self::Append { target_oid, .. } => {
                target_oid.as_deref()
            }
            Self::Index(location) => location.target_oid.as_deref(),
        }
    }
}

/// Where a pasted element came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteParams {
    pub oid: String,
    pub dom_id: String,
}

/// Image payload for image insert/remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub file_name: String,
    /// Base64 encoded image data
    pub content: String,
    pub mime_type: String,
    pub original_path: Option<String>,
}

/// A whole-file source rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDiff {
    pub path: String,
    pub original: String,
    pub generated: String,
}

impl CodeDiff {
    pub fn new(
        path: impl Into<String>,
        original: impl Into<String>,
        generated: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            original: original.into(),
            generated: generated.into(),
        }
    }

    /// The same diff applied in the opposite direction
    pub fn reversed(&self) -> Self {
        Self {
            path: self.path.clone(),
            original: self.generated.clone(),
            generated: self.original.clone(),
        }
    }
}
