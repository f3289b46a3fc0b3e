//! Theme color lookup for custom style values

use parking_lot::RwLock;
use std::collections::HashMap;

/// Resolves named theme colors to concrete CSS values
pub trait ColorRegistry: Send + Sync {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// A mutable name to value map of theme colors
#[derive(Debug, Default)]
pub struct ThemeColors {
    colors: RwLock<HashMap<String, String>>,
}

impl ThemeColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            colors: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Add or replace a color
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.colors.write().insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.colors.write().remove(name)
    }
}

impl ColorRegistry for ThemeColors {
    fn resolve(&self, name: &str) -> Option<String> {
        self.colors.read().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown() {
        let colors = ThemeColors::from_pairs([("brand-500", "#3b82f6")]);
        assert_eq!(colors.resolve("brand-500").as_deref(), Some("#3b82f6"));
        assert!(colors.resolve("brand-900").is_none());
    }

    #[test]
    fn test_set_and_remove() {
        let colors = ThemeColors::new();
        colors.set("accent", "#ff0000");
        assert_eq!(colors.resolve("accent").as_deref(), Some("#ff0000"));
        assert_eq!(colors.remove("accent").as_deref(), Some("#ff0000"));
        assert!(colors.resolve("accent").is_none());
    }
}
