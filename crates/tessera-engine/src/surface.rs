//! Live frame surfaces
//!
//! A [`LiveSurface`] is the editor's handle on one rendered frame: an opaque
//! remote object that mutates the page it renders. The engine reaches frames
//! only through a [`SurfaceResolver`], so the dispatcher never needs to know
//! how frames are hosted.

use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tessera_core::action::{
    ActionElement, ActionLocation, ActionTarget, Change, GroupContainer, ImageContent, StyleMap,
};

/// Future returned by every surface call
pub type SurfaceFuture<'a> = BoxFuture<'a, anyhow::Result<()>>;

/// Element mutation primitives exposed by one live frame
///
/// Calls are scoped to a single element (or, for grouping, a single parent).
/// Timeouts are the implementation's responsibility.
pub trait LiveSurface: Send + Sync {
    /// Apply style values to an element
    fn update_style(&self, dom_id: String, change: Change<StyleMap>) -> SurfaceFuture<'_>;

    /// Insert an element subtree at a location
    fn insert_element(
        &self,
        element: ActionElement,
        location: ActionLocation,
        edit_text: bool,
    ) -> SurfaceFuture<'_>;

    /// Remove the element `dom_id` found at a location
    fn remove_element(&self, dom_id: String, location: ActionLocation) -> SurfaceFuture<'_>;

    /// Move an element to a child index within its parent
    fn move_element(&self, dom_id: String, index: usize) -> SurfaceFuture<'_>;

    /// Replace an element's text content
    fn edit_text(&self, dom_id: String, content: String) -> SurfaceFuture<'_>;

    /// Wrap children of `parent` in a new container
    fn group_elements(
        &self,
        parent: ActionTarget,
        container: GroupContainer,
        children: Vec<ActionTarget>,
    ) -> SurfaceFuture<'_>;

    /// Unwrap a container, moving its children into `parent`
    fn ungroup_elements(&self, parent: ActionTarget, container: GroupContainer) -> SurfaceFuture<'_>;

    /// Set an image on an element
    fn insert_image(&self, dom_id: String, image: ImageContent) -> SurfaceFuture<'_>;

    /// Clear the image on an element
    fn remove_image(&self, dom_id: String) -> SurfaceFuture<'_>;
}

/// Looks up the live surface of a frame
pub trait SurfaceResolver: Send + Sync {
    fn surface(&self, frame_id: &str) -> Option<Arc<dyn LiveSurface>>;
}

/// Frame id to surface map, shared between the host and the engine
#[derive(Clone, Default)]
pub struct FrameRegistry {
    frames: Arc<RwLock<HashMap<String, Arc<dyn LiveSurface>>>>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the surface for a frame
    pub fn register(&self, frame_id: impl Into<String>, surface: Arc<dyn LiveSurface>) {
        let frame_id = frame_id.into();
        tracing::debug!(frame_id = %frame_id, "Registered frame surface");
        self.frames.write().insert(frame_id, surface);
    }

    /// Forget a frame, returning its surface if it was registered
    pub fn unregister(&self, frame_id: &str) -> Option<Arc<dyn LiveSurface>> {
        let removed = self.frames.write().remove(frame_id);
        if removed.is_some() {
            tracing::debug!(frame_id, "Unregistered frame surface");
        }
        removed
    }

    pub fn contains(&self, frame_id: &str) -> bool {
        self.frames.read().contains_key(frame_id)
    }

    pub fn len(&self) -> usize {
        self.frames.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.read().is_empty()
    }
}

impl SurfaceResolver for FrameRegistry {
    fn surface(&self, frame_id: &str) -> Option<Arc<dyn LiveSurface>> {
        self.frames.read().get(frame_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSurface;

    impl LiveSurface for NullSurface {
        fn update_style(&self, _: String, _: Change<StyleMap>) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn insert_element(&self, _: ActionElement, _: ActionLocation, _: bool) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn remove_element(&self, _: String, _: ActionLocation) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn move_element(&self, _: String, _: usize) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn edit_text(&self, _: String, _: String) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn group_elements(
            &self,
            _: ActionTarget,
            _: GroupContainer,
            _: Vec<ActionTarget>,
        ) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn ungroup_elements(&self, _: ActionTarget, _: GroupContainer) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn insert_image(&self, _: String, _: ImageContent) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
        fn remove_image(&self, _: String) -> SurfaceFuture<'_> {
            Box::pin(async { Ok(()) })
        }
    }

    #[test]
    fn test_registry_register_and_resolve() {
        let registry = FrameRegistry::new();
        assert!(registry.is_empty());

        registry.register("frame-1", Arc::new(NullSurface));
        assert!(registry.contains("frame-1"));
        assert!(registry.surface("frame-1").is_some());
        assert!(registry.surface("frame-2").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_clones_share_frames() {
        let registry = FrameRegistry::new();
        let shared = registry.clone();
        registry.register("frame-1", Arc::new(NullSurface));
        assert!(shared.contains("frame-1"));

        assert!(shared.unregister("frame-1").is_some());
        assert!(!registry.contains("frame-1"));
        assert!(registry.unregister("frame-1").is_none());
    }
}
