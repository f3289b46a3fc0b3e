//! Applying actions to live frames
//!
//! Every frame an action touches is resolved before any surface call is
//! made, so a missing frame abandons the whole action instead of applying
//! part of it.

use crate::colors::ColorRegistry;
use crate::error::DispatchError;
use crate::surface::{LiveSurface, SurfaceResolver};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tessera_core::action::{
    Action, Change, ElementAction, GroupAction, ImageAction, StyleActionTarget, StyleChange,
    StyleChangeKind, StyleMap,
};

/// Surfaces resolved for one action
struct Surfaces(HashMap<String, Arc<dyn LiveSurface>>);

impl Surfaces {
    fn get(&self, frame_id: &str) -> Result<&Arc<dyn LiveSurface>, DispatchError> {
        self.0
            .get(frame_id)
            .ok_or_else(|| DispatchError::frame_not_found(frame_id))
    }
}

/// Routes actions to the live surfaces of their frames
pub struct ActionDispatcher {
    resolver: Arc<dyn SurfaceResolver>,
    colors: Arc<dyn ColorRegistry>,
}

impl ActionDispatcher {
    pub fn new(resolver: Arc<dyn SurfaceResolver>, colors: Arc<dyn ColorRegistry>) -> Self {
        Self { resolver, colors }
    }

    /// Apply an action to every frame it targets
    ///
    /// `write-code` actions are not applied here; frames reload on their own
    /// once the source changes.
    pub async fn dispatch(&self, action: &Action) -> Result<(), DispatchError> {
        let surfaces = self.resolve(action)?;

        match action {
            Action::UpdateStyle(action) => self.update_style(&surfaces, &action.targets).await,
            Action::InsertElement(action) => insert_element(&surfaces, action).await,
            Action::RemoveElement(action) => remove_element(&surfaces, action).await,
            Action::MoveElement(action) => {
                for target in &action.targets {
                    surfaces
                        .get(&target.frame_id)?
                        .move_element(target.dom_id.clone(), action.location.index)
                        .await
                        .map_err(|e| DispatchError::surface("move element", &target.dom_id, e))?;
                }
                Ok(())
            }
            Action::EditText(action) => {
                for target in &action.targets {
                    surfaces
                        .get(&target.frame_id)?
                        .edit_text(target.dom_id.clone(), action.new_content.clone())
                        .await
                        .map_err(|e| DispatchError::surface("edit text", &target.dom_id, e))?;
                }
                Ok(())
            }
            Action::GroupElements(action) => {
                let GroupAction {
                    parent,
                    container,
                    children,
                } = action;
                surfaces
                    .get(&parent.frame_id)?
                    .group_elements(parent.clone(), container.clone(), children.clone())
                    .await
                    .map_err(|e| DispatchError::surface("group elements", &parent.dom_id, e))
            }
            Action::UngroupElements(action) => {
                let parent = &action.parent;
                surfaces
                    .get(&parent.frame_id)?
                    .ungroup_elements(parent.clone(), action.container.clone())
                    .await
                    .map_err(|e| DispatchError::surface("ungroup elements", &parent.dom_id, e))
            }
            Action::InsertImage(action) => images(&surfaces, action, true).await,
            Action::RemoveImage(action) => images(&surfaces, action, false).await,
            Action::WriteCode(_) => Ok(()),
        }
    }

    fn resolve(&self, action: &Action) -> Result<Surfaces, DispatchError> {
        let mut surfaces = HashMap::new();
        for frame_id in action.frame_ids() {
            let Some(surface) = self.resolver.surface(frame_id) else {
                tracing::error!(frame_id, kind = %action.kind(), "Failed to get frame");
                return Err(DispatchError::frame_not_found(frame_id));
            };
            surfaces.insert(frame_id.to_string(), surface);
        }
        Ok(Surfaces(surfaces))
    }

    async fn update_style(
        &self,
        surfaces: &Surfaces,
        targets: &[StyleActionTarget],
    ) -> Result<(), DispatchError> {
        let mut calls = Vec::with_capacity(targets.len());
        for target in targets {
            let surface = surfaces.get(&target.frame_id)?;
            let change = Change {
                original: target.change.original.clone(),
                updated: self.resolve_colors(&target.change.updated),
            };
            let dom_id = target.dom_id.clone();
            calls.push(async move {
                surface
                    .update_style(dom_id.clone(), change)
                    .await
                    .map_err(|e| DispatchError::surface("update style", dom_id, e))
            });
        }
        first_error(join_all(calls).await)
    }

    /// Replace named theme colors with concrete values
    ///
    /// Unknown names become an empty value, which unsets the property.
    fn resolve_colors(&self, styles: &StyleMap) -> StyleMap {
        styles
            .iter()
            .map(|(property, change)| {
                let resolved = match change.kind {
                    StyleChangeKind::Value => change.clone(),
                    StyleChangeKind::Custom => match self.colors.resolve(&change.value) {
                        Some(value) => StyleChange::value(value),
                        None => {
                            tracing::warn!(property = %property, color = %change.value, "Unknown theme color");
                            StyleChange::value("")
                        }
                    },
                };
                (property.clone(), resolved)
            })
            .collect()
    }
}

async fn insert_element(surfaces: &Surfaces, action: &ElementAction) -> Result<(), DispatchError> {
    for target in &action.targets {
        surfaces
            .get(&target.frame_id)?
            .insert_element(
                action.element.clone(),
                action.location.clone(),
                action.edit_text.unwrap_or(false),
            )
            .await
            .map_err(|e| DispatchError::surface("insert element", &target.dom_id, e))?;
    }
    Ok(())
}

async fn remove_element(surfaces: &Surfaces, action: &ElementAction) -> Result<(), DispatchError> {
    for target in &action.targets {
        surfaces
            .get(&target.frame_id)?
            .remove_element(target.dom_id.clone(), action.location.clone())
            .await
            .map_err(|e| DispatchError::surface("remove element", &target.dom_id, e))?;
    }
    Ok(())
}

async fn images(surfaces: &Surfaces, action: &ImageAction, insert: bool) -> Result<(), DispatchError> {
    let mut calls = Vec::with_capacity(action.targets.len());
    for target in &action.targets {
        let surface = surfaces.get(&target.frame_id)?;
        let dom_id = target.dom_id.clone();
        let image = action.image.clone();
        calls.push(async move {
            let (operation, result) = if insert {
                ("insert image", surface.insert_image(dom_id.clone(), image).await)
            } else {
                ("remove image", surface.remove_image(dom_id.clone()).await)
            };
            result.map_err(|e| DispatchError::surface(operation, dom_id, e))
        });
    }
    first_error(join_all(calls).await)
}

/// Log every failure of a concurrent batch and report the first
fn first_error(results: Vec<Result<(), DispatchError>>) -> Result<(), DispatchError> {
    let mut first = None;
    for error in results.into_iter().filter_map(Result::err) {
        tracing::warn!("{error}");
        first.get_or_insert(error);
    }
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::colors::ThemeColors;
    use crate::surface::{FrameRegistry, SurfaceFuture};
    use anyhow::anyhow;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use tessera_core::action::{
        ActionElement, ActionLocation, ActionTarget, EditTextAction, GroupContainer, ImageContent,
        UpdateStyleAction,
    };

    /// Records calls as strings; fails calls on `fail_dom_id`
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
        fail_dom_id: Option<String>,
    }

    impl Recording {
        fn record(&self, call: String, dom_id: &str) -> SurfaceFuture<'_> {
            self.calls.lock().push(call);
            let failed = self.fail_dom_id.as_deref() == Some(dom_id);
            Box::pin(async move {
                if failed {
                    Err(anyhow!("surface gone"))
                } else {
                    Ok(())
                }
            })
        }
    }

    impl LiveSurface for Recording {
        fn update_style(&self, dom_id: String, change: Change<StyleMap>) -> SurfaceFuture<'_> {
            let values: Vec<_> = change
                .updated
                .iter()
                .map(|(k, v)| format!("{k}={}", v.value))
                .collect();
            self.record(format!("style {dom_id} {}", values.join(",")), &dom_id)
        }
        fn insert_element(&self, element: ActionElement, _: ActionLocation, _: bool) -> SurfaceFuture<'_> {
            self.record(format!("insert {}", element.dom_id), &element.dom_id)
        }
        fn remove_element(&self, dom_id: String, _: ActionLocation) -> SurfaceFuture<'_> {
            self.record(format!("remove {dom_id}"), &dom_id)
        }
        fn move_element(&self, dom_id: String, index: usize) -> SurfaceFuture<'_> {
            self.record(format!("move {dom_id} {index}"), &dom_id)
        }
        fn edit_text(&self, dom_id: String, content: String) -> SurfaceFuture<'_> {
            self.record(format!("text {dom_id} {content}"), &dom_id)
        }
        fn group_elements(
            &self,
            parent: ActionTarget,
            _: GroupContainer,
            children: Vec<ActionTarget>,
        ) -> SurfaceFuture<'_> {
            self.record(format!("group {} {}", parent.dom_id, children.len()), &parent.dom_id)
        }
        fn ungroup_elements(&self, parent: ActionTarget, _: GroupContainer) -> SurfaceFuture<'_> {
            self.record(format!("ungroup {}", parent.dom_id), &parent.dom_id)
        }
        fn insert_image(&self, dom_id: String, _: ImageContent) -> SurfaceFuture<'_> {
            self.record(format!("image+ {dom_id}"), &dom_id)
        }
        fn remove_image(&self, dom_id: String) -> SurfaceFuture<'_> {
            self.record(format!("image- {dom_id}"), &dom_id)
        }
    }

    fn dispatcher(surface: Arc<Recording>) -> ActionDispatcher {
        let registry = FrameRegistry::new();
        registry.register("f1", surface);
        ActionDispatcher::new(
            Arc::new(registry),
            Arc::new(ThemeColors::from_pairs([("brand", "#123456")])),
        )
    }

    fn text_in(frames: &[&str]) -> Action {
        Action::EditText(EditTextAction {
            targets: frames
                .iter()
                .enumerate()
                .map(|(i, f)| ActionTarget::new(*f, format!("d{i}"), Some("o")))
                .collect(),
            original_content: "a".into(),
            new_content: "b".into(),
        })
    }

    #[tokio::test]
    async fn test_missing_frame_aborts_before_any_call() {
        let surface = Arc::new(Recording::default());
        let dispatcher = dispatcher(surface.clone());

        let err = dispatcher.dispatch(&text_in(&["f1", "f2"])).await.unwrap_err();
        assert!(matches!(err, DispatchError::FrameNotFound { frame_id } if frame_id == "f2"));
        assert!(surface.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_custom_colors_resolved() {
        let surface = Arc::new(Recording::default());
        let dispatcher = dispatcher(surface.clone());

        let updated = BTreeMap::from([
            ("backgroundColor".to_string(), StyleChange::custom("brand")),
            ("color".to_string(), StyleChange::custom("missing")),
            ("width".to_string(), StyleChange::value("10px")),
        ]);
        let original = updated.keys().map(|k| (k.clone(), StyleChange::value(""))).collect();
        let action = Action::UpdateStyle(UpdateStyleAction {
            targets: vec![StyleActionTarget {
                frame_id: "f1".into(),
                dom_id: "d1".into(),
                oid: None,
                change: Change::new(original, updated),
            }],
        });

        dispatcher.dispatch(&action).await.unwrap();
        assert_eq!(
            *surface.calls.lock(),
            vec!["style d1 backgroundColor=#123456,color=,width=10px"]
        );
    }

    #[tokio::test]
    async fn test_sequential_failure_short_circuits() {
        let surface = Arc::new(Recording {
            fail_dom_id: Some("d0".into()),
            ..Recording::default()
        });
        let dispatcher = dispatcher(surface.clone());

        let err = dispatcher.dispatch(&text_in(&["f1", "f1"])).await.unwrap_err();
        assert!(matches!(err, DispatchError::Surface { operation: "edit text", .. }));
        assert_eq!(*surface.calls.lock(), vec!["text d0 b"]);
    }

    #[tokio::test]
    async fn test_group_is_one_call_on_parent() {
        let surface = Arc::new(Recording::default());
        let dispatcher = dispatcher(surface.clone());

        let action = Action::GroupElements(GroupAction {
            parent: ActionTarget::new("f1", "p", Some("p-oid")),
            container: GroupContainer {
                dom_id: "c".into(),
                oid: "c-oid".into(),
                tag_name: "div".into(),
                attributes: BTreeMap::new(),
            },
            children: vec![
                ActionTarget::new("f1", "a", Some("a-oid")),
                ActionTarget::new("f1", "b", Some("b-oid")),
            ],
        });
        dispatcher.dispatch(&action).await.unwrap();
        assert_eq!(*surface.calls.lock(), vec!["group p 2"]);
    }

    #[tokio::test]
    async fn test_images_all_attempted() {
        let surface = Arc::new(Recording {
            fail_dom_id: Some("d0".into()),
            ..Recording::default()
        });
        let dispatcher = dispatcher(surface.clone());

        let action = Action::InsertImage(ImageAction {
            targets: vec![
                ActionTarget::new("f1", "d0", Some("o0")),
                ActionTarget::new("f1", "d1", Some("o1")),
            ],
            image: ImageContent {
                file_name: "cat.png".into(),
                content: String::new(),
                mime_type: "image/png".into(),
                original_path: None,
            },
        });

        assert!(dispatcher.dispatch(&action).await.is_err());
        assert_eq!(surface.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_write_code_touches_no_surface() {
        let surface = Arc::new(Recording::default());
        let dispatcher = dispatcher(surface.clone());

        let action = Action::WriteCode(tessera_core::action::WriteCodeAction { diffs: Vec::new() });
        dispatcher.dispatch(&action).await.unwrap();
        assert!(surface.calls.lock().is_empty());
    }
}
