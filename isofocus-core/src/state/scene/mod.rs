//! # Scene
//!
//! An in-memory scene: an ordered set of objects with a hidden flag each, plus the scene-scoped
//! [`VisibilityStore`]. This is the reference implementation of [`crate::host::SceneHost`], used when
//! there is no editor to drive.

pub mod commands;
pub mod writer;

use super::visibility::{PreconditionError, VisibilityStore};
use crate::host::{FrameError, ObjectInfo, SceneHost};

pub type ObjectID = crate::id::StableID<Object>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Object {
    /// Display name. Not unique, and free to change at any time.
    pub name: String,
    hidden: bool,
    /// Objects outside the view layer still exist, but are not eligible for visibility toggling.
    in_view_layer: bool,
}
impl Object {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
    #[must_use]
    pub fn in_view_layer(&self) -> bool {
        self.in_view_layer
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TargetError {
    #[error("ID not found")]
    TargetNotFound,
}

/// What the viewport was last asked to show.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub framed: Option<ObjectID>,
}

#[derive(Clone, Default)]
pub struct Scene {
    pub name: String,
    /// Insertion order of `objects`.
    order: Vec<ObjectID>,
    objects: hashbrown::HashMap<ObjectID, Object>,
    store: VisibilityStore,
    viewport: Viewport,
    last_status: Option<String>,
}
impl Scene {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Add a new object at the end of the scene.
    pub fn add_object(&mut self, name: impl Into<String>, hidden: bool) -> ObjectID {
        let id = ObjectID::next();
        self.objects.insert(
            id,
            Object {
                name: name.into(),
                hidden,
                in_view_layer: true,
            },
        );
        self.order.push(id);
        id
    }
    /// Delete an object outright. References to it elsewhere (the visibility store, history) go stale.
    pub fn remove_object(&mut self, id: ObjectID) -> Option<Object> {
        let removed = self.objects.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(removed)
    }
    #[must_use]
    pub fn get(&self, id: ObjectID) -> Option<&Object> {
        self.objects.get(&id)
    }
    pub fn rename(&mut self, id: ObjectID, name: impl Into<String>) -> Result<(), TargetError> {
        let object = self.objects.get_mut(&id).ok_or(TargetError::TargetNotFound)?;
        object.name = name.into();
        Ok(())
    }
    pub fn set_in_view_layer(&mut self, id: ObjectID, in_view_layer: bool) -> Result<(), TargetError> {
        let object = self.objects.get_mut(&id).ok_or(TargetError::TargetNotFound)?;
        object.in_view_layer = in_view_layer;
        Ok(())
    }
    /// Hidden state of the object, or None if it doesn't exist.
    #[must_use]
    pub fn is_hidden(&self, id: ObjectID) -> Option<bool> {
        self.objects.get(&id).map(Object::is_hidden)
    }
    /// Iterate all objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectID, &Object)> + '_ {
        self.order
            .iter()
            .filter_map(|id| Some((*id, self.objects.get(id)?)))
    }
    /// First object with this display name, in insertion order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ObjectID> {
        self.iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    /// Snapshot of every object's hidden flag.
    #[must_use]
    pub fn visibility_map(&self) -> hashbrown::HashMap<ObjectID, bool> {
        self.iter().map(|(id, object)| (id, object.hidden)).collect()
    }
    #[must_use]
    pub fn store(&self) -> &VisibilityStore {
        &self.store
    }
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
    /// The most recent message passed to [`SceneHost::report_status`].
    #[must_use]
    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }
    fn info(id: ObjectID, object: &Object) -> ObjectInfo {
        ObjectInfo {
            id,
            name: object.name.clone(),
            hidden: object.hidden,
        }
    }
}

impl SceneHost for Scene {
    fn view_layer_objects(&self) -> Vec<ObjectInfo> {
        self.iter()
            .filter(|(_, object)| object.in_view_layer)
            .map(|(id, object)| Self::info(id, object))
            .collect()
    }
    fn lookup_object(&self, id: ObjectID) -> Option<ObjectInfo> {
        self.get(id).map(|object| Self::info(id, object))
    }
    fn set_hidden(&mut self, id: ObjectID, hidden: bool) -> Result<(), TargetError> {
        let object = self.objects.get_mut(&id).ok_or(TargetError::TargetNotFound)?;
        object.hidden = hidden;
        Ok(())
    }
    fn frame_view(&mut self, selection: ObjectID) -> Result<(), FrameError> {
        if !self.objects.contains_key(&selection) {
            return Err(FrameError::SelectionNotFound(selection));
        }
        self.viewport.framed = Some(selection);
        Ok(())
    }
    fn report_status(&mut self, message: &str) {
        log::info!("[{}] {message}", self.name);
        self.last_status = Some(message.to_owned());
    }
    fn visibility_store(&self) -> &VisibilityStore {
        &self.store
    }
    fn capture_isolation(&mut self, ids: Vec<ObjectID>) -> Result<(), PreconditionError> {
        self.store.capture(ids)
    }
    fn drain_isolation(&mut self) -> Result<Vec<ObjectID>, PreconditionError> {
        self.store.drain()
    }
}

impl crate::commands::CommandConsumer<commands::Command> for Scene {
    fn apply(
        &mut self,
        command: crate::commands::DoUndo<'_, commands::Command>,
    ) -> Result<(), crate::commands::CommandError> {
        use crate::commands::{CommandError, DoUndo};
        use commands::Command;

        match command {
            DoUndo::Do(Command::HiddenChanged { target, from, to })
            | DoUndo::Undo(Command::HiddenChanged {
                target,
                from: to,
                to: from,
            }) => {
                let Some(object) = self.objects.get_mut(target) else {
                    return Err(CommandError::UnknownResource);
                };
                if object.hidden != *from {
                    return Err(CommandError::MismatchedState);
                }
                object.hidden = *to;
                Ok(())
            }
            DoUndo::Do(Command::IsolationCaptured { ids })
            | DoUndo::Undo(Command::IsolationDrained { ids }) => {
                // Store must be empty to take these back.
                if self.store.is_active() {
                    return Err(CommandError::MismatchedState);
                }
                self.store
                    .capture(ids.iter().copied())
                    .map_err(|_| CommandError::MismatchedState)
            }
            DoUndo::Undo(Command::IsolationCaptured { ids })
            | DoUndo::Do(Command::IsolationDrained { ids }) => {
                if self.store.ids() != &ids[..] {
                    return Err(CommandError::MismatchedState);
                }
                self.store
                    .drain()
                    .map(|_| ())
                    .map_err(|_| CommandError::MismatchedState)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commands::{CommandConsumer, CommandError, DoUndo};

    #[test]
    fn iteration_order() {
        let mut scene = Scene::new("Test");
        let a = scene.add_object("A", false);
        let b = scene.add_object("B", true);
        let c = scene.add_object("C", false);
        scene.remove_object(b).unwrap();

        let order: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, c]);
        assert_eq!(scene.len(), 2);
    }
    #[test]
    fn lookup_survives_rename() {
        let mut scene = Scene::new("Test");
        let cube = scene.add_object("Cube", false);
        scene.rename(cube, "Cube.001").unwrap();

        let info = scene.lookup_object(cube).unwrap();
        assert_eq!(info.name, "Cube.001");
        assert_eq!(scene.find_by_name("Cube"), None);
        assert_eq!(scene.find_by_name("Cube.001"), Some(cube));
    }
    #[test]
    fn view_layer_excludes() {
        let mut scene = Scene::new("Test");
        let a = scene.add_object("A", false);
        let b = scene.add_object("B", false);
        scene.set_in_view_layer(b, false).unwrap();

        let listed: Vec<_> = scene.view_layer_objects().into_iter().map(|o| o.id).collect();
        assert_eq!(listed, vec![a]);
        // Still reachable by id.
        assert!(scene.lookup_object(b).is_some());
    }
    #[test]
    fn frame_missing_object() {
        let mut scene = Scene::new("Test");
        let a = scene.add_object("A", false);
        scene.remove_object(a);
        assert_eq!(scene.frame_view(a), Err(FrameError::SelectionNotFound(a)));
        assert_eq!(scene.viewport().framed, None);
    }
    #[test]
    fn hidden_changed_checks_state() {
        let mut scene = Scene::new("Test");
        let a = scene.add_object("A", false);
        let command = commands::Command::HiddenChanged {
            target: a,
            from: false,
            to: true,
        };

        scene.apply(DoUndo::Do(&command)).unwrap();
        assert_eq!(scene.is_hidden(a), Some(true));
        // Already applied, state no longer matches.
        assert_eq!(
            scene.apply(DoUndo::Do(&command)),
            Err(CommandError::MismatchedState)
        );
        scene.apply(DoUndo::Undo(&command)).unwrap();
        assert_eq!(scene.is_hidden(a), Some(false));

        scene.remove_object(a);
        assert_eq!(
            scene.apply(DoUndo::Do(&command)),
            Err(CommandError::UnknownResource)
        );
    }
    #[test]
    fn isolation_commands_mirror() {
        let mut scene = Scene::new("Test");
        let a = scene.add_object("A", false);
        let ids: Box<[ObjectID]> = vec![a].into();
        let captured = commands::Command::IsolationCaptured { ids: ids.clone() };
        let drained = commands::Command::IsolationDrained { ids };

        scene.apply(DoUndo::Do(&captured)).unwrap();
        assert!(scene.store().is_active());
        assert_eq!(
            scene.apply(DoUndo::Do(&captured)),
            Err(CommandError::MismatchedState)
        );
        scene.apply(DoUndo::Do(&drained)).unwrap();
        assert!(!scene.store().is_active());
        scene.apply(DoUndo::Undo(&drained)).unwrap();
        assert_eq!(scene.store().ids(), &[a]);
        scene.apply(DoUndo::Undo(&captured)).unwrap();
        assert!(!scene.store().is_active());
    }
}
