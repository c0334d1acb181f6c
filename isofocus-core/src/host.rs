//! # Host
//!
//! Everything the isolate controller needs from the editor it runs inside of. The editor owns the objects,
//! the viewport, and the status bar. The controller only talks to them through [`SceneHost`].

use crate::state::{
    scene::{ObjectID, TargetError},
    visibility::{PreconditionError, VisibilityStore},
};

/// A view of one object, as reported by the host.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ObjectInfo {
    pub id: ObjectID,
    pub name: String,
    pub hidden: bool,
}

/// The kind of editor area a command was invoked from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AreaType {
    View3D,
    Outliner,
    Properties,
    Other,
}

/// Where and on what a command was invoked.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ViewContext {
    pub area: AreaType,
    /// The active object of the selection, if any.
    pub active_object: Option<ObjectID>,
}
impl ViewContext {
    #[must_use]
    pub fn viewport(active_object: Option<ObjectID>) -> Self {
        Self {
            area: AreaType::View3D,
            active_object,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("no viewport available to frame")]
    NoViewport,
    #[error("{} is not in the scene", .0)]
    SelectionNotFound(ObjectID),
}

/// Capabilities of the editor hosting the isolate controller.
pub trait SceneHost {
    /// All objects of the current view layer, in the host's order, hidden or not.
    fn view_layer_objects(&self) -> Vec<ObjectInfo>;
    /// Find an object by its stable ID. None if it has been deleted.
    fn lookup_object(&self, id: ObjectID) -> Option<ObjectInfo>;
    fn set_hidden(&mut self, id: ObjectID, hidden: bool) -> Result<(), TargetError>;
    /// Ask the viewport to frame the given object. Purely cosmetic.
    fn frame_view(&mut self, selection: ObjectID) -> Result<(), FrameError>;
    /// Show a message to the user.
    fn report_status(&mut self, message: &str);

    /// The scene-scoped isolation record.
    fn visibility_store(&self) -> &VisibilityStore;
    /// See [`VisibilityStore::capture`].
    fn capture_isolation(&mut self, ids: Vec<ObjectID>) -> Result<(), PreconditionError>;
    /// See [`VisibilityStore::drain`].
    fn drain_isolation(&mut self) -> Result<Vec<ObjectID>, PreconditionError>;
}
impl<Host> SceneHost for &mut Host
where
    Host: SceneHost + ?Sized,
{
    fn view_layer_objects(&self) -> Vec<ObjectInfo> {
        (**self).view_layer_objects()
    }
    fn lookup_object(&self, id: ObjectID) -> Option<ObjectInfo> {
        (**self).lookup_object(id)
    }
    fn set_hidden(&mut self, id: ObjectID, hidden: bool) -> Result<(), TargetError> {
        (**self).set_hidden(id, hidden)
    }
    fn frame_view(&mut self, selection: ObjectID) -> Result<(), FrameError> {
        (**self).frame_view(selection)
    }
    fn report_status(&mut self, message: &str) {
        (**self).report_status(message);
    }
    fn visibility_store(&self) -> &VisibilityStore {
        (**self).visibility_store()
    }
    fn capture_isolation(&mut self, ids: Vec<ObjectID>) -> Result<(), PreconditionError> {
        (**self).capture_isolation(ids)
    }
    fn drain_isolation(&mut self) -> Result<Vec<ObjectID>, PreconditionError> {
        (**self).drain_isolation()
    }
}
