use super::{commands::Command, ObjectID, Scene, TargetError};
use crate::host::{FrameError, ObjectInfo, SceneHost};
use crate::queue::writer::CommandWrite;
use crate::state::visibility::{PreconditionError, VisibilityStore};

/// A [`SceneHost`] that records every change it makes to the scene as a [`Command`].
///
/// Framing and status reports are passed through untracked, they are not part of the scene's history.
pub struct SceneWriter<'a, Write: CommandWrite<Command>> {
    writer: Write,
    scene: &'a mut Scene,
}
impl<'a, Write: CommandWrite<Command>> std::ops::Deref for SceneWriter<'a, Write> {
    type Target = Scene;
    fn deref(&self) -> &Self::Target {
        self.scene
    }
}
impl<'a, Write: CommandWrite<Command>> SceneWriter<'a, Write> {
    pub fn new(writer: Write, scene: &'a mut Scene) -> Self {
        Self { writer, scene }
    }
}
impl<Write: CommandWrite<Command>> SceneHost for SceneWriter<'_, Write> {
    fn view_layer_objects(&self) -> Vec<ObjectInfo> {
        self.scene.view_layer_objects()
    }
    fn lookup_object(&self, id: ObjectID) -> Option<ObjectInfo> {
        self.scene.lookup_object(id)
    }
    fn set_hidden(&mut self, id: ObjectID, hidden: bool) -> Result<(), TargetError> {
        let from = self
            .scene
            .is_hidden(id)
            .ok_or(TargetError::TargetNotFound)?;
        // Nothing to record.
        if from == hidden {
            return Ok(());
        }
        self.scene.set_hidden(id, hidden)?;
        self.writer.write(Command::HiddenChanged {
            target: id,
            from,
            to: hidden,
        });
        Ok(())
    }
    fn frame_view(&mut self, selection: ObjectID) -> Result<(), FrameError> {
        self.scene.frame_view(selection)
    }
    fn report_status(&mut self, message: &str) {
        self.scene.report_status(message);
    }
    fn visibility_store(&self) -> &VisibilityStore {
        self.scene.store()
    }
    fn capture_isolation(&mut self, ids: Vec<ObjectID>) -> Result<(), PreconditionError> {
        self.scene.capture_isolation(ids)?;
        // An empty capture leaves the store as it was.
        if self.scene.store().is_active() {
            self.writer.write(Command::IsolationCaptured {
                ids: self.scene.store().ids().into(),
            });
        }
        Ok(())
    }
    fn drain_isolation(&mut self) -> Result<Vec<ObjectID>, PreconditionError> {
        let ids = self.scene.drain_isolation()?;
        self.writer.write(Command::IsolationDrained {
            ids: ids.as_slice().into(),
        });
        Ok(ids)
    }
}
