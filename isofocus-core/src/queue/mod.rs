//! Command Queue
//!
//! Owns a scene along with the history of every tracked change made to it, so that changes can be undone and redone.
//! The queue is the ground truth for the scene's current state.
//!
//! History is linear. Undoing some steps and then writing something new discards the undone steps.

use crate::{
    commands::{self, CommandConsumer, CommandError, DoUndo},
    state::scene::Scene,
};

pub mod writer;

pub type SceneQueueID = crate::id::StableID<SceneCommandQueue>;

struct SceneCommandQueueInner {
    /// Every recorded command, oldest first.
    history: Vec<commands::Command>,
    /// How many commands of `history` are currently applied. Everything after is redo-able.
    present: usize,
    scene: Scene,
}
pub struct SceneCommandQueue {
    inner: parking_lot::RwLock<SceneCommandQueueInner>,
    id: SceneQueueID,
}
impl Default for SceneCommandQueue {
    fn default() -> Self {
        Self::new(Scene::default())
    }
}
impl SceneCommandQueue {
    /// Create a queue from a scene, without a history.
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self {
            inner: SceneCommandQueueInner {
                history: Vec::new(),
                present: 0,
                scene,
            }
            .into(),
            id: SceneQueueID::next(),
        }
    }
    #[must_use]
    pub fn id(&self) -> SceneQueueID {
        self.id
    }
    /// Locks the queue for writing during the span of the closure. Every change made through the writer is tracked,
    /// and all of them together become a single step of history.
    pub fn write_with<F, T>(&self, write: F) -> T
    where
        F: FnOnce(&mut writer::CommandQueueWriter<'_>) -> T,
    {
        let lock = self.inner.write();
        let mut writer = writer::CommandQueueWriter {
            lock,
            commands: smallvec::SmallVec::new(),
        };
        // Panic safe - the writer's Drop impl keeps the history in sync with the scene.
        write(&mut writer)
    }
    /// Read the current scene.
    pub fn read_with<F, T>(&self, read: F) -> T
    where
        F: FnOnce(&Scene) -> T,
    {
        read(&self.inner.read().scene)
    }
    /// Change the scene behind history's back, as the editor does when the user deletes or renames
    /// something. Undoing a step that touched an object deleted this way will fail.
    pub fn edit_untracked<F, T>(&self, edit: F) -> T
    where
        F: FnOnce(&mut Scene) -> T,
    {
        edit(&mut self.inner.write().scene)
    }
    /// Take a copy of the scene as it is right now.
    #[must_use]
    pub fn peek_clone_scene(&self) -> Scene {
        self.read_with(Scene::clone)
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.inner.read().present > 0
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        let lock = self.inner.read();
        lock.present < lock.history.len()
    }
    /// Step back up to `num` steps. Returns how many were undone.
    ///
    /// Steps are undone one at a time. If one of them no longer matches the scene (for example, an object it touched
    /// has since been deleted) it is left applied, and the error is returned. Steps undone before it stay undone.
    pub fn undo_n(&self, num: usize) -> Result<usize, CommandError> {
        let mut lock = self.inner.write();
        let SceneCommandQueueInner {
            history,
            present,
            scene,
        } = &mut *lock;
        for done in 0..num {
            let Some(idx) = present.checked_sub(1) else {
                return Ok(done);
            };
            apply_atomic(scene, DoUndo::Undo(&history[idx]))?;
            *present = idx;
        }
        Ok(num)
    }
    /// Step forward up to `num` steps. Returns how many were redone. Errors as [`Self::undo_n`].
    pub fn redo_n(&self, num: usize) -> Result<usize, CommandError> {
        let mut lock = self.inner.write();
        let SceneCommandQueueInner {
            history,
            present,
            scene,
        } = &mut *lock;
        for done in 0..num {
            let Some(command) = history.get(*present) else {
                return Ok(done);
            };
            apply_atomic(scene, DoUndo::Do(command))?;
            *present += 1;
        }
        Ok(num)
    }
}

/// Apply a whole step, or nothing at all.
fn apply_atomic(scene: &mut Scene, command: DoUndo<'_, commands::Command>) -> Result<(), CommandError> {
    // Cheap path, single commands already promise to leave the scene alone on failure.
    if command.filter_map(commands::Command::scene).is_some() {
        return apply(scene, command);
    }
    let mut fork = scene.clone();
    apply(&mut fork, command)?;
    *scene = fork;
    Ok(())
}
fn apply(scene: &mut Scene, command: DoUndo<'_, commands::Command>) -> Result<(), CommandError> {
    match command {
        DoUndo::Do(commands::Command::Scene(c)) => scene.apply(DoUndo::Do(c)),
        DoUndo::Undo(commands::Command::Scene(c)) => scene.apply(DoUndo::Undo(c)),
        // Scopes are done front-to-back and undone back-to-front.
        DoUndo::Do(commands::Command::Meta(commands::MetaCommand::Scope(_, children))) => children
            .iter()
            .try_for_each(|child| apply(scene, DoUndo::Do(child))),
        DoUndo::Undo(commands::Command::Meta(commands::MetaCommand::Scope(_, children))) => {
            children
                .iter()
                .rev()
                .try_for_each(|child| apply(scene, DoUndo::Undo(child)))
        }
    }
}
