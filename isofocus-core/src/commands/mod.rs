//! # Commands
//!
//! Commands are the way the scene is modified when history is tracked. Every visibility change and every
//! write to the isolation store made through a [`crate::queue::writer`] is recorded as a command, which can
//! later be undone and redone.

pub use crate::state::scene::commands::Command as SceneCommand;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("command constructed for a state that does not match the current state")]
    MismatchedState,
    #[error("resource referenced by the command is not found")]
    UnknownResource,
}
pub trait CommandConsumer<C> {
    /// Apply a single command. If this generates an error,
    /// the state of `self` should *not* be observably changed.
    fn apply(&mut self, command: DoUndo<'_, C>) -> Result<(), CommandError>;
}
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeType {
    /// Commands are grouped because they were individual parts of a single, larger operation.
    Atoms,
    /// A writer panicked mid write. The commands may be an incomplete operation,
    /// but are kept so the history still matches the scene.
    WritePanic,
}
/// Commands about commands!
#[derive(Clone, Debug)]
pub enum MetaCommand {
    /// Many commands that the user sees as one step, e.g. a whole isolate toggle.
    Scope(ScopeType, Box<[Command]>),
}

#[derive(Clone, Debug)]
pub enum Command {
    Meta(MetaCommand),
    Scene(SceneCommand),
}
impl From<MetaCommand> for Command {
    fn from(value: MetaCommand) -> Self {
        Self::Meta(value)
    }
}
impl From<SceneCommand> for Command {
    fn from(value: SceneCommand) -> Self {
        Self::Scene(value)
    }
}
impl Command {
    #[must_use]
    pub fn meta(&self) -> Option<&MetaCommand> {
        match self {
            Self::Meta(m) => Some(m),
            Self::Scene(_) => None,
        }
    }
    #[must_use]
    pub fn scene(&self) -> Option<&SceneCommand> {
        match self {
            Self::Scene(s) => Some(s),
            Self::Meta(_) => None,
        }
    }
}

#[derive(PartialEq, Eq, Debug)]
pub enum DoUndo<'c, T> {
    Do(&'c T),
    Undo(&'c T),
}
impl<'c, T> DoUndo<'c, T> {
    /// Apply a closure to the inner T, keeping the Do or Undo status.
    /// Returns None if the closure returns None.
    pub fn filter_map<Func, Return>(&self, f: Func) -> Option<DoUndo<'c, Return>>
    where
        Func: FnOnce(&'c T) -> Option<&'c Return>,
        Return: 'c,
    {
        match self {
            Self::Do(c) => Some(DoUndo::Do(f(c)?)),
            Self::Undo(c) => Some(DoUndo::Undo(f(c)?)),
        }
    }
    /// Swap Do for Undo and vice versa.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Do(c) => Self::Undo(c),
            Self::Undo(c) => Self::Do(c),
        }
    }
}
// Derive would require T: Copy.
impl<T> Clone for DoUndo<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for DoUndo<'_, T> {}
