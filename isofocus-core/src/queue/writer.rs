/// Any type which can sink commands.
pub trait CommandWrite<Command> {
    /// Inserts a command.
    fn write(&mut self, command: Command);
}
impl<Write, Command> CommandWrite<Command> for &mut Write
where
    Write: CommandWrite<Command>,
{
    fn write(&mut self, command: Command) {
        (**self).write(command);
    }
}
impl<Command> CommandWrite<Command> for Vec<Command> {
    fn write(&mut self, command: Command) {
        self.push(command);
    }
}
// Any subcommand that can be wrapped in Command can be written into any
// smallvec of Command.
impl<Subcommand, Array> CommandWrite<Subcommand> for smallvec::SmallVec<Array>
where
    Subcommand: Into<crate::commands::Command>,
    Array: smallvec::Array<Item = crate::commands::Command>,
{
    fn write(&mut self, command: Subcommand) {
        self.push(command.into());
    }
}

pub struct CommandQueueWriter<'a> {
    pub(super) lock: parking_lot::RwLockWriteGuard<'a, super::SceneCommandQueueInner>,
    // Optimize for exactly one command. A toggle usually writes more, but most edits don't.
    pub(super) commands: smallvec::SmallVec<[crate::commands::Command; 1]>,
}
// If this is leaked, the scene has changed but the history never hears of it. The lock stays held
// forever though, so nobody can observe the mismatch.
impl Drop for CommandQueueWriter<'_> {
    fn drop(&mut self) {
        use crate::commands;
        if self.commands.is_empty() {
            return;
        }

        // Exactly one history entry per write - bundle into a scope if more.
        // If we're unwinding, mark it so (even if it's just one command long)
        let command = if std::thread::panicking() {
            commands::Command::Meta(commands::MetaCommand::Scope(
                commands::ScopeType::WritePanic,
                std::mem::take(&mut self.commands).into_boxed_slice(),
            ))
        } else if self.commands.len() == 1 {
            // Len checked.
            let Some(command) = self.commands.pop() else {
                return;
            };
            command
        } else {
            commands::Command::Meta(commands::MetaCommand::Scope(
                commands::ScopeType::Atoms,
                std::mem::take(&mut self.commands).into_boxed_slice(),
            ))
        };

        log::trace!("Writing new command: {:#?}", command);

        let inner = &mut *self.lock;
        // A new branch of history, the redo tail is gone.
        inner.history.truncate(inner.present);
        inner.history.push(command);
        inner.present = inner.history.len();
    }
}
impl CommandQueueWriter<'_> {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.commands.is_empty()
    }
    /// A [`crate::host::SceneHost`] over the queue's scene, recording every change.
    pub fn scene(
        &'_ mut self,
    ) -> crate::state::scene::writer::SceneWriter<
        '_,
        &mut smallvec::SmallVec<[crate::commands::Command; 1]>,
    > {
        crate::state::scene::writer::SceneWriter::new(&mut self.commands, &mut self.lock.scene)
    }
}
