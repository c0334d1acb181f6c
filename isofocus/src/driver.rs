//! Headless editor, driven by lines of text.
//!
//! A line that parses as a chord (`ctrl+alt+F`) is resolved through the keymap and dispatched. Anything else is
//! an editor command, standing in for what a user would do with the mouse:
//!
//! ```text
//! add <name>          new visible object
//! select <name>       make it the active object
//! deselect
//! delete <name>
//! rename <old> <new>
//! hide <name> / show <name>
//! area <view3d|outliner|properties|other>
//! print
//! ```

use crate::actions::{hotkeys::KeyboardHotkey, Action};
use crate::session::Keymap;
use isofocus_core::{
    commands::CommandError,
    host::{AreaType, SceneHost, ViewContext},
    isolate::{IsolateFocusController, Outcome, COMMAND_ID},
    queue::SceneCommandQueue,
    state::{scene::TargetError, visibility::PreconditionError, ObjectID, Scene},
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DriverError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("no object named {0:?}")]
    UnknownObject(String),
    #[error("unknown area {0:?}")]
    UnknownArea(String),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Target(#[from] TargetError),
}

pub struct Driver {
    queue: SceneCommandQueue,
    keymap: Keymap,
    context: ViewContext,
}
impl Driver {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self {
            queue: SceneCommandQueue::new(scene),
            keymap: Keymap::default(),
            context: ViewContext::viewport(None),
        }
    }
    /// A scene holding one visible object per name, the first of them active.
    #[must_use]
    pub fn with_objects<Name: Into<String>>(names: impl IntoIterator<Item = Name>) -> Self {
        let mut scene = Scene::new("Scene");
        let first = names
            .into_iter()
            .map(|name| scene.add_object(name, false))
            .reduce(|first, _| first);
        let mut this = Self::new(scene);
        this.context.active_object = first;
        this
    }
    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }
    #[must_use]
    pub fn queue(&self) -> &SceneCommandQueue {
        &self.queue
    }
    /// Run one line of input. Returns text to show the user, if any.
    pub fn handle_line(&mut self, line: &str) -> Result<Option<String>, DriverError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if let Ok(chord) = line.parse::<KeyboardHotkey>() {
            return self.press(&chord);
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        match (command, args.as_slice()) {
            ("add", [name]) => {
                self.queue
                    .edit_untracked(|scene| scene.add_object(*name, false));
                Ok(None)
            }
            ("select", [name]) => {
                self.context.active_object = Some(self.find(name)?);
                Ok(None)
            }
            ("deselect", []) => {
                self.context.active_object = None;
                Ok(None)
            }
            ("delete", [name]) => {
                let id = self.find(name)?;
                self.queue.edit_untracked(|scene| scene.remove_object(id));
                if self.context.active_object == Some(id) {
                    self.context.active_object = None;
                }
                Ok(None)
            }
            ("rename", [old, new]) => {
                let id = self.find(old)?;
                self.queue.edit_untracked(|scene| scene.rename(id, *new))?;
                Ok(None)
            }
            ("hide" | "show", [name]) => {
                let id = self.find(name)?;
                let hidden = command == "hide";
                self.queue
                    .edit_untracked(|scene| scene.set_hidden(id, hidden))?;
                Ok(None)
            }
            ("area", [area]) => {
                self.context.area = match *area {
                    "view3d" => AreaType::View3D,
                    "outliner" => AreaType::Outliner,
                    "properties" => AreaType::Properties,
                    "other" => AreaType::Other,
                    other => return Err(DriverError::UnknownArea(other.to_owned())),
                };
                Ok(None)
            }
            ("print", []) => Ok(Some(self.queue.read_with(describe))),
            _ => Err(DriverError::UnknownCommand(line.to_owned())),
        }
    }
    /// Resolve a chord and run whatever it's bound to. Unbound chords do nothing.
    pub fn press(&mut self, chord: &KeyboardHotkey) -> Result<Option<String>, DriverError> {
        let Some(action) = self.keymap.resolve(chord) else {
            log::debug!("{chord} is not bound");
            return Ok(None);
        };
        self.dispatch(action)
    }
    pub fn dispatch(&mut self, action: Action) -> Result<Option<String>, DriverError> {
        match action {
            Action::IsolateFocusToggle => {
                let context = self.context;
                let outcome = self
                    .queue
                    .write_with(|writer| IsolateFocusController.toggle(writer.scene(), &context));
                if outcome? == Outcome::Disabled {
                    log::debug!("{COMMAND_ID} unavailable in {:?}", context.area);
                    return Ok(None);
                }
                Ok(self
                    .queue
                    .read_with(|scene| scene.last_status().map(ToOwned::to_owned)))
            }
            Action::Undo => {
                let undone = self.queue.undo_n(1)?;
                Ok(Some(if undone == 0 { "Nothing to undo." } else { "Undone." }.to_owned()))
            }
            Action::Redo => {
                let redone = self.queue.redo_n(1)?;
                Ok(Some(if redone == 0 { "Nothing to redo." } else { "Redone." }.to_owned()))
            }
        }
    }
    fn find(&self, name: &str) -> Result<ObjectID, DriverError> {
        self.queue
            .read_with(|scene| scene.find_by_name(name))
            .ok_or_else(|| DriverError::UnknownObject(name.to_owned()))
    }
}

/// One line per object, with its visibility and whether isolation hid it.
fn describe(scene: &Scene) -> String {
    let store = scene.store();
    scene
        .iter()
        .map(|(id, object)| {
            let visibility = if object.is_hidden() { "hidden" } else { "visible" };
            if store.contains(id) {
                format!("{} {visibility} (isolated)", object.name)
            } else {
                format!("{} {visibility}", object.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
