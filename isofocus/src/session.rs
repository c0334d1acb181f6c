//! Add-on lifecycle.
//!
//! Starting the add-on binds every configured chord in the host's keymap, stopping it removes exactly
//! those bindings again. Bindings made by anyone else are never touched.

use crate::actions::{hotkeys::KeyboardHotkey, Action};
use crate::preferences::Hotkeys;

pub type BindingHandle = isofocus_core::StableID<Binding>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Binding {
    pub chord: KeyboardHotkey,
    pub action: Action,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum KeymapError {
    #[error("{chord} is already bound to {action:?}")]
    ChordTaken { chord: KeyboardHotkey, action: Action },
    #[error("no binding {0}")]
    UnknownBinding(BindingHandle),
}

/// The host's table of key chords.
pub trait KeymapRegistry {
    /// Bind a chord. Fails if the chord is bound already.
    fn add(&mut self, chord: KeyboardHotkey, action: Action) -> Result<BindingHandle, KeymapError>;
    /// Remove a binding previously returned by [`Self::add`].
    fn remove(&mut self, handle: BindingHandle) -> Result<Binding, KeymapError>;
}
impl<R: KeymapRegistry> KeymapRegistry for &mut R {
    fn add(&mut self, chord: KeyboardHotkey, action: Action) -> Result<BindingHandle, KeymapError> {
        (**self).add(chord, action)
    }
    fn remove(&mut self, handle: BindingHandle) -> Result<Binding, KeymapError> {
        (**self).remove(handle)
    }
}

/// In-memory keymap. Chords resolve by exact match.
#[derive(Default, Debug)]
pub struct Keymap {
    bindings: hashbrown::HashMap<BindingHandle, Binding>,
    chords: hashbrown::HashMap<KeyboardHotkey, BindingHandle>,
}
impl Keymap {
    #[must_use]
    pub fn resolve(&self, chord: &KeyboardHotkey) -> Option<Action> {
        let handle = self.chords.get(chord)?;
        self.bindings.get(handle).map(|binding| binding.action)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
impl KeymapRegistry for Keymap {
    fn add(&mut self, chord: KeyboardHotkey, action: Action) -> Result<BindingHandle, KeymapError> {
        if let Some(action) = self.resolve(&chord) {
            return Err(KeymapError::ChordTaken { chord, action });
        }
        let handle = BindingHandle::next();
        self.bindings.insert(handle, Binding { chord, action });
        self.chords.insert(chord, handle);
        Ok(handle)
    }
    fn remove(&mut self, handle: BindingHandle) -> Result<Binding, KeymapError> {
        let binding = self
            .bindings
            .remove(&handle)
            .ok_or(KeymapError::UnknownBinding(handle))?;
        self.chords.remove(&binding.chord);
        Ok(binding)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("add-on already started")]
    AlreadyStarted,
    #[error("add-on not started")]
    NotStarted,
    #[error(transparent)]
    Keymap(#[from] KeymapError),
}

/// Keymap bindings owned by the add-on while it is running.
#[derive(Default, Debug)]
pub struct AddonSession {
    handles: Option<Vec<BindingHandle>>,
}
impl AddonSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.handles.is_some()
    }
    /// Handles of every binding made by [`Self::start`], empty if stopped.
    #[must_use]
    pub fn handles(&self) -> &[BindingHandle] {
        self.handles.as_deref().unwrap_or_default()
    }
    /// Bind every configured chord. If any of them fails, the ones bound so far are removed again
    /// and the session stays stopped.
    pub fn start(
        &mut self,
        mut registry: impl KeymapRegistry,
        hotkeys: &Hotkeys,
    ) -> Result<(), SessionError> {
        if self.is_started() {
            return Err(SessionError::AlreadyStarted);
        }
        let mut handles = Vec::new();
        for (chord, action) in hotkeys.keys_to_actions.iter() {
            match registry.add(chord, action) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    for handle in handles {
                        if let Err(e) = registry.remove(handle) {
                            log::warn!("rolling back {handle}: {e}");
                        }
                    }
                    return Err(e.into());
                }
            }
        }
        log::info!("started, {} chords bound", handles.len());
        self.handles = Some(handles);
        Ok(())
    }
    /// Remove every binding made by [`Self::start`]. Returns how many were removed.
    ///
    /// Bindings the host already dropped on its own are skipped.
    pub fn stop(&mut self, mut registry: impl KeymapRegistry) -> Result<usize, SessionError> {
        let handles = self.handles.take().ok_or(SessionError::NotStarted)?;
        let mut removed = 0;
        for handle in handles {
            match registry.remove(handle) {
                Ok(_) => removed += 1,
                Err(e) => log::warn!("{e}"),
            }
        }
        log::info!("stopped, {removed} chords unbound");
        Ok(removed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::actions::hotkeys::{ActionsToKeys, Key};

    fn hotkeys() -> Hotkeys {
        Hotkeys::from_keys(ActionsToKeys::default())
    }
    const TOGGLE: KeyboardHotkey = KeyboardHotkey::new(Key::F).ctrl().alt();

    #[test]
    fn start_binds_everything() {
        let hotkeys = hotkeys();
        let mut keymap = Keymap::default();
        let mut session = AddonSession::new();
        session.start(&mut keymap, &hotkeys).unwrap();

        assert!(session.is_started());
        assert_eq!(keymap.len(), hotkeys.keys_to_actions.iter().count());
        assert_eq!(session.handles().len(), keymap.len());
        assert_eq!(keymap.resolve(&TOGGLE), Some(Action::IsolateFocusToggle));
    }
    #[test]
    fn start_twice() {
        let hotkeys = hotkeys();
        let mut keymap = Keymap::default();
        let mut session = AddonSession::new();
        session.start(&mut keymap, &hotkeys).unwrap();
        let bound = keymap.len();

        assert_eq!(
            session.start(&mut keymap, &hotkeys),
            Err(SessionError::AlreadyStarted)
        );
        assert_eq!(keymap.len(), bound);
    }
    #[test]
    fn stop_leaves_foreign_bindings() {
        let hotkeys = hotkeys();
        let mut keymap = Keymap::default();
        let foreign = KeyboardHotkey::new(Key::Q).ctrl();
        keymap.add(foreign, Action::Undo).unwrap();

        let mut session = AddonSession::new();
        session.start(&mut keymap, &hotkeys).unwrap();
        let removed = session.stop(&mut keymap).unwrap();

        assert_eq!(removed, hotkeys.keys_to_actions.iter().count());
        assert!(!session.is_started());
        assert!(session.handles().is_empty());
        assert_eq!(keymap.len(), 1);
        assert_eq!(keymap.resolve(&foreign), Some(Action::Undo));
        assert_eq!(keymap.resolve(&TOGGLE), None);
    }
    #[test]
    fn stop_without_start() {
        let mut keymap = Keymap::default();
        assert_eq!(
            AddonSession::new().stop(&mut keymap),
            Err(SessionError::NotStarted)
        );
    }
    #[test]
    fn start_rolls_back_on_conflict() {
        let hotkeys = hotkeys();
        let mut keymap = Keymap::default();
        keymap.add(TOGGLE, Action::Redo).unwrap();

        let mut session = AddonSession::new();
        let result = session.start(&mut keymap, &hotkeys);
        assert_eq!(
            result,
            Err(SessionError::Keymap(KeymapError::ChordTaken {
                chord: TOGGLE,
                action: Action::Redo
            }))
        );
        assert!(!session.is_started());
        // Only the pre-existing binding survives.
        assert_eq!(keymap.len(), 1);
    }
    #[test]
    fn stop_skips_vanished_bindings() {
        let hotkeys = hotkeys();
        let mut keymap = Keymap::default();
        let mut session = AddonSession::new();
        session.start(&mut keymap, &hotkeys).unwrap();

        let gone = session.handles()[0];
        keymap.remove(gone).unwrap();
        let total = session.handles().len();

        assert_eq!(session.stop(&mut keymap), Ok(total - 1));
        assert!(keymap.is_empty());
    }
    #[test]
    fn remove_unknown() {
        let mut keymap = Keymap::default();
        let handle = keymap.add(TOGGLE, Action::IsolateFocusToggle).unwrap();
        keymap.remove(handle).unwrap();
        assert_eq!(
            keymap.remove(handle),
            Err(KeymapError::UnknownBinding(handle))
        );
    }
}
