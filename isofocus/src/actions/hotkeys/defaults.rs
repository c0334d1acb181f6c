use super::super::Action;
use super::{Key, KeyboardHotkey};

pub const KEYBOARD: &[(Action, &[KeyboardHotkey])] = &[
    (
        Action::IsolateFocusToggle,
        &[KeyboardHotkey::new(Key::F).ctrl().alt()],
    ),
    (Action::Undo, &[KeyboardHotkey::new(Key::Z).ctrl()]),
    (
        Action::Redo,
        &[
            KeyboardHotkey::new(Key::Y).ctrl(),
            KeyboardHotkey::new(Key::Z).ctrl().shift(),
        ],
    ),
];
