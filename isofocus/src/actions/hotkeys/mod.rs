//! Keyboard hotkeys.
//!
//! Actions can have many hotkeys bound to them, and a hotkey can be bound to at most one action.
//! For disk storage the one-to-many relation of actions to keys is easier to edit by hand, so that's what
//! the user sees. The reverse mapping of keys to actions is built from it when loading.

use std::sync::Arc;
mod defaults;

/// The main key of a chord.
#[derive(
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Debug,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
}

#[derive(Hash, PartialEq, Eq, Clone, Debug, Copy)]
pub struct KeyboardHotkey {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: Key,
}
impl serde::Serialize for KeyboardHotkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Stored as a string so the file stays human-editable.
        serializer.collect_str(self)
    }
}
impl<'de> serde::Deserialize<'de> for KeyboardHotkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Borrowed or owned, depending on what the deserializer can give us.
        let str =
            <std::borrow::Cow<'de, str> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        str.parse().map_err(serde::de::Error::custom)
    }
}
impl KeyboardHotkey {
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            key,
        }
    }
    #[must_use]
    pub const fn ctrl(self) -> Self {
        Self { ctrl: true, ..self }
    }
    #[must_use]
    pub const fn alt(self) -> Self {
        Self { alt: true, ..self }
    }
    #[must_use]
    pub const fn shift(self) -> Self {
        Self { shift: true, ..self }
    }
}
/// Formats as `[ctrl+][alt+][shift+]<key>`, which [`std::str::FromStr`] reads back.
impl std::fmt::Display for KeyboardHotkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut components = smallvec::SmallVec::<[&str; 4]>::new();
        if self.ctrl {
            components.push("ctrl");
        }
        if self.alt {
            components.push("alt");
        }
        if self.shift {
            components.push("shift");
        }
        components.push(self.key.as_ref());
        f.write_str(&components.join("+"))
    }
}
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyboardHotkeyFromStrError {
    #[error("unrecognized key name")]
    InvalidKeyName,
}
/// Parse from syntax `[ctrl+][alt+][shift+]<key>`, case-sensitive.
impl std::str::FromStr for KeyboardHotkey {
    type Err = KeyboardHotkeyFromStrError;
    fn from_str(mut str: &str) -> Result<Self, Self::Err> {
        let mut take_if_has = |prefix: &str| -> bool {
            if let Some(new_str) = str.strip_prefix(prefix) {
                str = new_str;
                true
            } else {
                false
            }
        };
        let ctrl = take_if_has("ctrl+");
        let alt = take_if_has("alt+");
        let shift = take_if_has("shift+");
        // str now contains only the key name.
        let key = str
            .parse()
            .map_err(|_| KeyboardHotkeyFromStrError::InvalidKeyName)?;

        Ok(Self {
            ctrl,
            alt,
            shift,
            key,
        })
    }
}

/// All the hotkeys of one action. Arc'd, as it is not intended to change frequently.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HotkeyCollection {
    pub keyboard: Option<Arc<[KeyboardHotkey]>>,
}
impl HotkeyCollection {
    pub fn iter(&self) -> impl Iterator<Item = KeyboardHotkey> + '_ {
        self.keyboard.iter().flat_map(|keys| keys.iter().copied())
    }
}

/// Maps each action onto potentially many hotkeys.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ActionsToKeys(hashbrown::HashMap<super::Action, HotkeyCollection>);
impl Default for ActionsToKeys {
    fn default() -> Self {
        let mut keys_map = hashbrown::HashMap::with_capacity(defaults::KEYBOARD.len());
        for (action, keys) in defaults::KEYBOARD {
            keys_map.insert(
                *action,
                HotkeyCollection {
                    keyboard: Some((*keys).into()),
                },
            );
        }

        let new = Self(keys_map);
        // Make sure we didn't accidentally bind a single key twice
        debug_assert!(TryInto::<KeysToActions>::try_into(&new).is_ok());
        new
    }
}
impl ActionsToKeys {
    /// Replace every hotkey of this action.
    pub fn rebind(&mut self, action: super::Action, keys: impl Into<Arc<[KeyboardHotkey]>>) {
        self.0.insert(
            action,
            HotkeyCollection {
                keyboard: Some(keys.into()),
            },
        );
    }
    #[must_use]
    pub fn keys_of(&self, action: super::Action) -> Option<&HotkeyCollection> {
        self.0.get(&action)
    }
}

/// Derived from [`ActionsToKeys`], maps each hotkey onto at most one action.
#[derive(Debug)]
pub struct KeysToActions(hashbrown::HashMap<KeyboardHotkey, super::Action>);
#[derive(thiserror::Error, Debug)]
pub enum KeysToActionsError {
    /// A single key was bound to multiple actions.
    /// Only the first two encountered (in arbitrary order) are reported.
    #[error("hotkey {key} used for more than one action: {actions:?}")]
    DuplicateBinding {
        key: KeyboardHotkey,
        actions: [super::Action; 2],
    },
}
impl TryFrom<&ActionsToKeys> for KeysToActions {
    type Error = KeysToActionsError;
    fn try_from(value: &ActionsToKeys) -> Result<Self, Self::Error> {
        let mut new = KeysToActions(hashbrown::HashMap::default());

        for (action, keys) in &value.0 {
            for key in keys.iter() {
                // The slot wasn't empty!
                if let Some(old) = new.0.insert(key, *action) {
                    return Err(KeysToActionsError::DuplicateBinding {
                        key,
                        actions: [*action, old],
                    });
                }
            }
        }

        Ok(new)
    }
}
impl KeysToActions {
    #[must_use]
    pub fn action_of(&self, key: &KeyboardHotkey) -> Option<super::Action> {
        self.0.get(key).copied()
    }
    /// Every binding, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyboardHotkey, super::Action)> + '_ {
        self.0.iter().map(|(key, action)| (*key, *action))
    }
}
