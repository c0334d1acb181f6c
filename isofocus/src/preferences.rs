//! User preferences, saved and loaded from the platform's preference directory.

use crate::actions;

const DOCUMENTATION: &str = r#"# Isolate & Focus hotkeys. You may edit this file, but be aware that formatting and comments will not
# be preserved, and all keys and values are case sensitive.

# See `actions::Action` for available actions, specified here in [brackets].
# Keyboard hotkeys, specified by the "keyboard" field of an action, are case-sensitive and written `[ctrl+][alt+][shift+]<key>`,
# where <key> is a capital letter A through Z.
# Each action may have many hotkeys associated with it, but each hotkey should only be used at most once.
# Changes apply the next time the add-on is started.

# Examples:
# ["isolate_focus.toggle"]
# keyboard = ["ctrl+alt+F"]
# [Redo]
# keyboard = ["ctrl+Y", "ctrl+shift+Z"]

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

pub struct Hotkeys {
    failed_to_load: bool,
    pub actions_to_keys: actions::hotkeys::ActionsToKeys,
    pub keys_to_actions: actions::hotkeys::KeysToActions,
}
impl Hotkeys {
    const FILENAME: &'static str = "hotkeys.toml";
    /// Hotkeys from the user's preferences, or the defaults if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            None => Self::no_path(),
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
        }
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Hotkeys weren't available, defaulting.");
        let mut this = Self::from_keys(actions::hotkeys::ActionsToKeys::default());
        this.failed_to_load = true;
        this
    }
    /// Hotkeys from the given mapping. Falls back on the defaults if a key is bound twice.
    #[must_use]
    pub fn from_keys(actions_to_keys: actions::hotkeys::ActionsToKeys) -> Self {
        match actions::hotkeys::KeysToActions::try_from(&actions_to_keys) {
            Ok(keys_to_actions) => Self {
                failed_to_load: false,
                actions_to_keys,
                keys_to_actions,
            },
            Err(e) => {
                log::warn!("Invalid hotkeys: {e}");
                Self::no_path()
            }
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        use actions::hotkeys::{ActionsToKeys, KeysToActions};
        let mappings: anyhow::Result<(ActionsToKeys, KeysToActions)> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let actions_to_keys : ActionsToKeys = toml::from_str(&string)?;
            let keys_to_actions : KeysToActions = (&actions_to_keys).try_into()?;

            Ok((actions_to_keys, keys_to_actions))
        };

        match mappings {
            Ok((actions_to_keys, keys_to_actions)) => Self {
                failed_to_load: false,
                actions_to_keys,
                keys_to_actions,
            },
            Err(e) => {
                log::debug!("Failed to read {path:?}: {e:#}");
                Self::no_path()
            }
        }
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// Save into the user's preferences directory.
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        self.save_to(&preferences)
    }
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let string = toml::ser::to_string_pretty(&self.actions_to_keys)?;
        // Prefix some documentation.
        std::fs::write(path, DOCUMENTATION.to_owned() + &string)?;
        Ok(())
    }
}
