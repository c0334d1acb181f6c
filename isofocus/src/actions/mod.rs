//! # Actions
//!
//! Everything a key chord can be bound to.

pub mod hotkeys;

#[derive(
    serde::Serialize,
    serde::Deserialize,
    Hash,
    PartialEq,
    Eq,
    strum::AsRefStr,
    strum::EnumIter,
    Clone,
    Copy,
    Debug,
)]
pub enum Action {
    /// Isolate the active object, or restore the scene if already isolated.
    #[serde(rename = "isolate_focus.toggle")]
    #[strum(serialize = "isolate_focus.toggle")]
    IsolateFocusToggle,
    Undo,
    Redo,
}
