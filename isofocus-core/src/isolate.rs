//! # Isolate and focus
//!
//! A two-state toggle. The first activation hides every visible object except the active one and frames the
//! view on it. The next activation shows exactly the objects that were hidden, and nothing else.
//!
//! Which state we're in is never stored on its own - it is whether the scene's
//! [`VisibilityStore`](crate::state::visibility::VisibilityStore) holds anything.

use crate::host::{AreaType, SceneHost, ViewContext};
use crate::state::{scene::ObjectID, visibility::PreconditionError};

/// Name under which the toggle is exposed to keymaps.
pub const COMMAND_ID: &str = "isolate_focus.toggle";

/// What a call to [`IsolateFocusController::toggle`] did.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The command isn't available in this context. Nothing was touched.
    Disabled,
    Isolated {
        active: ObjectID,
        /// Objects hidden by this isolation, in view layer order. Objects the host failed to hide are left out.
        hidden: Vec<ObjectID>,
        /// False if the host failed to frame the view.
        framed: bool,
    },
    Restored {
        shown: Vec<ObjectID>,
        /// Recorded objects that had been deleted in the meantime.
        missing: Vec<ObjectID>,
        /// Objects that still exist, but the host refused to show.
        failed: Vec<ObjectID>,
    },
}

#[derive(Copy, Clone, Default, Debug)]
pub struct IsolateFocusController;
impl IsolateFocusController {
    /// Whether the toggle can run in this context. Invoking it elsewhere is a no-op.
    #[must_use]
    pub fn poll(context: &ViewContext) -> bool {
        context.active_object.is_some() && context.area == AreaType::View3D
    }
    /// Isolate the active object, or restore the scene if it is already isolated.
    ///
    /// # Errors
    /// A [`PreconditionError`] means the host's visibility store disagreed with itself between
    /// reading and writing it. It is a bug in the host, the scene is left untouched.
    pub fn toggle(
        &self,
        mut host: impl SceneHost,
        context: &ViewContext,
    ) -> Result<Outcome, PreconditionError> {
        if !Self::poll(context) {
            return Ok(Outcome::Disabled);
        }
        // Checked by poll.
        let Some(active) = context.active_object else {
            return Ok(Outcome::Disabled);
        };

        if host.visibility_store().is_active() {
            Self::restore(&mut host)
        } else {
            Self::isolate(&mut host, active)
        }
    }
    fn isolate(host: &mut impl SceneHost, active: ObjectID) -> Result<Outcome, PreconditionError> {
        let Some(active_info) = host.lookup_object(active) else {
            log::debug!("active object {active} no longer exists, not isolating");
            return Ok(Outcome::Disabled);
        };

        // Work out the whole set before touching anything, and record it before hiding.
        // A failure past this point can't leave hidden objects that aren't recorded.
        let hidden: Vec<ObjectID> = host
            .view_layer_objects()
            .into_iter()
            .filter(|object| !object.hidden && object.id != active)
            .map(|object| object.id)
            .collect();
        host.capture_isolation(hidden.clone())?;

        let mut failed = Vec::new();
        for &id in &hidden {
            if let Err(e) = host.set_hidden(id, true) {
                log::warn!("failed to hide {id}: {e}");
                failed.push(id);
            }
        }
        // Every recorded id must actually be hidden. Re-record without the ones that stayed visible.
        let hidden = if failed.is_empty() {
            hidden
        } else {
            host.drain_isolation()?;
            let hidden: Vec<ObjectID> = hidden
                .into_iter()
                .filter(|id| !failed.contains(id))
                .collect();
            host.capture_isolation(hidden.clone())?;
            hidden
        };
        if active_info.hidden {
            if let Err(e) = host.set_hidden(active, false) {
                log::warn!("failed to show active object {active}: {e}");
            }
        }

        let framed = match host.frame_view(active) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to frame {active}: {e}");
                false
            }
        };

        host.report_status(&format!("Isolated {} and framed view.", active_info.name));
        Ok(Outcome::Isolated {
            active,
            hidden,
            framed,
        })
    }
    fn restore(host: &mut impl SceneHost) -> Result<Outcome, PreconditionError> {
        let ids = host.drain_isolation()?;

        let mut shown = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        let mut failed = Vec::new();
        for id in ids {
            if host.lookup_object(id).is_none() {
                log::info!("{id} was deleted while isolated, skipping");
                missing.push(id);
                continue;
            }
            match host.set_hidden(id, false) {
                Ok(()) => shown.push(id),
                Err(e) => {
                    log::warn!("failed to show {id}: {e}");
                    failed.push(id);
                }
            }
        }

        host.report_status("Scene restored.");
        Ok(Outcome::Restored {
            shown,
            missing,
            failed,
        })
    }
}
