//! # Visibility store
//!
//! The scene-scoped record of which objects an isolate action hid. Whether the scene is isolated
//! at all is derived from this record being non-empty, there is no separate flag to fall out of sync.

use super::scene::ObjectID;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("isolation is already active, drain the store before capturing")]
    AlreadyActive,
    #[error("isolation is not active, nothing to drain")]
    NotActive,
}

/// Ordered, duplicate-free list of the objects hidden by the current isolation session.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct VisibilityStore {
    hidden_by_isolation: Vec<ObjectID>,
}
impl VisibilityStore {
    /// True iff an isolation session is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.hidden_by_isolation.is_empty()
    }
    /// Record the objects hidden by an isolate transition.
    ///
    /// Order is kept, repeated ids are dropped. Capturing an empty list is allowed, and leaves the store inactive.
    pub fn capture(&mut self, ids: impl IntoIterator<Item = ObjectID>) -> Result<(), PreconditionError> {
        if self.is_active() {
            return Err(PreconditionError::AlreadyActive);
        }
        let mut seen = hashbrown::HashSet::new();
        self.hidden_by_isolation = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Ok(())
    }
    /// Take the recorded ids, leaving the store empty.
    pub fn drain(&mut self) -> Result<Vec<ObjectID>, PreconditionError> {
        if !self.is_active() {
            return Err(PreconditionError::NotActive);
        }
        Ok(std::mem::take(&mut self.hidden_by_isolation))
    }
    #[must_use]
    pub fn ids(&self) -> &[ObjectID] {
        &self.hidden_by_isolation
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.hidden_by_isolation.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hidden_by_isolation.is_empty()
    }
    #[must_use]
    pub fn contains(&self, id: ObjectID) -> bool {
        self.hidden_by_isolation.contains(&id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn capture_then_drain() {
        let mut store = VisibilityStore::default();
        assert!(!store.is_active());

        let (a, b) = (ObjectID::next(), ObjectID::next());
        store.capture([a, b]).unwrap();
        assert!(store.is_active());
        assert_eq!(store.ids(), &[a, b]);

        assert_eq!(store.drain().unwrap(), vec![a, b]);
        assert!(!store.is_active());
        assert!(store.ids().is_empty());
    }
    #[test]
    fn capture_while_active_fails() {
        let mut store = VisibilityStore::default();
        let a = ObjectID::next();
        store.capture([a]).unwrap();

        assert_eq!(
            store.capture([ObjectID::next()]),
            Err(PreconditionError::AlreadyActive)
        );
        // Untouched by the failed capture.
        assert_eq!(store.ids(), &[a]);
    }
    #[test]
    fn drain_while_inactive_fails() {
        let mut store = VisibilityStore::default();
        assert_eq!(store.drain(), Err(PreconditionError::NotActive));
    }
    #[test]
    fn empty_capture_stays_inactive() {
        let mut store = VisibilityStore::default();
        store.capture(std::iter::empty()).unwrap();
        assert!(!store.is_active());
        // And may be captured again right away.
        store.capture([ObjectID::next()]).unwrap();
        assert!(store.is_active());
    }
    #[test]
    fn duplicates_dropped_order_kept() {
        let mut store = VisibilityStore::default();
        let (a, b, c) = (ObjectID::next(), ObjectID::next(), ObjectID::next());
        store.capture([c, a, c, b, a]).unwrap();
        assert_eq!(store.ids(), &[c, a, b]);
        assert!(store.contains(b));
        assert_eq!(store.len(), 3);
    }
}
