//! # IDs
//! Objects in a scene need an identity that survives renames, so the display name can't be used.
//! This module hands out `StableID<T>`s, namespaced by the type T. Every namespace counts up from one.
//!
//! IDs are unique within this execution of the program. They are not meant to be written to disk,
//! as a fresh process will happily hand out the same numbers again.

// Next available ID, per namespace.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// Process-unique ID, namespaced by T.
/// IDs with different types may share a numeric value but can never be compared.
pub struct StableID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _namespace: std::marker::PhantomData<T>,
}
// Manual impls, derives would put bounds on T that we don't care about.
impl<T: std::any::Any> Clone for StableID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for StableID<T> {}
impl<T: std::any::Any> PartialEq for StableID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for StableID<T> {}
impl<T: std::any::Any> std::hash::Hash for StableID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
// Safety: only a u64 is stored, T is a marker.
unsafe impl<T: std::any::Any> Send for StableID<T> {}
unsafe impl<T: std::any::Any> Sync for StableID<T> {}

impl<T: std::any::Any> StableID<T> {
    /// Allocate the next ID in this namespace.
    ///
    /// # Panics
    /// If all `u64::MAX - 1` IDs of the namespace have been handed out.
    #[must_use]
    pub fn next() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let raw = {
            let read = ID_SERVER.upgradable_read();
            if let Some(counter) = read.get(&ty) {
                counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                // First ID of this namespace. Rare, so upgrade to exclusive access.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                write
                    .entry(ty)
                    .or_insert_with(|| 1.into())
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            }
        };
        // Wrapped around to zero.
        let Some(id) = std::num::NonZeroU64::new(raw) else {
            panic!("{} ID overflow!", std::any::type_name::<T>());
        };
        Self {
            id,
            _namespace: std::marker::PhantomData,
        }
    }
    /// Raw numeric value. Only meaningful within this namespace and process.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> Default for StableID<T> {
    fn default() -> Self {
        Self::next()
    }
}
impl<T: std::any::Any> std::fmt::Display for StableID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let namespace = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or_default();
        write!(f, "{namespace}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for StableID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::StableID;
    // Tests share the global ID server, so each one gets a private namespace.

    #[test]
    fn starts_at_one() {
        struct Namespace;
        let first = StableID::<Namespace>::next();
        let second = StableID::<Namespace>::default();
        // Not a stable guarantee, only true for a fresh namespace.
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
    }
    #[test]
    fn unique() {
        struct Namespace;
        let mut ids: Vec<_> = (0..512).map(|_| StableID::<Namespace>::next()).collect();
        ids.sort_unstable_by_key(StableID::id);
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len(), "had duplicate ids");
    }
    #[test]
    fn display_names_namespace() {
        struct Cube;
        let id = StableID::<Cube>::next();
        assert_eq!(id.to_string(), "Cube#1");
    }
}
