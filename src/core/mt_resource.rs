//! Shared, lock-protected resources.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// across threads. It uses an `Arc<RwLock<T>>` internally to manage concurrent access.
/// Chunks are stored this way so that many meshers can read different chunks at once
/// while the terraform sculptor takes exclusive write access to the chunks it edits.
///
/// # Type Parameters
/// - `T`: The type of the contained resource, must be `Send + Sync`
///
/// # Examples
///
/// ```
/// use voxel_planet::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Poisoning
/// A panic while a guard is held does not make the resource unusable: the guard
/// accessors recover the inner value instead of propagating the poison.
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    ///
    /// # Arguments
    /// * `resource` - The value to be stored in the resource
    ///
    /// # Returns
    /// A new `MtResource` containing the provided value
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    ///
    /// Blocks while a writer holds the lock.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a mutable guard that allows modifying the contained value.
    ///
    /// Blocks until every reader and writer has released the lock.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles point at the same underlying resource.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MtResource;
    use std::thread;

    #[test]
    fn clones_share_the_same_value_across_threads() {
        let counter = MtResource::new(0u32);
        let counter_clone = counter.clone();

        let handle = thread::spawn(move || {
            *counter_clone.get_mut() += 1;
        });
        handle.join().unwrap();

        assert_eq!(*counter.get(), 1);
        assert!(counter.ptr_eq(&counter.clone()));
        assert!(!counter.ptr_eq(&MtResource::new(1)));
    }
}
