use crate::{
    collection::{
        error::{CollectionError, SyncDirection},
        store::CollectionStore,
    },
    remote::request::CollectionRemote,
    types::addon::{AddonEntry, ManifestEdit},
};
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

/// Supplies the Stremio auth key. Asked once at the start of every load and save.
pub trait AuthProvider {
    fn auth_key(&self) -> Option<String>;
}

/// Whatever shows the collection to the user.
pub trait CollectionView {
    fn render(&self, collection: &[AddonEntry]);
    fn notify_error(&self, message: &str);
    fn notify_success(&self);
}

/// Marks one sync direction as busy for as long as it lives.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, direction: SyncDirection) -> Result<Self, CollectionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CollectionError::SyncInFlight(direction))?;
        Ok(InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct SessionState {
    store: CollectionStore,
    /// Bumped by every successful local mutation.
    revision: u64,
    /// Revision the server is known to hold.
    synced_revision: u64,
}

/// Drives loading and saving of one session's collection.
///
/// Loads and saves each have their own in-flight flag: a second request in the same
/// direction is refused while the first is outstanding, never queued. Every failure is
/// reported to the view before being returned.
pub struct SyncController<A, R, V> {
    auth: A,
    remote: R,
    view: V,
    state: Mutex<SessionState>,
    loading: AtomicBool,
    saving: AtomicBool,
}

impl<A, R, V> SyncController<A, R, V>
where
    A: AuthProvider,
    R: CollectionRemote,
    V: CollectionView,
{
    pub fn new(auth: A, remote: R, view: V) -> Self {
        SyncController {
            auth,
            remote,
            view,
            state: Mutex::new(SessionState::default()),
            loading: AtomicBool::new(false),
            saving: AtomicBool::new(false),
        }
    }

    #[allow(dead_code)]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Fetches the server collection and makes it the local state. Returns the addon count.
    ///
    /// On failure the local collection is left exactly as it was.
    pub async fn load(&self) -> Result<usize, CollectionError> {
        let result = self.try_load().await;
        if let Err(e) = &result {
            self.view.notify_error(&e.to_string());
        }
        result
    }

    async fn try_load(&self) -> Result<usize, CollectionError> {
        let auth_key = self.auth.auth_key().ok_or(CollectionError::Auth)?;
        let guard = InFlightGuard::acquire(&self.loading, SyncDirection::Load)?;

        let entries = self.remote.fetch_collection(&auth_key).await?;
        let count = entries.len();
        let snapshot = {
            let mut state = self.lock_state();
            state.store.replace_all(entries);
            state.revision += 1;
            state.synced_revision = state.revision;
            state.store.snapshot()
        };

        drop(guard);
        self.view.render(&snapshot);
        Ok(count)
    }

    /// Replaces the server collection with the local one.
    ///
    /// Sends the collection as it is when the call starts; edits made while the request is
    /// outstanding are left for the next save. Local state is never rolled back.
    pub async fn save(&self) -> Result<(), CollectionError> {
        let result = self.try_save().await;
        match &result {
            Ok(()) => self.view.notify_success(),
            Err(e) => self.view.notify_error(&e.to_string()),
        }
        result
    }

    async fn try_save(&self) -> Result<(), CollectionError> {
        let auth_key = self.auth.auth_key().ok_or(CollectionError::Auth)?;
        let _guard = InFlightGuard::acquire(&self.saving, SyncDirection::Save)?;

        let (snapshot, revision) = {
            let state = self.lock_state();
            (state.store.snapshot(), state.revision)
        };

        self.remote.replace_collection(&auth_key, &snapshot).await?;

        let mut state = self.lock_state();
        if state.synced_revision < revision {
            state.synced_revision = revision;
        }
        Ok(())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        let state = self.lock_state();
        state.revision != state.synced_revision
    }

    #[allow(dead_code)]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    #[allow(dead_code)]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Vec<AddonEntry> {
        self.lock_state().store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.lock_state().store.len()
    }

    /// Re-renders the current local state without changing it.
    pub fn render(&self) {
        let snapshot = self.snapshot();
        self.view.render(&snapshot);
    }

    pub fn reorder(&self, from: usize, to: usize) -> Result<(), CollectionError> {
        self.mutate(|store| store.reorder(from, to))
    }

    pub fn remove_at(&self, index: usize) -> Result<AddonEntry, CollectionError> {
        self.mutate(|store| store.remove_at(index))
    }

    pub fn force_remove_at(&self, index: usize) -> Result<AddonEntry, CollectionError> {
        self.mutate(|store| store.force_remove_at(index))
    }

    pub fn edit_manifest_at(
        &self,
        index: usize,
        fields: ManifestEdit,
    ) -> Result<(), CollectionError> {
        self.mutate(|store| store.edit_manifest_at(index, fields))
    }

    pub fn edit_catalog_name_at(
        &self,
        index: usize,
        catalog_index: usize,
        name: impl Into<String>,
    ) -> Result<(), CollectionError> {
        self.mutate(|store| store.edit_catalog_name_at(index, catalog_index, name))
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut CollectionStore) -> Result<T, CollectionError>,
    ) -> Result<T, CollectionError> {
        let outcome = {
            let mut state = self.lock_state();
            let before = state.store.clone();
            op(&mut state.store).map(|value| {
                // No-ops (same-slot moves, renames to the current value) stay clean.
                if state.store != before {
                    state.revision += 1;
                }
                (value, state.store.snapshot())
            })
        };

        match outcome {
            Ok((value, snapshot)) => {
                self.view.render(&snapshot);
                Ok(value)
            }
            Err(e) => {
                self.view.notify_error(&e.to_string());
                Err(e)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
