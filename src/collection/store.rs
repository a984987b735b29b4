use crate::{
    collection::error::CollectionError,
    types::addon::{AddonEntry, ManifestEdit},
};
use serde_json::Value;

/// The locally editable copy of the user's addon collection.
///
/// Order is the activation order on the server. Every index-addressed operation validates
/// its indices before touching `items`, so a failed call leaves the collection as it was.
/// The store never renders; callers decide when to refresh their view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStore {
    items: Vec<AddonEntry>,
}

impl CollectionStore {
    pub fn new() -> Self {
        CollectionStore { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, index: usize) -> Option<&AddonEntry> {
        self.items.get(index)
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &AddonEntry> {
        self.items.iter()
    }

    /// Installs `entries` as the new authoritative state, dropping whatever was held.
    pub fn replace_all(&mut self, entries: Vec<AddonEntry>) {
        self.items = entries;
    }

    /// Moves the entry at `from` so that it ends up at position `to`.
    ///
    /// Remove-then-insert, like a list splice: `[A, B, C]` with `reorder(0, 2)` gives
    /// `[B, C, A]`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CollectionError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let moved = self.items.remove(from);
        self.items.insert(to, moved);
        Ok(())
    }

    /// Removes the entry at `index`, refusing protected entries.
    pub fn remove_at(&mut self, index: usize) -> Result<AddonEntry, CollectionError> {
        self.check_index(index)?;
        let entry = &self.items[index];
        if entry.is_protected() {
            return Err(CollectionError::ProtectedEntry {
                index,
                name: entry.name().to_string(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Removes the entry at `index` even if it is protected.
    pub fn force_remove_at(&mut self, index: usize) -> Result<AddonEntry, CollectionError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    pub fn edit_manifest_at(
        &mut self,
        index: usize,
        fields: ManifestEdit,
    ) -> Result<(), CollectionError> {
        self.check_index(index)?;
        fields.apply_to(&mut self.items[index]);
        Ok(())
    }

    /// Renames one catalog of the entry at `index`. Catalog order and count never change.
    ///
    /// A manifest without catalogs, or a slot that is not an object, has nothing to rename.
    pub fn edit_catalog_name_at(
        &mut self,
        index: usize,
        catalog_index: usize,
        name: impl Into<String>,
    ) -> Result<(), CollectionError> {
        self.check_index(index)?;
        let catalogs = match self.items[index].catalogs_mut() {
            Some(catalogs) if !catalogs.is_empty() => catalogs,
            _ => return Ok(()),
        };
        let len = catalogs.len();
        let catalog = catalogs
            .get_mut(catalog_index)
            .ok_or(CollectionError::CatalogIndex {
                index: catalog_index,
                len,
            })?;
        if let Some(fields) = catalog.as_object_mut() {
            fields.insert("name".to_string(), Value::String(name.into()));
        }
        Ok(())
    }

    /// An owned copy of the current collection, for transmission or display.
    pub fn snapshot(&self) -> Vec<AddonEntry> {
        self.items.clone()
    }

    fn check_index(&self, index: usize) -> Result<(), CollectionError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CollectionError::Index {
                index,
                len: self.items.len(),
            })
        }
    }
}
