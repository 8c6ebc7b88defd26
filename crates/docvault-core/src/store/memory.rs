use crate::{
    options::FieldPath,
    store::{DocumentStore, SetMode},
    value::{Document, Value},
};
use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};
use thiserror::Error as ThisError;

///
/// MemoryStoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MemoryStoreError {
    #[error("document '{0}' already exists")]
    AlreadyExists(String),

    #[error("document '{0}' not found")]
    NotFound(String),

    #[error("merge field '{0}' is not present in the data")]
    MissingMergeField(String),
}

///
/// MemoryStore
///
/// Process-local [`DocumentStore`], for tests and tooling.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Document>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn docs(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Document>> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);

        format!("doc-{n:016x}")
    }
}

impl DocumentStore for MemoryStore {
    type Error = MemoryStoreError;

    fn create(&self, id: Option<&str>, doc: Document) -> Result<String, Self::Error> {
        let mut docs = self.docs();
        let id = match id {
            Some(id) => id.to_string(),
            None => loop {
                let id = self.generate_id();
                if !docs.contains_key(&id) {
                    break id;
                }
            },
        };

        match docs.entry(id.clone()) {
            Entry::Occupied(_) => Err(MemoryStoreError::AlreadyExists(id)),
            Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(id)
            }
        }
    }

    fn set(&self, id: &str, doc: Document, mode: SetMode) -> Result<(), Self::Error> {
        let mut docs = self.docs();

        match mode {
            SetMode::Overwrite => {
                docs.insert(id.to_string(), doc);
            }
            SetMode::MergeAll => {
                let stored = docs.entry(id.to_string()).or_default();
                merge_all(stored, doc.into_inner());
            }
            SetMode::Merge(fields) => {
                // resolve every path first so a bad path writes nothing
                let updates = fields
                    .iter()
                    .map(|field| {
                        doc.lookup(field.segments())
                            .cloned()
                            .map(|value| (field, value))
                            .ok_or_else(|| MemoryStoreError::MissingMergeField(field.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let stored = docs.entry(id.to_string()).or_default();
                for (field, value) in updates {
                    set_path(stored, field, value);
                }
            }
        }

        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Document>, Self::Error> {
        Ok(self.docs().get(id).cloned())
    }

    fn delete(&self, id: &str) -> Result<(), Self::Error> {
        self.docs()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MemoryStoreError::NotFound(id.to_string()))
    }
}

// Nested maps merge key by key; anything else replaces the stored value.
fn merge_all(stored: &mut BTreeMap<String, Value>, incoming: BTreeMap<String, Value>) {
    for (key, value) in incoming {
        match (stored.get_mut(&key), value) {
            (Some(Value::Map(existing)), Value::Map(nested)) => merge_all(existing, nested),
            (_, value) => {
                stored.insert(key, value);
            }
        }
    }
}

fn set_path(stored: &mut BTreeMap<String, Value>, field: &FieldPath, value: Value) {
    let Some((last, parents)) = field.segments().split_last() else {
        return;
    };

    let mut cursor = stored;
    for segment in parents {
        let slot = cursor
            .entry(segment.clone())
            .or_insert_with(|| Value::Map(BTreeMap::new()));
        if !matches!(slot, Value::Map(_)) {
            *slot = Value::Map(BTreeMap::new());
        }
        let Value::Map(next) = slot else {
            return;
        };
        cursor = next;
    }

    cursor.insert(last.clone(), value);
}

///
/// TESTS
///
