//! Persistence seam: the document store contract and the typed
//! collection that validates records before handing them to a store.

mod memory;


use crate::{
    context::Context,
    error::Error,
    options::{FieldPath, Method, Options},
    reflect::Record,
    validator::Validator,
    value::Document,
};
use std::{marker::PhantomData, sync::Arc};

pub use memory::{MemoryStore, MemoryStoreError};

///
/// SetMode
///
/// Overwrite → replace the stored document.
/// MergeAll  → merge every given field into the stored document.
/// Merge     → only overwrite the listed paths, each of which must be
///             present in the given document.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SetMode {
    Overwrite,
    MergeAll,
    Merge(Vec<FieldPath>),
}

///
/// DocumentStore
///
/// Minimal contract of a document database. Implementations are shared
/// by reference, so mutation goes through interior mutability or a
/// remote service.
///

pub trait DocumentStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a new document, returning its id. A store generates the id
    /// when none is given.
    fn create(&self, id: Option<&str>, doc: Document) -> Result<String, Self::Error>;

    fn set(&self, id: &str, doc: Document, mode: SetMode) -> Result<(), Self::Error>;

    fn get(&self, id: &str) -> Result<Option<Document>, Self::Error>;

    fn delete(&self, id: &str) -> Result<(), Self::Error>;
}

///
/// Collection
///
/// Named group of documents of one record type. Every write is validated
/// with the method-appropriate defaults before it reaches the store.
///

pub struct Collection<T, S> {
    validator: Arc<Validator>,
    name: String,
    store: S,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> Collection<T, S>
where
    T: Record,
    S: DocumentStore,
{
    pub fn new(validator: Arc<Validator>, name: impl Into<String>, store: S) -> Self {
        Self {
            validator,
            name: name.into(),
            store,
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run the `validate` method without writing anything.
    pub fn validate(
        &self,
        ctx: &Context,
        record: &mut T,
        options: &Options,
    ) -> Result<Document, Error> {
        self.validator
            .validate_with(ctx, record, Method::Validate, options)
    }

    /// Validate for `create` and store the result under the id from the
    /// options, or a generated one.
    pub fn create(
        &self,
        ctx: &Context,
        record: &mut T,
        options: &Options,
    ) -> Result<String, Error> {
        let doc = self
            .validator
            .validate_with(ctx, record, Method::Create, options)?;

        let id = self
            .store
            .create(options.custom_id(), doc)
            .map_err(Error::store)?;
        tracing::debug!(collection = %self.name, id = %id, "created document");

        Ok(id)
    }

    /// Validate for `update` and merge into the stored document. Only the
    /// merge fields are written when any were given.
    pub fn update(
        &self,
        ctx: &Context,
        id: &str,
        record: &mut T,
        options: &Options,
    ) -> Result<(), Error> {
        let doc = self
            .validator
            .validate_with(ctx, record, Method::Update, options)?;

        let mode = match options.merge_targets() {
            [] => SetMode::MergeAll,
            fields => SetMode::Merge(fields.to_vec()),
        };
        self.store.set(id, doc, mode).map_err(Error::store)?;
        tracing::debug!(collection = %self.name, id, "updated document");

        Ok(())
    }

    /// The stored document, as written.
    pub fn find(&self, id: &str) -> Result<Option<Document>, Error> {
        self.store.get(id).map_err(Error::store)
    }

    pub fn delete(&self, id: &str) -> Result<(), Error> {
        self.store.delete(id).map_err(Error::store)?;
        tracing::debug!(collection = %self.name, id, "deleted document");

        Ok(())
    }
}
