//! Creation metadata for document schema definitions: a creation
//! timestamp (computed from the document's ULID or persisted), an
//! optional creator reference, and an optional expiration derived from a
//! TTL policy. The plugin runs once at schema-definition time and only
//! ever adds attributes to the handle it is given; derivations and the
//! pre-persist hook are pure computations evaluated by the host
//! framework.

pub mod expire;
pub mod hook;
pub mod install;
pub mod options;
pub mod path;
pub mod plugin;
pub mod schema;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

use crate::{hook::HookError, options::OptionsError, path::PathError, schema::DeriveError};
use thiserror::Error as ThisError;

// re-exports
pub use plugin::created;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        hook::PrePersistHook,
        options::{CreatedOptions, CreatedPatch, FieldOverrides},
        path::AttrPath,
        plugin::created,
        schema::{
            AttrType, Attribute, ComputedAttr, DefaultValue, Derivation, DocumentView,
            PersistedAttr, SchemaDef,
        },
        types::{Duration, Timestamp},
        value::Value,
    };
    pub use ulid::Ulid;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    DeriveError(#[from] DeriveError),

    #[error(transparent)]
    HookError(#[from] HookError),

    #[error(transparent)]
    OptionsError(#[from] OptionsError),

    #[error(transparent)]
    PathError(#[from] PathError),
}
