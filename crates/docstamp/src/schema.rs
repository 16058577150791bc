use crate::{
    hook::PrePersistHook,
    options::FieldOverrides,
    path::AttrPath,
    types::{Duration, Timestamp},
    value::Value,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// DeriveError
///

#[derive(Debug, ThisError)]
pub enum DeriveError {
    #[error("document has no attribute at '{path}'")]
    MissingSource { path: AttrPath },

    #[error("attribute at '{path}' is not a timestamp")]
    NotATimestamp { path: AttrPath },
}

///
/// DocumentView
///
/// Read access to a document instance, provided by the host framework.
///

pub trait DocumentView {
    /// The document's inherent creation-ordered identifier. Its embedded
    /// timestamp is the creation time.
    fn id(&self) -> Ulid;

    /// Read an attribute value by dotted path.
    fn get(&self, path: &AttrPath) -> Option<Value>;
}

///
/// SchemaDef
///
/// Mutable schema-definition handle, owned by the host framework. The
/// plugin only ever adds attributes; it never removes or overwrites one.
///

pub trait SchemaDef {
    /// Whether an attribute is already declared at `path`.
    fn has_path(&self, path: &AttrPath) -> bool;

    /// Register a computed (derived, non-persisted) attribute.
    fn add_computed(&mut self, path: AttrPath, attr: ComputedAttr);

    /// Register a persisted (stored, queryable) attribute.
    fn add_persisted(&mut self, path: AttrPath, attr: PersistedAttr);

    /// Register a lifecycle hook run once per newly created document.
    fn add_pre_persist(&mut self, hook: PrePersistHook);
}

///
/// Attribute
///
/// The computed-vs-persisted duality shared by all three metadata
/// attributes.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum Attribute {
    Computed(ComputedAttr),
    Persisted(PersistedAttr),
}

impl Attribute {
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

impl From<ComputedAttr> for Attribute {
    fn from(attr: ComputedAttr) -> Self {
        Self::Computed(attr)
    }
}

impl From<PersistedAttr> for Attribute {
    fn from(attr: PersistedAttr) -> Self {
        Self::Persisted(attr)
    }
}

///
/// Derivation
///
/// Data-driven getter for computed attributes; the host evaluates it on
/// every read, so the result is never cached.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum Derivation {
    /// Creation time read from the document identifier.
    CreatedFromId,

    /// Value at `path` plus a fixed offset.
    OffsetFromPath { path: AttrPath, offset: Duration },
}

impl Derivation {
    pub fn evaluate(&self, doc: &dyn DocumentView) -> Result<Value, DeriveError> {
        match self {
            Self::CreatedFromId => Ok(Value::Timestamp(Timestamp::from_millis(
                doc.id().timestamp_ms(),
            ))),
            Self::OffsetFromPath { path, offset } => {
                let value = doc
                    .get(path)
                    .ok_or_else(|| DeriveError::MissingSource { path: path.clone() })?;
                let ts = value
                    .as_timestamp()
                    .ok_or_else(|| DeriveError::NotATimestamp { path: path.clone() })?;

                Ok(Value::Timestamp(ts + *offset))
            }
        }
    }
}

///
/// ComputedAttr
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ComputedAttr {
    pub derive: Derivation,
}

impl ComputedAttr {
    #[must_use]
    pub const fn new(derive: Derivation) -> Self {
        Self { derive }
    }

    pub fn evaluate(&self, doc: &dyn DocumentView) -> Result<Value, DeriveError> {
        self.derive.evaluate(doc)
    }
}

///
/// DefaultValue
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum DefaultValue {
    /// A caller-supplied literal.
    Literal(Value),

    /// The host clock at document creation.
    Now,
}

///
/// AttrType
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum AttrType {
    /// Typed reference to the named entity.
    Ref(String),
    Text,
    Timestamp,
}

///
/// PersistedAttr
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PersistedAttr {
    pub ty: AttrType,
    pub default: Option<DefaultValue>,
    pub required: bool,

    /// TTL hint forwarded to the storage layer.
    pub expires: Option<Duration>,

    /// Host-specific definition keys passed through untouched.
    pub extra: BTreeMap<String, Value>,
}

impl PersistedAttr {
    #[must_use]
    pub const fn new(ty: AttrType) -> Self {
        Self {
            ty,
            default: None,
            required: false,
            expires: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Apply caller overrides; only keys explicitly supplied replace the
    /// built-in behavior.
    pub fn apply_overrides(&mut self, overrides: &FieldOverrides) {
        if let Some(ttl) = overrides.expires {
            self.expires = Some(ttl);
        }
        if let Some(required) = overrides.required {
            self.required = required;
        }
        if let Some(default) = &overrides.default {
            self.default = Some(DefaultValue::Literal(default.clone()));
        }
        self.extra
            .extend(overrides.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}
