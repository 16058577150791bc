//! Shared test doubles standing in for the host framework: an in-memory
//! schema handle and a document whose save flow mirrors the host's
//! create-then-update lifecycle.

use crate::{
    hook::{HookError, PrePersistHook},
    path::AttrPath,
    schema::{
        AttrType, Attribute, ComputedAttr, DefaultValue, DeriveError, DocumentView,
        PersistedAttr, SchemaDef,
    },
    types::Timestamp,
    value::Value,
};
use std::collections::BTreeMap;
use ulid::Ulid;

pub fn path(s: &str) -> AttrPath {
    AttrPath::new(s).expect("valid test path")
}

///
/// MemorySchema
///

#[derive(Debug, Default)]
pub struct MemorySchema {
    attrs: BTreeMap<AttrPath, Attribute>,
    hooks: Vec<PrePersistHook>,
}

impl MemorySchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Manually declare a persisted attribute, as host schema code would.
    pub fn declare_persisted(&mut self, at: &str, ty: AttrType) {
        self.attrs
            .insert(path(at), Attribute::Persisted(PersistedAttr::new(ty)));
    }

    #[must_use]
    pub fn attr(&self, at: &str) -> Option<&Attribute> {
        self.attrs.get(&path(at))
    }

    #[must_use]
    pub fn computed(&self, at: &str) -> Option<&ComputedAttr> {
        match self.attr(at) {
            Some(Attribute::Computed(attr)) => Some(attr),
            _ => None,
        }
    }

    #[must_use]
    pub fn persisted(&self, at: &str) -> Option<&PersistedAttr> {
        match self.attr(at) {
            Some(Attribute::Persisted(attr)) => Some(attr),
            _ => None,
        }
    }

    #[must_use]
    pub fn hooks(&self) -> &[PrePersistHook] {
        &self.hooks
    }

    #[must_use]
    pub fn attr_count(&self) -> usize {
        self.attrs.len()
    }

    fn persisted_attrs(&self) -> impl Iterator<Item = (&AttrPath, &PersistedAttr)> {
        self.attrs.iter().filter_map(|(p, attr)| match attr {
            Attribute::Persisted(attr) => Some((p, attr)),
            Attribute::Computed(_) => None,
        })
    }
}

impl SchemaDef for MemorySchema {
    fn has_path(&self, path: &AttrPath) -> bool {
        self.attrs.contains_key(path)
    }

    fn add_computed(&mut self, path: AttrPath, attr: ComputedAttr) {
        let clobbered = self.attrs.insert(path, Attribute::Computed(attr));
        assert!(clobbered.is_none(), "attribute path declared twice");
    }

    fn add_persisted(&mut self, path: AttrPath, attr: PersistedAttr) {
        let clobbered = self.attrs.insert(path, Attribute::Persisted(attr));
        assert!(clobbered.is_none(), "attribute path declared twice");
    }

    fn add_pre_persist(&mut self, hook: PrePersistHook) {
        self.hooks.push(hook);
    }
}

///
/// TestDocument
///
/// Save semantics mirror the host: on first save, persisted defaults are
/// applied and pre-persist hooks run with `is_new = true`; later saves
/// run the hooks with `is_new = false`.
///

#[derive(Clone, Debug)]
pub struct TestDocument {
    id: Ulid,
    values: BTreeMap<AttrPath, Value>,
    persisted_once: bool,
}

impl TestDocument {
    /// A document whose identifier embeds the given creation time.
    #[must_use]
    pub fn created_at(ts: Timestamp) -> Self {
        Self {
            id: Ulid::from_parts(ts.as_millis(), 42),
            values: BTreeMap::new(),
            persisted_once: false,
        }
    }

    /// Rebuild a document from persisted state, e.g. after a round trip.
    #[must_use]
    pub fn restore(id: Ulid, values: BTreeMap<AttrPath, Value>) -> Self {
        Self {
            id,
            values,
            persisted_once: true,
        }
    }

    pub fn set(&mut self, path: AttrPath, value: Value) {
        self.values.insert(path, value);
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<AttrPath, Value> {
        &self.values
    }

    /// Raw stored value, bypassing computed attributes.
    #[must_use]
    pub fn stored(&self, at: &str) -> Option<Value> {
        self.values.get(&path(at)).cloned()
    }

    pub fn save(&mut self, schema: &MemorySchema, now: Timestamp) -> Result<(), HookError> {
        let is_new = !self.persisted_once;

        if is_new {
            for (attr_path, attr) in schema.persisted_attrs() {
                if self.values.contains_key(attr_path) {
                    continue;
                }
                match &attr.default {
                    Some(DefaultValue::Now) => {
                        self.values
                            .insert(attr_path.clone(), Value::Timestamp(now));
                    }
                    Some(DefaultValue::Literal(value)) => {
                        self.values.insert(attr_path.clone(), value.clone());
                    }
                    None => {}
                }
            }
        }

        for hook in schema.hooks() {
            if let Some((attr_path, value)) = hook.apply(is_new, self)? {
                self.values.insert(attr_path, value);
            }
        }

        self.persisted_once = true;

        Ok(())
    }

    /// Read through the schema: computed attributes are evaluated on each
    /// call, stored values returned as-is.
    pub fn read(&self, schema: &MemorySchema, at: &str) -> Result<Option<Value>, DeriveError> {
        let attr_path = path(at);

        match schema.attrs.get(&attr_path) {
            Some(Attribute::Computed(attr)) => attr.evaluate(self).map(Some),
            _ => Ok(self.values.get(&attr_path).cloned()),
        }
    }
}

impl DocumentView for TestDocument {
    fn id(&self) -> Ulid {
        self.id
    }

    fn get(&self, path: &AttrPath) -> Option<Value> {
        self.values.get(path).cloned()
    }
}
