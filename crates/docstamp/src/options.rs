use crate::{path::AttrPath, types::Duration, value::Value};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Default attribute path for the creation timestamp.
pub const DEFAULT_DATE_PATH: &str = "created.date";

/// Default attribute path for the creator reference.
pub const DEFAULT_BY_PATH: &str = "created.by";

/// Default attribute path for the expiration timestamp.
pub const DEFAULT_EXPIRES_PATH: &str = "created.expires";

///
/// OptionsError
///
/// Structural problems in a resolved configuration, checked before any
/// schema mutation takes place.
///

#[derive(Debug, ThisError)]
pub enum OptionsError {
    #[error("ttl must be greater than zero")]
    ZeroTtl,

    #[error("ttl belongs on the creation-timestamp attribute, not '{group}.options'")]
    MisplacedTtl { group: &'static str },
}

///
/// FieldOverrides
///
/// Attribute-definition overrides merged onto a persisted attribute.
/// Known keys are typed; anything else lands in `extra` and is passed
/// through to the host framework untouched.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct FieldOverrides {
    /// TTL hint in milliseconds, meaningful on the creation-timestamp
    /// attribute only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<Duration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Literal default value; replaces the built-in "now at creation"
    /// behavior when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FieldOverrides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expires.is_none()
            && self.required.is_none()
            && self.default.is_none()
            && self.extra.is_empty()
    }

    /// Merge `patch` over `self`, key by key. Patch leaves win; the
    /// `extra` maps union with patch entries taking precedence.
    pub fn merge(&mut self, patch: Self) {
        if patch.expires.is_some() {
            self.expires = patch.expires;
        }
        if patch.required.is_some() {
            self.required = patch.required;
        }
        if patch.default.is_some() {
            self.default = patch.default;
        }
        self.extra.extend(patch.extra);
    }
}

///
/// DateOptions
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DateOptions {
    pub use_virtual: bool,
    pub path: AttrPath,
    pub options: FieldOverrides,
}

impl DateOptions {
    /// The creation timestamp is exposed as a computed attribute when no
    /// overrides were requested, since the document identifier already
    /// encodes creation order.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.use_virtual && self.options.is_empty()
    }
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            use_virtual: true,
            path: AttrPath::from_static(DEFAULT_DATE_PATH),
            options: FieldOverrides::default(),
        }
    }
}

///
/// ByOptions
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ByOptions {
    /// `None` disables the creator attribute entirely.
    pub path: Option<AttrPath>,

    /// Referenced entity name; when unset the creator is free-form text.
    pub reference: Option<String>,

    pub options: FieldOverrides,
}

impl Default for ByOptions {
    fn default() -> Self {
        Self {
            path: Some(AttrPath::from_static(DEFAULT_BY_PATH)),
            reference: None,
            options: FieldOverrides::default(),
        }
    }
}

///
/// ExpiresOptions
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExpiresOptions {
    /// `None` opts out of the expiration attribute even when a TTL is set.
    pub path: Option<AttrPath>,

    pub options: FieldOverrides,
}

impl Default for ExpiresOptions {
    fn default() -> Self {
        Self {
            path: Some(AttrPath::from_static(DEFAULT_EXPIRES_PATH)),
            options: FieldOverrides::default(),
        }
    }
}

///
/// CreatedOptions
///
/// Fully resolved plugin configuration. Every field is populated; partial
/// input only exists on the patch side.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CreatedOptions {
    pub date: DateOptions,
    pub by: ByOptions,
    pub expires: ExpiresOptions,
}

impl CreatedOptions {
    /// Deep-merge a partial configuration over the defaults.
    #[must_use]
    pub fn resolve(patch: Option<CreatedPatch>) -> Self {
        let mut opts = Self::default();
        if let Some(patch) = patch {
            opts.merge(patch);
        }

        opts
    }

    /// TTL configured on the creation-timestamp attribute, if any.
    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        self.date.options.expires
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.date.options.expires.is_some_and(Duration::is_zero) {
            return Err(OptionsError::ZeroTtl);
        }
        if self.by.options.expires.is_some() {
            return Err(OptionsError::MisplacedTtl { group: "by" });
        }
        if self.expires.options.expires.is_some() {
            return Err(OptionsError::MisplacedTtl { group: "expires" });
        }

        Ok(())
    }

    fn merge(&mut self, patch: CreatedPatch) {
        // Flat shorthand applies first so the nested form wins when both
        // are given.
        if let Some(v) = patch.use_virtual {
            self.date.use_virtual = v;
        }
        if let Some(path) = patch.date_path {
            self.date.path = path;
        }
        if let Some(path) = patch.by_path {
            self.by.path = path;
        }
        if let Some(reference) = patch.by_ref {
            self.by.reference = Some(reference);
        }

        let mut expires_group = None;
        match patch.expires {
            Some(ExpiresArg::Ttl(ttl)) => self.date.options.expires = Some(ttl),
            Some(ExpiresArg::Group(group)) => expires_group = Some(group),
            None => {}
        }

        if let Some(date) = patch.date {
            date.merge_into(&mut self.date);
        }
        if let Some(by) = patch.by {
            by.merge_into(&mut self.by);
        }
        if let Some(expires) = expires_group {
            expires.merge_into(&mut self.expires);
        }
    }
}

///
/// CreatedPatch
///
/// Partial configuration as supplied by the caller. Besides the nested
/// groups it accepts flat shorthand keys (`useVirtual`, `datePath`,
/// `byPath`, `byRef`, `expires`) for the common cases.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatedPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DatePatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<ByPatch>,

    /// Either a TTL shorthand (milliseconds) or the nested `expires` group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<ExpiresArg>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_virtual: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_path: Option<AttrPath>,

    #[serde(
        deserialize_with = "de_disableable_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub by_path: Option<Option<AttrPath>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_ref: Option<String>,
}

///
/// ExpiresArg
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExpiresArg {
    Ttl(Duration),
    Group(ExpiresPatch),
}

///
/// DatePatch
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_virtual: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<AttrPath>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOverrides>,
}

impl DatePatch {
    fn merge_into(self, opts: &mut DateOptions) {
        if let Some(v) = self.use_virtual {
            opts.use_virtual = v;
        }
        if let Some(path) = self.path {
            opts.path = path;
        }
        if let Some(overrides) = self.options {
            opts.options.merge(overrides);
        }
    }
}

///
/// ByPatch
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ByPatch {
    /// Outer `None` keeps the default; inner `None` (an explicit null or
    /// empty string) disables the creator attribute.
    #[serde(
        deserialize_with = "de_disableable_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Option<AttrPath>>,

    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOverrides>,
}

impl ByPatch {
    fn merge_into(self, opts: &mut ByOptions) {
        if let Some(path) = self.path {
            opts.path = path;
        }
        if let Some(reference) = self.reference {
            opts.reference = Some(reference);
        }
        if let Some(overrides) = self.options {
            opts.options.merge(overrides);
        }
    }
}

///
/// ExpiresPatch
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpiresPatch {
    #[serde(
        deserialize_with = "de_disableable_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Option<AttrPath>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOverrides>,
}

impl ExpiresPatch {
    fn merge_into(self, opts: &mut ExpiresOptions) {
        if let Some(path) = self.path {
            opts.path = path;
        }
        if let Some(overrides) = self.options {
            opts.options.merge(overrides);
        }
    }
}

/// Deserialize a path that may be disabled: a present key with `null` or
/// `""` yields `Some(None)`, an absent key stays `None` via the struct
/// default.
fn de_disableable_path<'de, D>(deserializer: D) -> Result<Option<Option<AttrPath>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    match raw {
        None => Ok(Some(None)),
        Some(s) if s.is_empty() => Ok(Some(None)),
        Some(s) => AttrPath::new(s)
            .map(|path| Some(Some(path)))
            .map_err(serde::de::Error::custom),
    }
}
