use crate::{
    hook::PrePersistHook,
    options::CreatedOptions,
    schema::{AttrType, ComputedAttr, Derivation, PersistedAttr, SchemaDef},
};

/// Install the expiration attribute when a TTL is configured on the
/// creation-timestamp attribute. Three mutually exclusive outcomes:
///
/// - no TTL: nothing is installed (a virtual creation timestamp carries
///   no overrides, so it can never hold one);
/// - TTL with empty `expires.options`: a computed attribute, recomputed
///   on every read as `created + ttl`;
/// - TTL with non-empty `expires.options`: a persisted attribute whose
///   value is fixed at creation by a pre-persist hook.
pub fn install_expiration(schema: &mut dyn SchemaDef, opts: &CreatedOptions) {
    let Some(ttl) = opts.ttl() else {
        return;
    };
    let Some(path) = &opts.expires.path else {
        return;
    };
    if schema.has_path(path) {
        return;
    }

    if opts.expires.options.is_empty() {
        schema.add_computed(
            path.clone(),
            ComputedAttr::new(Derivation::OffsetFromPath {
                path: opts.date.path.clone(),
                offset: ttl,
            }),
        );
    } else {
        let mut attr = PersistedAttr::new(AttrType::Timestamp);
        attr.apply_overrides(&opts.expires.options);

        schema.add_persisted(path.clone(), attr);
        schema.add_pre_persist(PrePersistHook::new(
            opts.date.path.clone(),
            path.clone(),
            ttl,
        ));
    }
}
