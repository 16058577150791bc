use crate::{
    options::CreatedOptions,
    schema::{AttrType, ComputedAttr, DefaultValue, Derivation, PersistedAttr, SchemaDef},
};

/// Install the creation-timestamp and creator-reference attributes.
/// Attributes whose path is already declared are left untouched, so the
/// plugin composes with manual declarations and repeated application.
pub fn install_created_fields(schema: &mut dyn SchemaDef, opts: &CreatedOptions) {
    install_date(schema, opts);
    install_by(schema, opts);
}

fn install_date(schema: &mut dyn SchemaDef, opts: &CreatedOptions) {
    if schema.has_path(&opts.date.path) {
        return;
    }

    if opts.date.is_virtual() {
        schema.add_computed(
            opts.date.path.clone(),
            ComputedAttr::new(Derivation::CreatedFromId),
        );
    } else {
        let mut attr =
            PersistedAttr::new(AttrType::Timestamp).with_default(DefaultValue::Now);
        attr.apply_overrides(&opts.date.options);

        schema.add_persisted(opts.date.path.clone(), attr);
    }
}

fn install_by(schema: &mut dyn SchemaDef, opts: &CreatedOptions) {
    let Some(path) = &opts.by.path else {
        return;
    };
    if schema.has_path(path) {
        return;
    }

    // References are required by default; free-form creators are not.
    let mut attr = match &opts.by.reference {
        Some(entity) => PersistedAttr::new(AttrType::Ref(entity.clone())).required(true),
        None => PersistedAttr::new(AttrType::Text),
    };
    attr.apply_overrides(&opts.by.options);

    schema.add_persisted(path.clone(), attr);
}

#[cfg(test)]
mod tests {
    use super::install_created_fields;
    use crate::{
        options::{CreatedOptions, CreatedPatch},
        schema::{AttrType, Attribute, DefaultValue, Derivation},
        test_support::MemorySchema,
    };

    fn resolve(json: &str) -> CreatedOptions {
        let patch: CreatedPatch = serde_json::from_str(json).expect("valid patch");
        CreatedOptions::resolve(Some(patch))
    }

    #[test]
    fn default_config_installs_a_computed_date_and_a_text_creator() {
        let mut schema = MemorySchema::new();
        install_created_fields(&mut schema, &CreatedOptions::default());

        let date = schema.computed("created.date").expect("computed date");
        assert!(matches!(date.derive, Derivation::CreatedFromId));

        let by = schema.persisted("created.by").expect("persisted creator");
        assert_eq!(by.ty, AttrType::Text);
        assert!(!by.required);
    }

    #[test]
    fn use_virtual_false_installs_a_persisted_date_defaulting_to_now() {
        let mut schema = MemorySchema::new();
        install_created_fields(&mut schema, &resolve(r#"{"useVirtual": false}"#));

        let date = schema.persisted("created.date").expect("persisted date");
        assert_eq!(date.ty, AttrType::Timestamp);
        assert!(matches!(date.default, Some(DefaultValue::Now)));
    }

    #[test]
    fn date_overrides_force_the_persisted_representation() {
        let mut schema = MemorySchema::new();
        install_created_fields(
            &mut schema,
            &resolve(r#"{"date": {"options": {"expires": 1000}}}"#),
        );

        let date = schema.persisted("created.date").expect("persisted date");
        assert_eq!(date.expires.map(|d| d.as_millis()), Some(1_000));
        // the built-in default survives overrides that do not touch it
        assert!(matches!(date.default, Some(DefaultValue::Now)));
    }

    #[test]
    fn creator_reference_is_required_by_default() {
        let mut schema = MemorySchema::new();
        install_created_fields(&mut schema, &resolve(r#"{"byRef": "User"}"#));

        let by = schema.persisted("created.by").expect("persisted creator");
        assert_eq!(by.ty, AttrType::Ref("User".to_string()));
        assert!(by.required);
    }

    #[test]
    fn required_override_wins_over_the_reference_default() {
        let mut schema = MemorySchema::new();
        install_created_fields(
            &mut schema,
            &resolve(r#"{"by": {"ref": "User", "options": {"required": false}}}"#),
        );

        let by = schema.persisted("created.by").expect("persisted creator");
        assert!(!by.required);
    }

    #[test]
    fn disabled_by_path_skips_the_creator_attribute() {
        let mut schema = MemorySchema::new();
        install_created_fields(&mut schema, &resolve(r#"{"by": {"path": ""}}"#));

        assert!(schema.attr("created.by").is_none());
    }

    #[test]
    fn existing_paths_are_never_overwritten() {
        let mut schema = MemorySchema::new();
        schema.declare_persisted("created.date", AttrType::Text);
        install_created_fields(&mut schema, &CreatedOptions::default());

        // the manual declaration survives; the creator is still added
        let date = schema.attr("created.date").expect("existing attribute");
        assert!(matches!(
            date,
            Attribute::Persisted(attr) if attr.ty == AttrType::Text
        ));
        assert!(schema.persisted("created.by").is_some());
    }
}
