use crate::{
    Error, expire, install,
    options::{CreatedOptions, CreatedPatch},
    schema::SchemaDef,
};

/// Configure creation metadata on a schema definition.
///
/// Resolves the partial configuration against the defaults, validates it,
/// then installs the creation-timestamp and creator-reference attributes
/// followed by the expiration attribute (when a TTL is configured). Runs
/// once, synchronously, at schema-definition time; all effects are
/// additive mutations of `schema`.
pub fn created(schema: &mut dyn SchemaDef, patch: Option<CreatedPatch>) -> Result<(), Error> {
    let opts = CreatedOptions::resolve(patch);
    opts.validate()?;

    install::install_created_fields(schema, &opts);
    expire::install_expiration(schema, &opts);

    Ok(())
}
