//! Versioned JSON schemas and the migration chain.
//!
//! Every persisted structure (note metadata, config, application state)
//! carries an integer `version`. A [`SchemaRegistry`] maps each version to
//! a validator and, for every version after the first, a migration from
//! the version before it. Loading walks that chain from the detected
//! version up to the latest one, so a file written by any past build
//! stays readable. Files are always written back in the latest shape.
//!
//! The engine only sees already-parsed [`serde_json::Value`]s; turning
//! bytes into JSON is the caller's job.

pub mod app_state;
pub mod config;
pub mod note;

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Version assumed for files that predate the `version` field.
pub const LEGACY_VERSION: u32 = 1;

/// Errors raised while validating or migrating a persisted structure.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("{kind} data does not match schema version {version}: {source}")]
    Validation {
        kind: &'static str,
        version: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "{kind} data has version {found}, newer than the latest supported version {latest}; \
         it was written by a newer build"
    )]
    ForwardIncompatible {
        kind: &'static str,
        found: u64,
        latest: u32,
    },

    #[error("{kind} data has unrecognized version {found}")]
    UnknownVersion { kind: &'static str, found: String },

    #[error("{kind} schema registry has no migration into version {version}")]
    MissingMigration { kind: &'static str, version: u32 },

    #[error("{kind} schema registry is empty")]
    EmptyRegistry { kind: &'static str },
}

/// Validates a value against one schema version.
///
/// Returns the normalized value: defaults applied, unknown keys dropped.
pub type ValidateFn = fn(Value) -> Result<Value, serde_json::Error>;

/// Turns a validated value of the previous version into this version.
pub type MigrateFn = fn(Value) -> Result<Value, serde_json::Error>;

/// One entry of a registry.
#[derive(Clone, Copy)]
pub struct SchemaVersion {
    validate: ValidateFn,
    migrate: Option<MigrateFn>,
}

/// Ordered versions of one kind of persisted structure.
pub struct SchemaRegistry {
    kind: &'static str,
    versions: BTreeMap<u32, SchemaVersion>,
}

impl SchemaRegistry {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            versions: BTreeMap::new(),
        }
    }

    /// Registers the first version, which has nothing to migrate from.
    pub fn initial(mut self, version: u32, validate: ValidateFn) -> Self {
        self.versions.insert(
            version,
            SchemaVersion {
                validate,
                migrate: None,
            },
        );
        self
    }

    /// Registers a version reached by migrating from `version - 1`.
    pub fn version(mut self, version: u32, validate: ValidateFn, migrate: MigrateFn) -> Self {
        self.versions.insert(
            version,
            SchemaVersion {
                validate,
                migrate: Some(migrate),
            },
        );
        self
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Highest registered version.
    ///
    /// # Errors
    ///
    /// `EmptyRegistry` if nothing was registered.
    pub fn latest_version(&self) -> Result<u32, MigrationError> {
        self.versions
            .keys()
            .next_back()
            .copied()
            .ok_or(MigrationError::EmptyRegistry { kind: self.kind })
    }

    fn get(&self, version: u32) -> Result<&SchemaVersion, MigrationError> {
        self.versions
            .get(&version)
            .ok_or_else(|| MigrationError::UnknownVersion {
                kind: self.kind,
                found: version.to_string(),
            })
    }

    fn validate(&self, version: u32, value: Value) -> Result<Value, MigrationError> {
        (self.get(version)?.validate)(value).map_err(|source| MigrationError::Validation {
            kind: self.kind,
            version,
            source,
        })
    }
}

/// Highest version in `registry`.
pub fn latest_version(registry: &SchemaRegistry) -> Result<u32, MigrationError> {
    registry.latest_version()
}

/// Reads the declared version of `raw`, defaulting to [`LEGACY_VERSION`].
///
/// # Errors
///
/// `UnknownVersion` if the field is present but not a non-negative integer.
pub fn detect_version(raw: &Value, registry: &SchemaRegistry) -> Result<u64, MigrationError> {
    match raw.get("version") {
        None => Ok(u64::from(LEGACY_VERSION)),
        Some(v) => v.as_u64().ok_or_else(|| MigrationError::UnknownVersion {
            kind: registry.kind,
            found: v.to_string(),
        }),
    }
}

/// Runs `raw` through every migration up to the latest version and returns
/// the validated latest-shape value.
///
/// A value already at the latest version is only validated, which yields
/// an equal copy.
///
/// # Errors
///
/// - `ForwardIncompatible` if `raw` declares a version above the latest.
/// - `UnknownVersion` if the declared version is not registered.
/// - `Validation` if `raw` does not fit the schema of any step it passes.
pub fn migrate_to_latest(raw: &Value, registry: &SchemaRegistry) -> Result<Value, MigrationError> {
    let latest = registry.latest_version()?;
    let declared = detect_version(raw, registry)?;

    if declared > u64::from(latest) {
        return Err(MigrationError::ForwardIncompatible {
            kind: registry.kind,
            found: declared,
            latest,
        });
    }
    // fits in u32 now
    let declared = declared as u32;
    registry.get(declared)?;

    let mut value = raw.clone();
    for version in declared..latest {
        let validated = registry.validate(version, value)?;
        let next = version + 1;
        let migrate = registry
            .get(next)?
            .migrate
            .ok_or(MigrationError::MissingMigration {
                kind: registry.kind,
                version: next,
            })?;
        value = migrate(validated).map_err(|source| MigrationError::Validation {
            kind: registry.kind,
            version: next,
            source,
        })?;
        stamp_version(&mut value, next);
        debug!(kind = registry.kind, from = version, to = next, "migrated");
    }

    registry.validate(latest, value)
}

/// Migrates `raw` to the latest version and deserializes it.
pub fn load_versioned<T: DeserializeOwned>(
    raw: &Value,
    registry: &SchemaRegistry,
) -> Result<T, MigrationError> {
    let latest = registry.latest_version()?;
    let value = migrate_to_latest(raw, registry)?;
    serde_json::from_value(value).map_err(|source| MigrationError::Validation {
        kind: registry.kind,
        version: latest,
        source,
    })
}

/// Sets the `version` field of a JSON object.
pub fn stamp_version(value: &mut Value, version: u32) {
    if let Value::Object(map) = value {
        map.insert("version".to_string(), Value::from(version));
    }
}

/// Validator that round-trips through `T`.
///
/// Deserializing applies `#[serde(default)]`s and rejects wrong types;
/// serializing back drops keys `T` does not know.
pub fn validate_as<T: DeserializeOwned + Serialize>(value: Value) -> Result<Value, serde_json::Error> {
    let typed: T = serde_json::from_value(value)?;
    serde_json::to_value(typed)
}

/// A schema version that knows how to build itself from the previous one.
///
/// Implementations are pure and give every new field an explicit value.
/// A field retired by the new version is dropped at the `migrate` site
/// with a note saying why.
pub trait Migrate: Serialize + Sized {
    type Previous: DeserializeOwned;

    fn migrate(previous: Self::Previous) -> Self;
}

/// [`MigrateFn`] adapter for a [`Migrate`] implementation.
pub fn migrate_as<T: Migrate>(value: Value) -> Result<Value, serde_json::Error> {
    let previous: T::Previous = serde_json::from_value(value)?;
    serde_json::to_value(T::migrate(previous))
}
