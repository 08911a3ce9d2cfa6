//! Versioned scenario persistence
//!
//! Records are stored as `{schema_version, updated_at, data}`. Reading
//! applies version-keyed pure migrations up to the current version and
//! then validates the payload; records written by a newer schema are
//! rejected, and malformed records are discarded by callers rather than
//! repaired.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;
use crate::projection::SimulationConfig;

/// Schema version this build writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 5;

/// Envelope around a persisted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedRecord {
    pub schema_version: u32,
    pub updated_at: DateTime<Utc>,
    pub data: Value,
}

/// A saved scenario: a label plus the frozen configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub label: String,
    pub config: SimulationConfig,
}

type Migration = fn(Value) -> Value;

/// Migrations keyed by the version they upgrade FROM.
fn migrations() -> [(u32, Migration); 4] {
    [
        (1, migrate_v1_to_v2),
        (2, migrate_v2_to_v3),
        (3, migrate_v3_to_v4),
        (4, migrate_v4_to_v5),
    ]
}

/// v1 stored the withdrawal rate under `withdraw_rate`.
fn migrate_v1_to_v2(mut value: Value) -> Value {
    if let Some(config) = value.get_mut("config").and_then(Value::as_object_mut) {
        if let Some(rate) = config.remove("withdraw_rate") {
            config.insert("withdrawal_rate".to_string(), rate);
        }
    }
    value
}

/// v2 predates the sub-year time step.
fn migrate_v2_to_v3(mut value: Value) -> Value {
    if let Some(config) = value.get_mut("config").and_then(Value::as_object_mut) {
        config
            .entry("time_step_years")
            .or_insert_with(|| Value::from(1u32));
    }
    value
}

/// v3 predates the smile curve fields.
fn migrate_v3_to_v4(mut value: Value) -> Value {
    if let Some(config) = value.get_mut("config").and_then(Value::as_object_mut) {
        config
            .entry("smile_enabled")
            .or_insert_with(|| Value::from(false));
        config.entry("smile").or_insert_with(|| {
            serde_json::json!({
                "gogo_end_age": 75,
                "goslow_end_age": 85,
                "goslow_multiplier": "0.85",
                "nogo_multiplier": "0.75",
            })
        });
    }
    value
}

/// v4 stored the claiming age under `ss_claim_age`.
fn migrate_v4_to_v5(mut value: Value) -> Value {
    if let Some(config) = value.get_mut("config").and_then(Value::as_object_mut) {
        if let Some(age) = config.remove("ss_claim_age") {
            config.insert("ss_claiming_age".to_string(), age);
        }
    }
    value
}

/// Wrap a payload in a current-version envelope.
pub fn write_record<T: Serialize>(payload: &T) -> Result<VersionedRecord, EngineError> {
    let data = serde_json::to_value(payload).map_err(|e| {
        EngineError::invalid("store.payload", "unserializable", &e.to_string())
    })?;
    Ok(VersionedRecord {
        schema_version: CURRENT_SCHEMA_VERSION,
        updated_at: Utc::now(),
        data,
    })
}

/// Migrate and validate a stored record into a typed payload.
pub fn read_record<T: DeserializeOwned>(record: VersionedRecord) -> Result<T, EngineError> {
    if record.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(EngineError::SchemaVersionTooNew {
            found: record.schema_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    let mut data = record.data;
    for (from, migrate) in migrations() {
        if record.schema_version <= from {
            data = migrate(data);
        }
    }

    serde_json::from_value(data).map_err(|e| {
        EngineError::invalid("store.data", "schema-invalid", &e.to_string())
    })
}

/// Read, discarding malformed or schema-invalid records. A too-new
/// schema version still surfaces as an error.
pub fn read_or_discard<T: DeserializeOwned>(
    record: VersionedRecord,
) -> Result<Option<T>, EngineError> {
    match read_record(record) {
        Ok(payload) => Ok(Some(payload)),
        Err(err @ EngineError::SchemaVersionTooNew { .. }) => Err(err),
        Err(_) => Ok(None),
    }
}
