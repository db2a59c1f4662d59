//! Attribute projection.
//!
//! Republishes snapshot fields under their public attribute names,
//! decoding enumerated values to scalar or name form per the driver
//! table. A missing field is a driver/table mismatch: it must be fixed
//! in the table, so it is a hard error here rather than a silently
//! dropped attribute.

use std::collections::BTreeMap;

use crate::device::{FieldValue, StateSnapshot};
use crate::driver::{AttributeSpec, EnumDecoder};

/// Snapshot/table mismatches surfaced to the poll cycle.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("snapshot is missing field {field:?} backing attribute {attribute:?}")]
    MissingField { attribute: String, field: String },
}

/// Project a snapshot through an attribute table.
///
/// Either every row projects or the whole call fails; no partial map is
/// ever returned.
pub fn project(
    snapshot: &StateSnapshot,
    attributes: &[AttributeSpec],
) -> Result<BTreeMap<String, FieldValue>, ProjectionError> {
    let mut projected = BTreeMap::new();
    for spec in attributes {
        let raw = snapshot
            .field(&spec.field)
            .ok_or_else(|| ProjectionError::MissingField {
                attribute: spec.name.clone(),
                field: spec.field.clone(),
            })?;
        let value = match (raw, spec.decoder) {
            (FieldValue::Enum { value, .. }, Some(EnumDecoder::Value)) => {
                FieldValue::Integer(*value)
            }
            (FieldValue::Enum { name, .. }, Some(EnumDecoder::Name)) => {
                FieldValue::Text(name.clone())
            }
            _ => raw.clone(),
        };
        projected.insert(spec.name.clone(), value);
    }
    Ok(projected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StateSnapshot {
        let mut snapshot = StateSnapshot::new(true).with_field("aqi", 17);
        snapshot.set_field(
            "mode",
            FieldValue::Enum {
                name: "Silent".to_string(),
                value: 1,
            },
        );
        snapshot
    }

    #[test]
    fn scalar_fields_pass_through() {
        let table = vec![AttributeSpec::new("aqi", "aqi")];
        let projected = project(&snapshot(), &table).unwrap();
        assert_eq!(projected["aqi"], FieldValue::Integer(17));
    }

    #[test]
    fn enum_decoders_pick_representation() {
        let table = vec![
            AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Value),
            AttributeSpec::new("mode_name", "mode").with_decoder(EnumDecoder::Name),
        ];
        let projected = project(&snapshot(), &table).unwrap();
        assert_eq!(projected["mode"], FieldValue::Integer(1));
        assert_eq!(projected["mode_name"], FieldValue::Text("Silent".into()));
    }

    #[test]
    fn missing_field_is_a_hard_error() {
        let table = vec![
            AttributeSpec::new("aqi", "aqi"),
            AttributeSpec::new("co2", "co2"),
        ];
        let err = project(&snapshot(), &table).unwrap_err();
        assert!(matches!(err, ProjectionError::MissingField { ref field, .. } if field == "co2"));
    }
}
