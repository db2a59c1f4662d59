//! Driver descriptors.
//!
//! A [`DriverDescriptor`] is pure data: capability flags, the attribute
//! projection table, the preset vocabulary and the handful of named
//! quirks a model family needs. Many model ids share one descriptor.
//! Descriptors are validated against their declared snapshot schema
//! when registered, so table/schema mismatches are caught at build time
//! rather than on the first poll.

use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::capability::Capabilities;
use crate::device::{FieldKind, FieldSchema, FieldValue};

/// Protocol variant spoken by a model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Legacy property-based protocol
    Miio,
    /// Spec-based MiOT protocol
    Miot,
}

/// How an enumerated snapshot field is projected to a published value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumDecoder {
    /// Publish the raw scalar value
    Value,
    /// Publish the symbolic name
    Name,
}

/// One row of the attribute projection table: public attribute name,
/// the snapshot field backing it, and an optional enum decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<EnumDecoder>,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            decoder: None,
        }
    }

    pub fn with_decoder(mut self, decoder: EnumDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }
}

/// Wire encoding of a preset mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetCode {
    Int(i64),
    Text(String),
}

impl PresetCode {
    /// The cached attribute value a successful mode write implies.
    pub fn as_field_value(&self) -> FieldValue {
        match self {
            Self::Int(v) => FieldValue::Integer(*v),
            Self::Text(s) => FieldValue::Text(s.clone()),
        }
    }
}

/// One entry of the preset/speed vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetMode {
    pub name: String,
    pub code: PresetCode,
}

impl PresetMode {
    pub fn new(name: impl Into<String>, code: PresetCode) -> Self {
        Self {
            name: name.into(),
            code,
        }
    }
}

bitflags! {
    /// Named per-model behavior variations that are not expressible as
    /// capability flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Quirks: u8 {
        /// Some firmwares drop the first mode write when leaving an
        /// automatic mode for a manual speed; the write is issued a
        /// second time. Observed on the airdog purifiers only; kept as
        /// a per-model entry, not generalized.
        const REPEAT_MODE_WRITE = 1 << 0;
    }
}

/// Structural defects in a driver descriptor, caught at registration.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("driver {family}: capability flags must not be empty")]
    EmptyCapabilities { family: String },

    #[error("driver {family}: attribute table must not be empty")]
    EmptyAttributes { family: String },

    #[error("driver {family}: attribute {attribute:?} maps to field {field:?} absent from the snapshot schema")]
    UnknownField {
        family: String,
        attribute: String,
        field: String,
    },

    #[error("driver {family}: attribute {attribute:?} has an enum decoder but field {field:?} is declared {kind:?}")]
    DecoderOnScalar {
        family: String,
        attribute: String,
        field: String,
        kind: FieldKind,
    },

    #[error("driver {family}: duplicate preset name {name:?}")]
    DuplicatePreset { family: String, name: String },

    #[error("driver {family}: power-off preset {name:?} is not in the vocabulary")]
    UnknownPowerOffPreset { family: String, name: String },
}

/// Immutable per-family driver data. Shared between all model ids that
/// resolve to the same family.
#[derive(Debug, Clone)]
pub struct DriverDescriptor {
    family: String,
    protocol: Protocol,
    capabilities: Capabilities,
    attributes: Vec<AttributeSpec>,
    presets: Vec<PresetMode>,
    /// Name of the preset documented to imply power-off on this family,
    /// if any. Data, not a universal rule.
    power_off_preset: Option<String>,
    quirks: Quirks,
    schema: Vec<FieldSchema>,
}

impl DriverDescriptor {
    pub fn new(family: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            family: family.into(),
            protocol,
            capabilities: Capabilities::empty(),
            attributes: Vec::new(),
            presets: Vec::new(),
            power_off_preset: None,
            quirks: Quirks::empty(),
            schema: Vec::new(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_attribute(mut self, spec: AttributeSpec) -> Self {
        self.attributes.push(spec);
        self
    }

    pub fn with_preset(mut self, preset: PresetMode) -> Self {
        self.presets.push(preset);
        self
    }

    pub fn with_power_off_preset(mut self, name: impl Into<String>) -> Self {
        self.power_off_preset = Some(name.into());
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.schema.push(FieldSchema::new(name, kind));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn presets(&self) -> &[PresetMode] {
        &self.presets
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn schema(&self) -> &[FieldSchema] {
        &self.schema
    }

    /// Look up a preset by name, tolerating case differences.
    pub fn preset(&self, name: &str) -> Option<&PresetMode> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Map a cached mode value back to its preset name.
    pub fn preset_for_value(&self, value: &FieldValue) -> Option<&str> {
        self.presets
            .iter()
            .find(|p| p.code.as_field_value() == *value)
            .map(|p| p.name.as_str())
    }

    /// Whether `name` is the preset documented to imply power-off.
    pub fn implies_power_off(&self, name: &str) -> bool {
        self.power_off_preset
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(name))
    }

    fn schema_kind(&self, field: &str) -> Option<FieldKind> {
        self.schema
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.kind)
    }

    /// Check the descriptor for internal consistency. Called by the
    /// registry on registration; a failure here is a data defect in the
    /// model tables.
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.capabilities.is_empty() {
            return Err(DriverError::EmptyCapabilities {
                family: self.family.clone(),
            });
        }
        if self.attributes.is_empty() {
            return Err(DriverError::EmptyAttributes {
                family: self.family.clone(),
            });
        }
        for spec in &self.attributes {
            let Some(kind) = self.schema_kind(&spec.field) else {
                return Err(DriverError::UnknownField {
                    family: self.family.clone(),
                    attribute: spec.name.clone(),
                    field: spec.field.clone(),
                });
            };
            if spec.decoder.is_some() && kind != FieldKind::Enum {
                return Err(DriverError::DecoderOnScalar {
                    family: self.family.clone(),
                    attribute: spec.name.clone(),
                    field: spec.field.clone(),
                    kind,
                });
            }
        }
        for (i, preset) in self.presets.iter().enumerate() {
            if self.presets[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&preset.name))
            {
                return Err(DriverError::DuplicatePreset {
                    family: self.family.clone(),
                    name: preset.name.clone(),
                });
            }
        }
        if let Some(name) = &self.power_off_preset {
            if self.preset(name).is_none() {
                return Err(DriverError::UnknownPowerOffPreset {
                    family: self.family.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> DriverDescriptor {
        DriverDescriptor::new("test.family", Protocol::Miio)
            .with_capabilities(Capabilities::SET_BUZZER)
            .with_field("mode", FieldKind::Enum)
            .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Value))
            .with_preset(PresetMode::new("Auto", PresetCode::Text("auto".into())))
    }

    #[test]
    fn minimal_descriptor_validates() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn attribute_field_must_exist_in_schema() {
        let descriptor = minimal().with_attribute(AttributeSpec::new("aqi", "aqi"));
        assert!(matches!(
            descriptor.validate(),
            Err(DriverError::UnknownField { .. })
        ));
    }

    #[test]
    fn decoder_rejected_on_scalar_field() {
        let descriptor = minimal()
            .with_field("aqi", FieldKind::Integer)
            .with_attribute(AttributeSpec::new("aqi", "aqi").with_decoder(EnumDecoder::Value));
        assert!(matches!(
            descriptor.validate(),
            Err(DriverError::DecoderOnScalar { .. })
        ));
    }

    #[test]
    fn power_off_preset_must_be_in_vocabulary() {
        let descriptor = minimal().with_power_off_preset("Off");
        assert!(matches!(
            descriptor.validate(),
            Err(DriverError::UnknownPowerOffPreset { .. })
        ));
    }

    #[test]
    fn preset_lookup_is_case_insensitive() {
        let descriptor = minimal();
        assert!(descriptor.preset("auto").is_some());
        assert!(descriptor.preset("AUTO").is_some());
        assert!(descriptor.preset("Turbo").is_none());
    }
}
