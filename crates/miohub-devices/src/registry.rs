//! Model-to-driver resolution.
//!
//! `resolve` is a pure lookup: exact model id first, then the unique
//! matching family prefix (overlapping prefixes cannot be registered,
//! so at most one rule matches any id). Unknown models fail loudly with
//! the raw id
//! so unsupported hardware shows up in diagnostics instead of being
//! silently defaulted. Overlapping prefix rules are a configuration
//! error caught at registration time, never at runtime.

use std::collections::HashMap;
use std::sync::Arc;

use crate::driver::{DriverDescriptor, DriverError};

/// Registration and resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No driver matches the model id
    #[error("unsupported device model: {0:?}")]
    UnsupportedModel(String),

    /// Same exact id registered twice
    #[error("model id registered twice: {0:?}")]
    DuplicateModel(String),

    /// Two prefix rules would match the same model ids
    #[error("prefix rule {0:?} overlaps existing rule {1:?}")]
    AmbiguousPrefix(String, String),

    /// The descriptor failed its own consistency checks
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Registry of driver descriptors keyed by exact model id or family
/// prefix. Immutable once built.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    exact: HashMap<String, Arc<DriverDescriptor>>,
    prefixes: Vec<(String, Arc<DriverDescriptor>)>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under an exact model id.
    pub fn register_model(
        &mut self,
        model: &str,
        descriptor: Arc<DriverDescriptor>,
    ) -> Result<(), RegistryError> {
        descriptor.validate()?;
        if self.exact.contains_key(model) {
            return Err(RegistryError::DuplicateModel(model.to_string()));
        }
        self.exact.insert(model.to_string(), descriptor);
        Ok(())
    }

    /// Register a descriptor for every model id starting with `prefix`.
    pub fn register_prefix(
        &mut self,
        prefix: &str,
        descriptor: Arc<DriverDescriptor>,
    ) -> Result<(), RegistryError> {
        descriptor.validate()?;
        for (existing, _) in &self.prefixes {
            if existing.starts_with(prefix) || prefix.starts_with(existing.as_str()) {
                return Err(RegistryError::AmbiguousPrefix(
                    prefix.to_string(),
                    existing.clone(),
                ));
            }
        }
        self.prefixes.push((prefix.to_string(), descriptor));
        Ok(())
    }

    /// Resolve a model id to its driver. Exact match wins over prefix
    /// match; no side effects.
    pub fn resolve(&self, model: &str) -> Result<Arc<DriverDescriptor>, RegistryError> {
        if model.is_empty() {
            tracing::error!("cannot resolve an empty model id");
            return Err(RegistryError::UnsupportedModel(String::new()));
        }
        if let Some(descriptor) = self.exact.get(model) {
            return Ok(Arc::clone(descriptor));
        }
        if let Some((_, descriptor)) = self
            .prefixes
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix.as_str()))
        {
            return Ok(Arc::clone(descriptor));
        }
        tracing::error!(model, "unsupported device model");
        Err(RegistryError::UnsupportedModel(model.to_string()))
    }

    /// All exactly registered model ids, for diagnostics and tests.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.exact.keys().map(String::as_str)
    }

    /// All registered family prefixes.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(|(p, _)| p.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::device::FieldKind;
    use crate::driver::{AttributeSpec, Protocol};

    fn descriptor(family: &str) -> Arc<DriverDescriptor> {
        DriverDescriptor::new(family, Protocol::Miio)
            .with_capabilities(Capabilities::SET_BUZZER)
            .with_field("buzzer", FieldKind::Boolean)
            .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
            .shared()
    }

    #[test]
    fn exact_match_beats_prefix() {
        let mut registry = DriverRegistry::new();
        registry
            .register_prefix("vendor.purifier.", descriptor("family"))
            .unwrap();
        registry
            .register_model("vendor.purifier.x1", descriptor("exact"))
            .unwrap();

        let resolved = registry.resolve("vendor.purifier.x1").unwrap();
        assert_eq!(resolved.family(), "exact");
        let resolved = registry.resolve("vendor.purifier.x2").unwrap();
        assert_eq!(resolved.family(), "family");
    }

    #[test]
    fn unknown_and_empty_models_are_rejected() {
        let registry = DriverRegistry::new();
        assert!(matches!(
            registry.resolve("vendor.unknown.z9"),
            Err(RegistryError::UnsupportedModel(_))
        ));
        assert!(matches!(
            registry.resolve(""),
            Err(RegistryError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn overlapping_prefixes_are_a_registration_error() {
        let mut registry = DriverRegistry::new();
        registry
            .register_prefix("vendor.fan.", descriptor("fan"))
            .unwrap();
        assert!(matches!(
            registry.register_prefix("vendor.", descriptor("all")),
            Err(RegistryError::AmbiguousPrefix(_, _))
        ));
        assert!(matches!(
            registry.register_prefix("vendor.fan.v", descriptor("fan-v")),
            Err(RegistryError::AmbiguousPrefix(_, _))
        ));
    }

    #[test]
    fn duplicate_model_is_a_registration_error() {
        let mut registry = DriverRegistry::new();
        registry
            .register_model("vendor.fan.v2", descriptor("fan"))
            .unwrap();
        assert!(matches!(
            registry.register_model("vendor.fan.v2", descriptor("fan")),
            Err(RegistryError::DuplicateModel(_))
        ));
    }

    #[test]
    fn invalid_descriptor_never_registers_partially() {
        let mut registry = DriverRegistry::new();
        let bad = DriverDescriptor::new("bad", Protocol::Miio).shared();
        assert!(registry.register_model("vendor.bad.v1", bad).is_err());
        assert!(registry.is_empty());
    }
}
