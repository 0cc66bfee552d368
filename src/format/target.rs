//! The narrow interface styles use to reach a host document object.
//!
//! Styles read single properties, write property batches and ask whether
//! the object supports a capability. Nothing else of the host object model
//! is visible to them.

use super::value::{PropertyMap, PropertyValue};
use crate::common::error::{MultiPropertyError, PropertyError};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// A host object whose properties can be styled.
pub trait PropertyTarget {
    /// Read the current value of a property.
    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError>;

    /// Write a batch of properties.
    ///
    /// Failures are partial: every entry not listed in the returned error
    /// has been written.
    fn set_properties(&mut self, values: &PropertyMap) -> Result<(), MultiPropertyError>;

    /// Whether the object supports at least one of `capabilities`.
    fn supports_capability(&self, capabilities: &[&str]) -> bool;
}

/// In-memory [`PropertyTarget`].
///
/// In strict mode (the default) only properties registered with
/// [`PropertyBag::with_property`] can be written, and the value kind must
/// match the registered one. An open bag accepts any property.
///
/// # Examples
///
/// ```
/// use docstyle::format::{PropertyBag, PropertyTarget, PropertyValue};
///
/// let bag = PropertyBag::new()
///     .with_capability("com.sun.star.text.TextTable")
///     .with_property("Width", 1000);
/// assert!(bag.supports_capability(&["com.sun.star.text.TextTable"]));
/// assert_eq!(bag.get_property("Width").unwrap(), PropertyValue::Int(1000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    values: BTreeMap<String, PropertyValue>,
    capabilities: SmallVec<[String; 4]>,
    read_only: BTreeSet<String>,
    open: bool,
    write_count: usize,
}

impl PropertyBag {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bag that accepts writes to properties it does not know yet.
    #[inline]
    pub fn open() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_read_only(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let name = name.into();
        self.values.insert(name.clone(), value.into());
        self.read_only.insert(name);
        self
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Overwrite a value directly, bypassing every check.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[inline]
    pub fn values(&self) -> &BTreeMap<String, PropertyValue> {
        &self.values
    }

    /// Number of properties successfully written so far.
    #[inline]
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    fn check_write(&self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        if self.read_only.contains(name) {
            return Err(PropertyError::ReadOnly {
                name: name.to_string(),
            });
        }
        match self.values.get(name) {
            Some(current) if !current.kind().accepts(value.kind()) => {
                Err(PropertyError::TypeMismatch {
                    name: name.to_string(),
                    expected: current.kind().to_string(),
                    found: value.kind().to_string(),
                })
            },
            Some(_) => Ok(()),
            None if self.open => Ok(()),
            None => Err(PropertyError::not_found(name)),
        }
    }
}

impl PropertyTarget for PropertyBag {
    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| PropertyError::not_found(name))
    }

    fn set_properties(&mut self, values: &PropertyMap) -> Result<(), MultiPropertyError> {
        let mut errors = Vec::new();
        for (name, value) in values {
            match self.check_write(name, value) {
                Ok(()) => {
                    self.values.insert(name.clone(), value.clone());
                    self.write_count += 1;
                },
                Err(e) => errors.push(e),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(MultiPropertyError::new(errors))
        }
    }

    fn supports_capability(&self, capabilities: &[&str]) -> bool {
        capabilities
            .iter()
            .any(|c| self.capabilities.iter().any(|own| own == c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(entries: &[(&str, PropertyValue)]) -> PropertyMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_partial_batch_failure() {
        let mut bag = PropertyBag::new()
            .with_property("Width", 100)
            .with_property("Name", "t")
            .with_read_only("Locked", true);

        let err = bag
            .set_properties(&batch(&[
                ("Width", PropertyValue::Int(200)),
                ("Name", PropertyValue::Bool(false)),
                ("Locked", PropertyValue::Bool(false)),
                ("Missing", PropertyValue::Int(1)),
            ]))
            .unwrap_err();

        assert_eq!(err.errors.len(), 3);
        assert_eq!(bag.get("Width"), Some(&PropertyValue::Int(200)));
        assert_eq!(bag.get("Name"), Some(&PropertyValue::from("t")));
        assert_eq!(bag.write_count(), 1);
        let names: Vec<&str> = err.errors.iter().map(|e| e.name()).collect();
        assert!(names.contains(&"Missing"));
    }

    #[test]
    fn test_open_bag_accepts_new_properties() {
        let mut bag = PropertyBag::open();
        bag.set_properties(&batch(&[("Anything", PropertyValue::Float(1.5))]))
            .unwrap();
        assert_eq!(bag.get_property("Anything").unwrap(), PropertyValue::Float(1.5));
        assert!(matches!(
            bag.get_property("Nothing"),
            Err(PropertyError::NotFound { .. })
        ));
    }

    #[test]
    fn test_capabilities() {
        let bag = PropertyBag::new().with_capability("a.b.C");
        assert!(bag.supports_capability(&["x", "a.b.C"]));
        assert!(!bag.supports_capability(&["x"]));
        assert!(!bag.supports_capability(&[]));
    }
}
