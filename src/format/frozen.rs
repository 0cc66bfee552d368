//! Read-only wrapper for shared default styles.
//!
//! A `Frozen<T>` hands out `&T` only, so every `&mut self` operation of the
//! wrapped style (`set`, `backup`, table layout applies) is rejected at
//! compile time. [`Frozen::thaw`] returns an independent, mutable copy.

use std::ops::Deref;

#[derive(Debug)]
pub struct Frozen<T>(T);

impl<T> Frozen<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> &T {
        &self.0
    }
}

impl<T: Clone> Frozen<T> {
    /// Mutable copy of the frozen value.
    #[inline]
    pub fn thaw(&self) -> T {
        self.0.clone()
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{PropertyBag, PropertyStyle, PropertyValue};
    use once_cell::sync::Lazy;

    static BOLD: Lazy<Frozen<PropertyStyle>> = Lazy::new(|| {
        let mut style = PropertyStyle::new("Bold");
        style.set("CharWeight", 150.0);
        Frozen::new(style)
    });

    #[test]
    fn test_frozen_default_can_apply() {
        let mut target = PropertyBag::new().with_property("CharWeight", 100.0);
        assert!(BOLD.apply(&mut target).is_clean());
        assert_eq!(target.get("CharWeight"), Some(&PropertyValue::Float(150.0)));
    }

    #[test]
    fn test_thaw_is_independent() {
        let mut style = BOLD.thaw();
        style.set("CharWeight", 50.0);
        assert_eq!(BOLD.get("CharWeight"), Some(&PropertyValue::Float(150.0)));
        assert_eq!(style.get("CharWeight"), Some(&PropertyValue::Float(50.0)));
    }
}
