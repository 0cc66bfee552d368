//! Configuration types for applying styles.
//!
//! This module defines the options that control a single apply call, the
//! table layout solver, and the application-scoped context that hands an
//! event bus to every style built from it.

use super::events::EventBus;
use super::value::PropertyMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Smallest table width, in 1/100 mm, the layout solver will produce.
pub const DEFAULT_MIN_TABLE_WIDTH: i32 = 100;

/// Options for one `apply` call.
///
/// # Examples
///
/// ```rust
/// use docstyle::format::ApplyOptions;
///
/// let options = ApplyOptions::new().with_validate(false);
/// assert!(!options.validate);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOptions {
    /// Skip the write when the target lacks the required capabilities
    pub validate: bool,
    /// Values to write instead of the style's own map, for this call only
    pub override_values: Option<PropertyMap>,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            validate: true,
            override_values: None,
        }
    }
}

impl ApplyOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    #[inline]
    pub fn with_override_values(mut self, values: PropertyMap) -> Self {
        self.override_values = Some(values);
        self
    }
}

/// Options for the table layout solver.
///
/// Deserializes with defaults for every missing field, so a partial
/// configuration document is valid.
///
/// # Examples
///
/// ```rust
/// use docstyle::format::SolverOptions;
///
/// let options = SolverOptions::new()
///     .with_min_width(122)
///     .with_max_correction_steps(64);
/// assert_eq!(options.correction_cap(10_000), 64);
/// assert_eq!(SolverOptions::new().correction_cap(10_000), 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Width floor in 1/100 mm; narrower layouts fall back to full width
    pub min_width: i32,
    /// Upper bound for every one-unit correction loop; the page width when unset
    pub max_correction_steps: Option<u32>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_TABLE_WIDTH,
            max_correction_steps: None,
        }
    }
}

impl SolverOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_min_width(mut self, min_width: i32) -> Self {
        self.min_width = min_width;
        self
    }

    #[inline]
    pub fn with_max_correction_steps(mut self, steps: u32) -> Self {
        self.max_correction_steps = Some(steps);
        self
    }

    /// Iteration cap for a page `page_width` wide.
    #[inline]
    pub fn correction_cap(&self, page_width: i32) -> u32 {
        self.max_correction_steps
            .unwrap_or_else(|| page_width.max(1).unsigned_abs())
    }
}

/// Application-scoped settings shared by the styles built from it.
///
/// # Examples
///
/// ```rust
/// use docstyle::format::{FormatContext, PropertyStyle};
///
/// let context = FormatContext::new();
/// let style = PropertyStyle::with_context("CharStyle", &context);
/// assert!(style.shared_bus().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    bus: Arc<EventBus>,
    solver: SolverOptions,
}

impl FormatContext {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context publishing on an existing bus.
    #[inline]
    pub fn with_bus(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            solver: SolverOptions::default(),
        }
    }

    #[inline]
    pub fn with_solver_options(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    #[inline]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    #[inline]
    pub fn solver(&self) -> &SolverOptions {
        &self.solver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_options_from_partial_json() {
        let options: SolverOptions = serde_json::from_str(r#"{"min_width": 122}"#).unwrap();
        assert_eq!(options.min_width, 122);
        assert_eq!(options.max_correction_steps, None);

        let options: SolverOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SolverOptions::default());
    }

    #[test]
    fn test_correction_cap_never_zero() {
        assert_eq!(SolverOptions::new().correction_cap(0), 1);
        assert_eq!(SolverOptions::new().correction_cap(-5), 1);
    }

    #[test]
    fn test_context_shares_bus() {
        let bus = EventBus::shared();
        let context = FormatContext::with_bus(Arc::clone(&bus));
        assert!(Arc::ptr_eq(context.bus(), &bus));
        assert_eq!(context.clone().solver(), &SolverOptions::default());
    }
}
