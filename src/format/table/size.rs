//! Table size style: solves a [`Placement`] against the target's page width
//! and writes width, margins and orientation in one batch.

use super::layout::{LayoutSolution, LayoutSolver, Placement, TableGeometry};
use super::names::{TablePropertyNames, TEXT_TABLE};
use crate::common::error::PropertyError;
use crate::format::config::{ApplyOptions, FormatContext};
use crate::format::events::{EventArgs, EventBus, FormatEvent};
use crate::format::style::{PropertyStyle, Style, StyleReport, StyleStatus};
use crate::format::target::PropertyTarget;
use crate::format::value::{PropertyMap, PropertyValue};
use std::any::Any;
use std::sync::Arc;

/// Style writing a table's width and horizontal margins.
///
/// # Examples
///
/// ```
/// use docstyle::format::table::{Placement, TableSize};
/// use docstyle::format::{PropertyBag, PropertyValue, Style};
///
/// let mut target = PropertyBag::open()
///     .with_capability("com.sun.star.text.TextTable")
///     .with_property("PageTextWidth", 10_000);
/// let mut size = TableSize::new(Placement::CenterWidth(3_000));
/// assert!(size.apply(&mut target).is_clean());
/// assert_eq!(target.get("LeftMargin"), Some(&PropertyValue::Int(3_500)));
/// ```
#[derive(Debug, Clone)]
pub struct TableSize {
    base: PropertyStyle,
    placement: Placement,
    solver: LayoutSolver,
    names: TablePropertyNames,
    last: Option<LayoutSolution>,
}

impl TableSize {
    pub fn new(placement: Placement) -> Self {
        Self::from_parts(PropertyStyle::new("TableSize"), placement, LayoutSolver::default())
    }

    /// Size style publishing on the context's bus with its solver options.
    pub fn with_context(placement: Placement, context: &FormatContext) -> Self {
        Self::from_parts(
            PropertyStyle::with_context("TableSize", context),
            placement,
            LayoutSolver::new(context.solver().clone()),
        )
    }

    fn from_parts(base: PropertyStyle, placement: Placement, solver: LayoutSolver) -> Self {
        Self {
            base: base.with_capabilities([TEXT_TABLE]),
            placement,
            solver,
            names: TablePropertyNames::default(),
            last: None,
        }
    }

    pub fn with_names(mut self, names: TablePropertyNames) -> Self {
        self.names = names;
        self
    }

    #[inline]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline]
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    #[inline]
    pub fn names(&self) -> &TablePropertyNames {
        &self.names
    }

    #[inline]
    pub fn base(&self) -> &PropertyStyle {
        &self.base
    }

    /// Layout written by the most recent completed apply.
    #[inline]
    pub fn last_solution(&self) -> Option<&LayoutSolution> {
        self.last.as_ref()
    }

    /// Solve the placement for `target` without touching the style.
    ///
    /// Fails with a report when the page width cannot be read.
    fn resolve(&self, target: &dyn PropertyTarget) -> Result<Resolved, StyleReport> {
        let page_width = match Self::read_i32(target, &self.names.page_text_width) {
            Ok(width) => width,
            Err(e) => {
                log::warn!("{}: no page width: {}", self.base.name(), e);
                let mut report = StyleReport::new(StyleStatus::Unresolved);
                report.failures.push(e);
                return Err(report);
            },
        };
        let current = if self.placement.needs_current() {
            self.current_geometry(target)
        } else {
            None
        };
        let solution = match self.solver.solve(page_width, &self.placement, current.as_ref()) {
            Ok(solution) => solution,
            Err(e) => {
                log::warn!("{}: {}", self.base.name(), e);
                return Err(StyleReport::new(StyleStatus::Unresolved));
            },
        };

        let names = &self.names;
        let result = solution.result;
        let mut values = PropertyMap::new();
        values.insert(names.width.clone(), result.width().into());
        values.insert(names.left_margin.clone(), result.left().into());
        values.insert(names.right_margin.clone(), result.right().into());
        values.insert(
            names.hori_orient.clone(),
            PropertyValue::Enum(solution.orientation.value()),
        );
        values.insert(
            names.is_width_relative.clone(),
            solution.relative_width.is_some().into(),
        );
        if let Some(pct) = solution.relative_width {
            values.insert(names.relative_width.clone(), pct.into());
        }
        Ok(Resolved {
            solution,
            values,
            page_width,
        })
    }

    fn current_geometry(&self, target: &dyn PropertyTarget) -> Option<TableGeometry> {
        let read = |name: &str| Self::read_i32(target, name);
        match (
            read(&self.names.left_margin),
            read(&self.names.width),
            read(&self.names.right_margin),
        ) {
            (Ok(left), Ok(width), Ok(right)) => Some(TableGeometry { left, width, right }),
            _ => {
                log::debug!("{}: current geometry unavailable", self.base.name());
                None
            },
        }
    }

    fn read_i32(target: &dyn PropertyTarget, name: &str) -> Result<i32, PropertyError> {
        let value = target.get_property(name)?;
        value.as_i32().ok_or_else(|| PropertyError::TypeMismatch {
            name: name.to_string(),
            expected: "int".to_string(),
            found: value.kind().as_str().to_string(),
        })
    }

    fn announce_fallback(&self, page_width: i32) {
        let mut args = EventArgs::new(self.base.name());
        args.set_data("placement", format!("{:?}", self.placement));
        args.set_data("page_width", page_width);
        self.base.events().trigger(FormatEvent::LayoutFallback, &mut args);
        if let Some(bus) = self.base.shared_bus() {
            bus.trigger(FormatEvent::LayoutFallback, &mut EventArgs::from_args(&args));
        }
    }

    /// Solve against `target` and write the layout.
    ///
    /// The solved values become the style's map, and the solution its
    /// [`last_solution`](Self::last_solution), only once the write ran.
    pub fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        if options.validate && !self.base.is_applicable(target) {
            log::warn!("{}: target is not a table, not applied", self.base.name());
            return StyleReport::new(StyleStatus::NotApplicable);
        }
        let Resolved {
            solution,
            mut values,
            page_width,
        } = match self.resolve(target) {
            Ok(resolved) => resolved,
            Err(report) => return report,
        };
        if let Some(extra) = &options.override_values {
            values.extend(extra.clone());
        }
        let write = ApplyOptions::new()
            .with_validate(options.validate)
            .with_override_values(values.clone());
        let report = self.base.apply_with(target, &write);
        if report.is_done() {
            if solution.fell_back {
                self.announce_fallback(page_width);
            }
            self.base.replace_properties(values);
            self.last = Some(solution);
        }
        report
    }

    /// Back up every property an apply on `target` would write.
    pub fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        if !self.base.is_applicable(target) {
            return StyleReport::new(StyleStatus::NotApplicable);
        }
        let names: Vec<String> = match self.resolve(target) {
            Ok(resolved) => resolved.values.into_keys().collect(),
            Err(report) => return report,
        };
        self.base.backup_names(target, &names)
    }
}

/// Layout solved for one target, not yet written.
struct Resolved {
    solution: LayoutSolution,
    values: PropertyMap,
    page_width: i32,
}

impl Style for TableSize {
    fn style_name(&self) -> &str {
        self.base.name()
    }

    fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        TableSize::apply_with(self, target, options)
    }

    fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        TableSize::backup(self, target)
    }

    fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport {
        self.base.restore(target, clear)
    }

    fn attribute_names(&self) -> Vec<String> {
        self.names.layout_names()
    }

    fn has_backup(&self) -> bool {
        self.base.has_backup()
    }

    fn attach_bus(&mut self, bus: &Arc<EventBus>) {
        Style::attach_bus(&mut self.base, bus);
    }

    fn box_clone(&self) -> Box<dyn Style> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
