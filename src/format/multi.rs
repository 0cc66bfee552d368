//! Styles made of an own property map plus named child styles.
//!
//! A [`CompositeStyle`] applies, backs up, restores and copies as one unit.
//! Its own map is handled first, then every child in insertion order.
//! Children are independent of each other and never reference the
//! composite; the composite's shared bus is handed to each child when it is
//! inserted.

use super::config::{ApplyOptions, FormatContext};
use super::events::{EventArgs, EventBus, FormatEvent};
use super::style::{PropertyStyle, Style, StyleReport, StyleStatus};
use super::target::PropertyTarget;
use super::value::PropertyValue;
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

/// One named child of a composite.
#[derive(Debug, Clone)]
pub struct StyleComponentEntry {
    style: Box<dyn Style>,
    /// Extra attribute names reported for this child
    attrs: Vec<String>,
    /// Options this child is applied with
    options: Option<ApplyOptions>,
}

impl StyleComponentEntry {
    #[inline]
    pub fn style(&self) -> &dyn Style {
        self.style.as_ref()
    }

    #[inline]
    pub fn attrs(&self) -> &[String] {
        &self.attrs
    }

    #[inline]
    pub fn options(&self) -> Option<&ApplyOptions> {
        self.options.as_ref()
    }
}

/// A style built from an own property set and named children.
///
/// # Examples
///
/// ```
/// use docstyle::format::{CompositeStyle, PropertyBag, PropertyStyle, Style};
///
/// let mut para = CompositeStyle::new("ParaStyle");
/// para.set("ParaAdjust", 3);
///
/// let mut spacing = PropertyStyle::new("Spacing");
/// spacing.set("ParaTopMargin", 200);
/// para.set_style("spacing", Box::new(spacing), &[], None);
///
/// let mut target = PropertyBag::open();
/// let report = para.apply(&mut target);
/// assert_eq!(report.written, vec!["ParaAdjust", "ParaTopMargin"]);
/// ```
#[derive(Debug)]
pub struct CompositeStyle {
    base: PropertyStyle,
    children: Vec<(String, StyleComponentEntry)>,
}

impl CompositeStyle {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_style(PropertyStyle::new(name))
    }

    pub fn with_context(name: impl Into<String>, context: &FormatContext) -> Self {
        Self::from_style(PropertyStyle::with_context(name, context))
    }

    /// Composite whose own map is `base`.
    pub fn from_style(base: PropertyStyle) -> Self {
        Self {
            base,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn base(&self) -> &PropertyStyle {
        &self.base
    }

    #[inline]
    pub fn base_mut(&mut self) -> &mut PropertyStyle {
        &mut self.base
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.base.name()
    }

    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> bool {
        self.base.set(key, value)
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> bool {
        self.base.remove(key)
    }

    /// Insert or replace the child stored under `key`.
    ///
    /// A replaced child keeps its position in the apply order. Returns
    /// `false` when a listener cancelled the insertion.
    pub fn set_style(
        &mut self,
        key: impl Into<String>,
        mut style: Box<dyn Style>,
        attrs: &[&str],
        options: Option<ApplyOptions>,
    ) -> bool {
        let key = key.into();
        let mut args = EventArgs::new(self.base.name()).with_key(key.as_str());
        self.base
            .events()
            .trigger(FormatEvent::MultiStyleSetting, &mut args);
        if args.cancel {
            return false;
        }

        if let Some(bus) = self.base.shared_bus() {
            style.attach_bus(bus);
        }
        let entry = StyleComponentEntry {
            style,
            attrs: attrs.iter().map(|a| a.to_string()).collect(),
            options,
        };
        match self.children.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = entry,
            None => self.children.push((key, entry)),
        }
        self.base
            .events()
            .trigger(FormatEvent::MultiStyleSet, &mut EventArgs::from_args(&args));
        true
    }

    pub fn remove_style(&mut self, key: &str) -> Option<Box<dyn Style>> {
        let index = self.children.iter().position(|(k, _)| k == key)?;
        Some(self.children.remove(index).1.style)
    }

    #[inline]
    pub fn has_style(&self, key: &str) -> bool {
        self.children.iter().any(|(k, _)| k == key)
    }

    pub fn entry(&self, key: &str) -> Option<&StyleComponentEntry> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry)
    }

    pub fn style(&self, key: &str) -> Option<&dyn Style> {
        self.entry(key).map(StyleComponentEntry::style)
    }

    pub fn style_mut(&mut self, key: &str) -> Option<&mut (dyn Style + 'static)> {
        self.children
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry.style.as_mut())
    }

    /// Child under `key`, if it is a `T`.
    pub fn style_as<T: Style + 'static>(&self, key: &str) -> Option<&T> {
        self.style(key)?.as_any().downcast_ref::<T>()
    }

    pub fn style_as_mut<T: Style + 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.style_mut(key)?.as_any_mut().downcast_mut::<T>()
    }

    /// Child keys in apply order.
    pub fn style_keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(k, _)| k.as_str())
    }

    /// Apply the own map, then every child.
    ///
    /// The composite's applying events and capability check run first, even
    /// when the own map is empty, and gate the children as well.
    pub fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        let values = options
            .override_values
            .clone()
            .unwrap_or_else(|| self.base.properties().clone());
        let mut args = match self.base.begin_apply(&*target, values, options) {
            Ok(args) => args,
            Err(report) => return report,
        };
        let mut report = self.base.write_pending(target, &mut args);

        for (key, entry) in self.children.iter_mut() {
            let mut child_args = EventArgs::new(self.base.name()).with_key(key.as_str());
            self.base
                .events()
                .trigger(FormatEvent::MultiChildApplying, &mut child_args);
            if child_args.cancel {
                log::debug!("{}: child '{}' skipped", self.base.name(), key);
                continue;
            }
            let child_options = entry
                .options
                .clone()
                .unwrap_or_else(|| ApplyOptions::new().with_validate(options.validate));
            let child = entry.style.apply_with(target, &child_options);
            report.merge(child);
            self.base.events().trigger(
                FormatEvent::MultiChildApplied,
                &mut EventArgs::from_args(&child_args),
            );
        }
        self.base.finish_apply(&args);
        report
    }

    pub fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        let mut report = self.base.backup(target);
        if report.status == StyleStatus::NotApplicable {
            return report;
        }
        for (_, entry) in self.children.iter_mut() {
            report.merge(entry.style.backup(target));
        }
        report
    }

    pub fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport {
        let mut report = self.base.restore(target, clear);
        for (_, entry) in self.children.iter_mut() {
            report.merge(entry.style.restore(target, clear));
        }
        report
    }

    /// Own keys, every child's attribute names, and declared extras.
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.base.properties().keys().cloned().collect();
        for (_, entry) in &self.children {
            names.extend(entry.style.attribute_names());
            names.extend(entry.attrs.iter().cloned());
        }
        names.into_iter().collect()
    }

    pub fn has_backup(&self) -> bool {
        self.base.has_backup() || self.children.iter().any(|(_, e)| e.style.has_backup())
    }

    /// Deep copy: every child is cloned; backups stay behind.
    pub fn copy(&self) -> Self {
        Self {
            base: self.base.copy(),
            children: self.children.clone(),
        }
    }
}

impl Clone for CompositeStyle {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl Style for CompositeStyle {
    fn style_name(&self) -> &str {
        self.base.name()
    }

    fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        CompositeStyle::apply_with(self, target, options)
    }

    fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        CompositeStyle::backup(self, target)
    }

    fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport {
        CompositeStyle::restore(self, target, clear)
    }

    fn attribute_names(&self) -> Vec<String> {
        CompositeStyle::attribute_names(self)
    }

    fn has_backup(&self) -> bool {
        CompositeStyle::has_backup(self)
    }

    fn attach_bus(&mut self, bus: &Arc<EventBus>) {
        if self.base.shared_bus().is_none() {
            self.base.set_shared_bus(Arc::clone(bus));
        }
        for (_, entry) in self.children.iter_mut() {
            entry.style.attach_bus(bus);
        }
    }

    fn box_clone(&self) -> Box<dyn Style> {
        Box::new(self.copy())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{EventObserver, Listener, PropertyBag};
    use parking_lot::Mutex;

    fn child(name: &str, key: &str, value: i32) -> Box<dyn Style> {
        let mut style = PropertyStyle::new(name);
        style.set(key, value);
        Box::new(style)
    }

    fn composite() -> CompositeStyle {
        let mut style = CompositeStyle::new("TableProps");
        style.set("Name", "Table1");
        style.set_style("size", child("Size", "Width", 9000), &["LeftMargin"], None);
        style.set_style("spacing", child("Spacing", "TopMargin", 200), &[], None);
        style
    }

    fn target() -> PropertyBag {
        PropertyBag::new()
            .with_property("Name", "")
            .with_property("Width", 10000)
            .with_property("TopMargin", 0)
    }

    struct Order(Mutex<Vec<String>>);

    impl EventObserver for Order {
        fn on_event(&self, event_name: &str, args: &mut EventArgs) {
            let stage = if event_name == FormatEvent::StyleApplying.as_str() {
                "applying"
            } else if event_name == FormatEvent::StyleApplied.as_str() {
                "applied"
            } else {
                return;
            };
            self.0.lock().push(format!("{}:{}", stage, args.source()));
        }
    }

    #[test]
    fn test_apply_order_own_then_children() {
        let context = FormatContext::new();
        let order = Arc::new(Order(Mutex::new(Vec::new())));
        context.bus().add_observer(&order);

        let mut style = CompositeStyle::with_context("TableProps", &context);
        style.set("Name", "Table1");
        style.set_style("spacing", child("Spacing", "TopMargin", 200), &[], None);
        style.set_style("size", child("Size", "Width", 9000), &[], None);

        let mut target = target();
        let report = style.apply(&mut target);
        assert!(report.is_clean());
        assert_eq!(report.written, vec!["Name", "TopMargin", "Width"]);
        assert_eq!(
            *order.0.lock(),
            vec![
                "applying:TableProps",
                "applying:Spacing",
                "applied:Spacing",
                "applying:Size",
                "applied:Size",
                "applied:TableProps",
            ]
        );
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut style = composite();
        style.set_style("size", child("Size", "Width", 5000), &[], None);
        assert_eq!(style.style_keys().collect::<Vec<_>>(), vec!["size", "spacing"]);

        let mut target = target();
        style.apply(&mut target);
        assert_eq!(target.get("Width"), Some(&PropertyValue::Int(5000)));
    }

    #[test]
    fn test_attribute_names_union() {
        let style = composite();
        assert_eq!(
            style.attribute_names(),
            vec!["LeftMargin", "Name", "TopMargin", "Width"]
        );
    }

    #[test]
    fn test_copy_is_deep() {
        let mut style = composite();
        style.backup(&target());
        assert!(style.has_backup());

        let mut copy = style.copy();
        assert!(!copy.has_backup());
        copy.style_as_mut::<PropertyStyle>("size")
            .unwrap()
            .set("Width", 1);
        let original = style.style_as::<PropertyStyle>("size").unwrap();
        assert_eq!(original.get("Width"), Some(&PropertyValue::Int(9000)));
    }

    #[test]
    fn test_backup_restore_recurses() {
        let mut style = composite();
        let mut target = target();
        let before = target.values().clone();

        let report = style.backup(&target);
        assert_eq!(report.written, vec!["Name", "Width", "TopMargin"]);
        style.apply(&mut target);
        assert_ne!(target.values(), &before);

        style.restore(&mut target, true);
        assert_eq!(target.values(), &before);
        assert!(!style.has_backup());
    }

    #[test]
    fn test_child_can_be_skipped() {
        let mut style = composite();
        let skip = Listener::new(|args: &mut EventArgs| {
            if args.key.as_deref() == Some("size") {
                args.cancel = true;
            }
        });
        style.base().events().on(FormatEvent::MultiChildApplying, &skip);

        let mut target = target();
        let report = style.apply(&mut target);
        assert_eq!(report.written, vec!["Name", "TopMargin"]);
        assert_eq!(target.get("Width"), Some(&PropertyValue::Int(10000)));
    }

    #[test]
    fn test_cancelled_composite_writes_nothing() {
        let mut style = composite();
        let veto = Listener::new(|args: &mut EventArgs| args.cancel = true);
        style.base().events().on(FormatEvent::StyleApplying, &veto);

        let mut target = target();
        assert_eq!(style.apply(&mut target).status, StyleStatus::Cancelled);
        assert_eq!(target.write_count(), 0);
    }

    #[test]
    fn test_veto_with_empty_own_map_skips_children() {
        let mut style = CompositeStyle::new("Wrapper");
        style.set_style("spacing", child("Spacing", "TopMargin", 200), &[], None);
        let veto = Listener::new(|args: &mut EventArgs| args.cancel = true);
        style.base().events().on(FormatEvent::StyleApplying, &veto);

        let mut target = target();
        let report = style.apply(&mut target);
        assert_eq!(report.status, StyleStatus::Cancelled);
        assert!(report.written.is_empty());
        assert_eq!(target.write_count(), 0);
    }

    #[test]
    fn test_empty_own_map_still_checks_capabilities() {
        let base = PropertyStyle::new("Wrapper").with_capabilities(["com.sun.star.text.TextTable"]);
        let mut style = CompositeStyle::from_style(base);
        style.set_style("spacing", child("Spacing", "TopMargin", 200), &[], None);

        let mut target = target();
        assert_eq!(style.apply(&mut target).status, StyleStatus::NotApplicable);
        assert_eq!(target.write_count(), 0);

        let report = style.apply_with(&mut target, &ApplyOptions::new().with_validate(false));
        assert!(report.is_clean());
        assert_eq!(report.written, vec!["TopMargin"]);
    }

    #[test]
    fn test_set_style_can_be_cancelled() {
        let mut style = composite();
        let veto = Listener::new(|args: &mut EventArgs| args.cancel = true);
        style.base().events().on(FormatEvent::MultiStyleSetting, &veto);
        assert!(!style.set_style("borders", child("Borders", "TableBorder", 1), &[], None));
        assert!(!style.has_style("borders"));
        assert!(style.remove_style("spacing").is_some());
        assert!(style.remove_style("spacing").is_none());
    }

    #[test]
    fn test_children_inherit_shared_bus() {
        let context = FormatContext::new();
        let mut style = CompositeStyle::with_context("TableProps", &context);
        style.set_style("size", child("Size", "Width", 9000), &[], None);
        let size = style.style_as::<PropertyStyle>("size").unwrap();
        assert!(Arc::ptr_eq(size.shared_bus().unwrap(), context.bus()));
    }
}
