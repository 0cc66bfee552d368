//! The apply/backup/restore engine shared by every style.
//!
//! A [`PropertyStyle`] holds a sparse map of property values slated for a
//! target. Every mutation and every target write passes through cancellable
//! hooks ([`StyleHooks`]) and events ([`FormatEvent`]). Failures of single
//! properties never abort an operation: they are logged, reported through
//! events, and returned in the [`StyleReport`].

use super::config::{ApplyOptions, FormatContext};
use super::events::{EventArgs, EventBus, FormatEvent};
use super::target::PropertyTarget;
use super::value::{PropertyMap, PropertyValue};
use crate::common::error::PropertyError;
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Outcome of a style operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleStatus {
    /// The operation ran; see the report for per-property failures
    Done,
    /// Nothing to do: no values, or no backup
    Empty,
    /// A hook or listener cancelled the operation; nothing was written
    Cancelled,
    /// The target supports none of the required capabilities
    NotApplicable,
    /// Inputs the style needs could not be read from the target
    Unresolved,
}

/// What a style operation did.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleReport {
    pub status: StyleStatus,
    /// Properties written, backed up or restored, in write order
    pub written: Vec<String>,
    pub failures: Vec<PropertyError>,
}

impl StyleReport {
    #[inline]
    pub fn new(status: StyleStatus) -> Self {
        Self {
            status,
            written: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.status == StyleStatus::Done
    }

    /// Done without a single property failure.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.is_done() && self.failures.is_empty()
    }

    /// Fold a child report into this one.
    pub fn merge(&mut self, other: StyleReport) {
        if other.status == StyleStatus::Done && self.status == StyleStatus::Empty {
            self.status = StyleStatus::Done;
        }
        self.written.extend(other.written);
        self.failures.extend(other.failures);
    }
}

/// Overridable behavior of a style.
///
/// Every method has a no-op default. Methods taking `&mut EventArgs` run
/// before the matching event and may cancel it or rewrite its key/value.
pub trait StyleHooks: Send + Sync {
    /// Before a value enters the property map.
    fn on_setting(&self, _args: &mut EventArgs) {}

    /// Before the style writes anything to a target.
    fn on_applying(&self, _args: &mut EventArgs) {}

    /// Before one property joins the write batch.
    fn on_property_setting(&self, _args: &mut EventArgs) {}

    /// After one property was written.
    fn on_property_set(&self, _args: &EventArgs) {}

    fn on_property_set_error(&self, _error: &PropertyError) {}

    /// Before one target value is stored in the backup.
    fn on_backing_up(&self, _args: &mut EventArgs) {}

    /// Before one backed-up value joins the restore batch.
    fn on_restoring(&self, args: &mut EventArgs) {
        self.on_property_setting(args);
    }

    fn on_applied(&self, _args: &EventArgs) {}
}

/// Object-safe view of a style, used for children of composites.
pub trait Style: fmt::Debug + Send + Sync {
    fn style_name(&self) -> &str;

    fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions)
    -> StyleReport;

    fn apply(&mut self, target: &mut dyn PropertyTarget) -> StyleReport {
        self.apply_with(target, &ApplyOptions::default())
    }

    fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport;

    fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport;

    /// Names of the target properties an apply would touch.
    fn attribute_names(&self) -> Vec<String>;

    fn has_backup(&self) -> bool;

    /// Publish on `bus` unless the style already has a shared bus.
    fn attach_bus(&mut self, bus: &Arc<EventBus>);

    fn box_clone(&self) -> Box<dyn Style>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Style> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// A single style unit.
///
/// # Examples
///
/// ```
/// use docstyle::format::{PropertyBag, PropertyStyle, PropertyValue};
///
/// let mut style = PropertyStyle::new("CharStyle");
/// style.set("CharWeight", 150.0);
///
/// let mut target = PropertyBag::new().with_property("CharWeight", 100.0);
/// style.backup(&target);
/// assert!(style.apply(&mut target).is_clean());
/// assert_eq!(target.get("CharWeight"), Some(&PropertyValue::Float(150.0)));
///
/// style.restore(&mut target, true);
/// assert_eq!(target.get("CharWeight"), Some(&PropertyValue::Float(100.0)));
/// ```
pub struct PropertyStyle {
    name: String,
    live: PropertyMap,
    backup: Option<PropertyMap>,
    capabilities: SmallVec<[String; 2]>,
    events: EventBus,
    bus: Option<Arc<EventBus>>,
    hooks: Option<Arc<dyn StyleHooks>>,
}

impl PropertyStyle {
    /// Style without capability restrictions and without a shared bus.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            live: PropertyMap::new(),
            backup: None,
            capabilities: SmallVec::new(),
            events: EventBus::new(),
            bus: None,
            hooks: None,
        }
    }

    /// Style publishing lifecycle events on the context's bus.
    pub fn with_context(name: impl Into<String>, context: &FormatContext) -> Self {
        let mut style = Self::new(name);
        style.bus = Some(Arc::clone(context.bus()));
        style
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn StyleHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Bus local to this instance; not shared with copies.
    #[inline]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[inline]
    pub fn shared_bus(&self) -> Option<&Arc<EventBus>> {
        self.bus.as_ref()
    }

    #[inline]
    pub fn set_shared_bus(&mut self, bus: Arc<EventBus>) {
        self.bus = Some(bus);
    }

    #[inline]
    pub fn properties(&self) -> &PropertyMap {
        &self.live
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.live.get(key)
    }

    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.live.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Put `value` under `key`, unless a hook or listener cancels.
    ///
    /// Hooks may rewrite the key or the value; the rewritten pair is stored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> bool {
        let mut args = EventArgs::new(self.name.as_str()).with_key_value(key, value.into());
        if let Some(hooks) = &self.hooks {
            hooks.on_setting(&mut args);
        }
        if !args.cancel {
            self.events.trigger(FormatEvent::StyleSetting, &mut args);
        }
        if args.cancel {
            return false;
        }
        let (Some(key), Some(value)) = (args.key.clone(), args.value.clone()) else {
            return false;
        };
        self.live.insert(key, value);
        self.events
            .trigger(FormatEvent::StyleSet, &mut EventArgs::from_args(&args));
        true
    }

    /// Set every entry of `values`; returns how many were committed.
    pub fn update(&mut self, values: PropertyMap) -> usize {
        values
            .into_iter()
            .filter(|(key, value)| self.set(key.clone(), value.clone()))
            .count()
    }

    /// Remove `key`; returns whether it was present and not protected.
    pub fn remove(&mut self, key: &str) -> bool {
        if !self.live.contains_key(key) {
            return false;
        }
        let mut args = EventArgs::new(self.name.as_str()).with_key(key);
        self.events.trigger(FormatEvent::StyleRemoving, &mut args);
        if args.cancel {
            return false;
        }
        self.live.remove(key);
        self.events
            .trigger(FormatEvent::StyleRemoved, &mut EventArgs::from_args(&args));
        true
    }

    #[inline]
    pub fn clear(&mut self) {
        self.live.clear();
    }

    /// True when no capability is required or the target supports one.
    pub fn is_applicable(&self, target: &dyn PropertyTarget) -> bool {
        if self.capabilities.is_empty() {
            return true;
        }
        let required: SmallVec<[&str; 4]> =
            self.capabilities.iter().map(String::as_str).collect();
        target.supports_capability(&required)
    }

    #[inline]
    pub fn apply(&self, target: &mut dyn PropertyTarget) -> StyleReport {
        self.apply_with(target, &ApplyOptions::default())
    }

    /// Write the property map to `target` in one batch.
    pub fn apply_with(&self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        let values = options.override_values.as_ref().unwrap_or(&self.live);
        if values.is_empty() {
            log::debug!("{}: nothing to apply", self.name);
            return StyleReport::new(StyleStatus::Empty);
        }
        let mut args = match self.begin_apply(&*target, values.clone(), options) {
            Ok(args) => args,
            Err(report) => return report,
        };
        let report = self.write_pending(target, &mut args);
        self.finish_apply(&args);
        report
    }

    /// Run the cancellable applying hook and events, then check the target.
    ///
    /// On success the returned args carry the values still to be written.
    pub(crate) fn begin_apply(
        &self,
        target: &dyn PropertyTarget,
        values: PropertyMap,
        options: &ApplyOptions,
    ) -> Result<EventArgs, StyleReport> {
        let mut args = EventArgs::new(self.name.as_str()).with_values(values);
        if let Some(hooks) = &self.hooks {
            hooks.on_applying(&mut args);
        }
        if !args.cancel {
            self.events.trigger(FormatEvent::StyleApplying, &mut args);
        }
        if !args.cancel {
            if let Some(bus) = &self.bus {
                let mut shared = EventArgs::from_args(&args);
                bus.trigger(FormatEvent::StyleApplying, &mut shared);
                args.cancel = shared.cancel;
            }
        }
        if args.cancel {
            log::debug!("{}: apply cancelled", self.name);
            return Err(StyleReport::new(StyleStatus::Cancelled));
        }

        if options.validate && !self.is_applicable(target) {
            log::warn!(
                "{}: target supports none of [{}], not applied",
                self.name,
                self.capabilities.join(", ")
            );
            return Err(StyleReport::new(StyleStatus::NotApplicable));
        }
        Ok(args)
    }

    /// Vet and write the values carried by `args`.
    ///
    /// Reports `Empty` when nothing was pending.
    pub(crate) fn write_pending(&self, target: &mut dyn PropertyTarget, args: &mut EventArgs) -> StyleReport {
        let pending = args.values.take().unwrap_or_default();
        if pending.is_empty() {
            return StyleReport::new(StyleStatus::Empty);
        }
        let batch = self.vet(pending, FormatEvent::PropertyApplying, |hooks, args| {
            hooks.on_property_setting(args)
        });
        self.write(target, batch, FormatEvent::PropertyApplied)
    }

    /// Raise the applied hook and events.
    pub(crate) fn finish_apply(&self, args: &EventArgs) {
        let mut done = EventArgs::from_args(args);
        if let Some(hooks) = &self.hooks {
            hooks.on_applied(&done);
        }
        self.events.trigger(FormatEvent::StyleApplied, &mut done);
        if let Some(bus) = &self.bus {
            bus.trigger(FormatEvent::StyleApplied, &mut EventArgs::from_args(args));
        }
    }

    /// Replace the property map without raising set events.
    ///
    /// Used to record values that were just written to a target.
    pub(crate) fn replace_properties(&mut self, values: PropertyMap) {
        self.live = values;
    }

    /// Capture the target's current value of every key in the map.
    ///
    /// Values already in the backup are kept, so the backup always holds the
    /// earliest captured state.
    pub fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        let names: Vec<String> = self.live.keys().cloned().collect();
        self.backup_names(target, &names)
    }

    /// Capture the target's current value of each of `names`.
    pub(crate) fn backup_names(&mut self, target: &dyn PropertyTarget, names: &[String]) -> StyleReport {
        if !self.is_applicable(target) {
            log::warn!("{}: target not supported, nothing backed up", self.name);
            return StyleReport::new(StyleStatus::NotApplicable);
        }
        if names.is_empty() {
            return StyleReport::new(StyleStatus::Empty);
        }

        let mut report = StyleReport::new(StyleStatus::Done);
        let mut stored = self.backup.take().unwrap_or_default();
        for key in names {
            let value = match target.get_property(key) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("{}: backup skipped: {}", self.name, e);
                    self.report_error(&e);
                    report.failures.push(e);
                    continue;
                },
            };
            let mut args = EventArgs::new(self.name.as_str()).with_key_value(key.as_str(), value);
            if let Some(hooks) = &self.hooks {
                hooks.on_backing_up(&mut args);
            }
            if !args.cancel {
                self.events.trigger(FormatEvent::PropertyBackingUp, &mut args);
            }
            if args.cancel {
                continue;
            }
            if let Some(value) = args.value.clone() {
                stored.entry(key.clone()).or_insert(value);
                report.written.push(key.clone());
                self.events
                    .trigger(FormatEvent::PropertyBackedUp, &mut EventArgs::from_args(&args));
            }
        }
        self.backup = Some(stored);
        report
    }

    /// Write the backup back to `target`, optionally dropping it afterwards.
    pub fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport {
        let Some(backup) = self.backup.as_ref() else {
            return StyleReport::new(StyleStatus::Empty);
        };
        let batch = self.vet(backup.clone(), FormatEvent::PropertyRestoring, |hooks, args| {
            hooks.on_restoring(args)
        });
        let report = self.write(target, batch, FormatEvent::PropertyRestored);
        if clear {
            self.backup = None;
        }
        report
    }

    #[inline]
    pub fn backup_map(&self) -> Option<&PropertyMap> {
        self.backup.as_ref()
    }

    #[inline]
    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    #[inline]
    pub fn clear_backup(&mut self) {
        self.backup = None;
    }

    /// Independent duplicate of the property map; the backup stays behind.
    pub fn copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            live: self.live.clone(),
            backup: None,
            capabilities: self.capabilities.clone(),
            events: EventBus::new(),
            bus: self.bus.clone(),
            hooks: self.hooks.clone(),
        }
    }

    /// Run every entry through the per-property hook and event; keep survivors.
    fn vet<F>(&self, values: PropertyMap, event: FormatEvent, hook: F) -> PropertyMap
    where
        F: Fn(&dyn StyleHooks, &mut EventArgs),
    {
        let mut batch = PropertyMap::new();
        for (key, value) in values {
            let mut args = EventArgs::new(self.name.as_str()).with_key_value(key, value);
            if let Some(hooks) = &self.hooks {
                hook(&**hooks, &mut args);
            }
            if !args.cancel {
                self.events.trigger(event, &mut args);
            }
            if args.cancel {
                continue;
            }
            if let (Some(key), Some(value)) = (args.key, args.value) {
                batch.insert(key, value);
            }
        }
        batch
    }

    fn write(&self, target: &mut dyn PropertyTarget, batch: PropertyMap, event: FormatEvent) -> StyleReport {
        let mut report = StyleReport::new(StyleStatus::Done);
        if batch.is_empty() {
            return report;
        }
        if let Err(e) = target.set_properties(&batch) {
            for failure in &e.errors {
                log::warn!("{}: {}", self.name, failure);
                self.report_error(failure);
            }
            report.failures = e.errors;
        }
        for (key, value) in batch {
            if report.failures.iter().any(|f| f.name() == key) {
                continue;
            }
            let mut args = EventArgs::new(self.name.as_str()).with_key_value(key.as_str(), value);
            if let Some(hooks) = &self.hooks {
                hooks.on_property_set(&args);
            }
            self.events.trigger(event, &mut args);
            report.written.push(key);
        }
        report
    }

    fn report_error(&self, error: &PropertyError) {
        if let Some(hooks) = &self.hooks {
            hooks.on_property_set_error(error);
        }
        let mut args = EventArgs::new(self.name.as_str()).with_key(error.name());
        args.set_data("error", error.to_string());
        self.events.trigger(FormatEvent::PropertyError, &mut args);
    }
}

impl Clone for PropertyStyle {
    /// Same as [`PropertyStyle::copy`]: backups are not cloned.
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl fmt::Debug for PropertyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyStyle")
            .field("name", &self.name)
            .field("live", &self.live)
            .field("backup", &self.backup)
            .field("capabilities", &self.capabilities)
            .field("shared_bus", &self.bus.is_some())
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

impl Style for PropertyStyle {
    fn style_name(&self) -> &str {
        &self.name
    }

    fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        PropertyStyle::apply_with(self, target, options)
    }

    fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        PropertyStyle::backup(self, target)
    }

    fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport {
        PropertyStyle::restore(self, target, clear)
    }

    fn attribute_names(&self) -> Vec<String> {
        self.live.keys().cloned().collect()
    }

    fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    fn attach_bus(&mut self, bus: &Arc<EventBus>) {
        if self.bus.is_none() {
            self.bus = Some(Arc::clone(bus));
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
