//! Named-event publish/subscribe for style lifecycle notifications.
//!
//! A bus is an ordinary value shared through `Arc<EventBus>`; styles receive
//! it from a [`FormatContext`](super::FormatContext) instead of reaching for
//! a global. The bus only holds weak references: a [`Listener`] stays
//! subscribed exactly as long as its owner keeps it alive, and dead entries
//! are pruned after the trigger that finds them.
//!
//! # Examples
//!
//! ```
//! use docstyle::format::{EventArgs, EventBus, FormatEvent, Listener};
//!
//! let bus = EventBus::new();
//! let veto = Listener::new(|args: &mut EventArgs| args.cancel = true);
//! bus.on(FormatEvent::StyleApplying, &veto);
//!
//! let mut args = EventArgs::new("TableProperties");
//! bus.trigger(FormatEvent::StyleApplying, &mut args);
//! assert!(args.cancel);
//!
//! drop(veto);
//! let mut args = EventArgs::new("TableProperties");
//! bus.trigger(FormatEvent::StyleApplying, &mut args);
//! assert!(!args.cancel);
//! ```

use super::value::{PropertyMap, PropertyValue};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Weak};

/// Source name given to arguments triggered without one.
pub const DEFAULT_SOURCE: &str = "docstyle";

/// Lifecycle events raised by styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatEvent {
    /// Cancellable, before a value enters a style's property map
    StyleSetting,
    StyleSet,
    /// Cancellable, before a key leaves a style's property map
    StyleRemoving,
    StyleRemoved,
    /// Cancellable, before a style writes to a target
    StyleApplying,
    StyleApplied,
    /// Cancellable, per property before the batch write
    PropertyApplying,
    PropertyApplied,
    /// A property could not be read or written
    PropertyError,
    /// Cancellable, per property before it is stored in the backup
    PropertyBackingUp,
    PropertyBackedUp,
    /// Cancellable, per property before a backed-up value is written back
    PropertyRestoring,
    PropertyRestored,
    /// Cancellable, before a child style is added to a composite
    MultiStyleSetting,
    MultiStyleSet,
    /// Cancellable, before a composite applies one of its children
    MultiChildApplying,
    MultiChildApplied,
    /// A table layout fell back to full width
    LayoutFallback,
}

impl FormatEvent {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StyleSetting => "style_setting",
            Self::StyleSet => "style_set",
            Self::StyleRemoving => "style_removing",
            Self::StyleRemoved => "style_removed",
            Self::StyleApplying => "style_applying",
            Self::StyleApplied => "style_applied",
            Self::PropertyApplying => "style_property_applying",
            Self::PropertyApplied => "style_property_applied",
            Self::PropertyError => "style_property_error",
            Self::PropertyBackingUp => "style_property_backing_up",
            Self::PropertyBackedUp => "style_property_backed_up",
            Self::PropertyRestoring => "style_property_restoring",
            Self::PropertyRestored => "style_property_restored",
            Self::MultiStyleSetting => "multi_style_setting",
            Self::MultiStyleSet => "multi_style_set",
            Self::MultiChildApplying => "multi_child_applying",
            Self::MultiChildApplied => "multi_child_applied",
            Self::LayoutFallback => "table_layout_fallback",
        }
    }
}

impl AsRef<str> for FormatEvent {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FormatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments passed to every callback of a trigger.
///
/// Callbacks communicate back by setting `cancel`, `handled`, or by
/// rewriting `key`/`value`.
#[derive(Debug, Clone, Default)]
pub struct EventArgs {
    source: Option<String>,
    event_name: Option<String>,
    pub key: Option<String>,
    pub value: Option<PropertyValue>,
    /// Pending property batch, for style-level events
    pub values: Option<PropertyMap>,
    pub cancel: bool,
    pub handled: bool,
    data: BTreeMap<String, PropertyValue>,
}

impl EventArgs {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn with_key_value(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.key = Some(key.into());
        self.value = Some(value);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_values(mut self, values: PropertyMap) -> Self {
        self.values = Some(values);
        self
    }

    /// Fresh arguments carrying the payload of `other`, with flags reset.
    pub fn from_args(other: &EventArgs) -> Self {
        Self {
            source: other.source.clone(),
            event_name: None,
            key: other.key.clone(),
            value: other.value.clone(),
            values: other.values.clone(),
            cancel: false,
            handled: false,
            data: other.data.clone(),
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }

    /// Name of the event these arguments were last triggered with.
    #[inline]
    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.data.insert(key.into(), value.into());
    }

    #[inline]
    pub fn data(&self, key: &str) -> Option<&PropertyValue> {
        self.data.get(key)
    }
}

/// Callback signature accepted by [`EventBus::on`].
pub type EventCallback = dyn Fn(&mut EventArgs) + Send + Sync;

/// Strong handle to a subscribed callback.
///
/// The bus keeps only a weak reference; dropping every clone of the listener
/// ends the subscription.
#[derive(Clone)]
pub struct Listener(Arc<EventCallback>);

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut EventArgs) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    #[inline]
    fn downgrade(&self) -> Weak<EventCallback> {
        Arc::downgrade(&self.0)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("strong", &Arc::strong_count(&self.0))
            .finish()
    }
}

/// Receives every event triggered on a bus, whatever its name.
pub trait EventObserver: Send + Sync {
    fn on_event(&self, event_name: &str, args: &mut EventArgs);
}

#[derive(Default)]
struct Registry {
    callbacks: HashMap<String, Vec<Weak<EventCallback>>>,
    observers: Vec<Weak<dyn EventObserver>>,
}

/// Publish/subscribe service with weakly-held subscribers.
#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Subscribe `listener` to `name`.
    pub fn on(&self, name: impl AsRef<str>, listener: &Listener) {
        let mut registry = self.registry.lock();
        registry
            .callbacks
            .entry(name.as_ref().to_string())
            .or_default()
            .push(listener.downgrade());
    }

    /// Remove every subscription of `listener` to `name`.
    pub fn off(&self, name: impl AsRef<str>, listener: &Listener) {
        let target = listener.downgrade();
        let mut registry = self.registry.lock();
        if let Some(list) = registry.callbacks.get_mut(name.as_ref()) {
            list.retain(|w| !Weak::ptr_eq(w, &target) && w.strong_count() > 0);
            if list.is_empty() {
                registry.callbacks.remove(name.as_ref());
            }
        }
    }

    pub fn add_observer<O: EventObserver + 'static>(&self, observer: &Arc<O>) {
        let weak: Weak<O> = Arc::downgrade(observer);
        let weak: Weak<dyn EventObserver> = weak;
        self.registry.lock().observers.push(weak);
    }

    pub fn remove_observer<O: EventObserver + 'static>(&self, observer: &Arc<O>) {
        let target: Weak<O> = Arc::downgrade(observer);
        let target: Weak<dyn EventObserver> = target;
        self.registry
            .lock()
            .observers
            .retain(|w| !Weak::ptr_eq(w, &target) && w.strong_count() > 0);
    }

    /// Number of live callbacks subscribed to `name`.
    pub fn listener_count(&self, name: impl AsRef<str>) -> usize {
        self.registry
            .lock()
            .callbacks
            .get(name.as_ref())
            .map_or(0, |list| list.iter().filter(|w| w.strong_count() > 0).count())
    }

    /// Number of registry entries for `name`, dead ones included.
    pub fn registered_count(&self, name: impl AsRef<str>) -> usize {
        self.registry
            .lock()
            .callbacks
            .get(name.as_ref())
            .map_or(0, Vec::len)
    }

    /// Invoke every live callback for `name`, then every live observer.
    ///
    /// The registry lock is not held while callbacks run, so a callback may
    /// subscribe new listeners; they are reached from the next trigger on.
    pub fn trigger(&self, name: impl AsRef<str>, args: &mut EventArgs) {
        let name = name.as_ref();
        args.event_name = Some(name.to_string());
        if args.source.is_none() {
            args.source = Some(DEFAULT_SOURCE.to_string());
        }

        let snapshot = {
            let registry = self.registry.lock();
            registry.callbacks.get(name).cloned().unwrap_or_default()
        };
        let mut dead = Vec::new();
        for (i, weak) in snapshot.iter().enumerate() {
            match weak.upgrade() {
                Some(callback) => callback(args),
                None => dead.push(i),
            }
        }

        let observers = self.registry.lock().observers.clone();
        let mut dead_observers = Vec::new();
        for (i, weak) in observers.iter().enumerate() {
            match weak.upgrade() {
                Some(observer) => observer.on_event(name, args),
                None => dead_observers.push(i),
            }
        }

        if dead.is_empty() && dead_observers.is_empty() {
            return;
        }
        let mut registry = self.registry.lock();
        if let Some(list) = registry.callbacks.get_mut(name) {
            prune(list, &snapshot, &dead);
            if list.is_empty() {
                registry.callbacks.remove(name);
            }
        }
        prune(&mut registry.observers, &observers, &dead_observers);
    }
}

/// Remove dead entries by descending index, skipping any slot that no longer
/// holds the entry seen in `snapshot`.
fn prune<T: ?Sized>(list: &mut Vec<Weak<T>>, snapshot: &[Weak<T>], dead: &[usize]) {
    for &i in dead.iter().rev() {
        if i < list.len() && Weak::ptr_eq(&list[i], &snapshot[i]) {
            list.remove(i);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("EventBus")
            .field("events", &registry.callbacks.len())
            .field("observers", &registry.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Listener) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let listener = Listener::new(move |_args: &mut EventArgs| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (hits, listener)
    }

    #[test]
    fn test_trigger_tags_args() {
        let bus = EventBus::new();
        let mut args = EventArgs::default();
        bus.trigger(FormatEvent::StyleSet, &mut args);
        assert_eq!(args.event_name(), Some("style_set"));
        assert_eq!(args.source(), DEFAULT_SOURCE);

        let mut args = EventArgs::new("ParaStyle");
        bus.trigger("custom", &mut args);
        assert_eq!(args.source(), "ParaStyle");
        assert_eq!(args.event_name(), Some("custom"));
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let bus = EventBus::new();
        let (hits, listener) = counter();
        let (_other_hits, other) = counter();
        bus.on("e", &listener);
        bus.on("e", &other);
        bus.trigger("e", &mut EventArgs::default());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        drop(listener);
        assert_eq!(bus.registered_count("e"), 2);
        assert_eq!(bus.listener_count("e"), 1);
        bus.trigger("e", &mut EventArgs::default());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.registered_count("e"), 1);
    }

    #[test]
    fn test_off_unsubscribes() {
        let bus = EventBus::new();
        let (hits, listener) = counter();
        bus.on(FormatEvent::StyleApplied, &listener);
        bus.off(FormatEvent::StyleApplied, &listener);
        bus.trigger(FormatEvent::StyleApplied, &mut EventArgs::default());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.registered_count(FormatEvent::StyleApplied), 0);
    }

    #[test]
    fn test_subscribe_during_trigger_is_deferred() {
        let bus = Arc::new(EventBus::new());
        let (late_hits, late) = counter();
        let late = Arc::new(late);

        let bus_ref = Arc::clone(&bus);
        let late_ref = Arc::clone(&late);
        let registrar = Listener::new(move |_args: &mut EventArgs| {
            bus_ref.on("e", &late_ref);
        });
        bus.on("e", &registrar);

        bus.trigger("e", &mut EventArgs::default());
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        bus.trigger("e", &mut EventArgs::default());
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    struct Recorder(Mutex<Vec<String>>);

    impl EventObserver for Recorder {
        fn on_event(&self, event_name: &str, _args: &mut EventArgs) {
            self.0.lock().push(event_name.to_string());
        }
    }

    #[test]
    fn test_observers_receive_every_event() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        bus.add_observer(&recorder);

        bus.trigger("a", &mut EventArgs::default());
        bus.trigger(FormatEvent::StyleApplying, &mut EventArgs::default());
        assert_eq!(*recorder.0.lock(), vec!["a", "style_applying"]);

        bus.remove_observer(&recorder);
        bus.trigger("b", &mut EventArgs::default());
        assert_eq!(recorder.0.lock().len(), 2);
    }

    #[test]
    fn test_remove_one_observer_keeps_others() {
        let bus = EventBus::new();
        let first = Arc::new(Recorder(Mutex::new(Vec::new())));
        let second = Arc::new(Recorder(Mutex::new(Vec::new())));
        bus.add_observer(&first);
        bus.add_observer(&second);

        bus.remove_observer(&first);
        bus.trigger("a", &mut EventArgs::default());
        assert!(first.0.lock().is_empty());
        assert_eq!(*second.0.lock(), vec!["a"]);

        let weak = Arc::downgrade(&second);
        drop(second);
        bus.trigger("b", &mut EventArgs::default());
        assert!(weak.upgrade().is_none());
        assert_eq!(bus.registry.lock().observers.len(), 0);
    }

    #[test]
    fn test_callbacks_can_rewrite_values() {
        let bus = EventBus::new();
        let doubler = Listener::new(|args: &mut EventArgs| {
            if let Some(PropertyValue::Int(v)) = args.value {
                args.value = Some(PropertyValue::Int(v * 2));
            }
        });
        bus.on("set", &doubler);
        let mut args = EventArgs::new("s").with_key_value("Width", PropertyValue::Int(21));
        bus.trigger("set", &mut args);
        assert_eq!(args.value, Some(PropertyValue::Int(42)));
    }
}
