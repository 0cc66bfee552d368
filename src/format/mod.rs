//! Style engine: property maps applied to host objects.
//!
//! A style holds the property values it wants on a target and writes them
//! in one batch. Writes, backups and restores pass through cancellable
//! hooks and events, and a per-property failure never aborts the rest of
//! the batch.
//!
//! # Example
//!
//! ```
//! use docstyle::format::{EventArgs, FormatContext, FormatEvent, Listener, PropertyBag, PropertyStyle};
//!
//! let context = FormatContext::new();
//! let guard = Listener::new(|args: &mut EventArgs| {
//!     if args.source() == "Locked" {
//!         args.cancel = true;
//!     }
//! });
//! context.bus().on(FormatEvent::StyleApplying, &guard);
//!
//! let mut style = PropertyStyle::with_context("Locked", &context);
//! style.set("CharWeight", 150.0);
//! let mut target = PropertyBag::new().with_property("CharWeight", 100.0);
//! assert!(!style.apply(&mut target).is_done());
//! ```

pub mod config;
pub mod events;
pub mod frozen;
pub mod multi;
pub mod style;
pub mod table;
pub mod target;
pub mod value;

pub use config::{ApplyOptions, DEFAULT_MIN_TABLE_WIDTH, FormatContext, SolverOptions};
pub use events::{EventArgs, EventBus, EventCallback, EventObserver, FormatEvent, Listener};
pub use frozen::Frozen;
pub use multi::{CompositeStyle, StyleComponentEntry};
pub use style::{PropertyStyle, Style, StyleHooks, StyleReport, StyleStatus};
pub use target::{PropertyBag, PropertyTarget};
pub use value::{PropertyMap, PropertyValue, ValueKind};
