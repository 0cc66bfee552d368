//! Docstyle - a style engine for document object models
//!
//! Styles are sparse maps of named property values applied to host objects
//! (paragraphs, characters, tables) through a small property interface.
//! Every change can be observed, vetoed or rewritten through hooks and an
//! event bus, and a style can back up what it is about to overwrite and
//! restore it later.
//!
//! # Features
//!
//! - **Property styles**: batch writes with per-property failure reporting
//! - **Composite styles**: one style built from an own map and named children
//! - **Events**: cancellable events on a per-style and an application-wide bus
//! - **Backup/restore**: round-trip a target's state around an apply
//! - **Table layout**: width and margin distribution that always fills the page
//! - **Units**: conversion between millimeters, points, inches, twips and more
//!
//! # Example - Applying a style
//!
//! ```
//! use docstyle::format::{PropertyBag, PropertyStyle, PropertyValue};
//!
//! let mut bold = PropertyStyle::new("Bold");
//! bold.set("CharWeight", 150.0);
//!
//! let mut target = PropertyBag::new().with_property("CharWeight", 100.0);
//! let report = bold.apply(&mut target);
//! assert!(report.is_clean());
//! assert_eq!(target.get("CharWeight"), Some(&PropertyValue::Float(150.0)));
//! ```
//!
//! # Example - Laying out a table
//!
//! ```
//! use docstyle::format::table::{LayoutSolver, Percent, Placement};
//!
//! # fn main() -> docstyle::Result<()> {
//! let solver = LayoutSolver::default();
//! let solution = solver.solve(10_000, &Placement::RelLeftByWidth(Percent::new(40)?), None)?;
//! assert_eq!(solution.result.width(), 4_000);
//! assert_eq!(solution.result.right(), 6_000);
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade; install
//! any logger to see them.

pub mod common;
pub mod format;

pub use common::{Error, Result};
