//! Table styles.
//!
//! - [`layout`]: width and margin distribution for a page width
//! - [`size`]: style writing a solved layout to a table
//! - [`props`]: name, spacing and layout as one composite style

pub mod layout;
pub mod names;
pub mod props;
pub mod size;

pub use layout::{
    LayoutResult, LayoutSolution, LayoutSolver, Percent, Placement, TableAlignKind, TableGeometry,
};
pub use names::{TablePropertyNames, TEXT_TABLE};
pub use props::{TableProperties, TablePropertiesBuilder};
pub use size::TableSize;
