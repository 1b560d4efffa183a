//! Bidirectional converter between legacy Visualization Objects and AFM
//! executions.
//!
//! - [`to_afm`] turns a Visualization Object into an AFM plus the
//!   Transformation that carries its titles, formats, sorting and stacking.
//! - [`to_vis_obj`] rebuilds a Visualization Object from those two.
//!
//! Attribute ↔ display-form lookups go through a [`Resolver`];
//! [`AttributesMap`] is the plain-table implementation.

pub mod cli;
pub mod config;
pub mod convert;
pub mod model;

pub use convert::{
    AttributesMap, ConvertError, ConvertResult, ExecutionBundle, Resolver, RoundTripReport,
    round_trip, to_afm, to_vis_obj,
};
pub use model::{Afm, ChartKind, ResultHeader, Transformation, VisualizationObject};
