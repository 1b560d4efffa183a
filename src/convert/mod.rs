//! Conversion between Visualization Objects and AFM executions.
//!
//! # Module structure
//!
//! - [`ids`]: measure id scheme, element ids, granularity and URI helpers
//! - [`resolver`]: attribute ↔ display-form resolution
//! - [`plan`]: explicit shape of a measure and its optional PoP companion
//! - [`normalize`]: AFM preprocessing and the measure lookup table
//! - [`to_afm`]: Visualization Object → AFM + Transformation
//! - [`to_vis_obj`]: AFM + Transformation → Visualization Object
//! - [`round_trip`]: checks what survives a forward/reverse cycle

use thiserror::Error;

pub mod ids;
pub mod normalize;
pub mod plan;
pub mod resolver;
pub mod round_trip;
pub mod to_afm;
pub mod to_vis_obj;

pub use normalize::{NormalizedAfm, normalize_afm};
pub use plan::MeasurePlan;
pub use resolver::{AttributesMap, Resolver};
pub use round_trip::{Mismatch, RoundTripReport, round_trip};
pub use to_afm::{ExecutionBundle, pop_attribute, to_afm};
pub use to_vis_obj::to_vis_obj;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Structural problems found while reading an AFM.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A `lookupId` names no measure of the same AFM.
    #[error("measure '{measure}' looks up '{lookup_id}', which is not part of the AFM")]
    UnresolvedLookup { measure: String, lookup_id: String },

    /// A `lookupId` points at a measure that is itself a lookup, such as
    /// another PoP companion or the measure itself.
    #[error("measure '{measure}' looks up '{lookup_id}', which has no base object of its own")]
    ChainedLookup { measure: String, lookup_id: String },

    /// Two measures share one id.
    #[error("measure id '{0}' appears more than once")]
    DuplicateMeasureId(String),
}

/// Convenience alias.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
