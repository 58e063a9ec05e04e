// Module declarations
pub mod catalog;
pub mod config;
pub mod constraints;
pub mod ephemeris;
pub mod error;
pub mod night;
pub mod pipeline;
pub mod report;
pub mod site;
pub mod target;
pub mod utils;

#[cfg(feature = "python")]
mod python;

// Re-export public API
pub use catalog::{Catalog, CatalogRow};
pub use config::{ChartConfig, PlannerConfig};
pub use constraints::{
    ConstraintConfig, ConstraintEvaluator, ConstraintResult, ConstraintSet, ConstraintSpec,
    ConstraintViolation, ObservabilityVerdict, TwilightKind,
};
pub use ephemeris::{EclipseEphemeris, TransitEvent};
pub use error::{Result, TransitError};
pub use night::{NightWindow, SunEvent, WindowPolicy};
pub use pipeline::{
    AltitudeCurve, BatchReport, BatchSummary, RowOutcome, SkipReason, TransitPlanner,
    TransitRecord,
};
pub use site::Site;
pub use target::{PreFilter, SkyTarget};
