//! Periodic event ephemerides

pub mod transit;

pub use transit::{EclipseEphemeris, TransitEvent};
