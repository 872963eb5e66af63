//! Foundation utilities: math types and logging
//!
//! Everything here is domain-agnostic and consumed by the volume, spatial,
//! and collision modules.

pub mod logging;
pub mod math;
