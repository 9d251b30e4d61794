//! Real-time cardiac visualization engine.
//!
//! Drives a looping cardiac cycle, advects blood particles along three
//! circulation paths with valve-gated speed, and maps structured diagnoses
//! onto highlights of a loaded heart model. Rendering is delegated to a
//! [`scene::Scene`] implementation supplied by the host.

pub mod anatomy;
pub mod cycle;
pub mod diagnosis;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod highlight;
pub mod math;
pub mod scene;
pub mod viewer;

pub use error::{CardioError, Result};
pub use viewer::{Viewer, ViewerConfig};
