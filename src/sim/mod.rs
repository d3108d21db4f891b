//! Deterministic simulation module
//!
//! All table physics lives here. This module must stay pure and deterministic:
//! - One fixed tick per call
//! - Seeded RNG only
//! - Stable iteration order (layout order, spawned balls appended)
//! - No rendering or platform dependencies

pub mod actuator;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod region;
pub mod state;
pub mod tick;

pub use actuator::{Actuator, ActuatorState, Pose};
pub use collision::{Resolution, detect, elastic_exchange, reflect_off_segment, resolve};
pub use entity::{Body, Disk, Entity, Segment, Shape};
pub use geometry::{point_in_bounding_box, project_point_onto_segment};
pub use region::Region;
pub use state::Machine;
pub use tick::{TickReport, tick};
