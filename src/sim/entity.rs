//! Entity model: disks, walls and actuators sharing one body record

use glam::{BVec2, Vec2};

use super::actuator::{Actuator, Pose};
use super::geometry::segment_bounds;
use crate::EntityId;
use crate::consts::FIXED_MASS;

/// Attributes every entity carries
#[derive(Debug, Clone)]
pub struct Body {
    pub id: EntityId,
    /// Top-left of the bounding box for disks, segment origin for walls
    pub pos: Vec2,
    /// Bounding extents for disks (diameter, diameter), segment vector for walls
    pub size: Vec2,
    pub vel: Vec2,
    /// Fixed bodies have effectively infinite mass and never change velocity
    pub fixed: bool,
    pub mass: f32,
    /// Restitution multiplier applied to the other party on contact
    pub bumper: f32,
    /// Render color, passed through untouched
    pub color: String,
}

impl Body {
    pub fn new(
        id: EntityId,
        pos: Vec2,
        size: Vec2,
        vel: Vec2,
        fixed: bool,
        bumper: f32,
        color: impl Into<String>,
    ) -> Self {
        let mass = if fixed {
            FIXED_MASS
        } else {
            (size.x * size.y).abs()
        };
        Self {
            id,
            pos,
            size,
            vel: if fixed { Vec2::ZERO } else { vel },
            fixed,
            mass,
            bumper,
            color: color.into(),
        }
    }

    /// Center of the bounding box
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Disk-specific state
#[derive(Debug, Clone)]
pub struct Disk {
    pub radius: f32,
    /// Points awarded when this disk takes part in a disk-disk contact
    pub score: u32,
    /// Per-axis hysteresis so a disk pressed against the table edge reverses once
    pub wall_contact: BVec2,
}

/// Bounding box of a segment, used to clip projections to the segment's span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub min: Vec2,
    pub max: Vec2,
}

impl Segment {
    pub fn from_pose(pose: Pose) -> Self {
        let (min, max) = segment_bounds(pose.origin, pose.extent);
        Self { min, max }
    }
}

/// Closed set of entity variants
#[derive(Debug, Clone)]
pub enum Shape {
    Disk(Disk),
    Wall(Segment),
    Actuator(Actuator),
}

/// A simulated entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub body: Body,
    pub shape: Shape,
}

impl Entity {
    /// A disk whose bounding box starts at `pos` with the given diameter
    #[allow(clippy::too_many_arguments)]
    pub fn disk(
        id: EntityId,
        pos: Vec2,
        diameter: f32,
        vel: Vec2,
        fixed: bool,
        bumper: f32,
        score: u32,
        color: impl Into<String>,
    ) -> Self {
        let size = Vec2::splat(diameter);
        Self {
            body: Body::new(id, pos, size, vel, fixed, bumper, color),
            shape: Shape::Disk(Disk {
                radius: diameter / 2.0,
                score,
                wall_contact: BVec2::FALSE,
            }),
        }
    }

    /// A static segment from `origin` to `origin + extent`
    pub fn wall(
        id: EntityId,
        origin: Vec2,
        extent: Vec2,
        fixed: bool,
        bumper: f32,
        color: impl Into<String>,
    ) -> Self {
        let pose = Pose { origin, extent };
        Self {
            body: Body::new(id, origin, extent, Vec2::ZERO, fixed, bumper, color),
            shape: Shape::Wall(Segment::from_pose(pose)),
        }
    }

    /// An actuated segment, starting in its rest pose
    pub fn actuator(id: EntityId, fixed: bool, actuator: Actuator, color: impl Into<String>) -> Self {
        let pose = actuator.pose();
        Self {
            body: Body::new(
                id,
                pose.origin,
                pose.extent,
                Vec2::ZERO,
                fixed,
                actuator.bumper(),
                color,
            ),
            shape: Shape::Actuator(actuator),
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.body.id
    }

    /// Disks take part in stepping; walls and actuators are only targets
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.shape, Shape::Disk(_))
    }

    pub fn as_disk(&self) -> Option<&Disk> {
        match &self.shape {
            Shape::Disk(disk) => Some(disk),
            _ => None,
        }
    }

    /// Current segment pose and bounds for walls and actuators
    pub fn segment(&self) -> Option<(Pose, Segment)> {
        let pose = Pose {
            origin: self.body.pos,
            extent: self.body.size,
        };
        match &self.shape {
            Shape::Wall(segment) => Some((pose, *segment)),
            Shape::Actuator(actuator) => Some((pose, actuator.segment)),
            Shape::Disk(_) => None,
        }
    }

    /// Advance an actuator's timer and mirror its pose onto the body
    ///
    /// No-op for other variants. Returns true when the geometry changed.
    pub fn actuate(&mut self, key: Option<char>) -> bool {
        let Shape::Actuator(actuator) = &mut self.shape else {
            return false;
        };
        let changed = actuator.advance(key);
        let pose = actuator.pose();
        self.body.pos = pose.origin;
        self.body.size = pose.extent;
        self.body.bumper = actuator.bumper();
        changed
    }
}
