//! Table descriptors
//!
//! A layout is an ordered list of entity descriptors plus an ordered list of
//! regions. Order matters: it fixes entity ids and collision priority.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::EntityId;
use crate::error::ConfigError;
use crate::settings::{Preset, Tunables};
use crate::sim::actuator::{Actuator, Pose};
use crate::sim::entity::Entity;
use crate::sim::geometry::MIN_SEGMENT_LENGTH;
use crate::sim::region::Region;

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

fn default_color() -> String {
    "black".to_string()
}

fn default_duration() -> u32 {
    10
}

/// Segment geometry in a layout: origin plus extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub position: Vec2,
    pub extent: Vec2,
}

impl SegmentSpec {
    pub fn new(position: Vec2, extent: Vec2) -> Self {
        Self { position, extent }
    }

    pub fn pose(&self) -> Pose {
        Pose {
            origin: self.position,
            extent: self.extent,
        }
    }

    fn is_degenerate(&self) -> bool {
        !self.extent.is_finite() || self.extent.length() < MIN_SEGMENT_LENGTH
    }
}

/// One entity in a layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EntitySpec {
    Disk {
        /// Top-left of the bounding box
        position: Vec2,
        /// Bounding box; both components are the diameter
        size: Vec2,
        #[serde(default)]
        velocity: Vec2,
        #[serde(default)]
        fixed: bool,
        #[serde(default = "one")]
        bumper: f32,
        #[serde(default)]
        score: u32,
        #[serde(default = "default_color")]
        color: String,
    },
    Wall {
        position: Vec2,
        extent: Vec2,
        #[serde(default = "yes")]
        fixed: bool,
        #[serde(default = "one")]
        bumper: f32,
        #[serde(default = "default_color")]
        color: String,
    },
    Actuator {
        #[serde(default = "yes")]
        fixed: bool,
        rest: SegmentSpec,
        extended: SegmentSpec,
        #[serde(default = "one")]
        bumper: f32,
        key: char,
        #[serde(default = "default_duration")]
        duration: u32,
        #[serde(default = "default_color")]
        color: String,
    },
}

impl EntitySpec {
    /// A free disk with default bumper and no score
    pub fn disk(position: Vec2, diameter: f32, velocity: Vec2) -> Self {
        EntitySpec::Disk {
            position,
            size: Vec2::splat(diameter),
            velocity,
            fixed: false,
            bumper: 1.0,
            score: 0,
            color: default_color(),
        }
    }

    /// A fixed disk acting as a bumper
    pub fn bumper(position: Vec2, diameter: f32, bumper: f32, score: u32, color: &str) -> Self {
        EntitySpec::Disk {
            position,
            size: Vec2::splat(diameter),
            velocity: Vec2::ZERO,
            fixed: true,
            bumper,
            score,
            color: color.to_string(),
        }
    }

    /// A fixed wall with neutral bumper
    pub fn wall(position: Vec2, extent: Vec2) -> Self {
        EntitySpec::Wall {
            position,
            extent,
            fixed: true,
            bumper: 1.0,
            color: default_color(),
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        match self {
            EntitySpec::Disk { size, .. } => {
                if size.x != size.y {
                    return Err(ConfigError::AsymmetricDisk {
                        index,
                        width: size.x,
                        height: size.y,
                    });
                }
                if size.x.is_nan() || size.x <= 0.0 {
                    return Err(ConfigError::InvalidDiameter {
                        index,
                        diameter: size.x,
                    });
                }
            }
            EntitySpec::Wall {
                position, extent, ..
            } => {
                if SegmentSpec::new(*position, *extent).is_degenerate() {
                    return Err(ConfigError::DegenerateSegment {
                        index,
                        geometry: "wall",
                    });
                }
            }
            EntitySpec::Actuator { rest, extended, .. } => {
                if rest.is_degenerate() {
                    return Err(ConfigError::DegenerateSegment {
                        index,
                        geometry: "rest",
                    });
                }
                if extended.is_degenerate() {
                    return Err(ConfigError::DegenerateSegment {
                        index,
                        geometry: "extended",
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the entity. The descriptor must already be validated.
    pub fn build(&self, id: EntityId, actuator_boost: f32) -> Entity {
        match self {
            EntitySpec::Disk {
                position,
                size,
                velocity,
                fixed,
                bumper,
                score,
                color,
            } => Entity::disk(
                id,
                *position,
                size.x,
                *velocity,
                *fixed,
                *bumper,
                *score,
                color.as_str(),
            ),
            EntitySpec::Wall {
                position,
                extent,
                fixed,
                bumper,
                color,
            } => Entity::wall(id, *position, *extent, *fixed, *bumper, color.as_str()),
            EntitySpec::Actuator {
                fixed,
                rest,
                extended,
                bumper,
                key,
                duration,
                color,
            } => Entity::actuator(
                id,
                *fixed,
                Actuator::new(
                    rest.pose(),
                    extended.pose(),
                    *bumper,
                    actuator_boost,
                    *key,
                    *duration,
                ),
                color.as_str(),
            ),
        }
    }
}

/// A complete table: entities and regions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl Layout {
    /// Reject geometry that would fault at simulation time
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, spec) in self.entities.iter().enumerate() {
            spec.validate(index)?;
        }
        for (index, region) in self.regions.iter().enumerate() {
            if let Some(friction) = region.friction {
                if friction.is_nan() || friction < 0.0 {
                    return Err(ConfigError::InvalidRegion { index, friction });
                }
            }
        }
        Ok(())
    }

    /// Load a layout from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: Self = serde_json::from_str(&json)?;
        layout.validate()?;
        log::info!(
            "Loaded layout from {}: {} entities, {} regions",
            path.display(),
            layout.entities.len(),
            layout.regions.len()
        );
        Ok(layout)
    }

    /// Built-in table for a preset
    pub fn for_preset(preset: Preset, tunables: &Tunables) -> Self {
        match preset {
            Preset::Classic => classic(tunables),
            Preset::Frictionless => frictionless(),
            Preset::Dropping => dropping(),
            Preset::Lines => lines(),
        }
    }
}

fn moving(x: f32, y: f32, diameter: f32, color: &str, vx: f32, vy: f32) -> EntitySpec {
    EntitySpec::Disk {
        position: Vec2::new(x, y),
        size: Vec2::splat(diameter),
        velocity: Vec2::new(vx, vy),
        fixed: false,
        bumper: 1.0,
        score: 0,
        color: color.to_string(),
    }
}

fn line(x: f32, y: f32, dx: f32, dy: f32, bumper: f32, color: &str) -> EntitySpec {
    EntitySpec::Wall {
        position: Vec2::new(x, y),
        extent: Vec2::new(dx, dy),
        fixed: true,
        bumper,
        color: color.to_string(),
    }
}

fn zone(x: f32, y: f32, w: f32, h: f32) -> Region {
    Region {
        min: Vec2::new(x, y),
        size: Vec2::new(w, h),
        disappears: false,
        friction: None,
        gravity: None,
    }
}

/// Pinball table: two live balls, fixed bumpers, slanted top corners, two
/// flippers ('h' and 'k'), a left chute that pushes balls back up, a launch
/// lane on the right and a drain along the bottom.
fn classic(tunables: &Tunables) -> Layout {
    let w = tunables.width;
    let h = tunables.height;
    let bump = tunables.bumper_multiplier;
    // Left edge of the playfield's center column
    let mid = (w - 100.0) / 2.0;

    let entities = vec![
        EntitySpec::Disk {
            position: Vec2::new(w - 75.0, h - 550.0),
            size: Vec2::splat(50.0),
            velocity: Vec2::new(0.0, -14.0),
            fixed: false,
            bumper: 2.0,
            score: 10,
            color: "lightblue".to_string(),
        },
        EntitySpec::Disk {
            position: Vec2::new(w - 75.0, h - 450.0),
            size: Vec2::splat(50.0),
            velocity: Vec2::new(0.0, -12.0),
            fixed: false,
            bumper: 2.0,
            score: 10,
            color: "blue".to_string(),
        },
        EntitySpec::bumper(Vec2::new(mid - 50.0, -25.0), 100.0, bump, 10, "red"),
        EntitySpec::bumper(Vec2::new(mid - 200.0, 150.0), 50.0, bump, 5, "orange"),
        EntitySpec::bumper(Vec2::new(mid + 150.0, 150.0), 50.0, bump, 5, "orange"),
        EntitySpec::bumper(Vec2::new(mid - 25.0, 300.0), 50.0, bump, 5, "green"),
        // Slanted top corners
        line(0.0, 100.0, 100.0, -100.0, bump, "red"),
        line(w - 100.0, 0.0, 100.0, 100.0, bump, "red"),
        // Flippers
        EntitySpec::Actuator {
            fixed: true,
            rest: SegmentSpec::new(Vec2::new(0.0, h - 150.0), Vec2::new(mid - 50.0, 50.0)),
            extended: SegmentSpec::new(Vec2::new(0.0, h - 150.0), Vec2::new(mid - 50.0, 25.0)),
            bumper: bump,
            key: 'h',
            duration: 10,
            color: "red".to_string(),
        },
        EntitySpec::Actuator {
            fixed: true,
            rest: SegmentSpec::new(
                Vec2::new(mid + 50.0, h - 100.0),
                Vec2::new(w - 100.0 - 50.0 - mid, -50.0),
            ),
            extended: SegmentSpec::new(
                Vec2::new(mid + 50.0, h - 125.0),
                Vec2::new(w - 100.0 - 50.0 - mid, -25.0),
            ),
            bumper: bump,
            key: 'k',
            duration: 10,
            color: "red".to_string(),
        },
        // Left chute
        line(98.0, 150.0, 2.0, 0.0, 1.0, "black"),
        line(100.0, 150.0, 0.0, h - 400.0, 1.0, "black"),
        line(98.0, 150.0, 0.0, h - 400.0, bump * 2.0, "blue"),
        // Launch lane
        line(w - 100.0, 150.0, 2.0, 0.0, 1.0, "black"),
        line(w - 100.0, 150.0, 0.0, h - 150.0, 1.0, "black"),
        line(w - 98.0, 150.0, 0.0, h - 150.0, 1.0, "black"),
    ];

    let regions = vec![
        Region {
            disappears: true,
            ..zone(0.0, h - 30.0, w, 30.0)
        },
        Region {
            friction: Some(1.1),
            gravity: Some(-2.0),
            ..zone(0.0, 150.0, 98.0, h - 400.0)
        },
        Region {
            gravity: Some(-1.0),
            ..zone(mid - 220.0, 130.0, 90.0, 90.0)
        },
        Region {
            gravity: Some(-1.0),
            ..zone(mid + 130.0, 130.0, 90.0, 90.0)
        },
    ];

    Layout { entities, regions }
}

/// Six balls drifting in space
fn frictionless() -> Layout {
    Layout {
        entities: vec![
            moving(0.0, 0.0, 50.0, "red", 3.0, 3.0),
            moving(100.0, 100.0, 50.0, "blue", 3.0, 3.0),
            moving(200.0, 200.0, 100.0, "black", 6.0, 3.0),
            moving(350.0, 350.0, 100.0, "green", 3.0, 6.0),
            moving(50.0, 50.0, 20.0, "purple", 3.0, 3.0),
            moving(150.0, 150.0, 20.0, "yellow", 9.0, 9.0),
        ],
        regions: vec![],
    }
}

/// Six balls falling from rest, one thrown upward
fn dropping() -> Layout {
    Layout {
        entities: vec![
            moving(10.0, 10.0, 50.0, "red", 0.0, 0.0),
            moving(100.0, 100.0, 50.0, "blue", 0.0, 0.0),
            moving(200.0, 200.0, 100.0, "black", 0.0, 0.0),
            moving(350.0, 350.0, 100.0, "green", 0.0, 0.0),
            moving(50.0, 50.0, 20.0, "purple", 0.0, 0.0),
            moving(150.0, 150.0, 20.0, "yellow", -9.0, -9.0),
        ],
        regions: vec![],
    }
}

/// Balls falling onto two slanted lines
fn lines() -> Layout {
    Layout {
        entities: vec![
            moving(0.0, 0.0, 50.0, "red", 3.0, 3.0),
            moving(100.0, 100.0, 50.0, "blue", 3.0, 3.0),
            moving(200.0, 200.0, 35.0, "black", 6.0, 3.0),
            moving(350.0, 350.0, 35.0, "green", 3.0, 6.0),
            moving(50.0, 50.0, 20.0, "purple", 3.0, 3.0),
            moving(150.0, 150.0, 20.0, "yellow", 9.0, 9.0),
            line(200.0, 400.0, 500.0, 50.0, 1.0, "black"),
            line(100.0, 200.0, 500.0, -50.0, 1.0, "black"),
        ],
        regions: vec![],
    }
}
