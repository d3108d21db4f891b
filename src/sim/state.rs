//! Simulation context
//!
//! Owns the entity list, regions, id counter and RNG for one run. Nothing
//! outside the stepper writes positions or velocities.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Resolution, resolve};
use super::entity::Entity;
use super::region::Region;
use crate::EntityId;
use crate::error::ConfigError;
use crate::layout::{EntitySpec, Layout};
use crate::settings::Tunables;

/// Color of balls launched during play
pub const LAUNCHED_BALL_COLOR: &str = "black";

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct Machine {
    pub tunables: Tunables,
    /// All entities in layout order (spawned balls appended)
    pub entities: Vec<Entity>,
    /// Regions in priority order
    pub regions: Vec<Region>,
    /// Accumulated score
    pub score: u64,
    /// Balls the player may still launch
    pub balls_left: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    next_id: u32,
}

impl Machine {
    /// Build a machine from validated tunables and layout
    pub fn new(layout: &Layout, tunables: Tunables, seed: u64) -> Result<Self, ConfigError> {
        tunables.validate()?;
        layout.validate()?;

        let mut machine = Self {
            balls_left: tunables.spawn_limit,
            tunables,
            entities: Vec::with_capacity(layout.entities.len()),
            regions: layout.regions.clone(),
            score: 0,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        };

        for spec in &layout.entities {
            let id = machine.next_entity_id();
            let entity = spec.build(id, machine.tunables.actuator_boost);
            machine.entities.push(entity);
        }

        log::info!(
            "Machine ready: {} entities, {} regions, {} balls, seed {}",
            machine.entities.len(),
            machine.regions.len(),
            machine.balls_left,
            seed
        );
        Ok(machine)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Resolve the contact found for the disk at `index`
    pub fn resolve_contact(&mut self, index: usize, contact: Option<usize>) -> Resolution {
        resolve(
            &mut self.entities,
            index,
            contact,
            &self.tunables,
            &mut self.rng,
        )
    }

    /// Launch a ball from the launch lane if any remain
    ///
    /// Over the limit this is a no-op and returns `None`.
    pub fn spawn_ball(&mut self) -> Option<EntityId> {
        if self.balls_left == 0 {
            log::debug!("Spawn refused: no balls left");
            return None;
        }
        self.balls_left -= 1;

        let (lo, hi) = self.tunables.launch_scale;
        let scale = self.rng.random_range(lo..=hi);
        let diameter = self.tunables.launch_diameter * scale;
        let id = self.next_entity_id();
        let spec = EntitySpec::Disk {
            position: self.tunables.launch_position,
            size: Vec2::splat(diameter),
            velocity: self.tunables.launch_velocity,
            fixed: false,
            bumper: 1.0,
            score: 0,
            color: LAUNCHED_BALL_COLOR.to_string(),
        };
        self.entities.push(spec.build(id, self.tunables.actuator_boost));

        log::info!(
            "Ball {} launched (diameter {:.1}), {} left",
            id,
            diameter,
            self.balls_left
        );
        Some(id)
    }

    /// Current index of an entity, if it still exists
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// Number of disks currently on the table (including fixed bumpers)
    pub fn disk_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_active()).count()
    }
}
