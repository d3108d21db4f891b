//! Fixed tick simulation step
//!
//! Core loop that advances the table by one tick. Positions move by half the
//! velocity each tick, so friction is applied as its square root and gravity
//! halved.

use glam::Vec2;

use super::collision::{Resolution, detect};
use super::entity::Body;
use super::region::{Region, drains, friction_at, gravity_at};
use super::state::Machine;
use crate::EntityId;
use crate::settings::Tunables;

/// What happened during one tick, for the display and the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick number after this step
    pub tick: u64,
    /// Key consumed this tick
    pub key: Option<char>,
    /// Ball launched this tick
    pub spawned: Option<EntityId>,
    /// Points earned this tick
    pub scored: u64,
    /// Balls removed by draining regions
    pub drained: Vec<EntityId>,
    /// Running score
    pub score: u64,
    /// Balls the player may still launch
    pub balls_left: u32,
}

/// Advance the machine by one tick with at most one key
pub fn tick(state: &mut Machine, key: Option<char>) -> TickReport {
    state.time_ticks += 1;

    let spawned = if key == Some(state.tunables.spawn_key) {
        state.spawn_ball()
    } else {
        None
    };

    // Snapshot ids so removals mid-pass never skip or revisit a disk
    let active: Vec<EntityId> = state
        .entities
        .iter()
        .filter(|e| e.is_active())
        .map(|e| e.id())
        .collect();

    let mut scored = 0u64;
    let mut drained = Vec::new();

    for id in active {
        let Some(idx) = state.index_of(id) else {
            continue;
        };

        if drains(&state.regions, state.entities[idx].body.center()) {
            state.entities.remove(idx);
            drained.push(id);
            log::info!("Ball {} drained", id);
            continue;
        }

        let body = &mut state.entities[idx].body;
        body.pos += body.vel * 0.5;
        if !body.fixed {
            apply_environment(body, &state.regions, &state.tunables);
        }

        let contact = detect(&state.entities, idx);
        if let Resolution::Exchanged { score } = state.resolve_contact(idx, contact) {
            scored += score;
        }
    }

    for entity in state.entities.iter_mut() {
        entity.actuate(key);
    }

    if scored > 0 {
        log::debug!("Tick {}: +{} points", state.time_ticks, scored);
    }
    state.score += scored;

    TickReport {
        tick: state.time_ticks,
        key,
        spawned,
        scored,
        drained,
        score: state.score,
        balls_left: state.balls_left,
    }
}

/// Friction, gravity and the speed cap, with region overrides
fn apply_environment(body: &mut Body, regions: &[Region], tunables: &Tunables) {
    let center = body.center();
    let friction = friction_at(regions, center).unwrap_or(tunables.friction);
    let gravity = gravity_at(regions, center).unwrap_or(tunables.gravity);

    body.vel *= friction.sqrt();
    body.vel.y += gravity / 2.0;

    let cap = Vec2::splat(tunables.max_speed);
    body.vel = body.vel.clamp(-cap, cap);
}
