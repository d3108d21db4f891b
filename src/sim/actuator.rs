//! Time-limited actuator (flipper) state machine
//!
//! An actuator rests in one pose and snaps to an extended pose for a fixed
//! number of ticks after its key is seen:
//! - `Rest`: countdown == 0, rest pose, rest bumper factor
//! - `Extended`: countdown > 0, extended pose, boosted bumper factor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Segment;

/// Segment geometry: origin plus extent vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub origin: Vec2,
    pub extent: Vec2,
}

/// Actuator phase derived from the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorState {
    Rest,
    Extended,
}

#[derive(Debug, Clone)]
pub struct Actuator {
    pub rest: Pose,
    pub extended: Pose,
    pub rest_bumper: f32,
    pub extended_bumper: f32,
    /// Key that fires this actuator
    pub key: char,
    /// Ticks spent extended per trigger
    pub duration: u32,
    /// Ticks left in the extended pose
    pub countdown: u32,
    /// Bounds of the current pose
    pub segment: Segment,
    /// Geometry changed on the last advance (renderer must rebuild the shape)
    pub rebuilt: bool,
}

impl Actuator {
    pub fn new(rest: Pose, extended: Pose, bumper: f32, boost: f32, key: char, duration: u32) -> Self {
        Self {
            rest,
            extended,
            rest_bumper: bumper,
            extended_bumper: bumper * boost,
            key,
            duration,
            countdown: 0,
            segment: Segment::from_pose(rest),
            rebuilt: false,
        }
    }

    pub fn state(&self) -> ActuatorState {
        if self.countdown > 0 {
            ActuatorState::Extended
        } else {
            ActuatorState::Rest
        }
    }

    /// Pose for the current state
    pub fn pose(&self) -> Pose {
        match self.state() {
            ActuatorState::Rest => self.rest,
            ActuatorState::Extended => self.extended,
        }
    }

    /// Bumper factor for the current state
    pub fn bumper(&self) -> f32 {
        match self.state() {
            ActuatorState::Rest => self.rest_bumper,
            ActuatorState::Extended => self.extended_bumper,
        }
    }

    /// Advance one tick with this tick's key, returning whether the pose changed
    pub fn advance(&mut self, key: Option<char>) -> bool {
        let before = self.pose();

        if key == Some(self.key) {
            if self.countdown == 0 {
                log::debug!("Actuator '{}' fired", self.key);
            }
            self.countdown = self.duration;
        } else if self.countdown > 0 {
            self.countdown -= 1;
        }

        let after = self.pose();
        self.rebuilt = after != before;
        if self.rebuilt {
            self.segment = Segment::from_pose(after);
        }
        self.rebuilt
    }
}
