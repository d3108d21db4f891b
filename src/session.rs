//! One simulation run wired to its input queue and display
//!
//! The scheduler calls `step` once per tick interval. Each step drains at most
//! one key, advances the machine and presents the resulting frame.

use crate::consts::QUIT_KEY;
use crate::frame::{Display, Frame};
use crate::input::KeyReceiver;
use crate::sim::{Machine, TickReport, tick};

pub struct Session<D: Display> {
    pub machine: Machine,
    keys: KeyReceiver,
    display: D,
}

impl<D: Display> Session<D> {
    pub fn new(machine: Machine, keys: KeyReceiver, display: D) -> Self {
        Self {
            machine,
            keys,
            display,
        }
    }

    /// Run one tick
    ///
    /// Returns `None` without ticking when the drained key is the quit key.
    pub fn step(&mut self) -> Option<TickReport> {
        let key = self.keys.next_key();
        if key == Some(QUIT_KEY) {
            log::info!("Quit requested after tick {}", self.machine.time_ticks);
            return None;
        }
        let report = tick(&mut self.machine, key);
        self.display.present(&Frame::capture(&self.machine));
        Some(report)
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
