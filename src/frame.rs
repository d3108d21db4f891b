//! Read-only render projection
//!
//! Built from the simulation once per tick. Renderers draw from a `Frame`;
//! nothing flows back into the simulation.

use glam::Vec2;
use serde::Serialize;

use crate::EntityId;
use crate::sim::{Machine, Shape};

/// A disk to draw, as its bounding box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskSprite {
    pub id: EntityId,
    pub position: Vec2,
    pub size: Vec2,
    pub color: String,
}

/// A wall or actuator to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSprite {
    pub id: EntityId,
    pub start: Vec2,
    pub end: Vec2,
    pub color: String,
    /// Geometry changed on the last tick; cached shapes must be rebuilt
    pub rebuilt: bool,
}

/// Everything the display needs for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub score: u64,
    pub balls_left: u32,
    pub disks: Vec<DiskSprite>,
    pub segments: Vec<SegmentSprite>,
}

impl Frame {
    pub fn capture(state: &Machine) -> Self {
        let mut frame = Frame {
            tick: state.time_ticks,
            score: state.score,
            balls_left: state.balls_left,
            ..Default::default()
        };

        for entity in &state.entities {
            let body = &entity.body;
            match &entity.shape {
                Shape::Disk(_) => frame.disks.push(DiskSprite {
                    id: body.id,
                    position: body.pos,
                    size: body.size,
                    color: body.color.clone(),
                }),
                Shape::Wall(_) | Shape::Actuator(_) => frame.segments.push(SegmentSprite {
                    id: body.id,
                    start: body.pos,
                    end: body.pos + body.size,
                    color: body.color.clone(),
                    rebuilt: matches!(&entity.shape, Shape::Actuator(a) if a.rebuilt),
                }),
            }
        }

        frame
    }
}

/// External display collaborator: shows score, balls left and the table
pub trait Display {
    fn present(&mut self, frame: &Frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::settings::{Preset, Tunables};
    use crate::sim::tick;

    #[test]
    fn test_capture_classic_table() {
        let tunables = Tunables::default();
        let layout = Layout::for_preset(Preset::Classic, &tunables);
        let state = Machine::new(&layout, tunables, 3).unwrap();
        let frame = Frame::capture(&state);
        assert_eq!(frame.disks.len(), 6);
        assert_eq!(frame.segments.len(), 10);
        assert_eq!(frame.balls_left, 10);
        assert_eq!(frame.disks[0].color, "lightblue");
        assert!(frame.segments.iter().all(|s| !s.rebuilt));
    }

    #[test]
    fn test_rebuilt_flag_follows_actuator() {
        let tunables = Tunables::default();
        let layout = Layout::for_preset(Preset::Classic, &tunables);
        let mut state = Machine::new(&layout, tunables, 3).unwrap();

        tick(&mut state, Some('h'));
        let frame = Frame::capture(&state);
        let rebuilt: Vec<EntityId> = frame
            .segments
            .iter()
            .filter(|s| s.rebuilt)
            .map(|s| s.id)
            .collect();
        assert_eq!(rebuilt, vec![EntityId(8)]);

        tick(&mut state, None);
        let frame = Frame::capture(&state);
        assert!(frame.segments.iter().all(|s| !s.rebuilt));
    }
}
