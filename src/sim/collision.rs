//! Contact detection and response
//!
//! Discrete overlap tests at tick boundaries only. Each disk resolves at most
//! one contact per tick: the first entity in list order that it touches.

use glam::Vec2;
use rand::Rng;

use super::actuator::Pose;
use super::entity::{Body, Disk, Entity, Shape};
use super::geometry::{direction_or, point_in_bounding_box, project_point_onto_segment, segment_normal};
use crate::settings::Tunables;

/// Slack on segment bounding boxes so axis-aligned segments survive rounding
pub const BOUNDS_TOLERANCE: f32 = 1.0e-3;

/// What the resolver did for a disk this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Bounced off a wall or actuator
    Reflected,
    /// Exchanged momentum with another disk, awarding points
    Exchanged { score: u64 },
    /// No owned contact; table-edge handling ran instead
    Edge,
}

/// Find the first entity the disk at `index` touches
///
/// Segments count when the center's projection is closer than the radius and
/// falls within the segment's bounding box. Disks count when the gap between
/// them is zero or negative.
pub fn detect(entities: &[Entity], index: usize) -> Option<usize> {
    let this = &entities[index];
    let radius = this.as_disk()?.radius;
    let center = this.body.center();

    entities.iter().enumerate().find_map(|(j, other)| {
        if j == index {
            return None;
        }
        let hit = match &other.shape {
            Shape::Wall(_) | Shape::Actuator(_) => {
                let (pose, segment) = other.segment()?;
                let (proj, dist) = project_point_onto_segment(center, pose.origin, pose.extent)?;
                let slack = Vec2::splat(BOUNDS_TOLERANCE);
                dist < radius && point_in_bounding_box(proj, segment.min - slack, segment.max + slack)
            }
            Shape::Disk(disk) => {
                let gap = (center - other.body.center()).length() - (radius + disk.radius);
                gap <= 0.0
            }
        };
        hit.then_some(j)
    })
}

/// Reflect a velocity off a segment treated as an infinite-mass body
///
/// `v' = v - 2 (v . d) d * bumper` where `d` points from the contact point to
/// the disk center. A center lying exactly on the line uses the segment normal.
pub fn reflect_off_segment(vel: Vec2, center: Vec2, pose: Pose, bumper: f32) -> Vec2 {
    let Some((proj, _)) = project_point_onto_segment(center, pose.origin, pose.extent) else {
        return vel;
    };
    let Some(normal) = segment_normal(pose.extent) else {
        return vel;
    };
    let d = direction_or(center - proj, normal);
    vel - 2.0 * vel.dot(d) * d * bumper
}

/// Two-body elastic collision along the line of centers
///
/// Returns the new velocities of `a` and `b`. Each side's change is scaled by
/// the other side's bumper factor; fixed bodies keep their velocity.
pub fn elastic_exchange(a: &Body, b: &Body) -> (Vec2, Vec2) {
    let total = a.mass + b.mass;
    // Coincident centers: any fixed direction will do
    let d1 = direction_or(a.center() - b.center(), Vec2::X);
    let d2 = -d1;

    let va = if a.fixed {
        a.vel
    } else {
        a.vel - (2.0 * b.mass / total) * (a.vel - b.vel).dot(d1) * d1 * b.bumper
    };
    let vb = if b.fixed {
        b.vel
    } else {
        b.vel - (2.0 * a.mass / total) * (b.vel - a.vel).dot(d2) * d2 * a.bumper
    };
    (va, vb)
}

/// Reverse velocity on axes where the disk has crossed the table edge
///
/// The per-axis contact flag makes a disk reverse once, then clears on the
/// next tick so a disk still outside reverses again rather than every tick.
pub fn bounce_off_edges(body: &mut Body, disk: &mut Disk, bounds: Vec2) {
    let far = body.pos + body.size;
    for axis in 0..2 {
        let crossed = far[axis] >= bounds[axis] || body.pos[axis] <= 0.0;
        if crossed && !disk.wall_contact.test(axis) {
            body.vel[axis] = -body.vel[axis];
            disk.wall_contact.set(axis, true);
        } else {
            disk.wall_contact.set(axis, false);
        }
    }
}

/// Split-borrow two distinct entities
fn pair_mut(entities: &mut [Entity], i: usize, j: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = entities.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = entities.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Apply the contact response for the disk at `index`
///
/// Priority: segment contact, then a disk contact this disk owns (larger id),
/// otherwise table-edge handling.
pub fn resolve<R: Rng>(
    entities: &mut [Entity],
    index: usize,
    contact: Option<usize>,
    tunables: &Tunables,
    rng: &mut R,
) -> Resolution {
    if let Some(j) = contact {
        if let Some((pose, _)) = entities[j].segment() {
            let bumper = entities[j].body.bumper;
            let body = &mut entities[index].body;
            if !body.fixed {
                body.vel = reflect_off_segment(body.vel, body.center(), pose, bumper);
                let jitter = tunables.line_jitter;
                if jitter > 0.0 {
                    body.vel.x += rng.random_range(-jitter..=jitter);
                    body.vel.y += rng.random_range(-jitter..=jitter);
                }
            }
            return Resolution::Reflected;
        }

        let (this, other) = pair_mut(entities, index, j);
        let points = this
            .as_disk()
            .zip(other.as_disk())
            .map(|(a, b)| u64::from(a.score) + u64::from(b.score));
        if let Some(score) = points {
            if this.body.id > other.body.id {
                let (va, vb) = elastic_exchange(&this.body, &other.body);
                this.body.vel = va;
                other.body.vel = vb;
                return Resolution::Exchanged { score };
            }
        }
    }

    let bounds = Vec2::new(tunables.width, tunables.height);
    let Entity { body, shape } = &mut entities[index];
    if let Shape::Disk(disk) = shape {
        bounce_off_edges(body, disk, bounds);
    }
    Resolution::Edge
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityId;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball(id: u32, center: Vec2, radius: f32, vel: Vec2) -> Entity {
        Entity::disk(
            EntityId(id),
            center - Vec2::splat(radius),
            radius * 2.0,
            vel,
            false,
            1.0,
            10,
            "white",
        )
    }

    fn still() -> Tunables {
        Tunables {
            line_jitter: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_touching_disks() {
        let entities = vec![
            ball(0, Vec2::new(100.0, 100.0), 10.0, Vec2::ZERO),
            ball(1, Vec2::new(120.0, 100.0), 10.0, Vec2::ZERO),
        ];
        // Gap of exactly zero counts as contact
        assert_eq!(detect(&entities, 0), Some(1));
        assert_eq!(detect(&entities, 1), Some(0));
    }

    #[test]
    fn test_detect_first_in_list_order() {
        let entities = vec![
            ball(0, Vec2::new(100.0, 100.0), 10.0, Vec2::ZERO),
            Entity::wall(EntityId(1), Vec2::new(0.0, 105.0), Vec2::new(200.0, 0.0), true, 1.0, "black"),
            ball(2, Vec2::new(115.0, 100.0), 10.0, Vec2::ZERO),
        ];
        assert_eq!(detect(&entities, 0), Some(1));
        assert_eq!(detect(&entities, 2), Some(0));
    }

    #[test]
    fn test_detect_segment_span_clipping() {
        let wall = Entity::wall(EntityId(1), Vec2::new(0.0, 100.0), Vec2::new(50.0, 0.0), true, 1.0, "black");
        // Close to the line but past the segment's end
        let entities = vec![ball(0, Vec2::new(80.0, 95.0), 10.0, Vec2::ZERO), wall.clone()];
        assert_eq!(detect(&entities, 0), None);
        // Within the span
        let entities = vec![ball(0, Vec2::new(30.0, 95.0), 10.0, Vec2::ZERO), wall];
        assert_eq!(detect(&entities, 0), Some(1));
    }

    #[test]
    fn test_detect_vertical_segment() {
        let wall = Entity::wall(EntityId(1), Vec2::new(100.0, 150.0), Vec2::new(0.0, 400.0), true, 1.0, "black");
        let entities = vec![ball(0, Vec2::new(105.3, 333.3), 10.0, Vec2::ZERO), wall];
        assert_eq!(detect(&entities, 0), Some(1));
    }

    #[test]
    fn test_wall_reflection_negates_normal_component() {
        let pose = Pose {
            origin: Vec2::new(0.0, 100.0),
            extent: Vec2::new(200.0, 0.0),
        };
        // Ball above a horizontal wall moving down and right
        let v = reflect_off_segment(Vec2::new(3.0, 4.0), Vec2::new(50.0, 92.0), pose, 1.0);
        assert!((v.x - 3.0).abs() < 1e-5);
        assert!((v.y + 4.0).abs() < 1e-5);

        // Same against a vertical wall
        let pose = Pose {
            origin: Vec2::new(100.0, 0.0),
            extent: Vec2::new(0.0, 300.0),
        };
        let v = reflect_off_segment(Vec2::new(-6.0, 2.0), Vec2::new(108.0, 150.0), pose, 1.0);
        assert!((v.x - 6.0).abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_bumper_scales_response() {
        let pose = Pose {
            origin: Vec2::new(0.0, 100.0),
            extent: Vec2::new(200.0, 0.0),
        };
        let v = reflect_off_segment(Vec2::new(0.0, 4.0), Vec2::new(50.0, 92.0), pose, 2.0);
        // Normal change doubled: 4 - 2*4*2 = -12
        assert!((v.y + 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_center_on_line_uses_segment_normal() {
        let pose = Pose {
            origin: Vec2::new(0.0, 100.0),
            extent: Vec2::new(200.0, 0.0),
        };
        let v = reflect_off_segment(Vec2::new(1.0, 5.0), Vec2::new(50.0, 100.0), pose, 1.0);
        assert!(v.is_finite());
        assert!((v.y + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_equal_mass_head_on_exchange() {
        let a = ball(0, Vec2::new(0.0, 0.0), 10.0, Vec2::new(5.0, 0.0));
        let b = ball(1, Vec2::new(20.0, 0.0), 10.0, Vec2::new(-5.0, 0.0));
        let (va, vb) = elastic_exchange(&a.body, &b.body);
        assert!((va - Vec2::new(-5.0, 0.0)).length() < 1e-5);
        assert!((vb - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_coincident_centers_do_not_fault() {
        let a = ball(0, Vec2::new(50.0, 50.0), 10.0, Vec2::new(1.0, 2.0));
        let b = ball(1, Vec2::new(50.0, 50.0), 10.0, Vec2::new(-3.0, 0.5));
        let (va, vb) = elastic_exchange(&a.body, &b.body);
        assert!(va.is_finite() && vb.is_finite());
    }

    #[test]
    fn test_fixed_bumper_keeps_still_and_boosts() {
        let bumper = Entity::disk(EntityId(5), Vec2::new(0.0, 0.0), 100.0, Vec2::ZERO, true, 2.0, 5, "red");
        // Ball coming straight down onto the bumper's top
        let ball = ball(0, Vec2::new(50.0, -20.0), 25.0, Vec2::new(0.0, 4.0));
        let (v_bumper, v_ball) = elastic_exchange(&bumper.body, &ball.body);
        assert_eq!(v_bumper, Vec2::ZERO);
        // 4 - 2 * 4 * 2 = -12
        assert!((v_ball.y + 12.0).abs() < 1e-3);
        assert!(v_ball.x.abs() < 1e-5);
    }

    #[test]
    fn test_resolve_pair_only_from_larger_id() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tunables = still();
        let mut entities = vec![
            ball(0, Vec2::new(300.0, 300.0), 10.0, Vec2::new(5.0, 0.0)),
            ball(1, Vec2::new(318.0, 300.0), 10.0, Vec2::new(-5.0, 0.0)),
        ];

        let res = resolve(&mut entities, 0, Some(1), &tunables, &mut rng);
        assert_eq!(res, Resolution::Edge);
        assert_eq!(entities[0].body.vel, Vec2::new(5.0, 0.0));
        assert_eq!(entities[1].body.vel, Vec2::new(-5.0, 0.0));

        let res = resolve(&mut entities, 1, Some(0), &tunables, &mut rng);
        assert_eq!(res, Resolution::Exchanged { score: 20 });
        assert!((entities[0].body.vel.x + 5.0).abs() < 1e-5);
        assert!((entities[1].body.vel.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_resolve_wall_with_jitter_stays_near_reflection() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tunables = Tunables::default();
        let mut entities = vec![
            ball(0, Vec2::new(50.0, 92.0), 10.0, Vec2::new(0.0, 4.0)),
            Entity::wall(EntityId(1), Vec2::new(0.0, 100.0), Vec2::new(200.0, 0.0), true, 1.0, "black"),
        ];
        let res = resolve(&mut entities, 0, Some(1), &tunables, &mut rng);
        assert_eq!(res, Resolution::Reflected);
        let v = entities[0].body.vel;
        assert!(v.x.abs() <= tunables.line_jitter);
        assert!((v.y + 4.0).abs() <= tunables.line_jitter);
    }

    #[test]
    fn test_edge_hysteresis() {
        let tunables = still();
        let bounds = Vec2::new(tunables.width, tunables.height);
        let mut entity = ball(0, Vec2::new(795.0, 400.0), 10.0, Vec2::new(3.0, 0.0));
        let Entity { body, shape } = &mut entity;
        let Shape::Disk(disk) = shape else { unreachable!() };

        bounce_off_edges(body, disk, bounds);
        assert_eq!(body.vel.x, -3.0);
        assert!(disk.wall_contact.x);
        assert!(!disk.wall_contact.y);

        // Still over the edge: flag clears instead of reversing again
        bounce_off_edges(body, disk, bounds);
        assert_eq!(body.vel.x, -3.0);
        assert!(!disk.wall_contact.x);
    }

    proptest! {
        #[test]
        fn prop_equal_mass_conserves_momentum(
            ax in -10.0f32..10.0, ay in -10.0f32..10.0,
            bx in -10.0f32..10.0, by in -10.0f32..10.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let a = ball(0, Vec2::ZERO, 10.0, Vec2::new(ax, ay));
            let offset = Vec2::new(angle.cos(), angle.sin()) * 19.0;
            let b = ball(1, offset, 10.0, Vec2::new(bx, by));
            let (va, vb) = elastic_exchange(&a.body, &b.body);
            let before = a.body.vel + b.body.vel;
            let after = va + vb;
            prop_assert!((before - after).length() < 1e-3);
            // Kinetic energy is conserved too
            let ke_before = a.body.vel.length_squared() + b.body.vel.length_squared();
            let ke_after = va.length_squared() + vb.length_squared();
            prop_assert!((ke_before - ke_after).abs() < 1e-2);
        }

        #[test]
        fn prop_axis_wall_reflection_keeps_tangent(
            vx in -15.0f32..15.0, vy in -15.0f32..15.0,
            x in 1.0f32..199.0, gap in 0.5f32..9.5,
        ) {
            let pose = Pose { origin: Vec2::new(0.0, 100.0), extent: Vec2::new(200.0, 0.0) };
            let v = reflect_off_segment(Vec2::new(vx, vy), Vec2::new(x, 100.0 - gap), pose, 1.0);
            prop_assert!((v.x - vx).abs() < 1e-4);
            prop_assert!((v.y + vy).abs() < 1e-4);
        }
    }
}
