//! Proximity probes — directional distance queries against the scene.
//!
//! The scene itself (static geometry, other agents) belongs to external
//! collaborators; the controller only sees the [`ProbeField`] trait and the
//! closed [`ObstacleKind`] classification it returns.  Five rays are cast
//! per step: one straight ahead, two offset to the sides, and two angled
//! outward.  Ray length grows with speed and ray angle grows with steering
//! input, both with fixed floors, so a fast or hard-turning agent looks
//! further and wider.

use glam::Vec3;

use av_core::Pose;

use crate::tuning::DriveTuning;

// ── Obstacle classification ───────────────────────────────────────────────────

/// What a probe ray hit.
///
/// A closed set, dispatched by exhaustive `match` — adding a variant is a
/// compile-time ripple through every consumer by design of the type system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Immovable scenery: walls, parked wrecks, street furniture.
    Static,
    /// Another simulated agent.
    DynamicAgent,
    /// Hit something the driving logic must not react to (foliage,
    /// overhanging signage).
    Ignorable,
}

/// A single probe intersection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProbeHit {
    pub kind: ObstacleKind,
    /// Distance from the ray origin to the intersection.
    pub distance: f32,
    /// Surface normal at the intersection, unit length.
    pub normal: Vec3,
}

/// The scene query interface consumed by the controller.
///
/// `cast` returns the nearest intersection along the ray within `max_dist`,
/// or `None`.  Implementations must be synchronous and bounded-cost: the
/// scheduler's budget accounting assumes probe queries never block.
pub trait ProbeField {
    fn cast(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<ProbeHit>;
}

/// A [`ProbeField`] with nothing in it — every cast misses.
///
/// Useful as a placeholder in tests and for populations driving on an empty
/// map.
pub struct NullField;

impl ProbeField for NullField {
    fn cast(&self, _origin: Vec3, _dir: Vec3, _max_dist: f32) -> Option<ProbeHit> {
        None
    }
}

// ── Probe rig ─────────────────────────────────────────────────────────────────

/// The five probe directions, in evaluation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProbeSlot {
    Center,
    SideRight,
    SideLeft,
    AngledLeft,
    AngledRight,
}

impl ProbeSlot {
    pub const ALL: [ProbeSlot; 5] = [
        ProbeSlot::Center,
        ProbeSlot::SideRight,
        ProbeSlot::SideLeft,
        ProbeSlot::AngledLeft,
        ProbeSlot::AngledRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ProbeSlot::Center      => 0,
            ProbeSlot::SideRight   => 1,
            ProbeSlot::SideLeft    => 2,
            ProbeSlot::AngledLeft  => 3,
            ProbeSlot::AngledRight => 4,
        }
    }
}

/// One ray of the rig, in world space.
#[derive(Copy, Clone, Debug)]
pub struct ProbeRay {
    pub slot: ProbeSlot,
    pub origin: Vec3,
    pub dir: Vec3,
    pub length: f32,
}

/// Build the five rays for a pose at the given speed and steering input.
///
/// All rays start from a forward-offset origin (roughly the front bumper).
/// The side rays shift that origin laterally; the angled rays rotate the
/// direction outward by the steering-scaled angle.
pub fn probe_rays(pose: &Pose, speed: f32, steer: f32, tuning: &DriveTuning) -> [ProbeRay; 5] {
    let forward = pose.forward();
    let right = pose.right();
    let origin = pose.position + forward * tuning.probe_forward_offset;

    let length = tuning.min_probe_length.max(speed.abs() * tuning.probe_seconds);
    let angle = tuning.min_probe_angle.max(steer.abs() * tuning.probe_angle_gain);

    // Heading increases toward the right vector, so "angled left" subtracts.
    let dir_at = |yaw: f32| Vec3::new(yaw.sin(), 0.0, yaw.cos());

    [
        ProbeRay {
            slot: ProbeSlot::Center,
            origin,
            dir: forward,
            length,
        },
        ProbeRay {
            slot: ProbeSlot::SideRight,
            origin: origin + right * tuning.probe_side_offset,
            dir: forward,
            length,
        },
        ProbeRay {
            slot: ProbeSlot::SideLeft,
            origin: origin - right * tuning.probe_side_offset,
            dir: forward,
            length,
        },
        ProbeRay {
            slot: ProbeSlot::AngledLeft,
            origin,
            dir: dir_at(pose.heading - angle),
            length,
        },
        ProbeRay {
            slot: ProbeSlot::AngledRight,
            origin,
            dir: dir_at(pose.heading + angle),
            length,
        },
    ]
}

/// The result of casting all five rays.
#[derive(Clone, Debug, Default)]
pub struct ProbeReadings {
    hits: [Option<ProbeHit>; 5],
}

impl ProbeReadings {
    pub fn none() -> Self {
        Self::default()
    }

    /// Reading for one slot.
    #[inline]
    pub fn get(&self, slot: ProbeSlot) -> Option<&ProbeHit> {
        self.hits[slot.index()].as_ref()
    }

    pub fn set(&mut self, slot: ProbeSlot, hit: ProbeHit) {
        self.hits[slot.index()] = Some(hit);
    }

    /// Iterate `(slot, hit)` pairs in evaluation order, skipping misses.
    pub fn iter(&self) -> impl Iterator<Item = (ProbeSlot, &ProbeHit)> + '_ {
        ProbeSlot::ALL
            .iter()
            .filter_map(|&slot| self.hits[slot.index()].as_ref().map(|h| (slot, h)))
    }

    pub fn is_clear(&self) -> bool {
        self.hits.iter().all(Option::is_none)
    }
}

/// Cast the full rig against `field` and collect the readings.
pub fn cast_probes(
    field: &dyn ProbeField,
    pose: &Pose,
    speed: f32,
    steer: f32,
    tuning: &DriveTuning,
) -> ProbeReadings {
    let mut readings = ProbeReadings::none();
    for ray in probe_rays(pose, speed, steer, tuning) {
        if let Some(hit) = field.cast(ray.origin, ray.dir, ray.length) {
            readings.set(ray.slot, hit);
        }
    }
    readings
}
