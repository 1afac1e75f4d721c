//! Per-tick agent proximity index.
//!
//! Other agents are obstacles too.  Once per tick the sim snapshots every
//! agent's ground-plane position into an R-tree; during the rotation each
//! probe cast consults both the external static scene and this snapshot.
//! The snapshot holds copies, not references, so the rotation can mutate
//! agents freely — probes see everyone's position as of tick start, which
//! also keeps results independent of visit order.

use glam::Vec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use av_agent::{AgentArena, AgentId};
use av_control::{ObstacleKind, ProbeField, ProbeHit};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct BodyEntry {
    point: [f32; 2], // [x, z]
    id: AgentId,
}

impl RTreeObject for BodyEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for BodyEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dz = self.point[1] - point[1];
        dx * dx + dz * dz
    }
}

// ── AgentBodies ───────────────────────────────────────────────────────────────

/// Tick-start snapshot of all agent positions, as circles of `radius` on the
/// ground plane.
pub struct AgentBodies {
    tree: RTree<BodyEntry>,
    radius: f32,
}

impl AgentBodies {
    /// Snapshot the current population.  O(N log N).
    pub fn snapshot(arena: &AgentArena, radius: f32) -> Self {
        let entries: Vec<BodyEntry> = arena
            .iter()
            .map(|(id, agent)| BodyEntry {
                point: [agent.pose.position.x, agent.pose.position.z],
                id,
            })
            .collect();
        Self { tree: RTree::bulk_load(entries), radius }
    }

    /// Nearest agent-body intersection along the ray, excluding `exclude`
    /// (the probing agent itself).
    ///
    /// 2-D ray-circle test on the ground plane; a ray starting inside a
    /// body reports distance 0.
    pub fn cast(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        exclude: AgentId,
    ) -> Option<ProbeHit> {
        let o = [origin.x, origin.z];
        let d = [dir.x, dir.z];
        let d_len = (d[0] * d[0] + d[1] * d[1]).sqrt();
        if d_len < 1e-6 {
            return None;
        }
        let d = [d[0] / d_len, d[1] / d_len];

        // Candidates within reach of the ray's start or body radius.
        let reach = max_dist + self.radius;
        let mut best: Option<(f32, [f32; 2])> = None;

        for entry in self.tree.locate_within_distance(o, reach * reach) {
            if entry.id == exclude {
                continue;
            }
            let to = [entry.point[0] - o[0], entry.point[1] - o[1]];
            let proj = to[0] * d[0] + to[1] * d[1];
            let closest_sq = (to[0] * to[0] + to[1] * to[1]) - proj * proj;
            let r_sq = self.radius * self.radius;
            if closest_sq > r_sq {
                continue; // ray passes beside the body
            }
            let half_chord = (r_sq - closest_sq).sqrt();
            let t = proj - half_chord;
            // Behind the origin entirely?
            if t + 2.0 * half_chord < 0.0 {
                continue;
            }
            let t = t.max(0.0);
            if t > max_dist {
                continue;
            }
            if best.is_none_or(|(bt, _)| t < bt) {
                best = Some((t, entry.point));
            }
        }

        best.map(|(t, center)| {
            let hit_point = Vec3::new(o[0] + d[0] * t, origin.y, o[1] + d[1] * t);
            let away = hit_point - Vec3::new(center[0], origin.y, center[1]);
            let normal = if away.length_squared() > 1e-8 {
                away.normalize()
            } else {
                -dir
            };
            ProbeHit {
                kind: ObstacleKind::DynamicAgent,
                distance: t,
                normal,
            }
        })
    }
}

// ── CompositeField ────────────────────────────────────────────────────────────

/// The field one agent's probes actually see: the external static scene
/// layered with the agent-body snapshot, nearest hit wins.
pub struct CompositeField<'a> {
    pub statics: &'a dyn ProbeField,
    pub bodies: &'a AgentBodies,
    /// The probing agent, excluded from body hits.
    pub exclude: AgentId,
}

impl ProbeField for CompositeField<'_> {
    fn cast(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<ProbeHit> {
        let static_hit = self.statics.cast(origin, dir, max_dist);
        let body_hit = self.bodies.cast(origin, dir, max_dist, self.exclude);
        match (static_hit, body_hit) {
            (Some(s), Some(b)) => Some(if s.distance <= b.distance { s } else { b }),
            (Some(s), None) => Some(s),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }
}
