//! Weapon hit detection: swept box volumes + per-activation hit ledger.
//!
//! Every tick while `attacking`, each socket pair (start/end of a blade)
//! becomes an oriented box `(width/2, width/2, length/2)` swept from the
//! start socket to the end socket. Overlapping hurtboxes are hits.
//!
//! **Ledger invariant:** a defender enters `ledger` once per activation and
//! is never reported again until `reset_ledger()` (AttackWindowEnd notify).

use bevy::math::bounding::{Aabb3d, BoundingSphere, IntersectsVolume};
use bevy::prelude::*;

use crate::config::TracerTuning;

/// Pair of weapon sockets in actor-local space.
///
/// `rotation` is the actor-local rotation of the reference socket. Without it
/// the box is aligned with the start → end direction.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct SocketPair {
    pub start: Vec3,
    pub end: Vec3,
    pub rotation: Option<Quat>,
}

impl SocketPair {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            rotation: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Blade held at chest height, pointing forward (-Z) from `reach_start` to `reach_end`.
    pub fn blade(lateral: f32, reach_start: f32, reach_end: f32) -> Self {
        Self::new(
            Vec3::new(lateral, 1.0, -reach_start),
            Vec3::new(lateral, 1.0, -reach_end),
        )
    }
}

/// Per-tick attack geometry (never stored).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackVolume {
    pub start: Vec3,
    pub end: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

/// One overlap reported by a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    pub entity: Entity,
    pub impact_point: Vec3,
}

/// Geometry query collaborator.
pub trait HitVolumeQuery {
    /// Sweep `volume` from its start to its end; report overlapping actors except `ignore`.
    fn sweep(&self, volume: &AttackVolume, ignore: Entity) -> Vec<SweepHit>;
}

/// Hurtbox snapshot used by [`HurtboxSweep`].
#[derive(Clone, Copy, Debug)]
pub struct HurtboxShape {
    pub entity: Entity,
    pub center: Vec3,
    pub radius: f32,
}

/// Sampled sweep of a box against hurtbox spheres (bevy bounding volumes).
pub struct HurtboxSweep<'a> {
    pub hurtboxes: &'a [HurtboxShape],
    pub samples: u32,
}

impl HitVolumeQuery for HurtboxSweep<'_> {
    fn sweep(&self, volume: &AttackVolume, ignore: Entity) -> Vec<SweepHit> {
        let mut hits: Vec<SweepHit> = Vec::new();
        let inverse = volume.rotation.inverse();
        let steps = self.samples.max(1);

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let box_center = volume.start.lerp(volume.end, t);
            let local_box = Aabb3d::new(Vec3::ZERO, volume.half_extents);

            for hurtbox in self.hurtboxes {
                if hurtbox.entity == ignore || hits.iter().any(|h| h.entity == hurtbox.entity) {
                    continue;
                }

                let local_center = inverse * (hurtbox.center - box_center);
                let sphere = BoundingSphere::new(local_center, hurtbox.radius);

                if local_box.intersects(&sphere) {
                    let local_impact = local_box.closest_point(local_center);
                    hits.push(SweepHit {
                        entity: hurtbox.entity,
                        impact_point: box_center + volume.rotation * Vec3::from(local_impact),
                    });
                }
            }
        }

        hits
    }
}

/// A new hit this tick (already deduplicated by the ledger).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    pub target: Entity,
    pub impact_point: Vec3,
}

#[derive(Component, Clone, Debug)]
pub struct HitVolumeTracer {
    pub sockets: Vec<SocketPair>,
    pub box_width: f32,
    pub sweep_samples: u32,
    /// Toggled by HitWindowOpen / HitWindowClose notifies
    pub attacking: bool,
    ledger: Vec<Entity>,
}

impl HitVolumeTracer {
    pub fn new(tuning: &TracerTuning, sockets: Vec<SocketPair>) -> Self {
        Self {
            sockets,
            box_width: tuning.box_width,
            sweep_samples: tuning.sweep_samples,
            attacking: false,
            ledger: Vec::new(),
        }
    }

    pub fn has_hit(&self, entity: Entity) -> bool {
        self.ledger.contains(&entity)
    }

    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    /// Clear the ledger (only on AttackWindowEnd, never on a timer).
    pub fn reset_ledger(&mut self) {
        self.ledger.clear();
    }

    /// World-space box for one socket pair of the actor at `transform`.
    pub fn build_volume(&self, pair: &SocketPair, transform: &Transform) -> AttackVolume {
        let start = transform.transform_point(pair.start);
        let end = transform.transform_point(pair.end);
        let length = start.distance(end);

        // Box local Z: reference socket, иначе вдоль клинка
        let rotation = match (pair.rotation, (end - start).try_normalize()) {
            (Some(reference), _) => transform.rotation * reference,
            (None, Some(direction)) => Quat::from_rotation_arc(Vec3::Z, direction),
            (None, None) => transform.rotation,
        };

        AttackVolume {
            start,
            end,
            half_extents: Vec3::new(self.box_width, self.box_width, length) / 2.0,
            rotation,
        }
    }

    /// Trace all sockets; return defenders hit for the first time in this activation.
    pub fn trace(
        &mut self,
        owner: Entity,
        transform: &Transform,
        query: &dyn HitVolumeQuery,
    ) -> Vec<TraceHit> {
        if !self.attacking {
            return Vec::new();
        }

        let mut new_hits = Vec::new();

        for pair in &self.sockets {
            let volume = self.build_volume(pair, transform);

            for hit in query.sweep(&volume, owner) {
                if hit.entity == owner || self.ledger.contains(&hit.entity) {
                    continue;
                }
                self.ledger.push(hit.entity);
                new_hits.push(TraceHit {
                    target: hit.entity,
                    impact_point: hit.impact_point,
                });
            }
        }

        new_hits
    }
}
