use glam::Vec3;

use crate::traits::SceneOracle;
use crate::types::{EntityId, Velocity};

/// Velocity of `entity` at a world point.
///
/// Prefers the simulated rigid body (linear + rotational contribution at the
/// point); entities without one fall back to their coarse linear velocity,
/// logged as a degraded-precision notice. `Unavailable` means the caller
/// must treat flow at that pixel as zero.
pub fn resolve_velocity<O: SceneOracle>(oracle: &O, entity: EntityId, point: Vec3) -> Velocity {
    if let Some(v) = oracle.body_velocity_at(entity, point) {
        return Velocity::Precise(v);
    }
    match oracle.linear_velocity(entity) {
        Some(v) => {
            log::warn!(
                "entity {:?} has no simulated body; using coarse linear velocity",
                entity
            );
            Velocity::Coarse(v)
        }
        None => Velocity::Unavailable,
    }
}
