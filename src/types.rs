use glam::{Mat4, UVec2, Vec3};

/// Opaque engine-assigned entity identity.
///
/// Only good for equality against handles the caller already holds; the
/// engine never dereferences scene entities through it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Collision category a ray query runs against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceChannel {
    /// Camera-visible geometry; used by segmentation, flow and depth.
    Visibility,
    /// Default channel with blocking disabled; used by overlap traces.
    Default,
}

/// World-space ray derived from a pixel coordinate.
#[derive(Copy, Clone, Debug)]
pub struct PixelRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PixelRay {
    /// A ray is usable if it is finite and its direction has nonzero length.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite()
            && self.direction.is_finite()
            && self.direction.length_squared() > 1e-12
    }
}

/// One ray intersection.
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    pub entity: EntityId,
    pub point: Vec3,
    pub distance: f32,
}

/// Raw camera state handed over by the scene oracle.
///
/// `projection` is expected in the 0..1 NDC depth convention; host adapters
/// convert before handing over.
#[derive(Copy, Clone, Debug)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: UVec2,
}

/// The camera-carrying entity, as resolved by the oracle.
#[derive(Copy, Clone, Debug)]
pub struct Observer {
    pub entity: EntityId,
    pub position: Vec3,
    /// Normalized world-space forward axis.
    pub forward: Vec3,
}

/// Result of a velocity lookup at a world point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Velocity {
    /// Rigid-body velocity at the point: linear + angular contribution.
    Precise(Vec3),
    /// Entity linear velocity only; rotation is not accounted for.
    Coarse(Vec3),
    Unavailable,
}

impl Velocity {
    /// The vector if any velocity was obtainable, precise or not.
    pub fn vector(&self) -> Option<Vec3> {
        match *self {
            Velocity::Precise(v) | Velocity::Coarse(v) => Some(v),
            Velocity::Unavailable => None,
        }
    }
}
