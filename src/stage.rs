use glam::{Mat4, UVec2, Vec2, Vec3};

use crate::deproject::deproject;
use crate::traits::SceneOracle;
use crate::types::{CameraView, EntityId, Observer, RayHit, TraceChannel};
use crate::view::CameraFrame;

/// Analytic collision shape for stage bodies.
#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Sphere { center: Vec3, radius: f32 },
    Box { min: Vec3, max: Vec3 },
}

impl Shape {
    pub fn center(&self) -> Vec3 {
        match *self {
            Shape::Sphere { center, .. } => center,
            Shape::Box { min, max } => (min + max) * 0.5,
        }
    }

    /// Nearest positive ray-intersection distance, or `None`.
    pub fn intersect(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        match *self {
            Shape::Sphere { center, radius } => {
                let oc = ray_origin - center;
                let a = ray_dir.dot(ray_dir);
                let half_b = oc.dot(ray_dir);
                let c = oc.dot(oc) - radius * radius;

                let discriminant = half_b * half_b - a * c;
                if discriminant < 0.0 {
                    return None;
                }

                let sqrt_d = discriminant.sqrt();
                let t = (-half_b - sqrt_d) / a;
                if t > 1e-4 {
                    Some(t)
                } else {
                    let t = (-half_b + sqrt_d) / a;
                    if t > 1e-4 {
                        Some(t)
                    } else {
                        None
                    }
                }
            }
            Shape::Box { min, max } => {
                const EPSILON: f32 = 1e-8;

                // Epsilon-clamped inverse direction avoids division by zero
                // for axis-aligned rays.
                let inv_dir = Vec3::new(
                    if ray_dir.x.abs() < EPSILON {
                        1.0 / EPSILON.copysign(ray_dir.x)
                    } else {
                        1.0 / ray_dir.x
                    },
                    if ray_dir.y.abs() < EPSILON {
                        1.0 / EPSILON.copysign(ray_dir.y)
                    } else {
                        1.0 / ray_dir.y
                    },
                    if ray_dir.z.abs() < EPSILON {
                        1.0 / EPSILON.copysign(ray_dir.z)
                    } else {
                        1.0 / ray_dir.z
                    },
                );

                let t_min = (min - ray_origin) * inv_dir;
                let t_max = (max - ray_origin) * inv_dir;

                let t1 = t_min.min(t_max);
                let t2 = t_min.max(t_max);

                let t_near = t1.x.max(t1.y).max(t1.z);
                let t_far = t2.x.min(t2.y).min(t2.z);

                if t_near > t_far || t_far < 0.0 {
                    return None;
                }

                if t_near < 1e-4 {
                    if t_far > 1e-3 {
                        Some(t_far)
                    } else {
                        None
                    }
                } else {
                    Some(t_near)
                }
            }
        }
    }
}

/// A rigid body living on the stage.
#[derive(Clone, Debug)]
pub struct Body {
    pub name: String,
    pub shape: Shape,
    pub color: [f32; 3],
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Whether a simulated rigid body exists. When false, velocity lookups
    /// at a point degrade to the coarse linear velocity.
    pub simulated: bool,
}

impl Body {
    pub fn fixed(name: &str, shape: Shape, color: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            shape,
            color,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            simulated: true,
        }
    }

    pub fn with_velocity(mut self, linear: Vec3, angular: Vec3) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    pub fn without_rigid_body(mut self) -> Self {
        self.simulated = false;
        self
    }
}

/// Free camera in yaw/pitch form.
#[derive(Copy, Clone, Debug)]
pub struct StageCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl StageCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            fov_y: std::f32::consts::FRAC_PI_3,
            near: 0.1,
            far: 10_000.0,
        }
    }

    /// Camera looking down +X from `position`.
    pub fn facing_x(position: Vec3) -> Self {
        Self::new(position, std::f32::consts::FRAC_PI_2, 0.0)
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    fn projection_matrix(&self, viewport: UVec2) -> Mat4 {
        let aspect = viewport.x as f32 / viewport.y as f32;
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }
}

/// Self-contained scene used by tests, benches and the demo binary: a set of
/// analytic bodies, a free camera and an observer entity carrying it.
///
/// Implements [`SceneOracle`], standing in for a live host engine. There is
/// never in-flight rendering work here, so the sync barrier is a no-op.
pub struct Stage {
    viewport: UVec2,
    pub camera: StageCamera,
    /// Linear velocity of the camera-carrying observer entity.
    pub observer_velocity: Vec3,
    bodies: Vec<Body>,
}

const OBSERVER_ID: EntityId = EntityId(0);

impl Stage {
    pub fn new(viewport: UVec2, camera: StageCamera) -> Self {
        Self {
            viewport,
            camera,
            observer_velocity: Vec3::ZERO,
            bodies: Vec::new(),
        }
    }

    /// Add a body and return its entity handle.
    pub fn add_body(&mut self, body: Body) -> EntityId {
        self.bodies.push(body);
        EntityId(self.bodies.len() as u64)
    }

    /// Entity handles of all bodies, in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &str)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (EntityId(i as u64 + 1), body.name.as_str()))
    }

    pub fn body_mut(&mut self, entity: EntityId) -> Option<&mut Body> {
        if entity == OBSERVER_ID {
            return None;
        }
        self.bodies.get_mut(entity.0 as usize - 1)
    }

    fn body(&self, entity: EntityId) -> Option<&Body> {
        if entity == OBSERVER_ID {
            return None;
        }
        self.bodies.get(entity.0 as usize - 1)
    }

    fn hits_along(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .bodies
            .iter()
            .enumerate()
            .filter_map(|(i, body)| {
                let t = body.shape.intersect(origin, direction)?;
                if t > max_distance {
                    return None;
                }
                Some(RayHit {
                    entity: EntityId(i as u64 + 1),
                    point: origin + direction * t,
                    distance: t,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl SceneOracle for Stage {
    fn sync_renderer(&self) {}

    fn viewport_size(&self) -> Option<UVec2> {
        Some(self.viewport)
    }

    fn camera_view(&self) -> Option<CameraView> {
        Some(CameraView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(self.viewport),
            viewport: self.viewport,
        })
    }

    fn observer(&self) -> Option<Observer> {
        Some(Observer {
            entity: OBSERVER_ID,
            position: self.camera.position,
            forward: self.camera.forward(),
        })
    }

    fn trace_single(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        _channel: TraceChannel,
    ) -> Option<RayHit> {
        self.hits_along(origin, direction, max_distance)
            .into_iter()
            .next()
    }

    fn trace_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        self.hits_along(origin, direction, max_distance)
    }

    fn body_velocity_at(&self, entity: EntityId, point: Vec3) -> Option<Vec3> {
        if entity == OBSERVER_ID {
            return Some(self.observer_velocity);
        }
        let body = self.body(entity)?;
        if !body.simulated {
            return None;
        }
        let arm = point - body.shape.center();
        Some(body.linear_velocity + body.angular_velocity.cross(arm))
    }

    fn linear_velocity(&self, entity: EntityId) -> Option<Vec3> {
        if entity == OBSERVER_ID {
            return Some(self.observer_velocity);
        }
        self.body(entity).map(|body| body.linear_velocity)
    }

    /// Ray-cast a flat-shaded frame of body colors over a black background.
    fn read_frame(&self) -> Option<Vec<[u8; 3]>> {
        let frame = CameraFrame::from_view(&self.camera_view()?);
        let mut pixels = Vec::with_capacity((self.viewport.x * self.viewport.y) as usize);
        for y in 0..self.viewport.y {
            for x in 0..self.viewport.x {
                let ray = deproject(Vec2::new(x as f32, y as f32), &frame);
                let color = self
                    .hits_along(ray.origin, ray.direction, self.camera.far)
                    .first()
                    .and_then(|hit| self.body(hit.entity))
                    .map_or([0, 0, 0], |body| {
                        [
                            (body.color[0].clamp(0.0, 1.0) * 255.0) as u8,
                            (body.color[1].clamp(0.0, 1.0) * 255.0) as u8,
                            (body.color[2].clamp(0.0, 1.0) * 255.0) as u8,
                        ]
                    });
                pixels.push(color);
            }
        }
        Some(pixels)
    }
}
