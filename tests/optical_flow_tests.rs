use glam::{UVec2, Vec3};
use sensor_capture::capture::CaptureEngine;
use sensor_capture::flow::encode_flow;
use sensor_capture::stage::{Body, Shape, Stage, StageCamera};
use sensor_capture::traits::SceneOracle;
use sensor_capture::types::{CameraView, EntityId, Observer, RayHit, TraceChannel};

const W: u32 = 64;
const H: u32 = 48;
const SIZE: UVec2 = UVec2::new(W, H);
const CENTER: usize = (H as usize / 2) * W as usize + W as usize / 2;
const MAX_FLOW: f32 = 100.0;

fn empty_stage() -> Stage {
    Stage::new(SIZE, StageCamera::facing_x(Vec3::ZERO))
}

fn wall(x: f32) -> Body {
    Body::fixed(
        "wall",
        Shape::Box {
            min: Vec3::new(x, -200.0, -200.0),
            max: Vec3::new(x + 1.0, 200.0, 200.0),
        },
        [0.5, 0.5, 0.5],
    )
}

/// Stage whose bodies expose no velocity state at all, neither a rigid body
/// nor a coarse linear velocity. The observer keeps its own velocity.
struct VelocitylessScene(Stage);

impl VelocitylessScene {
    fn is_observer(&self, entity: EntityId) -> bool {
        self.0.observer().map(|o| o.entity) == Some(entity)
    }
}

impl SceneOracle for VelocitylessScene {
    fn sync_renderer(&self) {
        self.0.sync_renderer()
    }

    fn viewport_size(&self) -> Option<UVec2> {
        self.0.viewport_size()
    }

    fn camera_view(&self) -> Option<CameraView> {
        self.0.camera_view()
    }

    fn observer(&self) -> Option<Observer> {
        self.0.observer()
    }

    fn trace_single(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        channel: TraceChannel,
    ) -> Option<RayHit> {
        self.0.trace_single(origin, direction, max_distance, channel)
    }

    fn trace_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        self.0.trace_all(origin, direction, max_distance)
    }

    fn body_velocity_at(&self, entity: EntityId, point: Vec3) -> Option<Vec3> {
        if self.is_observer(entity) {
            self.0.body_velocity_at(entity, point)
        } else {
            None
        }
    }

    fn linear_velocity(&self, entity: EntityId) -> Option<Vec3> {
        if self.is_observer(entity) {
            self.0.linear_velocity(entity)
        } else {
            None
        }
    }

    fn read_frame(&self) -> Option<Vec<[u8; 3]>> {
        self.0.read_frame()
    }
}

fn capture<O: SceneOracle>(stage: &O) -> (Vec<f32>, Vec<f32>) {
    let engine = CaptureEngine::new(stage);
    let samples = (W * H) as usize;
    let mut flow = vec![0.0f32; samples * 2];
    let mut rgb = vec![0.0f32; samples * 3];
    engine
        .capture_optical_flow(SIZE, 1, MAX_FLOW, &mut flow, &mut rgb, false)
        .expect("flow capture should succeed");
    (flow, rgb)
}

fn center_flow(flow: &[f32]) -> (f32, f32) {
    (flow[CENTER * 2], flow[CENTER * 2 + 1])
}

#[cfg(test)]
mod flow_capture_tests {
    use super::*;

    #[test]
    fn test_misses_produce_zero_flow_and_white_rgb() {
        let stage = empty_stage();
        let (flow, rgb) = capture(&stage);

        assert!(flow.iter().all(|v| *v == 0.0), "no hit means zero flow");
        let white = encode_flow(glam::Vec2::ZERO, MAX_FLOW);
        for sample in rgb.chunks_exact(3) {
            for i in 0..3 {
                assert!(
                    (sample[i] - white[i]).abs() < 1e-6,
                    "zero flow encodes as white"
                );
            }
        }
    }

    #[test]
    fn test_target_moving_up_flows_toward_the_image_top() {
        let mut stage = empty_stage();
        stage.add_body(wall(10.0).with_velocity(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO));
        let (flow, rgb) = capture(&stage);

        let (fx, fy) = center_flow(&flow);
        assert!(
            fy < -1e-3,
            "world up is image up, so pixel flow y must be negative, got {}",
            fy
        );
        assert!(fx.abs() < 1e-3, "no lateral motion, flow x should be ~0");

        let expected = encode_flow(glam::Vec2::new(fx, fy), MAX_FLOW);
        for i in 0..3 {
            assert!(
                (rgb[CENTER * 3 + i] - expected[i]).abs() < 1e-5,
                "rgb buffer must agree with the encoder"
            );
        }
    }

    #[test]
    fn test_flow_scales_inversely_with_target_distance() {
        let velocity = Vec3::new(0.0, 5.0, 0.0);

        let mut near = empty_stage();
        near.add_body(wall(10.0).with_velocity(velocity, Vec3::ZERO));
        let mut far = empty_stage();
        far.add_body(wall(20.0).with_velocity(velocity, Vec3::ZERO));

        let (near_flow, _) = capture(&near);
        let (far_flow, _) = capture(&far);
        let (_, near_fy) = center_flow(&near_flow);
        let (_, far_fy) = center_flow(&far_flow);

        // Perspective scaling: same world velocity, twice the forward
        // distance, half the pixel flow.
        let ratio = near_fy / far_fy;
        assert!(
            (ratio - 2.0).abs() < 0.1,
            "doubling distance should halve flow, ratio {}",
            ratio
        );
    }

    #[test]
    fn test_observer_lateral_motion_flows_opposite_to_target_motion() {
        let mut target_moves = empty_stage();
        target_moves.add_body(wall(10.0).with_velocity(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO));

        let mut observer_moves = empty_stage();
        observer_moves.add_body(wall(10.0));
        observer_moves.observer_velocity = Vec3::new(0.0, 5.0, 0.0);

        let (target_flow, _) = capture(&target_moves);
        let (observer_flow, _) = capture(&observer_moves);
        let (_, target_fy) = center_flow(&target_flow);
        let (_, observer_fy) = center_flow(&observer_flow);

        assert!(
            (target_fy + observer_fy).abs() < 1e-3,
            "relative velocity flips sign with the moving party: {} vs {}",
            target_fy,
            observer_fy
        );
    }

    #[test]
    fn test_forward_observer_motion_produces_no_flow() {
        // The component of relative velocity along the viewing axis is
        // removed before projection, so pure approach yields zero flow.
        let mut stage = empty_stage();
        stage.add_body(wall(10.0));
        stage.observer_velocity = Vec3::new(5.0, 0.0, 0.0);

        let (flow, _) = capture(&stage);
        let (fx, fy) = center_flow(&flow);
        assert!(fx.abs() < 1e-3 && fy.abs() < 1e-3, "({}, {})", fx, fy);
    }

    #[test]
    fn test_spinning_body_contributes_rotational_velocity() {
        let mut stage = empty_stage();
        stage.add_body(
            Body::fixed(
                "spinner",
                Shape::Sphere {
                    center: Vec3::new(10.0, 0.0, 0.0),
                    radius: 2.0,
                },
                [0.5, 0.5, 0.5],
            )
            .with_velocity(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)),
        );

        let (flow, _) = capture(&stage);
        let (_, fy) = center_flow(&flow);
        // Surface point facing the camera moves at angular x arm; the body
        // itself has zero linear velocity.
        assert!(
            fy.abs() > 1e-3,
            "rigid-body rotation must show up in the flow, got {}",
            fy
        );
    }

    #[test]
    fn test_hit_with_unavailable_velocity_reports_zero_flow() {
        // The hit entity has no obtainable velocity at all; flow at those
        // pixels must be zero even while the observer itself is moving.
        let mut stage = empty_stage();
        stage.add_body(wall(10.0));
        stage.observer_velocity = Vec3::new(0.0, 5.0, 0.0);
        let scene = VelocitylessScene(stage);

        let (flow, rgb) = capture(&scene);
        let (fx, fy) = center_flow(&flow);
        assert_eq!(
            (fx, fy),
            (0.0, 0.0),
            "unavailable target velocity must zero the flow, not just the target term"
        );

        let white = encode_flow(glam::Vec2::ZERO, MAX_FLOW);
        for i in 0..3 {
            assert!((rgb[CENTER * 3 + i] - white[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_body_without_rigid_body_falls_back_to_coarse_velocity() {
        let mut stage = empty_stage();
        stage.add_body(
            wall(10.0)
                .with_velocity(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO)
                .without_rigid_body(),
        );

        let (flow, _) = capture(&stage);
        let (_, fy) = center_flow(&flow);
        assert!(
            fy < -1e-3,
            "coarse linear velocity still drives flow, got {}",
            fy
        );
    }
}
