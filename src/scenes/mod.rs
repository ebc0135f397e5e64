//! Canned stages and JSON stage descriptions for the demo binary and tests.

use std::path::Path;

use anyhow::{Context, Result};
use glam::{UVec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::stage::{Body, Shape, Stage, StageCamera};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere { center: [f32; 3], radius: f32 },
    Box { min: [f32; 3], max: [f32; 3] },
}

impl ShapeDescription {
    fn build(&self) -> Shape {
        match *self {
            ShapeDescription::Sphere { center, radius } => Shape::Sphere {
                center: Vec3::from_array(center),
                radius,
            },
            ShapeDescription::Box { min, max } => Shape::Box {
                min: Vec3::from_array(min),
                max: Vec3::from_array(max),
            },
        }
    }
}

fn default_simulated() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDescription {
    pub name: String,
    pub shape: ShapeDescription,
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub linear_velocity: [f32; 3],
    #[serde(default)]
    pub angular_velocity: [f32; 3],
    #[serde(default = "default_simulated")]
    pub simulated: bool,
}

fn default_color() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDescription {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDescription {
    pub viewport: [u32; 2],
    pub camera: CameraDescription,
    #[serde(default)]
    pub observer_velocity: [f32; 3],
    pub bodies: Vec<BodyDescription>,
}

impl StageDescription {
    pub fn build(&self) -> Stage {
        let camera = StageCamera::new(
            Vec3::from_array(self.camera.position),
            self.camera.yaw,
            self.camera.pitch,
        );
        let mut stage = Stage::new(UVec2::new(self.viewport[0], self.viewport[1]), camera);
        stage.observer_velocity = Vec3::from_array(self.observer_velocity);
        for body in &self.bodies {
            let mut built = Body::fixed(&body.name, body.shape.build(), body.color).with_velocity(
                Vec3::from_array(body.linear_velocity),
                Vec3::from_array(body.angular_velocity),
            );
            built.simulated = body.simulated;
            stage.add_body(built);
        }
        stage
    }
}

/// Load a stage description from a JSON file.
pub fn load_stage_file(path: impl AsRef<Path>) -> Result<Stage> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .context(format!("Failed to read stage file: {:?}", path))?;
    let description: StageDescription = serde_json::from_str(&text)
        .context(format!("Failed to parse stage file: {:?}", path))?;
    Ok(description.build())
}

/// Small default stage: a ground slab, a moving sphere and a wall behind it.
pub fn create_default_stage(viewport: UVec2) -> Stage {
    let mut stage = Stage::new(viewport, StageCamera::facing_x(Vec3::new(0.0, 2.0, 0.0)));
    stage.add_body(Body::fixed(
        "ground",
        Shape::Box {
            min: Vec3::new(-50.0, -1.0, -50.0),
            max: Vec3::new(50.0, 0.0, 50.0),
        },
        [0.3, 0.3, 0.3],
    ));
    stage.add_body(
        Body::fixed(
            "ball",
            Shape::Sphere {
                center: Vec3::new(12.0, 2.0, 0.0),
                radius: 1.5,
            },
            [0.9, 0.2, 0.2],
        )
        .with_velocity(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO),
    );
    stage.add_body(Body::fixed(
        "wall",
        Shape::Box {
            min: Vec3::new(30.0, 0.0, -20.0),
            max: Vec3::new(31.0, 10.0, 20.0),
        },
        [0.2, 0.4, 0.8],
    ));
    stage
}
