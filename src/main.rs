// Demo driver: build or load a stage, run every capture kind once and print
// summary statistics.

use anyhow::Result;
use clap::Parser;
use glam::UVec2;

use sensor_capture::capture::CaptureEngine;
use sensor_capture::math::SampleGrid;
use sensor_capture::scenes::{create_default_stage, load_stage_file};
use sensor_capture::traits::SceneOracle;

#[derive(Parser, Debug, Clone)]
#[command(name = "sensor-capture")]
#[command(about = "Per-pixel sensor capture demo", long_about = None)]
struct Cli {
    /// JSON stage description; omit to use the built-in default stage
    #[arg(long)]
    scene: Option<std::path::PathBuf>,

    /// Viewport width for the default stage
    #[arg(long, default_value = "96")]
    width: u32,

    /// Viewport height for the default stage
    #[arg(long, default_value = "72")]
    height: u32,

    /// Pixel stride between samples
    #[arg(long, default_value = "1")]
    stride: u32,

    /// Flow magnitude at which the RGB visualization saturates
    #[arg(long, default_value = "10.0")]
    max_flow: f32,

    /// Log per-sample values at trace level
    #[arg(long, default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let stage = match &cli.scene {
        Some(path) => load_stage_file(path)?,
        None => create_default_stage(UVec2::new(cli.width, cli.height)),
    };
    let size = stage
        .viewport_size()
        .ok_or_else(|| anyhow::anyhow!("stage has no viewport"))?;
    let tracked: Vec<_> = stage.entities().map(|(id, _)| id).collect();
    let names: Vec<_> = stage.entities().map(|(_, name)| name.to_string()).collect();

    let engine = CaptureEngine::new(&stage);
    let grid = SampleGrid::new(size.x, size.y, cli.stride);
    println!(
        "Capturing {}x{} at stride {} ({} samples, {} tracked entities)",
        size.x,
        size.y,
        cli.stride,
        grid.len(),
        tracked.len()
    );

    let mut frame = vec![0.0f32; (size.x * size.y) as usize * 3];
    engine.capture_frame(size, &mut frame)?;
    let lit = frame.iter().filter(|v| **v > 0.0).count();
    println!("screenshot: {} of {} channel values non-zero", lit, frame.len());

    let mut seg = vec![0i32; grid.len()];
    engine.capture_segmentation(size, cli.stride, &tracked, &mut seg, cli.verbose)?;
    for (i, name) in names.iter().enumerate() {
        let covered = seg.iter().filter(|v| **v == i as i32 + 1).count();
        println!("segmentation: {:12} {} samples", name, covered);
    }

    let mut masks = vec![0u8; grid.len() * tracked.len()];
    engine.capture_masks(size, cli.stride, &tracked, &mut masks, cli.verbose)?;
    for (i, name) in names.iter().enumerate() {
        let present: usize = masks
            .chunks_exact(tracked.len())
            .map(|sample| sample[i] as usize)
            .sum();
        println!("masks:        {:12} {} samples (occluded included)", name, present);
    }

    let mut flow = vec![0.0f32; grid.len() * 2];
    let mut flow_rgb = vec![0.0f32; grid.len() * 3];
    engine.capture_optical_flow(
        size,
        cli.stride,
        cli.max_flow,
        &mut flow,
        &mut flow_rgb,
        cli.verbose,
    )?;
    let peak = flow
        .chunks_exact(2)
        .map(|v| (v[0] * v[0] + v[1] * v[1]).sqrt())
        .fold(0.0f32, f32::max);
    println!("optical flow: peak magnitude {:.4} px/s", peak);

    let mut depth = vec![0.0f32; grid.len()];
    engine.capture_depth(size, cli.stride, &mut depth, cli.verbose)?;
    let hits = depth.iter().filter(|d| **d > 0.0).count();
    let mean = if hits > 0 {
        depth.iter().sum::<f32>() / hits as f32
    } else {
        0.0
    };
    println!("depth: {} hit samples, mean forward distance {:.2}", hits, mean);

    Ok(())
}
