use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{UVec2, Vec2};

use sensor_capture::capture::CaptureEngine;
use sensor_capture::deproject::{deproject, pixel_screen_jacobian};
use sensor_capture::math::SampleGrid;
use sensor_capture::scenes::create_default_stage;
use sensor_capture::view::resolve_view;

fn bench_deprojection(c: &mut Criterion) {
    let stage = create_default_stage(UVec2::new(320, 240));
    let frame = resolve_view(&stage).expect("stage camera should resolve");

    c.bench_function("deproject_pixel", |b| {
        b.iter(|| {
            let ray = deproject(black_box(Vec2::new(137.0, 92.0)), &frame);
            black_box(ray)
        })
    });

    c.bench_function("pixel_screen_jacobian", |b| {
        b.iter(|| {
            let jx = pixel_screen_jacobian(black_box(Vec2::new(137.0, 92.0)), 0, &frame);
            black_box(jx)
        })
    });
}

fn bench_capture_kinds(c: &mut Criterion) {
    let size = UVec2::new(320, 240);
    let stride = 4;
    let stage = create_default_stage(size);
    let engine = CaptureEngine::new(&stage);
    let grid = SampleGrid::new(size.x, size.y, stride);

    c.bench_function("capture_depth_320x240_stride4", |b| {
        let mut depth = vec![0.0f32; grid.len()];
        b.iter(|| {
            engine
                .capture_depth(size, stride, &mut depth, false)
                .expect("capture should succeed");
            black_box(depth[0])
        })
    });

    c.bench_function("capture_optical_flow_320x240_stride4", |b| {
        let mut flow = vec![0.0f32; grid.len() * 2];
        let mut rgb = vec![0.0f32; grid.len() * 3];
        b.iter(|| {
            engine
                .capture_optical_flow(size, stride, 10.0, &mut flow, &mut rgb, false)
                .expect("capture should succeed");
            black_box(flow[0])
        })
    });
}

criterion_group!(benches, bench_deprojection, bench_capture_kinds);
criterion_main!(benches);
