use criterion::{criterion_group, criterion_main, Criterion};

use mazecanvas::rendering::paint::PaintRecorder;
use mazecanvas::{Bounds, MazeElement, MazeRenderer};

/// A serpentine maze over a `rows` x `cols` grid: every row is carved left to
/// right, joined to the next row at alternating ends. The route walks it all.
fn serpentine(rows: u32, cols: u32) -> (String, String, String) {
    let mut path = Vec::new();
    for r in 0..rows {
        let row: Vec<u32> = if r % 2 == 0 { (0..cols).collect() } else { (0..cols).rev().collect() };
        for c in row {
            path.push([r, c]);
        }
    }
    let passages: Vec<_> = path.windows(2).map(|w| [w[0], w[1]]).collect();
    let config = serde_json::json!({ "size": { "rows": rows, "cols": cols } });
    (
        config.to_string(),
        serde_json::to_string(&passages).unwrap(),
        serde_json::to_string(&path).unwrap(),
    )
}

fn surface<C: mazecanvas::Context2d + Default>(size: f64, maze: &(String, String, String)) -> MazeElement<C> {
    MazeElement::canvas("bench", Bounds::new(size, size))
        .with_attribute("data-config", maze.0.as_str())
        .with_attribute("data-passages", maze.1.as_str())
        .with_attribute("data-route", maze.2.as_str())
}

fn bench_raster_pass(c: &mut Criterion) {
    let maze = serpentine(20, 20);
    let mut renderer = MazeRenderer::default();
    let mut surfaces: Vec<MazeElement> = vec![surface(400.0, &maze)];

    c.bench_function("raster_pass_20x20", |b| {
        b.iter(|| renderer.render(&mut surfaces))
    });
}

fn bench_recorded_pass(c: &mut Criterion) {
    let maze = serpentine(50, 50);
    let mut renderer = MazeRenderer::default();

    c.bench_function("recorded_pass_50x50", |b| {
        b.iter(|| {
            let mut surfaces: Vec<MazeElement<PaintRecorder>> = vec![surface(1000.0, &maze)];
            renderer.render(&mut surfaces)
        })
    });
}

fn bench_png_export(c: &mut Criterion) {
    let maze = serpentine(20, 20);
    let mut surfaces: Vec<MazeElement> = vec![surface(400.0, &maze)];
    MazeRenderer::default().render(&mut surfaces);

    c.bench_function("png_export_400", |b| {
        b.iter(|| surfaces[0].canvas_context().unwrap().screenshot().unwrap())
    });
}

criterion_group!(benches, bench_raster_pass, bench_recorded_pass, bench_png_export);
criterion_main!(benches);
