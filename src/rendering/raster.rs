//! Software rasterizer backing a maze surface.
//!
//! Shapes are sampled on a 4x4 grid per pixel. All geometry produced by one
//! `stroke` (segments, caps, joins) is unioned into a single coverage mask
//! before compositing, so a polyline never blends twice over its own joints.

use sha2::{Digest, Sha256};

use super::{check_canvas_size, Context2d, DrawState, LineCap, Point, Rgba, Screenshot};
use crate::{Error, Result};

const SAMPLES_PER_AXIS: u32 = 4;
const SAMPLES_PER_PIXEL: u32 = SAMPLES_PER_AXIS * SAMPLES_PER_AXIS;
const MITER_LIMIT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    /// Convex polygon, either winding.
    Polygon(Vec<Point>),
    Disc { center: Point, radius: f64 },
}

impl Shape {
    fn bounds(&self) -> (f64, f64, f64, f64) {
        match self {
            Shape::Polygon(pts) => pts.iter().fold(
                (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
            ),
            Shape::Disc { center, radius } => (
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
        }
    }

    fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Polygon(pts) => {
                let mut sign = 0.0;
                for (i, a) in pts.iter().enumerate() {
                    let b = pts[(i + 1) % pts.len()];
                    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
                    if cross == 0.0 {
                        continue;
                    }
                    if sign == 0.0 {
                        sign = cross.signum();
                    } else if cross.signum() != sign {
                        return false;
                    }
                }
                true
            }
            Shape::Disc { center, radius } => {
                let (dx, dy) = (p.x - center.x, p.y - center.y);
                dx * dx + dy * dy <= radius * radius
            }
        }
    }
}

/// Per-pixel sample bits over a clipped pixel window.
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    bits: Vec<u16>,
}

impl CoverageMask {
    fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        Self { x0, y0, width, height, bits: vec![0; width as usize * height as usize] }
    }

    fn add(&mut self, shape: &Shape) {
        let (sx0, sy0, sx1, sy1) = shape.bounds();
        let (px0, py0, px1, py1) = pixel_window(sx0, sy0, sx1, sy1, self.x0 + self.width, self.y0 + self.height);
        for py in py0.max(self.y0)..py1 {
            for px in px0.max(self.x0)..px1 {
                let mut bits = 0u16;
                for s in 0..SAMPLES_PER_PIXEL {
                    let sample = Point::new(
                        f64::from(px) + (f64::from(s % SAMPLES_PER_AXIS) + 0.5) / f64::from(SAMPLES_PER_AXIS),
                        f64::from(py) + (f64::from(s / SAMPLES_PER_AXIS) + 0.5) / f64::from(SAMPLES_PER_AXIS),
                    );
                    if shape.contains(sample) {
                        bits |= 1 << s;
                    }
                }
                let idx = (py - self.y0) as usize * self.width as usize + (px - self.x0) as usize;
                self.bits[idx] |= bits;
            }
        }
    }
}

/// Whole pixels touched by a float rectangle, clipped to `[0, max)`.
fn pixel_window(x0: f64, y0: f64, x1: f64, y1: f64, max_x: u32, max_y: u32) -> (u32, u32, u32, u32) {
    let clip = |v: f64, max: u32| -> u32 {
        if v.is_nan() {
            0
        } else {
            v.clamp(0.0, f64::from(max)) as u32
        }
    };
    (
        clip(x0.floor(), max_x),
        clip(y0.floor(), max_y),
        clip(x1.ceil(), max_x),
        clip(y1.ceil(), max_y),
    )
}

fn unit(a: Point, b: Point) -> Point {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = (dx * dx + dy * dy).sqrt();
    Point::new(dx / len, dy / len)
}

fn offset(p: Point, d: Point, by: f64) -> Point {
    Point::new(p.x + d.x * by, p.y + d.y * by)
}

/// Outer wedge of a miter join at `p`, or a bevel when the miter limit is
/// exceeded. Straight continuations and full reversals need no join.
fn join_shape(p: Point, d1: Point, d2: Point, half: f64) -> Option<Shape> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < 1e-12 {
        return None;
    }
    let outer = -cross.signum();
    let n1 = Point::new(-d1.y * outer, d1.x * outer);
    let n2 = Point::new(-d2.y * outer, d2.x * outer);
    let p1 = offset(p, n1, half);
    let p2 = offset(p, n2, half);

    let sum = Point::new(n1.x + n2.x, n1.y + n2.y);
    let len2 = sum.x * sum.x + sum.y * sum.y;
    if len2 > 0.0 && 2.0 / len2.sqrt() <= MITER_LIMIT {
        let tip = offset(p, sum, half * 2.0 / len2);
        Some(Shape::Polygon(vec![p, p1, tip, p2]))
    } else {
        Some(Shape::Polygon(vec![p, p1, p2]))
    }
}

fn stroke_shapes(subpaths: &[Vec<Point>], line_width: f64, cap: LineCap) -> Vec<Shape> {
    let half = line_width / 2.0;
    let mut shapes = Vec::new();

    for subpath in subpaths {
        let mut pts: Vec<Point> = Vec::with_capacity(subpath.len());
        for p in subpath {
            if pts.last() != Some(p) {
                pts.push(*p);
            }
        }
        if pts.len() < 2 {
            continue;
        }

        let last = pts.len() - 2;
        let dirs: Vec<Point> = pts.windows(2).map(|w| unit(w[0], w[1])).collect();
        for (i, d) in dirs.iter().enumerate() {
            let mut a = pts[i];
            let mut b = pts[i + 1];
            if cap == LineCap::Square {
                if i == 0 {
                    a = offset(a, *d, -half);
                }
                if i == last {
                    b = offset(b, *d, half);
                }
            }
            let n = Point::new(-d.y, d.x);
            shapes.push(Shape::Polygon(vec![
                offset(a, n, half),
                offset(b, n, half),
                offset(b, n, -half),
                offset(a, n, -half),
            ]));
        }

        for i in 1..pts.len() - 1 {
            if let Some(join) = join_shape(pts[i], dirs[i - 1], dirs[i], half) {
                shapes.push(join);
            }
        }

        if cap == LineCap::Round {
            shapes.push(Shape::Disc { center: pts[0], radius: half });
            shapes.push(Shape::Disc { center: pts[pts.len() - 1], radius: half });
        }
    }

    shapes
}

/// An RGBA8 raster with canvas-style drawing state.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    state: DrawState,
}

impl Default for Raster {
    /// Matches the HTML canvas default size.
    fn default() -> Self {
        Self::new(300, 150)
    }
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            state: DrawState::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some(Rgba { r: p[0], g: p[1], b: p[2], a: p[3] })
    }

    /// SHA-256 over the dimensions and pixel data, hex encoded.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.pixels);
        hex::encode(hasher.finalize())
    }

    /// Encode the current pixels as PNG.
    pub fn screenshot(&self) -> Result<Screenshot> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::RenderError(format!(
                "cannot encode an empty {}x{} raster",
                self.width, self.height
            )));
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| Error::RenderError("pixel buffer does not match raster size".into()))?;
        let mut png_data = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))?;
        Ok(Screenshot { width: self.width, height: self.height, png_data })
    }

    fn composite(&mut self, shapes: &[Shape], color: Rgba) {
        if shapes.is_empty() || color.a == 0 {
            return;
        }
        let (x0, y0, x1, y1) = shapes.iter().map(Shape::bounds).fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |acc, b| (acc.0.min(b.0), acc.1.min(b.1), acc.2.max(b.2), acc.3.max(b.3)),
        );
        let (px0, py0, px1, py1) = pixel_window(x0, y0, x1, y1, self.width, self.height);
        let mut mask = CoverageMask::new(px0, py0, px1, py1);
        for shape in shapes {
            mask.add(shape);
        }

        for my in 0..mask.height {
            for mx in 0..mask.width {
                let bits = mask.bits[my as usize * mask.width as usize + mx as usize];
                if bits != 0 {
                    let coverage = f64::from(bits.count_ones()) / f64::from(SAMPLES_PER_PIXEL);
                    self.blend(mask.x0 + mx, mask.y0 + my, color, coverage);
                }
            }
        }
    }

    /// Source-over on non-premultiplied RGBA.
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f64) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.pixels[idx..idx + 4];
        let sa = f64::from(color.a) / 255.0 * coverage;
        let da = f64::from(dst[3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        for (d, s) in dst.iter_mut().zip([color.r, color.g, color.b]) {
            let v = (f64::from(s) * sa + f64::from(*d) * da * (1.0 - sa)) / out_a;
            *d = v.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

impl Context2d for Raster {
    fn reset(&mut self, width: u32, height: u32) -> Result<()> {
        check_canvas_size(width, height)?;
        *self = Raster::new(width, height);
        Ok(())
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.state.fill_style = color;
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.state.stroke_style = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return;
        }
        let rect = Shape::Polygon(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ]);
        let color = self.state.fill_style;
        self.composite(&[rect], color);
    }

    fn begin_path(&mut self) {
        self.state.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.state.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.state.line_to(x, y);
    }

    fn stroke(&mut self) {
        let shapes = stroke_shapes(&self.state.subpaths, self.state.line_width, self.state.line_cap);
        let color = self.state.stroke_style;
        self.composite(&shapes, color);
    }
}
