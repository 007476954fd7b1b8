//! SVG-path serialization with tight bounding box tracking.

use super::{BBox, GlyphOutline};

/// Accumulates path commands and the tight bounding box of the drawn ink.
///
/// Coordinates are emitted with 3-decimal precision (trailing zeros
/// trimmed) so the serialized form is stable across runs and platforms.
pub struct PathBuilder {
    data: String,
    bbox: Option<BBox>,
    current: (f32, f32),
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            data: String::new(),
            bbox: None,
            current: (0.0, 0.0),
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.cmd('M', &[x, y]);
        self.add_point(x, y);
        self.current = (x, y);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.cmd('L', &[x, y]);
        self.add_point(x, y);
        self.current = (x, y);
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.cmd('Q', &[cx, cy, x, y]);
        let (x0, y0) = self.current;
        self.add_point(x, y);
        for t in quad_extrema(x0, cx, x) {
            self.add_point(quad_at(x0, cx, x, t), quad_at(y0, cy, y, t));
        }
        for t in quad_extrema(y0, cy, y) {
            self.add_point(quad_at(x0, cx, x, t), quad_at(y0, cy, y, t));
        }
        self.current = (x, y);
    }

    pub fn curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.cmd('C', &[c1x, c1y, c2x, c2y, x, y]);
        let (x0, y0) = self.current;
        self.add_point(x, y);
        for t in cubic_extrema(x0, c1x, c2x, x)
            .into_iter()
            .chain(cubic_extrema(y0, c1y, c2y, y))
        {
            self.add_point(
                cubic_at(x0, c1x, c2x, x, t),
                cubic_at(y0, c1y, c2y, y, t),
            );
        }
        self.current = (x, y);
    }

    pub fn close(&mut self) {
        self.data.push('Z');
    }

    /// Finish the path; a builder that drew nothing yields a blank outline
    /// anchored at the pen.
    pub fn finish(self, pen_x: f32, pen_y: f32) -> GlyphOutline {
        match self.bbox {
            Some(bbox) => GlyphOutline {
                path_data: self.data,
                bbox,
            },
            None => GlyphOutline::empty_at(pen_x, pen_y),
        }
    }

    fn cmd(&mut self, letter: char, coords: &[f32]) {
        self.data.push(letter);
        for (i, &v) in coords.iter().enumerate() {
            if i > 0 {
                self.data.push(' ');
            }
            self.data.push_str(&fmt_coord(v));
        }
    }

    fn add_point(&mut self, x: f32, y: f32) {
        let p = BBox::point(x, y);
        self.bbox = Some(match self.bbox {
            Some(b) => b.union(&p),
            None => p,
        });
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a coordinate with 3 decimal digits, trimming trailing zeros.
fn fmt_coord(v: f32) -> String {
    let mut s = format!("{:.3}", v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn quad_at(p0: f32, p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * p0 + 2.0 * u * t * p1 + t * t * p2
}

/// Parameter of the quadratic's single axis extremum, if interior.
fn quad_extrema(p0: f32, p1: f32, p2: f32) -> Vec<f32> {
    let denom = p0 - 2.0 * p1 + p2;
    if denom.abs() < f32::EPSILON {
        return Vec::new();
    }
    let t = (p0 - p1) / denom;
    if t > 0.0 && t < 1.0 { vec![t] } else { Vec::new() }
}

fn cubic_at(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Interior parameters where the cubic's axis derivative vanishes.
fn cubic_extrema(p0: f32, p1: f32, p2: f32, p3: f32) -> Vec<f32> {
    let a = 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);
    let b = 6.0 * (p0 - 2.0 * p1 + p2);
    let c = 3.0 * (p1 - p0);
    let mut out = Vec::new();

    if a.abs() < f32::EPSILON {
        if b.abs() > f32::EPSILON {
            let t = -c / b;
            if t > 0.0 && t < 1.0 {
                out.push(t);
            }
        }
        return out;
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return out;
    }
    let sqrt = disc.sqrt();
    for t in [(-b + sqrt) / (2.0 * a), (-b - sqrt) / (2.0 * a)] {
        if t > 0.0 && t < 1.0 {
            out.push(t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_three_decimals() {
        let mut b = PathBuilder::new();
        b.move_to(1.00049, 2.0);
        b.line_to(3.5, -0.12345);
        b.close();
        let out = b.finish(0.0, 0.0);
        assert_eq!(out.path_data, "M1 2L3.5 -0.123Z");
    }

    #[test]
    fn trims_negative_zero() {
        assert_eq!(fmt_coord(-0.0001), "0");
        assert_eq!(fmt_coord(10.0), "10");
        assert_eq!(fmt_coord(0.25), "0.25");
    }

    #[test]
    fn line_bbox_is_endpoint_hull() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0);
        b.line_to(10.0, -4.0);
        let out = b.finish(0.0, 0.0);
        assert_eq!(out.bbox, BBox {
            x1: 0.0,
            y1: -4.0,
            x2: 10.0,
            y2: 0.0,
        });
    }

    #[test]
    fn quad_bbox_includes_extremum_not_control() {
        // Control point at y=10 but the curve only reaches y=5.
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0);
        b.quad_to(5.0, 10.0, 10.0, 0.0);
        let out = b.finish(0.0, 0.0);
        assert!((out.bbox.y2 - 5.0).abs() < 1e-4, "y2 = {}", out.bbox.y2);
        assert_eq!(out.bbox.x2, 10.0);
    }

    #[test]
    fn cubic_bbox_solves_extrema() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0);
        b.curve_to(0.0, 8.0, 10.0, 8.0, 10.0, 0.0);
        let out = b.finish(0.0, 0.0);
        // Peak of this symmetric cubic is 6.0 at t=0.5.
        assert!((out.bbox.y2 - 6.0).abs() < 1e-4, "y2 = {}", out.bbox.y2);
    }

    #[test]
    fn empty_builder_collapses_to_pen() {
        let out = PathBuilder::new().finish(7.0, 9.0);
        assert!(out.path_data.is_empty());
        assert_eq!(out.bbox, BBox::point(7.0, 9.0));
    }
}
