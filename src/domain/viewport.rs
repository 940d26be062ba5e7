//! Viewport math of the rendering surface.
//!
//! A local point `p` maps to screen as `p * scale + translate`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn union(&self, other: &BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BBox::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// Allowed scale range; wheel and direct zoom stay inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0.2, max: 4.0 }
    }
}

impl ZoomBounds {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }

    pub fn contains(&self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

/// Round down to the nearest 5%.
fn floor_to_step(scale: f64) -> f64 {
    // epsilon absorbs representation error, e.g. 0.35 * 20 = 6.999..
    ((scale * 20.0) + 1e-9).floor() / 20.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
    /// Surface size in screen pixels
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    pub bounds: ZoomBounds,
}

impl Viewport {
    pub fn new(width: f64, height: f64, bounds: ZoomBounds) -> Self {
        Self {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
            width,
            height,
            bounds,
        }
    }

    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.tx, p.y * self.scale + self.ty)
    }

    pub fn to_local(&self, p: Point) -> Point {
        Point::new((p.x - self.tx) / self.scale, (p.y - self.ty) / self.scale)
    }

    fn screen_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Set the scale, keeping the local point under `anchor` still.
    fn scale_around(&mut self, scale: f64, anchor: Point) {
        let local = self.to_local(anchor);
        self.scale = scale;
        self.tx = anchor.x - local.x * scale;
        self.ty = anchor.y - local.y * scale;
    }

    /// Zoom to an absolute multiple, clamped to the bounds.
    ///
    /// Non-finite requests are ignored. Returns the effective scale.
    pub fn zoom_to(&mut self, multiple: f64) -> f64 {
        if multiple.is_finite() {
            let scale = self.bounds.clamp(multiple);
            self.scale_around(scale, self.screen_center());
        }
        self.scale
    }

    /// Apply a wheel step around the cursor.
    ///
    /// The step is suppressed, returning false, if it would leave the bounds.
    pub fn wheel_zoom(&mut self, delta: f64, cursor: Point) -> bool {
        let next = self.scale + delta;
        if !next.is_finite() || !self.bounds.contains(next) {
            return false;
        }
        self.scale_around(next, cursor);
        true
    }

    /// Scale that fits `content` plus `padding` on each side, clamped and
    /// rounded down to 5%.
    pub fn fit_scale(&self, content: &BBox, padding: f64) -> f64 {
        let avail_w = (self.width - 2.0 * padding).max(1.0);
        let avail_h = (self.height - 2.0 * padding).max(1.0);
        let raw = if content.width <= 0.0 || content.height <= 0.0 {
            self.bounds.max
        } else {
            (avail_w / content.width).min(avail_h / content.height)
        };
        floor_to_step(self.bounds.clamp(raw)).max(self.bounds.min)
    }

    pub fn zoom_to_fit(&mut self, content: &BBox, padding: f64) -> f64 {
        self.scale = self.fit_scale(content, padding);
        self.center_on(content);
        self.scale
    }

    /// Translate so the local point lands in the middle of the surface.
    pub fn center_point(&mut self, p: Point) {
        let c = self.screen_center();
        self.tx = c.x - p.x * self.scale;
        self.ty = c.y - p.y * self.scale;
    }

    pub fn center_on(&mut self, bbox: &BBox) {
        self.center_point(bbox.center());
    }

    /// Center horizontally on `bbox` and pin its top edge `top_offset` pixels
    /// below the surface top.
    pub fn center_and_nudge(&mut self, bbox: &BBox, top_offset: f64) {
        self.center_on(bbox);
        self.ty = top_offset - bbox.y * self.scale;
    }

    /// Pan by a screen-space delta; non-finite deltas are ignored.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Point {
        if dx.is_finite() && dy.is_finite() {
            self.tx += dx;
            self.ty += dy;
        }
        Point::new(self.tx, self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0, ZoomBounds::default())
    }

    #[rstest]
    #[case(0.05, 0.2)]
    #[case(0.2, 0.2)]
    #[case(1.5, 1.5)]
    #[case(4.0, 4.0)]
    #[case(12.0, 4.0)]
    fn given_requested_multiple_when_zooming_then_scale_is_clamped(
        #[case] requested: f64,
        #[case] expected: f64,
    ) {
        let mut vp = viewport();
        assert_eq!(vp.zoom_to(requested), expected);
    }

    #[test]
    fn given_wheel_step_past_bound_when_zooming_then_suppressed() {
        let mut vp = viewport();
        vp.zoom_to(0.25);

        assert!(!vp.wheel_zoom(-0.1, Point::new(10.0, 10.0)));
        assert_eq!(vp.scale, 0.25);
        assert!(vp.wheel_zoom(0.5, Point::new(10.0, 10.0)));
        assert_eq!(vp.scale, 0.75);
    }

    #[test]
    fn given_wheel_zoom_then_point_under_cursor_stays_put() {
        let mut vp = viewport();
        let cursor = Point::new(300.0, 200.0);
        let before = vp.to_local(cursor);

        vp.wheel_zoom(1.0, cursor);

        let after = vp.to_local(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn given_large_content_when_fitting_then_rounds_down_to_five_percent() {
        let vp = viewport();
        // avail 960 x 760 -> min(960/2500, 760/1000) = 0.384
        let scale = vp.fit_scale(&BBox::new(0.0, 0.0, 2500.0, 1000.0), 20.0);
        assert_eq!(scale, 0.35);
    }

    #[test]
    fn given_tiny_or_huge_content_when_fitting_then_clamps() {
        let vp = viewport();
        assert_eq!(vp.fit_scale(&BBox::new(0.0, 0.0, 10.0, 10.0), 20.0), 4.0);
        assert_eq!(vp.fit_scale(&BBox::new(0.0, 0.0, 100_000.0, 10.0), 20.0), 0.2);
    }

    #[test]
    fn given_bbox_when_centering_then_center_maps_to_surface_middle() {
        let mut vp = viewport();
        vp.zoom_to(2.0);
        let bbox = BBox::new(100.0, 50.0, 240.0, 94.0);

        vp.center_on(&bbox);

        assert_eq!(vp.to_screen(bbox.center()), Point::new(500.0, 400.0));
    }

    #[test]
    fn given_root_when_nudging_then_top_edge_pinned() {
        let mut vp = viewport();
        let bbox = BBox::new(-20.0, 0.0, 240.0, 94.0);

        vp.center_and_nudge(&bbox, 40.0);

        let top_left = vp.to_screen(Point::new(bbox.x, bbox.y));
        assert_eq!(top_left.y, 40.0);
        assert_eq!(vp.to_screen(bbox.center()).x, 500.0);
    }
}
