// World-to-screen transform that fits a neuron into the window

use crate::geometry::{Bounds, Point};

/// Uniform scale with equal axes. World y points up, screen y points down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub center: Point,
    pub screen_w: f32,
    pub screen_h: f32,
}

impl Viewport {
    /// Fit `bounds` into a `screen_w` x `screen_h` area leaving `margin`
    /// pixels on every side.
    pub fn fit(bounds: &Bounds, screen_w: f32, screen_h: f32, margin: f32) -> Self {
        // A single point or a straight line still needs a usable extent
        let width = bounds.width().max(1.0);
        let height = bounds.height().max(1.0);
        let usable_w = (screen_w - 2.0 * margin).max(1.0) as f64;
        let usable_h = (screen_h - 2.0 * margin).max(1.0) as f64;
        Self {
            scale: (usable_w / width).min(usable_h / height),
            center: bounds.center(),
            screen_w,
            screen_h,
        }
    }

    pub fn to_screen(&self, p: Point) -> (f32, f32) {
        let x = (p.x - self.center.x) * self.scale + self.screen_w as f64 / 2.0;
        let y = self.screen_h as f64 / 2.0 - (p.y - self.center.y) * self.scale;
        (x as f32, y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_corners_land_inside_margin() {
        let mut b = Bounds::around(Point::new(-10.0, -5.0));
        b.include(Point::new(30.0, 15.0));
        let vp = Viewport::fit(&b, 800.0, 600.0, 20.0);

        for corner in [b.min, b.max, Point::new(b.min.x, b.max.y), Point::new(b.max.x, b.min.y)] {
            let (x, y) = vp.to_screen(corner);
            assert!((19.9..=780.1).contains(&x), "x {x}");
            assert!((19.9..=580.1).contains(&y), "y {y}");
        }
    }

    #[test]
    fn y_axis_is_flipped() {
        let mut b = Bounds::around(Point::new(0.0, 0.0));
        b.include(Point::new(10.0, 10.0));
        let vp = Viewport::fit(&b, 100.0, 100.0, 0.0);

        let (_, top) = vp.to_screen(Point::new(5.0, 10.0));
        let (_, bottom) = vp.to_screen(Point::new(5.0, 0.0));
        assert!(top < bottom);
        assert_eq!(vp.to_screen(b.center()), (50.0, 50.0));
    }

    #[test]
    fn degenerate_bounds_do_not_blow_up() {
        let b = Bounds::around(Point::new(3.0, 3.0));
        let vp = Viewport::fit(&b, 200.0, 100.0, 10.0);
        assert!(vp.scale.is_finite());
        assert_eq!(vp.to_screen(Point::new(3.0, 3.0)), (100.0, 50.0));
    }
}
