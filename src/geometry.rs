//! Element geometry: bounds, rotation and the clamped base transform
//!
//! ## Rotation Convention
//!
//! Rotation follows CSS: clockwise positive angles in degrees, Y axis
//! pointing down, applied around the element's own center.

use serde::Serialize;

use crate::model::DesignElement;

/// A 2D point in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Whether `other` lies entirely inside this box (edges may touch)
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.x, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }
}

/// A 2D rotation around a center point
#[derive(Debug, Clone, Copy)]
pub struct RotationTransform {
    /// Rotation angle in degrees (clockwise positive)
    pub angle_degrees: f64,
    pub center: Point,
}

impl RotationTransform {
    pub fn new(angle_degrees: f64, center: Point) -> Self {
        Self {
            angle_degrees,
            center,
        }
    }

    /// True when the rotation would produce no visible change
    pub fn is_identity(&self) -> bool {
        (self.angle_degrees % 360.0).abs() < f64::EPSILON
    }

    /// Rotate a point around the center.
    ///
    /// ```text
    /// x' = cx + (x - cx) * cos(θ) - (y - cy) * sin(θ)
    /// y' = cy + (x - cx) * sin(θ) + (y - cy) * cos(θ)
    /// ```
    pub fn transform_point(&self, point: Point) -> Point {
        if self.is_identity() {
            return point;
        }

        let radians = self.angle_degrees.to_radians();
        let (sin_a, cos_a) = radians.sin_cos();
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;

        Point {
            x: self.center.x + dx * cos_a - dy * sin_a,
            y: self.center.y + dx * sin_a + dy * cos_a,
        }
    }

    /// Axis-aligned box around the four rotated corners of `bounds`
    pub fn transform_bounds(&self, bounds: &BoundingBox) -> BoundingBox {
        if self.is_identity() {
            return *bounds;
        }

        let rotated = bounds.corners().map(|p| self.transform_point(p));
        let min_x = rotated.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = rotated.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = rotated.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = rotated.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// The base transform of one element, with every optional field resolved.
///
/// Built by clamping rather than rejecting: non-finite coordinates become 0,
/// negative sizes become 0, opacity is clamped to [0, 1] (absent = 1),
/// rotation and z-index default to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub z_index: i32,
}

impl Geometry {
    /// Resolve the geometry of an element
    pub fn of(element: &DesignElement) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        let extent = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };

        let opacity = match element.opacity {
            Some(o) if o.is_finite() => o.clamp(0.0, 1.0),
            _ => 1.0,
        };
        let z_index = match element.z_index {
            Some(z) if z.is_finite() => z.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32,
            _ => 0,
        };

        Self {
            left: finite(element.position.x),
            top: finite(element.position.y),
            width: extent(element.size.width),
            height: extent(element.size.height),
            rotation: element.rotation.map(finite).unwrap_or(0.0),
            opacity,
            z_index,
        }
    }

    /// Unrotated box of the element
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.width, self.height)
    }

    /// Box actually covered on the canvas once rotation is applied
    pub fn visual_bounds(&self) -> BoundingBox {
        let bounds = self.bounds();
        RotationTransform::new(self.rotation, bounds.center()).transform_bounds(&bounds)
    }

    pub fn is_rotated(&self) -> bool {
        !RotationTransform::new(self.rotation, Point::new(0.0, 0.0)).is_identity()
    }

    /// Zero-area elements are legal but paint nothing
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
