use crate::core::constants::EXTENT_EPSILON;
use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in map projection units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: Point,
    pub max: Point,
}

impl Extent {
    /// Creates a new extent from two corner points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates an extent from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Creates an extent from a center point and size
    pub fn from_center_and_size(center: Point, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self::new(
            Point::new(center.x - half_width, center.y - half_height),
            Point::new(center.x + half_width, center.y + half_height),
        )
    }

    /// Gets the width of the extent
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the extent
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Gets the center point of the extent
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Checks if `other` lies entirely inside this extent, edges included.
    pub fn contains_extent(&self, other: &Extent) -> bool {
        other.min.x >= self.min.x - EXTENT_EPSILON
            && other.min.y >= self.min.y - EXTENT_EPSILON
            && other.max.x <= self.max.x + EXTENT_EPSILON
            && other.max.y <= self.max.y + EXTENT_EPSILON
    }

    /// Checks if the extent is valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Returns a normalized extent with min and max swapped where needed
    pub fn normalized(&self) -> Extent {
        Extent::from_coords(
            self.min.x.min(self.max.x),
            self.min.y.min(self.max.y),
            self.min.x.max(self.max.x),
            self.min.y.max(self.max.y),
        )
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}
