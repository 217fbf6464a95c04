//! Grid sampling over a source extent.
//!
//! Step `s` covers the extent with a square grid of side `2^(s-1) + 1`,
//! edges inclusive, walked row by row from the bottom (`min_y`) up and left
//! to right inside a row.

use serde::{Deserialize, Serialize};

use crate::core::{
    extent::Extent,
    geo::{Point, ZoomLevel},
};

/// One render position of a preload step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub coordinate: Point,
    pub target_zoom: ZoomLevel,
}

/// Grid of sample points for one step.
///
/// Holds no per-point state; points are computed from the index on demand,
/// so iteration is lazy and [`GridSampler::iter`] can be called any number
/// of times with the same result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSampler {
    extent: Extent,
    side: usize,
    target_zoom: ZoomLevel,
}

impl GridSampler {
    /// Grid for `step` (1-based) over `extent`
    pub fn new(extent: Extent, step: u32, target_zoom: ZoomLevel) -> Self {
        Self::with_side(extent, Self::side_for_step(step), target_zoom)
    }

    /// Grid with an explicit side length. A side of 0 is treated as 1.
    pub fn with_side(extent: Extent, side: usize, target_zoom: ZoomLevel) -> Self {
        Self {
            extent: extent.normalized(),
            side: side.max(1),
            target_zoom,
        }
    }

    /// Side length for `step`: `2^(step-1) + 1`. Step 0 degenerates to 1.
    /// Saturates at `usize::MAX` for steps too deep to address.
    pub fn side_for_step(step: u32) -> usize {
        match step {
            0 => 1,
            s => 1usize
                .checked_shl(s - 1)
                .and_then(|side| side.checked_add(1))
                .unwrap_or(usize::MAX),
        }
    }

    /// Number of points for `step`, saturating
    pub fn point_count_for_step(step: u32) -> usize {
        let side = Self::side_for_step(step);
        side.saturating_mul(side)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.side.saturating_mul(self.side)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn target_zoom(&self) -> ZoomLevel {
        self.target_zoom
    }

    /// Distance between neighbouring columns and rows
    pub fn spacing(&self) -> (f64, f64) {
        if self.side == 1 {
            return (self.extent.width(), self.extent.height());
        }
        let divisions = (self.side - 1) as f64;
        (
            self.extent.width() / divisions,
            self.extent.height() / divisions,
        )
    }

    fn axis_value(min: f64, max: f64, index: usize, side: usize) -> f64 {
        // Pin the last index to max so the far edge is exact
        if side == 1 || index == 0 {
            min
        } else if index == side - 1 {
            max
        } else {
            min + (max - min) * index as f64 / (side - 1) as f64
        }
    }

    /// Point at `index` in row-major order
    pub fn point(&self, index: usize) -> Option<SamplePoint> {
        if index >= self.len() {
            return None;
        }
        let row = index / self.side;
        let col = index % self.side;
        let x = Self::axis_value(self.extent.min.x, self.extent.max.x, col, self.side);
        let y = Self::axis_value(self.extent.min.y, self.extent.max.y, row, self.side);

        Some(SamplePoint {
            coordinate: Point::new(x, y),
            target_zoom: self.target_zoom,
        })
    }

    /// First point of the grid, used to prime the surface for the step
    pub fn first(&self) -> SamplePoint {
        SamplePoint {
            coordinate: self.extent.min,
            target_zoom: self.target_zoom,
        }
    }

    /// Area the point at `index` stands for: one grid spacing wide, centered on the point.
    /// A single-point grid stands for the whole extent.
    pub fn cell_extent(&self, index: usize) -> Option<Extent> {
        let point = self.point(index)?;
        if self.side == 1 {
            return Some(self.extent);
        }
        let (dx, dy) = self.spacing();
        Some(Extent::from_center_and_size(point.coordinate, dx, dy))
    }

    pub fn iter(&self) -> GridIter {
        GridIter {
            grid: *self,
            next: 0,
        }
    }
}

impl IntoIterator for &GridSampler {
    type Item = SamplePoint;
    type IntoIter = GridIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy row-major iterator over a [`GridSampler`]
#[derive(Debug, Clone)]
pub struct GridIter {
    grid: GridSampler,
    next: usize,
}

impl Iterator for GridIter {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<Self::Item> {
        let point = self.grid.point(self.next)?;
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter {}

impl std::iter::FusedIterator for GridIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(grid: &GridSampler) -> Vec<(f64, f64)> {
        grid.iter()
            .map(|p| (p.coordinate.x, p.coordinate.y))
            .collect()
    }

    #[test]
    fn test_grid_sizing() {
        let extent = Extent::from_coords(0.0, 0.0, 1.0, 1.0);
        let mut previous_side = 0;
        for step in 1..=6 {
            let grid = GridSampler::new(extent, step, step as f64);
            let expected_side = 2usize.pow(step - 1) + 1;
            assert_eq!(grid.side(), expected_side);
            assert_eq!(grid.iter().count(), expected_side * expected_side);
            assert_eq!(GridSampler::point_count_for_step(step), expected_side * expected_side);
            assert!(grid.side() > previous_side);
            previous_side = grid.side();
        }
    }

    #[test]
    fn test_step_one_traversal_order() {
        let extent = Extent::from_coords(-50.0, 100.0, 50.0, 200.0);
        let grid = GridSampler::new(extent, 1, 6.0);

        assert_eq!(
            coords(&grid),
            vec![(-50.0, 100.0), (50.0, 100.0), (-50.0, 200.0), (50.0, 200.0)]
        );
        assert!(grid.iter().all(|p| p.target_zoom == 6.0));
    }

    #[test]
    fn test_step_two_row_major() {
        let extent = Extent::from_coords(-50.0, 100.0, 50.0, 200.0);
        let grid = GridSampler::new(extent, 2, 7.0);

        assert_eq!(
            coords(&grid),
            vec![
                (-50.0, 100.0),
                (0.0, 100.0),
                (50.0, 100.0),
                (-50.0, 150.0),
                (0.0, 150.0),
                (50.0, 150.0),
                (-50.0, 200.0),
                (0.0, 200.0),
                (50.0, 200.0),
            ]
        );
    }

    #[test]
    fn test_edges_are_inclusive() {
        let extent = Extent::from_coords(0.1, 0.2, 0.7, 0.9);
        let grid = GridSampler::new(extent, 4, 3.0);
        let points: Vec<_> = grid.iter().collect();

        assert_eq!(points.first().unwrap().coordinate, Point::new(0.1, 0.2));
        assert_eq!(points.last().unwrap().coordinate, Point::new(0.7, 0.9));
        assert_eq!(grid.first(), points[0]);
    }

    #[test]
    fn test_restartable_and_pure() {
        let extent = Extent::from_coords(-10.0, -10.0, 30.0, 5.0);
        let a = GridSampler::new(extent, 3, 9.0);
        let b = GridSampler::new(extent, 3, 9.0);

        let first_pass: Vec<_> = a.iter().collect();
        let second_pass: Vec<_> = a.iter().collect();
        let other_instance: Vec<_> = b.iter().collect();

        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass, other_instance);
    }

    #[test]
    fn test_degenerate_single_point() {
        let extent = Extent::from_coords(3.0, 4.0, 8.0, 9.0);
        let grid = GridSampler::with_side(extent, 1, 2.0);

        assert_eq!(coords(&grid), vec![(3.0, 4.0)]);
        assert_eq!(grid.cell_extent(0), Some(extent));
        assert_eq!(GridSampler::side_for_step(0), 1);
    }

    #[test]
    fn test_cell_extent_spans_one_spacing() {
        let extent = Extent::from_coords(0.0, 0.0, 100.0, 100.0);
        let grid = GridSampler::new(extent, 2, 1.0);

        assert_eq!(grid.spacing(), (50.0, 50.0));
        assert_eq!(
            grid.cell_extent(4),
            Some(Extent::from_coords(25.0, 25.0, 75.0, 75.0))
        );
        assert_eq!(grid.cell_extent(9), None);
    }

    #[test]
    fn test_deep_steps_saturate() {
        assert_eq!(GridSampler::side_for_step(33), (1usize << 32) + 1);
        assert_eq!(GridSampler::point_count_for_step(33), usize::MAX);
        assert_eq!(GridSampler::side_for_step(65), usize::MAX);
        assert_eq!(GridSampler::side_for_step(u32::MAX), usize::MAX);

        let grid = GridSampler::new(Extent::from_coords(0.0, 0.0, 1.0, 1.0), 40, 1.0);
        assert_eq!(grid.len(), usize::MAX);
        assert_eq!(grid.first().coordinate, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_iterator_is_exact_size() {
        let grid = GridSampler::new(Extent::from_coords(0.0, 0.0, 1.0, 1.0), 3, 0.0);
        let mut iter = grid.iter();
        assert_eq!(iter.len(), 25);
        iter.next();
        assert_eq!(iter.len(), 24);
    }
}
