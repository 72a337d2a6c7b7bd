//! Uniform cell grid for fixed-radius neighbour queries.
//!
//! Surface-area sampling and half-sphere exposure both ask "which atoms lie within r of this
//! point" thousands of times per structure. [`Grid`] bins positions into cubic cells so each
//! query only visits the cells overlapping the search sphere.

use super::types::Point;
use nalgebra::Vector3;

const SENTINEL: u32 = u32::MAX;

/// Cubic-cell spatial index over `(position, item)` pairs.
///
/// Items are chained per cell through `head`/`next` index lists, so construction is a single
/// pass and the grid holds no per-cell allocations.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    cell_size: f64,
    origin: Point,
    dims: Vector3<usize>,
    head: Vec<u32>,
    next: Vec<u32>,
    items: Vec<(Point, T)>,
}

impl<T> Grid<T> {
    /// Builds a grid enclosing every supplied position.
    ///
    /// # Arguments
    ///
    /// * `items` - `(position, payload)` pairs to index.
    /// * `cell_size` - Edge length of a cell; queries are cheapest when it is close to the
    ///   typical search radius. Non-positive values are raised to 1 Å.
    pub fn new(items: impl IntoIterator<Item = (Point, T)>, cell_size: f64) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        let items: Vec<(Point, T)> = items.into_iter().collect();

        if items.is_empty() {
            return Self {
                cell_size,
                origin: Point::origin(),
                dims: Vector3::zeros(),
                head: Vec::new(),
                next: Vec::new(),
                items,
            };
        }

        let (mut min, mut max) = (items[0].0, items[0].0);
        for (pos, _) in &items {
            min = min.inf(pos);
            max = max.sup(pos);
        }

        let extent = max - min;
        let dims = extent.map(|e| (e / cell_size).floor() as usize + 1);

        let mut head = vec![SENTINEL; dims.x * dims.y * dims.z];
        let mut next = vec![SENTINEL; items.len()];

        for (i, (pos, _)) in items.iter().enumerate() {
            let cell = Self::cell_coords(pos, &min, cell_size, &dims);
            let idx = cell.0 + cell.1 * dims.x + cell.2 * dims.x * dims.y;
            next[i] = head[idx];
            head[idx] = i as u32;
        }

        Self {
            cell_size,
            origin: min,
            dims,
            head,
            next,
            items,
        }
    }

    fn cell_coords(
        pos: &Point,
        origin: &Point,
        cell_size: f64,
        dims: &Vector3<usize>,
    ) -> (usize, usize, usize) {
        let offset = pos - origin;
        let clamp = |v: f64, n: usize| ((v / cell_size).floor().max(0.0) as usize).min(n - 1);
        (
            clamp(offset.x, dims.x),
            clamp(offset.y, dims.y),
            clamp(offset.z, dims.z),
        )
    }

    /// Yields every item whose position lies within `radius` of `center` (inclusive).
    pub fn within<'a>(&'a self, center: &Point, radius: f64) -> impl Iterator<Item = &'a T> + 'a {
        let center = *center;
        let radius_sq = radius * radius;

        let cells: Vec<usize> = if self.items.is_empty() {
            Vec::new()
        } else {
            let r = Vector3::new(radius, radius, radius);
            let lo = Self::cell_coords(&(center - r), &self.origin, self.cell_size, &self.dims);
            let hi = Self::cell_coords(&(center + r), &self.origin, self.cell_size, &self.dims);
            let mut cells = Vec::new();
            for z in lo.2..=hi.2 {
                for y in lo.1..=hi.1 {
                    for x in lo.0..=hi.0 {
                        cells.push(x + y * self.dims.x + z * self.dims.x * self.dims.y);
                    }
                }
            }
            cells
        };

        cells
            .into_iter()
            .flat_map(move |cell| CellChain {
                grid: self,
                cursor: self.head[cell],
            })
            .filter(move |(pos, _)| nalgebra::distance_squared(pos, &center) <= radius_sq)
            .map(|(_, item)| item)
    }
}

struct CellChain<'a, T> {
    grid: &'a Grid<T>,
    cursor: u32,
}

impl<'a, T> Iterator for CellChain<'a, T> {
    type Item = &'a (Point, T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == SENTINEL {
            return None;
        }
        let idx = self.cursor as usize;
        self.cursor = self.grid.next[idx];
        Some(&self.grid.items[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_within_filters_by_exact_distance() {
        let grid = Grid::new(
            vec![
                (Point::new(0.0, 0.0, 0.0), "center"),
                (Point::new(0.9, 0.0, 0.0), "inside"),
                (Point::new(1.1, 0.0, 0.0), "outside"),
            ],
            2.0,
        );

        let mut found: Vec<_> = grid.within(&Point::origin(), 1.0).copied().collect();
        found.sort();
        assert_eq!(found, vec!["center", "inside"]);
    }

    #[test]
    fn grid_within_reaches_across_cells() {
        let points: Vec<_> = (0..20)
            .map(|i| (Point::new(i as f64, 0.0, 0.0), i))
            .collect();
        let grid = Grid::new(points, 1.5);

        let mut found: Vec<_> = grid
            .within(&Point::new(10.0, 0.0, 0.0), 3.0)
            .copied()
            .collect();
        found.sort();
        assert_eq!(found, vec![7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn grid_within_includes_boundary_points() {
        let grid = Grid::new(vec![(Point::new(1.0, 0.0, 0.0), 1)], 2.0);
        assert_eq!(grid.within(&Point::origin(), 1.0).count(), 1);
        assert_eq!(grid.within(&Point::origin(), 0.99).count(), 0);
    }

    #[test]
    fn grid_handles_empty_input() {
        let grid: Grid<i32> = Grid::new(Vec::new(), 1.0);
        assert_eq!(grid.within(&Point::origin(), 5.0).count(), 0);
    }

    #[test]
    fn grid_query_outside_bounds_clamps_to_edge_cells() {
        let grid = Grid::new(vec![(Point::new(0.0, 0.0, 0.0), 'a')], 1.0);
        assert_eq!(grid.within(&Point::new(-0.5, 0.0, 0.0), 1.0).count(), 1);
        assert_eq!(grid.within(&Point::new(50.0, 0.0, 0.0), 1.0).count(), 0);
    }
}
