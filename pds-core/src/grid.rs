use glam::{IVec2, UVec2};

use crate::types::{CellIndex, Domain, Point};

/// Largest grid a run may allocate (about 200 MB of cells).
pub const MAX_CELLS: usize = 1 << 24;

/// `⌊extent / cell_width⌋ + 1`, saturating at `usize::MAX`.
fn axis_cells(extent: f32, cell_width: f32) -> usize {
    let n = (extent / cell_width).floor();
    if n.is_nan() || n >= usize::MAX as f32 {
        return usize::MAX;
    }
    (n as usize).saturating_add(1)
}

/// Background grid that accelerates neighbour queries.
///
/// The domain is cut into square cells of edge `cell_width`. With
/// `cell_width = R/√2` a cell's diagonal equals `R`, so a cell can hold at
/// most one accepted point, and each cell stores either nothing or that
/// single point.
///
/// Cells are stored row-major: the cell at column `cx`, row `cy` lives at
/// index `cx + cy * cols`.
#[derive(Debug, Clone)]
pub struct AccelerationGrid {
    cell_width: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Option<Point>>,
}

impl AccelerationGrid {
    /// Creates an empty grid covering `domain`.
    ///
    /// Each axis gets `⌊extent / cell_width⌋ + 1` cells, so every point of
    /// `[0, width) × [0, height)` owns a cell and a domain narrower than one
    /// cell still gets one.
    ///
    /// ### Parameters
    /// - `domain` - Rectangle to cover. Extents must be positive.
    /// - `cell_width` - Edge length of a cell. Must be positive.
    ///
    /// ### Returns
    /// A grid with all cells empty.
    pub fn new(domain: Domain, cell_width: f32) -> Self {
        let cols = axis_cells(domain.width, cell_width);
        let rows = axis_cells(domain.height, cell_width);

        Self {
            cell_width,
            cols,
            rows,
            cells: vec![None; cols.saturating_mul(rows)],
        }
    }

    /// Grid size `(cols, rows)` that [`AccelerationGrid::new`] would allocate,
    /// or `None` if it exceeds [`MAX_CELLS`] cells.
    pub fn dims_for(domain: Domain, cell_width: f32) -> Option<(usize, usize)> {
        let cols = axis_cells(domain.width, cell_width);
        let rows = axis_cells(domain.height, cell_width);
        cols.checked_mul(rows)
            .filter(|&n| n <= MAX_CELLS)
            .map(|_| (cols, rows))
    }

    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid size as `(cols, rows)`.
    #[inline]
    pub fn dims(&self) -> UVec2 {
        UVec2::new(self.cols as u32, self.rows as u32)
    }

    /// Total number of cells, `rows * cols`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column and row of the cell containing `p`.
    ///
    /// Not bounds checked: points outside the domain yield coordinates
    /// outside the grid.
    #[inline]
    pub fn cell_coords(&self, p: Point) -> IVec2 {
        (p / self.cell_width).floor().as_ivec2()
    }

    /// Linear index of the cell containing `p`.
    ///
    /// Not bounds checked; validate with [`AccelerationGrid::in_bounds`]
    /// before use. Prefer [`AccelerationGrid::index_of`] for neighbour cells,
    /// since a column past the right edge produces an index that lands in
    /// the next row.
    #[inline]
    pub fn cell_index(&self, p: Point) -> isize {
        let c = self.cell_coords(p);
        c.x as isize + c.y as isize * self.cols as isize
    }

    /// Returns `true` iff `0 <= index < rows * cols`.
    #[inline]
    pub fn in_bounds(&self, index: isize) -> bool {
        index >= 0 && (index as usize) < self.cells.len()
    }

    /// Linear index of the cell at `cell`, or `None` if either coordinate
    /// falls outside the grid.
    #[inline]
    pub fn index_of(&self, cell: IVec2) -> Option<CellIndex> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let (cx, cy) = (cell.x as usize, cell.y as usize);
        if cx >= self.cols || cy >= self.rows {
            return None;
        }
        Some(cx + cy * self.cols)
    }

    /// ### Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn is_occupied(&self, index: CellIndex) -> bool {
        self.cells[index].is_some()
    }

    /// Point stored in the cell, if any.
    ///
    /// ### Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn point_at(&self, index: CellIndex) -> Option<Point> {
        self.cells[index]
    }

    /// Stores `p` in cell `index` and marks it occupied.
    ///
    /// The cell must be empty; overwriting an accepted point would break
    /// the one-point-per-cell invariant.
    ///
    /// ### Panics
    /// Panics if `index` is out of bounds, and in debug builds if the cell
    /// is already occupied.
    pub fn occupy(&mut self, index: CellIndex, p: Point) {
        debug_assert!(
            self.cells[index].is_none(),
            "cell {index} already holds {:?}",
            self.cells[index]
        );
        self.cells[index] = Some(p);
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// All stored points in row-major cell order.
    pub fn occupied_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    /// Stored points in the `(2 * radius + 1)²` block of cells centred on
    /// `cell`. Cells outside the grid and empty cells are skipped.
    pub fn neighbours(&self, cell: IVec2, radius: i32) -> impl Iterator<Item = Point> + '_ {
        (-radius..=radius)
            .flat_map(move |dy| (-radius..=radius).map(move |dx| cell + IVec2::new(dx, dy)))
            .filter_map(move |c| self.index_of(c))
            .filter_map(move |i| self.cells[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn new_sizes_axes_independently() {
        let grid = AccelerationGrid::new(Domain::new(100.0, 30.0), 10.0);

        assert_eq!(grid.cols(), 11);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.len(), 44);
        assert_eq!(grid.dims(), UVec2::new(11, 4));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn dims_for_matches_new_and_caps_size() {
        let domain = Domain::new(100.0, 30.0);
        let grid = AccelerationGrid::new(domain, 10.0);
        assert_eq!(
            AccelerationGrid::dims_for(domain, 10.0),
            Some((grid.cols(), grid.rows()))
        );

        assert_eq!(AccelerationGrid::dims_for(Domain::new(1e20, 1e20), 0.7), None);
        assert_eq!(AccelerationGrid::dims_for(Domain::new(1e6, 1e6), 1e-3), None);
        assert_eq!(AccelerationGrid::dims_for(Domain::new(1.0, 1.0), 1e-40), None);
    }

    #[test]
    fn domain_smaller_than_a_cell_has_one_cell() {
        let grid = AccelerationGrid::new(Domain::new(3.0, 4.0), 7.5);

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.cell_index(Vec2::new(2.9, 3.9)), 0);
    }

    #[test]
    fn cell_index_is_row_major() {
        let grid = AccelerationGrid::new(Domain::new(40.0, 40.0), 10.0);

        assert_eq!(grid.cell_coords(Vec2::new(25.0, 12.0)), IVec2::new(2, 1));
        assert_eq!(grid.cell_index(Vec2::new(25.0, 12.0)), 2 + 5);
        assert_eq!(grid.cell_index(Vec2::new(0.0, 0.0)), 0);
        assert_eq!(grid.cell_index(Vec2::new(-1.0, 0.0)), -1);
    }

    #[test]
    fn in_bounds_accepts_last_cell() {
        let grid = AccelerationGrid::new(Domain::new(20.0, 20.0), 10.0);
        let len = grid.len() as isize;

        assert!(grid.in_bounds(0));
        assert!(grid.in_bounds(len - 1));
        assert!(!grid.in_bounds(len));
        assert!(!grid.in_bounds(-1));
    }

    #[test]
    fn index_of_rejects_each_axis() {
        let grid = AccelerationGrid::new(Domain::new(20.0, 10.0), 10.0);

        assert_eq!(grid.index_of(IVec2::new(2, 1)), Some(5));
        assert_eq!(grid.index_of(IVec2::new(3, 0)), None);
        assert_eq!(grid.index_of(IVec2::new(0, 2)), None);
        assert_eq!(grid.index_of(IVec2::new(-1, 0)), None);
    }

    #[test]
    fn occupy_records_point() {
        let mut grid = AccelerationGrid::new(Domain::new(20.0, 20.0), 10.0);
        let p = Vec2::new(15.0, 5.0);
        let idx = grid.cell_index(p) as usize;

        assert!(!grid.is_occupied(idx));
        grid.occupy(idx, p);

        assert!(grid.is_occupied(idx));
        assert_eq!(grid.point_at(idx), Some(p));
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.occupied_points().collect::<Vec<_>>(), vec![p]);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn occupy_twice_panics_in_debug() {
        let mut grid = AccelerationGrid::new(Domain::new(20.0, 20.0), 10.0);
        grid.occupy(0, Vec2::new(1.0, 1.0));
        grid.occupy(0, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn neighbours_do_not_wrap_rows() {
        // 3 columns; a point in the last column must not see the first
        // column of the next row.
        let mut grid = AccelerationGrid::new(Domain::new(25.0, 25.0), 10.0);
        let left = Vec2::new(1.0, 11.0);
        grid.occupy(grid.cell_index(left) as usize, left);

        let found: Vec<_> = grid.neighbours(IVec2::new(2, 0), 1).collect();
        assert!(found.is_empty());

        let found: Vec<_> = grid.neighbours(IVec2::new(1, 0), 1).collect();
        assert_eq!(found, vec![left]);
    }

    #[test]
    fn neighbours_respect_radius() {
        let mut grid = AccelerationGrid::new(Domain::new(50.0, 50.0), 10.0);
        let far = Vec2::new(45.0, 25.0);
        grid.occupy(grid.cell_index(far) as usize, far);

        assert_eq!(grid.neighbours(IVec2::new(2, 2), 1).count(), 0);
        assert_eq!(grid.neighbours(IVec2::new(2, 2), 2).count(), 1);
    }
}
