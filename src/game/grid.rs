use rand::Rng;

use super::state::Cell;

/// Square playing field with coordinates `0..size` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    /// Create a grid with the given side length.
    ///
    /// A zero side is rejected earlier by `GameConfig::validate`.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// The cell the snake starts on
    pub fn center(&self) -> Cell {
        let c = (self.size / 2) as i32;
        Cell::new(c, c)
    }

    /// Check if a cell lies on the grid
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        let size = self.size as i32;
        cell.x >= 0 && cell.x < size && cell.y >= 0 && cell.y < size
    }

    /// Sample a cell uniformly from the whole grid
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        let x = rng.gen_range(0..self.size) as i32;
        let y = rng.gen_range(0..self.size) as i32;
        Cell::new(x, y)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20);

        assert!(grid.is_in_bounds(Cell::new(0, 0)));
        assert!(grid.is_in_bounds(Cell::new(19, 19)));
        assert!(!grid.is_in_bounds(Cell::new(-1, 0)));
        assert!(!grid.is_in_bounds(Cell::new(0, -1)));
        assert!(!grid.is_in_bounds(Cell::new(20, 0)));
        assert!(!grid.is_in_bounds(Cell::new(0, 20)));
    }

    #[test]
    fn test_center() {
        assert_eq!(Grid::new(20).center(), Cell::new(10, 10));
        assert_eq!(Grid::new(5).center(), Cell::new(2, 2));
    }

    #[test]
    fn test_random_cell_in_bounds() {
        let grid = Grid::new(7);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            assert!(grid.is_in_bounds(grid.random_cell(&mut rng)));
        }
    }

    #[test]
    fn test_random_cell_covers_grid() {
        let grid = Grid::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..500 {
            seen.insert(grid.random_cell(&mut rng));
        }

        assert_eq!(seen.len(), grid.cell_count());
    }

    #[test]
    fn test_cells_row_major() {
        let grid = Grid::new(2);
        let cells: Vec<Cell> = grid.cells().collect();

        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1)
            ]
        );
    }
}
