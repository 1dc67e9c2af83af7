//! Grass field: per-cell presence plus a regrowth timer.

#[derive(Clone, Copy, Debug)]
struct Cell {
    grass: bool,
    regrow_timer: u32,
}

impl Cell {
    fn grown() -> Self {
        Self {
            grass: true,
            regrow_timer: 0,
        }
    }
}

/// Toroidal grass grid. A cell either carries grass (timer zero) or counts
/// updates until it regrows. Only `consume` and `update` mutate cells.
#[derive(Clone, Debug)]
pub struct GrassGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl GrassGrid {
    /// Create a fully grown grid. Dimensions must be nonzero; the scenario
    /// layer rejects degenerate grids before they reach the engine.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be nonzero");
        Self {
            width,
            height,
            cells: vec![Cell::grown(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Regrow every cell and zero every timer, in place.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::grown();
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + (x as usize)
    }

    #[inline]
    pub fn has_grass(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)].grass
    }

    /// Eat the grass at (x, y). Returns whether there was any to eat; the
    /// caller grants energy only on `true`. The regrowth timer restarts at
    /// zero either way the cell ends up grassless.
    pub fn consume(&mut self, x: u32, y: u32) -> bool {
        let index = self.index(x, y);
        let cell = &mut self.cells[index];
        if cell.grass {
            cell.grass = false;
            cell.regrow_timer = 0;
            true
        } else {
            false
        }
    }

    /// Advance regrowth by one tick: every grassless cell counts up and
    /// regrows once its timer reaches `regrow_time`. A `regrow_time` of zero
    /// regrows everything on the next update. Runs before any agent acts, so
    /// a cell consumed this tick starts its clock on the next one.
    pub fn update(&mut self, regrow_time: u32) {
        for cell in &mut self.cells {
            if !cell.grass {
                cell.regrow_timer += 1;
                if cell.regrow_timer >= regrow_time {
                    *cell = Cell::grown();
                }
            }
        }
    }

    /// Total cells currently carrying grass. Reporting only; the engine never
    /// branches on this.
    pub fn count_grass(&self) -> usize {
        self.cells.iter().filter(|cell| cell.grass).count()
    }

    /// Row-major grass booleans for render frames.
    pub fn grass_cells(&self) -> Vec<bool> {
        self.cells.iter().map(|cell| cell.grass).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fully_grown() {
        let grid = GrassGrid::new(10, 8);
        assert_eq!(grid.count_grass(), 80);
        for x in 0..10 {
            for y in 0..8 {
                assert!(grid.has_grass(x, y));
            }
        }
    }

    #[test]
    fn consume_clears_exactly_once() {
        let mut grid = GrassGrid::new(10, 8);
        assert!(grid.consume(3, 4));
        assert!(!grid.has_grass(3, 4));
        assert!(!grid.consume(3, 4));
        assert_eq!(grid.count_grass(), 79);
    }

    #[test]
    fn update_leaves_grown_cells_alone() {
        let mut grid = GrassGrid::new(6, 6);
        for _ in 0..50 {
            grid.update(5);
        }
        assert_eq!(grid.count_grass(), 36);
    }

    #[test]
    fn regrowth_takes_exactly_regrow_time_updates() {
        let mut grid = GrassGrid::new(4, 4);
        grid.consume(1, 1);
        for _ in 0..4 {
            grid.update(5);
            assert!(!grid.has_grass(1, 1));
        }
        grid.update(5);
        assert!(grid.has_grass(1, 1));
        // Timer is zeroed on regrowth: eating it again restarts the full wait.
        grid.consume(1, 1);
        grid.update(5);
        assert!(!grid.has_grass(1, 1));
    }

    #[test]
    fn zero_regrow_time_regrows_next_update() {
        let mut grid = GrassGrid::new(3, 3);
        grid.consume(0, 0);
        grid.update(0);
        assert!(grid.has_grass(0, 0));
    }

    #[test]
    fn reset_regrows_everything() {
        let mut grid = GrassGrid::new(5, 5);
        for x in 0..5 {
            grid.consume(x, 2);
        }
        grid.update(10);
        grid.reset();
        assert_eq!(grid.count_grass(), 25);
    }
}
