// src/scalar_field.rs

use crate::grid::Grid2D;

/// Scalar quantity defined on a 2D grid (Bz, Jx, loss density, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField2D {
    pub grid: Grid2D,
    pub data: Vec<f64>,
}

impl ScalarField2D {
    /// Create a new field on the given grid, initialised to zero.
    pub fn new(grid: Grid2D) -> Self {
        let n = grid.n_cells();
        Self {
            grid,
            data: vec![0.0; n],
        }
    }

    /// Set all cells to the same value.
    pub fn set_uniform(&mut self, v: f64) {
        for cell in &mut self.data {
            *cell = v;
        }
    }

    /// Get the flat index in `data` for grid indices (i, j).
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        self.grid.idx(i, j)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.grid.idx(i, j)]
    }

    /// Overwrite the four border rows/columns with `v`.
    pub fn fill_border(&mut self, v: f64) {
        let nx = self.grid.nx;
        let ny = self.grid.ny;
        for i in 0..nx {
            let lo = self.idx(i, 0);
            let hi = self.idx(i, ny - 1);
            self.data[lo] = v;
            self.data[hi] = v;
        }
        for j in 0..ny {
            let lo = self.idx(0, j);
            let hi = self.idx(nx - 1, j);
            self.data[lo] = v;
            self.data[hi] = v;
        }
    }

    /// Copy of row `j` (all i), e.g. the centreline.
    pub fn row(&self, j: usize) -> Vec<f64> {
        let start = self.idx(0, j);
        self.data[start..start + self.grid.nx].to_vec()
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Largest |v| over the field.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// New field with `f` applied cell by cell.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            grid: self.grid,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_fill_leaves_interior_untouched() {
        let grid = Grid2D::new(5, 4, 1.0, 1.0);
        let mut f = ScalarField2D::new(grid);
        f.set_uniform(2.0);
        f.fill_border(-1.0);

        for j in 0..grid.ny {
            for i in 0..grid.nx {
                let expected = if grid.is_border(i, j) { -1.0 } else { 2.0 };
                assert_eq!(f.get(i, j), expected, "cell ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn reductions() {
        let grid = Grid2D::new(2, 2, 1.0, 1.0);
        let f = ScalarField2D {
            grid,
            data: vec![1.0, -3.0, 2.0, 4.0],
        };
        assert_eq!(f.max(), 4.0);
        assert_eq!(f.min(), -3.0);
        assert_eq!(f.mean(), 1.0);
        assert_eq!(f.max_abs(), 4.0);
        assert_eq!(f.row(1), vec![2.0, 4.0]);
        assert!(f.all_finite());
        assert_eq!(f.map(|v| v * 2.0).data, vec![2.0, -6.0, 4.0, 8.0]);
    }
}
