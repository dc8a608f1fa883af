// src/grid.rs

/// Regular 2D finite-difference mesh over the sheet.
///
/// Index `i` runs along x, `j` along y; storage is row-major in `j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid2D {
    pub nx: usize,
    pub ny: usize,
    pub dx: f64,
    pub dy: f64,
}

impl Grid2D {
    /// Create a new 2D grid with nx × ny cells and spacings dx, dy.
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> Self {
        Self { nx, ny, dx, dy }
    }

    /// Grid covering a physical extent lx × ly, with dx = lx/nx, dy = ly/ny.
    pub fn from_extent(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        Self::new(nx, ny, lx / nx as f64, ly / ny as f64)
    }

    /// Total number of cells.
    pub fn n_cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Convert (i, j) indices to a flat index into a 1D array.
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny);
        j * self.nx + i
    }

    /// Smallest spacing; sets the explicit step size.
    pub fn min_spacing(&self) -> f64 {
        self.dx.min(self.dy)
    }

    /// Index of the centreline row, `j = ny / 2`.
    pub fn mid_row(&self) -> usize {
        self.ny / 2
    }

    /// True for cells on any of the four borders.
    #[inline]
    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.nx || j + 1 == self.ny
    }

    /// Neighbour indices along one axis with wraparound: (prev, next).
    #[inline]
    pub fn wrap(k: usize, n: usize) -> (usize, usize) {
        let prev = if k == 0 { n - 1 } else { k - 1 };
        let next = if k + 1 == n { 0 } else { k + 1 };
        (prev, next)
    }
}

/// `n` evenly spaced samples over [0, length], endpoints included.
pub fn linspace(length: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = length / (n - 1) as f64;
            (0..n).map(|k| k as f64 * step).collect()
        }
    }
}
