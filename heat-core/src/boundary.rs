use serde::{Deserialize, Serialize};

/// Fixed (Dirichlet) temperature on each edge of the plate.
///
/// `bottom` is row 0 (y = 0) and `top` the last row. Corner cells take the
/// `left`/`right` values since columns are written after rows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl BoundaryConditions {
    pub fn uniform(temperature: f64) -> Self {
        BoundaryConditions {
            top: temperature,
            bottom: temperature,
            left: temperature,
            right: temperature,
        }
    }

    /// Hot top and bottom edges, left and right held at zero.
    pub fn rows_only(temperature: f64) -> Self {
        BoundaryConditions {
            top: temperature,
            bottom: temperature,
            left: 0.0,
            right: 0.0,
        }
    }

    pub(crate) fn values(&self) -> [(&'static str, f64); 4] {
        [
            ("boundary.top", self.top),
            ("boundary.bottom", self.bottom),
            ("boundary.left", self.left),
            ("boundary.right", self.right),
        ]
    }

    /// Value held by border cell `(row, col)`, or `None` for interior cells.
    pub fn value_at(&self, row: usize, col: usize, nx: usize, ny: usize) -> Option<f64> {
        if col == 0 {
            Some(self.left)
        } else if col == nx - 1 {
            Some(self.right)
        } else if row == 0 {
            Some(self.bottom)
        } else if row == ny - 1 {
            Some(self.top)
        } else {
            None
        }
    }

    /// Write the edge values into one row-major `ny x nx` slice.
    pub fn apply(&self, plane: &mut [f64], nx: usize, ny: usize) {
        debug_assert_eq!(plane.len(), nx * ny);
        plane[..nx].fill(self.bottom);
        plane[(ny - 1) * nx..].fill(self.top);
        for y in 0..ny {
            plane[y * nx] = self.left;
            plane[y * nx + (nx - 1)] = self.right;
        }
    }

    pub fn border_matches(&self, plane: &[f64], nx: usize, ny: usize) -> bool {
        (0..ny).all(|row| {
            (0..nx).all(|col| match self.value_at(row, col, nx, ny) {
                Some(v) => plane[row * nx + col] == v,
                None => true,
            })
        })
    }
}
