use serde::Serialize;
use std::ops::Index;

/// Full temperature history, `[time][row][col]`, stored contiguously.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureState {
    t_points: usize,
    ny: usize,
    nx: usize,
    data: Vec<f64>,
}

impl TemperatureState {
    /// Dimensions come from a validated `Grid`, so the product fits in memory.
    pub(crate) fn zeros(t_points: usize, ny: usize, nx: usize) -> TemperatureState {
        TemperatureState {
            t_points,
            ny,
            nx,
            data: vec![0.0; t_points * ny * nx],
        }
    }

    /// `(t_points, y_points, x_points)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.t_points, self.ny, self.nx)
    }

    pub fn len(&self) -> usize {
        self.t_points
    }

    pub fn is_empty(&self) -> bool {
        self.t_points == 0
    }

    pub fn slice(&self, t: usize) -> SliceView<'_> {
        SliceView::new(&self[t], self.nx, self.ny)
    }

    pub fn slices(&self) -> impl Iterator<Item = SliceView<'_>> + '_ {
        self.data
            .chunks_exact(self.plane_len())
            .map(|plane| SliceView::new(plane, self.nx, self.ny))
    }

    /// Entire history, row-major with time outermost.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn plane_len(&self) -> usize {
        self.nx * self.ny
    }

    pub(crate) fn plane_mut(&mut self, t: usize) -> &mut [f64] {
        let n = self.plane_len();
        &mut self.data[t * n..(t + 1) * n]
    }

    /// Read slice `t` while writing slice `t + 1`.
    pub(crate) fn split_step(&mut self, t: usize) -> (&[f64], &mut [f64]) {
        let n = self.plane_len();
        let (done, rest) = self.data.split_at_mut((t + 1) * n);
        (&done[t * n..], &mut rest[..n])
    }
}

/// `state[t]` is the row-major `y_points * x_points` slice at time index `t`.
impl Index<usize> for TemperatureState {
    type Output = [f64];

    fn index(&self, t: usize) -> &[f64] {
        let n = self.plane_len();
        &self.data[t * n..(t + 1) * n]
    }
}

/// Read-only view of one time slice.
#[derive(Clone, Copy, Debug)]
pub struct SliceView<'a> {
    data: &'a [f64],
    nx: usize,
    ny: usize,
}

impl<'a> SliceView<'a> {
    pub(crate) fn new(data: &'a [f64], nx: usize, ny: usize) -> SliceView<'a> {
        debug_assert_eq!(data.len(), nx * ny, "slice length does not match {ny}x{nx}");
        SliceView { data, nx, ny }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.nx + col]
    }

    pub fn row(&self, row: usize) -> &'a [f64] {
        &self.data[row * self.nx..(row + 1) * self.nx]
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Value at the middle cell (`ny / 2`, `nx / 2`).
    pub fn center(&self) -> f64 {
        self.get(self.ny / 2, self.nx / 2)
    }

    pub fn summary(&self, time_index: usize, time: f64) -> SliceSummary {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in self.data {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        SliceSummary {
            time_index,
            time,
            min,
            max,
            mean: sum / self.data.len() as f64,
            center: self.center(),
        }
    }
}

/// Scalar digest of a slice for headless runs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SliceSummary {
    pub time_index: usize,
    pub time: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub center: f64,
}
