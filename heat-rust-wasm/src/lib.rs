use heat_core::{SimulationConfig, Stepper};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct Solver {
    inner: Stepper,
}

#[wasm_bindgen]
impl Solver {
    /// `config_json` is a serialized `SimulationConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Solver, JsValue> {
        let config: SimulationConfig =
            serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let inner = Stepper::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Solver { inner })
    }

    /// The plate from the original demo.
    pub fn with_defaults() -> Result<Solver, JsValue> {
        let inner = Stepper::new(SimulationConfig::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Solver { inner })
    }

    pub fn nx(&self) -> usize { self.inner.grid().x_points() }
    pub fn ny(&self) -> usize { self.inner.grid().y_points() }
    pub fn t_points(&self) -> usize { self.inner.grid().t_points() }

    pub fn time_index(&self) -> usize { self.inner.time_index() }
    pub fn time(&self) -> f64 { self.inner.time() }
    pub fn remaining(&self) -> usize { self.inner.remaining() }
    pub fn is_finished(&self) -> bool { self.inner.is_finished() }

    pub fn reset(&mut self) { self.inner.reset(); }

    // Copy-based JS access (reliable)
    pub fn get_field(&self) -> Vec<f64> {
        self.inner.current().as_slice().to_vec()
    }

    pub fn get_x(&self) -> Vec<f64> {
        self.inner.grid().x().to_vec()
    }

    pub fn get_y(&self) -> Vec<f64> {
        self.inner.grid().y().to_vec()
    }

    /// Advance up to `steps` steps, stopping at the end of the configured run.
    pub fn step(&mut self, steps: u32) -> StepInfo {
        let t0 = now_ms();
        let mut taken = 0;
        while taken < steps && !self.inner.is_finished() {
            self.inner.step();
            taken += 1;
        }
        let t1 = now_ms();
        let s = self.inner.summary();
        StepInfo {
            steps: taken,
            compute_ms: t1 - t0,
            time: s.time,
            min: s.min,
            max: s.max,
            center: s.center,
        }
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    steps: u32,
    compute_ms: f64,
    time: f64,
    min: f64,
    max: f64,
    center: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn steps(&self) -> u32 { self.steps }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
    pub fn time(&self) -> f64 { self.time }
    pub fn min(&self) -> f64 { self.min }
    pub fn max(&self) -> f64 { self.max }
    pub fn center(&self) -> f64 { self.center }
}


fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
