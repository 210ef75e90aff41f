/// Floating point helpers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberFunctions;

impl NumberFunctions {
    pub fn abs(&self, n: f64) -> f64 {
        n.abs()
    }

    /// Rounds half away from zero.
    pub fn round(&self, n: f64) -> f64 {
        n.round()
    }

    pub fn ceil(&self, n: f64) -> f64 {
        n.ceil()
    }

    pub fn floor(&self, n: f64) -> f64 {
        n.floor()
    }

    pub fn pow(&self, base: f64, exponent: f64) -> f64 {
        base.powf(exponent)
    }

    /// Square root; `NaN` for negative input.
    pub fn sqrt(&self, n: f64) -> f64 {
        n.sqrt()
    }

    pub fn min(&self, a: f64, b: f64) -> f64 {
        a.min(b)
    }

    pub fn max(&self, a: f64, b: f64) -> f64 {
        a.max(b)
    }
}
