use super::SpeedError;
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt::Display;

const TINY: f64 = 1.0e-20;

/// ordinary least squares fit of `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// pearson correlation coefficient
    pub r: f64,
    pub r_squared: f64,
    /// two-sided p-value for the null hypothesis of zero slope, from a
    /// t distribution with n - 2 degrees of freedom
    pub p_value: f64,
    /// standard error of the slope
    pub stderr: f64,
    pub n: usize,
}

impl LinearRegression {
    pub fn fit(x: &[f64], y: &[f64]) -> Result<LinearRegression, SpeedError> {
        if x.len() != y.len() {
            return Err(SpeedError::LengthMismatch(x.len(), y.len()));
        }
        let n = x.len();
        if n < 3 {
            return Err(SpeedError::InsufficientData(n));
        }
        let nf = n as f64;
        let x_mean = x.iter().sum::<f64>() / nf;
        let y_mean = y.iter().sum::<f64>() / nf;
        let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
        for (xi, yi) in x.iter().zip(y) {
            let dx = xi - x_mean;
            let dy = yi - y_mean;
            ssxm += dx * dx;
            ssym += dy * dy;
            ssxym += dx * dy;
        }
        if ssxm == 0.0 {
            return Err(SpeedError::ConstantPredictor);
        }

        let r_den = (ssxm * ssym).sqrt();
        let r = if r_den == 0.0 {
            0.0
        } else {
            (ssxym / r_den).clamp(-1.0, 1.0)
        };
        let slope = ssxym / ssxm;
        let intercept = y_mean - slope * x_mean;

        let df = nf - 2.0;
        let t = r * (df / ((1.0 - r) * (1.0 + r) + TINY)).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| SpeedError::DistributionError(e.to_string()))?;
        let p_value = (2.0 * dist.sf(t.abs())).min(1.0);
        let stderr = ((1.0 - r * r) * ssym / ssxm / df).sqrt();

        Ok(LinearRegression {
            slope,
            intercept,
            r,
            r_squared: r * r,
            p_value,
            stderr,
            n,
        })
    }
}

impl Display for LinearRegression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solved linear regression over {} points:", self.n)?;
        writeln!(
            f,
            "GPS estimate = {:.6} * app estimate + {:.6}",
            self.slope, self.intercept
        )?;
        write!(
            f,
            "r: {:.6}\tR-squared: {:.6}\tp-value: {:.6}\tstandard error: {:.6}",
            self.r, self.r_squared, self.p_value, self.stderr
        )
    }
}
