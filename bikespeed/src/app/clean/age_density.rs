use super::{CleanError, CleanedRow};
use rand::{seq::IndexedRandom, Rng};
use rand_distr::{Distribution, Normal};

/// an age range coded in the user survey, in years.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgeBracket {
    pub code: u8,
    pub lower: f64,
    pub upper: f64,
}

pub const AGE_BRACKETS: [AgeBracket; 6] = [
    AgeBracket { code: 1, lower: 0.0, upper: 18.0 },
    AgeBracket { code: 2, lower: 18.0, upper: 25.0 },
    AgeBracket { code: 3, lower: 25.0, upper: 35.0 },
    AgeBracket { code: 4, lower: 35.0, upper: 50.0 },
    AgeBracket { code: 5, lower: 50.0, upper: 65.0 },
    AgeBracket { code: 6, lower: 65.0, upper: 85.0 },
];

impl AgeBracket {
    pub fn for_code(code: u8) -> Option<&'static AgeBracket> {
        AGE_BRACKETS.iter().find(|b| b.code == code)
    }

    pub fn contains(&self, age: f64) -> bool {
        self.lower <= age && age <= self.upper
    }
}

/// gaussian kernel density estimate of rider age.
pub struct AgeDensity {
    samples: Vec<f64>,
    kernel: Normal<f64>,
}

impl AgeDensity {
    /// fits the density to ages drawn uniformly within each rider's bracket
    /// and then resampled with replacement to `resample_size` points.
    ///
    /// returns None when no age code maps to a bracket.
    pub fn fit<R: Rng>(
        codes: &[u8],
        resample_size: usize,
        bandwidth: f64,
        rng: &mut R,
    ) -> Result<Option<AgeDensity>, CleanError> {
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(CleanError::AgeDensityError(format!(
                "kernel bandwidth must be a positive number, found {bandwidth}"
            )));
        }
        if resample_size == 0 {
            return Err(CleanError::AgeDensityError(String::from(
                "resample size must be at least 1",
            )));
        }
        let uniform: Vec<f64> = codes
            .iter()
            .filter_map(|code| AgeBracket::for_code(*code))
            .map(|b| rng.random_range(b.lower..b.upper))
            .collect();
        if uniform.is_empty() {
            return Ok(None);
        }
        let samples = (0..resample_size)
            .filter_map(|_| uniform.choose(rng).copied())
            .collect();
        let kernel =
            Normal::new(0.0, bandwidth).map_err(|e| CleanError::AgeDensityError(e.to_string()))?;
        Ok(Some(AgeDensity { samples, kernel }))
    }

    /// one draw from the density. None only if the density holds no samples,
    /// which `fit` rules out.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<f64> {
        let center = self.samples.choose(rng)?;
        Some(center + self.kernel.sample(rng))
    }
}

/// gives every row with a known age bracket a continuous age drawn from the
/// density and falling within its bracket.
///
/// for each bracket as many draws as there are rows (and at least
/// `resample_size`) are made and those that land in the bracket are sampled
/// with replacement. a bracket none of whose draws land in it leaves its rows
/// without a sample.
pub fn sample_ages<R: Rng>(
    rows: &mut [CleanedRow],
    resample_size: usize,
    bandwidth: f64,
    rng: &mut R,
) -> Result<(), CleanError> {
    let codes: Vec<u8> = rows.iter().map(|r| r.age).collect();
    let Some(density) = AgeDensity::fit(&codes, resample_size, bandwidth, rng)? else {
        log::warn!("no rows with a known age bracket, skipping age sampling");
        return Ok(());
    };
    for bracket in AGE_BRACKETS.iter() {
        if !codes.contains(&bracket.code) {
            continue;
        }
        let in_range: Vec<f64> = (0..rows.len().max(resample_size))
            .filter_map(|_| density.sample(rng))
            .filter(|age| bracket.contains(*age))
            .collect();
        if in_range.is_empty() {
            log::warn!("no age draws fell within bracket {}", bracket.code);
            continue;
        }
        for row in rows.iter_mut().filter(|r| r.age == bracket.code) {
            row.age_sample = in_range.choose(rng).copied();
        }
    }
    Ok(())
}
