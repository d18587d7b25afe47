use crate::calendar::{next_period, regularize, season_index, season_length};
use crate::error::ForecastError;
use chrono::NaiveDate;
use core_types::{ForecastPoint, Frequency, SeriesKind, SeriesPoint};
use nalgebra::{DMatrix, DVector};

/// Additive trend + seasonality model fitted by least squares.
///
/// `y = a + b·t + s[season(period)]`. The seasonal term is only used once the
/// history spans two full cycles. Bounds are `yhat ± z·σ·sqrt(1 + h/n)`,
/// where `σ` is the residual standard error and `h` the horizon (0 for
/// fitted history).
#[derive(Debug, Clone)]
pub struct Forecaster {
    z: f64,
    max_history: usize,
}

impl Forecaster {
    /// `max_history` caps the number of buckets in the regularised history,
    /// gaps included.
    pub fn new(interval_width: f64, max_history: usize) -> Result<Self, ForecastError> {
        if !(interval_width > 0.0 && interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval width must be in (0, 1), got {interval_width}"
            )));
        }
        if max_history == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_history must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            z: normal_quantile(0.5 + interval_width / 2.0),
            max_history,
        })
    }

    /// Fits the series and projects `steps` periods past its end.
    ///
    /// Returns the fitted history tagged `Historical` followed by exactly
    /// `steps` rows tagged `Forecast`.
    pub fn forecast(
        &self,
        series: &[SeriesPoint],
        frequency: Frequency,
        steps: usize,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        if series.is_empty() {
            return Err(ForecastError::NotEnoughData(
                "the selection has no records".to_string(),
            ));
        }
        if let Some(bad) = series.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "non-finite value at {}",
                bad.period
            )));
        }

        let history = regularize(series, frequency, self.max_history)?;
        let n = history.len();
        let design = Design::for_history(n, frequency);
        let p = design.width();

        let rows: Vec<f64> = history
            .iter()
            .enumerate()
            .flat_map(|(t, point)| design.features(t, point.period))
            .collect();
        let x = DMatrix::from_row_slice(n, p, &rows);
        let y = DVector::from_iterator(n, history.iter().map(|h| h.value));

        let beta = x
            .clone()
            .svd(true, true)
            .solve(&y, 1e-10)
            .map_err(|e| ForecastError::Fit(e.to_string()))?;

        let fitted = &x * &beta;
        let sigma = residual_sigma(&y, &fitted, p);
        tracing::debug!(observations = n, parameters = p, sigma, "Fitted forecast model.");

        let mut out = Vec::with_capacity(n + steps);
        let base = self.z * sigma;
        for (i, point) in history.iter().enumerate() {
            let yhat = fitted[i];
            out.push(ForecastPoint {
                ds: point.period,
                yhat,
                yhat_lower: yhat - base,
                yhat_upper: yhat + base,
                kind: SeriesKind::Historical,
            });
        }

        let mut period = history[n - 1].period;
        for h in 1..=steps {
            period = next_period(frequency, period)?;
            let t = n - 1 + h;
            let features = DVector::from_vec(design.features(t, period));
            let yhat = features.dot(&beta);
            let half = base * (1.0 + h as f64 / n as f64).sqrt();
            out.push(ForecastPoint {
                ds: period,
                yhat,
                yhat_lower: yhat - half,
                yhat_upper: yhat + half,
                kind: SeriesKind::Forecast,
            });
        }

        Ok(out)
    }
}

/// Which regressors the model uses for a history of a given length.
struct Design {
    trend: bool,
    seasonal: Option<Frequency>,
}

impl Design {
    fn for_history(n: usize, frequency: Frequency) -> Self {
        Self {
            trend: n >= 2,
            seasonal: (n >= 2 * season_length(frequency)).then_some(frequency),
        }
    }

    fn width(&self) -> usize {
        1 + usize::from(self.trend) + self.seasonal.map_or(0, |f| season_length(f) - 1)
    }

    fn features(&self, t: usize, period: NaiveDate) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        if self.trend {
            row.push(t as f64);
        }
        if let Some(frequency) = self.seasonal {
            let index = season_index(frequency, period);
            // Season 0 is the baseline absorbed by the intercept.
            row.extend((1..season_length(frequency)).map(|k| if k == index { 1.0 } else { 0.0 }));
        }
        row
    }
}

/// Residual standard error; falls back to the sample standard deviation
/// when the model leaves no degrees of freedom.
fn residual_sigma(y: &DVector<f64>, fitted: &DVector<f64>, parameters: usize) -> f64 {
    let n = y.len();
    if n > parameters {
        let sse = (y - fitted).norm_squared();
        (sse / (n - parameters) as f64).sqrt()
    } else if n > 1 {
        let mean = y.mean();
        let var = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    } else {
        0.0
    }
}

/// Standard normal quantile (Abramowitz & Stegun 26.2.23, |error| < 4.5e-4).
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if p < 0.5 {
        return -normal_quantile(1.0 - p);
    }
    let t = (-2.0 * (1.0 - p).ln()).sqrt();
    let num = 2.515517 + 0.802853 * t + 0.010328 * t * t;
    let den = 1.0 + 1.432788 * t + 0.189269 * t * t + 0.001308 * t * t * t;
    t - num / den
}
