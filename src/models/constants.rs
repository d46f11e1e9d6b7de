/// One minute in milliseconds.
pub const MINUTE_MS: i64 = 60_000;

/// One hour in milliseconds.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

/// One day in milliseconds.
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Look-back window for blood pressure rules.
pub const PRESSURE_WINDOW_MS: i64 = DAY_MS;

/// Look-back window for saturation rules.
pub const SATURATION_WINDOW_MS: i64 = 10 * MINUTE_MS;

/// Shorter look-back used by the percentage-based saturation drop rule.
pub const SATURATION_PERCENT_DROP_WINDOW_MS: i64 = 5 * MINUTE_MS;

/// Look-back window for ECG rules.
pub const ECG_WINDOW_MS: i64 = HOUR_MS;

/// Clinical bounds used by the default rule set.
pub mod bounds {
    pub const SYSTOLIC_LOW: f64 = 90.0;
    pub const SYSTOLIC_HIGH: f64 = 180.0;
    pub const DIASTOLIC_LOW: f64 = 60.0;
    pub const DIASTOLIC_HIGH: f64 = 120.0;
    pub const SATURATION_LOW: f64 = 92.0;
    pub const HEART_RATE_LOW: f64 = 50.0;

    /// Minimum per-step change for a pressure trend.
    pub const PRESSURE_TREND_DELTA: f64 = 10.0;

    /// Minimum drop (in saturation points) between consecutive readings.
    pub const SATURATION_DROP_POINTS: f64 = 5.0;

    /// Minimum drop (in percent of the earlier reading) between consecutive readings.
    pub const SATURATION_DROP_PERCENT: f64 = 5.0;

    /// Allowed deviation of an ECG interval from the mean, as a fraction of the mean.
    pub const INTERVAL_TOLERANCE: f64 = 0.1;
}

/// Defaults for the bistable alert simulator.
pub mod simulator {
    /// Poisson rate of trigger events per step.
    pub const DEFAULT_LAMBDA: f64 = 0.1;

    /// Probability that a triggered alert resolves on a given step.
    pub const DEFAULT_RESOLVE_PROBABILITY: f64 = 0.9;
}
