/// Number of lagged prices at the head of every feature vector.
pub const LAG_COUNT: usize = 7;

pub const ROLLING_MEAN_WINDOWS: [usize; 3] = [3, 7, 14];
pub const ROLLING_STD_WINDOWS: [usize; 2] = [7, 14];
pub const MOMENTUM_OFFSETS: [usize; 2] = [3, 7];

/// Longest trailing window read by any feature.
pub const LONGEST_WINDOW: usize = 14;

/// Leading rows of a series that never produce a feature row.
pub const WARMUP_ROWS: usize = if LAG_COUNT > LONGEST_WINDOW {
    LAG_COUNT
} else {
    LONGEST_WINDOW
};

pub const FEATURE_COUNT: usize = LAG_COUNT
    + ROLLING_MEAN_WINDOWS.len()
    + ROLLING_STD_WINDOWS.len()
    + MOMENTUM_OFFSETS.len();

/// Ordered list of feature names.
/// The scaler and the regression coefficients are positional, so this order
/// is the layout of every `FeatureVector`.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "lag_1",
    "lag_2",
    "lag_3",
    "lag_4",
    "lag_5",
    "lag_6",
    "lag_7",
    "rolling_mean_3",
    "rolling_mean_7",
    "rolling_mean_14",
    "rolling_std_7",
    "rolling_std_14",
    "momentum_3",
    "momentum_7",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Pushes `newest` into the `lag_1` slot and moves every older lag back by one.
/// `lag_7` falls off; all non-lag columns are returned unchanged.
pub fn shift_lags(features: &FeatureVector, newest: f64) -> FeatureVector {
    let mut shifted = *features;
    shifted.copy_within(0..LAG_COUNT - 1, 1);
    shifted[0] = newest;
    shifted
}
