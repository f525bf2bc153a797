//! Filter modes and shared parameters.

use std::fmt;
use std::str::FromStr;

/// Per-signal filter mode.
///
/// Stored as a `u8` so the control surface can hot-swap modes through an
/// atomic; a change takes effect on the next tick that observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SignalMode {
    /// No filtering; output equals input.
    #[default]
    None = 0,
    /// Digital gating (binary debounce, or discrete gating for multi-bit
    /// fields).
    Digital = 1,
    /// Analog rate limiting.
    Analog = 2,
}

impl SignalMode {
    /// Decode from the atomic representation; unknown values fall back to
    /// `None`.
    #[must_use]
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Digital,
            2 => Self::Analog,
            _ => Self::None,
        }
    }

    /// The persisted config token (`none`, `digital`, `analog`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Digital => "digital",
            Self::Analog => "analog",
        }
    }
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "digital" => Ok(Self::Digital),
            "analog" => Ok(Self::Analog),
            _ => Err(()),
        }
    }
}

/// Shared filter parameters, hot-swappable at tick granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Analog rate limit as percent of full range per tick, in `[0, 100]`.
    pub analog_rate_pct: f32,
    /// Minimum hold time before a digital press is promoted, seconds, >= 0.
    pub digital_min_hold_sec: f64,
}

impl FilterParams {
    /// Full-scale range used by the rate limiter.
    ///
    /// All signal classes use 2.0 (the span of a [-1, 1] axis).
    pub const RANGE: f32 = 2.0;

    /// Maximum per-tick step for the current rate percentage.
    #[inline]
    #[must_use]
    pub fn max_step(&self) -> f32 {
        (self.analog_rate_pct / 100.0) * Self::RANGE
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            analog_rate_pct: 12.5,
            digital_min_hold_sec: 0.005,
        }
    }
}
