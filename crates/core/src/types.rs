use serde::{Deserialize, Serialize};

use crate::estimator::active_time;

/// Length of the averaging window.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Hardware parameters: battery capacity and per-state current draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerProfile {
    /// Battery capacity in amp-hours.
    pub capacity_ah: f64,
    pub active_current_a: f64,
    pub light_sleep_current_a: f64,
    /// Also drawn for every hour outside daily usage.
    pub deep_sleep_current_a: f64,
}

/// Usage assumptions for a typical day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageProfile {
    /// Hours per day the device is awake.
    pub daily_usage_hours: f64,
    /// Fraction of active time spent in light sleep.
    pub light_sleep_coef: f64,
    /// Fraction of daily usage spent in deep sleep instead.
    pub deep_sleep_coef: f64,
}

/// Expected lifetime as whole days plus the remaining hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryLife {
    pub days: i64,
    /// Real-valued remainder in `[0, 24)`.
    pub hours: f64,
}

impl BatteryLife {
    /// Split a lifetime in hours into `(days, hours)` with a floored
    /// remainder, so `days * 24 + hours` reproduces `life_hours`.
    pub fn from_hours(life_hours: f64) -> Self {
        let hours = life_hours.rem_euclid(HOURS_PER_DAY);
        let days = ((life_hours - hours) / HOURS_PER_DAY).round() as i64;
        Self { days, hours }
    }

    pub fn total_hours(&self) -> f64 {
        self.days as f64 * HOURS_PER_DAY + self.hours
    }
}

/// Time and charge spent in one power regime over a day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeShare {
    pub hours_per_day: f64,
    pub charge_ah_per_day: f64,
}

impl RegimeShare {
    fn new(hours_per_day: f64, current_a: f64) -> Self {
        Self {
            hours_per_day,
            charge_ah_per_day: hours_per_day * current_a,
        }
    }
}

/// Breakdown of a day across the four regimes the average current blends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DutyCycle {
    /// Awake, not in light sleep.
    pub active: RegimeShare,
    /// Awake, in light sleep.
    pub light_sleep: RegimeShare,
    /// Inside daily usage but forced into deep sleep.
    pub forced_deep_sleep: RegimeShare,
    /// Outside daily usage.
    pub idle: RegimeShare,
}

impl DutyCycle {
    pub fn compute(hardware: &PowerProfile, usage: &UsageProfile) -> Self {
        let awake = active_time(usage.daily_usage_hours, usage.deep_sleep_coef);
        Self {
            active: RegimeShare::new(
                awake * (1.0 - usage.light_sleep_coef),
                hardware.active_current_a,
            ),
            light_sleep: RegimeShare::new(
                awake * usage.light_sleep_coef,
                hardware.light_sleep_current_a,
            ),
            forced_deep_sleep: RegimeShare::new(
                usage.daily_usage_hours * usage.deep_sleep_coef,
                hardware.deep_sleep_current_a,
            ),
            idle: RegimeShare::new(
                HOURS_PER_DAY - usage.daily_usage_hours,
                hardware.deep_sleep_current_a,
            ),
        }
    }

    fn shares(&self) -> [&RegimeShare; 4] {
        [&self.active, &self.light_sleep, &self.forced_deep_sleep, &self.idle]
    }

    pub fn total_hours(&self) -> f64 {
        self.shares().iter().map(|s| s.hours_per_day).sum()
    }

    pub fn total_charge_ah(&self) -> f64 {
        self.shares().iter().map(|s| s.charge_ah_per_day).sum()
    }
}
