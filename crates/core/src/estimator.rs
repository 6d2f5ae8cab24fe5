use serde::Serialize;

use crate::types::{BatteryLife, DutyCycle, HOURS_PER_DAY, PowerProfile, UsageProfile};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EstimateError {
    /// The weighted average current is zero, so the lifetime has no finite value.
    #[error("undefined average current: weighted draw over 24h is zero")]
    UndefinedAverageCurrent,
    /// Capacity over average current overflowed or an input was NaN.
    #[error("lifetime is not a finite number of hours: {life_hours}")]
    NonFiniteLifetime { life_hours: f64 },
}

/// Full result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub hardware: PowerProfile,
    pub usage: UsageProfile,
    pub active_time_hours: f64,
    pub average_current_a: f64,
    pub life_hours: f64,
    pub life: BatteryLife,
    pub duty_cycle: DutyCycle,
}

/// Hours per day spent awake and not forced into deep sleep.
pub fn active_time(daily_usage_hours: f64, deep_sleep_coef: f64) -> f64 {
    daily_usage_hours * (1.0 - deep_sleep_coef)
}

/// Time-weighted mean current over a 24-hour day.
pub fn average_current(hardware: &PowerProfile, usage: &UsageProfile) -> f64 {
    let awake = active_time(usage.daily_usage_hours, usage.deep_sleep_coef);
    let awake_draw = (1.0 - usage.light_sleep_coef) * hardware.active_current_a
        + usage.light_sleep_coef * hardware.light_sleep_current_a;

    (awake * awake_draw
        + usage.daily_usage_hours * usage.deep_sleep_coef * hardware.deep_sleep_current_a
        + (HOURS_PER_DAY - usage.daily_usage_hours) * hardware.deep_sleep_current_a)
        / HOURS_PER_DAY
}

/// Evaluate the lifetime of `hardware` under `usage`.
///
/// Inputs are not range-checked: out-of-range values yield whatever the
/// formula produces. Fails on a zero average current or a lifetime that is
/// not finite.
pub fn evaluate(hardware: &PowerProfile, usage: &UsageProfile) -> Result<Estimate, EstimateError> {
    let active_time_hours = active_time(usage.daily_usage_hours, usage.deep_sleep_coef);
    let average_current_a = average_current(hardware, usage);

    if average_current_a == 0.0 {
        tracing::warn!(
            capacity_ah = hardware.capacity_ah,
            daily_usage_hours = usage.daily_usage_hours,
            "average current is zero, lifetime undefined"
        );
        return Err(EstimateError::UndefinedAverageCurrent);
    }

    let life_hours = hardware.capacity_ah / average_current_a;
    if !life_hours.is_finite() {
        tracing::warn!(life_hours, average_current_a, "lifetime is not finite");
        return Err(EstimateError::NonFiniteLifetime { life_hours });
    }
    let life = BatteryLife::from_hours(life_hours);

    tracing::debug!(
        active_time_hours,
        average_current_a,
        life_hours,
        days = life.days,
        hours = life.hours,
        "battery life estimated"
    );

    Ok(Estimate {
        hardware: *hardware,
        usage: *usage,
        active_time_hours,
        average_current_a,
        life_hours,
        life,
        duty_cycle: DutyCycle::compute(hardware, usage),
    })
}

/// Seven-scalar entry point returning `(days, hours)` as a [`BatteryLife`].
pub fn estimate(
    capacity_ah: f64,
    active_current_a: f64,
    light_sleep_current_a: f64,
    deep_sleep_current_a: f64,
    daily_usage_hours: f64,
    light_sleep_coef: f64,
    deep_sleep_coef: f64,
) -> Result<BatteryLife, EstimateError> {
    let hardware = PowerProfile {
        capacity_ah,
        active_current_a,
        light_sleep_current_a,
        deep_sleep_current_a,
    };
    let usage = UsageProfile {
        daily_usage_hours,
        light_sleep_coef,
        deep_sleep_coef,
    };
    evaluate(&hardware, &usage).map(|e| e.life)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * a.abs().max(b.abs())
    }

    fn hw(capacity_ah: f64, active: f64, light: f64, deep: f64) -> PowerProfile {
        PowerProfile {
            capacity_ah,
            active_current_a: active,
            light_sleep_current_a: light,
            deep_sleep_current_a: deep,
        }
    }

    fn usage(daily: f64, light_coef: f64, deep_coef: f64) -> UsageProfile {
        UsageProfile {
            daily_usage_hours: daily,
            light_sleep_coef: light_coef,
            deep_sleep_coef: deep_coef,
        }
    }

    #[test]
    fn active_time_reference() {
        assert!((active_time(8.0, 0.5) - 4.0).abs() < f64::EPSILON);
        assert_eq!(active_time(8.0, 1.0), 0.0);
        assert_eq!(active_time(0.0, 0.3), 0.0);
    }

    #[test]
    fn reference_scenario_matches_formula() {
        let e = evaluate(&hw(2.6, 0.050, 0.001, 0.00001), &usage(8.0, 0.7, 0.5)).unwrap();
        let expected_avg =
            ((4.0 * (0.3 * 0.05 + 0.7 * 0.001)) + (8.0 * 0.5 * 0.00001) + (16.0 * 0.00001)) / 24.0;
        let expected_life = 2.6 / expected_avg;

        assert!(rel_eq(e.active_time_hours, 4.0, 1e-9));
        assert!(rel_eq(e.average_current_a, expected_avg, 1e-9));
        assert!(rel_eq(e.life_hours, expected_life, 1e-9));
        assert_eq!(e.life.days, (expected_life / 24.0).floor() as i64);
        assert!(rel_eq(e.life.hours, expected_life % 24.0, 1e-9));
    }

    #[test]
    fn reference_scenario_is_about_41_days() {
        let life = estimate(2.6, 0.050, 0.001, 0.00001, 8.0, 0.7, 0.5).unwrap();
        assert_eq!(life.days, 41);
        assert!((life.hours - 6.48).abs() < 0.01, "hours = {}", life.hours);
    }

    #[test]
    fn total_hours_equals_capacity_over_average() {
        let h = hw(1.2, 0.08, 0.004, 0.0002);
        let u = usage(13.5, 0.25, 0.4);
        let e = evaluate(&h, &u).unwrap();
        assert!(rel_eq(e.life.total_hours(), h.capacity_ah / e.average_current_a, 1e-9));
        assert!(e.life.hours >= 0.0 && e.life.hours < 24.0);
        assert!(e.life.days >= 0);
    }

    #[test]
    fn larger_capacity_never_shortens_life() {
        let u = usage(8.0, 0.7, 0.5);
        let small = evaluate(&hw(1.0, 0.05, 0.001, 0.00001), &u).unwrap();
        let large = evaluate(&hw(3.0, 0.05, 0.001, 0.00001), &u).unwrap();
        assert!(large.life_hours >= small.life_hours);
    }

    #[test]
    fn higher_currents_never_extend_life() {
        let u = usage(8.0, 0.7, 0.5);
        let base = evaluate(&hw(2.6, 0.05, 0.001, 0.00001), &u).unwrap().life_hours;
        for h in [
            hw(2.6, 0.10, 0.001, 0.00001),
            hw(2.6, 0.05, 0.010, 0.00001),
            hw(2.6, 0.05, 0.001, 0.00010),
        ] {
            assert!(evaluate(&h, &u).unwrap().life_hours <= base);
        }
    }

    #[test]
    fn zero_light_coef_drops_light_current() {
        let u = usage(10.0, 0.0, 0.2);
        let a = average_current(&hw(2.0, 0.05, 0.001, 0.0001), &u);
        let b = average_current(&hw(2.0, 0.05, 0.9, 0.0001), &u);
        assert_eq!(a, b);
    }

    #[test]
    fn full_deep_sleep_uses_only_deep_current() {
        let e = evaluate(&hw(2.6, 0.05, 0.001, 0.00002), &usage(8.0, 0.7, 1.0)).unwrap();
        assert_eq!(e.active_time_hours, 0.0);
        assert!(rel_eq(e.average_current_a, 0.00002, 1e-12));
    }

    #[test]
    fn idle_day_averages_to_deep_current() {
        let avg = average_current(&hw(2.6, 0.05, 0.001, 0.00003), &usage(0.0, 0.7, 0.5));
        assert!(rel_eq(avg, 0.00003, 1e-12));
    }

    #[test]
    fn zero_currents_are_undefined() {
        let err = estimate(2.6, 0.0, 0.0, 0.0, 8.0, 0.7, 0.5).unwrap_err();
        assert_eq!(err, EstimateError::UndefinedAverageCurrent);
    }

    #[test]
    fn duty_cycle_charge_matches_average() {
        let e = evaluate(&hw(2.6, 0.05, 0.001, 0.00001), &usage(8.0, 0.7, 0.5)).unwrap();
        assert!(rel_eq(e.duty_cycle.total_charge_ah() / HOURS_PER_DAY, e.average_current_a, 1e-12));
    }

    #[test]
    fn out_of_range_inputs_pass_through() {
        // negative coefficient is not rejected
        let life = estimate(2.6, 0.05, 0.001, 0.00001, 8.0, -0.5, 0.5).unwrap();
        assert!(life.total_hours().is_finite());
    }

    #[test]
    fn overflowing_lifetime_is_an_error() {
        let err = estimate(1e300, 1e-300, 0.0, 0.0, 8.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            EstimateError::NonFiniteLifetime { life_hours } if life_hours.is_infinite()
        ));
    }

    #[test]
    fn nan_current_is_an_error() {
        let err = estimate(2.6, f64::NAN, 0.001, 0.00001, 8.0, 0.7, 0.5).unwrap_err();
        assert!(matches!(
            err,
            EstimateError::NonFiniteLifetime { life_hours } if life_hours.is_nan()
        ));
    }
}
