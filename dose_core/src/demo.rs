//! Built-in demo schedule and missed-dose scenarios.
//!
//! Three common morning/evening medications with different food requirements.
//! Used by the CLI when no schedule file is configured.

use crate::{Constraint, Medication, MissedDose, Result, Schedule};
use chrono::{Duration, NaiveTime};

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// The demo medications, in display order
pub fn demo_medications() -> Vec<Medication> {
    vec![
        Medication::new("Levothyroxine", "100mcg", "once daily", vec![at(6, 0)])
            .with_food(false)
            .empty_stomach(true)
            .min_interval(Duration::hours(24))
            .max_daily_doses(1),
        Medication::new("Metformin", "500mg", "twice daily", vec![at(8, 0), at(20, 0)])
            .with_food(true)
            .empty_stomach(false)
            .min_interval(Duration::hours(8))
            .max_daily_doses(2),
        Medication::new("Lisinopril", "10mg", "once daily", vec![at(8, 0)])
            .with_food(false)
            .empty_stomach(false)
            .min_interval(Duration::hours(24))
            .max_daily_doses(1),
    ]
}

/// Build the demo schedule with the given constraints attached
pub fn build_demo_schedule(constraints: Vec<Constraint>) -> Result<Schedule> {
    Schedule::new(demo_medications(), constraints)
}

/// A titled missed-dose situation against the demo schedule
#[derive(Clone, Debug)]
pub struct Scenario {
    pub title: &'static str,
    pub situation: &'static str,
    pub missed: MissedDose,
}

/// One scenario per rule-based outcome: on time, delayed, too late
pub fn demo_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            title: "Missed Morning Levothyroxine",
            situation: "Levothyroxine is due at 06:00 on an empty stomach. It is now 08:00, \
                        when Metformin is due with breakfast.",
            missed: MissedDose::new("Levothyroxine", at(6, 0), at(8, 0)).with_reason("Overslept"),
        },
        Scenario {
            title: "Late Evening Metformin",
            situation: "Metformin is due at 20:00 with dinner. It is now 23:30.",
            missed: MissedDose::new("Metformin", at(20, 0), at(23, 30))
                .with_reason("Forgot after dinner"),
        },
        Scenario {
            title: "Forgotten Morning Dose",
            situation: "Lisinopril was due at 08:00. It is now 18:00.",
            missed: MissedDose::new("Lisinopril", at(8, 0), at(18, 0))
                .with_reason("Left pills at home"),
        },
    ]
}
