//! Core domain types for missed-dose rescheduling.
//!
//! This module defines the value types shared by the rule loader and the
//! decision engine:
//! - Medications and the constraints between them
//! - Schedules (see `schedule.rs` for the queries)
//! - Missed-dose events and the proposals produced for them
//!
//! Construction is permissive: nothing here validates beyond type shape.
//! Consumers (the engine, `Schedule::new`) enforce what they rely on.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Medication
// ============================================================================

/// A single medication with its scheduling requirements
#[derive(Clone, Debug, PartialEq)]
pub struct Medication {
    pub name: String,
    /// Display only, e.g. "500mg"
    pub dosage: String,
    /// Display only, e.g. "twice daily"
    pub frequency: String,
    pub scheduled_times: Vec<NaiveTime>,
    pub with_food: Option<bool>,
    pub empty_stomach: Option<bool>,
    pub min_interval: Option<Duration>,
    pub max_daily_doses: u32,
    pub interacts_with: Vec<String>,
    pub interaction_gap: Option<Duration>,
}

impl Medication {
    /// Create a medication with no food, interval or interaction requirements
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
        scheduled_times: Vec<NaiveTime>,
    ) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            scheduled_times,
            with_food: None,
            empty_stomach: None,
            min_interval: None,
            max_daily_doses: 1,
            interacts_with: Vec::new(),
            interaction_gap: None,
        }
    }

    pub fn with_food(mut self, with_food: bool) -> Self {
        self.with_food = Some(with_food);
        self
    }

    pub fn empty_stomach(mut self, empty_stomach: bool) -> Self {
        self.empty_stomach = Some(empty_stomach);
        self
    }

    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    pub fn max_daily_doses(mut self, doses: u32) -> Self {
        self.max_daily_doses = doses;
        self
    }

    /// Record an interacting drug and the gap to keep between the two
    pub fn interacts_with(mut self, drug: impl Into<String>, gap: Option<Duration>) -> Self {
        self.interacts_with.push(drug.into());
        if gap.is_some() {
            self.interaction_gap = gap;
        }
        self
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Kind of relation a constraint declares
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    TimeGap,
    FoodRequirement,
    DrugInteraction,
    /// Any other `type` value, kept verbatim ("unknown" when unset)
    Other(String),
}

impl ConstraintKind {
    /// Parse the `type` field of a rule entry
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "time_gap" => ConstraintKind::TimeGap,
            "food_requirement" => ConstraintKind::FoodRequirement,
            "drug_interaction" => ConstraintKind::DrugInteraction,
            other => ConstraintKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConstraintKind::TimeGap => "time_gap",
            ConstraintKind::FoodRequirement => "food_requirement",
            ConstraintKind::DrugInteraction => "drug_interaction",
            ConstraintKind::Other(s) => s,
        }
    }
}

/// A scheduling rule between one or two medications
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub drug_a: String,
    pub drug_b: Option<String>,
    /// `None` means no minimum gap, which is different from a zero gap
    pub min_gap: Option<Duration>,
    pub description: String,
}

impl Constraint {
    /// Whether either side of the relation names `drug` (case-insensitive)
    pub fn involves(&self, drug: &str) -> bool {
        let drug = drug.to_lowercase();
        self.drug_a.to_lowercase() == drug
            || self
                .drug_b
                .as_deref()
                .is_some_and(|b| b.to_lowercase() == drug)
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// An ordered set of medications plus the constraints that apply to them
///
/// Built through `Schedule::new`, which rejects duplicate medication names.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    pub(crate) medications: Vec<Medication>,
    pub(crate) constraints: Vec<Constraint>,
}

// ============================================================================
// Missed doses and proposals
// ============================================================================

/// A dose that was not taken at its scheduled time
///
/// Times are wall-clock times of day without a date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedDose {
    pub medication_name: String,
    pub scheduled_time: NaiveTime,
    pub current_time: NaiveTime,
    pub reason: String,
}

impl MissedDose {
    pub fn new(
        medication_name: impl Into<String>,
        scheduled_time: NaiveTime,
        current_time: NaiveTime,
    ) -> Self {
        Self {
            medication_name: medication_name.into(),
            scheduled_time,
            current_time,
            reason: "Missed dose".to_string(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// What the patient should do about the missed dose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseAction {
    /// Take it at the current time
    TakeNow,
    /// Take it at the proposed `new_time`
    TakeAt,
    /// Skip it and resume the normal schedule
    Skip,
    /// No recommendation could be computed
    Error,
}

/// The engine's recommendation for a missed dose
///
/// `new_time` is always populated. For `DoseAction::Skip` it holds the original
/// scheduled time; use `recommended_time()` to get the "take at" time if any.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RescheduleProposal {
    pub missed_dose: MissedDose,
    pub action: DoseAction,
    pub new_time: NaiveTime,
    pub reasoning: String,
    pub affected_medications: Vec<String>,
    pub warnings: Vec<String>,
}

impl RescheduleProposal {
    /// The time to take the dose, or `None` when the dose should be skipped
    pub fn recommended_time(&self) -> Option<NaiveTime> {
        match self.action {
            DoseAction::Skip => None,
            _ => Some(self.new_time),
        }
    }

    pub fn is_skip(&self) -> bool {
        self.action == DoseAction::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_medication_defaults() {
        let med = Medication::new("Test Drug", "100mg", "once daily", vec![t(8, 0)]);
        assert_eq!(med.max_daily_doses, 1);
        assert!(med.with_food.is_none());
        assert!(med.empty_stomach.is_none());
        assert!(med.interacts_with.is_empty());
    }

    #[test]
    fn test_medication_with_food_flags() {
        let med = Medication::new("Test Drug", "100mg", "once daily", vec![t(8, 0)])
            .with_food(true)
            .empty_stomach(false);
        assert_eq!(med.with_food, Some(true));
        assert_eq!(med.empty_stomach, Some(false));
    }

    #[test]
    fn test_interaction_gap_kept_from_last_explicit_gap() {
        let med = Medication::new("Levothyroxine", "100mcg", "once daily", vec![t(6, 0)])
            .interacts_with("Calcium", Some(Duration::hours(4)))
            .interacts_with("Iron", None);
        assert_eq!(med.interacts_with, vec!["Calcium", "Iron"]);
        assert_eq!(med.interaction_gap, Some(Duration::hours(4)));
    }

    #[test]
    fn test_constraint_kind_parse() {
        assert_eq!(ConstraintKind::parse("time_gap"), ConstraintKind::TimeGap);
        assert_eq!(
            ConstraintKind::parse("Drug_Interaction"),
            ConstraintKind::DrugInteraction
        );
        match ConstraintKind::parse("unknown") {
            ConstraintKind::Other(s) => assert_eq!(s, "unknown"),
            _ => panic!("Expected Other variant"),
        }
    }

    #[test]
    fn test_constraint_involves_either_side() {
        let c = Constraint {
            kind: ConstraintKind::TimeGap,
            drug_a: "Levothyroxine".into(),
            drug_b: Some("Calcium".into()),
            min_gap: Some(Duration::hours(4)),
            description: "Keep apart".into(),
        };
        assert!(c.involves("levothyroxine"));
        assert!(c.involves("CALCIUM"));
        assert!(!c.involves("Metformin"));
    }

    #[test]
    fn test_skip_has_no_recommended_time() {
        let missed = MissedDose::new("Metformin", t(8, 0), t(18, 0));
        let proposal = RescheduleProposal {
            missed_dose: missed,
            action: DoseAction::Skip,
            new_time: t(8, 0),
            reasoning: "Skip this dose".into(),
            affected_medications: vec![],
            warnings: vec![],
        };
        assert!(proposal.is_skip());
        assert_eq!(proposal.recommended_time(), None);
        assert_eq!(proposal.new_time, t(8, 0));
    }

    #[test]
    fn test_missed_dose_default_reason() {
        let missed = MissedDose::new("Metformin", t(8, 0), t(9, 0));
        assert_eq!(missed.reason, "Missed dose");
        assert_eq!(missed.with_reason("Overslept").reason, "Overslept");
    }
}
