//! Schedule construction, lookup queries and schedule file loading.
//!
//! Schedule files are TOML documents with one `[[medications]]` table per
//! medication. They are read-only input; nothing here writes them back.

use crate::duration::{parse_duration, parse_time};
use crate::{Constraint, Error, Medication, Result, Schedule};
use chrono::Duration;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

impl Schedule {
    /// Build a schedule, rejecting duplicate medication names
    ///
    /// Names are compared case-insensitively, matching how lookups work.
    pub fn new(medications: Vec<Medication>, constraints: Vec<Constraint>) -> Result<Self> {
        let mut seen = HashSet::new();
        for med in &medications {
            if !seen.insert(med.name.to_lowercase()) {
                return Err(Error::DuplicateMedication(med.name.clone()));
            }
        }

        Ok(Self {
            medications,
            constraints,
        })
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Find a medication by name (case-insensitive)
    pub fn get_medication(&self, name: &str) -> Option<&Medication> {
        self.medications.iter().find(|m| m.is_named(name))
    }

    /// All constraints naming `drug` on either side, in declaration order
    pub fn get_constraints_for_drug(&self, drug: &str) -> Vec<&Constraint> {
        self.constraints.iter().filter(|c| c.involves(drug)).collect()
    }

    /// Every medication except the named one, in schedule order
    pub fn other_medications<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Medication> {
        self.medications.iter().filter(move |m| !m.is_named(name))
    }

    /// Load medications from a TOML schedule file and attach `constraints`
    pub fn load_from(path: &Path, constraints: Vec<Constraint>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let schedule = Self::from_toml_str(&contents, constraints)?;
        tracing::info!(
            "Loaded {} medications from {:?}",
            schedule.medications.len(),
            path
        );
        Ok(schedule)
    }

    /// Parse medications from TOML text and attach `constraints`
    pub fn from_toml_str(contents: &str, constraints: Vec<Constraint>) -> Result<Self> {
        let file: ScheduleFile = toml::from_str(contents)?;
        let medications = file
            .medications
            .into_iter()
            .map(Medication::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(medications, constraints)
    }
}

/// Schedule file format
#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default)]
    medications: Vec<MedicationEntry>,
}

/// One `[[medications]]` table
#[derive(Debug, Deserialize)]
struct MedicationEntry {
    name: String,
    dosage: String,
    frequency: String,
    times: Vec<String>,
    with_food: Option<bool>,
    empty_stomach: Option<bool>,
    min_interval: Option<String>,
    #[serde(default = "default_max_daily_doses")]
    max_daily_doses: u32,
    #[serde(default)]
    interacts_with: Vec<String>,
    interaction_gap: Option<String>,
}

fn default_max_daily_doses() -> u32 {
    1
}

fn optional_duration(value: Option<&str>) -> Result<Option<Duration>> {
    match value {
        Some(s) => parse_duration(s),
        None => Ok(None),
    }
}

impl TryFrom<MedicationEntry> for Medication {
    type Error = Error;

    fn try_from(entry: MedicationEntry) -> Result<Self> {
        if entry.times.is_empty() {
            return Err(Error::Config(format!(
                "Medication {} has no scheduled times",
                entry.name
            )));
        }
        if entry.max_daily_doses == 0 {
            return Err(Error::Config(format!(
                "Medication {} must allow at least one daily dose",
                entry.name
            )));
        }

        let scheduled_times = entry
            .times
            .iter()
            .map(|t| parse_time(t))
            .collect::<Result<Vec<_>>>()?;

        Ok(Medication {
            name: entry.name,
            dosage: entry.dosage,
            frequency: entry.frequency,
            scheduled_times,
            with_food: entry.with_food,
            empty_stomach: entry.empty_stomach,
            min_interval: optional_duration(entry.min_interval.as_deref())?,
            max_daily_doses: entry.max_daily_doses,
            interacts_with: entry.interacts_with,
            interaction_gap: optional_duration(entry.interaction_gap.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstraintKind;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn constraint(a: &str, b: Option<&str>, description: &str) -> Constraint {
        Constraint {
            kind: ConstraintKind::TimeGap,
            drug_a: a.into(),
            drug_b: b.map(String::from),
            min_gap: None,
            description: description.into(),
        }
    }

    fn create_test_schedule() -> Schedule {
        let drug_a = Medication::new("Drug A", "50mg", "once daily", vec![t(8, 0)]);
        let drug_b = Medication::new("Drug B", "100mg", "twice daily", vec![t(8, 0), t(20, 0)]);
        Schedule::new(
            vec![drug_a, drug_b],
            vec![
                constraint("Drug A", Some("Drug B"), "first"),
                constraint("Drug C", None, "second"),
                constraint("Drug C", Some("drug a"), "third"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_get_medication() {
        let schedule = create_test_schedule();
        let found = schedule.get_medication("Drug A").unwrap();
        assert_eq!(found.name, "Drug A");
    }

    #[test]
    fn test_get_medication_case_insensitive() {
        let schedule = create_test_schedule();
        let upper = schedule.get_medication("DRUG B").unwrap();
        let lower = schedule.get_medication("drug b").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_get_medication_not_found() {
        let schedule = create_test_schedule();
        assert!(schedule.get_medication("Drug C").is_none());
    }

    #[test]
    fn test_constraints_for_drug_in_declaration_order() {
        let schedule = create_test_schedule();
        let found: Vec<_> = schedule
            .get_constraints_for_drug("DRUG A")
            .into_iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(found, vec!["first", "third"]);
    }

    #[test]
    fn test_constraints_for_unconstrained_drug() {
        let schedule = create_test_schedule();
        assert!(schedule.get_constraints_for_drug("Drug Z").is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let a = Medication::new("Metformin", "500mg", "twice daily", vec![t(8, 0)]);
        let b = Medication::new("METFORMIN", "850mg", "once daily", vec![t(20, 0)]);
        match Schedule::new(vec![a, b], vec![]) {
            Err(Error::DuplicateMedication(name)) => assert_eq!(name, "METFORMIN"),
            other => panic!("Expected DuplicateMedication, got {:?}", other),
        }
    }

    #[test]
    fn test_other_medications() {
        let schedule = create_test_schedule();
        let others: Vec<_> = schedule
            .other_medications("drug a")
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(others, vec!["Drug B"]);
    }

    #[test]
    fn test_load_schedule_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("schedule.toml");

        let toml_str = r#"
[[medications]]
name = "Metformin"
dosage = "500mg"
frequency = "twice daily"
times = ["08:00", "20:00"]
with_food = true
min_interval = "8h"
max_daily_doses = 2

[[medications]]
name = "Levothyroxine"
dosage = "100mcg"
frequency = "once daily"
times = ["06:00"]
empty_stomach = true
interacts_with = ["Calcium"]
interaction_gap = "4h"
"#;
        std::fs::write(&path, toml_str).unwrap();

        let schedule = Schedule::load_from(&path, vec![]).unwrap();
        assert_eq!(schedule.medications().len(), 2);

        let metformin = schedule.get_medication("metformin").unwrap();
        assert_eq!(metformin.scheduled_times, vec![t(8, 0), t(20, 0)]);
        assert_eq!(metformin.min_interval, Some(Duration::hours(8)));
        assert_eq!(metformin.max_daily_doses, 2);

        let levo = schedule.get_medication("levothyroxine").unwrap();
        assert_eq!(levo.max_daily_doses, 1);
        assert_eq!(levo.interaction_gap, Some(Duration::hours(4)));
    }

    #[test]
    fn test_example_schedule_file_parses() {
        let example = include_str!("../../schedule.example.toml");
        let schedule = Schedule::from_toml_str(example, vec![]).unwrap();
        assert_eq!(schedule.medications().len(), 2);
        assert_eq!(
            schedule.get_medication("Levothyroxine").unwrap().interacts_with,
            vec!["Calcium"]
        );
    }

    #[test]
    fn test_schedule_file_rejects_bad_time() {
        let toml_str = r#"
[[medications]]
name = "Metformin"
dosage = "500mg"
frequency = "daily"
times = ["8am"]
"#;
        assert!(matches!(
            Schedule::from_toml_str(toml_str, vec![]),
            Err(Error::InvalidTime(_))
        ));
    }

    #[test]
    fn test_schedule_file_requires_times() {
        let toml_str = r#"
[[medications]]
name = "Metformin"
dosage = "500mg"
frequency = "daily"
times = []
"#;
        assert!(matches!(
            Schedule::from_toml_str(toml_str, vec![]),
            Err(Error::Config(_))
        ));
    }
}
