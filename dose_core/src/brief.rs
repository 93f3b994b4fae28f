//! Brief composition for the delegated reasoning provider.
//!
//! The brief asks for a three-line answer:
//!
//! ```text
//! RECOMMENDED_TIME: HH:MM
//! REASONING: ...
//! WARNINGS: ... (or "None")
//! ```
//!
//! `response::parse_advice` reads that format back.

use crate::duration::{elapsed_since, format_duration, format_hhmm};
use crate::{Constraint, DrugInfo, Medication, MissedDose, Schedule};

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "not specified",
    }
}

fn optional_gap(gap: Option<chrono::Duration>) -> String {
    gap.map(format_duration)
        .unwrap_or_else(|| "not specified".to_string())
}

fn bullet_list<I: IntoIterator<Item = String>>(items: I, empty: &str) -> String {
    let lines: Vec<String> = items.into_iter().map(|s| format!("- {}", s)).collect();
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

fn known_interactions(info: &DrugInfo) -> String {
    let mut section = format!(
        "\nKNOWN INTERACTIONS ({}):\n{}\n",
        info.name,
        bullet_list(info.interactions.iter().cloned(), "None reported")
    );

    let food_notes = info.food_relation().notes();
    if !food_notes.is_empty() {
        section.push_str(&format!("Food guidance: {}\n", food_notes.join("; ")));
    }
    if let Some(text) = &info.dosage_text {
        section.push_str(&format!("Label directions: {}\n", text));
    }
    section
}

/// Compose the brief for one missed dose
///
/// `drug_info` adds a KNOWN INTERACTIONS section when a metadata source
/// resolved the medication.
pub fn build_brief(
    missed: &MissedDose,
    med: &Medication,
    schedule: &Schedule,
    constraints: &[&Constraint],
    drug_info: Option<&DrugInfo>,
) -> String {
    let elapsed = elapsed_since(missed.scheduled_time, missed.current_time);

    let constraint_text = bullet_list(
        constraints.iter().map(|c| c.description.clone()),
        "No specific constraints",
    );

    let other_meds_text = bullet_list(
        schedule.other_medications(&med.name).map(|m| {
            let times: Vec<String> = m
                .scheduled_times
                .iter()
                .map(|t| t.format("%H:%M").to_string())
                .collect();
            format!("{}: scheduled at {}", m.name, times.join(", "))
        }),
        "No other medications",
    );

    let interacts_with = if med.interacts_with.is_empty() {
        "none listed".to_string()
    } else {
        med.interacts_with.join(", ")
    };

    let mut brief = format!(
        "You are a medication scheduling assistant. A patient has missed a dose and needs help rescheduling.

MISSED DOSE:
- Medication: {name}
- Was scheduled for: {scheduled}
- Current time: {current}
- Time elapsed: {elapsed}
- Reason: {reason}

MEDICATION DETAILS:
- Dosage: {dosage}
- Frequency: {frequency}
- With food: {with_food}
- Empty stomach: {empty_stomach}
- Minimum interval between doses: {min_interval}
- Max daily doses: {max_daily}
- Interacts with: {interacts_with}
- Required gap for interactions: {interaction_gap}

CONSTRAINTS:
{constraint_text}

OTHER MEDICATIONS TODAY:
{other_meds_text}
",
        name = missed.medication_name,
        scheduled = missed.scheduled_time.format("%H:%M"),
        current = missed.current_time.format("%H:%M"),
        elapsed = format_hhmm(elapsed),
        reason = missed.reason,
        dosage = med.dosage,
        frequency = med.frequency,
        with_food = flag(med.with_food),
        empty_stomach = flag(med.empty_stomach),
        min_interval = optional_gap(med.min_interval),
        max_daily = med.max_daily_doses,
        interaction_gap = optional_gap(med.interaction_gap),
    );

    if let Some(info) = drug_info {
        brief.push_str(&known_interactions(info));
    }

    brief.push_str(
        "
Please recommend:
1. The best time to take the missed dose now
2. Whether any other scheduled doses need adjustment
3. Any warnings or precautions

Format your response as:
RECOMMENDED_TIME: HH:MM
REASONING: [your explanation]
WARNINGS: [any warnings, or \"None\"]
",
    );

    brief
}
