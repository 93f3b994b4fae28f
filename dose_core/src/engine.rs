//! Rescheduling engine for missed doses.
//!
//! Two strategies produce the same `RescheduleProposal` shape:
//!
//! 1. **Rule-based** (always available):
//!    - Under 2h late → take now
//!    - 2h to 4h late → take now, warn about the delay
//!    - 4h or more late → skip and resume the normal schedule
//!
//! 2. **Delegated**: brief an external reasoning provider and parse its
//!    answer. Any provider failure falls back to the rule-based policy within
//!    the same call.
//!
//! The rule-based policy does not consult food or interaction constraints.
//! They are loaded and available through `Schedule`, and the delegated brief
//! includes them, but the fixed thresholds decide on elapsed time alone.
//!
//! A decision never returns an error: an unknown medication yields an
//! explicit error proposal instead.

use crate::brief::build_brief;
use crate::config::ReasoningConfig;
use crate::duration::elapsed_since;
use crate::response::parse_advice;
use crate::{
    DoseAction, DrugInfoSource, MissedDose, ReasoningProvider, RescheduleProposal, Schedule,
};
use chrono::Duration;

/// Under this many seconds late, the dose is taken without warnings
pub const ACCEPTABLE_WINDOW_SECS: i64 = 2 * 60 * 60;

/// From this many seconds late, the dose is skipped
pub const SKIP_THRESHOLD_SECS: i64 = 4 * 60 * 60;

const UNABLE_TO_OPTIMIZE: &str = "Unable to generate optimal schedule";

/// How decisions are made, chosen once when the engine is built
pub enum Strategy {
    /// Fixed elapsed-time thresholds
    RuleBased,
    /// Ask a reasoning provider, falling back to `RuleBased` on failure
    Delegated(Box<dyn ReasoningProvider>),
}

impl Strategy {
    /// Pick `Delegated` only when reasoning is configured and a provider exists
    pub fn select(config: &ReasoningConfig, provider: Option<Box<dyn ReasoningProvider>>) -> Self {
        match provider {
            Some(provider) if config.is_configured() => {
                tracing::info!("Using delegated reasoning via {}", provider.name());
                Strategy::Delegated(provider)
            }
            Some(_) => {
                tracing::info!("Reasoning is not configured, using rule-based policy");
                Strategy::RuleBased
            }
            None => {
                if config.is_configured() {
                    tracing::warn!(
                        "Reasoning is configured but no provider is available, using rule-based policy"
                    );
                }
                Strategy::RuleBased
            }
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::RuleBased => f.write_str("RuleBased"),
            Strategy::Delegated(p) => write!(f, "Delegated({})", p.name()),
        }
    }
}

/// Stateless decision engine; one instance can serve any number of calls
pub struct Rescheduler {
    strategy: Strategy,
    drug_info: Option<Box<dyn DrugInfoSource>>,
}

impl Rescheduler {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            drug_info: None,
        }
    }

    /// Rule-based engine with no external capabilities
    pub fn rule_based() -> Self {
        Self::new(Strategy::RuleBased)
    }

    /// Attach a drug metadata source used to enrich delegated briefs
    pub fn with_drug_info(mut self, source: Box<dyn DrugInfoSource>) -> Self {
        self.drug_info = Some(source);
        self
    }

    /// Produce a proposal for a missed dose
    pub fn reschedule_missed_dose(
        &self,
        missed: &MissedDose,
        schedule: &Schedule,
    ) -> RescheduleProposal {
        match &self.strategy {
            Strategy::RuleBased => rule_based_reschedule(missed, schedule),
            Strategy::Delegated(provider) => {
                self.delegated_reschedule(provider.as_ref(), missed, schedule)
            }
        }
    }

    fn delegated_reschedule(
        &self,
        provider: &dyn ReasoningProvider,
        missed: &MissedDose,
        schedule: &Schedule,
    ) -> RescheduleProposal {
        let Some(med) = schedule.get_medication(&missed.medication_name) else {
            return error_proposal(missed, "Medication not found");
        };

        let constraints = schedule.get_constraints_for_drug(&missed.medication_name);
        let drug_info = self
            .drug_info
            .as_ref()
            .and_then(|source| source.lookup(&med.name));

        let brief = build_brief(missed, med, schedule, &constraints, drug_info.as_ref());

        let response = match provider.generate(&brief) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    "{} failed: {}. Falling back to rule-based policy.",
                    provider.name(),
                    e
                );
                return rule_based_reschedule(missed, schedule);
            }
        };

        let advice = parse_advice(&response, missed);
        tracing::info!(
            "Delegated proposal for {}: {} (defaults used: {})",
            missed.medication_name,
            advice.new_time.format("%H:%M"),
            advice.used_defaults
        );

        let action = if advice.new_time == missed.current_time {
            DoseAction::TakeNow
        } else {
            DoseAction::TakeAt
        };

        RescheduleProposal {
            missed_dose: missed.clone(),
            action,
            new_time: advice.new_time,
            reasoning: advice.reasoning,
            affected_medications: Vec::new(),
            warnings: advice.warnings,
        }
    }
}

/// Decide on elapsed time alone
pub fn rule_based_reschedule(missed: &MissedDose, schedule: &Schedule) -> RescheduleProposal {
    if schedule.get_medication(&missed.medication_name).is_none() {
        return error_proposal(missed, "Medication not found");
    }

    let elapsed = elapsed_since(missed.scheduled_time, missed.current_time);
    let (action, reasoning, warnings) = classify_delay(elapsed);

    tracing::info!(
        "Rule-based proposal for {}: {} min late -> {:?}",
        missed.medication_name,
        elapsed.num_minutes(),
        action
    );

    let new_time = match action {
        // Skipping has no new time; the scheduled time stands in for it
        DoseAction::Skip => missed.scheduled_time,
        _ => missed.current_time,
    };

    RescheduleProposal {
        missed_dose: missed.clone(),
        action,
        new_time,
        reasoning: reasoning.to_string(),
        affected_medications: Vec::new(),
        warnings: warnings.into_iter().map(String::from).collect(),
    }
}

fn classify_delay(elapsed: Duration) -> (DoseAction, &'static str, Vec<&'static str>) {
    let secs = elapsed.num_seconds();
    if secs < ACCEPTABLE_WINDOW_SECS {
        (
            DoseAction::TakeNow,
            "Take the dose now. You're within the acceptable window.",
            vec![],
        )
    } else if secs < SKIP_THRESHOLD_SECS {
        (
            DoseAction::TakeNow,
            "Take the dose now, but monitor for side effects.",
            vec!["Dose is significantly delayed - contact provider if concerned"],
        )
    } else {
        (
            DoseAction::Skip,
            "Skip this dose and take the next scheduled dose.",
            vec!["More than 4 hours late - safer to skip and resume normal schedule"],
        )
    }
}

fn error_proposal(missed: &MissedDose, error: &str) -> RescheduleProposal {
    tracing::warn!("Cannot reschedule {}: {}", missed.medication_name, error);
    RescheduleProposal {
        missed_dose: missed.clone(),
        action: DoseAction::Error,
        new_time: missed.current_time,
        reasoning: format!("Error: {}", error),
        affected_medications: Vec::new(),
        warnings: vec![UNABLE_TO_OPTIMIZE.to_string()],
    }
}
