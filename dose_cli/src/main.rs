use clap::{Parser, Subcommand};
use dose_core::demo::demo_scenarios;
use dose_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "medsched")]
#[command(about = "Missed-dose rescheduling assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override rules directory
    #[arg(long, global = true)]
    rules_dir: Option<PathBuf>,

    /// Schedule file (TOML); the demo schedule is used when absent
    #[arg(long, global = true)]
    schedule: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend what to do about a missed dose
    Reschedule {
        /// Medication name (case-insensitive)
        #[arg(long)]
        medication: String,

        /// When the dose was due (HH:MM)
        #[arg(long)]
        scheduled: String,

        /// Current time (HH:MM); defaults to the local clock
        #[arg(long)]
        now: Option<String>,

        /// Why the dose was missed
        #[arg(long, default_value = "Missed dose")]
        reason: String,

        /// Use a recorded assistant answer instead of the rule-based policy
        #[arg(long)]
        assistant_response: Option<PathBuf>,

        /// Print the proposal as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the medication schedule and loaded constraints
    Schedule,

    /// Run the built-in missed-dose scenarios against the schedule
    Demo,
}

fn main() -> Result<()> {
    dose_core::logging::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let rules_dir = cli.rules_dir.unwrap_or_else(|| config.rules.dir.clone());
    let schedule_file = cli.schedule.or_else(|| config.schedule.file.clone());
    let schedule = load_schedule(&rules_dir, schedule_file.as_deref())?;

    match cli.command {
        Commands::Reschedule {
            medication,
            scheduled,
            now,
            reason,
            assistant_response,
            json,
        } => cmd_reschedule(
            &schedule,
            &config,
            &medication,
            &scheduled,
            now.as_deref(),
            reason,
            assistant_response.as_deref(),
            json,
        ),
        Commands::Schedule => {
            display_schedule(&schedule);
            Ok(())
        }
        Commands::Demo => cmd_demo(&schedule),
    }
}

fn load_schedule(rules_dir: &Path, schedule_file: Option<&Path>) -> Result<Schedule> {
    let constraints = RuleLoader::new(rules_dir).load_constraints()?;
    match schedule_file {
        Some(path) => Schedule::load_from(path, constraints),
        None => build_demo_schedule(constraints),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_reschedule(
    schedule: &Schedule,
    config: &Config,
    medication: &str,
    scheduled: &str,
    now: Option<&str>,
    reason: String,
    assistant_response: Option<&Path>,
    json: bool,
) -> Result<()> {
    let scheduled_time = parse_time(scheduled)?;
    let current_time = match now {
        Some(now) => parse_time(now)?,
        None => chrono::Local::now().time(),
    };

    // An explicit recorded answer is the caller's choice; otherwise the config decides
    let strategy = match assistant_response {
        Some(path) => Strategy::Delegated(Box::new(CannedResponse::from_file(path)?)),
        None => Strategy::select(&config.reasoning, None),
    };
    tracing::debug!("Selected strategy: {:?}", strategy);

    let engine = Rescheduler::new(strategy).with_drug_info(Box::new(MockDrugInfo));
    let missed = MissedDose::new(medication, scheduled_time, current_time).with_reason(reason);
    let proposal = engine.reschedule_missed_dose(&missed, schedule);

    if json {
        println!("{}", serde_json::to_string_pretty(&proposal)?);
    } else {
        display_proposal(&proposal);
    }

    Ok(())
}

fn cmd_demo(schedule: &Schedule) -> Result<()> {
    let engine = Rescheduler::rule_based();

    for scenario in demo_scenarios() {
        if schedule.get_medication(&scenario.missed.medication_name).is_none() {
            println!(
                "Skipping scenario \"{}\": {} is not in the schedule",
                scenario.title, scenario.missed.medication_name
            );
            continue;
        }

        println!("\n══ {} ══", scenario.title);
        println!("  {}", scenario.situation);
        let proposal = engine.reschedule_missed_dose(&scenario.missed, schedule);
        display_proposal(&proposal);
    }

    Ok(())
}

fn display_schedule(schedule: &Schedule) {
    println!("\nCurrent Medication Schedule:");
    println!("─────────────────────────────────────────");
    for med in schedule.medications() {
        let times: Vec<String> = med
            .scheduled_times
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect();
        println!("  • {} ({})", med.name, med.dosage);
        println!("    Frequency: {}", med.frequency);
        println!("    Scheduled: {}", times.join(", "));
        if med.with_food == Some(true) {
            println!("    ⚠ Take with food");
        }
        if med.empty_stomach == Some(true) {
            println!("    ⚠ Take on empty stomach");
        }
    }

    if schedule.constraints().is_empty() {
        println!("\nNo specific constraints loaded.");
        return;
    }

    println!("\nActive Constraints:");
    println!("─────────────────────────────────────────");
    for c in schedule.constraints() {
        match &c.drug_b {
            Some(b) => println!("  • [{}] {} ↔ {}: {}", c.kind.as_str(), c.drug_a, b, c.description),
            None => println!("  • [{}] {}: {}", c.kind.as_str(), c.drug_a, c.description),
        }
    }
}

fn display_proposal(proposal: &RescheduleProposal) {
    let missed = &proposal.missed_dose;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  RESCHEDULING RECOMMENDATION");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Medication:    {}", missed.medication_name);
    println!("  Was scheduled: {}", missed.scheduled_time.format("%H:%M"));
    println!("  Current time:  {}", missed.current_time.format("%H:%M"));
    println!();

    match proposal.recommended_time() {
        Some(time) if proposal.action != DoseAction::Error => {
            println!("  ✓ Take dose at: {}", time.format("%H:%M"))
        }
        Some(_) => println!("  ✗ No recommendation"),
        None => println!("  ✓ Skip this dose"),
    }

    println!();
    println!("  Reasoning: {}", proposal.reasoning);

    if !proposal.warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warning in &proposal.warnings {
            println!("    • {}", warning);
        }
    }

    println!();
}
