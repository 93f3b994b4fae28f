#![forbid(unsafe_code)]

//! Core domain model and decision logic for missed-dose rescheduling.
//!
//! This crate provides:
//! - Domain types (medications, constraints, schedules, missed doses, proposals)
//! - Rule file loading (constraints, tags, sources)
//! - The rescheduling engine (rule-based and delegated-reasoning strategies)
//! - Drug metadata records and the demo schedule

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod duration;
pub mod schedule;
pub mod rules;
pub mod drug_info;
pub mod reasoning;
pub mod brief;
pub mod response;
pub mod engine;
pub mod demo;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use duration::{elapsed_since, format_hhmm, parse_duration, parse_time};
pub use rules::{RuleLoader, RuleMap};
pub use drug_info::{DrugInfo, DrugInfoSource, MockDrugInfo};
pub use reasoning::{CannedResponse, ReasoningProvider};
pub use response::{parse_advice, ParsedAdvice};
pub use engine::{Rescheduler, Strategy};
pub use demo::build_demo_schedule;
