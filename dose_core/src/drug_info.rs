//! Drug metadata records.
//!
//! The live lookup against a pharmaceutical database lives outside this
//! crate. The engine only needs the record shape, which any source can
//! provide through `DrugInfoSource`. `MockDrugInfo` serves a small built-in
//! table for demos and offline use.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attributes of a drug as resolved by a metadata source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrugInfo {
    pub name: String,
    pub generic_name: String,
    pub brand_name: String,
    pub interactions: Vec<String>,
    pub with_food: bool,
    pub empty_stomach: bool,
    pub frequency: String,
    /// Dosage and administration text, when the source has it
    pub dosage_text: Option<String>,
}

impl DrugInfo {
    /// Food relation from the dosage text, or the record's flags when the
    /// text is absent or says nothing about food
    pub fn food_relation(&self) -> FoodRelation {
        let from_text = self
            .dosage_text
            .as_deref()
            .map(food_relation_from_dosage)
            .unwrap_or_default();
        if from_text != FoodRelation::default() {
            return from_text;
        }
        FoodRelation {
            with_food: self.with_food,
            empty_stomach: self.empty_stomach,
        }
    }
}

/// Anything that can resolve a drug name to its metadata
pub trait DrugInfoSource: Send + Sync {
    fn lookup(&self, drug_name: &str) -> Option<DrugInfo>;
}

/// Food flags derived from dosage/administration text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoodRelation {
    pub with_food: bool,
    pub empty_stomach: bool,
}

impl FoodRelation {
    pub fn notes(&self) -> Vec<&'static str> {
        let mut notes = Vec::new();
        if self.with_food {
            notes.push("Should be taken with food");
        }
        if self.empty_stomach {
            notes.push("Should be taken on empty stomach");
        }
        notes
    }
}

/// Derive food flags from dosage text
///
/// "with food"/"with meal" wins over "empty stomach"/"before eating" when
/// both appear.
pub fn food_relation_from_dosage(text: &str) -> FoodRelation {
    let lower = text.to_lowercase();
    if lower.contains("with food") || lower.contains("with meal") {
        FoodRelation {
            with_food: true,
            empty_stomach: false,
        }
    } else if lower.contains("empty stomach") || lower.contains("before eating") {
        FoodRelation {
            with_food: false,
            empty_stomach: true,
        }
    } else {
        FoodRelation::default()
    }
}

static MOCK_DRUG_DATA: Lazy<HashMap<&'static str, DrugInfo>> = Lazy::new(|| {
    let mut table = HashMap::new();

    table.insert(
        "lisinopril",
        DrugInfo {
            name: "Lisinopril".into(),
            generic_name: "lisinopril".into(),
            brand_name: "Prinivil, Zestril".into(),
            interactions: vec![
                "NSAIDs may reduce effectiveness".into(),
                "Potassium supplements may cause hyperkalemia".into(),
            ],
            with_food: false,
            empty_stomach: false,
            frequency: "once daily".into(),
            dosage_text: None,
        },
    );

    table.insert(
        "metformin",
        DrugInfo {
            name: "Metformin".into(),
            generic_name: "metformin".into(),
            brand_name: "Glucophage".into(),
            interactions: vec!["Alcohol may increase lactic acidosis risk".into()],
            with_food: true,
            empty_stomach: false,
            frequency: "twice daily".into(),
            dosage_text: Some("Take with meals to reduce stomach upset".into()),
        },
    );

    table.insert(
        "levothyroxine",
        DrugInfo {
            name: "Levothyroxine".into(),
            generic_name: "levothyroxine".into(),
            brand_name: "Synthroid".into(),
            interactions: vec!["Take 4 hours apart from calcium, iron supplements".into()],
            with_food: false,
            empty_stomach: true,
            frequency: "once daily".into(),
            dosage_text: Some("Take on an empty stomach 30 to 60 minutes before breakfast".into()),
        },
    );

    table
});

/// Built-in metadata for the demo medications
#[derive(Clone, Copy, Debug, Default)]
pub struct MockDrugInfo;

impl DrugInfoSource for MockDrugInfo {
    fn lookup(&self, drug_name: &str) -> Option<DrugInfo> {
        MOCK_DRUG_DATA
            .get(drug_name.trim().to_lowercase().as_str())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_lookup_case_insensitive() {
        let info = MockDrugInfo.lookup("METFORMIN").unwrap();
        assert_eq!(info.brand_name, "Glucophage");
        assert!(info.with_food);
    }

    #[test]
    fn test_mock_lookup_unknown() {
        assert!(MockDrugInfo.lookup("aspirin").is_none());
    }

    #[test]
    fn test_mock_flags_match_dosage_text() {
        for name in ["metformin", "levothyroxine"] {
            let info = MockDrugInfo.lookup(name).unwrap();
            let relation = food_relation_from_dosage(info.dosage_text.as_deref().unwrap());
            assert_eq!(relation.with_food, info.with_food, "{}", name);
            assert_eq!(relation.empty_stomach, info.empty_stomach, "{}", name);
        }
    }

    #[test]
    fn test_food_relation_prefers_dosage_text() {
        let mut info = MockDrugInfo.lookup("levothyroxine").unwrap();
        assert_eq!(info.food_relation().notes(), vec!["Should be taken on empty stomach"]);

        info.dosage_text = Some("Take with food".into());
        assert!(info.food_relation().with_food);

        info.dosage_text = None;
        assert!(info.food_relation().empty_stomach);

        let lisinopril = MockDrugInfo.lookup("lisinopril").unwrap();
        assert!(lisinopril.food_relation().notes().is_empty());
    }

    #[test]
    fn test_food_relation_from_dosage() {
        let with_food = food_relation_from_dosage("Take WITH FOOD twice a day");
        assert!(with_food.with_food);
        assert_eq!(with_food.notes(), vec!["Should be taken with food"]);

        let empty = food_relation_from_dosage("Administer before eating");
        assert!(empty.empty_stomach);

        assert_eq!(
            food_relation_from_dosage("Once daily"),
            FoodRelation::default()
        );
    }
}
