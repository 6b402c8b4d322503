//! Conversions between domain skill types and their `jsonb` column form.

use serde_json::Value;

use crate::domain::skill::{Skill, SkillSnapshot};

/// Encode a skill list for a `jsonb` column.
pub(crate) fn skills_to_json(skills: &[Skill]) -> Result<Value, serde_json::Error> {
    serde_json::to_value(skills)
}

/// Decode a skill list from a `jsonb` column, re-running skill validation.
pub(crate) fn skills_from_json(value: Value) -> Result<Vec<Skill>, serde_json::Error> {
    serde_json::from_value(value)
}

/// Encode a skill snapshot for a `jsonb` column.
pub(crate) fn snapshot_to_json(snapshot: &SkillSnapshot) -> Result<Value, serde_json::Error> {
    serde_json::to_value(snapshot)
}

/// Decode a skill snapshot from a `jsonb` column.
pub(crate) fn snapshot_from_json(value: Value) -> Result<SkillSnapshot, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use serde_json::json;

    use super::*;
    use crate::domain::skill::SkillLevel;

    #[test]
    fn skill_list_round_trips() {
        let skills = vec![
            Skill::new("Guitar", "Acoustic and electric", SkillLevel::Advanced)
                .expect("valid skill"),
        ];
        let encoded = skills_to_json(&skills).expect("encodes");
        let decoded = skills_from_json(encoded).expect("decodes");
        assert_eq!(decoded, skills);
    }

    #[test]
    fn corrupted_skill_list_fails_validation() {
        let result = skills_from_json(json!([{ "name": "", "description": "x", "level": "expert" }]));
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_round_trips_without_description() {
        let snapshot = SkillSnapshot {
            name: "Painting".to_owned(),
            description: None,
            level: SkillLevel::Expert,
        };
        let encoded = snapshot_to_json(&snapshot).expect("encodes");
        assert!(encoded.get("description").is_none());
        let decoded = snapshot_from_json(encoded).expect("decodes");
        assert_eq!(decoded, snapshot);
    }
}
