// Career guidance and job recommendations.
// Both endpoints ask the model for structured JSON; the envelope extractor
// enforces the guidance schema, the recommendations path degrades a missing
// jobs list to empty. All LLM calls go through llm_client.

pub mod envelope;
pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::guidance::envelope::FieldSpec;

/// The four-category guidance envelope returned by `/career_guidance`.
/// Wire format is camelCase, matching the frontend contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceEnvelope {
    pub key_skills: Vec<String>,
    pub career_paths: Vec<String>,
    pub certifications: Vec<String>,
    pub industry_trends: Vec<String>,
}

/// Declared envelope schema. Each field's fallback entry is synthesized
/// from the requested program when the model omits or mangles the field.
pub const GUIDANCE_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        key: "keySkills",
        fallback: |program| format!("Core skills relevant to {program}"),
    },
    FieldSpec {
        key: "careerPaths",
        fallback: |program| format!("Entry-level positions in {program}"),
    },
    FieldSpec {
        key: "certifications",
        fallback: |program| format!("Industry certifications for {program}"),
    },
    FieldSpec {
        key: "industryTrends",
        fallback: |program| format!("Current trends in {program} industry"),
    },
];

impl GuidanceEnvelope {
    /// Builds the typed envelope from an extracted field map.
    pub fn from_fields(mut fields: BTreeMap<&'static str, Vec<String>>) -> Self {
        Self {
            key_skills: fields.remove("keySkills").unwrap_or_default(),
            career_paths: fields.remove("careerPaths").unwrap_or_default(),
            certifications: fields.remove("certifications").unwrap_or_default(),
            industry_trends: fields.remove("industryTrends").unwrap_or_default(),
        }
    }

    pub fn total_items(&self) -> usize {
        self.key_skills.len()
            + self.career_paths.len()
            + self.certifications.len()
            + self.industry_trends.len()
    }
}

/// One structured job record returned by `/get_recommendations`.
/// Lenient on missing fields: the model frequently drops some of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecommendation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub outlook: String,
    #[serde(default)]
    pub salary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::envelope::extract_envelope;

    #[test]
    fn test_envelope_serializes_with_camel_case_keys() {
        let envelope = GuidanceEnvelope {
            key_skills: vec!["SQL".to_string()],
            career_paths: vec!["Analyst".to_string()],
            certifications: vec!["Cert".to_string()],
            industry_trends: vec!["Trend".to_string()],
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["keySkills"][0], "SQL");
        assert_eq!(json["careerPaths"][0], "Analyst");
        assert_eq!(json["certifications"][0], "Cert");
        assert_eq!(json["industryTrends"][0], "Trend");
    }

    #[test]
    fn test_from_fields_covers_all_categories() {
        let raw = r#"{
            "keySkills": ["Rust"],
            "careerPaths": ["Systems Engineer", "Backend Engineer"],
            "certifications": [],
            "industryTrends": ["More WASM"]
        }"#;
        let fields = extract_envelope(raw, &GUIDANCE_FIELDS, "Computer Science").unwrap();
        let envelope = GuidanceEnvelope::from_fields(fields);
        assert_eq!(envelope.key_skills, vec!["Rust"]);
        assert_eq!(envelope.career_paths.len(), 2);
        assert_eq!(
            envelope.certifications,
            vec!["Industry certifications for Computer Science"]
        );
        assert_eq!(envelope.total_items(), 5);
    }

    #[test]
    fn test_job_recommendation_tolerates_missing_fields() {
        let job: JobRecommendation =
            serde_json::from_str(r#"{"title": "Data Engineer"}"#).unwrap();
        assert_eq!(job.title, "Data Engineer");
        assert!(job.skills.is_empty());
        assert!(job.salary.is_empty());
    }
}
