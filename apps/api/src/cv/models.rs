//! Request payload for CV generation. Wire format is camelCase, matching
//! the frontend form fields.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CvData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cv_data_deserializes_camel_case_dates() {
        let json = r#"{
            "name": "Ada",
            "experience": [
                {"company": "Acme", "position": "Engineer",
                 "startDate": "2020", "endDate": "2023"}
            ]
        }"#;
        let data: CvData = serde_json::from_str(json).unwrap();
        assert_eq!(data.experience[0].start_date, "2020");
        assert_eq!(data.experience[0].end_date, "2023");
    }

    #[test]
    fn test_cv_data_tolerates_minimal_payload() {
        let data: CvData = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(data.name, "Ada");
        assert!(data.education.is_empty());
        assert!(data.skills.is_empty());
    }
}
