use serde::{Deserialize, Serialize};

/// Contact block at the top of the resume. `full_name` and `email` are the only
/// fields the model is required to return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeHeader {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub company: String,
    pub role: String,
    pub date_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub date_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// The structured, tailored resume. Generation produces it and refinement
/// replaces it wholesale; nothing patches it field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub header: ResumeHeader,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
}

/// Output of the generation request: the new document plus a human-readable
/// account of what changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub change_overview: String,
    pub optimized_resume: ResumeDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_accepts_minimal_model_output() {
        let json = r#"{
            "header": {"fullName": "Ada Lovelace", "email": "ada@example.com"},
            "summary": "Analytical engine programmer.",
            "skills": ["Mathematics"],
            "experience": [
                {"company": "Babbage & Co", "role": "Analyst", "dateRange": "1842-1843",
                 "achievements": ["Wrote the first published algorithm"]}
            ],
            "education": [
                {"institution": "Home tutoring", "degree": "Mathematics", "dateRange": "1830s"}
            ]
        }"#;

        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.header.full_name, "Ada Lovelace");
        assert!(doc.header.phone.is_none());
        assert_eq!(doc.experience[0].date_range, "1842-1843");
        assert!(doc.experience[0].location.is_none());
        assert!(doc.education[0].details.is_none());
    }

    #[test]
    fn test_document_rejects_missing_email() {
        let json = r#"{"header": {"fullName": "No Email"}, "summary": "", "skills": [],
                       "experience": [], "education": []}"#;
        let result: Result<ResumeDocument, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_optimization_result_uses_camel_case() {
        let result = OptimizationResult {
            change_overview: "Tightened summary".to_string(),
            optimized_resume: ResumeDocument::default(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("changeOverview").is_some());
        assert!(value.get("optimizedResume").is_some());
    }
}
