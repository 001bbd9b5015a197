//! Response schemas sent with each request so the model returns parseable JSON.
//! Field names mirror the serde names in `models/`.

use serde_json::{json, Value};

use crate::models::analysis::StrategyCategory;

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

pub fn analysis_schema() -> Value {
    let categories: Vec<&str> = StrategyCategory::ALL.iter().map(|c| c.label()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "matchScore": { "type": "INTEGER" },
            "executiveSummary": { "type": "STRING" },
            "strengths": string_array(),
            "hardSkillGaps": string_array(),
            "softSkillGaps": string_array(),
            "missingKeywords": string_array(),
            "clarificationQuestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "question": { "type": "STRING" },
                        "context": { "type": "STRING" }
                    },
                    "required": ["id", "question", "context"]
                }
            },
            "strategicSuggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "category": { "type": "STRING", "enum": categories },
                        "label": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "benefit": { "type": "STRING" }
                    },
                    "required": ["id", "category", "label", "description", "benefit"]
                }
            }
        },
        "required": [
            "matchScore", "executiveSummary", "strengths", "hardSkillGaps",
            "softSkillGaps", "missingKeywords", "clarificationQuestions", "strategicSuggestions"
        ]
    })
}

pub fn resume_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "header": {
                "type": "OBJECT",
                "properties": {
                    "fullName": { "type": "STRING" },
                    "email": { "type": "STRING" },
                    "phone": { "type": "STRING" },
                    "linkedinUrl": { "type": "STRING" },
                    "location": { "type": "STRING" },
                    "title": { "type": "STRING" }
                },
                "required": ["fullName", "email"]
            },
            "summary": { "type": "STRING" },
            "skills": string_array(),
            "experience": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": { "type": "STRING" },
                        "role": { "type": "STRING" },
                        "dateRange": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "achievements": string_array()
                    },
                    "required": ["company", "role", "dateRange", "achievements"]
                }
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "institution": { "type": "STRING" },
                        "degree": { "type": "STRING" },
                        "dateRange": { "type": "STRING" },
                        "details": { "type": "STRING" }
                    },
                    "required": ["institution", "degree", "dateRange"]
                }
            }
        },
        "required": ["header", "summary", "skills", "experience", "education"]
    })
}

pub fn optimization_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "changeOverview": {
                "type": "STRING",
                "description": "A detailed summary of specific changes made to the resume, highlighting improvements."
            },
            "optimizedResume": resume_schema()
        },
        "required": ["changeOverview", "optimizedResume"]
    })
}
