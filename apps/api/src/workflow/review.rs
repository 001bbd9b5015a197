//! Review draft, the analysis-review step's own state: which suggestions are
//! checked and what the user typed for each clarification question.
//!
//! Lives in the workflow state rather than the client so a failed generation
//! that bounces the user back to review loses nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::models::analysis::AnalysisResult;

/// Serializes as `{ "selected": [...], "answers": {...} }` with `selected` in
/// analysis order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    suggestion_order: Vec<String>,
    question_ids: BTreeSet<String>,
    selected: BTreeSet<String>,
    answers: BTreeMap<String, String>,
}

impl Serialize for ReviewDraft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut draft = serializer.serialize_struct("ReviewDraft", 2)?;
        draft.serialize_field("selected", &self.selected_ids())?;
        draft.serialize_field("answers", &self.answers)?;
        draft.end()
    }
}

impl ReviewDraft {
    /// Fresh draft for an analysis: every suggestion selected, no answers.
    pub fn for_analysis(analysis: &AnalysisResult) -> Self {
        let suggestion_order = analysis.suggestion_ids();
        Self {
            selected: suggestion_order.iter().cloned().collect(),
            suggestion_order,
            question_ids: analysis
                .clarification_questions
                .iter()
                .map(|q| q.id.clone())
                .collect(),
            answers: BTreeMap::new(),
        }
    }

    /// Flips one suggestion. Returns the new state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        if !self.suggestion_order.iter().any(|s| s == id) {
            return None;
        }
        if self.selected.remove(id) {
            Some(false)
        } else {
            self.selected.insert(id.to_string());
            Some(true)
        }
    }

    /// Records an answer. Unknown question ids are ignored.
    pub fn set_answer(&mut self, question_id: &str, answer: &str) {
        if self.question_ids.contains(question_id) {
            self.answers
                .insert(question_id.to_string(), answer.to_string());
        }
    }

    #[cfg(test)]
    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Overwrites the parts the client submitted. An absent selection or answer
    /// map keeps what the draft already holds.
    pub fn apply(
        &mut self,
        answers: Option<&HashMap<String, String>>,
        selected_ids: Option<&[String]>,
    ) {
        if let Some(selected_ids) = selected_ids {
            self.selected = selected_ids
                .iter()
                .filter(|id| self.suggestion_order.contains(*id))
                .cloned()
                .collect();
        }
        if let Some(answers) = answers {
            self.answers.clear();
            for (id, answer) in answers {
                self.set_answer(id, answer);
            }
        }
    }

    /// Selected ids in the order the analysis listed them.
    pub fn selected_ids(&self) -> Vec<String> {
        self.suggestion_order
            .iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect()
    }

    pub fn answers(&self) -> HashMap<String, String> {
        self.answers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Questions with a non-blank answer.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| !a.trim().is_empty()).count()
    }
}
