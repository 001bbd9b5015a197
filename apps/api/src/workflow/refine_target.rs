//! Refine targeting: turns a text selection inside the preview into a popover
//! anchor plus the (selected text, instruction) pair a refinement needs.
//!
//! Geometry is in CSS pixels relative to the viewport, y growing downwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::optimizer::ResumeOptimizer;
use crate::workflow::controller::{Completion, Workflow, WorkflowError, REFINE_REQUIRED_MESSAGE};

pub const POPOVER_WIDTH: f32 = 320.0;
/// Distance the popover sits above the selection's top edge.
pub const POPOVER_OFFSET: f32 = 60.0;
pub const VIEWPORT_MARGIN: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// True if `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    pub text: String,
    #[serde(default)]
    pub collapsed: bool,
    pub bounds: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub left: f32,
    pub top: f32,
    pub width: f32,
}

/// Popover position for a selection: above it, clamped horizontally into the viewport.
pub fn anchor_for(selection: &Rect, viewport: &Viewport) -> Anchor {
    // max before min: on a viewport narrower than the popover the right clamp wins.
    let left = selection
        .left
        .max(VIEWPORT_MARGIN)
        .min(viewport.width - POPOVER_WIDTH);
    Anchor {
        left,
        top: selection.top - POPOVER_OFFSET,
        width: POPOVER_WIDTH,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSelection {
    pub text: String,
    pub anchor: Anchor,
}

/// Selection-plus-instruction draft for one preview.
#[derive(Debug, Clone)]
pub struct RefineTarget {
    preview_region: Rect,
    viewport: Viewport,
    pending: Option<PendingSelection>,
    instruction: String,
}

impl RefineTarget {
    pub fn new(preview_region: Rect, viewport: Viewport) -> Self {
        Self {
            preview_region,
            viewport,
            pending: None,
            instruction: String::new(),
        }
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    /// Records a selection change. Collapsed, blank, or out-of-preview selections
    /// clear the pending anchor. Returns whether the selection was taken.
    pub fn on_selection(&mut self, selection: &SelectionSnapshot) -> bool {
        let actionable = !selection.collapsed
            && !selection.text.trim().is_empty()
            && self.preview_region.contains(&selection.bounds);

        self.pending = actionable.then(|| PendingSelection {
            text: selection.text.clone(),
            anchor: anchor_for(&selection.bounds, &self.viewport),
        });
        actionable
    }
}

// Client-side drafting helpers; the HTTP refine endpoint takes the pair directly.
#[allow(dead_code)]
impl RefineTarget {
    pub fn set_instruction(&mut self, instruction: &str) {
        self.instruction = instruction.to_string();
    }

    pub fn can_submit(&self) -> bool {
        !self.instruction.trim().is_empty()
            && self
                .pending
                .as_ref()
                .is_some_and(|p| !p.text.trim().is_empty())
    }

    /// Hands the selection and instruction to the workflow's refine. Local state is
    /// cleared once the call settles, whatever the outcome. An incomplete draft is
    /// rejected without calling the service and left as it was.
    pub async fn submit(
        &mut self,
        workflow: &mut Workflow,
        optimizer: &dyn ResumeOptimizer,
    ) -> Result<Completion, WorkflowError> {
        if !self.can_submit() {
            return Err(WorkflowError::Validation(REFINE_REQUIRED_MESSAGE.to_string()));
        }
        let selected_text = self
            .pending
            .as_ref()
            .map(|p| p.text.clone())
            .unwrap_or_default();

        let outcome = workflow
            .refine(optimizer, &self.instruction, &selected_text)
            .await;

        debug!("Clearing refine target after submit");
        self.pending = None;
        self.instruction.clear();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::layout::pagination::fixtures::sample_document;
    use crate::models::analysis::fixtures::director_analysis;
    use crate::models::resume::OptimizationResult;
    use crate::optimizer::mock::{Call, ScriptedOptimizer};

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    fn preview() -> Rect {
        Rect {
            left: 100.0,
            top: 0.0,
            width: 800.0,
            height: 2000.0,
        }
    }

    fn selection(text: &str, left: f32, top: f32) -> SelectionSnapshot {
        SelectionSnapshot {
            text: text.to_string(),
            collapsed: false,
            bounds: Rect {
                left,
                top,
                width: 120.0,
                height: 18.0,
            },
        }
    }

    async fn result_workflow(optimizer: &ScriptedOptimizer) -> Workflow {
        optimizer.push_analysis(Ok(director_analysis()));
        optimizer.push_generation(Ok(OptimizationResult {
            change_overview: "Rewrote".to_string(),
            optimized_resume: sample_document(),
        }));
        let mut wf = Workflow::new();
        wf.start().unwrap();
        wf.submit_intake(optimizer, "CTO", "resume").await.unwrap();
        wf.submit_strategy(optimizer, &HashMap::new(), &[])
            .await
            .unwrap();
        wf
    }

    #[test]
    fn test_anchor_sits_above_selection() {
        let anchor = anchor_for(&selection("x", 300.0, 400.0).bounds, &VIEWPORT);
        assert_eq!(anchor.left, 300.0);
        assert_eq!(anchor.top, 340.0);
        assert_eq!(anchor.width, POPOVER_WIDTH);
    }

    #[test]
    fn test_anchor_clamps_both_edges() {
        let near_left = anchor_for(&selection("x", 5.0, 100.0).bounds, &VIEWPORT);
        assert_eq!(near_left.left, 20.0);

        let near_right = anchor_for(&selection("x", 1200.0, 100.0).bounds, &VIEWPORT);
        assert_eq!(near_right.left, 960.0);
    }

    #[test]
    fn test_selection_outside_preview_clears_anchor() {
        let mut target = RefineTarget::new(preview(), VIEWPORT);
        assert!(target.on_selection(&selection("Acme", 200.0, 300.0)));
        assert!(target.pending().is_some());

        // Sidebar text, left of the preview.
        assert!(!target.on_selection(&selection("Hiring", 10.0, 300.0)));
        assert!(target.pending().is_none());
    }

    #[test]
    fn test_collapsed_or_blank_selection_is_ignored() {
        let mut target = RefineTarget::new(preview(), VIEWPORT);
        let mut collapsed = selection("Acme", 200.0, 300.0);
        collapsed.collapsed = true;
        assert!(!target.on_selection(&collapsed));
        assert!(!target.on_selection(&selection("  \n", 200.0, 300.0)));
        assert!(target.pending().is_none());
    }

    #[tokio::test]
    async fn test_submit_requires_instruction() {
        let optimizer = ScriptedOptimizer::new();
        let mut wf = result_workflow(&optimizer).await;
        let mut target = RefineTarget::new(preview(), VIEWPORT);
        target.on_selection(&selection("Acme", 200.0, 300.0));

        let err = target.submit(&mut wf, &optimizer).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(target.pending().is_some());
        assert!(!optimizer
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Refine { .. })));
    }

    #[tokio::test]
    async fn test_submit_clears_state_even_on_failure() {
        let optimizer = ScriptedOptimizer::new();
        let mut wf = result_workflow(&optimizer).await;
        optimizer.push_refinement(Err("upstream".to_string()));

        let mut target = RefineTarget::new(preview(), VIEWPORT);
        target.on_selection(&selection("Acme", 200.0, 300.0));
        target.set_instruction("Quantify this");
        assert!(target.can_submit());

        let completion = target.submit(&mut wf, &optimizer).await.unwrap();

        assert!(matches!(completion, Completion::Failed { .. }));
        assert!(target.pending().is_none());
        assert!(!target.can_submit());
        assert_eq!(
            optimizer.calls().last(),
            Some(&Call::Refine {
                instruction: "Quantify this".to_string(),
                selected_text: "Acme".to_string(),
            })
        );
    }
}
