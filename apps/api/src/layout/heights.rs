//! Approximate rendered heights for resume preview blocks.
//!
//! These are heuristics, not measurements: a base constant per block type plus a
//! per-item multiplier where the block grows with its content. Values are pixels at
//! 96 DPI on A4 and are tuned for one visual density, so every constant is carried in
//! `LayoutConfig` and can be overridden from the environment.

use serde::{Deserialize, Serialize};

use crate::layout::pagination::Block;

/// A4 height at 96 DPI.
pub const A4_HEIGHT_PX: f32 = 1123.0;
/// Top and bottom padding inside each preview page.
pub const PAGE_PADDING_PX: f32 = 80.0;

/// Page budget and per-block height constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Maximum accumulated estimated height on one page before a break is forced.
    pub content_height: f32,
    pub header_height: f32,
    pub summary_height: f32,
    pub section_title_height: f32,
    /// Skills block base height; the list adds `skills_row_height` per three skills.
    pub skills_base_height: f32,
    pub skills_row_height: f32,
    /// Experience entry base height; each achievement adds `achievement_height`.
    pub experience_base_height: f32,
    pub achievement_height: f32,
    pub education_height: f32,
}

/// Returns the default layout: A4 minus padding, constants tuned for the preview template.
pub fn default_layout_config() -> LayoutConfig {
    LayoutConfig {
        content_height: A4_HEIGHT_PX - PAGE_PADDING_PX * 2.0,
        header_height: 150.0,
        summary_height: 100.0,
        section_title_height: 40.0,
        skills_base_height: 80.0,
        skills_row_height: 20.0,
        experience_base_height: 60.0,
        achievement_height: 24.0,
        education_height: 60.0,
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        default_layout_config()
    }
}

/// Estimates how much vertical space a block will take when rendered.
pub trait HeightEstimator {
    fn estimate(&self, block: &Block) -> f32;
}

/// The stock estimator: fixed per-type constants from a `LayoutConfig`.
#[derive(Debug, Clone)]
pub struct HeuristicEstimator<'a> {
    config: &'a LayoutConfig,
}

impl<'a> HeuristicEstimator<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }
}

impl HeightEstimator for HeuristicEstimator<'_> {
    fn estimate(&self, block: &Block) -> f32 {
        let c = self.config;
        match block {
            Block::Header(_) => c.header_height,
            Block::Summary(_) => c.summary_height,
            // Skills flow roughly three to a row.
            Block::Skills(skills) => {
                c.skills_base_height + (skills.len() as f32 / 3.0) * c.skills_row_height
            }
            Block::SectionTitle(_) => c.section_title_height,
            Block::Experience { item, .. } => {
                c.experience_base_height + item.achievements.len() as f32 * c.achievement_height
            }
            Block::Education { .. } => c.education_height,
        }
    }
}
