//! Pagination — chunks a resume document into fixed-height preview pages.
//!
//! # Algorithm
//! Single greedy pass over the document's blocks in reading order:
//! header, summary, skills, "Professional Experience" + each job, "Education" + each school.
//!
//! - The header always opens page 1, whatever its estimated height.
//! - Any later block that would push the running height past the budget closes the
//!   current page and opens a new one containing just that block.
//! - Blocks are atomic. A block taller than the whole budget still gets its own page;
//!   overflowing the printable area is a rendering problem, not a pagination error.
//! - Section titles follow the same rule, so a title can end a page while its first
//!   entry starts the next one.
//! - The last page is always emitted.
//!
//! The output is a pure function of (document, budget, estimator).

use serde::Serialize;

use crate::layout::heights::{HeightEstimator, HeuristicEstimator, LayoutConfig};
use crate::models::resume::{EducationItem, ExperienceItem, ResumeDocument, ResumeHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Experience,
    Education,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Experience => "Professional Experience",
            Section::Education => "Education",
        }
    }
}

/// One renderable unit of the preview. `index` is the entry's position in the
/// document so clients can map a block back to its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Block {
    Header(ResumeHeader),
    Summary(String),
    Skills(Vec<String>),
    SectionTitle(Section),
    Experience { index: usize, item: ExperienceItem },
    Education { index: usize, item: EducationItem },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub blocks: Vec<Block>,
    /// Sum of the estimated heights of `blocks`.
    pub height: f32,
}

/// Flattens a document into blocks in reading order. Empty summary, empty skills and
/// empty sections (title included) produce no blocks.
pub fn document_blocks(document: &ResumeDocument) -> Vec<Block> {
    let mut blocks = vec![Block::Header(document.header.clone())];

    if !document.summary.trim().is_empty() {
        blocks.push(Block::Summary(document.summary.clone()));
    }
    if !document.skills.is_empty() {
        blocks.push(Block::Skills(document.skills.clone()));
    }
    if !document.experience.is_empty() {
        blocks.push(Block::SectionTitle(Section::Experience));
        blocks.extend(
            document
                .experience
                .iter()
                .enumerate()
                .map(|(index, item)| Block::Experience {
                    index,
                    item: item.clone(),
                }),
        );
    }
    if !document.education.is_empty() {
        blocks.push(Block::SectionTitle(Section::Education));
        blocks.extend(
            document
                .education
                .iter()
                .enumerate()
                .map(|(index, item)| Block::Education {
                    index,
                    item: item.clone(),
                }),
        );
    }

    blocks
}

/// Partitions `document` into pages whose estimated height stays within `budget`,
/// except where a single block is itself taller than the budget.
pub fn paginate(
    document: &ResumeDocument,
    budget: f32,
    estimator: &dyn HeightEstimator,
) -> Vec<Page> {
    let mut blocks = document_blocks(document).into_iter();
    let mut pages = Vec::new();
    let mut current = Page::default();

    // Header is placed unconditionally; it never triggers a break by itself.
    if let Some(header) = blocks.next() {
        current.height = estimator.estimate(&header);
        current.blocks.push(header);
    }

    for block in blocks {
        let height = estimator.estimate(&block);
        if current.height + height > budget {
            pages.push(std::mem::take(&mut current));
        }
        current.height += height;
        current.blocks.push(block);
    }

    pages.push(current);
    pages
}

/// Paginates with the stock heuristics and the budget from `config`.
pub fn paginate_with_config(document: &ResumeDocument, config: &LayoutConfig) -> Vec<Page> {
    paginate(
        document,
        config.content_height,
        &HeuristicEstimator::new(config),
    )
}


#[cfg(test)]
mod tests {
    use super::fixtures::{job, sample_document, school};
    use super::*;
    use crate::layout::heights::default_layout_config;

    /// Every block has the same height; makes page arithmetic obvious.
    struct Flat(f32);

    impl HeightEstimator for Flat {
        fn estimate(&self, _block: &Block) -> f32 {
            self.0
        }
    }

    fn kinds(page: &Page) -> Vec<String> {
        page.blocks
            .iter()
            .map(|b| match b {
                Block::Header(_) => "header".to_string(),
                Block::Summary(_) => "summary".to_string(),
                Block::Skills(_) => "skills".to_string(),
                Block::SectionTitle(s) => format!("title:{}", s.title()),
                Block::Experience { item, .. } => format!("job:{}", item.company),
                Block::Education { item, .. } => format!("school:{}", item.institution),
            })
            .collect()
    }

    #[test]
    fn test_small_document_fits_one_page_in_order() {
        let config = default_layout_config();
        let pages = paginate_with_config(&sample_document(), &config);

        assert_eq!(pages.len(), 1);
        assert_eq!(
            kinds(&pages[0]),
            vec![
                "header",
                "summary",
                "skills",
                "title:Professional Experience",
                "job:Acme",
                "job:Globex",
                "title:Education",
                "school:State University",
            ]
        );
        // 150 + 100 + 100 + 40 + 132 + 108 + 40 + 60
        assert!((pages[0].height - 730.0).abs() < 1e-3);
    }

    #[test]
    fn test_oversized_entries_each_get_own_page() {
        let config = default_layout_config();
        let mut doc = sample_document();
        doc.education.clear();
        // 60 + 40 * 24 = 1020 > 963
        doc.experience = vec![job("A", 40), job("B", 40), job("C", 40)];

        let pages = paginate_with_config(&doc, &config);

        assert_eq!(pages.len(), 4);
        assert_eq!(
            kinds(&pages[0]),
            vec!["header", "summary", "skills", "title:Professional Experience"]
        );
        for (page, company) in pages[1..].iter().zip(["A", "B", "C"]) {
            assert_eq!(kinds(page), vec![format!("job:{company}")]);
            assert_eq!(page.height, 1020.0);
        }
    }

    #[test]
    fn test_oversized_header_never_breaks() {
        let doc = sample_document();
        let pages = paginate(&doc, 10.0, &Flat(50.0));

        // Header alone overflows but stays first; every later block gets its own page.
        assert_eq!(kinds(&pages[0]), vec!["header"]);
        assert_eq!(pages.len(), document_blocks(&doc).len());
    }

    #[test]
    fn test_break_when_exceeding_budget_not_when_equal() {
        let doc = ResumeDocument {
            skills: vec!["x".to_string()],
            summary: "s".to_string(),
            ..Default::default()
        };
        // header + summary == budget exactly, skills overflows
        let pages = paginate(&doc, 200.0, &Flat(100.0));
        assert_eq!(pages.len(), 2);
        assert_eq!(kinds(&pages[0]), vec!["header", "summary"]);
        assert_eq!(kinds(&pages[1]), vec!["skills"]);
        assert_eq!(pages[1].height, 100.0);
    }

    #[test]
    fn test_section_title_may_end_a_page() {
        let doc = ResumeDocument {
            summary: "s".to_string(),
            experience: vec![job("Acme", 1)],
            ..Default::default()
        };
        // header, summary, title fill 300 exactly; the job spills over.
        let pages = paginate(&doc, 300.0, &Flat(100.0));
        assert_eq!(
            kinds(&pages[0]),
            vec!["header", "summary", "title:Professional Experience"]
        );
        assert_eq!(kinds(&pages[1]), vec!["job:Acme"]);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let doc = ResumeDocument {
            summary: "   ".to_string(),
            ..Default::default()
        };
        let pages = paginate_with_config(&doc, &default_layout_config());
        assert_eq!(pages.len(), 1);
        assert_eq!(kinds(&pages[0]), vec!["header"]);
    }

    #[test]
    fn test_education_follows_experience_across_pages() {
        let mut doc = sample_document();
        doc.experience = vec![job("Acme", 30)]; // 780
        doc.education = vec![school("MIT"), school("CMU")];

        let pages = paginate_with_config(&doc, &default_layout_config());

        let flattened: Vec<String> = pages.iter().flat_map(kinds).collect();
        assert_eq!(
            flattened,
            vec![
                "header",
                "summary",
                "skills",
                "title:Professional Experience",
                "job:Acme",
                "title:Education",
                "school:MIT",
                "school:CMU",
            ]
        );
        assert!(pages.len() >= 2);
        assert!(pages.iter().all(|p| !p.blocks.is_empty()));
    }

    #[test]
    fn test_paginate_is_deterministic() {
        let config = default_layout_config();
        let mut doc = sample_document();
        doc.experience = (0..8).map(|i| job(&format!("Co{i}"), i + 2)).collect();

        let first = paginate_with_config(&doc, &config);
        let second = paginate_with_config(&doc, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_block_indices_track_source_positions() {
        let doc = sample_document();
        let indices: Vec<usize> = document_blocks(&doc)
            .iter()
            .filter_map(|b| match b {
                Block::Experience { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_block_serializes_with_kind_tag() {
        let value = serde_json::to_value(Block::SectionTitle(Section::Education)).unwrap();
        assert_eq!(value["kind"], "section_title");
    }
}
