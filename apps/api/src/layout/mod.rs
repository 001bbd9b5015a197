// Preview layout: height heuristics and page partitioning for the tailored resume.
// Pure and synchronous; recomputed from scratch whenever the document changes.

pub mod heights;
pub mod pagination;

// Re-export the public API consumed by the workflow views and handlers.
pub use heights::{default_layout_config, HeightEstimator, HeuristicEstimator, LayoutConfig};
pub use pagination::{paginate, paginate_with_config, Block, Page, Section};
