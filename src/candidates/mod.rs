//! Candidate tracking: records, persistence, listing and CSV export.

pub mod export;
pub mod listing;
pub mod model;
pub mod repository;

pub use listing::{CandidateFilter, Pager, SortMode};
pub use model::{Candidate, CandidateDraft, ExperienceLevel, TECH_STACK_OPTIONS};
pub use repository::{CandidateRepository, ExperienceSummary};
