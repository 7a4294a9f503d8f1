//! Ranks the places a lost item most likely went missing, using a generative model,
//! and derives stable cache keys for those queries.

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::{compute_fingerprint, LostItemAnalysisUseCase, ResultCache};
pub use domain::activity::ActivityEntry;
pub use domain::error::{AppError, Result};
pub use domain::fingerprint::Fingerprint;
