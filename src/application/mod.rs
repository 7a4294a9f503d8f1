pub mod use_cases;

pub use use_cases::fingerprint::compute_fingerprint;
pub use use_cases::lost_item_analysis::LostItemAnalysisUseCase;
pub use use_cases::result_cache::{ResultCache, ResultCacheStats};
