pub mod fingerprint;
pub mod lost_item_analysis;
pub mod prompts;
pub mod result_cache;
