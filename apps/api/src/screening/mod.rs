// Résumé screening pipeline: extract → name → evaluate → post-process → rank.
// All model calls go through llm_client::GenerativeModel.

pub mod dispatcher;
pub mod handlers;
pub mod name;
pub mod postprocess;
pub mod prompts;
pub mod ranker;
