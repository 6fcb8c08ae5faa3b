// Magpie: social listening with LLM-batched text codification.
//
// This is the library root. Collection (bluesky, store) gathers posts into
// CSV datasets; codification (enrich, llm) annotates the stored text in
// batches through an external completion endpoint.

pub mod bluesky;
pub mod clean;
pub mod config;
pub mod enrich;
pub mod llm;
pub mod pipeline;
pub mod status;
pub mod store;
