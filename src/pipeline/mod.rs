// Command pipelines — the flows behind `magpie collect` and `magpie enrich`.

pub mod codify;
pub mod collect;
