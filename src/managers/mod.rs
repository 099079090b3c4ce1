// Stateful managers around the collection store: sort mode, manual rank
// adjustments, and asynchronous preview merging.

pub mod enrichment_merger;
pub mod mode_controller;
pub mod rank_adjuster;
