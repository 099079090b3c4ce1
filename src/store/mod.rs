// Collection store and its sort policies.

pub mod collection_store;
pub mod sort_policy;
