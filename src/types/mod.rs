// Shared type definitions used across the collection store core.

pub mod errors;
pub mod link;
