//! The backend collaborator contract.
//!
//! The core consumes a narrow persistence/fetch interface and treats every
//! failure as recoverable: score reads fall back to an empty table, an
//! absent rank config triggers synthesis, and a failed preview fetch simply
//! leaves enrichment unset.

pub mod memory;

pub use memory::MemoryBackend;

use crate::types::errors::BackendError;
use crate::types::link::{LinkDetails, LinkProperties, OpenGraph, RankConfig, ScoreEntry};

/// Async interface to the service that persists links, scores and rank
/// config, and fetches preview metadata.
///
/// One call maps to one outstanding request. A hung call stalls only its
/// caller, never the store as a whole; there is no cancellation mechanism.
pub trait LinkBackend {
    /// Names of all stored links, in the backend's natural order.
    fn list_link_names(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, BackendError>> + Send;

    /// Reads a single link by name.
    fn read_link(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<LinkDetails, BackendError>> + Send;

    /// Creates a link and returns its backend-assigned name.
    fn create_link(
        &self,
        props: &LinkProperties,
    ) -> impl std::future::Future<Output = Result<String, BackendError>> + Send;

    /// Deletes a link by name.
    fn delete_link(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;

    /// The full score table.
    fn get_scores(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ScoreEntry>, BackendError>> + Send;

    /// Replaces the full score table.
    fn set_scores(
        &self,
        entries: &[ScoreEntry],
    ) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;

    /// The persisted rank config. `Ok(None)` means no config was ever saved,
    /// which is not an error.
    fn get_rank_config(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<RankConfig>, BackendError>> + Send;

    /// Persists the rank config and returns the stored (authoritative) value.
    fn set_rank_config(
        &self,
        config: &RankConfig,
    ) -> impl std::future::Future<Output = Result<RankConfig, BackendError>> + Send;

    /// Requests preview metadata for a URL.
    fn request_preview(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<OpenGraph, BackendError>> + Send;
}
