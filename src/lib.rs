//! linkshelf — collection store core for a local-first bookmark manager.
//!
//! Holds the in-memory set of saved links, keeps it ordered under three
//! interchangeable sort policies, absorbs manual rank adjustments, and
//! merges asynchronously-arriving preview metadata without corrupting
//! order. Persistence and preview fetching live behind the `LinkBackend`
//! trait; rendering is the presentation layer's job.

pub mod app;
pub mod backend;
pub mod managers;
pub mod store;
pub mod types;
