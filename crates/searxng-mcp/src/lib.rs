//! `mcp-searxng` crate (library surface).
//!
//! The primary entrypoint for end users is the `mcp-searxng` binary (CLI + MCP stdio).
//! This library module exists for embedding: it re-exports the core types and the
//! reqwest-backed fallback searcher without depending on internal crate layout.

pub use searxng_core as core;
pub use searxng_local as local;
