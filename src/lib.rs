//! aep-snapshot - compositing project to JSON snapshot exporter
//!
//! Walks a project document through the [`host`] traits and builds a
//! canonical, serde-serializable [`Snapshot`]. The [`memory`] host backs
//! both tests and the command-line tool.

// Host object model
pub mod host;

// Export pipeline
pub mod config;
pub mod export;

// In-memory host
pub mod memory;

// Command line
pub mod cli;
pub mod runner;

pub use config::{CollectionStrategy, ExportConfig};
pub use export::{ExportError, FieldValue, Snapshot, build_snapshot, persist, render};
pub use host::{Document, HostValue, ReadError};
pub use memory::MemDocument;
