//! `Packliste` - LLM-backed travel packing list generation
//!
//! This library provides the generation pipeline: validating trip input,
//! deterministically composing the backend prompt, invoking the generation
//! backend exactly once, and exporting the returned list text as a
//! downloadable PDF.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod pipeline;
pub mod profile;
pub mod prompt;
pub mod web;

// Re-export core types for public API
pub use config::{GenerationConfig, PacklisteConfig, ServerConfig};
pub use error::PacklisteError;
pub use export::{DocumentExporter, DocumentRenderer, ExportArtifact, PdfRenderer};
pub use generation::{BackendError, GenerationBackend, OpenAiBackend};
pub use pipeline::{PackingListResult, PackingListService};
pub use profile::{
    Accommodation, Activity, DateMode, Transport, TripDates, TripProfile, TripProfileInput,
    TripType,
};
pub use prompt::compose;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PacklisteError>;
