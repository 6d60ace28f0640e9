//! Generation pipeline service
//!
//! Wires a validated trip profile through prompt composition, the single
//! backend call, and document export. The service is constructed once at
//! startup with its backend and exporter, and shared read-only between
//! requests; there is no other cross-request state.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::Result;
use crate::export::{DocumentExporter, ExportArtifact, derive_file_name};
use crate::generation::GenerationBackend;
use crate::profile::TripProfile;
use crate::prompt;

/// Generated packing list as handed back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct PackingListResult {
    /// The backend's list text, unmodified
    pub text: String,
}

/// The compose, generate and export pipeline behind the HTTP boundary
pub struct PackingListService {
    backend: Arc<dyn GenerationBackend>,
    exporter: DocumentExporter,
}

impl PackingListService {
    /// Create a new service from its capabilities
    pub fn new(backend: Arc<dyn GenerationBackend>, exporter: DocumentExporter) -> Self {
        Self { backend, exporter }
    }

    /// Generate the packing list text for a validated profile
    ///
    /// Composes the prompt and performs exactly one backend call. Failures
    /// are returned for the caller to present; nothing is retried.
    pub async fn generate(&self, profile: &TripProfile) -> Result<PackingListResult> {
        let prompt = prompt::compose(profile);

        info!(destination = %profile.destination, "Generating packing list");
        let start = Instant::now();

        let text = self.backend.generate(&prompt).await?;

        info!(
            "Packing list generated in {:.3}s",
            start.elapsed().as_secs_f64()
        );
        Ok(PackingListResult { text })
    }

    /// Export already generated list text as a downloadable PDF
    ///
    /// Works from the text rather than re-generating, so an export failure
    /// never costs a second backend call and the generated list stays
    /// available to the user.
    pub fn export(
        &self,
        text: &str,
        destination: &str,
        start_date: Option<NaiveDate>,
    ) -> Result<ExportArtifact> {
        let file_name = derive_file_name(destination, start_date);
        self.exporter.export(text, &file_name)
    }
}
