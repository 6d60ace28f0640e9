//! Error types and handling for the `Packliste` application

use thiserror::Error;

/// Main error type for the `Packliste` application
#[derive(Error, Debug)]
pub enum PacklisteError {
    /// Trip input validation errors, carrying every violated constraint
    #[error("Invalid trip input: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    /// Missing or unresolvable backend credentials
    #[error("Credential error: {message}")]
    Credentials { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Generation backend errors
    #[error("Generation backend error: {message}")]
    Backend { message: String },

    /// Document rendering errors
    #[error("Document render error: {message}")]
    Render { message: String },
}

impl PacklisteError {
    /// Create a new validation error from the collected violations
    pub fn validation<I, S>(violations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            violations: violations.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a new credential error
    pub fn credentials<S: Into<String>>(message: S) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new backend error
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message (German, matching the product surface)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PacklisteError::Validation { violations } => {
                format!("Ungültige Eingabe: {}", violations.join("; "))
            }
            PacklisteError::Credentials { .. } => {
                "Kein OpenAI API-Schlüssel gefunden. Bitte setze ihn als Umgebungsvariable oder in der Secrets-Datei.".to_string()
            }
            PacklisteError::Config { .. } => {
                "Konfigurationsfehler. Bitte prüfe die Konfigurationsdatei.".to_string()
            }
            PacklisteError::Backend { message } => {
                format!("Fehler bei der Packlistenerstellung: {message}")
            }
            PacklisteError::Render { message } => {
                format!("PDF-Export fehlgeschlagen: {message}")
            }
        }
    }
}
