//! Fehlerdefinitionen für die Remap-Engine

use thiserror::Error;

/// Fehlertypen der Remap-Engine und ihrer Service-Schicht
#[derive(Debug, Error)]
pub enum EngineError {
    /// Fehler bei der Initialisierung einer Engine
    #[error("Initialisierungsfehler: {0}")]
    InitializationError(String),

    /// Fehler bei der Kommunikation über Kanäle
    #[error("Kanalfehler: {0}")]
    ChannelError(String),

    /// Fehler bei der Thread-Verwaltung
    #[error("Thread-Fehler: {0}")]
    ThreadError(String),

    /// Fehler bei der Verarbeitung eines Reports
    #[error("Verarbeitungsfehler: {0}")]
    ProcessingError(String),
}
