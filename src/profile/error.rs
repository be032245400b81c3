//! Fehlerdefinitionen für das Profil-Modul

use thiserror::Error;

/// Fehlertypen rund um Laden und Verwalten von Profilen
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Profildatei konnte nicht gelesen oder geschrieben werden
    #[error("Profildatei-Fehler: {0}")]
    FileError(String),

    /// Profildatei ist kein gültiges TOML
    #[error("Parse-Fehler: {0}")]
    ParseError(String),

    /// Profil ist in sich widersprüchlich (z.B. leerer Match-Parameter)
    #[error("Ungültiges Profil '{0}': {1}")]
    InvalidProfile(String, String),
}
