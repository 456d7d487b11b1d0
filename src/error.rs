//! Error types

use thiserror::Error;

/// Arithmetic failures inside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// Normalizing a vector of length zero
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
}

/// Fatal startup failures while acquiring GPU resources
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    Surface(String),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(String),
    #[error("failed to create GPU device: {0}")]
    Device(String),
    /// Shader did not compile; carries the compiler's messages
    #[error("could not compile shader.\n\n{diagnostics}")]
    ShaderCompile { diagnostics: String },
}

/// Settings that could not be parsed
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
