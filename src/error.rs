use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `cohera`.
///
/// Scoring itself never fails — data-quality gaps resolve to documented
/// neutral defaults — so the only fallible surface is configuration
/// loading and validation. Library callers can match on these; the
/// config-loading path uses `anyhow::Result` internally for context
/// chains.
#[derive(Debug, Error)]
pub enum CoheraError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {0}")]
    Validation(String),
}
