//! Fixed sampling parameters and the named deployment profiles.
//!
//! Parameters are constant per deployment and never come from the request.
//! The two deployment shapes historically used different values, so both
//! are kept as named profiles instead of being merged into one.

use serde::Serialize;

use crate::error_handler::{ConfigError, Result, validate_range_f32, validate_stop_sequences};

/// Sampling configuration passed with every inference call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelParameters {
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Sequences that stop generation. Empty means "none".
    pub stop_sequences: Vec<String>,
}

/// Named parameter sets, one per deployment shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingProfile {
    /// Long-lived web process backed by the Azure AI project.
    Project,
    /// Single-invocation function backed by Bedrock.
    Function,
}

impl SamplingProfile {
    /// Returns the parameter set for this profile.
    pub fn parameters(self) -> ModelParameters {
        match self {
            SamplingProfile::Project => ModelParameters {
                temperature: 0.3,
                max_tokens: 800,
                top_p: 0.95,
                stop_sequences: Vec::new(),
            },
            SamplingProfile::Function => ModelParameters {
                temperature: 0.0,
                max_tokens: 512,
                top_p: 0.9,
                stop_sequences: Vec::new(),
            },
        }
    }
}

impl ModelParameters {
    /// Builds and validates a custom parameter set.
    ///
    /// # Errors
    /// - [`ConfigError::OutOfRange`] for temperature outside `0.0..=2.0`,
    ///   top-p outside `0.0..=1.0` or a zero token budget
    /// - [`ConfigError::InvalidStopSequence`] if a stop sequence is empty
    pub fn new(
        temperature: f32,
        max_tokens: u32,
        top_p: f32,
        stop_sequences: Vec<String>,
    ) -> Result<Self> {
        let params = Self {
            temperature,
            max_tokens,
            top_p,
            stop_sequences,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks every field against the ranges providers accept.
    pub fn validate(&self) -> Result<()> {
        validate_range_f32(
            "temperature",
            "expected 0.0..=2.0",
            self.temperature,
            0.0,
            2.0,
        )?;
        validate_range_f32("top_p", "expected 0.0..=1.0", self.top_p, 0.0, 1.0)?;
        if self.max_tokens == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_tokens",
                detail: "expected at least 1",
            }
            .into());
        }
        validate_stop_sequences(&self.stop_sequences)
    }
}

impl From<SamplingProfile> for ModelParameters {
    fn from(profile: SamplingProfile) -> Self {
        profile.parameters()
    }
}
