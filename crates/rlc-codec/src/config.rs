//! Codec parameters shared by the encoder and the decoder of one session.
//!
//! Both ends must agree on every field here; nothing is negotiated in-band.

use serde::Deserialize;

use crate::coefs::FULL_DENSITY;
use crate::error::CodecError;

pub const DEFAULT_SYMBOL_SIZE: usize = 1024;
pub const DEFAULT_MAX_CODING_WINDOW_SIZE: usize = 16;
/// Decoder bound, in coding windows, when none is configured.
pub const DEFAULT_LINEAR_SYSTEM_FACTOR: usize = 4;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodecConfigInput {
    pub symbol_size: Option<usize>,
    pub max_coding_window_size: Option<usize>,
    pub max_linear_system_size: Option<usize>,
    pub density_threshold: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Payload length of every symbol, in bytes.
    pub symbol_size: usize,
    /// Maximum number of source symbols a repair symbol may cover.
    pub max_coding_window_size: usize,
    /// Decoder only: how many ids behind the newest one rows are kept.
    /// Defaults to `DEFAULT_LINEAR_SYSTEM_FACTOR` coding windows.
    pub max_linear_system_size: usize,
    /// Coefficient density, `0..=15`; 15 means every coefficient is nonzero.
    pub density_threshold: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            symbol_size: DEFAULT_SYMBOL_SIZE,
            max_coding_window_size: DEFAULT_MAX_CODING_WINDOW_SIZE,
            max_linear_system_size: DEFAULT_LINEAR_SYSTEM_FACTOR * DEFAULT_MAX_CODING_WINDOW_SIZE,
            density_threshold: FULL_DENSITY,
        }
    }
}

impl CodecConfig {
    pub fn new(symbol_size: usize, max_coding_window_size: usize) -> Result<Self, CodecError> {
        CodecConfigInput {
            symbol_size: Some(symbol_size),
            max_coding_window_size: Some(max_coding_window_size),
            ..CodecConfigInput::default()
        }
        .resolve()
    }

    pub fn with_max_linear_system_size(mut self, size: usize) -> Result<Self, CodecError> {
        self.max_linear_system_size = size;
        self.validate()?;
        Ok(self)
    }

    pub fn with_density_threshold(mut self, density: u8) -> Result<Self, CodecError> {
        self.density_threshold = density;
        self.validate()?;
        Ok(self)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, CodecError> {
        if input.trim().is_empty() {
            return Ok(CodecConfig::default());
        }
        let parsed: CodecConfigInput = toml::from_str(input)
            .map_err(|e| CodecError::InvalidConfig(format!("invalid config TOML: {e}")))?;
        parsed.resolve()
    }

    fn validate(&self) -> Result<(), CodecError> {
        if self.symbol_size == 0 {
            return Err(CodecError::InvalidConfig(
                "symbol_size must be > 0".to_string(),
            ));
        }
        if self.max_coding_window_size == 0 {
            return Err(CodecError::InvalidConfig(
                "max_coding_window_size must be > 0".to_string(),
            ));
        }
        if self.max_linear_system_size < self.max_coding_window_size {
            return Err(CodecError::InvalidConfig(format!(
                "max_linear_system_size {} is smaller than max_coding_window_size {}",
                self.max_linear_system_size, self.max_coding_window_size
            )));
        }
        if self.density_threshold > FULL_DENSITY {
            return Err(CodecError::InvalidDensity(self.density_threshold));
        }
        Ok(())
    }
}

impl CodecConfigInput {
    pub fn resolve(self) -> Result<CodecConfig, CodecError> {
        let defaults = CodecConfig::default();
        let max_coding_window_size = self
            .max_coding_window_size
            .unwrap_or(defaults.max_coding_window_size);
        let config = CodecConfig {
            symbol_size: self.symbol_size.unwrap_or(defaults.symbol_size),
            max_coding_window_size,
            max_linear_system_size: self.max_linear_system_size.unwrap_or(
                max_coding_window_size.saturating_mul(DEFAULT_LINEAR_SYSTEM_FACTOR),
            ),
            density_threshold: self
                .density_threshold
                .unwrap_or(defaults.density_threshold),
        };
        config.validate()?;
        Ok(config)
    }
}
