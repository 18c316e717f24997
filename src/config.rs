//! Service configuration, loaded once at process start.
//!
//! Every knob lives in [`ServiceConfig`], built via its
//! [`ServiceConfigBuilder`]. The config is shared read-only by all request
//! handlers; nothing in it changes after startup.

use crate::error::NoteError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Fixed magnification applied to every PDF page before it is sent to the
/// model. Not configurable.
pub const RENDER_SCALE: f32 = 2.0;

/// Configuration for the note-tutor service.
///
/// # Example
/// ```rust
/// use note_tutor::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .base_url("http://localhost:8080")
///     .port(5042)
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// assert_eq!(config.port, 5042);
/// ```
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Prefix for asset references that start with `/`. Plain string
    /// concatenation, no URL joining.
    pub base_url: String,

    /// Address the HTTP server binds to. Default: `0.0.0.0`.
    pub bind_address: IpAddr,

    /// Listen port. Default: 5042.
    pub port: u16,

    /// LLM provider name understood by `edgequake_llm::ProviderFactory`.
    /// Default: `gemini`.
    pub provider_name: String,

    /// LLM model identifier. Default: `gemini-2.0-flash`.
    pub model: String,

    /// Sampling temperature. Default: 0.4.
    pub temperature: f32,

    /// Maximum tokens the model may generate per call. Default: 8192.
    ///
    /// Summaries run to 20+ lines of Korean prose with TeX, and five quiz
    /// items with embedded code blocks; 8192 leaves headroom for both.
    pub max_tokens: usize,

    /// Per-asset download timeout. `None` (default) leaves the HTTP client's
    /// own defaults in place.
    pub download_timeout_secs: Option<u64>,

    /// Explicit path to libpdfium. When `None` the working directory and then
    /// the system library path are searched.
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5042,
            provider_name: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.4,
            max_tokens: 8192,
            download_timeout_secs: None,
            pdfium_lib_path: None,
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn bind_address(mut self, addr: IpAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn pdfium_lib_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.pdfium_lib_path = path;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, NoteError> {
        let c = &self.config;
        if c.port == 0 {
            return Err(NoteError::InvalidConfig("port must be non-zero".into()));
        }
        if c.max_tokens == 0 {
            return Err(NoteError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.provider_name.trim().is_empty() || c.model.trim().is_empty() {
            return Err(NoteError::InvalidConfig(
                "provider and model must both be set".into(),
            ));
        }
        if c.download_timeout_secs == Some(0) {
            return Err(NoteError::InvalidConfig(
                "download timeout must be ≥ 1s when set".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_gemini_on_port_5042() {
        let c = ServiceConfig::default();
        assert_eq!(c.provider_name, "gemini");
        assert_eq!(c.model, "gemini-2.0-flash");
        assert_eq!(c.download_timeout_secs, None);
        assert_eq!(c.socket_addr().to_string(), "0.0.0.0:5042");
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = ServiceConfig::builder().temperature(7.5).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn builder_rejects_zero_port() {
        let err = ServiceConfig::builder().port(0).build().unwrap_err();
        assert!(matches!(err, NoteError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let err = ServiceConfig::builder()
            .download_timeout_secs(Some(0))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn builder_rejects_blank_model() {
        assert!(ServiceConfig::builder().model("  ").build().is_err());
    }
}
