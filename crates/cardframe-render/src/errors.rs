use thiserror::Error;

use crate::host_config::HostConfigError;

/// Fatal failures raised by the rendering session itself.
///
/// Everything inside a render pass degrades into diagnostics instead; the
/// only thing a caller cannot recover from is a session built over an
/// unusable host config.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid host config: {0}")]
    InvalidHostConfig(#[from] HostConfigError),
}
