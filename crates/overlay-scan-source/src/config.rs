use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use overlay_scan_types::{FrameError, FrameResult};

use crate::source::DynFrameSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mock,
}

impl FromStr for Backend {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(Backend::Mock),
            other => Err(FrameError::configuration(format!(
                "unknown backend '{other}'"
            ))),
        }
    }
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mock => "mock",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compiled_backends() -> Vec<Backend> {
    let mut backends = Vec::new();
    #[cfg(feature = "backend-mock")]
    {
        backends.push(Backend::Mock);
    }
    backends
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub backend: Backend,
    pub input: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            backend: compiled_backends()
                .into_iter()
                .next()
                .unwrap_or(Backend::Mock),
            input: None,
        }
    }
}

impl Configuration {
    pub fn from_env() -> FrameResult<Self> {
        let mut config = Configuration::default();
        if let Ok(backend) = env::var("OVERLAY_SCAN_BACKEND") {
            config.backend = Backend::from_str(&backend)?;
        }
        if let Ok(path) = env::var("OVERLAY_SCAN_INPUT") {
            config.input = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    pub fn available_backends() -> Vec<Backend> {
        compiled_backends()
    }

    pub fn create_source(&self) -> FrameResult<DynFrameSource> {
        match self.backend {
            Backend::Mock => {
                #[cfg(feature = "backend-mock")]
                {
                    crate::backends::mock::boxed_mock(self.input.clone())
                }
                #[cfg(not(feature = "backend-mock"))]
                {
                    Err(FrameError::unsupported("mock"))
                }
            }
        }
    }
}
