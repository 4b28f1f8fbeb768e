//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::conversion::Converter;
use crate::tools::{ProcessRunner, ToolRunner};
use crate::workspace::ScratchWorkspace;

/// Shared application state.
///
/// Everything in here is fixed at startup; requests share it read-only.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    workspace: ScratchWorkspace,
    converter: Converter,
}

impl AppState {
    /// Create state that runs the real Ghostscript/veraPDF binaries
    pub fn new(config: Config) -> Self {
        let runner = Arc::new(ProcessRunner::new(config.tools.timeout));
        Self::with_runner(config, runner)
    }

    /// Create state with a custom tool runner
    pub fn with_runner(config: Config, runner: Arc<dyn ToolRunner>) -> Self {
        let workspace = ScratchWorkspace::new(config.workspace.resolved_dir());
        let converter = Converter::new(runner, config.tools.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                workspace,
                converter,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the scratch workspace
    pub fn workspace(&self) -> &ScratchWorkspace {
        &self.inner.workspace
    }

    /// Get the converter
    pub fn converter(&self) -> &Converter {
        &self.inner.converter
    }
}
