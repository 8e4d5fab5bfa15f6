use crate::traits::{
    FileSystem, Output, PluginResolver, RealFileSystem, StaticPluginResolver, TerminalOutput,
};
#[cfg(test)]
use crate::traits::{MockFileSystem, MockOutput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub output: Arc<dyn Output>,
    pub resolver: Arc<dyn PluginResolver>,
}

impl Context {
    /// Create a new context with real implementations (for production use).
    /// The resolver starts empty; the CLI layer registers the external
    /// plugin factories it knows how to locate.
    pub fn new() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            output: Arc::new(TerminalOutput),
            resolver: Arc::new(StaticPluginResolver::new()),
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            output: Arc::new(MockOutput::new()),
            resolver: Arc::new(StaticPluginResolver::new()),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        output: Arc<dyn Output>,
        resolver: Arc<dyn PluginResolver>,
    ) -> Self {
        Self {
            fs,
            output,
            resolver,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            output: Arc::clone(&self.output),
            resolver: Arc::clone(&self.resolver),
        }
    }
}
