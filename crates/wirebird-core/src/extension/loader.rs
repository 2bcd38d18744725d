//! Process-wide extension factory resolution.
//!
//! Resolution runs exactly once, single-threaded, during client startup and
//! strictly before any session handling begins; the resulting factory cell
//! is read-only afterwards. Every failure on this path is operator
//! misconfiguration and aborts startup rather than degrading into "no
//! extension".

use std::path::Path;
use std::sync::Arc;

use libloading::{Library, Symbol};
use once_cell::sync::OnceCell;
use tracing::info;

use wirebird_extension_sdk::{
    Extension, ExtensionCreateFn, ExtensionCtor, HostFacade, OpaqueState, ABI_VERSION,
    ABI_VERSION_SYMBOL, CREATE_SYMBOL,
};

use crate::config::ClientConfig;

/// Result type for factory resolution.
pub type Result<T> = std::result::Result<T, ExtensionHostError>;

/// Load-time extension errors. All of these are fatal to client startup.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionHostError {
    /// No file at the configured module path.
    #[error("extension module not found: {0}")]
    ModuleNotFound(String),

    /// The file exists but could not be loaded as a library.
    #[error("failed to load extension module: {0}")]
    LoadFailed(String),

    /// A required export is missing from the module.
    #[error("extension symbol not found: {0}")]
    SymbolNotFound(String),

    /// The module was built against a different extension interface.
    #[error("incompatible extension ABI: expected {expected}, got {got}")]
    IncompatibleAbi { expected: u32, got: u32 },

    /// `init` ran more than once.
    #[error("extension factory already initialized")]
    AlreadyInitialized,
}

type AbiVersionFn = unsafe extern "C" fn() -> u32;

enum FactoryInner {
    /// Constructor resolved from a dynamically loaded module. The library
    /// handle must outlive every call through `create`.
    Dynamic {
        _library: Library,
        create: ExtensionCreateFn,
    },
    /// Statically selected in-process constructor.
    Static(ExtensionCtor),
}

/// The process-wide constructor for extension instances: maps the session's
/// persisted opaque state and a session-bound facade to one instance.
pub struct ExtensionFactory {
    inner: FactoryInner,
}

impl std::fmt::Debug for ExtensionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.inner {
            FactoryInner::Dynamic { .. } => "Dynamic",
            FactoryInner::Static(_) => "Static",
        };
        f.debug_struct("ExtensionFactory").field("inner", &kind).finish()
    }
}

impl ExtensionFactory {
    /// Load a factory from an extension module on disk.
    ///
    /// The module's ABI-version export is called and checked against the
    /// SDK's [`ABI_VERSION`] before the constructor symbol is resolved;
    /// that check is what makes the Rust-typed constructor signature safe
    /// to call across the library boundary.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ExtensionHostError::ModuleNotFound(
                path.display().to_string(),
            ));
        }

        let library = unsafe { Library::new(path) }
            .map_err(|e| ExtensionHostError::LoadFailed(e.to_string()))?;

        let got = unsafe {
            let abi_version: Symbol<AbiVersionFn> = library
                .get(ABI_VERSION_SYMBOL.as_bytes())
                .map_err(|_| ExtensionHostError::SymbolNotFound(ABI_VERSION_SYMBOL.to_string()))?;
            abi_version()
        };
        if got != ABI_VERSION {
            return Err(ExtensionHostError::IncompatibleAbi {
                expected: ABI_VERSION,
                got,
            });
        }

        let create: ExtensionCreateFn = unsafe {
            let symbol: Symbol<ExtensionCreateFn> = library
                .get(CREATE_SYMBOL.as_bytes())
                .map_err(|_| ExtensionHostError::SymbolNotFound(CREATE_SYMBOL.to_string()))?;
            *symbol
        };

        Ok(Self {
            inner: FactoryInner::Dynamic {
                _library: library,
                create,
            },
        })
    }

    /// Wrap a statically selected constructor (build- or
    /// configuration-time choice instead of a loadable module).
    pub fn from_fn(ctor: ExtensionCtor) -> Self {
        Self {
            inner: FactoryInner::Static(ctor),
        }
    }

    /// Construct one extension instance for a session.
    pub fn construct(
        &self,
        state: OpaqueState,
        facade: Arc<dyn HostFacade>,
    ) -> Box<dyn Extension> {
        match &self.inner {
            FactoryInner::Dynamic { create, .. } => unsafe { create(state, facade) },
            FactoryInner::Static(ctor) => ctor(state, facade),
        }
    }
}

static FACTORY: OnceCell<Option<ExtensionFactory>> = OnceCell::new();

/// Resolve the process-wide factory from configuration.
///
/// An unset or empty module path leaves the factory absent, which is the
/// common case. An error is fatal: the caller must abort startup instead of
/// continuing without the configured extension.
pub fn init(config: &ClientConfig) -> Result<()> {
    let factory = match config.extension_module() {
        None => None,
        Some(path) => {
            let factory = ExtensionFactory::load(path)?;
            info!(module = %path.display(), "extension module loaded");
            Some(factory)
        }
    };

    FACTORY
        .set(factory)
        .map_err(|_| ExtensionHostError::AlreadyInitialized)
}

/// The resolved factory, or `None` when the feature is disabled or [`init`]
/// has not run.
pub fn global() -> Option<&'static ExtensionFactory> {
    FACTORY.get().and_then(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirebird_extension_sdk::Extension;

    struct Quiet;

    impl Extension for Quiet {
        fn on_connect(&self, _version: u32, _platform: &str) {}
    }

    fn quiet_ctor(_state: OpaqueState, _facade: Arc<dyn HostFacade>) -> Box<dyn Extension> {
        Box::new(Quiet)
    }

    #[test]
    fn test_load_nonexistent_module() {
        let err = ExtensionFactory::load(Path::new("/nonexistent/ext.so")).unwrap_err();
        assert!(matches!(err, ExtensionHostError::ModuleNotFound(_)));
    }

    #[test]
    fn test_load_rejects_non_library_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ext.so");
        std::fs::write(&path, b"definitely not a shared object").unwrap();

        let err = ExtensionFactory::load(&path).unwrap_err();
        assert!(matches!(err, ExtensionHostError::LoadFailed(_)));
    }

    #[test]
    fn test_static_factory_constructs() {
        struct NullFacade;

        impl HostFacade for NullFacade {
            fn send_raw(&self, _payload: &[u8]) {}
            fn save_state(&self, _state: OpaqueState) {}
        }

        let factory = ExtensionFactory::from_fn(quiet_ctor);
        let instance = factory.construct(None, Arc::new(NullFacade));
        instance.on_connect(1, "test");
    }

    #[test]
    fn test_incompatible_abi_error_names_both_versions() {
        let err = ExtensionHostError::IncompatibleAbi {
            expected: ABI_VERSION,
            got: 99,
        };
        let msg = err.to_string();
        assert!(msg.contains(&ABI_VERSION.to_string()));
        assert!(msg.contains("99"));
    }
}
