//! Export macro for extension modules.

/// Emits the fixed FFI symbols a Wirebird extension module must export.
///
/// Takes the path of a constructor with the [`ExtensionCtor`] signature and
/// generates `wirebird_extension_abi_version` and
/// `wirebird_extension_create` at the crate root. Invoke it exactly once per
/// module.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use wirebird_extension_sdk::{export_extension, Extension, HostFacade, OpaqueState};
///
/// struct MyExtension;
///
/// impl Extension for MyExtension {
///     fn on_connect(&self, _version: u32, _platform: &str) {}
/// }
///
/// fn create(_state: OpaqueState, _facade: Arc<dyn HostFacade>) -> Box<dyn Extension> {
///     Box::new(MyExtension)
/// }
///
/// export_extension!(create);
/// ```
///
/// [`ExtensionCtor`]: crate::ExtensionCtor
#[macro_export]
macro_rules! export_extension {
    ($ctor:path) => {
        #[no_mangle]
        pub extern "C" fn wirebird_extension_abi_version() -> u32 {
            $crate::ABI_VERSION
        }

        #[no_mangle]
        pub extern "Rust" fn wirebird_extension_create(
            state: $crate::OpaqueState,
            facade: ::std::sync::Arc<dyn $crate::HostFacade>,
        ) -> ::std::boxed::Box<dyn $crate::Extension> {
            // Pin the constructor to the contract signature so a mismatch is
            // a compile error inside the module, not a crash in the host.
            let ctor: $crate::ExtensionCtor = $ctor;
            ctor(state, facade)
        }
    };
}
