//! Logger initialization for binaries and the WASM entry point.

/// Install the platform logger.
///
/// Natively this is `env_logger` honouring `RUST_LOG` (default `info`). On
/// WASM it routes `log` to the browser console and installs the panic hook.
/// Calling it more than once is harmless.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        // Fails only if a logger is already installed.
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}
