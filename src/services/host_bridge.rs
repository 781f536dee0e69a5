// Tabshell host application bridge
// Read-only metadata about the hosting application. Window and menu lifecycle
// belong to the host; the core only queries it.

/// Queries the core may make of the host application.
pub trait HostBridge: Send + Sync {
    fn app_name(&self) -> String;
    fn app_version(&self) -> String;
}

/// Reports this crate's own package metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct CargoHostBridge;

impl HostBridge for CargoHostBridge {
    fn app_name(&self) -> String {
        env!("CARGO_PKG_NAME").to_string()
    }

    fn app_version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}
