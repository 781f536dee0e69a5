// Tabshell services
// Collaborators of the session core: page loading, host metadata, settings persistence.

pub mod host_bridge;
pub mod page_load_backend;
pub mod settings_engine;
