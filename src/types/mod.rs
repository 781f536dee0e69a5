// Tabshell shared type definitions
// Each submodule defines types used across the shell core.

pub mod errors;
pub mod events;
pub mod notification;
pub mod session;
pub mod settings;
pub mod tab;
