// Tabshell state managers
// The session store owns the tabs; the navigation controller is the only writer to it.

pub mod navigation_controller;
pub mod session_store;
