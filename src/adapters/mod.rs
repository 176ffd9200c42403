// Adapters layer: concrete implementations for external systems (conda, process spawning, terminal)

pub mod environment;
pub mod process;
pub mod terminal;
