//! Setup tooling of the miya protocol

pub use {config::Config, notes::NoteStore};

pub mod cmd;
pub mod config;
mod notes;
