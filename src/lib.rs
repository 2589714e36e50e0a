//! Masking, validation and suggestion engine for a keyboard-first time input,
//! plus the session state machine that commits or reverts what was typed.

pub mod config;
pub mod entry;
pub mod replay;
pub mod time_provider;
