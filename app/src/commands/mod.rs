//! Frontend command handlers.

pub mod capability;
pub mod form;
pub mod preview;
pub mod redaction;
