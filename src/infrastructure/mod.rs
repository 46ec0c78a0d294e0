//! Adapters implementing the processor port.

pub mod scripted;
pub mod verifone;
