//! Outbound adapters implementing the domain store ports.

pub mod memory;
pub mod persistence;
