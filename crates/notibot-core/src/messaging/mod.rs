//! Transport-neutral inbound commands and outbound message port.

pub mod port;
pub mod types;
