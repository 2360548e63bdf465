//! Ports Layer - trait definitions
//!
//! Inbound ports define the membership API that callers program against,
//! so a fixed generation and the adaptive filter are interchangeable.

pub mod inbound;

pub use inbound::MembershipFilter;
