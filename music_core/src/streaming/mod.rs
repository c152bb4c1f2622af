//! Byte-range aware file streaming

pub mod handler;
pub mod range;

pub use handler::{StreamHandler, StreamResponse};
pub use range::{ByteRangeRequest, RangeSpec};
