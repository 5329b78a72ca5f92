//! RADIUS packet-level definitions needed by the attribute encoder.

mod code;

pub use code::Code;
