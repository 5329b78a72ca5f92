use crate::dictionary::AttrId;
use thiserror::Error;

/// Fatal encoder errors.
///
/// Running out of buffer space is not an error: encoders report it as
/// `Ok(0)` and leave the cursor on the unconsumed pair. Any `Err` means the
/// current packet attempt must be abandoned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{context}: Expected {expected} got \"{found}\"")]
    TypeMismatch {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0}")]
    StackMismatch(&'static str),
    #[error("Can't encode empty TLV {0}")]
    EmptyTlv(String),
    #[error("Called with non-standard attribute {0}")]
    NonStandardAttribute(u32),
    #[error("No request packet, cannot encrypt {0} attribute")]
    MissingOriginal(String),
    #[error("Unsupported {field} field width {width} for vendor {vendor}")]
    UnsupportedVendorWidth {
        vendor: u32,
        field: &'static str,
        width: u8,
    },
    #[error("{0}")]
    InvalidStack(String),
    #[error("Attribute depth {depth} exceeds maximum nesting depth {max}")]
    NestingTooDeep { depth: usize, max: usize },
    #[error("Nested attribute structure too large to encode")]
    NoProgress,
    #[error("Unknown attribute {0}")]
    UnknownAttribute(AttrId),
    #[error("{attr} expects a {expected} value, got {found}")]
    ValueKindMismatch {
        attr: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{attr} value too long: {len} bytes (max {max})")]
    ValueTooLong { attr: String, len: usize, max: usize },
    #[error("{attr} requires a value of exactly {expected} bytes, got {actual}")]
    InvalidLength {
        attr: String,
        expected: usize,
        actual: usize,
    },
}
