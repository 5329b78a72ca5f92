//! RADIUS Attribute Encoding
//!
//! This crate turns typed attribute/value pairs into RADIUS wire format as
//! defined in RFC 2865, 2868, 6929 and the WiMAX Forum VSA conventions.
//!
//! # Features
//!
//! - RFC, TLV, Vendor-Specific, Extended and Long-Extended headers
//! - Extended-Vendor-Specific and WiMAX continuation attributes
//! - Fragmentation of values longer than one attribute
//! - User-Password, Tunnel-Password and Ascend-Secret obfuscation
//! - CHAP-Password construction
//!
//! # Example
//!
//! ```rust
//! use radius_encode::{
//!     AttrFlags, AttrType, Code, Dictionary, EncodeContext, Encoder, PairCursor, SaltCounter,
//!     Value, ValueKind, ValuePair,
//! };
//! use radius_encode::auth::generate_request_authenticator;
//!
//! let mut dict = Dictionary::new();
//! let nas_port = dict
//!     .add_attribute(None, "NAS-Port", 5, AttrType::Value(ValueKind::Integer), AttrFlags::default())
//!     .unwrap();
//!
//! let pairs = vec![ValuePair::new(&dict, nas_port, Value::Integer(42)).unwrap()];
//! let salt = SaltCounter::new();
//! let ctx = EncodeContext::new(Code::AccessRequest, b"secret", generate_request_authenticator(), &salt);
//!
//! let mut buf = [0u8; 4096];
//! let mut cursor = PairCursor::new(&pairs);
//! let len = Encoder::new(&dict).encode_pair(&mut buf, &ctx, &mut cursor).unwrap();
//!
//! assert_eq!(&buf[..len], &[5, 6, 0, 0, 0, 42]);
//! assert!(cursor.is_exhausted());
//! ```

pub mod auth;
pub mod chap;
pub mod config;
pub mod context;
pub mod dictionary;
pub mod encode;
pub mod packet;
pub mod pair;

pub use auth::{
    decode_tunnel_password, decode_user_password, encode_tunnel_password,
    encode_tunnel_password_with_salt, encode_user_password, generate_request_authenticator,
    make_ascend_secret, PasswordError, SaltCounter,
};
pub use chap::{compute_chap_response, encode_chap_password, ChapError, ChapResponse};
pub use config::{ConfigError, EncoderConfig, FragmentOverflow};
pub use context::EncodeContext;
pub use dictionary::{
    AttrFlags, AttrId, AttrType, AttributeDef, AttributeType, Dictionary, DictionaryError,
    Encrypt, ValueKind, VendorFormat, WIMAX_VENDOR_ID,
};
pub use encode::{AttrStack, EncodeError, Encoder};
pub use packet::Code;
pub use pair::{PairCursor, Value, ValuePair};
