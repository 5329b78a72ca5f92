//! Attribute/value pairs and the cursor the encoder walks them with.

use crate::dictionary::{AttrId, AttrType, Dictionary, ValueKind};
use crate::encode::EncodeError;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::ops::Deref;

/// Upper bound on string/octets values (the largest RADIUS packet)
pub const MAX_STRING_LEN: usize = 4096;

/// Upper bound on Ascend binary filter values
pub const MAX_ABINARY_LEN: usize = 32;

/// Valid RFC 2868 tags are 0x01-0x1F
pub const TAG_MAX: u8 = 0x1f;

pub fn tag_valid(tag: u8) -> bool {
    (1..=TAG_MAX).contains(&tag)
}

/// Typed attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Boolean(bool),
    Byte(u8),
    Short(u16),
    Integer(u32),
    Integer64(u64),
    /// Seconds since the epoch
    Date(u32),
    Signed(i32),
    Ipv4Addr(Ipv4Addr),
    Ipv4Prefix { prefix: u8, addr: Ipv4Addr },
    Ipv6Addr(Ipv6Addr),
    Ipv6Prefix { prefix: u8, addr: Ipv6Addr },
    Ifid([u8; 8]),
    Ethernet([u8; 6]),
    Abinary(Vec<u8>),
    String(String),
    Octets(Vec<u8>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Byte(_) => ValueKind::Byte,
            Value::Short(_) => ValueKind::Short,
            Value::Integer(_) => ValueKind::Integer,
            Value::Integer64(_) => ValueKind::Integer64,
            Value::Date(_) => ValueKind::Date,
            Value::Signed(_) => ValueKind::Signed,
            Value::Ipv4Addr(_) => ValueKind::Ipv4Addr,
            Value::Ipv4Prefix { .. } => ValueKind::Ipv4Prefix,
            Value::Ipv6Addr(_) => ValueKind::Ipv6Addr,
            Value::Ipv6Prefix { .. } => ValueKind::Ipv6Prefix,
            Value::Ifid(_) => ValueKind::Ifid,
            Value::Ethernet(_) => ValueKind::Ethernet,
            Value::Abinary(_) => ValueKind::Abinary,
            Value::String(_) => ValueKind::String,
            Value::Octets(_) => ValueKind::Octets,
        }
    }

    /// Length of the value on the wire, before tags or obfuscation
    pub fn len(&self) -> usize {
        match self {
            Value::Abinary(data) | Value::Octets(data) => data.len(),
            Value::String(s) => s.len(),
            other => other.kind().fixed_len().unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Network byte order representation of the value.
    ///
    /// Integers are written big-endian at their natural width; addresses,
    /// prefixes, interface IDs and MAC addresses keep their wire layout;
    /// variable-length values are borrowed as-is.
    pub fn to_network(&self) -> NetworkBytes<'_> {
        match self {
            Value::Boolean(b) => NetworkBytes::inline(&[*b as u8]),
            Value::Byte(v) => NetworkBytes::inline(&[*v]),
            Value::Short(v) => NetworkBytes::inline(&v.to_be_bytes()),
            Value::Integer(v) | Value::Date(v) => NetworkBytes::inline(&v.to_be_bytes()),
            Value::Integer64(v) => NetworkBytes::inline(&v.to_be_bytes()),
            Value::Signed(v) => NetworkBytes::inline(&v.to_be_bytes()),
            Value::Ipv4Addr(addr) => NetworkBytes::inline(&addr.octets()),
            Value::Ipv4Prefix { prefix, addr } => {
                let mut buf = [0u8; 6];
                buf[1] = *prefix;
                buf[2..].copy_from_slice(&addr.octets());
                NetworkBytes::inline(&buf)
            }
            Value::Ipv6Addr(addr) => NetworkBytes::inline(&addr.octets()),
            Value::Ipv6Prefix { prefix, addr } => {
                let mut buf = [0u8; 18];
                buf[1] = *prefix;
                buf[2..].copy_from_slice(&addr.octets());
                NetworkBytes::inline(&buf)
            }
            Value::Ifid(id) => NetworkBytes::inline(id),
            Value::Ethernet(mac) => NetworkBytes::inline(mac),
            Value::Abinary(data) | Value::Octets(data) => NetworkBytes::Borrowed(data),
            Value::String(s) => NetworkBytes::Borrowed(s.as_bytes()),
        }
    }

    /// Rebuild a value from its network representation
    pub fn from_network(kind: ValueKind, data: &[u8]) -> Result<Value, EncodeError> {
        if let Some(expected) = kind.fixed_len() {
            if data.len() != expected {
                return Err(EncodeError::InvalidLength {
                    attr: kind.name().to_string(),
                    expected,
                    actual: data.len(),
                });
            }
        }

        let value = match kind {
            ValueKind::Boolean => Value::Boolean(data[0] & 0x01 != 0),
            ValueKind::Byte => Value::Byte(data[0]),
            ValueKind::Short => Value::Short(u16::from_be_bytes([data[0], data[1]])),
            ValueKind::Integer => Value::Integer(u32::from_be_bytes(array(data))),
            ValueKind::Date => Value::Date(u32::from_be_bytes(array(data))),
            ValueKind::Signed => Value::Signed(i32::from_be_bytes(array(data))),
            ValueKind::Integer64 => Value::Integer64(u64::from_be_bytes(array(data))),
            ValueKind::Ipv4Addr => Value::Ipv4Addr(Ipv4Addr::from(array::<4>(data))),
            ValueKind::Ipv4Prefix => Value::Ipv4Prefix {
                prefix: data[1],
                addr: Ipv4Addr::from(array::<4>(&data[2..])),
            },
            ValueKind::Ipv6Addr => Value::Ipv6Addr(Ipv6Addr::from(array::<16>(data))),
            ValueKind::Ipv6Prefix => Value::Ipv6Prefix {
                prefix: data[1],
                addr: Ipv6Addr::from(array::<16>(&data[2..])),
            },
            ValueKind::Ifid => Value::Ifid(array(data)),
            ValueKind::Ethernet => Value::Ethernet(array(data)),
            ValueKind::Abinary => Value::Abinary(data.to_vec()),
            ValueKind::String => Value::String(String::from_utf8_lossy(data).into_owned()),
            ValueKind::Octets => Value::Octets(data.to_vec()),
        };
        Ok(value)
    }
}

fn array<const N: usize>(data: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&data[..N]);
    out
}

/// Largest fixed-width representation (ipv6prefix)
const INLINE_CAPACITY: usize = 18;

/// Wire bytes of a value: scalars are converted into a small inline buffer
/// owned by the caller's stack frame, variable-length data is borrowed.
#[derive(Debug, Clone, Copy)]
pub enum NetworkBytes<'a> {
    Inline { buf: [u8; INLINE_CAPACITY], len: usize },
    Borrowed(&'a [u8]),
}

impl NetworkBytes<'_> {
    fn inline(data: &[u8]) -> Self {
        let mut buf = [0u8; INLINE_CAPACITY];
        buf[..data.len()].copy_from_slice(data);
        NetworkBytes::Inline {
            buf,
            len: data.len(),
        }
    }
}

impl Deref for NetworkBytes<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            NetworkBytes::Inline { buf, len } => &buf[..*len],
            NetworkBytes::Borrowed(data) => data,
        }
    }
}

/// One attribute occurrence: definition, optional tag and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePair {
    attr: AttrId,
    tag: u8,
    value: Value,
}

impl ValuePair {
    /// Create a pair, checking the value against its definition
    pub fn new(dict: &Dictionary, attr: AttrId, value: Value) -> Result<Self, EncodeError> {
        let def = dict.get(attr).ok_or(EncodeError::UnknownAttribute(attr))?;

        let kind = match def.kind() {
            AttrType::Value(kind) => kind,
            other => {
                return Err(EncodeError::TypeMismatch {
                    context: "ValuePair::new",
                    expected: "leaf type",
                    found: other.name(),
                })
            }
        };

        if value.kind() != kind {
            return Err(EncodeError::ValueKindMismatch {
                attr: def.name().to_string(),
                expected: kind.name(),
                found: value.kind().name(),
            });
        }

        let max = match kind {
            ValueKind::Abinary => MAX_ABINARY_LEN,
            ValueKind::String | ValueKind::Octets => MAX_STRING_LEN,
            _ => usize::MAX,
        };
        if value.len() > max {
            return Err(EncodeError::ValueTooLong {
                attr: def.name().to_string(),
                len: value.len(),
                max,
            });
        }

        Ok(ValuePair {
            attr,
            tag: 0,
            value,
        })
    }

    /// Attach an RFC 2868 tag; values outside 0x01-0x1F mean "no tag"
    pub fn with_tag(mut self, tag: u8) -> Self {
        self.tag = tag;
        self
    }

    pub fn attr(&self) -> AttrId {
        self.attr
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn tag(&self) -> Option<u8> {
        tag_valid(self.tag).then_some(self.tag)
    }
}

/// Read-only cursor over a pair sequence.
///
/// Encoders consume pairs by advancing the cursor; the pairs themselves are
/// never modified.
#[derive(Debug, Clone, Copy)]
pub struct PairCursor<'p> {
    pairs: &'p [ValuePair],
    pos: usize,
}

impl<'p> PairCursor<'p> {
    pub fn new(pairs: &'p [ValuePair]) -> Self {
        PairCursor { pairs, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'p ValuePair> {
        self.pairs.get(self.pos)
    }

    /// Move past the current pair, returning it
    pub fn advance(&mut self) -> Option<&'p ValuePair> {
        let current = self.pairs.get(self.pos)?;
        self.pos += 1;
        Some(current)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return to a position previously obtained from [`position`](Self::position)
    pub fn rewind(&mut self, pos: usize) {
        self.pos = pos.min(self.pairs.len());
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.pairs.len()
    }

    /// Whether the current pair's definition lives below `ancestor`.
    ///
    /// Used by TLV encoders to decide whether the next pair is a sibling
    /// that belongs in the same container.
    pub fn peek_descends_from(&self, dict: &Dictionary, ancestor: AttrId) -> bool {
        let Some(pair) = self.peek() else {
            return false;
        };
        let mut current = dict.get(pair.attr).and_then(|def| def.parent());
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = dict.get(id).and_then(|def| def.parent());
        }
        false
    }

    /// Whether the current pair has the same immediate parent as `previous`
    pub fn peek_shares_parent(&self, dict: &Dictionary, previous: &ValuePair) -> bool {
        let parent_of = |pair: &ValuePair| dict.get(pair.attr).and_then(|def| def.parent());
        match (self.peek(), parent_of(previous)) {
            (Some(next), Some(parent)) => parent_of(next) == Some(parent),
            _ => false,
        }
    }
}
