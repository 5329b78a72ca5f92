//! Attribute encoding
//!
//! [`Encoder::encode_pair`] writes the wire form of the pair under the
//! cursor into a caller supplied buffer, choosing the header family from the
//! top-level definition:
//!
//! - RFC 2865 attributes, optionally split into several instances (concat)
//! - TLVs, grouping consecutive siblings into one container
//! - Vendor-Specific attributes with per-vendor type/length widths
//! - WiMAX continuation VSAs, fragmented when longer than one attribute
//! - RFC 6929 Extended and Long-Extended attributes, including EVS
//!
//! Every encoder returns `Ok(n)` with the bytes written. `Ok(0)` with the
//! cursor unmoved means "no room, start a new packet"; `Ok(0)` with the
//! cursor moved means the pair was skipped. A pair that cannot be written
//! even into an empty packet is [`EncodeError::NoProgress`].

mod error;
mod extended;
mod rfc;
mod shift;
mod stack;
mod value;
mod vsa;

pub use error::EncodeError;
pub use stack::AttrStack;

use crate::config::{ConfigError, EncoderConfig};
use crate::context::EncodeContext;
use crate::dictionary::{AttrType, AttributeDef, Dictionary};
use crate::pair::{PairCursor, ValuePair, MAX_STRING_LEN};
use tracing::{debug, trace};

/// Longest attribute the two-octet RFC header can describe
pub const MAX_ATTR_LEN: usize = 255;
/// Longest attribute value in one RFC attribute
pub const MAX_VALUE_LEN: usize = MAX_ATTR_LEN - 2;

/// Shared state of one `encode_pair` call
pub(crate) struct Session<'a> {
    pub dict: &'a Dictionary,
    pub ctx: &'a EncodeContext<'a>,
    pub config: &'a EncoderConfig,
}

impl<'a> Session<'a> {
    /// Current pair and its definition
    pub fn current<'p>(
        &self,
        cursor: &PairCursor<'p>,
        context: &'static str,
    ) -> Result<(&'p ValuePair, &'a AttributeDef), EncodeError> {
        let pair = cursor.peek().ok_or(EncodeError::StackMismatch(context))?;
        let def = self
            .dict
            .get(pair.attr())
            .ok_or(EncodeError::UnknownAttribute(pair.attr()))?;
        Ok((pair, def))
    }

    /// Stack for the pair under the cursor
    pub fn stack_for(&self, pair: &ValuePair) -> Result<AttrStack<'a>, EncodeError> {
        AttrStack::build(self.dict, pair.attr(), self.config.max_nesting_depth)
    }

    pub fn hex_dump(&self, label: &str, data: &[u8]) {
        if self.config.hex_trace {
            trace!("{}: {}", label, hex::encode(data));
        }
    }
}

/// Encodes value pairs against a dictionary.
///
/// The encoder holds no per-packet state; one instance can serve any number
/// of packets, each described by its own [`EncodeContext`].
#[derive(Debug, Clone)]
pub struct Encoder<'d> {
    dict: &'d Dictionary,
    config: EncoderConfig,
}

impl<'d> Encoder<'d> {
    pub fn new(dict: &'d Dictionary) -> Self {
        Encoder {
            dict,
            config: EncoderConfig::default(),
        }
    }

    /// Encoder with a non-default configuration, validated first
    pub fn with_config(dict: &'d Dictionary, config: EncoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Encoder { dict, config })
    }

    pub fn dictionary(&self) -> &'d Dictionary {
        self.dict
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode the pair under the cursor, plus any following siblings that
    /// share its container, into `out`.
    ///
    /// Returns the number of bytes written. The cursor is advanced past every
    /// pair consumed. `Ok(0)` with the cursor unmoved means `out` has no room
    /// for the pair. If `out` already held a whole attribute (or, for the
    /// fragmenting formats, a whole packet) the pair can never be written and
    /// the result is [`EncodeError::NoProgress`].
    pub fn encode_pair(
        &self,
        out: &mut [u8],
        ctx: &EncodeContext<'_>,
        cursor: &mut PairCursor<'_>,
    ) -> Result<usize, EncodeError> {
        let Some(pair) = cursor.peek() else {
            return Ok(0);
        };
        if out.len() <= 2 {
            debug!(capacity = out.len(), "Not enough room for an attribute header");
            return Ok(0);
        }

        let session = Session {
            dict: self.dict,
            ctx,
            config: &self.config,
        };

        let leaf = self
            .dict
            .get(pair.attr())
            .ok_or(EncodeError::UnknownAttribute(pair.attr()))?;
        if leaf.depth() > self.config.max_nesting_depth {
            return Err(EncodeError::NestingTooDeep {
                depth: leaf.depth(),
                max: self.config.max_nesting_depth,
            });
        }

        let stack = session.stack_for(pair)?;
        stack.trace(0, "encode_pair");

        let root = stack.at(0, "encode_pair: empty attribute stack")?;
        if stack.len() == 1 && !matches!(root.kind(), AttrType::Value(_) | AttrType::Tlv) {
            return Err(EncodeError::TypeMismatch {
                context: "encode_pair",
                expected: "leaf type",
                found: root.kind().name(),
            });
        }

        let capped = out.len().min(MAX_ATTR_LEN);
        let fragments = matches!(root.kind(), AttrType::Extended { long: true })
            || (root.kind() == AttrType::Vsa && leaf.flags().wimax);
        let start = cursor.position();

        let written = match root.kind() {
            AttrType::Value(_) => {
                if root.attr() > 255 {
                    debug!(attr = root.name(), "Skipping non-protocol attribute");
                    cursor.advance();
                    return Ok(0);
                }
                if root.flags().concat {
                    rfc::encode_concat(&session, out, &stack, 0, cursor)?
                } else {
                    rfc::encode_rfc_hdr(&session, &mut out[..capped], &stack, 0, cursor)?
                }
            }
            AttrType::Vsa => {
                if leaf.flags().wimax {
                    vsa::encode_wimax_hdr(&session, out, &stack, 0, cursor)?
                } else {
                    vsa::encode_vsa_hdr(&session, &mut out[..capped], &stack, 0, cursor)?
                }
            }
            AttrType::Tlv => rfc::encode_tlv_hdr(&session, &mut out[..capped], &stack, 0, cursor)?,
            AttrType::Extended { long: false } => {
                extended::encode_extended_hdr(&session, &mut out[..capped], &stack, 0, cursor)?
            }
            AttrType::Extended { long: true } => {
                extended::encode_extended_hdr(&session, out, &stack, 0, cursor)?
            }
            kind @ (AttrType::Vendor | AttrType::Evs) => {
                return Err(EncodeError::TypeMismatch {
                    context: "encode_pair",
                    expected: "top-level attribute",
                    found: kind.name(),
                })
            }
        };

        if cursor.position() == start {
            let limit = if fragments { MAX_STRING_LEN } else { MAX_ATTR_LEN };
            if written > 0 || out.len() >= limit {
                return Err(EncodeError::NoProgress);
            }
            debug!(attr = leaf.name(), capacity = out.len(), "Insufficient space for attribute");
            return Ok(0);
        }

        Ok(written)
    }

    /// Encode pairs until the cursor is exhausted or `out` is full.
    ///
    /// Returns the total bytes written; the cursor is left on the first pair
    /// that did not fit.
    pub fn encode_pairs(
        &self,
        out: &mut [u8],
        ctx: &EncodeContext<'_>,
        cursor: &mut PairCursor<'_>,
    ) -> Result<usize, EncodeError> {
        let mut written = 0;
        while !cursor.is_exhausted() {
            let start = cursor.position();
            let len = self.encode_pair(&mut out[written..], ctx, cursor)?;
            if len == 0 && cursor.position() == start {
                break;
            }
            written += len;
        }
        Ok(written)
    }
}
