//! RFC 2865 style headers: plain attributes, concat and TLVs.

use super::value::encode_value;
use super::{AttrStack, EncodeError, Session, MAX_VALUE_LEN};
use crate::dictionary::{AttrType, AttributeType};
use crate::pair::PairCursor;
use tracing::debug;

/// Smallest room worth opening a TLV in: its header plus one child header
/// and one octet of value.
const MIN_TLV_SPACE: usize = 5;

/// Top-level RFC attribute, with the special encodings of
/// Chargeable-User-Identity and Message-Authenticator.
pub(super) fn encode_rfc_hdr(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_rfc_hdr: stack shorter than requested depth")?;
    if da.kind().is_structural() {
        return Err(EncodeError::TypeMismatch {
            context: "encode_rfc_hdr",
            expected: "leaf type",
            found: da.kind().name(),
        });
    }

    let (pair, _) = s.current(cursor, "encode_rfc_hdr: no pair to encode")?;

    // An empty CUI is meaningful (RFC 4372 Section 2.1)
    if da.vendor() == 0
        && da.attr() == AttributeType::ChargeableUserIdentity.as_u32()
        && pair.value().is_empty()
    {
        if out.len() < 2 {
            return Ok(0);
        }
        out[0] = da.attr() as u8;
        out[1] = 2;
        cursor.advance();
        s.hex_dump("Done RFC header", &out[..2]);
        return Ok(2);
    }

    // Placeholder; the real value is signed once the packet is complete
    if da.vendor() == 0 && da.attr() == AttributeType::MessageAuthenticator.as_u32() {
        if out.len() < 18 {
            return Ok(0);
        }
        out[0] = da.attr() as u8;
        out[1] = 18;
        out[2..18].fill(0);
        cursor.advance();
        s.hex_dump("Done RFC header", &out[..18]);
        return Ok(18);
    }

    encode_rfc_hdr_internal(s, out, stack, depth, cursor)
}

/// `[attr][len]` followed by the value of `stack[depth]`.
pub(super) fn encode_rfc_hdr_internal(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_rfc_hdr_internal: stack shorter than requested depth")?;
    if da.kind().is_structural() {
        return Err(EncodeError::TypeMismatch {
            context: "encode_rfc_hdr_internal",
            expected: "leaf type",
            found: da.kind().name(),
        });
    }
    if da.attr() == 0 || da.attr() > 255 {
        return Err(EncodeError::NonStandardAttribute(da.attr()));
    }
    if out.len() <= 2 {
        return Ok(0);
    }

    let room = (out.len() - 2).min(MAX_VALUE_LEN);
    let len = encode_value(s, &mut out[2..2 + room], stack, depth, cursor)?;
    if len == 0 {
        return Ok(0);
    }

    out[0] = da.attr() as u8;
    out[1] = (2 + len) as u8;
    s.hex_dump("Done RFC header", &out[..2 + len]);

    Ok(2 + len)
}

/// Split one long value across as many attributes of the same type as
/// needed. Stops silently when `out` runs out; the pair is consumed either way.
pub(super) fn encode_concat(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_concat: stack shorter than requested depth")?;
    let (pair, _) = s.current(cursor, "encode_concat: no pair to encode")?;
    if da.attr() == 0 || da.attr() > 255 {
        return Err(EncodeError::NonStandardAttribute(da.attr()));
    }

    let data = pair.value().to_network();
    let mut remaining: &[u8] = &data;
    let mut written = 0;

    while !remaining.is_empty() {
        let room = out.len() - written;
        if room <= 2 {
            break;
        }
        let chunk = remaining.len().min(MAX_VALUE_LEN).min(room - 2);
        let fragment = &mut out[written..written + 2 + chunk];
        fragment[0] = da.attr() as u8;
        fragment[1] = (2 + chunk) as u8;
        fragment[2..].copy_from_slice(&remaining[..chunk]);
        s.hex_dump("Done concat", fragment);

        written += 2 + chunk;
        remaining = &remaining[chunk..];
    }

    if !remaining.is_empty() {
        debug!(
            attr = da.name(),
            dropped = remaining.len(),
            "Concat attribute truncated to available space"
        );
    }

    cursor.advance();
    Ok(written)
}

/// `[attr][len]` followed by as many consecutive children of the TLV at
/// `stack[depth]` as fit.
pub(super) fn encode_tlv_hdr(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_tlv_hdr: stack shorter than requested depth")?;
    if da.kind() != AttrType::Tlv {
        return Err(EncodeError::TypeMismatch {
            context: "encode_tlv_hdr",
            expected: "tlv",
            found: da.kind().name(),
        });
    }
    if stack.get(depth + 1).is_none() {
        return Err(EncodeError::EmptyTlv(da.name().to_string()));
    }
    if out.len() < MIN_TLV_SPACE {
        return Ok(0);
    }

    let room = (out.len() - 2).min(MAX_VALUE_LEN);
    let len = encode_tlv_internal(s, &mut out[2..2 + room], stack, depth, cursor)?;
    if len == 0 {
        return Ok(0);
    }

    out[0] = da.attr() as u8;
    out[1] = (2 + len) as u8;
    s.hex_dump("Done TLV header", &out[..2 + len]);

    Ok(2 + len)
}

/// Children of the TLV at `stack[depth]`, without the TLV's own header.
///
/// Keeps consuming pairs while they descend from the same TLV. Nested TLVs
/// recurse through [`encode_tlv_hdr`].
pub(super) fn encode_tlv_internal(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_tlv_internal: stack shorter than requested depth")?;
    let mut current = stack.clone();
    let mut written = 0;

    while out.len() - written >= MIN_TLV_SPACE {
        current.trace(depth, "encode_tlv_internal");

        let child = current
            .get(depth + 1)
            .ok_or_else(|| EncodeError::EmptyTlv(da.name().to_string()))?;
        let start = cursor.position();
        let first = s.current(cursor, "encode_tlv_internal: no pair to encode")?.0;

        let len = if child.kind() == AttrType::Tlv {
            encode_tlv_hdr(s, &mut out[written..], &current, depth + 1, cursor)?
        } else {
            encode_rfc_hdr_internal(s, &mut out[written..], &current, depth + 1, cursor)?
        };
        if cursor.position() == start {
            break;
        }
        written += len;
        s.hex_dump("Done TLV", &out[..written]);

        if !cursor.peek_shares_parent(s.dict, first) && !cursor.peek_descends_from(s.dict, da.id()) {
            break;
        }
        let Some(next) = cursor.peek() else {
            break;
        };
        current = s.stack_for(next)?;
    }

    Ok(written)
}
