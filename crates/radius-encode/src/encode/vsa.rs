//! Vendor-Specific (26) attributes, including the WiMAX continuation format.

use super::rfc::{encode_rfc_hdr_internal, encode_tlv_internal};
use super::shift::{fragment, FragmentLayout};
use super::value::encode_value;
use super::{AttrStack, EncodeError, Session, MAX_ATTR_LEN};
use crate::dictionary::{AttrType, AttributeType, WIMAX_VENDOR_ID};
use crate::pair::PairCursor;
use tracing::debug;

/// `[26][len][vendor id]`
const VSA_HDR_LEN: usize = 6;
/// `[26][len][vendor id][attr][len][continuation]`
const WIMAX_HDR_LEN: usize = 9;

/// `[26][len][vendor id]` followed by one vendor attribute (or several TLV
/// siblings) of the vendor at `stack[depth + 1]`.
pub(super) fn encode_vsa_hdr(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_vsa_hdr: stack shorter than requested depth")?;
    if da.kind() != AttrType::Vsa {
        return Err(EncodeError::TypeMismatch {
            context: "encode_vsa_hdr",
            expected: "vsa",
            found: da.kind().name(),
        });
    }

    let (_, leaf) = s.current(cursor, "encode_vsa_hdr: no pair to encode")?;
    if leaf.flags().wimax {
        return encode_wimax_hdr(s, out, stack, depth, cursor);
    }

    if out.len() < VSA_HDR_LEN {
        return Ok(0);
    }

    let vendor = stack.at(depth + 1, "encode_vsa_hdr: missing vendor")?;
    if vendor.kind() != AttrType::Vendor {
        return Err(EncodeError::TypeMismatch {
            context: "encode_vsa_hdr",
            expected: "vendor",
            found: vendor.kind().name(),
        });
    }

    let room = (out.len() - VSA_HDR_LEN).min(MAX_ATTR_LEN - VSA_HDR_LEN);
    let len = encode_vendor_attr_hdr(s, &mut out[VSA_HDR_LEN..VSA_HDR_LEN + room], stack, depth + 2, cursor)?;
    if len == 0 {
        return Ok(0);
    }

    out[0] = da.attr() as u8;
    out[1] = (VSA_HDR_LEN + len) as u8;
    out[2..6].copy_from_slice(&vendor.attr().to_be_bytes());
    s.hex_dump("Done VSA header", &out[..VSA_HDR_LEN + len]);

    Ok(VSA_HDR_LEN + len)
}

/// Vendor attribute header in the vendor's registered type/length widths,
/// followed by the value at `stack[depth]`.
fn encode_vendor_attr_hdr(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_vendor_attr_hdr: missing vendor attribute")?;
    let vendor = stack.at(depth - 1, "encode_vendor_attr_hdr: missing vendor")?.attr();

    let format = s.dict.vendor_format(vendor).unwrap_or_default();
    if format.is_rfc() && da.kind() != AttrType::Tlv {
        return encode_rfc_hdr_internal(s, out, stack, depth, cursor);
    }

    let type_len = usize::from(format.type_width);
    let length_len = usize::from(format.length_width);
    if !matches!(type_len, 1 | 2 | 4) {
        return Err(EncodeError::UnsupportedVendorWidth {
            vendor,
            field: "type",
            width: format.type_width,
        });
    }
    if length_len > 2 {
        return Err(EncodeError::UnsupportedVendorWidth {
            vendor,
            field: "length",
            width: format.length_width,
        });
    }

    // The high octet of a four octet type is reserved
    let max_attr = match type_len {
        1 => 0xff,
        2 => 0xffff,
        _ => 0x00ff_ffff,
    };
    if da.attr() > max_attr {
        return Err(EncodeError::NonStandardAttribute(da.attr()));
    }

    let hdr_len = type_len + length_len;
    if out.len() <= hdr_len {
        return Ok(0);
    }

    let attr = da.attr().to_be_bytes();
    match type_len {
        4 => out[..4].copy_from_slice(&attr),
        2 => out[..2].copy_from_slice(&attr[2..]),
        _ => out[0] = attr[3],
    }

    let len = if da.kind() == AttrType::Tlv {
        encode_tlv_internal(s, &mut out[hdr_len..], stack, depth, cursor)?
    } else {
        encode_value(s, &mut out[hdr_len..], stack, depth, cursor)?
    };
    if len == 0 {
        return Ok(0);
    }

    let total = hdr_len + len;
    match length_len {
        1 => out[type_len] = total as u8,
        2 => out[type_len..hdr_len].copy_from_slice(&(total as u16).to_be_bytes()),
        _ => {}
    }

    Ok(total)
}

/// WiMAX VSA (`stack[depth]` is Vendor-Specific, `stack[depth + 1]` the
/// WiMAX Forum vendor). Values too long for one attribute are split over
/// several VSAs with the continuation bit set.
pub(super) fn encode_wimax_hdr(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let (_, leaf) = s.current(cursor, "encode_wimax_hdr: no pair to encode")?;
    if !leaf.flags().wimax {
        return Err(EncodeError::InvalidStack(format!(
            "Called for non-WiMAX attribute {}",
            leaf.name()
        )));
    }
    if out.len() < WIMAX_HDR_LEN {
        return Ok(0);
    }

    let vsa = stack.at(depth, "encode_wimax_hdr: stack shorter than requested depth")?;
    if vsa.attr() != AttributeType::VendorSpecific.as_u32() {
        return Err(EncodeError::InvalidStack(format!(
            "Expected Vendor-Specific at depth {}, got {}",
            depth,
            vsa.name()
        )));
    }
    let vendor = stack.at(depth + 1, "encode_wimax_hdr: missing vendor")?;
    if vendor.kind() != AttrType::Vendor || vendor.attr() != WIMAX_VENDOR_ID {
        return Err(EncodeError::InvalidStack(format!(
            "Expected WiMAX vendor at depth {}, got {}",
            depth + 1,
            vendor.name()
        )));
    }
    let attr_depth = depth + 2;
    let da = stack.at(attr_depth, "encode_wimax_hdr: missing vendor attribute")?;

    out[0] = vsa.attr() as u8;
    out[1] = WIMAX_HDR_LEN as u8;
    out[2..6].copy_from_slice(&vendor.attr().to_be_bytes());
    out[6] = da.attr() as u8;
    out[7] = 3;
    out[8] = 0;

    let start = cursor.position();
    let len = if da.kind() == AttrType::Tlv {
        encode_tlv_internal(s, &mut out[WIMAX_HDR_LEN..], stack, attr_depth, cursor)?
    } else {
        encode_value(s, &mut out[WIMAX_HDR_LEN..], stack, attr_depth, cursor)?
    };
    if len == 0 {
        return Ok(0);
    }

    if len > MAX_ATTR_LEN - WIMAX_HDR_LEN {
        return match fragment(out, WIMAX_HDR_LEN, len, &FragmentLayout::WIMAX, s.config.fragment_overflow) {
            Some(total) => {
                s.hex_dump("Done wimax header", &out[..total]);
                Ok(total)
            }
            None => {
                debug!(attr = da.name(), len, "WiMAX attribute does not fit, deferring");
                cursor.rewind(start);
                Ok(0)
            }
        };
    }

    out[1] += len as u8;
    out[7] += len as u8;
    s.hex_dump("Done wimax header", &out[..WIMAX_HDR_LEN + len]);

    Ok(WIMAX_HDR_LEN + len)
}
