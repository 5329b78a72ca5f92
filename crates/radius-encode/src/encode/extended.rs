//! RFC 6929 Extended and Long-Extended attributes, with and without EVS.

use super::rfc::encode_tlv_internal;
use super::shift::{fragment, FragmentLayout};
use super::value::encode_value;
use super::{AttrStack, EncodeError, Session, MAX_ATTR_LEN};
use crate::dictionary::AttrType;
use crate::pair::PairCursor;
use tracing::debug;

/// `[0][vendor id (3 octets)][vendor type]`
const EVS_HDR_LEN: usize = 5;

/// `[ext][len][ext-type]`, plus `[flags]` for Long-Extended, plus the EVS
/// header when the extended type is Extended-Vendor-Specific.
///
/// Long-Extended values that do not fit one attribute are fragmented;
/// Extended values are cut to fit.
pub(super) fn encode_extended_hdr(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_extended_hdr: stack shorter than requested depth")?;
    if !matches!(da.kind(), AttrType::Extended { .. }) {
        return Err(EncodeError::TypeMismatch {
            context: "encode_extended_hdr",
            expected: "extended",
            found: da.kind().name(),
        });
    }

    let (_, leaf) = s.current(cursor, "encode_extended_hdr: no pair to encode")?;
    let long = leaf.flags().long_extended;
    let mut hdr_len = if long { 4 } else { 3 };
    if out.len() < hdr_len {
        return Ok(0);
    }
    let capacity = if long { out.len() } else { out.len().min(MAX_ATTR_LEN) };
    let out = &mut out[..capacity];

    let mut depth = depth + 1;
    let ext_type = stack.at(depth, "encode_extended_hdr: missing extended type")?;

    out[0] = da.attr() as u8;
    out[1] = hdr_len as u8;
    out[2] = ext_type.attr() as u8;
    if long {
        out[3] = 0;
    }

    if ext_type.kind() == AttrType::Evs {
        if out.len() < hdr_len + EVS_HDR_LEN {
            return Ok(0);
        }
        let vendor = stack.at(depth + 1, "encode_extended_hdr: missing EVS vendor")?;
        if vendor.kind() != AttrType::Vendor {
            return Err(EncodeError::TypeMismatch {
                context: "encode_extended_hdr",
                expected: "vendor",
                found: vendor.kind().name(),
            });
        }
        let vendor_attr = stack.at(depth + 2, "encode_extended_hdr: missing EVS attribute")?;

        let id = vendor.attr().to_be_bytes();
        out[hdr_len..hdr_len + EVS_HDR_LEN].copy_from_slice(&[0, id[1], id[2], id[3], vendor_attr.attr() as u8]);
        hdr_len += EVS_HDR_LEN;
        depth += 2;
    }

    let start = cursor.position();
    let value_da = stack.at(depth, "encode_extended_hdr: missing attribute")?;
    let mut len = if value_da.kind() == AttrType::Tlv {
        encode_tlv_internal(s, &mut out[hdr_len..], stack, depth, cursor)?
    } else {
        encode_value(s, &mut out[hdr_len..], stack, depth, cursor)?
    };
    if len == 0 {
        return Ok(0);
    }

    if len > MAX_ATTR_LEN - hdr_len {
        if long {
            return match fragment(
                out,
                hdr_len,
                len,
                &FragmentLayout::LONG_EXTENDED,
                s.config.fragment_overflow,
            ) {
                Some(total) => {
                    s.hex_dump("Done extended header", &out[..total]);
                    Ok(total)
                }
                None => {
                    debug!(attr = leaf.name(), len, "Long extended attribute does not fit, deferring");
                    cursor.rewind(start);
                    Ok(0)
                }
            };
        }
        len = MAX_ATTR_LEN - hdr_len;
    }

    out[1] = (hdr_len + len) as u8;
    s.hex_dump("Done extended header", &out[..hdr_len + len]);

    Ok(hdr_len + len)
}
