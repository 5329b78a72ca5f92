//! Fragmentation of oversized Long-Extended and WiMAX attributes.
//!
//! The encoder writes the first header followed by the complete value. The
//! value is then spread over consecutive attributes, each a copy of the
//! first `hdr_len` octets of the first header with its own length, and the
//! "more" flag set on all but the last.

use super::MAX_ATTR_LEN;
use crate::config::FragmentOverflow;
use tracing::warn;

/// Bit signalling that another fragment follows
pub(crate) const MORE_FLAG: u8 = 0x80;

/// Header layout of the fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FragmentLayout {
    /// Header length repeated in front of every fragment after the first
    pub hdr_len: usize,
    /// Octet holding the "more" flag
    pub flag_offset: usize,
    /// Octet holding the inner (vendor attribute) length, if any
    pub vsa_offset: Option<usize>,
}

impl FragmentLayout {
    pub const LONG_EXTENDED: FragmentLayout = FragmentLayout {
        hdr_len: 4,
        flag_offset: 3,
        vsa_offset: None,
    };

    pub const WIMAX: FragmentLayout = FragmentLayout {
        hdr_len: 9,
        flag_offset: 8,
        vsa_offset: Some(7),
    };
}

/// Spread `value_len` octets starting at `out[first_hdr]` over as many
/// fragments as needed.
///
/// Returns the total length written from `out[0]`, or `None` if the
/// fragments do not fit and `policy` is [`FragmentOverflow::Reject`].
pub(crate) fn fragment(
    out: &mut [u8],
    first_hdr: usize,
    value_len: usize,
    layout: &FragmentLayout,
    policy: FragmentOverflow,
) -> Option<usize> {
    let mut plan = Vec::new();
    let mut remaining = value_len;
    let mut pos = 0;
    let mut hdr = first_hdr;
    while remaining > 0 {
        let space = out.len().saturating_sub(pos + hdr);
        if space == 0 {
            break;
        }
        let chunk = remaining.min(MAX_ATTR_LEN - hdr).min(space);
        plan.push(chunk);
        pos += hdr + chunk;
        remaining -= chunk;
        hdr = layout.hdr_len;
    }

    if remaining > 0 {
        match policy {
            FragmentOverflow::Reject => return None,
            FragmentOverflow::Truncate => warn!(
                value_len,
                dropped = remaining,
                capacity = out.len(),
                "Fragmented attribute truncated to available space"
            ),
        }
    }

    let value = out[first_hdr..first_hdr + value_len].to_vec();
    let template = out[..layout.hdr_len].to_vec();

    let mut pos = 0;
    let mut offset = 0;
    for (i, &chunk) in plan.iter().enumerate() {
        let hdr = if i == 0 {
            first_hdr
        } else {
            out[pos..pos + layout.hdr_len].copy_from_slice(&template);
            layout.hdr_len
        };

        out[pos + hdr..pos + hdr + chunk].copy_from_slice(&value[offset..offset + chunk]);
        out[pos + 1] = (hdr + chunk) as u8;
        if let Some(vsa) = layout.vsa_offset {
            out[pos + vsa] = template[vsa] + chunk as u8;
        }
        if i + 1 < plan.len() {
            out[pos + layout.flag_offset] |= MORE_FLAG;
        } else {
            out[pos + layout.flag_offset] &= !MORE_FLAG;
        }

        pos += hdr + chunk;
        offset += chunk;
    }

    Some(pos)
}
