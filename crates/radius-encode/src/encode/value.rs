use super::{rfc, AttrStack, EncodeError, Session};
use crate::auth::{
    encode_tunnel_password_into, encode_user_password_into, make_ascend_secret, user_password_len,
    AUTH_VECTOR_LEN, TUNNEL_PASSWORD_MIN_SPACE,
};
use crate::dictionary::{AttrType, Encrypt, ValueKind};
use crate::pair::PairCursor;
use tracing::{debug, warn};

/// Write the value of the pair under the cursor, without any header.
///
/// `stack[depth]` must be the pair's own definition, unless it is a TLV in
/// which case a complete TLV is written instead. The value is obfuscated as
/// its definition requires and cut to fit `out`. Advances the cursor on
/// success and when an empty value is skipped.
pub(crate) fn encode_value(
    s: &Session<'_>,
    out: &mut [u8],
    stack: &AttrStack<'_>,
    depth: usize,
    cursor: &mut PairCursor<'_>,
) -> Result<usize, EncodeError> {
    let da = stack.at(depth, "encode_value: stack shorter than requested depth")?;
    stack.trace(depth, "encode_value");

    if da.kind() == AttrType::Tlv {
        return rfc::encode_tlv_hdr(s, out, stack, depth, cursor);
    }

    if !stack.is_leaf(depth) {
        return Err(EncodeError::StackMismatch(
            "encode_value: encoding value but not at top of stack",
        ));
    }

    let (pair, _) = s.current(cursor, "encode_value: no pair to encode")?;
    if pair.attr() != da.id() {
        return Err(EncodeError::StackMismatch(
            "encode_value: top of stack does not match the pair being encoded",
        ));
    }

    let kind = match da.kind() {
        AttrType::Value(kind) => kind,
        other => {
            return Err(EncodeError::TypeMismatch {
                context: "encode_value",
                expected: "leaf type",
                found: other.name(),
            })
        }
    };

    let data = pair.value().to_network();
    if data.is_empty() {
        debug!(attr = da.name(), "Skipping empty value");
        cursor.advance();
        return Ok(0);
    }
    if out.is_empty() {
        return Ok(0);
    }

    // Fixed width values are never cut
    if kind.fixed_len().is_some_and(|fixed| fixed > out.len()) && da.flags().encrypt == Encrypt::None {
        return Ok(0);
    }
    let len = data.len().min(out.len());

    let flags = da.flags();
    let written = match flags.encrypt {
        Encrypt::UserPassword => {
            if user_password_len(len) > out.len() {
                return Ok(0);
            }
            encode_user_password_into(out, &data[..len], s.ctx.secret, &s.ctx.vector)
        }
        Encrypt::TunnelPassword => {
            let tag_len = usize::from(flags.has_tag);
            if out.len() < TUNNEL_PASSWORD_MIN_SPACE + tag_len {
                return Ok(0);
            }
            let Some(vector) = s.ctx.tunnel_password_vector() else {
                warn!(attr = da.name(), "No request packet, cannot encrypt attribute");
                return Err(EncodeError::MissingOriginal(da.name().to_string()));
            };
            if flags.has_tag {
                out[0] = pair.tag().unwrap_or(0);
            }
            tag_len
                + encode_tunnel_password_into(
                    &mut out[tag_len..],
                    &data[..len],
                    s.ctx.secret,
                    vector,
                    s.ctx.salt.next_salt(),
                )
        }
        Encrypt::AscendSecret => {
            let Ok(value) = <[u8; AUTH_VECTOR_LEN]>::try_from(&data[..]) else {
                return Err(EncodeError::InvalidLength {
                    attr: da.name().to_string(),
                    expected: AUTH_VECTOR_LEN,
                    actual: data.len(),
                });
            };
            if out.len() < AUTH_VECTOR_LEN {
                return Ok(0);
            }
            out[..AUTH_VECTOR_LEN].copy_from_slice(&make_ascend_secret(&s.ctx.vector, s.ctx.secret, &value));
            AUTH_VECTOR_LEN
        }
        Encrypt::None => match (flags.has_tag, pair.tag(), kind) {
            (true, Some(tag), ValueKind::String) => {
                if out.len() < 2 {
                    return Ok(0);
                }
                let len = len.min(out.len() - 1);
                out[0] = tag;
                out[1..=len].copy_from_slice(&data[..len]);
                len + 1
            }
            (true, Some(tag), ValueKind::Integer) => {
                out[..len].copy_from_slice(&data[..len]);
                out[0] = tag;
                len
            }
            _ => {
                out[..len].copy_from_slice(&data[..len]);
                len
            }
        },
    };

    cursor.advance();
    Ok(written)
}
