//! Attribute value obfuscation
//!
//! All schemes XOR the value with a keystream of MD5 blocks keyed by the
//! shared secret. The secret-only MD5 state is computed once per value and
//! cloned for every block.

use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

/// Length of a packet authenticator
pub const AUTH_VECTOR_LEN: usize = 16;
/// Obfuscation block size
pub const AUTH_PASS_LEN: usize = 16;
/// RFC 2865 maximum User-Password length
pub const MAX_PASS_LEN: usize = 128;
/// Largest plaintext the standalone Tunnel-Password encoder accepts
pub const MAX_TUNNEL_PASS_LEN: usize = 127;
/// Salt, length octet and one block of ciphertext
pub const TUNNEL_PASSWORD_MIN_SPACE: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Invalid encrypted password length: {0}")]
    InvalidLength(usize),
    #[error("Embedded password length {embedded} exceeds available {available} bytes")]
    InvalidEmbeddedLength { embedded: usize, available: usize },
}

/// Generate a random Request Authenticator (16 bytes) per RFC 2865 Section 3
pub fn generate_request_authenticator() -> [u8; 16] {
    let mut rng = rand::rng();
    let mut authenticator = [0u8; 16];
    rng.fill(&mut authenticator);
    authenticator
}

/// Source of Tunnel-Password salts.
///
/// RFC 2868 wants salts within a packet to be unique, so the top bits of
/// each salt come from a shared rolling counter and the rest is random.
/// One counter can be shared between threads.
#[derive(Debug, Default)]
pub struct SaltCounter {
    next: AtomicU32,
}

impl SaltCounter {
    pub const fn new() -> Self {
        SaltCounter {
            next: AtomicU32::new(0),
        }
    }

    /// Produce the next salt; the high bit of the first octet is always set
    pub fn next_salt(&self) -> [u8; 2] {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        let mut rng = rand::rng();
        let random: u8 = rng.random();
        [
            0x80 | (((sequence & 0x0f) as u8) << 3) | (random & 0x07),
            rng.random(),
        ]
    }
}

fn round_up(len: usize) -> usize {
    len.div_ceil(AUTH_PASS_LEN) * AUTH_PASS_LEN
}

fn xor_into(out: &mut [u8], key: &[u8]) {
    for (byte, k) in out.iter_mut().zip(key) {
        *byte ^= k;
    }
}

/// MD5 state after absorbing the secret, cloned for every block
fn keyed(secret: &[u8]) -> md5::Context {
    let mut context = md5::Context::new();
    context.consume(secret);
    context
}

fn block_key(base: &md5::Context, parts: &[&[u8]]) -> [u8; 16] {
    let mut context = base.clone();
    for part in parts {
        context.consume(part);
    }
    context.compute().0
}

/// Obfuscated length of a User-Password value of `len` bytes
pub(crate) fn user_password_len(len: usize) -> usize {
    match len.min(MAX_PASS_LEN) {
        0 => AUTH_PASS_LEN,
        len => round_up(len),
    }
}

/// Write the RFC 2865 Section 5.2 encoding of `input` to the start of `out`.
///
/// The caller guarantees `out` holds at least
/// `user_password_len(input.len())` bytes. Returns the bytes written.
pub(crate) fn encode_user_password_into(
    out: &mut [u8],
    input: &[u8],
    secret: &[u8],
    vector: &[u8; 16],
) -> usize {
    let input = &input[..input.len().min(MAX_PASS_LEN)];
    let len = user_password_len(input.len());
    let out = &mut out[..len];

    out.fill(0);
    out[..input.len()].copy_from_slice(input);

    let base = keyed(secret);
    for n in (0..len).step_by(AUTH_PASS_LEN) {
        let key = if n == 0 {
            block_key(&base, &[&vector[..]])
        } else {
            block_key(&base, &[&out[n - AUTH_PASS_LEN..n]])
        };
        xor_into(&mut out[n..n + AUTH_PASS_LEN], &key);
    }

    len
}

/// Encrypt User-Password attribute per RFC 2865 Section 5.2
///
/// The password is truncated to 128 bytes and zero padded to a multiple of
/// 16 (an empty password becomes 16 zero bytes) before encryption.
pub fn encode_user_password(password: impl AsRef<[u8]>, secret: &[u8], vector: &[u8; 16]) -> Vec<u8> {
    let password = password.as_ref();
    let mut out = vec![0u8; user_password_len(password.len())];
    let len = encode_user_password_into(&mut out, password, secret, vector);
    out.truncate(len);
    out
}

/// Decrypt User-Password attribute per RFC 2865 Section 5.2
///
/// Trailing zero padding is removed.
pub fn decode_user_password(
    encrypted: &[u8],
    secret: &[u8],
    vector: &[u8; 16],
) -> Result<Vec<u8>, PasswordError> {
    if encrypted.len() % AUTH_PASS_LEN != 0 || encrypted.is_empty() {
        return Err(PasswordError::InvalidLength(encrypted.len()));
    }

    let base = keyed(secret);
    let mut result = encrypted.to_vec();
    for n in (0..encrypted.len()).step_by(AUTH_PASS_LEN) {
        let key = if n == 0 {
            block_key(&base, &[&vector[..]])
        } else {
            block_key(&base, &[&encrypted[n - AUTH_PASS_LEN..n]])
        };
        xor_into(&mut result[n..n + AUTH_PASS_LEN], &key);
    }

    while result.last() == Some(&0) {
        result.pop();
    }
    Ok(result)
}

/// Write salt, length octet and ciphertext of an RFC 2868 Section 3.5
/// Tunnel-Password to the start of `out`.
///
/// `out.len()` is the free space for the value (at most 253 is used). The
/// plaintext is cut to fit, and the final block is cut short when the
/// padded ciphertext would not fit. Returns the bytes written, or 0 if there
/// is not room for a single block.
pub(crate) fn encode_tunnel_password_into(
    out: &mut [u8],
    input: &[u8],
    secret: &[u8],
    vector: &[u8; 16],
    salt: [u8; 2],
) -> usize {
    let freespace = out.len().min(253);
    if freespace < TUNNEL_PASSWORD_MIN_SPACE {
        return 0;
    }

    let inlen = input.len().min(freespace - 3);
    let encrypted_len = round_up(inlen + 1).min(freespace - 2);
    let total = encrypted_len + 2;

    out[..2].copy_from_slice(&salt);
    out[2] = inlen as u8;
    out[3..3 + inlen].copy_from_slice(&input[..inlen]);
    out[3 + inlen..total].fill(0);

    let base = keyed(secret);
    for n in (0..encrypted_len).step_by(AUTH_PASS_LEN) {
        let key = if n == 0 {
            block_key(&base, &[&vector[..], &salt[..]])
        } else {
            block_key(&base, &[&out[2 + n - AUTH_PASS_LEN..2 + n]])
        };
        let block_len = AUTH_PASS_LEN.min(encrypted_len - n);
        xor_into(&mut out[2 + n..2 + n + block_len], &key[..block_len]);
    }

    total
}

/// Encrypt a Tunnel-Password per RFC 2868 Section 3.5 with a fixed salt.
///
/// The result is `salt || ciphertext`. The plaintext is limited to 127
/// bytes. The first salt octet must have its high bit set to be valid on
/// the wire.
pub fn encode_tunnel_password_with_salt(
    password: impl AsRef<[u8]>,
    secret: &[u8],
    vector: &[u8; 16],
    salt: [u8; 2],
) -> Vec<u8> {
    let password = password.as_ref();
    let password = &password[..password.len().min(MAX_TUNNEL_PASS_LEN)];
    let mut out = vec![0u8; 2 + round_up(password.len() + 1)];
    let len = encode_tunnel_password_into(&mut out, password, secret, vector, salt);
    out.truncate(len);
    out
}

/// Encrypt a Tunnel-Password per RFC 2868 Section 3.5 with a fresh salt
pub fn encode_tunnel_password(
    password: impl AsRef<[u8]>,
    secret: &[u8],
    vector: &[u8; 16],
    salts: &SaltCounter,
) -> Vec<u8> {
    encode_tunnel_password_with_salt(password, secret, vector, salts.next_salt())
}

/// Recover the plaintext of a `salt || ciphertext` Tunnel-Password
pub fn decode_tunnel_password(
    encrypted: &[u8],
    secret: &[u8],
    vector: &[u8; 16],
) -> Result<Vec<u8>, PasswordError> {
    if encrypted.len() < TUNNEL_PASSWORD_MIN_SPACE || (encrypted.len() - 2) % AUTH_PASS_LEN != 0 {
        return Err(PasswordError::InvalidLength(encrypted.len()));
    }

    let (salt, cipher) = encrypted.split_at(2);
    let base = keyed(secret);
    let mut plain = cipher.to_vec();
    for n in (0..cipher.len()).step_by(AUTH_PASS_LEN) {
        let key = if n == 0 {
            block_key(&base, &[&vector[..], salt])
        } else {
            block_key(&base, &[&cipher[n - AUTH_PASS_LEN..n]])
        };
        xor_into(&mut plain[n..n + AUTH_PASS_LEN], &key);
    }

    let embedded = plain[0] as usize;
    if embedded > plain.len() - 1 {
        return Err(PasswordError::InvalidEmbeddedLength {
            embedded,
            available: plain.len() - 1,
        });
    }
    Ok(plain[1..1 + embedded].to_vec())
}

/// Ascend-Send-Secret / Ascend-Receive-Secret obfuscation:
/// `MD5(vector || secret) XOR value`.
///
/// Applying it twice with the same inputs restores the value.
pub fn make_ascend_secret(vector: &[u8; 16], secret: &[u8], value: &[u8; 16]) -> [u8; 16] {
    let mut context = md5::Context::new();
    context.consume(vector);
    context.consume(secret);
    let mut digest = context.compute().0;
    xor_into(&mut digest, value);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_authenticator() {
        let auth1 = generate_request_authenticator();
        let auth2 = generate_request_authenticator();
        assert_eq!(auth1.len(), 16);
        // Should be random
        assert_ne!(auth1, auth2);
    }

    #[test]
    fn test_password_encryption_decryption() {
        let password = b"mysecretpassword-that-spans-two-blocks";
        let secret = b"sharedsecret";
        let authenticator = [1u8; 16];

        let encrypted = encode_user_password(password, secret, &authenticator);
        assert_eq!(encrypted.len(), 48);
        let decrypted = decode_user_password(&encrypted, secret, &authenticator).unwrap();
        assert_eq!(&decrypted[..], &password[..]);
    }

    #[test]
    fn test_password_encryption_empty() {
        let encrypted = encode_user_password(b"", b"sharedsecret", &[1u8; 16]);
        // Should be padded to 16 bytes
        assert_eq!(encrypted.len(), 16);
    }

    #[test]
    fn test_password_truncated_to_128() {
        let encrypted = encode_user_password(vec![b'a'; 200], b"secret", &[0u8; 16]);
        assert_eq!(encrypted.len(), MAX_PASS_LEN);
    }

    #[test]
    fn test_single_block_is_an_involution() {
        let secret = b"xyzzy5461";
        let vector = [0x0fu8; 16];
        let encrypted = encode_user_password(b"arctangent", secret, &vector);
        let twice = encode_user_password(&encrypted, secret, &vector);
        let mut expected = b"arctangent".to_vec();
        expected.resize(16, 0);
        assert_eq!(twice, expected);
    }

    #[test]
    fn test_rfc2865_first_block() {
        // First block key is MD5(secret || vector)
        let secret = b"xyzzy5461";
        let vector = [0x11u8; 16];
        let encrypted = encode_user_password(b"", secret, &vector);

        let mut input = secret.to_vec();
        input.extend_from_slice(&vector);
        assert_eq!(encrypted, md5::compute(&input).0.to_vec());
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        assert_eq!(
            decode_user_password(&[0u8; 15], b"s", &[0u8; 16]),
            Err(PasswordError::InvalidLength(15))
        );
        assert!(decode_user_password(&[], b"s", &[0u8; 16]).is_err());
    }

    #[test]
    fn test_salt_high_bit_and_counter() {
        let salts = SaltCounter::new();
        let first = salts.next_salt();
        let second = salts.next_salt();
        assert_eq!(first[0] & 0x80, 0x80);
        assert_eq!(second[0] & 0x80, 0x80);
        assert_eq!((first[0] >> 3) & 0x0f, 0);
        assert_eq!((second[0] >> 3) & 0x0f, 1);
    }

    #[test]
    fn test_tunnel_password_length() {
        let salts = SaltCounter::new();
        for len in [0usize, 1, 14, 15, 16, 31, 100, 127] {
            let password = vec![b'p'; len];
            let encrypted = encode_tunnel_password(&password, b"secret", &[3u8; 16], &salts);
            assert_eq!(encrypted.len(), 2 + round_up(len + 1), "len {}", len);
            assert_eq!(encrypted[0] & 0x80, 0x80);
        }
    }

    #[test]
    fn test_tunnel_password_round_trip() {
        let vector = [0x42u8; 16];
        let encrypted =
            encode_tunnel_password_with_salt(b"tunnel-secret-value", b"shared", &vector, [0x85, 0x11]);
        assert_eq!(&encrypted[..2], &[0x85, 0x11]);
        let decrypted = decode_tunnel_password(&encrypted, b"shared", &vector).unwrap();
        assert_eq!(decrypted, b"tunnel-secret-value");
    }

    #[test]
    fn test_tunnel_password_wrong_vector() {
        let encrypted = encode_tunnel_password_with_salt(b"pw", b"shared", &[1u8; 16], [0x80, 0]);
        let decoded = decode_tunnel_password(&encrypted, b"shared", &[2u8; 16]);
        assert_ne!(decoded, Ok(b"pw".to_vec()));
    }

    #[test]
    fn test_tunnel_password_truncates_last_block() {
        // 40 bytes of room: 2 salt + 38 of ciphertext, last block cut short
        let mut out = [0u8; 40];
        let written =
            encode_tunnel_password_into(&mut out, &[b'x'; 60], b"s", &[0u8; 16], [0x80, 1]);
        assert_eq!(written, 40);
        assert_eq!(out[2] ^ block_key(&keyed(b"s"), &[&[0u8; 16][..], &[0x80u8, 1][..]])[0], 37);
    }

    #[test]
    fn test_tunnel_password_needs_room() {
        let mut out = [0u8; 17];
        assert_eq!(
            encode_tunnel_password_into(&mut out, b"pw", b"s", &[0u8; 16], [0x80, 0]),
            0
        );
    }

    #[test]
    fn test_ascend_secret_involution() {
        let vector = [5u8; 16];
        let value = *b"0123456789abcdef";
        let hidden = make_ascend_secret(&vector, b"secret", &value);
        assert_ne!(hidden, value);
        assert_eq!(make_ascend_secret(&vector, b"secret", &hidden), value);
    }
}
