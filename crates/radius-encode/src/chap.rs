//! CHAP-Password construction (RFC 2865 Section 5.3)
//!
//! The CHAP-Password value is the CHAP identifier followed by
//! MD5(identifier + password + challenge). The challenge is the value of a
//! CHAP-Challenge attribute when the request carries one, otherwise the
//! Request Authenticator.

use crate::dictionary::{AttributeType, Dictionary};
use crate::pair::ValuePair;
use thiserror::Error;

/// Identifier plus digest
pub const CHAP_PASSWORD_LEN: usize = 17;

/// CHAP-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChapError {
    #[error("Invalid CHAP-Password length: expected 17 bytes, got {0}")]
    InvalidLength(usize),
}

/// Decoded CHAP-Password value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapResponse {
    /// CHAP identifier
    pub ident: u8,
    /// MD5 hash of (ident + password + challenge)
    pub response: [u8; 16],
}

impl ChapResponse {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChapError> {
        if bytes.len() != CHAP_PASSWORD_LEN {
            return Err(ChapError::InvalidLength(bytes.len()));
        }

        let mut response = [0u8; 16];
        response.copy_from_slice(&bytes[1..]);

        Ok(ChapResponse {
            ident: bytes[0],
            response,
        })
    }

    pub fn to_bytes(&self) -> [u8; CHAP_PASSWORD_LEN] {
        let mut bytes = [0u8; CHAP_PASSWORD_LEN];
        bytes[0] = self.ident;
        bytes[1..].copy_from_slice(&self.response);
        bytes
    }
}

/// MD5(ident + password + challenge)
pub fn compute_chap_response(ident: u8, password: impl AsRef<[u8]>, challenge: &[u8]) -> [u8; 16] {
    let mut context = md5::Context::new();
    context.consume([ident]);
    context.consume(password.as_ref());
    context.consume(challenge);
    context.compute().0
}

/// Build the CHAP-Password value for `password`.
///
/// The challenge is taken from the first top-level CHAP-Challenge pair in
/// `pairs`, falling back to the request authenticator `vector`.
pub fn encode_chap_password(
    dict: &Dictionary,
    pairs: &[ValuePair],
    ident: u8,
    password: impl AsRef<[u8]>,
    vector: &[u8; 16],
) -> [u8; CHAP_PASSWORD_LEN] {
    let challenge = dict
        .find_child(None, AttributeType::ChapChallenge.as_u32())
        .and_then(|id| pairs.iter().find(|pair| pair.attr() == id));

    let response = match challenge {
        Some(pair) => compute_chap_response(ident, password, &pair.value().to_network()),
        None => compute_chap_response(ident, password, vector),
    };

    ChapResponse { ident, response }.to_bytes()
}
