use crate::auth::SaltCounter;
use crate::packet::Code;

/// Per-packet inputs the encoder needs for obfuscation.
///
/// `vector` is the authenticator of the packet being built. For responses,
/// `original` holds the authenticator of the request being answered.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    pub code: Code,
    pub secret: &'a [u8],
    pub vector: [u8; 16],
    pub original: Option<[u8; 16]>,
    pub salt: &'a SaltCounter,
}

impl<'a> EncodeContext<'a> {
    pub fn new(code: Code, secret: &'a [u8], vector: [u8; 16], salt: &'a SaltCounter) -> Self {
        EncodeContext {
            code,
            secret,
            vector,
            original: None,
            salt,
        }
    }

    /// Attach the authenticator of the request this packet answers
    pub fn with_original(mut self, vector: [u8; 16]) -> Self {
        self.original = Some(vector);
        self
    }

    /// Vector keying Tunnel-Password: the request's own authenticator for
    /// requests, the original request's for responses.
    pub fn tunnel_password_vector(&self) -> Option<&[u8; 16]> {
        if self.code.is_response() {
            self.original.as_ref()
        } else {
            Some(&self.vector)
        }
    }
}
