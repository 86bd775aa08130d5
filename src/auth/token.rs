use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Fixed token header, serialized once per issued token.
const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Identity facts embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub admin: bool,
}

impl Claims {
    pub fn new(user_id: impl Into<String>, admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            admin,
        }
    }
}

/// Stateless signed-token codec: `header.claims.signature`, each segment
/// base64url without padding, signature = HMAC-SHA256 over the first two
/// encoded segments.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self, claims: &Claims) -> String {
        let header = URL_SAFE_NO_PAD.encode(TOKEN_HEADER);
        // Claims are a plain struct; serialization cannot fail
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap_or_default());
        let signature = URL_SAFE_NO_PAD.encode(self.sign(&header, &body));
        format!("{header}.{body}.{signature}")
    }

    /// Verify a presented token. Any malformed or tampered token yields
    /// `None`; callers treat that as "unauthenticated", never as an error.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut segments = token.split('.');
        let header = segments.next().filter(|s| !s.is_empty())?;
        let body = segments.next().filter(|s| !s.is_empty())?;
        let signature = segments.next().filter(|s| !s.is_empty())?;
        if segments.next().is_some() {
            return None;
        }

        let supplied = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(body.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&supplied).ok()?;

        let payload = URL_SAFE_NO_PAD.decode(body).ok()?;
        serde_json::from_slice(&payload).ok()
    }

    fn sign(&self, header: &str, body: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key length");
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(body.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}
