//! Client credentials and the derived `appsecret_proof`.

use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Access token plus application identity.
///
/// The proof is computed once here and never changes for the lifetime of
/// the value; there is no rotation API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
    app_id: String,
    app_secret: String,
    appsecret_proof: String,
}

impl Credentials {
    pub fn new(
        access_token: impl Into<String>,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        let access_token = access_token.into();
        let app_secret = app_secret.into();
        let appsecret_proof = appsecret_proof(&access_token, &app_secret);
        Self {
            access_token,
            app_id: app_id.into(),
            app_secret,
            appsecret_proof,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    pub fn appsecret_proof(&self) -> &str {
        &self.appsecret_proof
    }

    /// App access token in the `<app_id>|<app_secret>` form.
    pub fn app_access_token(&self) -> String {
        format!("{}|{}", self.app_id, self.app_secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("access_token", &"[REDACTED]")
            .field("app_secret", &"[REDACTED]")
            .field("appsecret_proof", &"[REDACTED]")
            .finish()
    }
}

/// HMAC-SHA256 keyed with the access token over the app secret, hex encoded.
pub fn appsecret_proof(access_token: &str, app_secret: &str) -> String {
    let mut mac = <HmacSha256 as KeyInit>::new(&block_key(access_token.as_bytes()));
    mac.update(app_secret.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Block-sized HMAC key: longer keys are hashed first, shorter ones are zero padded.
fn block_key(raw: &[u8]) -> Key<HmacSha256> {
    let mut key = Key::<HmacSha256>::default();
    if raw.len() > key.len() {
        let digest = <Sha256 as sha2::Digest>::digest(raw);
        key[..digest.len()].copy_from_slice(&digest);
    } else {
        key[..raw.len()].copy_from_slice(raw);
    }
    key
}
