//! Bearer-token session capability handed to the backend and controllers.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

pub trait SessionProvider: Send + Sync {
    fn token(&self) -> Option<String>;
    fn identity(&self) -> Option<Identity>;
}

/// No signed-in admin; every request fails before reaching the network.
pub struct AnonymousSession;

impl SessionProvider for AnonymousSession {
    fn token(&self) -> Option<String> {
        None
    }

    fn identity(&self) -> Option<Identity> {
        None
    }
}

const ID_CLAIMS: [&str; 4] = ["id", "_id", "userId", "sub"];
const NAME_CLAIMS: [&str; 3] = ["name", "username", "fullName"];

pub struct TokenSession {
    token: String,
    identity: Option<Identity>,
}

impl TokenSession {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        let identity = decode_identity(&token);
        Self { token, identity }
    }
}

impl SessionProvider for TokenSession {
    fn token(&self) -> Option<String> {
        if self.token.is_empty() {
            None
        } else {
            Some(self.token.clone())
        }
    }

    fn identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

/// Reads the acting admin out of the token payload. The token is opaque to
/// this layer: the signature and expiry are the backend's business.
pub fn decode_identity(token: &str) -> Option<Identity> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claims = match decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    ) {
        Ok(data) => data.claims,
        Err(err) => {
            warn!(error = %err, "bearer token payload is not decodable");
            return None;
        }
    };

    let id = ID_CLAIMS
        .iter()
        .find_map(|key| match claims.get(*key) {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        })?;
    let name = NAME_CLAIMS
        .iter()
        .find_map(|key| claims.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());

    Some(Identity { id, name })
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
