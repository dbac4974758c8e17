use super::*;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

fn mint(claims: serde_json::Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-only-secret"),
    )
    .expect("token")
}

#[test]
fn decodes_identity_without_knowing_the_secret() {
    let token = mint(json!({ "id": "admin-1", "name": "Priya", "exp": 1 }));
    let session = TokenSession::new(token.clone());

    assert_eq!(session.token(), Some(token));
    assert_eq!(
        session.identity(),
        Some(Identity {
            id: "admin-1".into(),
            name: "Priya".into()
        })
    );
}

#[test]
fn falls_back_across_claim_aliases() {
    let token = mint(json!({ "sub": 42, "username": "ops" }));
    let identity = decode_identity(&token).expect("identity");
    assert_eq!(identity.id, "42");
    assert_eq!(identity.name, "ops");

    let nameless = mint(json!({ "userId": "u9" }));
    assert_eq!(decode_identity(&nameless).expect("identity").name, "u9");
}

#[test]
fn garbage_tokens_yield_no_identity_but_are_still_sent() {
    let session = TokenSession::new("not-a-jwt");
    assert_eq!(session.identity(), None);
    assert_eq!(session.token().as_deref(), Some("not-a-jwt"));
}

#[test]
fn blank_and_anonymous_sessions_have_no_token() {
    assert_eq!(TokenSession::new("  ").token(), None);
    assert_eq!(AnonymousSession.token(), None);
    assert_eq!(AnonymousSession.identity(), None);
}
