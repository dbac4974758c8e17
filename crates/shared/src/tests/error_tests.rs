use super::*;

#[test]
fn prefers_message_then_error_then_msg() {
    assert_eq!(server_message(400, r#"{"message":"dup","error":"x"}"#), "dup");
    assert_eq!(server_message(400, r#"{"error":"bad input"}"#), "bad input");
    assert_eq!(server_message(400, r#"{"msg":"nope"}"#), "nope");
}

#[test]
fn falls_back_to_plain_body_and_status() {
    assert_eq!(server_message(502, "Bad Gateway"), "Bad Gateway");
    assert_eq!(server_message(500, "{}"), "request failed with status 500");
    assert_eq!(server_message(500, "  "), "request failed with status 500");
}
