use super::*;

// =============================================================================
// Session
// =============================================================================

#[test]
fn realtime_token_present_for_non_empty_token() {
    let session = Session::new("tok1", None);
    assert_eq!(session.realtime_token(), Some("tok1"));
}

#[test]
fn realtime_token_absent_for_empty_token() {
    let session = Session::new("", Some(User::new("u1")));
    assert_eq!(session.realtime_token(), None);
}

#[test]
fn user_id_follows_user_field() {
    assert_eq!(Session::new("t", Some(User::new("u2"))).user_id(), Some("u2"));
    assert_eq!(Session::new("t", None).user_id(), None);
}

// =============================================================================
// user_of
// =============================================================================

#[test]
fn user_of_absent_session_is_absent() {
    assert_eq!(user_of(None), None);
}

#[test]
fn user_of_session_without_user_is_absent() {
    let session = Session::new("tok", None);
    assert_eq!(user_of(Some(&session)), None);
}

#[test]
fn user_of_session_with_user_clones_it() {
    let session = Session::new("tok", Some(User::new("u1")));
    assert_eq!(user_of(Some(&session)).map(|u| u.id), Some("u1".to_owned()));
}

// =============================================================================
// serde
// =============================================================================

#[test]
fn session_deserializes_minimal_payload() {
    let session: Session = serde_json::from_str(r#"{"access_token":"tok1","user":{"id":"u2"}}"#).unwrap();
    assert_eq!(session.access_token, "tok1");
    assert_eq!(session.refresh_token, None);
    assert_eq!(session.expires_at, None);
    let user = session.user.unwrap();
    assert_eq!(user.id, "u2");
    assert_eq!(user.email, None);
    assert!(user.metadata.as_object().is_some_and(serde_json::Map::is_empty));
}

#[test]
fn session_serialize_omits_absent_optionals() {
    let session = Session::new("tok", None);
    let value = serde_json::to_value(&session).unwrap();
    assert_eq!(value["access_token"], "tok");
    assert!(value.get("refresh_token").is_none());
    assert!(value.get("expires_at").is_none());
    assert!(value["user"].is_null());
}

#[test]
fn session_missing_access_token_is_rejected() {
    assert!(serde_json::from_str::<Session>(r#"{"user":{"id":"u1"}}"#).is_err());
}
