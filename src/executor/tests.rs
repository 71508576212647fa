//! Tests for the query executor

use super::*;
use crate::decode::TwitterDateConverter;
use crate::test_support::ScriptedTransport;
use serde::Deserialize;
use std::sync::Mutex;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    screen_name: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Tweet {
    id: u64,
    created_at: String,
}

fn executor(transport: &ScriptedTransport, policy: ErrorPolicy) -> QueryExecutor {
    QueryExecutor::new(transport.clone()).with_policy(policy)
}

// ============================================================================
// execute / try_execute
// ============================================================================

#[tokio::test]
async fn test_execute_returns_text() {
    let transport = ScriptedTransport::new();
    transport.respond(r#"{"id":1}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let text = exec.execute("users/show.json?user_id=1", Method::GET).await.unwrap();

    assert_eq!(text, r#"{"id":1}"#);
    assert_eq!(transport.queries(), vec!["users/show.json?user_id=1"]);
    assert_eq!(transport.requests()[0].method, Method::GET);
}

#[tokio::test]
async fn test_execute_rejects_blank_query_before_transport() {
    let transport = ScriptedTransport::new();
    let exec = executor(&transport, ErrorPolicy::swallowing());

    for query in ["", "   "] {
        let err = exec.execute(query, Method::GET).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = exec.try_execute(query, Method::POST).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_execute_normalizes_failures_to_remote_service() {
    let transport = ScriptedTransport::new();
    transport.fail(401, "Could not authenticate you");
    let exec = executor(&transport, ErrorPolicy::swallowing());

    let err = exec
        .execute("account/verify_credentials.json", Method::GET)
        .await
        .unwrap_err();

    match err {
        Error::RemoteService {
            query,
            method,
            status,
            message,
        } => {
            assert_eq!(query, "account/verify_credentials.json");
            assert_eq!(method, Method::GET);
            assert_eq!(status, Some(401));
            assert_eq!(message, "Could not authenticate you");
        }
        other => panic!("Expected RemoteService, got {other:?}"),
    }
}

#[tokio::test]
async fn test_try_execute_swallows_when_policy_allows() {
    let transport = ScriptedTransport::new();
    transport.fail(503, "Over capacity");
    let exec = executor(&transport, ErrorPolicy::swallowing());

    assert_eq!(exec.try_execute("q.json", Method::GET).await.unwrap(), None);
}

#[tokio::test]
async fn test_try_execute_propagates_when_strict() {
    let transport = ScriptedTransport::new();
    transport.fail(503, "Over capacity");
    let exec = executor(&transport, ErrorPolicy::strict());

    let err = exec.try_execute("q.json", Method::POST).await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_policy_change_applies_to_existing_executor() {
    let transport = ScriptedTransport::new();
    transport.fail(500, "").fail(500, "");
    let policy = ErrorPolicy::strict();
    let exec = executor(&transport, policy.clone());

    assert!(exec.try_execute("q.json", Method::GET).await.is_err());

    policy.set_swallow_remote_failures(true);
    assert_eq!(exec.try_execute("q.json", Method::GET).await.unwrap(), None);
}

#[tokio::test]
async fn test_transport_failure_is_policy_gated() {
    let transport = ScriptedTransport::new();
    transport.push(Err(Error::transport("connection reset")));
    let exec = executor(&transport, ErrorPolicy::swallowing());

    assert_eq!(exec.try_execute("q.json", Method::GET).await.unwrap(), None);
}

#[tokio::test]
async fn test_get_and_post_shorthands() {
    let transport = ScriptedTransport::new();
    transport.respond("a").respond("b");
    let exec = executor(&transport, ErrorPolicy::strict());

    assert_eq!(exec.get_json("one.json").await.unwrap(), "a");
    assert_eq!(exec.post_json("two.json").await.unwrap(), "b");

    let methods: Vec<Method> = transport.requests().iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::GET, Method::POST]);
}

// ============================================================================
// Observer
// ============================================================================

#[tokio::test]
async fn test_observer_sees_successful_queries_only() {
    let transport = ScriptedTransport::new();
    transport.respond(r#"{"ok":true}"#).fail(500, "boom");
    let exec = executor(&transport, ErrorPolicy::swallowing());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    exec.observer().set(move |obs| {
        sink.lock().unwrap().push(format!(
            "{} {} -> {}",
            obs.method, obs.query, obs.response
        ));
    });

    exec.execute("a.json", Method::GET).await.unwrap();
    exec.try_execute("b.json", Method::POST).await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![r#"GET a.json -> {"ok":true}"#.to_string()]
    );
}

#[tokio::test]
async fn test_observer_does_not_alter_result() {
    let transport = ScriptedTransport::new();
    transport.respond("original");
    let exec = executor(&transport, ErrorPolicy::strict());
    exec.observer().set(|_| {});

    assert_eq!(exec.get_json("q.json").await.unwrap(), "original");
}

// ============================================================================
// Tree / typed / path
// ============================================================================

#[tokio::test]
async fn test_execute_tree() {
    let transport = ScriptedTransport::new();
    transport.respond(r#"{"screen_name":"rustlang"}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let tree = exec.execute_tree("q.json", Method::GET).await.unwrap();
    assert_eq!(tree["screen_name"], "rustlang");
}

#[tokio::test]
async fn test_try_execute_tree_swallowed() {
    let transport = ScriptedTransport::new();
    transport.fail(404, "");
    let exec = executor(&transport, ErrorPolicy::swallowing());

    assert!(exec
        .try_execute_tree("q.json", Method::GET)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_execute_typed_with_converters() {
    let transport = ScriptedTransport::new();
    transport.respond(r#"{"id":9,"created_at":"Wed Aug 27 13:08:45 +0000 2008"}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let converters = ConverterSet::new().with(TwitterDateConverter::new(["created_at"]));
    let tweet: Tweet = exec
        .execute_typed("statuses/show.json?id=9", Method::GET, &converters)
        .await
        .unwrap();

    assert_eq!(tweet.id, 9);
    assert_eq!(tweet.created_at, "2008-08-27T13:08:45Z");
}

#[tokio::test]
async fn test_typed_shape_mismatch_is_never_swallowed() {
    let transport = ScriptedTransport::new();
    transport.respond(r#"{"id":"not a number"}"#);
    let exec = executor(&transport, ErrorPolicy::swallowing());

    let err = exec
        .try_execute_typed::<User>("q.json", Method::GET, &ConverterSet::new())
        .await
        .unwrap_err();
    assert!(err.is_deserialization());
}

#[tokio::test]
async fn test_try_execute_typed_null_and_swallowed() {
    let transport = ScriptedTransport::new();
    transport.respond("null").fail(429, "Rate limit exceeded");
    let exec = executor(&transport, ErrorPolicy::swallowing());

    let first: Option<User> = exec
        .try_execute_typed("q.json", Method::GET, &ConverterSet::new())
        .await
        .unwrap();
    let second: Option<User> = exec
        .try_execute_typed("q.json", Method::GET, &ConverterSet::new())
        .await
        .unwrap();

    assert!(first.is_none());
    assert!(second.is_none());
}

#[tokio::test]
async fn test_get_typed() {
    let transport = ScriptedTransport::new();
    transport.respond(r#"{"id":1,"screen_name":"ferris"}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let user: User = exec.get("users/show.json?screen_name=ferris").await.unwrap();
    assert_eq!(
        user,
        User {
            id: 1,
            screen_name: "ferris".to_string()
        }
    );
}

#[tokio::test]
async fn test_execute_typed_at_path() {
    let transport = ScriptedTransport::new();
    transport
        .respond(r#"{"relationship":{"source":{"id":1,"screen_name":"a"}}}"#)
        .respond(r#"{"relationship":{}}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let found: Option<User> = exec
        .execute_typed_at_path("friendships/show.json", Method::GET, &["relationship", "source"])
        .await
        .unwrap();
    assert_eq!(found.unwrap().screen_name, "a");

    let missing: Option<User> = exec
        .execute_typed_at_path("friendships/show.json", Method::GET, &["relationship", "source"])
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_try_execute_typed_at_path_policy() {
    let transport = ScriptedTransport::new();
    transport.fail(500, "").fail(500, "");
    let policy = ErrorPolicy::swallowing();
    let exec = executor(&transport, policy.clone());

    let swallowed: Option<u32> = exec
        .try_execute_typed_at_path("q.json", Method::POST, &["a"])
        .await
        .unwrap();
    assert!(swallowed.is_none());

    policy.set_swallow_remote_failures(false);
    let err = exec
        .try_execute_typed_at_path::<u32, _>("q.json", Method::POST, &["a"])
        .await
        .unwrap_err();
    assert!(err.is_remote());
}

// ============================================================================
// Multipart
// ============================================================================

#[tokio::test]
async fn test_execute_multipart_always_posts() {
    let transport = ScriptedTransport::new();
    transport.respond(r#"{"media_id":42}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let binaries = vec![vec![1u8, 2, 3], vec![4u8]];
    let text = exec
        .execute_multipart("media/upload.json", &binaries, "media")
        .await
        .unwrap();

    assert_eq!(text, r#"{"media_id":42}"#);
    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.content_id.as_deref(), Some("media"));
    assert_eq!(request.parts, 2);
}

#[tokio::test]
async fn test_multipart_typed_and_observer() {
    #[derive(Deserialize)]
    struct Media {
        media_id: u64,
    }

    let transport = ScriptedTransport::new();
    transport.respond(r#"{"media_id":7}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let observed = Arc::new(Mutex::new(None));
    let sink = observed.clone();
    exec.observer()
        .set(move |obs| *sink.lock().unwrap() = Some((obs.query.to_string(), obs.method)));

    let media: Media = exec
        .execute_multipart_typed("media/upload.json", &[vec![0u8]], "media", &ConverterSet::new())
        .await
        .unwrap();

    assert_eq!(media.media_id, 7);
    assert_eq!(
        *observed.lock().unwrap(),
        Some(("media/upload.json".to_string(), Method::POST))
    );
}

#[tokio::test]
async fn test_try_execute_multipart_policy() {
    let transport = ScriptedTransport::new();
    transport.fail(413, "too large").fail(413, "too large");
    let policy = ErrorPolicy::swallowing();
    let exec = executor(&transport, policy.clone());

    assert!(exec
        .try_execute_multipart("media/upload.json", &[vec![0u8]], "media")
        .await
        .unwrap()
        .is_none());

    policy.set_swallow_remote_failures(false);
    let err = exec
        .try_execute_multipart("media/upload.json", &[vec![0u8]], "media")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(413));
}

#[tokio::test]
async fn test_multipart_rejects_blank_query() {
    let transport = ScriptedTransport::new();
    let exec = executor(&transport, ErrorPolicy::swallowing());

    let err = exec
        .try_execute_multipart("", &[vec![0u8]], "media")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(transport.requests().is_empty());
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_from_config_uses_configured_policy() {
    let config = ClientConfig::builder()
        .base_url("https://api.example.com/1.1/")
        .swallow_remote_failures(false)
        .build();

    let exec = QueryExecutor::from_config(&config).unwrap();
    assert!(!exec.policy().swallow_remote_failures());
    assert!(!exec.observer().is_set());
}

#[tokio::test]
async fn test_unbuildable_query_is_never_swallowed() {
    let exec = QueryExecutor::from_config(&ClientConfig::default()).unwrap();
    assert!(exec.policy().swallow_remote_failures());

    let err = exec
        .try_execute("search.json?q=rust", Method::GET)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = exec
        .try_execute_typed_at_path::<u32, _>("search.json", Method::GET, &["count"])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_null_at_path_is_none() {
    #[derive(Debug, Deserialize)]
    struct Place {
        #[allow(dead_code)]
        full_name: String,
    }

    let transport = ScriptedTransport::new();
    transport.respond(r#"{"id":1,"place":null}"#);
    let exec = executor(&transport, ErrorPolicy::strict());

    let place: Option<Place> = exec
        .execute_typed_at_path("statuses/show.json?id=1", Method::GET, &["place"])
        .await
        .unwrap();
    assert!(place.is_none());
}

#[test]
fn test_from_config_validates() {
    let config = ClientConfig::builder().base_url("nope").build();
    assert!(QueryExecutor::from_config(&config).is_err());
}
