//! Integration tests for the event channel and `EventEmitter` trait.

use cforge_events::{
    channel, AppEvent, EventEmitter, FailureContext, GeneralEvent, ManifestEvent, ProgressEvent,
    ResolveEvent,
};

#[tokio::test]
async fn emit_helper_delivers_through_channel() {
    let (tx, mut rx) = channel();

    tx.emit_error("test error");
    tx.emit_debug("test debug");

    let event1 = rx.recv().await.unwrap();
    assert!(matches!(
        event1,
        AppEvent::General(GeneralEvent::Error { .. })
    ));

    let event2 = rx.recv().await.unwrap();
    assert!(matches!(
        event2,
        AppEvent::General(GeneralEvent::DebugLog { .. })
    ));
}

#[tokio::test]
async fn dropped_receiver_does_not_panic_on_send() {
    let (tx, rx) = channel();
    drop(rx);

    tx.emit_warning("ignored");
}

#[tokio::test]
async fn manifest_load_failed_carries_failure_context() {
    let (tx, mut rx) = channel();
    let err = cforge_errors::Error::internal("boom");

    tx.emit_manifest_load_failed("cforge.toml", &err);

    let event = rx.recv().await.unwrap();
    match event {
        AppEvent::Manifest(ManifestEvent::LoadFailed { path, failure }) => {
            assert_eq!(path, "cforge.toml");
            assert!(failure.message.contains("boom"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn resolve_dependency_failed_carries_failure_context() {
    let (tx, mut rx) = channel();
    let err = cforge_errors::Error::internal("clone failed");

    tx.emit_resolve_dependency_failed("fmt", &err);

    let event = rx.recv().await.unwrap();
    match event {
        AppEvent::Resolve(ResolveEvent::DependencyFailed { name, failure }) => {
            assert_eq!(name, "fmt");
            assert!(failure.message.contains("clone failed"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn app_event_log_level_routes_failures_to_error() {
    let event = AppEvent::Progress(ProgressEvent::failed(
        "dl-1",
        FailureContext::new("fetch_failed", "connection reset"),
    ));
    assert_eq!(event.log_level(), tracing::Level::ERROR);
}

#[test]
fn app_event_log_target_is_stable_per_domain() {
    let event = AppEvent::Build(cforge_events::BuildEvent::Started {
        project: "app".into(),
        build_config: "Release".into(),
        jobs: 4,
    });
    assert_eq!(event.log_target(), "cforge::events::build");
}

#[test]
fn general_event_serializes_with_tagged_shape() {
    let event = GeneralEvent::warning("low disk space");
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"Warning\""));
}
