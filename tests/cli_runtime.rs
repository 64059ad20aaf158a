//! CLI runtime integration tests against a scripted stand-in for the runtime tool

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dockpane::controller::{AppEvent, RefreshWorker};
use dockpane::core::{ContainerRecord, ContainerStatus, DockpaneError, ImageRecord, RuntimeError};
use dockpane::runtime::{CliRuntime, Mutation, OutputFormat, SnapshotSource};
use dockpane::state::AppState;
use tempfile::TempDir;
use tokio::sync::mpsc;

const JSON_RUNTIME: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
case "$1" in
  ps)
    printf '%s\n' '{"ID":"abc123","Names":"web","State":"running","Status":"Up 2 hours"}'
    printf '\n'
    printf '%s\n' '{"ID":"def456","Names":"db","State":"exited","Status":"Exited (0) 3 days ago"}'
    ;;
  images)
    printf '%s\n' '{"ID":"sha256:111","Repository":"nginx","Tag":"latest"}'
    printf '%s\n' '{"ID":"sha256:222","Repository":"<none>","Tag":"<none>"}'
    ;;
  version) echo "Docker version 27.0.0" ;;
  rm|start|stop|rename|run|rmi) echo ok ;;
  *) echo "unknown command: $1" >&2; exit 1 ;;
esac
"#;

const TEXT_RUNTIME: &str = r#"#!/bin/sh
case "$1" in
  ps) printf 'abc123 web Up 2 hours\ndef456 db Exited (1) 5 minutes ago\n' ;;
  images) printf 'sha256:111\tnginx\tlatest\n' ;;
  *) exit 1 ;;
esac
"#;

const BROKEN_RUNTIME: &str = r#"#!/bin/sh
echo "Cannot connect to the Docker daemon. Is the docker daemon running?" >&2
exit 1
"#;

const GARBLED_RUNTIME: &str = r#"#!/bin/sh
printf '%s\n' '{"ID":"abc123","Names":"web","State":"running"}' 'not json at all'
"#;

const SLOW_RUNTIME: &str = r#"#!/bin/sh
sleep 5
"#;

fn write_runtime(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("fake-docker");
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn runtime(path: &Path, format: OutputFormat) -> CliRuntime {
    CliRuntime::new(path.to_string_lossy(), format, Duration::from_secs(5))
}

fn calls(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn test_lists_json_output_in_order() {
    let dir = TempDir::new().unwrap();
    let rt = runtime(&write_runtime(&dir, JSON_RUNTIME), OutputFormat::Json);

    let containers = rt.list_containers().await.unwrap();
    assert_eq!(
        containers,
        vec![
            ContainerRecord::new("abc123", "web", ContainerStatus::Running),
            ContainerRecord::new("def456", "db", ContainerStatus::Stopped),
        ]
    );

    let images = rt.list_images().await.unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], ImageRecord::new("sha256:111", "nginx", "latest"));
    assert!(images[1].is_dangling());

    assert_eq!(
        calls(&dir),
        vec![
            "ps -a --no-trunc --format {{json .}}",
            "images --format {{json .}}",
        ]
    );
}

#[tokio::test]
async fn test_lists_text_output() {
    let dir = TempDir::new().unwrap();
    let rt = runtime(&write_runtime(&dir, TEXT_RUNTIME), OutputFormat::Text);

    let containers = rt.list_containers().await.unwrap();
    assert_eq!(containers[0].status, ContainerStatus::Running);
    assert_eq!(containers[1].name, "db");
    assert_eq!(containers[1].status, ContainerStatus::Stopped);

    let images = rt.list_images().await.unwrap();
    assert_eq!(images, vec![ImageRecord::new("sha256:111", "nginx", "latest")]);
}

#[tokio::test]
async fn test_nonzero_exit_reports_stderr() {
    let dir = TempDir::new().unwrap();
    let rt = runtime(&write_runtime(&dir, BROKEN_RUNTIME), OutputFormat::Json);

    let err = rt.list_containers().await.unwrap_err();
    assert!(err.is_external_tool());
    match err {
        DockpaneError::Runtime(RuntimeError::ExternalTool { message, .. }) => {
            assert!(message.contains("Cannot connect to the Docker daemon"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_line_fails_whole_listing() {
    let dir = TempDir::new().unwrap();
    let rt = runtime(&write_runtime(&dir, GARBLED_RUNTIME), OutputFormat::Json);

    let err = rt.list_containers().await.unwrap_err();
    assert!(err.is_parse());
    assert!(matches!(
        err,
        DockpaneError::Runtime(RuntimeError::Parse { line: 2, .. })
    ));
}

#[tokio::test]
async fn test_slow_runtime_times_out() {
    let dir = TempDir::new().unwrap();
    let path = write_runtime(&dir, SLOW_RUNTIME);
    let rt = CliRuntime::new(
        path.to_string_lossy(),
        OutputFormat::Json,
        Duration::from_millis(200),
    );

    let err = rt.list_images().await.unwrap_err();
    assert!(matches!(
        err,
        DockpaneError::Runtime(RuntimeError::Timeout { .. })
    ));
}

#[tokio::test]
async fn test_mutations_pass_expected_arguments() {
    let dir = TempDir::new().unwrap();
    let rt = runtime(&write_runtime(&dir, JSON_RUNTIME), OutputFormat::Json);

    let mutations = [
        Mutation::RemoveContainer { id: "abc123".into() },
        Mutation::StartContainer { id: "abc123".into() },
        Mutation::StopContainer { id: "abc123".into() },
        Mutation::RenameContainer {
            id: "abc123".into(),
            new_name: "api".into(),
        },
        Mutation::CreateContainer {
            image: "nginx:latest".into(),
            name: "edge".into(),
            host_port: 8080,
            container_port: 80,
        },
        Mutation::RemoveImage { id: "sha256:111".into() },
    ];
    for mutation in &mutations {
        rt.mutate(mutation).await.unwrap();
    }

    assert_eq!(
        calls(&dir),
        vec![
            "rm -f abc123",
            "start abc123",
            "stop abc123",
            "rename abc123 api",
            "run -d --name edge -p 8080:80 nginx:latest",
            "rmi -f sha256:111",
        ]
    );
}

#[tokio::test]
async fn test_ping_returns_version_line() {
    let dir = TempDir::new().unwrap();
    let rt = runtime(&write_runtime(&dir, JSON_RUNTIME), OutputFormat::Json);
    assert_eq!(rt.ping().await.unwrap(), "Docker version 27.0.0");
}

#[tokio::test]
async fn test_worker_feeds_render_state() {
    let dir = TempDir::new().unwrap();
    let source: Arc<dyn SnapshotSource> =
        Arc::new(runtime(&write_runtime(&dir, JSON_RUNTIME), OutputFormat::Json));
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let (worker, _handle) =
        RefreshWorker::<ContainerRecord>::new(source, Duration::from_secs(60), events_tx);
    let task = worker.spawn();

    let event = tokio::time::timeout(Duration::from_secs(5), events_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(event, AppEvent::ContainersRefreshed(Ok(_))));

    let mut state = AppState::default();
    state.apply_event(event);
    assert_eq!(state.containers.len(), 2);
    assert_eq!(state.containers.selected(), Some(0));
    assert_eq!(state.containers.selected_id().as_deref(), Some("abc123"));

    task.abort();
}

#[tokio::test]
#[ignore = "requires Docker daemon"]
async fn test_real_docker_listing() {
    let rt = CliRuntime::new("docker", OutputFormat::Json, Duration::from_secs(10));
    assert!(rt.ping().await.is_ok());
    assert!(rt.list_containers().await.is_ok());
    assert!(rt.list_images().await.is_ok());
}
