use std::{fs, path::Path, sync::Arc};

use tempfile::tempdir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};

use fretboard::DiagramBuilder;
use fretboard_cli::{Args, Command, RenderArgs, run, serve};

/// Writes a config file sending all output into `dir`.
fn write_config(dir: &Path, format: &str) -> String {
    let path = dir.join("config.toml");
    let content = format!(
        "[output]\nformat = \"{format}\"\nsave_dir = {:?}\nsnapshot_dir = {:?}\n",
        dir.join("saves").to_string_lossy(),
        dir.join("serialized").to_string_lossy(),
    );
    fs::write(&path, content).expect("Failed to write config");
    path.to_string_lossy().to_string()
}

fn render_args(config: String, render: RenderArgs) -> Args {
    Args {
        command: Command::Render(render),
        config: Some(config),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_render_to_save_dir_with_snapshot() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_config(temp_dir.path(), "png");

    let args = render_args(
        config.clone(),
        RenderArgs {
            title: Some("G major".to_string()),
            frets: Some(4),
            positions: vec![
                ("E".to_string(), vec![3]),
                ("A".to_string(), vec![2]),
                ("e".to_string(), vec![3]),
            ],
            save_snapshot: true,
            ..RenderArgs::default()
        },
    );
    run(&args).expect("Render should succeed");

    let image = temp_dir.path().join("saves").join("G major.png");
    let snapshot = temp_dir.path().join("serialized").join("G major.json");
    assert!(fs::read(&image).unwrap().starts_with(b"\x89PNG"));
    assert!(snapshot.is_file());

    // Re-render from the snapshot to an explicit path
    let output = temp_dir.path().join("again.png");
    let args = render_args(
        config,
        RenderArgs {
            from_snapshot: Some("G major".to_string()),
            output: Some(output.clone()),
            ..RenderArgs::default()
        },
    );
    run(&args).expect("Render from snapshot should succeed");

    assert_eq!(fs::read(&output).unwrap(), fs::read(&image).unwrap());
}

#[test]
fn e2e_render_from_request_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_config(temp_dir.path(), "jpeg");

    let request = temp_dir.path().join("request.json");
    fs::write(
        &request,
        r#"{"title": "From file", "frets": 3, "mode": "flat", "mapping": {"A": [1]}}"#,
    )
    .unwrap();

    let args = render_args(
        config,
        RenderArgs {
            request: Some(request),
            title: Some("Overridden".to_string()),
            ..RenderArgs::default()
        },
    );
    run(&args).expect("Render should succeed");

    let image = temp_dir.path().join("saves").join("Overridden.jpg");
    assert!(fs::read(image).unwrap().starts_with(&[0xFF, 0xD8]));
}

#[test]
fn e2e_invalid_requests_fail_without_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_config(temp_dir.path(), "png");

    let bad = [
        RenderArgs {
            positions: vec![("x".to_string(), vec![1])],
            ..RenderArgs::default()
        },
        RenderArgs {
            frets: Some(2),
            positions: vec![("E".to_string(), vec![5])],
            ..RenderArgs::default()
        },
        RenderArgs {
            mode: Some("natural".to_string()),
            ..RenderArgs::default()
        },
        RenderArgs {
            from_snapshot: Some("never saved".to_string()),
            ..RenderArgs::default()
        },
    ];

    for render in bad {
        let args = render_args(config.clone(), render);
        assert!(run(&args).is_err(), "Expected failure for {args:?}");
    }

    assert!(!temp_dir.path().join("saves").exists());
}

#[test]
fn e2e_missing_config_is_an_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = render_args(
        temp_dir.path().join("nope.toml").to_string_lossy().to_string(),
        RenderArgs::default(),
    );
    assert!(run(&args).is_err());
}

async fn http_exchange(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn e2e_http_endpoint() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(serve::serve(
        listener,
        Arc::new(DiagramBuilder::default()),
        async {
            let _ = stop_rx.await;
        },
    ));

    let health = http_exchange(addr, "GET /health HTTP/1.1\r\nHost: test\r\n\r\n").await;
    assert!(health.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(health.ends_with("ok"));

    let body = r#"{"title": "E", "frets": 2, "mapping": {"E": [0]}}"#;
    let generated = http_exchange(
        addr,
        &format!(
            "POST /generate HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;
    assert!(generated.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(generated.contains("Content-Type: image/jpeg\r\n"));

    let body = r#"{"frets": -4}"#;
    let rejected = http_exchange(
        addr,
        &format!(
            "POST /generate HTTP/1.1\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;
    assert!(rejected.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(rejected.contains(r#"{"error":"#));

    let too_large = http_exchange(
        addr,
        "POST /generate HTTP/1.1\r\nContent-Length: 2000000\r\n\r\n",
    )
    .await;
    assert!(too_large.starts_with("HTTP/1.1 413 "));

    let chunked = http_exchange(
        addr,
        "POST /generate HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n2\r\n{}\r\n0\r\n\r\n",
    )
    .await;
    assert!(chunked.starts_with("HTTP/1.1 501 "));

    let missing = http_exchange(addr, "GET /missing HTTP/1.1\r\n\r\n").await;
    assert!(missing.starts_with("HTTP/1.1 404 "));

    stop_tx.send(()).unwrap();
    server.await.unwrap();
}
