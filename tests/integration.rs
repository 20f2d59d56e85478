use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};

use ftserver::{Server, ServerConfig};

const INVALID_REPLY: &[u8] = b"Invalid command. Please send \"-l\" or \"-g\".";

// Start a server on an ephemeral port serving `root`
async fn start_server(root: &Path) -> SocketAddr {
    let config = ServerConfig {
        bind_address: "127.0.0.1".to_string(),
        server_root: root.display().to_string(),
        io_timeout_secs: 5,
        connect_timeout_secs: 5,
        ..ServerConfig::default()
    };
    let server = Server::bind(config).unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });
    addr
}

// Connect and walk the handshake up to the command reply
async fn send_command(addr: SocketAddr, command: &[u8]) -> TcpStream {
    let mut control = TcpStream::connect(addr).await.unwrap();
    control.set_nodelay(true).unwrap();

    control.write_all(b"127.0.0.1").await.unwrap();
    let mut ack = [0u8; 1];
    control.read_exact(&mut ack).await.unwrap();
    assert_eq!(&ack, b" ");

    control.write_all(command).await.unwrap();
    control
}

// Run a full valid request and return whatever arrives on the data connection
async fn fetch(addr: SocketAddr, command: &[u8], filename: Option<&str>) -> Vec<u8> {
    let mut control = send_command(addr, command).await;
    let mut echo = vec![0u8; command.len()];
    control.read_exact(&mut echo).await.unwrap();
    assert_eq!(echo, command);

    let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let data_port = data_listener.local_addr().unwrap().port();
    control
        .write_all(data_port.to_string().as_bytes())
        .await
        .unwrap();

    if let Some(filename) = filename {
        // Port and filename are separate messages on the wire
        sleep(Duration::from_millis(100)).await;
        control.write_all(filename.as_bytes()).await.unwrap();
    }

    let (mut data, _) = timeout(Duration::from_secs(5), data_listener.accept())
        .await
        .expect("server never opened the data connection")
        .unwrap();
    let mut payload = Vec::new();
    data.read_to_end(&mut payload).await.unwrap();

    let mut rest = Vec::new();
    control.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());

    payload
}

fn listing_set(payload: &[u8]) -> HashSet<String> {
    String::from_utf8(payload.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn served_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"hello from the server\n").unwrap();
    std::fs::write(dir.path().join("notes.md"), b"# notes\n").unwrap();
    std::fs::create_dir(dir.path().join("archive")).unwrap();
    dir
}

#[tokio::test]
async fn test_list_directory_round_trip() {
    let dir = served_dir();
    let addr = start_server(dir.path()).await;

    let payload = fetch(addr, b"-l", None).await;

    assert!(payload.ends_with(b"\n"));
    let expected: HashSet<String> = [".", "..", "readme.txt", "notes.md", "archive"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(listing_set(&payload), expected);
}

#[tokio::test]
async fn test_get_file_round_trip() {
    let dir = served_dir();
    let addr = start_server(dir.path()).await;

    let payload = fetch(addr, b"-g", Some("readme.txt")).await;
    assert_eq!(payload, b"hello from the server\n");
}

#[tokio::test]
async fn test_get_large_binary_file() {
    let dir = served_dir();
    let content: Vec<u8> = (0..300_000u32).map(|i| (i % 256) as u8).collect();
    std::fs::write(dir.path().join("blob.bin"), &content).unwrap();
    let addr = start_server(dir.path()).await;

    let payload = fetch(addr, b"-g", Some("blob.bin")).await;
    assert_eq!(payload.len(), content.len());
    assert_eq!(payload, content);
}

#[tokio::test]
async fn test_get_missing_file_sends_nothing() {
    let dir = served_dir();
    let addr = start_server(dir.path()).await;

    let payload = fetch(addr, b"-g", Some("missing.txt")).await;
    assert!(payload.is_empty());

    // The listener keeps serving afterwards
    let listing = fetch(addr, b"-l", None).await;
    assert_eq!(listing_set(&listing).len(), 5);
}

#[tokio::test]
async fn test_invalid_command_is_rejected_without_data_connection() {
    let dir = served_dir();
    let addr = start_server(dir.path()).await;
    let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let data_port = data_listener.local_addr().unwrap().port();

    let mut control = send_command(addr, b"-x").await;
    let mut reply = Vec::new();
    control.read_to_end(&mut reply).await.unwrap();
    assert_eq!(reply, INVALID_REPLY);

    // The server has hung up; a late port must not produce a data connection
    let _ = control.write_all(data_port.to_string().as_bytes()).await;
    assert!(
        timeout(Duration::from_millis(300), data_listener.accept())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_sequential_sessions_are_independent() {
    let dir = served_dir();
    let addr = start_server(dir.path()).await;

    let before = fetch(addr, b"-l", None).await;
    assert!(fetch(addr, b"-g", Some("nope")).await.is_empty());

    let mut control = send_command(addr, b"-G").await;
    let mut reply = Vec::new();
    control.read_to_end(&mut reply).await.unwrap();
    assert_eq!(reply, INVALID_REPLY);

    let after = fetch(addr, b"-l", None).await;
    assert_eq!(listing_set(&before), listing_set(&after));
}

#[tokio::test]
async fn test_stalled_client_does_not_block_others() {
    let dir = served_dir();
    let addr = start_server(dir.path()).await;

    // Connects but never sends its hostname
    let _stalled = TcpStream::connect(addr).await.unwrap();

    let payload = timeout(Duration::from_secs(3), fetch(addr, b"-g", Some("notes.md")))
        .await
        .expect("second session was blocked");
    assert_eq!(payload, b"# notes\n");
}

#[tokio::test]
async fn test_unreachable_data_port_leaves_listener_running() {
    let dir = served_dir();
    let addr = start_server(dir.path()).await;

    let mut control = send_command(addr, b"-l").await;
    let mut echo = [0u8; 2];
    control.read_exact(&mut echo).await.unwrap();
    control.write_all(b"0").await.unwrap();
    let mut rest = Vec::new();
    let _ = control.read_to_end(&mut rest).await;
    assert!(rest.is_empty());

    let listing = fetch(addr, b"-l", None).await;
    assert_eq!(listing_set(&listing).len(), 5);
}
