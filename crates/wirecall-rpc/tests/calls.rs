use std::io::Write;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use wirecall_codec::wire_struct;
use wirecall_frame::{encode_frame, FrameConfig, FrameReader, HEADER_SIZE};
use wirecall_rpc::{
    connect_tcp, Client, ClientConfig, Registry, Response, RpcError, Server, Status,
};
use wirecall_transport::{MemoryChannel, TcpTransport};

wire_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Rect {
        pub width: u32,
        pub height: u32,
        pub label: String,
    }
}

#[derive(Default)]
struct Tally {
    total: AtomicI64,
}

impl Tally {
    fn incr(&self, by: i64) -> i64 {
        self.total.fetch_add(by, Ordering::SeqCst) + by
    }
}

fn registry(tally: Arc<Tally>) -> Registry {
    let mut registry = Registry::new();
    registry
        .register("add", |a: i32, b: i32| a + b)
        .expect("add should register");
    registry
        .register("area", |r: Rect| u64::from(r.width) * u64::from(r.height))
        .expect("area should register");
    registry
        .register("grow", |r: Rect, by: u32| Rect {
            width: r.width + by,
            height: r.height + by,
            label: format!("{}+{by}", r.label),
        })
        .expect("grow should register");
    registry
        .register("ping", || ())
        .expect("ping should register");
    registry
        .register_method("tally.incr", tally, Tally::incr)
        .expect("tally.incr should register");
    registry
}

fn spawn_tcp_server() -> String {
    let listener = TcpTransport::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().to_string();
    let server = Server::new(registry(Arc::new(Tally::default())));
    thread::spawn(move || server.serve_tcp(&listener));
    addr
}

#[test]
fn add_over_tcp_returns_five() {
    let addr = spawn_tcp_server();
    let mut client = connect_tcp(&addr, ClientConfig::default()).expect("client should connect");

    let response: Response<i32> = client.call("add", &(3i32, 2i32)).expect("call should succeed");
    assert_eq!(response.code(), 0);
    assert_eq!(response.message(), "success");
    assert_eq!(response.into_value(), Some(5));
}

#[test]
fn unregistered_function_is_reported_by_name() {
    let addr = spawn_tcp_server();
    let mut client = connect_tcp(&addr, ClientConfig::default()).expect("client should connect");

    let response: Response<String> = client
        .call("Strcat", &("Hello, ", "world"))
        .expect("call should complete");
    assert_eq!(response.status(), Some(Status::FunctionNotRegistered));
    assert_eq!(response.code(), 1);
    assert!(response.message().contains("Strcat"));

    // The session is still usable afterwards.
    let sum: i32 = client
        .call("add", &(1i32, 1i32))
        .expect("call should succeed")
        .into_result()
        .expect("add should succeed");
    assert_eq!(sum, 2);
}

#[test]
fn aggregates_travel_both_ways() {
    let addr = spawn_tcp_server();
    let mut client = connect_tcp(&addr, ClientConfig::default()).expect("client should connect");
    let rect = Rect {
        width: 3,
        height: 4,
        label: "r".to_string(),
    };

    let area: u64 = client
        .call("area", &(rect.clone(),))
        .and_then(Response::into_result)
        .expect("area should succeed");
    assert_eq!(area, 12);

    let grown: Rect = client
        .call("grow", &(rect, 2u32))
        .and_then(Response::into_result)
        .expect("grow should succeed");
    assert_eq!(
        grown,
        Rect {
            width: 5,
            height: 6,
            label: "r+2".to_string()
        }
    );

    client
        .call::<(), _>("ping", &())
        .and_then(Response::into_result)
        .expect("ping should succeed");
}

#[test]
fn sessions_share_one_registry() {
    let listener = TcpTransport::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().to_string();
    let tally = Arc::new(Tally::default());
    let server = Server::new(registry(Arc::clone(&tally)));
    thread::spawn(move || server.serve_tcp(&listener));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let addr = addr.clone();
            thread::spawn(move || {
                let mut client =
                    connect_tcp(&addr, ClientConfig::default()).expect("client should connect");
                for _ in 0..25 {
                    client
                        .call::<i64, _>("tally.incr", &(1i64,))
                        .and_then(Response::into_result)
                        .expect("incr should succeed");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker should finish");
    }

    assert_eq!(tally.total.load(Ordering::SeqCst), 100);
}

#[test]
fn silent_peer_times_out_in_bounded_time() {
    let listener = TcpTransport::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().to_string();
    // Accept and hold the connection without ever answering.
    let holder = thread::spawn(move || {
        let stream = listener.accept().expect("accept should succeed");
        thread::sleep(Duration::from_millis(500));
        drop(stream);
    });

    let config = ClientConfig::default().with_recv_timeout(Duration::from_millis(100));
    let mut client = connect_tcp(&addr, config).expect("client should connect");

    let start = Instant::now();
    let response: Response<i32> = client.call("add", &(3i32, 2i32)).expect("call should complete");
    assert_eq!(response.status(), Some(Status::RecvTimeout));
    assert_eq!(response.code(), 2);
    assert!(start.elapsed() < Duration::from_secs(5));

    let err = client
        .call::<i32, _>("add", &(3i32, 2i32))
        .expect_err("session should be poisoned");
    assert!(matches!(err, RpcError::Desynchronized));

    holder.join().expect("holder should finish");
}

/// Accept one connection, read the call, then write `reply_bytes` of the
/// framed reply one byte every `gap` and go silent.
fn spawn_stalling_peer(reply_bytes: usize, gap: Duration) -> (String, thread::JoinHandle<()>) {
    let listener = TcpTransport::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().to_string();
    let handle = thread::spawn(move || {
        let mut stream = listener.accept().expect("accept should succeed");
        let mut reader = FrameReader::new(stream.try_clone().expect("stream should clone"));
        reader.read_frame().expect("call frame should arrive");

        let mut wire = BytesMut::new();
        let reply = Response::success(5i32)
            .to_bytes()
            .expect("reply should encode");
        encode_frame(&reply, &mut wire).expect("reply should frame");
        for byte in wire.iter().take(reply_bytes) {
            if stream.write_all(&[*byte]).is_err() {
                return;
            }
            thread::sleep(gap);
        }
        thread::sleep(Duration::from_millis(500));
    });
    (addr, handle)
}

#[test]
fn partial_reply_then_silence_times_out() {
    let (addr, peer) = spawn_stalling_peer(HEADER_SIZE + 2, Duration::ZERO);
    let config = ClientConfig::default().with_recv_timeout(Duration::from_millis(100));
    let mut client = connect_tcp(&addr, config).expect("client should connect");

    let start = Instant::now();
    let response: Response<i32> = client.call("add", &(3i32, 2i32)).expect("call should complete");
    assert_eq!(response.status(), Some(Status::RecvTimeout));
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(client.is_desynchronized());

    peer.join().expect("peer should finish");
}

#[test]
fn trickled_reply_cannot_outlast_the_timeout() {
    let (addr, peer) = spawn_stalling_peer(usize::MAX, Duration::from_millis(40));
    let config = ClientConfig::default().with_recv_timeout(Duration::from_millis(100));
    let mut client = connect_tcp(&addr, config).expect("client should connect");

    let start = Instant::now();
    let response: Response<i32> = client.call("add", &(3i32, 2i32)).expect("call should complete");
    assert_eq!(response.status(), Some(Status::RecvTimeout));
    assert!(start.elapsed() < Duration::from_millis(400));

    drop(client);
    peer.join().expect("peer should finish");
}

#[test]
fn zero_timeout_never_hands_a_stale_reply_to_the_next_call() {
    let addr = spawn_tcp_server();
    let mut client = connect_tcp(&addr, ClientConfig::default()).expect("client should connect");

    let response: Response<i32> = client
        .call_with("add", &(3i32, 2i32), Some(Duration::ZERO))
        .expect("call should complete");
    assert_eq!(response.status(), Some(Status::RecvTimeout));

    let err = client
        .call::<i32, _>("add", &(10i32, 10i32))
        .expect_err("session should be poisoned");
    assert!(matches!(err, RpcError::Desynchronized));
}

#[test]
fn failed_receive_poisons_the_session() {
    let addr = spawn_tcp_server();
    let config = ClientConfig {
        frame: FrameConfig {
            // Room for the 6-byte call frame but not for its 14-byte reply.
            max_payload_size: 9,
            ..FrameConfig::default()
        },
        ..ClientConfig::default()
    };
    let mut client = connect_tcp(&addr, config).expect("client should connect");

    let err = client
        .call::<i32, _>("ping", &())
        .expect_err("reply exceeds the limit");
    assert!(matches!(err, RpcError::Frame(_)), "unexpected error: {err:?}");
    assert!(client.is_desynchronized());

    let err = client
        .call::<i32, _>("ping", &())
        .expect_err("session should be poisoned");
    assert!(matches!(err, RpcError::Desynchronized));
}

#[test]
fn closed_server_is_a_disconnect_not_a_timeout() {
    let listener = TcpTransport::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().to_string();
    let closer = thread::spawn(move || {
        let stream = listener.accept().expect("accept should succeed");
        drop(stream);
    });

    let config = ClientConfig::default().with_recv_timeout(Duration::from_secs(5));
    let mut client = connect_tcp(&addr, config).expect("client should connect");
    closer.join().expect("closer should finish");

    let err = client
        .call::<i32, _>("add", &(3i32, 2i32))
        .expect_err("call should fail");
    assert!(
        matches!(err, RpcError::Disconnected(_)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn malformed_call_drops_only_that_session() {
    let addr = spawn_tcp_server();

    let mut bad = connect_tcp(&addr, ClientConfig::default()).expect("client should connect");
    let err = bad
        .call::<i32, _>("add", &(3i32,))
        .expect_err("server should hang up");
    assert!(matches!(err, RpcError::Disconnected(_)), "unexpected error: {err:?}");

    let mut good = connect_tcp(&addr, ClientConfig::default()).expect("client should connect");
    let sum: i32 = good
        .call("add", &(20i32, 22i32))
        .and_then(Response::into_result)
        .expect("add should succeed");
    assert_eq!(sum, 42);
}

#[test]
fn memory_channel_session() {
    let (client_end, mut server_end) = MemoryChannel::pair();
    let server = Server::new(registry(Arc::new(Tally::default())));
    let handle = thread::spawn(move || server.serve(&mut server_end));

    let mut client = Client::new(client_end);
    for (a, b) in [(3i32, 2i32), (-7, 7), (i32::MAX, 0)] {
        let sum: i32 = client
            .call("add", &(a, b))
            .and_then(Response::into_result)
            .expect("add should succeed");
        assert_eq!(sum, a + b);
    }
    drop(client);

    handle
        .join()
        .expect("server thread should finish")
        .expect("serve should end cleanly");
}

#[test]
fn oversized_reply_limit_applies_to_client() {
    let addr = spawn_tcp_server();
    let config = ClientConfig {
        frame: FrameConfig {
            max_payload_size: 8,
            ..FrameConfig::default()
        },
        ..ClientConfig::default()
    };
    let mut client = connect_tcp(&addr, config).expect("client should connect");
    let err = client
        .call::<i32, _>("add", &(1i32, 2i32))
        .expect_err("call frame exceeds the limit");
    assert!(matches!(err, RpcError::Frame(_)), "unexpected error: {err:?}");
}

#[cfg(unix)]
#[test]
fn add_over_unix_socket() {
    use wirecall_rpc::connect_unix;
    use wirecall_transport::UnixDomainSocket;

    let dir = std::env::temp_dir().join(format!(
        "wirecall-rpc-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join("rpc.sock");

    let listener = UnixDomainSocket::bind(&path).expect("socket should bind");
    let server = Server::new(registry(Arc::new(Tally::default())));
    thread::spawn(move || server.serve_unix(&listener));

    let mut client = connect_unix(&path, ClientConfig::default()).expect("client should connect");
    let sum: i32 = client
        .call("add", &(3i32, 2i32))
        .and_then(Response::into_result)
        .expect("add should succeed");
    assert_eq!(sum, 5);

    let _ = std::fs::remove_dir_all(&dir);
}
