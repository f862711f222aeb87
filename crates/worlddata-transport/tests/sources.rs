use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use worlddata_transport::{ByteStream, Endpoint};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "worlddata-transport-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn file_endpoint_reads_capture_bytes() {
    let dir = unique_temp_dir("file");
    let path = dir.join("capture.bin");
    std::fs::write(&path, [0x23, 0x01, 0x02]).expect("capture should be writable");

    let endpoint: Endpoint = path.to_str().unwrap().parse().unwrap();
    let mut stream = endpoint.open().expect("file should open");
    assert_eq!(stream.kind(), "file");
    stream
        .set_read_timeout(Some(Duration::from_millis(10)))
        .expect("timeout on file is a no-op");

    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, vec![0x23, 0x01, 0x02]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn single_byte_reads_span_file_buffer_refills() {
    let dir = unique_temp_dir("bytewise");
    let path = dir.join("capture.bin");
    let capture: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, &capture).expect("capture should be writable");

    let file = std::fs::File::open(&path).expect("file should open");
    let mut stream = ByteStream::from_file(file);

    let mut out = Vec::with_capacity(capture.len());
    let mut byte = [0u8; 1];
    while stream.read(&mut byte).unwrap() == 1 {
        out.push(byte[0]);
    }
    assert_eq!(out, capture);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn tcp_endpoint_reads_bridge_bytes() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = std::thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        conn.write_all(b"#abc").unwrap();
    });

    let endpoint: Endpoint = format!("tcp://{addr}").parse().unwrap();
    let mut stream = endpoint.open().expect("tcp should connect");
    assert_eq!(stream.kind(), "tcp");
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    server.join().unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"#abc");
}

#[test]
fn tcp_read_timeout_surfaces_as_io_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let stream = std::net::TcpStream::connect(addr).unwrap();
    let _held = listener.accept().unwrap();

    let mut stream = ByteStream::from_tcp(stream);
    stream
        .set_read_timeout(Some(Duration::from_millis(20)))
        .unwrap();

    let mut byte = [0u8; 1];
    let err = stream.read(&mut byte).unwrap_err();
    assert!(matches!(
        err.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    ));
}

#[test]
#[cfg(unix)]
fn unix_endpoint_reads_socket_bytes() {
    let dir = unique_temp_dir("unix");
    let sock_path = dir.join("feed.sock");
    let listener = std::os::unix::net::UnixListener::bind(&sock_path).unwrap();

    let server = std::thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        conn.write_all(&[0x23, 0xFF]).unwrap();
    });

    let endpoint: Endpoint = format!("unix://{}", sock_path.display()).parse().unwrap();
    let mut stream = endpoint.open().expect("unix socket should connect");
    assert_eq!(stream.kind(), "unix");

    server.join().unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, vec![0x23, 0xFF]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn connect_refused_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint: Endpoint = format!("tcp://{addr}").parse().unwrap();
    let err = endpoint.open().unwrap_err();
    assert!(matches!(
        err,
        worlddata_transport::TransportError::Connect { .. }
    ));
}
