#![allow(dead_code)]

pub mod fixtures {
    use itemrouter::config::ServiceConfig;
    use itemrouter::store::{ItemStore, StoreError, StoreResult};
    use itemrouter::{Item, ItemId};

    /// Configuration seeded with items "1" and "2"
    pub fn seeded_config() -> ServiceConfig {
        ServiceConfig {
            seed: vec![Item::new("1", "Item One"), Item::new("2", "Item Two")],
            ..ServiceConfig::default()
        }
    }

    /// Store whose every operation fails
    pub struct FailingStore;

    fn fault<T>() -> StoreResult<T> {
        Err(StoreError::DuplicateId {
            id: ItemId::from("broken"),
        })
    }

    impl ItemStore for FailingStore {
        fn all(&self) -> StoreResult<Vec<Item>> {
            fault()
        }
        fn get(&self, _id: &str) -> StoreResult<Option<Item>> {
            fault()
        }
        fn insert(&self, _item: Item) -> StoreResult<Item> {
            fault()
        }
        fn rename(&self, _id: &str, _name: String) -> StoreResult<Option<Item>> {
            fault()
        }
        fn remove(&self, _id: &str) -> StoreResult<Option<Item>> {
            fault()
        }
        fn len(&self) -> StoreResult<usize> {
            fault()
        }
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(100)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Build a request with an optional JSON body.
    pub fn request(method: &str, path: &str, body: Option<&str>) -> String {
        match body {
            Some(body) => format!(
                "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            ),
            None => format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        }
    }

    /// Status, content type, and raw body of a response.
    pub fn parse_response_parts(resp: &str) -> (u16, String, String) {
        let mut parts = resp.splitn(2, "\r\n\r\n");
        let headers = parts.next().unwrap_or("");
        let body = parts.next().unwrap_or("").to_string();
        let mut status = 0;
        let mut content_type = String::new();
        for line in headers.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            } else if let Some((name, val)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-type") {
                    content_type = val.trim().to_string();
                }
            }
        }
        (status, content_type, body)
    }

    pub fn parse_response(resp: &str) -> (u16, serde_json::Value) {
        let (status, _, body) = parse_response_parts(resp);
        (status, serde_json::from_str(&body).unwrap_or_default())
    }
}

pub mod test_server {
    use itemrouter::config::ServiceConfig;
    use itemrouter::server::{HttpServer, ServerHandle};
    use itemrouter::App;
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// A running server on an ephemeral port, stopped on drop
    pub struct TestServer {
        handle: Option<ServerHandle>,
        pub addr: SocketAddr,
    }

    impl TestServer {
        pub fn start(config: &ServiceConfig) -> Self {
            setup_may_runtime();
            let app = App::build(config).unwrap();
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            let handle = HttpServer(app.http_service()).start(addr).unwrap();
            handle.wait_ready().unwrap();
            Self {
                handle: Some(handle),
                addr,
            }
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }
}
