use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// A one-shot HTTP backend serving canned JSON.
///
/// Accepts `connections` requests, answers each with the body of the first
/// route whose path prefix matches (404 otherwise), and returns the request
/// lines it saw.
pub struct CannedBackend {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl CannedBackend {
    pub fn serve(routes: Vec<(&'static str, String)>, connections: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind canned backend");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for _ in 0..connections {
                let Ok((mut socket, _)) = listener.accept() else {
                    break;
                };
                let mut reader = BufReader::new(socket.try_clone().expect("clone socket"));
                let mut request_line = String::new();
                reader.read_line(&mut request_line).expect("read request line");
                loop {
                    let mut header = String::new();
                    let read = reader.read_line(&mut header).expect("read header");
                    if read == 0 || header == "\r\n" {
                        break;
                    }
                }

                let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                let response = match routes.iter().find(|(prefix, _)| path.starts_with(prefix)) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                socket.write_all(response.as_bytes()).expect("write response");
                seen.push(request_line.trim_end().to_string());
            }
            seen
        });

        Self { base_url, handle }
    }

    /// Wait for every expected request and return their request lines.
    pub fn requests(self) -> Vec<String> {
        self.handle.join().expect("canned backend thread")
    }
}
