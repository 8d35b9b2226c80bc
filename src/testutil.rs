// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! A one-shot HTTP endpoint for exercising the probe.

use std::io;

use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    net::TcpListener,
    task::JoinHandle,
};
use url::Url;

#[derive(Debug)]
pub(crate) struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    headers: Vec<(String, String)>,
}

impl Request {
    fn parse(raw: &str) -> Self {
        let mut lines = raw.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split(' ');
        let method = request_line.next().unwrap_or_default().to_owned();
        let path = request_line.next().unwrap_or_default().to_owned();
        let headers = lines
            .take_while(|line| !line.is_empty())
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_owned()))
            .collect();
        Self {
            method,
            path,
            headers,
        }
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Accepts exactly one connection and answers it with a fixed status and body.
pub(crate) struct Endpoint {
    url: Url,
    handle: JoinHandle<io::Result<Request>>,
}

impl Endpoint {
    pub(crate) async fn serve(status: u16, body: &'static [u8]) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let url = Url::parse(&format!("http://{}/tmp/random.txt", addr))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;

            let mut raw = Vec::new();
            let mut buf = [0_u8; 1024];
            while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }

            let head = format!(
                "HTTP/1.1 {} Probe\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            stream.write_all(head.as_bytes()).await?;
            stream.write_all(body).await?;
            stream.shutdown().await?;

            Ok(Request::parse(&String::from_utf8_lossy(&raw)))
        });

        Ok(Self { url, handle })
    }

    pub(crate) fn url(&self) -> Url {
        self.url.clone()
    }

    /// Waits for the single request the endpoint served.
    pub(crate) async fn request(self) -> io::Result<Request> {
        self.handle.await?
    }
}
