//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures_util::stream;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use routekit::filter::GzipFilter;
use routekit::{get, AxumHost, BodyStream, HandlerError, Request, Response, Routing, Server};

pub const BIG_CHUNK: usize = 16 * 1024;
pub const BIG_CHUNKS: usize = 32;

/// The routing table every integration test serves.
pub fn test_routes() -> Routing {
    get("/", |req: Request| async move {
        let mut res = Response::ok();
        if let Some(value) = req.query("tomQuery") {
            res = res.with_header("tomquery", value);
        }
        if let Some(tom) = req.header("tom") {
            res = res.with_header("tom", tom);
        }
        Ok(res)
    })
    .get("/url", |req: Request| async move { Ok(Response::of(200, req.uri().to_string())) })
    .post("/post-body", |req: Request| async move {
        Ok(Response::of(200, req.into_text().await?))
    })
    .post("/post-form-body", |req: Request| async move {
        let form = req
            .body_form()
            .ok_or_else(|| HandlerError::failed("expected a form body"))?;
        Ok(Response::of(200, serde_json::to_string(form)?))
    })
    .post("/body-stream", |req: Request| async move {
        Ok(Response::of(200, req.into_body_stream()))
    })
    .get("/big-body", |_req: Request| async {
        Ok(Response::of(200, BodyStream::new(stream::iter(big_body_chunks()))))
    })
    .get("/gzip", |_req: Request| async { Ok(Response::of(200, "gzip me ".repeat(64))) })
    .get("/get", |_req: Request| async { Ok(Response::of(200, "Done a GET request init?")) })
    .post("/post", |_req: Request| async { Ok(Response::of(200, "Done a POST request init?")) })
    .put("/put", |_req: Request| async { Ok(Response::of(200, "Done a PUT request init?")) })
    .patch("/patch", |_req: Request| async { Ok(Response::of(200, "Done a PATCH request init?")) })
    .delete("/delete", |_req: Request| async { Ok(Response::of(200, "Done a DELETE request init?")) })
    .head("/head", |_req: Request| async { Ok(Response::of(200, "Done a HEAD request init?")) })
    .options("/options", |_req: Request| async { Ok(Response::of(200, "Done a OPTIONS request init?")) })
    .trace("/trace", |_req: Request| async { Ok(Response::of(200, "Done a TRACE request init?")) })
    .with_filter(GzipFilter::new())
}

fn big_body_chunks() -> Vec<Result<Bytes, routekit::BodyError>> {
    (0..BIG_CHUNKS)
        .map(|i| Ok(Bytes::from(vec![b'a' + (i % 26) as u8; BIG_CHUNK])))
        .collect()
}

/// Expected bytes of `/big-body`.
pub fn big_body() -> Vec<u8> {
    (0..BIG_CHUNKS)
        .flat_map(|i| vec![b'a' + (i % 26) as u8; BIG_CHUNK])
        .collect()
}

/// Start the test routes on an ephemeral port.
pub async fn start_server() -> (Server<AxumHost>, String) {
    let mut server = test_routes().as_server(AxumHost::new("127.0.0.1:0"));
    server.start().await.unwrap();
    let addr = local_addr(&server);
    (server, format!("http://{}", addr))
}

pub fn local_addr(server: &Server<AxumHost>) -> SocketAddr {
    server.handle().expect("server is running").local_addr()
}

/// Non-pooled client so each test sees fresh connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Send a hand-written HTTP/1.1 request and return the raw response text.
pub async fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn gunzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}
