//! routekit demo server.
//!
//! Serves a small routing table that exercises every body representation:
//! echoed text, decoded forms, passthrough streams, a large chunked body
//! and gzip compression.

use std::path::PathBuf;

use bytes::Bytes;
use clap::Parser;
use futures_util::stream;

use routekit::config::{load_config, ServerConfig};
use routekit::filter::{GzipFilter, LoggingFilter};
use routekit::observability::init_logging;
use routekit::{get, AxumHost, BodyStream, HandlerError, Request, Response, Routing};

const BIG_BODY_CHUNK: usize = 16 * 1024;
const BIG_BODY_CHUNKS: usize = 64;

#[derive(Parser)]
#[command(name = "routekit-demo")]
#[command(about = "Demo server for the routekit routing layer", long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn demo_routes(config: &ServerConfig) -> Routing {
    let routing = get("/", |req: Request| async move {
        let mut res = Response::of(200, "Hello from routekit");
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
        Ok(Response::of(200, serde_json::to_string(form)?)
            .with_header("content-type", "application/json"))
    })
    .post("/body-stream", |req: Request| async move {
        Ok(Response::of(200, req.into_body_stream()))
    })
    .get("/big-body", |_req: Request| async {
        let chunks = stream::iter(
            (0..BIG_BODY_CHUNKS).map(|i| Ok(Bytes::from(vec![b'a' + (i % 26) as u8; BIG_BODY_CHUNK]))),
        );
        Ok(Response::of(200, BodyStream::new(chunks)))
    })
    .get("/gzip", |_req: Request| async {
        Ok(Response::of(200, "gzip me ".repeat(64)))
    })
    .put("/put", |_req: Request| async { Ok(Response::of(200, "Done a PUT request init?")) })
    .patch("/patch", |_req: Request| async { Ok(Response::of(200, "Done a PATCH request init?")) })
    .delete("/delete", |_req: Request| async { Ok(Response::of(200, "Done a DELETE request init?")) })
    .head("/head", |_req: Request| async { Ok(Response::of(200, "Done a HEAD request init?")) })
    .options("/options", |_req: Request| async { Ok(Response::of(200, "Done a OPTIONS request init?")) })
    .trace("/trace", |_req: Request| async { Ok(Response::of(200, "Done a TRACE request init?")) })
    .catch_all(|_req: Request| async { Ok(Response::of(404, "Nothing here")) })
    .with_filter(LoggingFilter);

    match (config.compression.enabled, config.compression.always) {
        (false, _) => routing,
        (true, false) => routing.with_filter(GzipFilter::new()),
        (true, true) => routing.with_filter(GzipFilter::always()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.logging)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = ?config.listener.request_timeout_secs,
        compression = config.compression.enabled,
        "Configuration loaded"
    );

    let mut server = demo_routes(&config).as_server(AxumHost::from_config(&config.listener));
    server.start().await?;

    if let Some(handle) = server.handle() {
        tracing::info!(address = %handle.local_addr(), "Listening for connections");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
