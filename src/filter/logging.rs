//! Request logging filter.

use std::time::Instant;

use crate::filter::Filter;
use crate::handler::Handler;
use crate::http::Request;

/// Logs method, path, status and latency of every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFilter;

impl Filter for LoggingFilter {
    fn wrap(&self, next: Handler) -> Handler {
        Handler::new(move |request: Request| {
            let next = next.clone();
            async move {
                let started = Instant::now();
                let method = request.method().clone();
                let path = request.uri().path().to_string();

                let result = next.call(request).await;
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                match &result {
                    Ok(response) => tracing::info!(
                        method = %method,
                        path = %path,
                        status = response.status(),
                        elapsed_ms,
                        "Request served"
                    ),
                    Err(e) => tracing::warn!(
                        method = %method,
                        path = %path,
                        error = %e,
                        elapsed_ms,
                        "Request failed"
                    ),
                }
                result
            }
        })
    }
}
