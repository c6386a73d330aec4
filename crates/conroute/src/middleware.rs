// File: src/middleware.rs
// Purpose: Built-in middleware

use std::time::Instant;

use crate::context::Context;
use crate::handler::{handler_fn, HandlerFunc};

/// Request logger
///
/// Runs the rest of the chain, then logs method, path, status and latency
/// at `info`.
pub fn logger() -> HandlerFunc {
    handler_fn(|c: &mut Context| {
        let start = Instant::now();
        c.next();

        tracing::info!(
            method = %c.method(),
            path = c.path(),
            status = c.response_status().as_u16(),
            latency_us = start.elapsed().as_micros() as u64,
            aborted = c.is_aborted(),
            "request"
        );
    })
}
