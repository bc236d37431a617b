//! HTTP servers for the control endpoints and the MJPEG stream.
//!
//! Two `EspHttpServer` instances run side by side, as the single worker
//! thread of one instance would let a streaming client starve `/capture`
//! and `/flash`. The control server listens on the configured base port,
//! the stream server on the port above it.

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use camstream_core::{FlashState, FrameSource, Lamp, ServerConfig};
use camstream_protocol::STREAM_CONTENT_TYPE;
use camstream_server::{capture_jpeg, index_html, run_stream, CaptureError, Disconnected, FrameSink};
use esp_idf_svc::http::server::{Configuration as HttpServerConfig, EspHttpServer};
use esp_idf_svc::http::Method;
use esp_idf_svc::io::{EspIOError, Write};
use log::{info, warn};

/// Adapts an in-flight HTTP response to the handler-facing sink trait.
struct ResponseSink<W> {
    inner: W,
}

impl<W: Write> FrameSink for ResponseSink<W> {
    fn write_frame_bytes(&mut self, buf: &[u8]) -> Result<(), Disconnected> {
        self.inner.write_all(buf).map_err(|_| Disconnected)
    }
}

/// Start the control server: `/` (status page), `/capture` (single JPEG)
/// and `/flash` (LED toggle).
///
/// The returned server must be kept alive for the handlers to stay
/// registered.
pub fn start_control_server<S, L>(
    cfg: &ServerConfig,
    source: S,
    flash: Arc<FlashState>,
    lamp: Arc<Mutex<L>>,
) -> Result<EspHttpServer<'static>>
where
    S: FrameSource + Clone + Send + 'static,
    L: Lamp + Send + 'static,
    L::Error: std::fmt::Display,
{
    if !cfg.ports_distinct() {
        bail!(
            "stream port would collide with base port {} (port range exhausted)",
            cfg.base_port
        );
    }

    let mut server = EspHttpServer::new(&HttpServerConfig {
        http_port: cfg.base_port,
        ctrl_port: cfg.ctrl_port(),
        ..Default::default()
    })?;

    let stream_port = cfg.stream_port();
    server.fn_handler("/", Method::Get, move |request| {
        let page = index_html(stream_port);
        request.into_ok_response()?.write_all(page.as_bytes())?;
        Ok::<(), EspIOError>(())
    })?;

    server.fn_handler("/capture", Method::Get, move |request| {
        let mut source = source.clone();
        let mut request = Some(request);

        let result = capture_jpeg(&mut source, |len| {
            let request = request.take().ok_or(Disconnected)?;
            let content_length = len.to_string();
            let headers = [
                ("Content-Type", "image/jpeg"),
                ("Content-Length", content_length.as_str()),
                ("Content-Disposition", "inline; filename=capture.jpg"),
            ];
            let response = request
                .into_response(200, Some("OK"), &headers)
                .map_err(|_| Disconnected)?;
            Ok(ResponseSink { inner: response })
        });

        match result {
            Ok(len) => info!("Served capture, {len} bytes"),
            Err(CaptureError::Disconnected) => info!("Capture client disconnected"),
            Err(CaptureError::Frame(e)) => {
                warn!("Capture failed: {e}");
                if let Some(request) = request.take() {
                    request
                        .into_status_response(500)?
                        .write_all(b"Camera capture failed")?;
                }
            }
        }
        Ok::<(), EspIOError>(())
    })?;

    server.fn_handler("/flash", Method::Get, move |request| {
        let mut lamp = match lamp.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match camstream_server::toggle_flash(&flash, &mut *lamp) {
            Ok(text) => {
                info!("{text}");
                request.into_ok_response()?.write_all(text.as_bytes())?;
            }
            Err(e) => {
                warn!("Flash pin write failed: {e}");
                request
                    .into_status_response(500)?
                    .write_all(b"Flash LED unavailable")?;
            }
        }
        Ok::<(), EspIOError>(())
    })?;

    info!("Control server listening on port {}", cfg.base_port);
    Ok(server)
}

/// Start the MJPEG stream server on the port above the base port.
///
/// `/stream` pushes multipart JPEG frames until the client disconnects
/// or the camera faults.
pub fn start_stream_server<S>(cfg: &ServerConfig, source: S) -> Result<EspHttpServer<'static>>
where
    S: FrameSource + Clone + Send + 'static,
{
    // A second httpd instance cannot share the first one's UDP control
    // socket, so the stream listener's is offset along with its port.
    let stream_port = cfg.stream_port();
    let mut server = EspHttpServer::new(&HttpServerConfig {
        http_port: stream_port,
        ctrl_port: cfg.stream_ctrl_port(),
        ..Default::default()
    })?;

    server.fn_handler("/stream", Method::Get, move |request| {
        let mut source = source.clone();
        let response =
            request.into_response(200, Some("OK"), &[("Content-Type", STREAM_CONTENT_TYPE)])?;

        info!("Stream client connected");
        let mut sink = ResponseSink { inner: response };
        let end = run_stream(&mut source, &mut sink);
        info!("Stream ended after {} frames: {end:?}", end.frames_sent());

        Ok::<(), EspIOError>(())
    })?;

    info!("Stream server listening on port {stream_port}");
    Ok(server)
}
