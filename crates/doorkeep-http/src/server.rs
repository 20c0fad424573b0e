//! HTTP server and request routing.

use crate::responses::{EnrollmentResponse, StatusResponse};
use doorkeep_access::{Enroller, EnrollmentOutcome};
use doorkeep_core::{Error, Result};
use doorkeep_hardware::{Actuator, GpioBank, ProximityPort};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Shared handles injected into every request handler.
///
/// The enroller handle is present only on enroller-mode processes; the
/// remote-open route is served regardless of mode.
pub struct AppState<P: ProximityPort, G: GpioBank> {
    pub actuator: Arc<Actuator<G>>,
    pub enroller: Option<Arc<Enroller<P, G>>>,
}

// Derived Clone would demand P: Clone and G: Clone; the handles are Arcs.
impl<P: ProximityPort, G: GpioBank> Clone for AppState<P, G> {
    fn clone(&self) -> Self {
        AppState {
            actuator: Arc::clone(&self.actuator),
            enroller: self.enroller.as_ref().map(Arc::clone),
        }
    }
}

/// Bind the HTTP surface and return the bound address plus the serve future.
///
/// Splitting bind from serve lets callers learn the ephemeral port before
/// driving the server (tests bind port 0). The future resolves once the
/// cancellation token fires and in-flight requests have drained.
///
/// # Errors
/// Returns `Error::Config` if the address cannot be bound.
pub fn bind<P, G>(
    addr: SocketAddr,
    state: AppState<P, G>,
    shutdown: CancellationToken,
) -> Result<(SocketAddr, impl Future<Output = Result<()>>)>
where
    P: ProximityPort + 'static,
    G: GpioBank + 'static,
{
    let make_svc = make_service_fn(move |_conn| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let state = state.clone();
                async move { Ok::<_, Infallible>(route(state, req).await) }
            }))
        }
    });

    let server = Server::try_bind(&addr)
        .map_err(|e| Error::Config(format!("failed to bind {addr}: {e}")))?
        .serve(make_svc);
    let local_addr = server.local_addr();
    info!(addr = %local_addr, "http surface listening");

    let graceful = server.with_graceful_shutdown(async move {
        shutdown.cancelled().await;
        info!("http surface shutting down");
    });

    Ok((local_addr, async move {
        graceful
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))
    }))
}

/// Bind and serve until cancelled.
///
/// # Errors
/// Returns `Error::Config` if the address cannot be bound, or an I/O error
/// if the server fails while running.
pub async fn serve<P, G>(
    addr: SocketAddr,
    state: AppState<P, G>,
    shutdown: CancellationToken,
) -> Result<()>
where
    P: ProximityPort + 'static,
    G: GpioBank + 'static,
{
    let (_, server) = bind(addr, state, shutdown)?;
    server.await
}

async fn route<P: ProximityPort, G: GpioBank>(
    state: AppState<P, G>,
    req: Request<Body>,
) -> Response<Body> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (method, path.as_str()) {
        (Method::POST, "/api/open-door") => open_door(&state).await,
        (Method::POST, "/api") => enroll(&state).await,
        _ => json_response(
            StatusCode::NOT_FOUND,
            &StatusResponse::error("not found"),
        ),
    }
}

/// Remote door open: actuate, indicate, report.
///
/// Bypasses verification: the caller is a trusted internal peer.
/// Contention with the access loop resolves on the actuator lock; a request
/// arriving mid-cycle is held until the running sequence completes.
async fn open_door<P: ProximityPort, G: GpioBank>(state: &AppState<P, G>) -> Response<Body> {
    info!("remote door-open requested");
    let result = async {
        state.actuator.open_and_close().await?;
        state.actuator.indicate_success().await
    }
    .await;

    match result {
        Ok(()) => json_response(StatusCode::OK, &StatusResponse::success("doorOpened")),
        Err(e) => {
            error!(error = %e, "remote door-open failed");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &StatusResponse::error(e.to_string()),
            )
        }
    }
}

/// One enrollment exchange; 404 on processes not running in enroller mode.
async fn enroll<P: ProximityPort, G: GpioBank>(state: &AppState<P, G>) -> Response<Body> {
    let Some(enroller) = &state.enroller else {
        return json_response(
            StatusCode::NOT_FOUND,
            &StatusResponse::error("not an enroller"),
        );
    };

    match enroller.enroll_once().await {
        EnrollmentOutcome::Enrolled(card) => {
            json_response(StatusCode::OK, &EnrollmentResponse::enrolled(card.to_hex()))
        }
        EnrollmentOutcome::ReadTimeout => json_response(
            StatusCode::REQUEST_TIMEOUT,
            &StatusResponse::error("card read timed out"),
        ),
        EnrollmentOutcome::Rejected(e) => {
            warn!(error = %e, "enrollment failed");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &StatusResponse::error(e.to_string()),
            )
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    // Serialization of these response structs cannot fail.
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .unwrap_or_default()
}
