//! HTTP surface of the site: routes, middleware stack and the listener.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{ConnectInfo, Extension, MatchedPath},
    http::{HeaderMap, HeaderName, HeaderValue, Request, Uri},
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, request_id::PropagateRequestIdLayer, services::ServeDir,
    set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod alert;
pub(crate) mod cookies;
pub mod csrf;
pub mod error;
pub mod handlers;
pub mod hits;
pub mod page;
pub mod password;
pub mod rsvp;
pub mod session;
pub mod signing;
pub mod state;
pub mod templates;

use self::{csrf::CsrfToken, page::Page, state::SiteState};

/// Build the router with every page, form endpoint and the static files.
pub fn router(state: Arc<SiteState>) -> Router {
    let static_files = ServeDir::new(state.config().static_dir());

    let mut app = Router::new();
    for page in Page::ALL {
        let route = match page {
            Page::Login => page_route(page).post(handlers::login),
            Page::Rsvp => page_route(page).post(handlers::rsvp),
            _ => page_route(page),
        };
        app = app.route(page.path(), route);
    }

    app.route("/logout", post(handlers::logout))
        .route("/hits", get(handlers::hits))
        .route("/health", get(handlers::health).options(handlers::health))
        .nest_service("/static", static_files)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CatchPanicLayer::custom(error::handle_panic))
                .layer(Extension(state))
                .layer(middleware::from_fn(csrf::protect)),
        )
}

fn page_route(page: Page) -> MethodRouter {
    get(
        move |Extension(state): Extension<Arc<SiteState>>,
              remote: Option<ConnectInfo<SocketAddr>>,
              csrf: Option<Extension<CsrfToken>>,
              uri: Uri,
              headers: HeaderMap| async move {
            handlers::show(
                page,
                state,
                remote.map(|ConnectInfo(addr)| addr),
                csrf.map(|Extension(token)| token),
                uri,
                headers,
            )
            .await
        },
    )
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(port: u16, state: Arc<SiteState>) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
