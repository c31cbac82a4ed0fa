use crate::build::BuildSystem;
use crate::common::{LOCAL, NETWORK, SERVER};
use crate::config::rt::RtcServe;
use anyhow::{Context, Result};
use axum::Router;
use axum::http::header::HeaderName;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get_service;
use axum_server::Handle;
use futures_util::FutureExt;
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// A system encapsulating a build system, responsible for serving the generated site.
pub struct ServeSystem {
    cfg: Arc<RtcServe>,
    /// The URL to open when starting
    open_http_addr: String,
    shutdown_tx: broadcast::Sender<()>,
}

impl ServeSystem {
    /// Construct a new instance.
    pub async fn new(cfg: Arc<RtcServe>, shutdown: broadcast::Sender<()>) -> Result<Self> {
        let address = cfg.addresses.first().map_or_else(
            || SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), cfg.port),
            |ipaddr| SocketAddr::new(*ipaddr, cfg.port),
        );
        let open_http_addr = format!("http://{address}/");
        Ok(Self {
            cfg,
            open_http_addr,
            shutdown_tx: shutdown,
        })
    }

    /// Run the serve system.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn run(self) -> Result<()> {
        // Build once up front, the server then serves the fresh output.
        let mut build = BuildSystem::new(self.cfg.build.clone()).await?;
        build.build().await?;

        let server_handle =
            Self::spawn_server(self.cfg.clone(), self.shutdown_tx.subscribe()).await?;

        // Open the browser.
        if self.cfg.open {
            if let Err(err) = open::that(self.open_http_addr) {
                tracing::error!(error = ?err, "error opening browser");
            }
        }
        // Only the signal handler holds a sender now, its shutdown event ends the server.
        drop(self.shutdown_tx);

        server_handle.await.context("error joining server handle")?
    }

    #[tracing::instrument(level = "trace", skip(cfg, shutdown_rx))]
    async fn spawn_server(
        cfg: Arc<RtcServe>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<JoinHandle<Result<()>>> {
        let router = router(&cfg)?;

        let addr = cfg
            .addresses
            .iter()
            .map(|addr| (*addr, cfg.port).into())
            .collect::<Vec<SocketAddr>>();

        show_listening(&addr);

        let server = run_server(addr, router, shutdown_rx);

        Ok(tokio::spawn(async move {
            match server.await {
                Err(err) => {
                    tracing::error!(error = ?err, "error from server task");
                    Err(err)
                }
                r => r,
            }
        }))
    }
}

/// Expand unspecified bind addresses into the concrete interface addresses of their family.
fn expand_addresses(bind: &[SocketAddr], interfaces: &[IpAddr]) -> BTreeSet<SocketAddr> {
    let mut addresses = BTreeSet::new();
    for addr in bind {
        if addr.ip().is_unspecified() {
            addresses.extend(
                interfaces
                    .iter()
                    .filter(|ip| ip.is_ipv4() == addr.is_ipv4())
                    .map(|ip| SocketAddr::new(*ip, addr.port())),
            );
        } else {
            addresses.insert(*addr);
        }
    }
    addresses
}

/// Show where `serve` is listening.
fn show_listening(bind: &[SocketAddr]) {
    let interfaces = local_ip_address::list_afinet_netifas()
        .map(|addrs| {
            addrs
                .into_iter()
                .map(|(_name, addr)| addr)
                .collect::<Vec<_>>()
        })
        .unwrap_or(vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);

    tracing::info!("{SERVER}server listening at:");
    for address in expand_addresses(bind, &interfaces) {
        let tag = if address.ip().is_loopback() {
            LOCAL
        } else {
            NETWORK
        };
        tracing::info!("    {tag}http://{address}/");
    }
}

async fn run_server(
    addr: Vec<SocketAddr>,
    router: Router,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let shutdown_handle = Handle::new();

    // Any event on the shutdown channel, even a drop, stops the server.
    tokio::spawn({
        let handle = shutdown_handle.clone();
        async move {
            let _res = shutdown_rx.recv().await;
            tracing::debug!("server is shutting down");
            handle.graceful_shutdown(Some(Duration::from_secs(0)));
        }
    });

    let mut tasks = vec![];

    for addr in addr {
        let router = router.clone();
        let shutdown_handle = shutdown_handle.clone();
        tasks.push(
            async move {
                axum_server::bind(addr)
                    .handle(shutdown_handle)
                    .serve(router.into_make_service())
                    .await
            }
            .boxed(),
        );
    }

    let (result, _, _) = futures_util::future::select_all(tasks).await;
    Ok(result?)
}

/// Build the router serving the generated site.
fn router(cfg: &RtcServe) -> Result<Router> {
    let mut serve_dir = get_service(ServeDir::new(&cfg.build.final_dist));
    for (key, value) in &cfg.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .with_context(|| format!("invalid header {:?}", key))?;
        let value: HeaderValue = value
            .parse()
            .with_context(|| format!("invalid header value {:?} for header {}", value, name))?;
        serve_dir = serve_dir.layer(SetResponseHeaderLayer::overriding(name, value))
    }

    let router = Router::new()
        .fallback_service(get_service(serve_dir).handle_error(|error| async move {
            tracing::error!(?error, "failed serving static file");
            StatusCode::INTERNAL_SERVER_ERROR
        }))
        .layer(TraceLayer::new_for_http());

    tracing::info!(
        "{}serving static assets from {:?}",
        SERVER,
        cfg.build.final_dist
    );

    Ok(router)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::rt::RtcBuild;
    use anyhow::ensure;

    #[test]
    fn unspecified_address_expands_to_interfaces() {
        let interfaces: Vec<IpAddr> = vec![
            "127.0.0.1".parse().expect("must parse"),
            "192.168.0.10".parse().expect("must parse"),
            "::1".parse().expect("must parse"),
        ];

        let bind: Vec<SocketAddr> = vec!["0.0.0.0:8080".parse().expect("must parse")];
        let expanded = expand_addresses(&bind, &interfaces);
        assert_eq!(
            expanded.into_iter().collect::<Vec<_>>(),
            vec![
                "127.0.0.1:8080".parse::<SocketAddr>().expect("must parse"),
                "192.168.0.10:8080".parse::<SocketAddr>().expect("must parse"),
            ],
            "only the matching address family is listed"
        );
    }

    #[test]
    fn concrete_address_stays_as_is() {
        let interfaces: Vec<IpAddr> = vec!["192.168.0.10".parse().expect("must parse")];
        let bind: Vec<SocketAddr> = vec!["127.0.0.1:9000".parse().expect("must parse")];

        let expanded = expand_addresses(&bind, &interfaces);

        assert_eq!(expanded.into_iter().collect::<Vec<_>>(), bind);
    }

    #[tokio::test]
    async fn err_router_with_invalid_header() -> Result<()> {
        // Assemble.
        let tmpdir = tempfile::tempdir()?;
        let build = Arc::new(RtcBuild::new_test(tmpdir.path()).await?);
        let cfg = RtcServe {
            build,
            addresses: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
            port: 8080,
            open: false,
            headers: [("bad header".to_string(), "value".to_string())].into(),
        };

        // Action.
        let res = router(&cfg);

        // Assert.
        ensure!(res.is_err(), "an invalid header name must be rejected");
        Ok(())
    }

    #[tokio::test]
    async fn ok_router_with_headers() -> Result<()> {
        // Assemble.
        let tmpdir = tempfile::tempdir()?;
        let build = Arc::new(RtcBuild::new_test(tmpdir.path()).await?);
        let cfg = RtcServe {
            build,
            addresses: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
            port: 8080,
            open: false,
            headers: [("x-served-by".to_string(), "lectern".to_string())].into(),
        };

        // Action.
        let res = router(&cfg);

        // Assert.
        ensure!(res.is_ok(), "valid headers must be accepted");
        Ok(())
    }
}
