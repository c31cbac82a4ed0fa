use crate::config::rt::RtcBuild;
use crate::config::Configuration;
use local_ip_address::list_afinet_netifas;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::log;

/// Runtime config for the serve system.
#[derive(Clone, Debug)]
pub struct RtcServe {
    /// Runtime config for the build system.
    pub build: Arc<RtcBuild>,
    /// The IP addresses to serve on.
    pub addresses: Vec<IpAddr>,
    /// The port to serve on.
    pub port: u16,
    /// Open a browser tab once the initial build is complete.
    pub open: bool,
    /// Additional headers to include in responses.
    pub headers: HashMap<String, String>,
}

impl RtcServe {
    pub(crate) fn new(config: Configuration, working_directory: PathBuf) -> anyhow::Result<Self> {
        let serve = config.serve.clone();
        let build = Arc::new(RtcBuild::new(config, working_directory)?);

        Ok(Self {
            build,
            addresses: build_address_list(serve.addresses),
            port: serve.port,
            open: serve.open,
            headers: serve.headers,
        })
    }
}

fn build_address_list(addresses: Vec<IpAddr>) -> Vec<IpAddr> {
    if !addresses.is_empty() {
        addresses
    } else {
        match list_afinet_netifas() {
            Ok(ifas) => {
                let loopback = ifas
                    .into_iter()
                    .filter_map(
                        |(_name, addr)| {
                            if addr.is_loopback() {
                                Some(addr)
                            } else {
                                None
                            }
                        },
                    )
                    .collect::<Vec<_>>();
                if loopback.is_empty() {
                    vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]
                } else {
                    loopback
                }
            }
            Err(err) => {
                log::warn!("Unable to list network interfaces: {err}");
                vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]
            }
        }
    }
}
