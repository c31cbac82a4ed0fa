use crate::config::models::ConfigModel;
use schemars::JsonSchema;
use serde::Deserialize;
use std::{collections::HashMap, net::IpAddr};

/// Config options for the local preview server.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Serve {
    /// A single address to serve on, folded into `addresses` when the
    /// configuration is loaded.
    #[serde(default)]
    pub address: Option<IpAddr>,
    /// The addresses to bind [default: <local loopback>]
    #[serde(default)]
    pub addresses: Vec<IpAddr>,
    /// The port to listen on [default: 8080]
    #[serde(default = "default::port")]
    pub port: u16,
    /// Open a browser tab once the site has been built [default: false]
    #[serde(default)]
    pub open: bool,
    /// Additional headers to send with every response
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for Serve {
    fn default() -> Self {
        Self {
            address: None,
            addresses: vec![],
            port: default::port(),
            open: false,
            headers: Default::default(),
        }
    }
}

mod default {
    pub const fn port() -> u16 {
        8080
    }
}

impl ConfigModel for Serve {
    fn migrate(&mut self) -> anyhow::Result<()> {
        // Fold the single-address convenience field into the list.
        if let Some(address) = self.address.take() {
            self.addresses.push(address);
        }

        Ok(())
    }
}
