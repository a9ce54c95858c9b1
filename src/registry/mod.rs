//! Async HTTP access to upstream license data.
//!
//! - [`spdx`] — license texts from the SPDX license-list-data repository.
//!
//! Clients are built from an explicit [`NetworkConfig`]; proxy settings and
//! credentials travel with the client instead of being installed process-wide.

pub mod spdx;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, NoProxy, Proxy};

use crate::config::NetworkConfig;

pub fn build_client(network: &NetworkConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(network.timeout_secs))
        .user_agent(concat!("attribution-report/", env!("CARGO_PKG_VERSION")));

    if let Some(url) = &network.proxy {
        let mut proxy = Proxy::all(url).with_context(|| format!("Invalid proxy URL {}", url))?;
        if let Some(user) = &network.proxy_user {
            proxy = proxy.basic_auth(user, network.proxy_password.as_deref().unwrap_or(""));
        }
        if let Some(hosts) = &network.no_proxy {
            proxy = proxy.no_proxy(NoProxy::from_string(hosts));
        }
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}
