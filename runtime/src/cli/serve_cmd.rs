//! `site-audit serve`: run the HTTP intake API.

use crate::rest::{self, RestState};
use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

pub async fn run(bind: IpAddr, port: u16) -> Result<()> {
    let addr = SocketAddr::new(bind, port);
    info!("starting site-audit v{}", env!("CARGO_PKG_VERSION"));
    rest::start(addr, RestState::from_env())
        .await
        .with_context(|| format!("REST API on {addr} stopped"))
}
