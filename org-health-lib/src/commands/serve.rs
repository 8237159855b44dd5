use super::Host;
use super::common::{CommonArgs, LogLevel, Setup, init_logging};
use crate::Result;
use crate::facts::NoProgress;
use crate::server::{AppState, serve};
use clap::Parser;
use core::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "     serve";

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, value_name = "ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Run the HTTP service until interrupted.
pub async fn serve_api<H: Host>(host: &mut H, args: &ServeArgs) -> Result<()> {
    init_logging(args.common.log_level.unwrap_or(LogLevel::Info));

    let setup = Setup::new(&args.common)?;
    let purged = setup.cache.clear_expired().await?;
    log::info!(target: LOG_TARGET, "Purged {purged} expired cache entries");

    let analyzer = setup.analyzer(true, Arc::new(NoProgress))?;

    let shutdown = CancellationToken::new();
    let _ctrl_c = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        })
    };

    let addr = SocketAddr::new(args.bind, args.port);
    let _ = writeln!(host.output(), "Serving org-health on http://{addr} (press Ctrl-C to stop)");

    serve(addr, AppState::new(analyzer), shutdown).await
}
