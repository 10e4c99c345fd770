mod command_line_arguments;

use crate::command_line_arguments::AuthpxArguments;
use anyhow::Result;
use authpx::config::Config;
use authpx::proxy;
use clap::Parser;
use log::{LevelFilter, info, trace};

#[tokio::main]
async fn main() -> Result<()> {
    let args = AuthpxArguments::parse();
    pretty_env_logger::env_logger::builder()
        .format_timestamp(None)
        .filter_level(if args.verbose { LevelFilter::Trace } else { LevelFilter::Info })
        .init();

    info!("Starting authpx");
    trace!("Arguments: {:#?}", args);

    let mut config = Config::try_load(&args.config_path).await?;
    args.apply(&mut config);
    config.validate()?;

    let upstream = config.bind_upstream()?;
    info!("Forwarding to {} (secret: {})", upstream.proxy().target(), upstream.secret().path().display());

    proxy::start_rp_server(config.listen_addr()?, upstream.proxy().clone(), config.deadline()).await
}
