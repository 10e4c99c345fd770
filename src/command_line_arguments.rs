use authpx::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "authpx", about, author, version, long_about = None)]
pub struct AuthpxArguments {
    #[arg(short = 'c', long = "config", default_value = "./authpx.json", help = "Path to the configuration file")]
    pub(crate) config_path: PathBuf,
    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging")]
    pub(crate) verbose: bool,
    #[arg(short = 'l', long = "listen", help = "Address to listen on, overrides the configuration file")]
    pub(crate) listen: Option<String>,
    #[arg(short = 'u', long = "upstream", help = "Upstream base URL, overrides the configuration file")]
    pub(crate) upstream: Option<String>,
    #[arg(short = 's', long = "secret", help = "Path to the base64 secret file, overrides the configuration file")]
    pub(crate) secret_path: Option<PathBuf>,
}

impl AuthpxArguments {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(upstream) = &self.upstream {
            config.upstream = upstream.clone();
        }
        if let Some(secret_path) = &self.secret_path {
            config.secret_path = secret_path.clone();
        }
    }
}
