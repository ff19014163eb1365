use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "portal")]
#[command(about = "Incident reporting portal: create and list incidents with optional images")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,
    /// JSON file holding every incident
    #[arg(long, env = "INCIDENTS_FILE", default_value = "incidents.json")]
    pub data_file: PathBuf,
    /// Directory for uploaded images
    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,
    /// Built client to serve instead of the embedded page (optional)
    #[arg(long, env = "CLIENT_BUILD_DIR")]
    pub client_build: Option<PathBuf>,
    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
