use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::sync::Arc;

use timber::core::config;
use timber::logs::CloudLogService;
use timber::logs::auth::GcloudAuthenticator;
use timber::tui;

#[derive(Parser)]
#[command(name = "timber", about = "Terminal dashboard for App Engine request logs")]
struct Args {
    /// Google Cloud project id
    #[arg(short, long)]
    project: Option<String>,

    /// Minimum severity (ALL, DEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(short, long)]
    level: Option<String>,

    /// Resource-path substring filter
    #[arg(short, long)]
    resource: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - the terminal belongs to the dashboard
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("timber.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("timber: {e}");
            std::process::exit(1);
        }
    };
    let resolved = match config::resolve(
        &file_config,
        args.project.as_deref(),
        args.level.as_deref(),
        args.resource.as_deref(),
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("timber: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "timber starting up (project: {}, filter: {:?})",
        resolved.project,
        resolved.filter
    );

    let auth = Arc::new(GcloudAuthenticator::new(resolved.account.clone()));
    let service = Arc::new(CloudLogService::new(
        resolved.project.clone(),
        resolved.base_url.clone(),
        auth,
    ));

    tui::run(service, resolved)
}
