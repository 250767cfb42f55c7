#[macro_use] extern crate log;

pub mod config;
pub mod context;
pub mod encoding;
pub mod error;
pub mod files;
pub mod handlers;
pub mod logger;
pub mod reader;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod utils;

use std::net::TcpListener;
use std::sync::Arc;

use clap::Parser;

use crate::config::Config;
use crate::files::{DirStore, FileStore};
use crate::logger::get_reporter;
use crate::router::App;
use crate::utils::ResultV;


const MODULE: &str = "MAIN";

/// Small HTTP/1.1 server answering one request per connection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory served and written by the /files/ routes
    #[arg(long)]
    directory: Option<String>,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<String>,

    /// Port to listen on, overrides the configuration
    #[arg(long)]
    port: Option<u16>,
}

fn load_config(args: &Args) -> Result<Config, &'static str> {
    let mut cfg = Config::load(args.config.as_deref()).map_err(|e| {
        eprintln!("Could not load configuration: {}", e);
        "config error"
    })?;
    if let Some(dir) = &args.directory {
        cfg.files.directory = Some(dir.clone());
    }
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    Ok(cfg)
}

fn open_store(directory: Option<&str>) -> Result<Option<Arc<dyn FileStore>>, &'static str> {
    let Some(dir) = directory else {
        info!("[{}] No serving directory, /files/ routes answer 404", MODULE);
        return Ok(None);
    };
    let store = DirStore::new(dir);
    store.prepare().map_err(get_reporter(MODULE, "Files", "serving directory error"))?;
    info!("[{}] Use `{}` store at {}", MODULE, store.kind(), store.dir_path().display());
    Ok(Some(Arc::new(store)))
}

fn main() -> ResultV {
    let args = Args::parse();
    let cfg = load_config(&args)?;
    logger::init_logger(&cfg.log)?;

    let app = Arc::new(App::new(open_store(cfg.files.directory.as_deref())?));

    let addr = cfg.server.address();
    let listener = TcpListener::bind(&addr).map_err(|e| {
        error!("[{}] Could not start server at {}: {}", MODULE, addr, e);
        "init server error"
    })?;

    info!("[{}] Starting h11serve at {} with {} workers", MODULE, addr, cfg.server.workers);
    if let Some(path) = &args.config {
        info!("[{}] Config loaded from {}", MODULE, path);
    }

    let pool = threadpool::ThreadPool::new(cfg.server.workers);
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let app_ = app.clone();
                pool.execute(move || {
                    server::handle_connection(stream, &app_);
                });
            }
            Err(e) => error!("[{}] Failed to accept connection: {}", MODULE, e),
        }
    }
    Ok(())
}
