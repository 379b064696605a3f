use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use blightscan::config::{self, Settings};
use blightscan::loader::ModelState;
use blightscan::server::routes;
use std::path::PathBuf;
use std::{env, io, process};

use tracing::{error, info, warn};

const USAGE: &str = "usage: ./blightscan [port] [model file]";

fn get_args() -> (Option<u16>, Option<PathBuf>) {
    let args: Vec<String> = env::args().collect();
    match args.len() - 1 {
        0 => (None, None),
        1 => (Some(args[1].parse().expect("invalid port")), None),
        2 => (
            Some(args[1].parse().expect("invalid port")),
            Some(PathBuf::from(&args[2])),
        ),
        _ => {
            println!("{USAGE}");
            process::exit(1);
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", config::RUST_LOG);
    }
    tracing_subscriber::fmt::init();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("falling back to default settings: {e}");
        Settings::default()
    });

    let (port, model) = get_args();
    let port = port.unwrap_or(settings.port);
    let model_path = model.unwrap_or_else(|| settings.model_path());
    let host = settings.host;

    let state = web::Data::new(ModelState::new(model_path));

    // Load before binding the listener: a missing or corrupt artifact must
    // keep the service from ever serving traffic
    if let Err(e) = state.ensure() {
        error!("{e}");
        process::exit(1);
    }

    info!("listening on {host}:{port}");

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .service(routes::predict)
            .service(routes::home)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
