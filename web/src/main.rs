mod api;
mod config;

use actix_web::{middleware, web, App, HttpServer};

use crate::api::control::{status, trigger, trigger_historical, trigger_realtime};
use crate::config::constant::CFG;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = CFG.get("ADDRESS").unwrap();
    let port = CFG.get("PORT").unwrap();

    let monitor = match start_monitor() {
        Ok(monitor) => monitor,
        Err(message) => {
            log::error!("{}", message);
            return Ok(());
        }
    };
    let data = web::Data::new(monitor);

    log::info!("starting control surface at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(status)
            .service(trigger)
            .service(trigger_realtime)
            .service(trigger_historical)
            // enable logger
            .wrap(middleware::Logger::default())
    })
    .workers(2)
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}

/// Demo monitor over the scripted link and an in-memory database.
#[cfg(feature = "mock_api")]
fn start_monitor() -> Result<loader::MonitorHandle, String> {
    use common::config::LoaderConfig;
    use common::feed::Feed;
    use loader::MonitorRequest;
    use session::cancel::CancelToken;
    use session::vendor::stub::StubLink;
    use writer::driver::SqliteDriver;

    let config = LoaderConfig::default();
    let mut driver = SqliteDriver::connect(":memory:").map_err(|e| e.to_string())?;
    writer::ddl::create_all(&mut driver).map_err(|e| e.to_string())?;

    let request = MonitorRequest {
        feed: Feed::Central,
        realtime_specs: vec!["0B12".to_string(), "0B30".to_string()],
        historical_specs: vec!["RACE".to_string()],
        interval: None,
    };
    let (handle, _events) = loader::monitor(
        &config,
        || Ok(StubLink::new()),
        driver,
        request,
        CancelToken::new(),
    );
    Ok(handle)
}

#[cfg(not(feature = "mock_api"))]
fn start_monitor() -> Result<loader::MonitorHandle, String> {
    Err(String::from(
        "this build carries no vendor link; run on a host with the vendor \
         component installed, or build with --features mock_api for the \
         scripted demo link",
    ))
}
