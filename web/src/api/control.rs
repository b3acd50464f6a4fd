use actix_web::{get, web, HttpResponse, Responder};

use common::model::StatsSnapshot;
use loader::{MonitorHandle, TriggerKind};
use serde::Serialize;

use crate::api::result::R;

#[derive(Serialize)]
pub struct StatusBody {
    pub run_id: String,
    pub stats: StatsSnapshot,
}

/// http://127.0.0.1:8765/status
#[get("/status")]
pub(crate) async fn status(monitor: web::Data<MonitorHandle>) -> impl Responder {
    let body = StatusBody {
        run_id: monitor.run_id().to_string(),
        stats: monitor.snapshot(),
    };
    HttpResponse::Ok().json(R::success_with("ok", body))
}

/// Force an immediate cycle.
#[get("/trigger")]
pub(crate) async fn trigger(monitor: web::Data<MonitorHandle>) -> impl Responder {
    monitor.trigger(TriggerKind::RealTime);
    HttpResponse::Ok().json(R::success("realtime cycle triggered"))
}

/// http://127.0.0.1:8765/trigger/realtime
#[get("/trigger/realtime")]
pub(crate) async fn trigger_realtime(monitor: web::Data<MonitorHandle>) -> impl Responder {
    monitor.trigger(TriggerKind::RealTime);
    HttpResponse::Ok().json(R::success("realtime cycle triggered"))
}

/// http://127.0.0.1:8765/trigger/historical
#[get("/trigger/historical")]
pub(crate) async fn trigger_historical(monitor: web::Data<MonitorHandle>) -> impl Responder {
    monitor.trigger(TriggerKind::Historical);
    HttpResponse::Ok().json(R::success("historical catch-up triggered"))
}
