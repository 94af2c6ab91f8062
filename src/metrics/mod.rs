// metrics/mod.rs
use ::metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

pub fn setup_metrics(port: u16) -> Result<(), BuildError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()
}

fn outcome(ok: bool) -> &'static str {
    if ok { "ok" } else { "error" }
}

pub fn record_refresh(ok: bool) {
    counter!("hue_gateway_refresh_total", "result" => outcome(ok)).increment(1);
}

pub fn record_rebuild(ok: bool, controllers: usize) {
    counter!("hue_gateway_rebuild_total", "result" => outcome(ok)).increment(1);
    #[allow(clippy::cast_precision_loss)]
    gauge!("hue_gateway_controllers").set(controllers as f64);
}

pub fn record_light_write(ok: bool) {
    counter!("hue_gateway_light_writes_total", "result" => outcome(ok)).increment(1);
}
