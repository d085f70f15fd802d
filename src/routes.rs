use crate::{
    api::{bus, report, scan, schedule},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::Context;
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-client rate limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    scan: Limiter,
    report: Limiter,
}

impl Limiters {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            scan: Arc::new(build_limiter(config.rate_scan_per_min)?),
            report: Arc::new(build_limiter(config.rate_report_per_min)?),
        })
    }
}

fn build_limiter(requests_per_min: u32) -> anyhow::Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("invalid rate limiter settings")?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &Limiters) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/scan")
                    .wrap(limiters.scan.clone())
                    // /scan/sessions
                    .service(web::resource("/sessions").route(web::post().to(scan::open_session)))
                    // /scan/sessions/{id}
                    .service(
                        web::resource("/sessions/{id}")
                            .route(web::delete().to(scan::close_session)),
                    )
                    // /scan/sessions/{id}/scans
                    .service(
                        web::resource("/sessions/{id}/scans")
                            .route(web::post().to(scan::submit_scan)),
                    )
                    // /scan/sessions/{id}/recent
                    .service(
                        web::resource("/sessions/{id}/recent")
                            .route(web::get().to(scan::recent_scans)),
                    ),
            )
            .service(
                web::scope("/schedule")
                    .wrap(limiters.report.clone())
                    .service(web::resource("/today").route(web::get().to(schedule::today))),
            )
            .service(
                web::scope("/bus")
                    .wrap(limiters.report.clone())
                    .service(web::resource("/routes").route(web::get().to(bus::list_routes))),
            )
            .service(
                web::scope("/reports")
                    .wrap(limiters.report.clone())
                    .service(web::resource("/daily").route(web::get().to(report::daily))),
            ),
    );
}
