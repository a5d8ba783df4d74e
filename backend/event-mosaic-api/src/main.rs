use actix_middleware::{CorrelationIdMiddleware, MetricsMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use utoipa_swagger_ui::SwaggerUi;

use event_mosaic_api::discovery::{DiscoveryHandle, EurekaClient, InstanceInfo, RetryPolicy};
use event_mosaic_api::repository::{BackendProbe, ElasticsearchStore};
use event_mosaic_api::services::EventService;
use event_mosaic_api::{handlers, openapi, telemetry, AppState, Config};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration loading failed: {}", e);
            return Err(e.into());
        }
    };
    info!(env = %config.app.env, "starting Event Mosaic API");

    let store = Arc::new(
        ElasticsearchStore::new(&config.elasticsearch)
            .context("failed to create Elasticsearch client")?,
    );
    info!(
        url = %config.elasticsearch.url,
        event_index = %config.elasticsearch.event_index,
        mention_index = %config.elasticsearch.mention_index,
        "Elasticsearch client ready"
    );

    let state = web::Data::new(AppState {
        event_service: Arc::new(EventService::new(
            store.clone(),
            store.clone(),
            config.api.clone(),
        )),
        probe: store.clone() as Arc<dyn BackendProbe>,
    });

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(MetricsMiddleware)
            .wrap(CorrelationIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url(openapi::OPENAPI_PATH, openapi::doc()),
            )
            .configure(handlers::configure)
    });
    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    let server = server
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind on {bind_addr}"))?
        .run();
    info!("HTTP server listening on {}", bind_addr);

    // register only once the port is ours
    let discovery = if config.eureka.enabled {
        let instance = InstanceInfo::from_config(&config.eureka, config.app.port);
        let client = EurekaClient::new(&config.eureka.server_url, instance)
            .context("failed to create Eureka client")?;
        info!(server = %config.eureka.server_url, "Eureka registration enabled");
        Some(DiscoveryHandle::spawn(
            Arc::new(client),
            Duration::from_secs(config.eureka.renewal_interval_secs),
            RetryPolicy::default(),
        ))
    } else {
        None
    };

    let result = server.await.context("HTTP server error");

    if let Some(discovery) = discovery {
        discovery.shutdown().await;
    }
    info!("Event Mosaic API stopped");

    result
}
