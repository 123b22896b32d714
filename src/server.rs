//! Application wiring: routes, middleware and the HTTP server loop

use crate::config::{AppConfig, CorsConfig, ServerConfig};
use crate::error::{json_error_handler, ApiError};
use crate::routes;
use crate::scoring::SpendClassifier;
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer, ResponseError};
use anyhow::{Context, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{error, info};

/// CORS middleware for the configured policy
pub fn build_cors(config: &CorsConfig) -> Cors {
    if config.permissive {
        return Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
    }

    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Build the application with all routes and middleware
pub fn build_app(
    classifier: web::Data<SpendClassifier>,
    server: &ServerConfig,
    cors: &CorsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(server.json_limit_bytes)
        .error_handler(json_error_handler);

    App::new()
        // Innermost: a panicking handler becomes a 500 that still passes
        // through logging and CORS
        .wrap_fn(|req, srv| {
            let http_req = req.request().clone();
            let call = srv.call(req);
            async move {
                match AssertUnwindSafe(call).catch_unwind().await {
                    Ok(res) => res.map(ServiceResponse::map_into_boxed_body),
                    Err(payload) => {
                        let err = ApiError::Internal(panic_message(payload.as_ref()));
                        error!(path = %http_req.path(), error = %err, "Handler panicked");
                        Ok(ServiceResponse::new(http_req, err.error_response()))
                    }
                }
            }
        })
        .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
        .wrap(build_cors(cors))
        .app_data(classifier)
        .app_data(json_config)
        .service(
            web::resource("/predict")
                .route(web::post().to(routes::predict))
                .default_service(web::route().to(routes::method_not_allowed)),
        )
        .route("/health", web::get().to(routes::health))
        .default_service(web::route().to(routes::not_found))
}

fn worker_count(config: &ServerConfig) -> usize {
    if config.workers > 0 {
        return config.workers;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Bind and serve until shutdown
pub async fn run(config: AppConfig) -> Result<()> {
    let classifier = web::Data::new(SpendClassifier::from_config(&config.scoring));
    let bind_address = config.server.bind_address();
    let workers = worker_count(&config.server);

    info!(
        address = %bind_address,
        workers,
        permissive_cors = config.cors.permissive,
        "Starting HTTP server"
    );
    info!("   POST /predict  - Spend category prediction");
    info!("   GET  /health   - Service information");

    let server_config = config.server.clone();
    let cors_config = config.cors.clone();

    HttpServer::new(move || build_app(classifier.clone(), &server_config, &cors_config))
        .workers(workers)
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server terminated with an error")?;

    info!("HTTP server stopped");
    Ok(())
}
