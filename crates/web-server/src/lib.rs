use api_client::CompanyInfoClient;
use axum::{routing::get, Router};
use cache::CachingProvider;
use configuration::Config;
use engine::CompensationEngine;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
// Note: Tracing is handled by the main application configuration

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub engine: CompensationEngine,
    /// The exchange served by the compensation endpoint.
    pub exchange: String,
}

/// Defines the application routes on top of the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/v1/companies/executives/compensation",
            get(handlers::get_executives_compensation),
        )
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Note: Tracing is already initialized in main.rs, so we don't need to initialize it again here.
    let addr = config.server.socket_addr()?;

    let client = CompanyInfoClient::new(&config.provider)?;
    let cache = CachingProvider::from_settings(client, &config.cache);
    let engine = CompensationEngine::new(Arc::new(cache), &config.engine);
    let state = Arc::new(AppState {
        engine,
        exchange: config.engine.exchange.clone(),
    });
    let app = router(state);

    tracing::info!(
        exchange = %config.engine.exchange,
        max_concurrent_requests = config.engine.max_concurrent_requests,
        cache_ttl_secs = config.cache.ttl_secs,
        cache_max_capacity = config.cache.max_capacity,
        "Web server listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use api_client::error::ApiError;
    use api_client::{CompanyInfoProvider, StatusCode};
    use async_trait::async_trait;
    use axum::response::IntoResponse;
    use configuration::EngineSettings;
    use core_types::{
        BenchmarkLookup, ExecutiveCompensationResult, ExecutiveRecord, IndustryBenchmark, Listing,
        ListingKind,
    };
    use engine::EngineError;
    use tokio_util::sync::CancellationToken;

    /// Serves one company with two executives; an unknown exchange has no listings.
    struct StaticProvider {
        fail_executives: bool,
    }

    #[async_trait]
    impl CompanyInfoProvider for StaticProvider {
        async fn get_listings(
            &self,
            exchange_symbol: &str,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Listing>, ApiError> {
            if exchange_symbol != "ASX" {
                return Ok(vec![]);
            }
            Ok(vec![Listing {
                symbol: "BRDL".to_string(),
                exchange: "ASX".to_string(),
                kind: ListingKind::Equity,
            }])
        }

        async fn get_executives(
            &self,
            company_symbol: &str,
            _cancel: &CancellationToken,
        ) -> Result<Vec<ExecutiveRecord>, ApiError> {
            if self.fail_executives {
                return Err(ApiError::Status {
                    status: StatusCode::FORBIDDEN,
                    resource: format!("company {}", company_symbol),
                });
            }
            Ok(vec![
                ExecutiveRecord {
                    company_symbol: company_symbol.to_string(),
                    industry_title: "BOARD SERVICES".to_string(),
                    name_and_position: "Steve Pell CEO".to_string(),
                    total_compensation: 110001.0,
                },
                ExecutiveRecord {
                    company_symbol: company_symbol.to_string(),
                    industry_title: "BOARD SERVICES".to_string(),
                    name_and_position: "Allen Stephens CTO".to_string(),
                    total_compensation: 105000.0,
                },
            ])
        }

        async fn get_benchmark(
            &self,
            industry_title: &str,
            _cancel: &CancellationToken,
        ) -> Result<BenchmarkLookup, ApiError> {
            Ok(BenchmarkLookup::Found(IndustryBenchmark {
                industry_title: industry_title.to_string(),
                average_compensation: 100000.0,
            }))
        }
    }

    async fn spawn_app(exchange: &str, fail_executives: bool) -> String {
        let engine = CompensationEngine::new(
            Arc::new(StaticProvider { fail_executives }),
            &EngineSettings::default(),
        );
        let state = Arc::new(AppState {
            engine,
            exchange: exchange.to_string(),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    const ENDPOINT: &str = "/api/v1/companies/executives/compensation";

    #[tokio::test]
    async fn health_check_responds() {
        let base = spawn_app("ASX", false).await;
        let body = reqwest::get(format!("{}/api/health", base)).await.unwrap().text().await.unwrap();
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn compensation_endpoint_returns_matches() {
        let base = spawn_app("ASX", false).await;

        let response = reqwest::get(format!("{}{}", base, ENDPOINT)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let raw: serde_json::Value = response.json().await.unwrap();
        assert_eq!(raw[0]["nameAndPosition"], "Steve Pell CEO");

        let results: Vec<ExecutiveCompensationResult> = serde_json::from_value(raw).unwrap();
        assert_eq!(
            results,
            vec![ExecutiveCompensationResult {
                name_and_position: "Steve Pell CEO".to_string(),
                compensation: 110001.0,
                average_industry_compensation: 100000.0,
            }]
        );
    }

    #[tokio::test]
    async fn empty_exchange_is_a_server_error() {
        let base = spawn_app("NYSE", false).await;

        let response = reqwest::get(format!("{}{}", base, ENDPOINT)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Found 0 stocks on the NYSE");
    }

    #[tokio::test]
    async fn provider_failure_is_a_bad_gateway() {
        let base = spawn_app("ASX", true).await;

        let response = reqwest::get(format!("{}{}", base, ENDPOINT)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn cancelled_maps_to_client_closed_without_body() {
        let response = AppError::from(EngineError::Cancelled).into_response();
        assert_eq!(response.status().as_u16(), 499);
    }

    #[test]
    fn contract_violation_is_a_bad_gateway() {
        let response =
            AppError::from(EngineError::ContractViolation("Unexpected stock type: etf".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
