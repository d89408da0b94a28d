use bookstack_api::app::services::AppConfig;

#[tokio::main]
async fn main() {
    bookstack_observability::init();

    let config = AppConfig::from_env();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = bookstack_api::app::build_app(config)
        .await
        .expect("failed to initialize application");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
