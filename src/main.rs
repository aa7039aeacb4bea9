use farm_stand::{
    app::products::repository::{
        seed_products, MemoryProductRepository, PgProductRepository, ProductRepository,
    },
    build_router,
    infrastructure::{config::Config, database::DatabaseManager, logger::Logger},
    AppState,
};
use std::{env, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // 初始化日志
    Logger::init(&config.log_filter);

    info!("Starting farm stand server...");

    // 只有一个可选参数：--memory 使用进程内存储
    let use_memory = env::args().skip(1).any(|arg| arg == "--memory");

    let products: Arc<dyn ProductRepository> = if use_memory {
        info!("Using in-memory product store");
        let repo = MemoryProductRepository::new();
        seed_products(&repo).await?;
        Arc::new(repo)
    } else {
        let database = DatabaseManager::connect(&config.database)
            .await
            .map_err(|e| {
                error!("Failed to connect to the product store: {}", e);
                e
            })?;
        info!("Connected to the product store");
        Arc::new(PgProductRepository::new(database.get_pool().clone()))
    };

    let app = build_router(AppState::new(products), config.request_timeout);

    let listener = TcpListener::bind(config.bind_address).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Farm stand running on http://{}", addr);
    info!("📖 Routes:");
    info!("   GET    /products           - List products");
    info!("   GET    /products/new       - New product form");
    info!("   POST   /products           - Create product");
    info!("   GET    /products/:id       - Show product");
    info!("   GET    /products/:id/edit  - Edit product form");
    info!("   PUT    /products/:id       - Update product (POST ?_method=PUT)");
    info!("   DELETE /products/:id       - Delete product (POST ?_method=DELETE)");

    axum::serve(listener, app).await?;

    Ok(())
}
