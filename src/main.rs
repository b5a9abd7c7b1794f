use backend_inkroot::config::Config;
use backend_inkroot::handlers::auth::configure_cors;
use backend_inkroot::routes::create_routes;
use backend_inkroot::AppState;
use sqlx::postgres::PgPoolOptions;

use std::{env, sync::Arc};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let env_filter = env::var("RUST_LOG")
        .unwrap_or_else(|_| "backend_inkroot=debug,tower_http=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!().run(&pool).await {
        println!("🔥 Failed to run database migrations: {:?}", err);
        std::process::exit(1);
    }

    let app_state = AppState::new(config, pool);

    let app = create_routes(Arc::new(app_state)).layer(configure_cors());

    let listener = tokio::net::TcpListener::bind(format!(
        "[::]:{}",
        env::var("PORT").unwrap_or_else(|_| "8080".to_string())
    ))
    .await
    .unwrap();
    axum::serve(listener, app).await.unwrap();
}
