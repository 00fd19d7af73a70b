use dotenvy::dotenv;

use slate::logging::init_tracing;
use slate::router::init_router;
use slate::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000")
        .await
        .expect("Failed to bind 0.0.0.0:8000");
    println!("🚀 Server running on http://localhost:8000");
    println!("📚 Swagger UI available at http://localhost:8000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:8000/scalar");
    axum::serve(listener, app).await.expect("Server error");
}
