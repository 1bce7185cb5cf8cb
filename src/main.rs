mod admin;
mod auth;
mod businesses;
mod config;
mod db;
mod error;
mod pagination;
mod products;
mod uploads;
mod validation;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::repository::{RefreshTokenStore, UserRepository};
use auth::{AuthService, TokenService};
use config::Config;
use products::{ProductRepository, ProductService};
use uploads::UploadStore;

/// OpenAPI documentation for the public surface
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
        businesses::handlers::list_all_handler,
        businesses::handlers::list_business_products_handler,
        products::handlers::list_products_handler,
        products::handlers::get_product_handler,
    ),
    components(
        schemas(
            auth::models::Role,
            auth::models::UserResponse,
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::RefreshRequest,
            auth::models::AuthResponse,
            auth::models::TokenPairResponse,
            businesses::models::Business,
            businesses::models::BusinessSummary,
            businesses::models::BusinessListResponse,
            businesses::models::BusinessProductRow,
            businesses::models::BusinessProductsResponse,
            products::models::Product,
            products::models::ProductWithBusiness,
            products::models::ProductListResponse,
            products::models::UploadImageResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token rotation"),
        (name = "businesses", description = "Business listings and owner-scoped management"),
        (name = "products", description = "Product listings and owner-scoped management")
    ),
    info(
        title = "Market API",
        version = "1.0.0",
        description = "Marketplace backend connecting surplus-food sellers with customers"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub product_service: Arc<ProductService>,
    pub uploads: Arc<UploadStore>,
}

/// Creates and configures the application router.
/// Protected routes declare their guard extractors; the uploaded images
/// directory is served read-only under /uploads.
fn create_router(state: AppState, upload_dir: &str) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth
        .route("/api/auth/register", post(auth::handlers::register_handler))
        .route("/api/auth/login", post(auth::handlers::login_handler))
        .route("/api/auth/refresh-token", post(auth::handlers::refresh_handler))
        .route(
            "/api/auth/profile",
            get(auth::handlers::profile_handler).put(auth::handlers::update_profile_handler),
        )
        .route("/api/auth/delete", delete(auth::handlers::delete_account_handler))
        // Businesses
        .route(
            "/api/businesses",
            post(businesses::handlers::create_business_handler)
                .get(businesses::handlers::list_own_businesses_handler),
        )
        .route("/api/businesses/all", get(businesses::handlers::list_all_handler))
        .route(
            "/api/businesses/update-self",
            put(businesses::handlers::update_own_business_handler),
        )
        .route(
            "/api/businesses/delete-self",
            delete(businesses::handlers::delete_own_business_handler),
        )
        .route(
            "/api/businesses/:business_id/products",
            get(businesses::handlers::list_business_products_handler),
        )
        // Products
        .route(
            "/api/products",
            get(products::handlers::list_products_handler)
                .post(products::handlers::create_product_handler),
        )
        .route(
            "/api/products/:id",
            get(products::handlers::get_product_handler)
                .put(products::handlers::update_product_handler)
                .delete(products::handlers::delete_product_handler),
        )
        .route(
            "/api/products/:id/upload-image",
            post(products::handlers::upload_product_image_handler),
        )
        // Admin back office
        .route("/api/admin/users", get(admin::handlers::list_users_handler))
        .route("/api/admin/users/:id", delete(admin::handlers::delete_user_handler))
        .route("/api/admin/users/:id/role", put(admin::handlers::update_user_role_handler))
        .route("/api/admin/businesses", get(admin::handlers::list_businesses_handler))
        .route(
            "/api/admin/businesses/:id",
            put(admin::handlers::update_business_handler)
                .delete(admin::handlers::delete_business_handler),
        )
        .route("/api/admin/products", get(admin::handlers::list_products_handler))
        .route(
            "/api/admin/products/:id",
            put(admin::handlers::update_product_handler)
                .delete(admin::handlers::delete_product_handler),
        )
        // Uploaded images, served read-only
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Market API - Starting...");

    // Configuration is read once, here; components receive it explicitly
    let config = Config::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Versioned migrations run before the listener binds
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let uploads = Arc::new(
        UploadStore::new(config.upload_dir.as_str()).expect("Failed to prepare upload directory"),
    );
    let token_service = Arc::new(TokenService::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(
        UserRepository::new(db_pool.clone()),
        RefreshTokenStore::new(db_pool.clone()),
        token_service.clone(),
    ));
    let product_service = Arc::new(ProductService::new(ProductRepository::new(db_pool.clone())));

    let state = AppState {
        db: db_pool,
        token_service,
        auth_service,
        product_service,
        uploads,
    };

    let app = create_router(state, &config.upload_dir);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Market API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
