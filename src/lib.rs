pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use handlers::AppState;

use handlers::{foods, invoices, menus, order_items, orders, tables, users, ApiDoc};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("applied {} pending migrations", applied.len());
    Ok(())
}

/// Register every resource route. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/foods")
            .route("", web::get().to(foods::list_foods))
            .route("", web::post().to(foods::create_food))
            .route("/{food_id}", web::get().to(foods::get_food))
            .route("/{food_id}", web::patch().to(foods::update_food)),
    )
    .service(
        web::scope("/menus")
            .route("", web::get().to(menus::list_menus))
            .route("", web::post().to(menus::create_menu))
            .route("/{menu_id}", web::get().to(menus::get_menu))
            .route("/{menu_id}", web::patch().to(menus::update_menu)),
    )
    .service(
        web::scope("/tables")
            .route("", web::get().to(tables::list_tables))
            .route("", web::post().to(tables::create_table))
            .route("/{table_id}", web::get().to(tables::get_table))
            .route("/{table_id}", web::patch().to(tables::update_table)),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(orders::list_orders))
            .route("", web::post().to(orders::create_order))
            .route("/{order_id}", web::get().to(orders::get_order))
            .route("/{order_id}", web::patch().to(orders::update_order))
            .route("/{order_id}/items", web::get().to(orders::order_view)),
    )
    .service(
        web::scope("/order-items")
            .route("", web::get().to(order_items::list_order_items))
            .route("", web::post().to(order_items::create_order_items))
            .route("/{order_item_id}", web::get().to(order_items::get_order_item))
            .route("/{order_item_id}", web::patch().to(order_items::update_order_item)),
    )
    .service(
        web::scope("/invoices")
            .route("", web::get().to(invoices::list_invoices))
            .route("", web::post().to(invoices::create_invoice))
            .route("/{invoice_id}", web::get().to(invoices::get_invoice))
            .route("/{invoice_id}", web::patch().to(invoices::update_invoice)),
    )
    .service(
        web::scope("/users")
            .route("", web::get().to(users::list_users))
            .route("/{user_id}", web::get().to(users::get_user)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
