//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/health", web::get().to(health::health_check))
        // Auth routes
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/me", web::get().to(auth::me)),
        )
        // Post CRUD - every route requires a bearer token
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::list_posts))
                .route("", web::post().to(posts::create_post))
                .route("/{id}", web::get().to(posts::get_post))
                .route("/{id}", web::put().to(posts::update_post))
                .route("/{id}", web::delete().to(posts::delete_post)),
        );
}
