//! HTTP inbound adapter: HTML pages, admin area, OAuth login, REST API and
//! health probes.

pub mod admin;
pub mod api;
pub mod error;
pub mod health;
pub mod negotiate;
pub mod oauth;
pub mod pages;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

use actix_web::web;

/// Register every blog route.
///
/// Session and trace middleware are left to the caller. Catch-all paths go
/// last so `/{postid}` never shadows a fixed route.
///
/// # Examples
/// ```
/// use actix_web::App;
///
/// let _app = App::new().configure(backend::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::unparseable_path_as_not_found())
        .service(api::api_scope())
        .service(admin::admin_scope())
        .service(health::ready)
        .service(health::live)
        .service(pages::favicon)
        .service(oauth::login)
        .service(oauth::callback)
        .service(pages::index)
        .service(pages::show_post);
}
