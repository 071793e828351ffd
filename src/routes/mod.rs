use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{CartReader, CategoryReader};
use crate::services::cart::cart_summary;
use crate::services::catalog::navigation_categories;

pub mod admin;
pub mod api;
pub mod cart;
pub mod categories;
pub mod main;
pub mod products;

/// Registers every storefront endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::index)
        .service(products::show_products)
        .service(products::show_product)
        .service(categories::show_category)
        .service(api::search_products)
        .service(cart::show_cart)
        .service(cart::add_to_cart)
        .service(cart::update_cart_item)
        .service(cart::remove_cart_item)
        .service(cart::clear_cart)
        .service(cart::cart_count)
        .service(admin::create_category)
        .service(admin::update_category)
        .service(admin::delete_category)
        .service(admin::create_product)
        .service(admin::update_product)
        .service(admin::delete_product)
        .service(admin::add_product_image)
        .service(admin::set_primary_image);
}

/// The identity cookie carries the JSON-encoded user issued by the auth service.
impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|id| match serde_json::from_str::<AuthenticatedUser>(&id) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("Discarding malformed identity: {e}");
                    None
                }
            });
        ready(user.ok_or_else(|| actix_web::error::ErrorUnauthorized("authentication required")))
    }
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info => "info",
        Level::Debug => "secondary",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Requests sent by the storefront scripts identify themselves with this header.
pub fn is_ajax(req: &HttpRequest) -> bool {
    req.headers()
        .get("X-Requested-With")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// Context shared by every page: alerts, user, navigation and cart badge.
///
/// Navigation categories and the cart summary are looked up per request;
/// a failed lookup leaves them empty rather than failing the page.
pub fn base_context<R>(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
    repo: &R,
    server_config: &ServerConfig,
) -> Context
where
    R: CategoryReader + CartReader,
{
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context.insert("login_url", &server_config.login_url);
    context.insert(
        "nav_categories",
        &navigation_categories(repo, &server_config.media_url).unwrap_or_default(),
    );
    context.insert(
        "cart_summary",
        &cart_summary(user, repo).unwrap_or_default(),
    );
    context
}
