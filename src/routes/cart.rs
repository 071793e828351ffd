use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde_json::json;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::cart::{AddToCartForm, UpdateCartItemForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, is_ajax, redirect, render_template};
use crate::services::ServiceError;
use crate::services::cart::{
    CART_NOT_FOUND, CartOutcome, INVALID_ITEM_OR_QUANTITY, INVALID_PRODUCT_OR_QUANTITY,
    ITEM_NOT_FOUND, add_to_cart as add_to_cart_service, cart_count as cart_count_service,
    clear_cart as clear_cart_service, remove_cart_item as remove_cart_item_service,
    show_cart as show_cart_service, update_cart_item as update_cart_item_service,
};

/// Answers a failed cart action with JSON for scripts or a flash and redirect otherwise.
fn failure(ajax: bool, message: &str, fallback: &str) -> HttpResponse {
    if ajax {
        return HttpResponse::Ok().json(json!({ "success": false, "message": message }));
    }
    FlashMessage::error(message).send();
    redirect(fallback)
}

fn flash_outcome(outcome: &CartOutcome) {
    if outcome.stock_limit.is_some() {
        FlashMessage::warning(outcome.message.clone()).send();
    } else {
        FlashMessage::success(outcome.message.clone()).send();
    }
}

/// Maps a service error to the response of a cart action.
///
/// `not_found` is the message shown when the product, item or cart is missing.
fn error_response(err: ServiceError, ajax: bool, not_found: &str, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => failure(ajax, not_found, fallback),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            failure(ajax, &message, fallback)
        }
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}

#[get("/cart")]
pub async fn show_cart(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_cart_service(&user, repo.get_ref(), &server_config.media_url) {
        Ok(cart) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "cart",
                repo.get_ref(),
                &server_config,
            );
            context.insert("cart", &cart);
            render_template(&tera, "cart/cart.html", &context)
        }
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to render cart page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/add")]
pub async fn add_to_cart(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddToCartForm>,
) -> impl Responder {
    let ajax = is_ajax(&req);

    match add_to_cart_service(form, &user, repo.get_ref()) {
        Ok(outcome) if ajax => HttpResponse::Ok().json(json!({
            "success": true,
            "message": outcome.message,
            "cart_total": outcome.summary.total_items,
            "cart_subtotal": outcome.summary.total_price,
        })),
        Ok(outcome) => {
            flash_outcome(&outcome);
            redirect("/cart")
        }
        Err(err) => error_response(err, ajax, INVALID_PRODUCT_OR_QUANTITY, "/products"),
    }
}

#[post("/cart/update/{item_id}")]
pub async fn update_cart_item(
    req: HttpRequest,
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdateCartItemForm>,
) -> impl Responder {
    let ajax = is_ajax(&req);

    match update_cart_item_service(item_id.into_inner(), form, &user, repo.get_ref()) {
        Ok(outcome) if ajax => HttpResponse::Ok().json(json!({
            "success": true,
            "message": outcome.message,
            "item_id": outcome.item_id,
            "item_total": outcome.item_total,
            "cart_total": outcome.summary.total_items,
            "cart_subtotal": outcome.summary.total_price,
        })),
        Ok(outcome) => {
            flash_outcome(&outcome);
            redirect("/cart")
        }
        Err(err) => error_response(err, ajax, INVALID_ITEM_OR_QUANTITY, "/cart"),
    }
}

#[post("/cart/remove/{item_id}")]
pub async fn remove_cart_item(
    req: HttpRequest,
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let ajax = is_ajax(&req);

    match remove_cart_item_service(item_id.into_inner(), &user, repo.get_ref()) {
        Ok(outcome) if ajax => HttpResponse::Ok().json(json!({
            "success": true,
            "message": outcome.message,
            "cart_total": outcome.summary.total_items,
            "cart_subtotal": outcome.summary.total_price,
        })),
        Ok(outcome) => {
            flash_outcome(&outcome);
            redirect("/cart")
        }
        Err(err) => error_response(err, ajax, ITEM_NOT_FOUND, "/cart"),
    }
}

#[post("/cart/clear")]
pub async fn clear_cart(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let ajax = is_ajax(&req);

    match clear_cart_service(&user, repo.get_ref()) {
        Ok(outcome) if ajax => HttpResponse::Ok().json(json!({
            "success": true,
            "message": outcome.message,
        })),
        Ok(outcome) => {
            flash_outcome(&outcome);
            redirect("/cart")
        }
        Err(err) => error_response(err, ajax, CART_NOT_FOUND, "/cart"),
    }
}

#[get("/cart/count")]
pub async fn cart_count(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match cart_count_service(user.as_ref(), repo.get_ref()) {
        Ok(count) => HttpResponse::Ok().json(json!({ "count": count })),
        Err(err) => {
            log::error!("Failed to count cart items: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
