use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::catalog::ProductFilterForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::catalog::{
    show_product as show_product_service, show_products as show_products_service,
};

#[get("/products")]
pub async fn show_products(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    params: web::Query<ProductFilterForm>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_products_service(params.into_inner(), repo.get_ref(), &server_config.media_url) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "products",
                repo.get_ref(),
                &server_config,
            );
            context.insert("page", &page);
            render_template(&tera, "store/product_list.html", &context)
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to render product list: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/{slug}")]
pub async fn show_product(
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_product_service(&slug, repo.get_ref(), &server_config.media_url) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "products",
                repo.get_ref(),
                &server_config,
            );
            context.insert("page", &page);
            render_template(&tera, "store/product_detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render product {slug}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
