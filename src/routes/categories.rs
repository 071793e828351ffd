use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::catalog::ListingQuery;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::ServiceError;
use crate::services::catalog::category_detail;

#[get("/categories/{slug}")]
pub async fn show_category(
    slug: web::Path<String>,
    params: web::Query<ListingQuery>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match category_detail(&slug, &params, repo.get_ref(), &server_config.media_url) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "categories",
                repo.get_ref(),
                &server_config,
            );
            context.insert("page", &page);
            render_template(&tera, "store/category_detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render category {slug}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
