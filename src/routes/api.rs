use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::forms::catalog::SearchSuggestionQuery;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::catalog::search_suggestions;

#[get("/api/products/search")]
pub async fn search_products(
    params: web::Query<SearchSuggestionQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match search_suggestions(&params, repo.get_ref(), &server_config.media_url) {
        Ok(products) => HttpResponse::Ok().json(json!({ "products": products })),
        Err(err) => {
            log::error!("Failed to search products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
