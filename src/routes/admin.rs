use actix_web::{HttpResponse, Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::admin::{CategoryForm, ProductForm, ProductImageForm};
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::ServiceError;
use crate::services::admin::{
    add_product_image as add_product_image_service,
    create_category as create_category_service, create_product as create_product_service,
    delete_category as delete_category_service, delete_product as delete_product_service,
    set_primary_image as set_primary_image_service,
    update_category as update_category_service, update_product as update_product_service,
};

fn error_response(err: ServiceError, not_found: &str, location: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => return HttpResponse::Forbidden().finish(),
        ServiceError::NotFound => FlashMessage::error(not_found).send(),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            FlashMessage::error(message).send()
        }
        ServiceError::Internal => return HttpResponse::InternalServerError().finish(),
    }
    redirect(location)
}

/// Flash-and-redirect handling shared by the admin endpoints.
fn respond<T>(
    result: Result<T, ServiceError>,
    success: &str,
    not_found: &str,
    location: &str,
) -> HttpResponse {
    match result {
        Ok(_) => {
            FlashMessage::success(success).send();
            redirect(location)
        }
        Err(err) => error_response(err, not_found, location),
    }
}

#[post("/admin/categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    match create_category_service(form, &user, repo.get_ref()) {
        Ok(category) => {
            FlashMessage::success(format!("Category {} created.", category.name)).send();
            redirect(&format!("/categories/{}", category.slug))
        }
        Err(err) => error_response(err, "Category not found.", "/"),
    }
}

#[post("/admin/categories/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    respond(
        update_category_service(category_id.into_inner(), form, &user, repo.get_ref()),
        "Category updated.",
        "Category not found.",
        "/",
    )
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        delete_category_service(category_id.into_inner(), &user, repo.get_ref()),
        "Category deleted.",
        "Category not found.",
        "/",
    )
}

#[post("/admin/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    match create_product_service(form, &user, repo.get_ref()) {
        Ok(product) => {
            FlashMessage::success(format!("Product {} created.", product.name)).send();
            redirect(&product.detail_url())
        }
        Err(err) => error_response(err, "Category not found.", "/products"),
    }
}

#[post("/admin/products/{product_id}/update")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    respond(
        update_product_service(product_id.into_inner(), form, &user, repo.get_ref()),
        "Product updated.",
        "Product or category not found.",
        "/products",
    )
}

#[post("/admin/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        delete_product_service(product_id.into_inner(), &user, repo.get_ref()),
        "Product deleted.",
        "Product not found.",
        "/products",
    )
}

#[post("/admin/products/{product_id}/images")]
pub async fn add_product_image(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductImageForm>,
) -> impl Responder {
    respond(
        add_product_image_service(product_id.into_inner(), form, &user, repo.get_ref()),
        "Image added.",
        "Product not found.",
        "/products",
    )
}

#[post("/admin/products/{product_id}/images/{image_id}/primary")]
pub async fn set_primary_image(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (product_id, image_id) = path.into_inner();
    respond(
        set_primary_image_service(product_id, image_id, &user, repo.get_ref()),
        "Primary image updated.",
        "Image not found.",
        "/products",
    )
}
