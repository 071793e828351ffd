//! Role-gated curation of categories, products and product images.

use crate::ADMIN_ROLE;
use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::domain::category::Category;
use crate::domain::product::{Product, ProductImage};
use crate::domain::types::{CategoryId, ProductId, ProductImageId};
use crate::forms::admin::{
    CategoryForm, CategoryFormPayload, ProductForm, ProductFormPayload, ProductImageForm,
    ProductImageFormPayload,
};
use crate::repository::{CategoryReader, CategoryWriter, ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult};

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(ADMIN_ROLE, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

fn require_category<R>(repo: &R, category_id: CategoryId) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn require_product<R>(repo: &R, product_id: ProductId) -> ServiceResult<Product>
where
    R: ProductReader,
{
    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_category<R>(
    form: CategoryForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;
    let payload: CategoryFormPayload = form.try_into()?;

    let category = repo
        .create_category(&payload.into_new_category())
        .map_err(|e| ServiceError::from_write(e, "Failed to create category"))?;
    log::info!("Category {} created by {}", category.slug, user.email);
    Ok(category)
}

pub fn update_category<R>(
    category_id: i32,
    form: CategoryForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(user)?;
    let category_id = CategoryId::new(category_id)?;
    let payload: CategoryFormPayload = form.try_into()?;
    require_category(repo, category_id)?;

    repo.update_category(category_id, &payload.into_update())
        .map_err(|e| ServiceError::from_write(e, "Failed to update category"))?;
    Ok(())
}

/// Deletes a category together with its products.
pub fn delete_category<R>(category_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(user)?;
    let category_id = CategoryId::new(category_id)?;
    let category = require_category(repo, category_id)?;

    repo.delete_category(category_id)
        .map_err(|e| ServiceError::from_write(e, "Failed to delete category"))?;
    log::info!("Category {} deleted by {}", category.slug, user.email);
    Ok(())
}

pub fn create_product<R>(
    form: ProductForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: CategoryReader + ProductWriter,
{
    ensure_admin(user)?;
    let payload: ProductFormPayload = form.try_into()?;
    require_category(repo, payload.category_id)?;

    let product = repo
        .create_product(&payload.into_new_product())
        .map_err(|e| ServiceError::from_write(e, "Failed to create product"))?;
    log::info!("Product {} created by {}", product.slug, user.email);
    Ok(product)
}

pub fn update_product<R>(
    product_id: i32,
    form: ProductForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + ProductReader + ProductWriter,
{
    ensure_admin(user)?;
    let product_id = ProductId::new(product_id)?;
    let payload: ProductFormPayload = form.try_into()?;
    require_product(repo, product_id)?;
    require_category(repo, payload.category_id)?;

    repo.update_product(product_id, &payload.into_update())
        .map_err(|e| ServiceError::from_write(e, "Failed to update product"))?;
    Ok(())
}

pub fn delete_product<R>(product_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
{
    ensure_admin(user)?;
    let product_id = ProductId::new(product_id)?;
    let product = require_product(repo, product_id)?;

    repo.delete_product(product_id)
        .map_err(|e| ServiceError::from_write(e, "Failed to delete product"))?;
    log::info!("Product {} deleted by {}", product.slug, user.email);
    Ok(())
}

/// Attaches a gallery image; a primary image replaces the previous primary.
pub fn add_product_image<R>(
    product_id: i32,
    form: ProductImageForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProductImage>
where
    R: ProductReader + ProductWriter,
{
    ensure_admin(user)?;
    let product_id = ProductId::new(product_id)?;
    let payload: ProductImageFormPayload = form.try_into()?;
    require_product(repo, product_id)?;

    repo.add_product_image(&payload.into_new_image(product_id))
        .map_err(|e| ServiceError::from_write(e, "Failed to add product image"))
}

pub fn set_primary_image<R>(
    product_id: i32,
    image_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
{
    ensure_admin(user)?;
    let product_id = ProductId::new(product_id)?;
    let image_id = ProductImageId::new(image_id)?;

    match repo.set_primary_image(product_id, image_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::from_write(e, "Failed to set primary image")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::{TestRepository, sample_category, sample_product};

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "admin@example.com".into(),
            name: "Admin".into(),
            roles: vec![ADMIN_ROLE.into()],
        }
    }

    fn shopper() -> AuthenticatedUser {
        AuthenticatedUser {
            roles: vec![],
            ..admin()
        }
    }

    fn repo() -> TestRepository {
        TestRepository::new(
            vec![sample_category(1, "T-Shirts")],
            vec![sample_product(1, 1, "Classic White T-Shirt", 19.99, 10.0, 50)],
        )
    }

    fn category_form(name: &str) -> CategoryForm {
        CategoryForm {
            name: name.into(),
            slug: None,
            description: None,
            image: None,
        }
    }

    fn product_form(category_id: i32, name: &str) -> ProductForm {
        ProductForm {
            category_id,
            name: name.into(),
            slug: None,
            description: None,
            price: 39.99,
            discount: None,
            stock_quantity: 5,
            image: None,
            is_active: Some("on".into()),
            is_featured: None,
        }
    }

    fn image_form(path: &str, primary: bool) -> ProductImageForm {
        ProductImageForm {
            image: path.into(),
            alt_text: None,
            is_primary: primary.then(|| "on".to_string()),
        }
    }

    #[test]
    fn non_admins_are_rejected() {
        let repo = repo();
        assert_eq!(
            create_category(category_form("Shoes"), &shopper(), &repo),
            Err(ServiceError::Unauthorized)
        );
        assert_eq!(
            delete_product(1, &shopper(), &repo),
            Err(ServiceError::Unauthorized)
        );
        assert_eq!(repo.products().len(), 1);
    }

    #[test]
    fn create_category_derives_slug() {
        let repo = repo();
        let category = create_category(category_form("Summer Shoes"), &admin(), &repo).unwrap();
        assert_eq!(category.slug.as_str(), "summer-shoes");
    }

    #[test]
    fn duplicate_category_is_a_form_error() {
        let repo = repo();
        let result = create_category(category_form("T-Shirts"), &admin(), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn update_missing_category_is_not_found() {
        assert_eq!(
            update_category(9, category_form("Shoes"), &admin(), &repo()),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn deleting_category_removes_its_products() {
        let repo = repo();
        delete_category(1, &admin(), &repo).unwrap();
        assert!(repo.categories().is_empty());
        assert!(repo.products().is_empty());
    }

    #[test]
    fn product_needs_existing_category() {
        let repo = repo();
        assert_eq!(
            create_product(product_form(7, "Canvas Sneakers"), &admin(), &repo),
            Err(ServiceError::NotFound)
        );

        let product = create_product(product_form(1, "Canvas Sneakers"), &admin(), &repo).unwrap();
        assert_eq!(product.slug.as_str(), "canvas-sneakers");
        assert_eq!(product.discount.get(), 0.0);
        assert!(product.is_active);
    }

    #[test]
    fn invalid_product_form_is_rejected() {
        let mut form = product_form(1, "Canvas Sneakers");
        form.discount = Some(120.0);
        assert!(matches!(
            create_product(form, &admin(), &repo()),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn update_product_replaces_fields() {
        let repo = repo();
        let mut form = product_form(1, "Classic White Tee");
        form.stock_quantity = 0;
        update_product(1, form, &admin(), &repo).unwrap();

        let products = repo.products();
        let product = &products[0];
        assert_eq!(product.name.as_str(), "Classic White Tee");
        assert_eq!(product.stock_quantity.get(), 0);
        assert!(!product.is_in_stock());
    }

    #[test]
    fn only_one_primary_image_per_product() {
        let repo = repo();
        let first = add_product_image(1, image_form("p/front.jpg", true), &admin(), &repo).unwrap();
        let second = add_product_image(1, image_form("p/back.jpg", true), &admin(), &repo).unwrap();

        let primaries = |repo: &TestRepository| {
            repo.images()
                .into_iter()
                .filter(|i| i.is_primary)
                .map(|i| i.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(primaries(&repo), [second.id]);

        set_primary_image(1, first.id.get(), &admin(), &repo).unwrap();
        assert_eq!(primaries(&repo), [first.id]);
    }

    #[test]
    fn primary_image_must_belong_to_product() {
        let repo = TestRepository::new(
            vec![sample_category(1, "T-Shirts")],
            vec![
                sample_product(1, 1, "Classic White T-Shirt", 19.99, 10.0, 50),
                sample_product(2, 1, "Graphic Print T-Shirt", 24.99, 0.0, 30),
            ],
        );
        let image = add_product_image(2, image_form("p/graphic.jpg", false), &admin(), &repo)
            .unwrap();
        assert_eq!(
            set_primary_image(1, image.id.get(), &admin(), &repo),
            Err(ServiceError::NotFound)
        );
    }
}
