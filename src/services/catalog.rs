use serde::Serialize;

use crate::domain::product::Product;
use crate::dto::catalog::{CategoryDto, ProductDto, ProductImageDto, ProductSuggestionDto};
use crate::forms::catalog::{
    ListingQuery, ProductFilter, ProductFilterForm, SearchSuggestionQuery,
};
use crate::pagination::{PRODUCTS_PER_PAGE, Paginated, clamp_page, total_pages};
use crate::repository::{CategoryListQuery, CategoryReader, ProductListQuery, ProductReader};
use crate::{
    HOME_CATEGORIES, HOME_FEATURED_PRODUCTS, RELATED_PRODUCTS, SEARCH_MIN_CHARS,
    SEARCH_SUGGESTIONS,
};

use super::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HomePage {
    pub featured_products: Vec<ProductDto>,
    pub categories: Vec<CategoryDto>,
}

/// Product listing with the filter values echoed back for the form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductListPage {
    pub products: Paginated<ProductDto>,
    pub categories: Vec<CategoryDto>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductDetailPage {
    pub product: ProductDto,
    pub category: CategoryDto,
    pub images: Vec<ProductImageDto>,
    pub related_products: Vec<ProductDto>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryPage {
    pub category: CategoryDto,
    pub products: Paginated<ProductDto>,
    pub sort: &'static str,
}

fn to_dtos<R>(repo: &R, products: &[Product], media_url: &str) -> ServiceResult<Vec<ProductDto>>
where
    R: ProductReader,
{
    let ids: Vec<_> = products.iter().map(|p| p.id).collect();
    let gallery = repo.list_product_images(&ids).map_err(|e| {
        log::error!("Failed to list product images: {e}");
        ServiceError::Internal
    })?;
    Ok(products
        .iter()
        .map(|product| ProductDto::new(product, &gallery, media_url))
        .collect())
}

/// Runs `query` for the requested page, clamped into the pages the listing
/// actually has.
fn paginated_products<R>(
    repo: &R,
    query: ProductListQuery,
    page: usize,
    media_url: &str,
) -> ServiceResult<Paginated<ProductDto>>
where
    R: ProductReader,
{
    let total = repo.count_products(&query).map_err(|e| {
        log::error!("Failed to count products: {e}");
        ServiceError::Internal
    })?;
    let pages = total_pages(total, PRODUCTS_PER_PAGE);
    let page = clamp_page(page, pages);

    let (total, products) = repo
        .list_products(query.paginate(page, PRODUCTS_PER_PAGE))
        .map_err(|e| {
            log::error!("Failed to list products: {e}");
            ServiceError::Internal
        })?;

    Ok(Paginated::new(
        to_dtos(repo, &products, media_url)?,
        page,
        total_pages(total, PRODUCTS_PER_PAGE),
        total,
    ))
}

fn list_categories<R>(
    repo: &R,
    query: CategoryListQuery,
    media_url: &str,
) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories(query) {
        Ok((_total, categories)) => Ok(categories
            .iter()
            .map(|category| CategoryDto::new(category, media_url))
            .collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Categories shown in the navigation bar of every page.
pub fn navigation_categories<R>(repo: &R, media_url: &str) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    list_categories(
        repo,
        CategoryListQuery::new().paginate(1, HOME_CATEGORIES),
        media_url,
    )
}

pub fn home<R>(repo: &R, media_url: &str) -> ServiceResult<HomePage>
where
    R: CategoryReader + ProductReader,
{
    let (_total, featured) = repo
        .list_products(
            ProductListQuery::active()
                .featured()
                .limit(HOME_FEATURED_PRODUCTS),
        )
        .map_err(|e| {
            log::error!("Failed to list featured products: {e}");
            ServiceError::Internal
        })?;

    Ok(HomePage {
        featured_products: to_dtos(repo, &featured, media_url)?,
        categories: navigation_categories(repo, media_url)?,
    })
}

/// Filtered, sorted and paginated listing of active products.
///
/// An invalid filter, such as a minimum price above the maximum, is a
/// [`ServiceError::Form`] carrying the message to show.
pub fn show_products<R>(
    form: ProductFilterForm,
    repo: &R,
    media_url: &str,
) -> ServiceResult<ProductListPage>
where
    R: CategoryReader + ProductReader,
{
    let filter: ProductFilter = form.try_into()?;

    let mut query = ProductListQuery::active()
        .price_range(filter.min_price, filter.max_price)
        .sort(filter.sort);
    if let Some(search) = &filter.search {
        query = query.search(search.as_str());
    }
    if let Some(category) = &filter.category {
        query = query.category_slug(category.as_str());
    }

    Ok(ProductListPage {
        products: paginated_products(repo, query, filter.page, media_url)?,
        categories: list_categories(repo, CategoryListQuery::new(), media_url)?,
        search: filter.search,
        category: filter.category,
        min_price: filter.min_price.map(|p| p.get()),
        max_price: filter.max_price.map(|p| p.get()),
        sort: filter.sort.as_str(),
    })
}

/// Detail page of an active product.
pub fn show_product<R>(slug: &str, repo: &R, media_url: &str) -> ServiceResult<ProductDetailPage>
where
    R: CategoryReader + ProductReader,
{
    let product = match repo.get_product_by_slug(slug) {
        Ok(Some(product)) if product.is_active => product,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let category = match repo.get_category_by_id(product.category_id) {
        Ok(Some(category)) => category,
        Ok(None) => {
            log::error!("Product {} references missing category", product.id);
            return Err(ServiceError::Internal);
        }
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let gallery = repo.list_product_images(&[product.id]).map_err(|e| {
        log::error!("Failed to list product images: {e}");
        ServiceError::Internal
    })?;

    let (_total, related) = repo
        .list_products(
            ProductListQuery::active()
                .category(product.category_id)
                .exclude(product.id)
                .limit(RELATED_PRODUCTS),
        )
        .map_err(|e| {
            log::error!("Failed to list related products: {e}");
            ServiceError::Internal
        })?;

    Ok(ProductDetailPage {
        product: ProductDto::new(&product, &gallery, media_url),
        category: CategoryDto::new(&category, media_url),
        images: gallery
            .iter()
            .map(|image| ProductImageDto::new(image, media_url))
            .collect(),
        related_products: to_dtos(repo, &related, media_url)?,
    })
}

pub fn category_detail<R>(
    slug: &str,
    params: &ListingQuery,
    repo: &R,
    media_url: &str,
) -> ServiceResult<CategoryPage>
where
    R: CategoryReader + ProductReader,
{
    let category = match repo.get_category_by_slug(slug) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let sort = params.sort();
    let query = ProductListQuery::active().category(category.id).sort(sort);

    Ok(CategoryPage {
        category: CategoryDto::new(&category, media_url),
        products: paginated_products(repo, query, params.page(), media_url)?,
        sort: sort.as_str(),
    })
}

/// Search-as-you-type suggestions over product name and description.
pub fn search_suggestions<R>(
    params: &SearchSuggestionQuery,
    repo: &R,
    media_url: &str,
) -> ServiceResult<Vec<ProductSuggestionDto>>
where
    R: ProductReader,
{
    let q = params.q.trim();
    if q.chars().count() < SEARCH_MIN_CHARS {
        return Ok(vec![]);
    }

    let (_total, products) = repo
        .list_products(
            ProductListQuery::active()
                .search_text(q)
                .limit(SEARCH_SUGGESTIONS),
        )
        .map_err(|e| {
            log::error!("Failed to search products: {e}");
            ServiceError::Internal
        })?;

    Ok(to_dtos(repo, &products, media_url)?
        .into_iter()
        .map(ProductSuggestionDto::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductImage;
    use crate::domain::types::{ImageRef, ProductId, ProductImageId};
    use crate::repository::test::{TestRepository, sample_category, sample_product};
    use chrono::DateTime;

    fn catalog() -> TestRepository {
        let mut products = vec![
            sample_product(1, 1, "Classic White T-Shirt", 19.99, 10.0, 50),
            sample_product(2, 1, "Graphic Print T-Shirt", 24.99, 0.0, 30),
            sample_product(3, 2, "Slim Fit Jeans", 59.99, 15.0, 25),
            sample_product(4, 2, "Relaxed Denim", 49.99, 0.0, 20),
            sample_product(5, 3, "Leather Jacket", 199.99, 0.0, 15),
            sample_product(6, 3, "Denim Jacket", 89.99, 20.0, 10),
        ];
        products[0].is_featured = true;
        products[4].is_featured = true;
        products[5].is_active = false;
        products[5].is_featured = true;
        TestRepository::new(
            vec![
                sample_category(1, "T-Shirts"),
                sample_category(2, "Jeans"),
                sample_category(3, "Jackets"),
            ],
            products,
        )
    }

    fn filter(min: Option<&str>, max: Option<&str>) -> ProductFilterForm {
        ProductFilterForm {
            min_price: min.map(str::to_string),
            max_price: max.map(str::to_string),
            ..ProductFilterForm::default()
        }
    }

    #[test]
    fn home_shows_active_featured_products_and_categories() {
        let page = home(&catalog(), "/media").unwrap();
        let names: Vec<_> = page
            .featured_products
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["Leather Jacket", "Classic White T-Shirt"]);
        let categories: Vec<_> = page.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(categories, ["Jackets", "Jeans", "T-Shirts"]);
    }

    #[test]
    fn price_range_is_inclusive() {
        let page = show_products(filter(Some("20"), Some("50")), &catalog(), "/media").unwrap();
        let mut prices: Vec<_> = page.products.items.iter().map(|p| p.price).collect();
        prices.sort_by(f64::total_cmp);
        assert_eq!(prices, [24.99, 49.99]);
        assert!(
            page.products
                .items
                .iter()
                .all(|p| (20.0..=50.0).contains(&p.price))
        );
    }

    #[test]
    fn inverted_price_range_is_a_form_error() {
        assert_eq!(
            show_products(filter(Some("50"), Some("20")), &catalog(), "/media"),
            Err(ServiceError::Form(
                "Minimum price cannot be greater than maximum price.".into()
            ))
        );
    }

    #[test]
    fn search_matches_category_names_and_skips_inactive() {
        let page = show_products(
            ProductFilterForm {
                search: Some("jack".into()),
                ..ProductFilterForm::default()
            },
            &catalog(),
            "/media",
        )
        .unwrap();
        let names: Vec<_> = page.products.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Leather Jacket"]);

        let page = show_products(
            ProductFilterForm {
                search: Some("T-SHIRTS".into()),
                ..ProductFilterForm::default()
            },
            &catalog(),
            "/media",
        )
        .unwrap();
        assert_eq!(page.products.total_items, 2);
    }

    #[test]
    fn listing_sorts_and_filters_by_category() {
        let page = show_products(
            ProductFilterForm {
                category: Some("jeans".into()),
                sort: Some("price_low".into()),
                ..ProductFilterForm::default()
            },
            &catalog(),
            "/media",
        )
        .unwrap();
        let names: Vec<_> = page.products.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Relaxed Denim", "Slim Fit Jeans"]);
        assert_eq!(page.sort, "price_low");
        assert_eq!(page.category.as_deref(), Some("jeans"));
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let products = (1..=15)
            .map(|id| sample_product(id, 1, &format!("Tee {id}"), 10.0, 0.0, 5))
            .collect();
        let repo = TestRepository::new(vec![sample_category(1, "T-Shirts")], products);

        let page = show_products(
            ProductFilterForm {
                page: Some("99".into()),
                ..ProductFilterForm::default()
            },
            &repo,
            "/media",
        )
        .unwrap();
        assert_eq!(page.products.page, 2);
        assert_eq!(page.products.total_pages, 2);
        assert_eq!(page.products.items.len(), 3);
        assert!(page.products.has_previous);
        assert!(!page.products.has_next);

        let page = show_products(
            ProductFilterForm {
                page: Some("0".into()),
                ..ProductFilterForm::default()
            },
            &repo,
            "/media",
        )
        .unwrap();
        assert_eq!(page.products.page, 1);
        assert_eq!(page.products.items.len(), PRODUCTS_PER_PAGE);
    }

    #[test]
    fn huge_page_number_shows_last_page() {
        let products = (1..=15)
            .map(|id| sample_product(id, 1, &format!("Tee {id}"), 10.0, 0.0, 5))
            .collect();
        let repo = TestRepository::new(vec![sample_category(1, "T-Shirts")], products);

        let page = show_products(
            ProductFilterForm {
                page: Some(i64::MAX.to_string()),
                ..ProductFilterForm::default()
            },
            &repo,
            "/media",
        )
        .unwrap();
        assert_eq!(page.products.page, 2);
        assert_eq!(page.products.items.len(), 3);

        let params = ListingQuery {
            sort: None,
            page: Some(i64::MAX.to_string()),
        };
        let page = category_detail("t-shirts", &params, &repo, "/media").unwrap();
        assert_eq!(page.products.page, 2);
        assert_eq!(page.products.items.len(), 3);
    }

    #[test]
    fn empty_listing_has_one_page() {
        let repo = TestRepository::new(vec![], vec![]);
        let page = show_products(ProductFilterForm::default(), &repo, "/media").unwrap();
        assert_eq!(page.products.page, 1);
        assert_eq!(page.products.total_pages, 1);
        assert!(page.products.items.is_empty());
    }

    #[test]
    fn product_detail_includes_gallery_and_related() {
        let created_at = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        let repo = catalog().with_images(vec![
            ProductImage {
                id: ProductImageId::new(1).unwrap(),
                product_id: ProductId::new(1).unwrap(),
                image: ImageRef::new("products/white-front.jpg").unwrap(),
                alt_text: "Front".into(),
                is_primary: false,
                created_at,
            },
            ProductImage {
                id: ProductImageId::new(2).unwrap(),
                product_id: ProductId::new(1).unwrap(),
                image: ImageRef::new("products/white-back.jpg").unwrap(),
                alt_text: "Back".into(),
                is_primary: true,
                created_at,
            },
        ]);

        let page = show_product("classic-white-t-shirt", &repo, "/media").unwrap();
        assert_eq!(page.category.slug, "t-shirts");
        assert_eq!(
            page.product.image.as_deref(),
            Some("/media/products/white-back.jpg")
        );
        assert!((page.product.discounted_price - 17.991).abs() < 1e-9);
        assert!(page.images[0].is_primary);
        let related: Vec<_> = page
            .related_products
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(related, ["Graphic Print T-Shirt"]);
    }

    #[test]
    fn inactive_or_missing_product_is_not_found() {
        let repo = catalog();
        assert_eq!(
            show_product("denim-jacket", &repo, "/media"),
            Err(ServiceError::NotFound)
        );
        assert_eq!(
            show_product("no-such-thing", &repo, "/media"),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn category_detail_lists_active_products() {
        let params = ListingQuery {
            sort: Some("name".into()),
            page: None,
        };
        let page = category_detail("jackets", &params, &catalog(), "/media").unwrap();
        assert_eq!(page.category.name, "Jackets");
        assert_eq!(page.products.total_items, 1);
        assert_eq!(page.sort, "name");

        assert_eq!(
            category_detail("shoes", &params, &catalog(), "/media"),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn suggestions_need_two_characters_and_skip_categories() {
        let repo = catalog();
        let short = SearchSuggestionQuery { q: "j".into() };
        assert!(search_suggestions(&short, &repo, "/media").unwrap().is_empty());

        let by_category = SearchSuggestionQuery {
            q: "t-shirts".into(),
        };
        assert!(
            search_suggestions(&by_category, &repo, "/media")
                .unwrap()
                .is_empty()
        );

        let query = SearchSuggestionQuery { q: "jean".into() };
        let suggestions = search_suggestions(&query, &repo, "/media").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Slim Fit Jeans");
        assert_eq!(suggestions[0].url, "/products/slim-fit-jeans");
        assert_eq!(suggestions[0].image, None);
    }

    #[test]
    fn suggestions_are_capped() {
        let products = (1..=8)
            .map(|id| sample_product(id, 1, &format!("Basic Tee {id}"), 10.0, 0.0, 5))
            .collect();
        let repo = TestRepository::new(vec![sample_category(1, "T-Shirts")], products);
        let query = SearchSuggestionQuery { q: "basic".into() };
        assert_eq!(
            search_suggestions(&query, &repo, "/media").unwrap().len(),
            SEARCH_SUGGESTIONS
        );
    }
}
