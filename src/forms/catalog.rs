use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{ProductPrice, ProductSort, TypeConstraintError};
use crate::pagination::parse_page;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_price(
    value: Option<String>,
    field: &str,
) -> Result<Option<ProductPrice>, TypeConstraintError> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    let number = raw
        .parse::<f64>()
        .map_err(|_| TypeConstraintError::InvalidValue(format!("{field} must be a number")))?;
    ProductPrice::new(number).map(Some)
}

/// Query string of the product listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProductFilterForm {
    #[validate(length(max = 100))]
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

/// Validated listing filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<ProductPrice>,
    pub max_price: Option<ProductPrice>,
    pub sort: ProductSort,
    /// Requested page before clamping.
    pub page: usize,
}

#[derive(Debug, Error)]
pub enum ProductFilterFormError {
    #[error("Product filter validation failed: {0}")]
    Validation(String),
    #[error("Product filter contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Minimum price cannot be greater than maximum price.")]
    PriceRange,
}

impl From<ValidationErrors> for ProductFilterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFilterFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProductFilterForm> for ProductFilter {
    type Error = ProductFilterFormError;

    fn try_from(value: ProductFilterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let min_price = parse_price(value.min_price, "min_price")?;
        let max_price = parse_price(value.max_price, "max_price")?;
        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min.get() > max.get() {
                return Err(ProductFilterFormError::PriceRange);
            }
        }

        Ok(Self {
            search: non_blank(value.search),
            category: non_blank(value.category),
            min_price,
            max_price,
            sort: ProductSort::parse_or_default(value.sort.as_deref()),
            page: parse_page(value.page.as_deref()),
        })
    }
}

/// Sort and page of a category page. Never rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    pub fn sort(&self) -> ProductSort {
        ProductSort::parse_or_default(self.sort.as_deref())
    }

    pub fn page(&self) -> usize {
        parse_page(self.page.as_deref())
    }
}

/// Query string of `/api/products/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchSuggestionQuery {
    #[serde(default)]
    pub q: String,
}
