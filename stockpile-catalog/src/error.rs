use stockpile_store::StoreError;

/// Catalog-related errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid product {product_id}: {message}")]
    Validation { product_id: String, message: String },

    #[error("Unknown product type: {0}")]
    UnknownProductType(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Expected a numeric quantity, got `{0}`")]
    TypeMismatch(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub(crate) fn validation(product_id: &str, message: impl Into<String>) -> Self {
        let product_id = if product_id.is_empty() { "<blank>" } else { product_id };
        CatalogError::Validation {
            product_id: product_id.to_string(),
            message: message.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
