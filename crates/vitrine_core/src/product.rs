//! Product draft fields and the submission payload.

use serde::{Deserialize, Serialize};

/// A problem with one of the product's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FieldProblem {
    /// Name is empty
    #[display("product name is required")]
    MissingName,
    /// Description is empty
    #[display("product description is required")]
    MissingDescription,
    /// Price is zero
    #[display("price must be greater than zero")]
    NonPositivePrice,
    /// Currency is not a three-letter code
    #[display("currency must be a three-letter code, got '{}'", _0)]
    InvalidCurrency(String),
}

/// Non-image fields of a product being created or edited.
///
/// # Examples
///
/// ```
/// use vitrine_core::ProductDraft;
///
/// let draft = ProductDraft::builder()
///     .name("Canvas tote")
///     .description("Heavy cotton tote bag")
///     .price_cents(2500u64)
///     .build()
///     .unwrap();
///
/// assert_eq!(draft.currency(), "USD");
/// assert!(draft.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ProductDraft {
    /// Catalog id when editing an existing product
    #[builder(default)]
    #[serde(default)]
    product_id: Option<String>,
    /// Display name
    #[builder(default)]
    #[serde(default)]
    name: String,
    /// Long description
    #[builder(default)]
    #[serde(default)]
    description: String,
    /// Price in minor currency units
    #[builder(default)]
    #[serde(default)]
    price_cents: u64,
    /// ISO 4217 currency code
    #[builder(default = "\"USD\".to_string()")]
    #[serde(default = "default_currency")]
    currency: String,
    /// Catalog category
    #[builder(default)]
    #[serde(default)]
    category: Option<String>,
    /// Units in stock
    #[builder(default)]
    #[serde(default)]
    stock: u32,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl ProductDraft {
    /// Creates a new product draft builder.
    pub fn builder() -> ProductDraftBuilder {
        ProductDraftBuilder::default()
    }

    /// Returns the first problem with the draft's fields.
    ///
    /// # Errors
    ///
    /// Returns the highest-priority [`FieldProblem`].
    pub fn validate(&self) -> Result<(), FieldProblem> {
        if self.name.trim().is_empty() {
            return Err(FieldProblem::MissingName);
        }
        if self.description.trim().is_empty() {
            return Err(FieldProblem::MissingDescription);
        }
        if self.price_cents == 0 {
            return Err(FieldProblem::NonPositivePrice);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FieldProblem::InvalidCurrency(self.currency.clone()));
        }
        Ok(())
    }

    /// Build the payload sent to the catalog service.
    pub fn into_payload(self, images: Vec<String>) -> SubmissionPayload {
        SubmissionPayload {
            product_id: self.product_id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            currency: self.currency.to_ascii_uppercase(),
            category: self.category,
            stock: self.stock,
            images,
        }
    }
}

/// Final product payload produced by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Catalog id when editing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Display name
    pub name: String,
    /// Long description
    pub description: String,
    /// Price in minor currency units
    pub price_cents: u64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Catalog category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Units in stock
    pub stock: u32,
    /// Remote image locations, primary first
    pub images: Vec<String>,
}

impl SubmissionPayload {
    /// The primary image, if the product has any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProductDraft {
        ProductDraft::builder()
            .name("Mug")
            .description("Stoneware mug")
            .price_cents(1800u64)
            .build()
            .unwrap()
    }

    #[test]
    fn test_validate_reports_first_problem() {
        let draft = ProductDraft::builder().build().unwrap();
        assert_eq!(draft.validate(), Err(FieldProblem::MissingName));

        let draft = ProductDraft::builder()
            .name("Mug")
            .description("Stoneware mug")
            .build()
            .unwrap();
        assert_eq!(draft.validate(), Err(FieldProblem::NonPositivePrice));

        let draft = ProductDraft::builder()
            .name("Mug")
            .description("Stoneware mug")
            .price_cents(100u64)
            .currency("EURO")
            .build()
            .unwrap();
        assert_eq!(
            draft.validate(),
            Err(FieldProblem::InvalidCurrency("EURO".to_string()))
        );

        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_payload_keeps_image_order() {
        let payload = valid().into_payload(vec!["https://a".to_string(), "https://b".to_string()]);
        assert_eq!(payload.primary_image(), Some("https://a"));
        assert_eq!(payload.images.len(), 2);
        assert_eq!(payload.currency, "USD");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("product_id").is_none());
        assert_eq!(json["images"][1], "https://b");
    }
}
