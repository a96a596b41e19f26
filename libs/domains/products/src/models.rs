use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;
use validator::Validate;

/// A catalog entry as stored in the document.
///
/// Fields the document carries beyond these are not preserved on rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Creation time in milliseconds since the epoch; unique and immutable
    pub id: i64,
    pub name: String,
    /// Always written as a number; numeric strings are accepted on read
    #[serde(deserialize_with = "price::required")]
    pub price: f64,
    pub category: String,
    /// Public image URL, empty when the product has no image
    #[serde(default)]
    pub image: String,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    #[serde(deserialize_with = "price::required")]
    pub price: f64,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(max = 2048))]
    #[serde(default)]
    pub image: String,
}

/// DTO for updating an existing product.
///
/// Absent fields keep their stored value. An `id` in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "price::optional")]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 2048))]
    pub image: Option<String>,
}

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadedImage {
    /// Site-relative path, e.g. `/1712345678901-rice.png`
    pub path: String,
    /// Raw-content URL of the committed file
    pub url: String,
}

/// Multipart form accepted by the image upload endpoint (documentation only).
#[derive(Debug, ToSchema)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Prices arrive either as JSON numbers or as numeric strings, the latter
/// from form fields submitted without conversion.
mod price {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceValue {
        Number(f64),
        Text(String),
    }

    impl PriceValue {
        fn into_f64<E: de::Error>(self) -> Result<f64, E> {
            let value = match self {
                PriceValue::Number(value) => value,
                PriceValue::Text(text) => text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| E::custom(format!("invalid price '{}'", text)))?,
            };
            if !value.is_finite() {
                return Err(E::custom("price must be a finite number"));
            }
            Ok(value)
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        PriceValue::deserialize(deserializer)?.into_f64()
    }

    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Option::<PriceValue>::deserialize(deserializer)?
            .map(PriceValue::into_f64)
            .transpose()
    }
}

impl Product {
    pub fn new(id: i64, input: CreateProduct) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
            category: input.category,
            image: input.image,
        }
    }

    /// Shallow merge: each present field replaces the stored one.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice() -> Product {
        Product {
            id: 1,
            name: "Rice".to_string(),
            price: 200.0,
            category: "Grains".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_apply_update_changes_only_present_fields() {
        let mut product = rice();
        product.apply_update(UpdateProduct {
            price: Some(50.0),
            ..Default::default()
        });

        assert_eq!(product.price, 50.0);
        assert_eq!(product.name, "Rice");
        assert_eq!(product.category, "Grains");
        assert_eq!(product.id, 1);
    }

    #[test]
    fn test_update_body_ignores_id() {
        let update: UpdateProduct =
            serde_json::from_str(r#"{"id": 99, "name": "Basmati"}"#).unwrap();
        let mut product = rice();
        product.apply_update(update);

        assert_eq!(product.id, 1);
        assert_eq!(product.name, "Basmati");
    }

    #[test]
    fn test_string_prices_are_read_and_written_as_numbers() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[{"id":1,"name":"Rice","price":"220","category":"Grains","image":""},
                {"id":2,"name":"Oil","price":450.5,"category":"Pantry","image":""}]"#,
        )
        .unwrap();
        assert_eq!(products[0].price, 220.0);
        assert_eq!(products[1].price, 450.5);

        let written = serde_json::to_value(&products[0]).unwrap();
        assert_eq!(written["price"], serde_json::json!(220.0));
    }

    #[test]
    fn test_string_prices_in_request_bodies() {
        let update: UpdateProduct = serde_json::from_str(r#"{"price": " 50 "}"#).unwrap();
        assert_eq!(update.price, Some(50.0));

        let update: UpdateProduct = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(update.price, None);

        let create: CreateProduct =
            serde_json::from_str(r#"{"name":"Oil","price":"12.5","category":"Pantry"}"#).unwrap();
        assert_eq!(create.price, 12.5);

        assert!(serde_json::from_str::<UpdateProduct>(r#"{"price": "cheap"}"#).is_err());
        assert!(serde_json::from_str::<UpdateProduct>(r#"{"price": "NaN"}"#).is_err());
    }

    #[test]
    fn test_product_image_defaults_to_empty() {
        let product: Product =
            serde_json::from_str(r#"{"id":1,"name":"Rice","price":200,"category":"Grains"}"#)
                .unwrap();
        assert_eq!(product.image, "");
        assert!(!product.has_image());
    }

    #[test]
    fn test_create_product_validation() {
        let valid = CreateProduct {
            name: "Oil".to_string(),
            price: 0.0,
            category: "Pantry".to_string(),
            image: String::new(),
        };
        assert!(valid.validate().is_ok());

        let negative = CreateProduct {
            price: -1.0,
            ..valid.clone()
        };
        assert!(negative.validate().is_err());

        let unnamed = CreateProduct {
            name: String::new(),
            ..valid
        };
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_update_product_validation() {
        let update = UpdateProduct {
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateProduct::default().validate().is_ok());
    }
}
