use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry.
///
/// # Monetary Values
///
/// `price` is held as a `rust_decimal::Decimal` and written to and read from
/// JSON as a plain number through [`price`]. JSON numbers are parsed as `f64`
/// first, so a price carries at most the digits an `f64` keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, assigned by the server
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "price")]
    pub price: Decimal,
    pub category: String,
    /// Availability flag, omitted when never set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// Body of `POST /api/products`.
///
/// Unknown fields (including any client-supplied `id`) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "price")]
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

/// Body of `PUT /api/products/{id}`: every field is optional.
///
/// Applied as a shallow merge; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "price::option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl Product {
    /// Build a product from a create request, assigning a fresh UUIDv4 id.
    pub fn create(new: NewProduct) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), new)
    }

    /// Build a product with a caller-chosen id.
    pub fn with_id(id: impl Into<String>, new: NewProduct) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            in_stock: new.in_stock,
        }
    }

    /// Merge the supplied fields over this product. The id never changes.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if patch.in_stock.is_some() {
            self.in_stock = patch.in_stock;
        }
    }
}

/// JSON encoding for prices.
///
/// Whole prices are written as integers (`25`), anything else as an `f64`
/// (`19.99`). Reading rejects numbers a `Decimal` cannot hold without
/// rounding.
pub mod price {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::Deserialize;
    use serde::de::{self, Deserializer};
    use serde::ser::{self, Serializer};
    use serde_json::Number;
    use thiserror::Error;

    /// A JSON number that does not fit a `Decimal` price.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
    pub enum PriceError {
        #[error("Price is out of range")]
        OutOfRange,

        #[error("Price has too many decimal places")]
        TooPrecise,
    }

    /// Convert a JSON number into a `Decimal` without losing digits.
    ///
    /// # Errors
    ///
    /// [`PriceError::OutOfRange`] above the `Decimal` maximum,
    /// [`PriceError::TooPrecise`] when digits would be rounded away.
    pub fn from_number(number: &Number) -> Result<Decimal, PriceError> {
        if let Some(n) = number.as_u64() {
            return Ok(Decimal::from(n));
        }
        if let Some(n) = number.as_i64() {
            return Ok(Decimal::from(n));
        }

        let Some(value) = number.as_f64() else {
            return Err(PriceError::OutOfRange);
        };
        if value == 0.0 {
            return Ok(Decimal::ZERO);
        }

        // f64 Display is the shortest exact round-trip text, never exponent form
        Decimal::from_str_exact(&value.to_string()).map_err(|_| {
            if value.abs() >= 1.0 {
                PriceError::OutOfRange
            } else {
                PriceError::TooPrecise
            }
        })
    }

    pub fn serialize<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let price = price.normalize();
        if price.scale() == 0
            && let Some(whole) = price.to_i64()
        {
            return serializer.serialize_i64(whole);
        }

        let value: f64 = price
            .to_string()
            .parse()
            .map_err(|_| <S::Error as ser::Error>::custom("price is not a finite number"))?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let number = Number::deserialize(deserializer)?;
        from_number(&number).map_err(de::Error::custom)
    }

    /// `Option<Decimal>` variant; `null` reads as `None`.
    pub mod option {
        use rust_decimal::Decimal;
        use serde::Deserialize;
        use serde::de::{self, Deserializer};
        use serde_json::Number;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            Option::<Number>::deserialize(deserializer)?
                .map(|number| super::from_number(&number).map_err(de::Error::custom))
                .transpose()
        }
    }
}

/// The three records every fresh store starts with.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Laptop".to_string(),
            description: "High-performance laptop with 16GB RAM".to_string(),
            price: Decimal::from(1200),
            category: "electronics".to_string(),
            in_stock: Some(true),
        },
        Product {
            id: "2".to_string(),
            name: "Smartphone".to_string(),
            description: "Latest model with 128GB storage".to_string(),
            price: Decimal::from(800),
            category: "electronics".to_string(),
            in_stock: Some(true),
        },
        Product {
            id: "3".to_string(),
            name: "Coffee Maker".to_string(),
            description: "Programmable coffee maker with timer".to_string(),
            price: Decimal::from(50),
            category: "kitchen".to_string(),
            in_stock: Some(false),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn mouse() -> NewProduct {
        NewProduct {
            name: "Mouse".to_string(),
            description: "Wireless".to_string(),
            price: Decimal::from(25),
            category: "electronics".to_string(),
            in_stock: None,
        }
    }

    #[test]
    fn test_create_assigns_uuid() {
        let product = Product::create(mouse());

        assert!(Uuid::parse_str(&product.id).is_ok());
        assert_eq!(product.name, "Mouse");
        assert!(product.in_stock.is_none());
    }

    #[test]
    fn test_create_ids_are_unique() {
        let a = Product::create(mouse());
        let b = Product::create(mouse());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_patch_keeps_unspecified_fields() {
        let mut product = Product::with_id("7", mouse());
        product.apply(ProductPatch {
            price: Some(Decimal::from(99)),
            ..ProductPatch::default()
        });

        assert_eq!(product.id, "7");
        assert_eq!(product.name, "Mouse");
        assert_eq!(product.description, "Wireless");
        assert_eq!(product.price, Decimal::from(99));
    }

    #[test]
    fn test_apply_patch_sets_in_stock() {
        let mut product = Product::with_id("7", mouse());
        product.apply(ProductPatch {
            in_stock: Some(false),
            ..ProductPatch::default()
        });
        assert_eq!(product.in_stock, Some(false));
    }

    #[test]
    fn test_serializes_camel_case_and_numeric_price() {
        let mut new = mouse();
        new.price = Decimal::from_str("24.99").unwrap();
        new.in_stock = Some(true);
        let value = serde_json::to_value(Product::with_id("9", new)).unwrap();

        assert_eq!(value["inStock"], serde_json::json!(true));
        assert_eq!(value["price"].as_f64(), Some(24.99));
        assert!(value.get("in_stock").is_none());
    }

    #[test]
    fn test_in_stock_omitted_when_unset() {
        let value = serde_json::to_value(Product::with_id("9", mouse())).unwrap();
        assert!(value.get("inStock").is_none());
    }

    #[test]
    fn test_new_product_accepts_integer_price() {
        let new: NewProduct = serde_json::from_str(
            r#"{"name":"Mouse","description":"Wireless","price":25,"category":"electronics"}"#,
        )
        .unwrap();
        assert_eq!(new.price, Decimal::from(25));
    }

    #[test]
    fn test_new_product_ignores_client_id() {
        let new: NewProduct = serde_json::from_str(
            r#"{"id":"1","name":"Mouse","description":"Wireless","price":25,"category":"x"}"#,
        )
        .unwrap();
        let product = Product::create(new);
        assert_ne!(product.id, "1");
    }

    #[test]
    fn test_patch_deserializes_partial_body() {
        let patch: ProductPatch = serde_json::from_str(r#"{"price": 99}"#).unwrap();
        assert_eq!(patch.price, Some(Decimal::from(99)));
        assert!(patch.name.is_none());

        let empty: ProductPatch = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert!(empty.price.is_none());
    }

    #[test]
    fn test_whole_price_serializes_as_integer() {
        let value = serde_json::to_value(Product::with_id("9", mouse())).unwrap();
        assert_eq!(value["price"], serde_json::json!(25));
        assert!(value["price"].is_u64());

        let mut new = mouse();
        new.price = Decimal::from_str("25.00").unwrap();
        let value = serde_json::to_value(Product::with_id("9", new)).unwrap();
        assert!(value["price"].is_u64());
    }

    #[test]
    fn test_fractional_price_round_trips() {
        let new: NewProduct = serde_json::from_str(
            r#"{"name":"Mouse","description":"Wireless","price":19.99,"category":"x"}"#,
        )
        .unwrap();
        assert_eq!(new.price, Decimal::from_str("19.99").unwrap());

        let value = serde_json::to_value(Product::with_id("9", new)).unwrap();
        assert_eq!(value["price"].as_f64(), Some(19.99));
    }

    #[test]
    fn test_price_from_number_limits() {
        use price::{PriceError, from_number};

        let number = |v: serde_json::Value| match v {
            serde_json::Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        };

        assert_eq!(from_number(&number(serde_json::json!(0))), Ok(Decimal::ZERO));
        assert_eq!(from_number(&number(serde_json::json!(0.0))), Ok(Decimal::ZERO));
        assert_eq!(
            from_number(&number(serde_json::json!(0.25))),
            Ok(Decimal::from_str("0.25").unwrap())
        );
        assert_eq!(
            from_number(&number(serde_json::json!(1e29))),
            Err(PriceError::OutOfRange)
        );
        assert_eq!(
            from_number(&number(serde_json::json!(1e-30))),
            Err(PriceError::TooPrecise)
        );
    }

    #[test]
    fn test_out_of_range_price_fails_to_deserialize() {
        let result: Result<NewProduct, _> = serde_json::from_str(
            r#"{"name":"Mouse","description":"Wireless","price":1e29,"category":"x"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_seed_products() {
        let seeds = seed_products();
        let ids: Vec<&str> = seeds.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(seeds[0].name, "Laptop");
    }
}
