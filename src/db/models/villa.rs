//! Villa catalog models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Villa {
    pub id: String,
    pub name: String,
    /// Nightly rate in baht
    pub price: i64,
    pub guests: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub size_sqm: i64,
    pub image_url: String,
    pub description: String,
    /// JSON array of feature strings
    pub features: String,
    /// JSON array of image paths
    pub images: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Response DTO with the JSON-in-TEXT columns decoded into lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VillaResponse {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub guests: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub size_sqm: i64,
    pub image_url: String,
    pub description: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Villa> for VillaResponse {
    fn from(villa: Villa) -> Self {
        Self {
            features: parse_string_list(&villa.features),
            images: parse_string_list(&villa.images),
            id: villa.id,
            name: villa.name,
            price: villa.price,
            guests: villa.guests,
            bedrooms: villa.bedrooms,
            bathrooms: villa.bathrooms,
            size_sqm: villa.size_sqm,
            image_url: villa.image_url,
            description: villa.description,
            created_at: villa.created_at,
            updated_at: villa.updated_at,
        }
    }
}

/// Decode a JSON string array stored in a TEXT column; an unreadable
/// value degrades to an empty list rather than failing the read.
fn parse_string_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct CreateVillaRequest {
    pub name: String,
    pub price: i64,
    pub guests: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub size_sqm: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVillaRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub guests: Option<i64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub size_sqm: Option<i64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_list() {
        assert_eq!(
            parse_string_list(r#"["Private Pool","Mountain View"]"#),
            vec!["Private Pool".to_string(), "Mountain View".to_string()]
        );
        assert!(parse_string_list("[]").is_empty());
        assert!(parse_string_list("not json").is_empty());
    }
}
