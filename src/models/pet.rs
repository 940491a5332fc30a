//! Pet domain models

use serde::{Deserialize, Serialize};

use super::Link;

/// Collection path used in hypermedia links
pub const PETS_COLLECTION_HREF: &str = "/pets/";

/// Pet row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub pet_type: String,
    pub price: f64,
    pub breeder_id: String,
}

/// Create / full-replace payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, validator::Validate)]
pub struct PetIn {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub pet_type: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 36))]
    pub breeder_id: String,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, validator::Validate)]
pub struct PetUpdate {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub pet_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 36))]
    pub breeder_id: Option<String>,
}

/// Pet with hypermedia links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetOut {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub price: f64,
    pub breeder_id: String,
    pub links: Vec<Link>,
}

impl From<Pet> for PetOut {
    fn from(pet: Pet) -> Self {
        let self_href = pet_href(&pet.id);
        Self {
            id: pet.id,
            name: pet.name,
            pet_type: pet.pet_type,
            price: pet.price,
            breeder_id: pet.breeder_id,
            links: vec![
                Link::new("self", self_href),
                Link::new("collection", PETS_COLLECTION_HREF),
            ],
        }
    }
}

/// List query: `?limit=&offset=&type=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetFilterParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    #[serde(rename = "type")]
    pub pet_type: Option<String>,
}

impl PetFilterParams {
    /// Collection links, with `next` only when paginating
    pub fn links(&self) -> Vec<Link> {
        let mut links = vec![
            Link::new("self", PETS_COLLECTION_HREF),
            Link::new("collection", PETS_COLLECTION_HREF),
        ];

        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            let next_offset = u64::from(self.offset.unwrap_or(0)) + u64::from(limit);
            links.push(Link::new(
                "next",
                format!("{PETS_COLLECTION_HREF}?limit={limit}&offset={next_offset}"),
            ));
        }

        links
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetListResponse {
    pub data: Vec<PetOut>,
    pub links: Vec<Link>,
}

pub fn pet_href(id: &str) -> String {
    format!("{PETS_COLLECTION_HREF}{id}/")
}
