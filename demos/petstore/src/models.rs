use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PetKind {
    Cat,
    Dog,
    Bird,
}

/// The person a pet belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Owner {
    /// Given and family name.
    pub full_name: String,
    pub email_address: Option<String>,
}

/// A pet in the store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Pet {
    pub pet_id: u64,
    pub pet_name: String,
    pub kind: PetKind,
    pub owner: Option<Owner>,
}

/// Data needed to register a pet.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NewPet {
    /// Name the pet answers to.
    pub pet_name: String,
    pub kind: PetKind,
    pub owner: Option<Owner>,
}

/// A page of pets.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PetList {
    pub pets: Vec<Pet>,
    pub total_count: usize,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListQuery {
    /// Only pets whose name starts with this prefix.
    pub name_prefix: Option<String>,
    /// Maximum number of pets returned.
    pub page_size: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TraceHeaders {
    /// Correlation id echoed back on the response.
    pub x_request_id: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CreatedHeaders {
    /// Correlation id of the request that created the pet.
    pub x_request_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct Adoption {
    pub full_name: String,
}

/// Error payload.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody {
    pub error: String,
}
