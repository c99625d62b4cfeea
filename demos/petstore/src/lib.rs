//! A small pet store showing how route shapes become an OpenAPI document.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::Response;
use shapedoc::prelude::*;
use shapedoc::error_response;
use tokio::sync::RwLock;

pub mod models;

use models::{
    Adoption, CreatedHeaders, ErrorBody, ListQuery, NewPet, Owner, Pet, PetList, TraceHeaders,
};

/// In-memory pet storage shared by all handlers.
#[derive(Clone, Default)]
pub struct Store {
    pets: Arc<RwLock<Vec<Pet>>>,
}

fn not_found(pet_id: u64) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("pet {pet_id} not found"))
}

async fn list_pets(
    State(store): State<Store>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Typed<PetList> {
    let pets = store.pets.read().await;
    let matching: Vec<Pet> = pets
        .iter()
        .filter(|pet| {
            query
                .name_prefix
                .as_deref()
                .is_none_or(|prefix| pet.pet_name.starts_with(prefix))
        })
        .cloned()
        .collect();
    let total_count = matching.len();
    let pets = matching
        .into_iter()
        .take(query.page_size.unwrap_or(usize::MAX))
        .collect();
    Typed(PetList { pets, total_count })
}

async fn create_pet(
    State(store): State<Store>,
    ValidatedHeaders(headers): ValidatedHeaders<TraceHeaders>,
    ValidatedJson(new_pet): ValidatedJson<NewPet>,
) -> TypedResponse<Pet, CreatedHeaders> {
    let mut pets = store.pets.write().await;
    let pet = Pet {
        pet_id: pets.len() as u64 + 1,
        pet_name: new_pet.pet_name,
        kind: new_pet.kind,
        owner: new_pet.owner,
    };
    pets.push(pet.clone());
    tracing::info!(pet_id = pet.pet_id, "pet created");

    TypedResponse::new(pet, StatusCode::CREATED).with_headers(CreatedHeaders {
        x_request_id: headers.x_request_id,
    })
}

async fn get_pet(
    State(store): State<Store>,
    Path(pet_id): Path<u64>,
) -> Result<Typed<Pet>, Response> {
    let pets = store.pets.read().await;
    pets.iter()
        .find(|pet| pet.pet_id == pet_id)
        .cloned()
        .map(Typed)
        .ok_or_else(|| not_found(pet_id))
}

async fn adopt_pet(
    State(store): State<Store>,
    Path(pet_id): Path<u64>,
    ValidatedForm(adoption): ValidatedForm<Adoption>,
) -> Result<Typed<Pet>, Response> {
    let mut pets = store.pets.write().await;
    let pet = pets
        .iter_mut()
        .find(|pet| pet.pet_id == pet_id)
        .ok_or_else(|| not_found(pet_id))?;
    pet.owner = Some(Owner {
        full_name: adoption.full_name,
        email_address: None,
    });
    Ok(Typed(pet.clone()))
}

async fn delete_pet(
    State(store): State<Store>,
    Path(pet_id): Path<u64>,
) -> Result<StatusCode, Response> {
    let mut pets = store.pets.write().await;
    let before = pets.len();
    pets.retain(|pet| pet.pet_id != pet_id);
    if pets.len() == before {
        return Err(not_found(pet_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// The pet store routes, not yet finished into an `axum::Router`.
pub fn app() -> ApiRouter<Store> {
    ApiRouter::new("petstore")
        .route(
            "/pets",
            "list_pets",
            &[Method::GET],
            list_pets,
            RouteMeta::builder()
                .doc("List pets.\n\nResults can be filtered by name prefix and paged.")
                .tags(["pets"])
                .querystring::<ListQuery>()
                .response::<PetList>(200)
                .build(),
        )
        .route(
            "/pets",
            "create_pet",
            &[Method::POST],
            create_pet,
            RouteMeta::builder()
                .doc("Register a pet.")
                .tags(["pets"])
                .headers::<TraceHeaders>()
                .request::<NewPet>(DataSource::Json)
                .response_with_headers::<Pet, CreatedHeaders>(201)
                .build(),
        )
        .route(
            "/pets/<int:pet_id>",
            "get_pet",
            &[Method::GET],
            get_pet,
            RouteMeta::builder()
                .doc("Fetch one pet.")
                .tags(["pets"])
                .response::<Pet>(200)
                .response::<ErrorBody>(404)
                .build(),
        )
        .route(
            "/pets/<int:pet_id>/adopt",
            "adopt_pet",
            &[Method::POST],
            adopt_pet,
            RouteMeta::builder()
                .doc("Hand a pet over to a new owner.")
                .tags(["pets", "adoption"])
                .request::<Adoption>(DataSource::Form)
                .response::<Pet>(200)
                .response::<ErrorBody>(404)
                .build(),
        )
        .route(
            "/pets/<int:pet_id>",
            "delete_pet",
            &[Method::DELETE],
            delete_pet,
            RouteMeta::builder()
                .doc("Remove a pet from the store.")
                .tags(["pets"])
                .security([SecurityRequirement::new("bearer")])
                .deprecated()
                .response::<ErrorBody>(404)
                .build(),
        )
}
