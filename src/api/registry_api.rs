// ==========================================
// Appliance Registry - Registry query API
// ==========================================
// Responsibility: paged listing, free-text search, lookup by
// business id, relation views and deletion over the imported
// collections
// Rule: no import logic here; rows only enter through the importer
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::document::{fields, from_document, str_field, Document, Filter};
use crate::domain::{Appliance, Fuel, User, UserAppliance, UserFuel};
use crate::importer::entity_registry::{EntityKind, KeySpec};
use crate::repository::{DocumentStore, Page};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Shortest accepted search query (after trimming)
pub const MIN_SEARCH_LENGTH: usize = 2;

// ==========================================
// Response types
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedDocuments {
    pub data: Vec<Document>,
    pub pagination: Pagination,
}

/// A user together with the link record that ties them to the subject
#[derive(Debug, Clone, Serialize)]
pub struct AssignedUser<L> {
    pub user: User,
    pub assignment: L,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplianceWithUsers {
    pub appliance: Appliance,
    pub users: Vec<AssignedUser<UserAppliance>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuelWithUsers {
    pub fuel: Fuel,
    pub users: Vec<AssignedUser<UserFuel>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignedAppliance {
    pub appliance: Appliance,
    pub assignment: UserAppliance,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignedFuel {
    pub fuel: Fuel,
    pub assignment: UserFuel,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWithRelations {
    pub user: User,
    pub appliances: Vec<AssignedAppliance>,
    pub fuels: Vec<AssignedFuel>,
}

// ==========================================
// RegistryApi
// ==========================================
pub struct RegistryApi<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> RegistryApi<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists a collection, newest first
    ///
    /// # Arguments
    /// - page: 1-based; 0 is read as 1
    /// - limit: page size, must be positive
    pub async fn list(&self, kind: EntityKind, page: u64, limit: u64) -> ApiResult<PagedDocuments> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit must be positive".to_string()));
        }
        let page = page.max(1);
        let collection = kind.collection_name();

        let data = self
            .store
            .find_many(collection, &Filter::new(), Page::of(page, limit))
            .await?;
        let total = self.store.count(collection).await?;
        debug!(collection, page, limit, total, "collection listed");

        Ok(paged(data, page, limit, total))
    }

    /// Case-insensitive substring search over the kind's text fields,
    /// newest first
    ///
    /// # Errors
    /// - InvalidInput: query shorter than MIN_SEARCH_LENGTH, zero limit,
    ///   or a link collection (nothing to search)
    pub async fn search(
        &self,
        kind: EntityKind,
        query: &str,
        page: u64,
        limit: u64,
    ) -> ApiResult<PagedDocuments> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LENGTH {
            return Err(ApiError::InvalidInput(format!(
                "search query must be at least {} characters",
                MIN_SEARCH_LENGTH
            )));
        }
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit must be positive".to_string()));
        }
        let fields = kind.search_fields();
        if fields.is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "{} records are not searchable",
                kind.type_name()
            )));
        }
        let page = page.max(1);
        let collection = kind.collection_name();

        let data = self
            .store
            .search(collection, fields, query, Page::of(page, limit))
            .await?;
        let total = self.store.count_matching(collection, fields, query).await?;
        debug!(collection, query, page, limit, total, "collection searched");

        Ok(paged(data, page, limit, total))
    }

    /// Raw document by business id (applianceId / fuelId / userId)
    pub async fn get_by_id(&self, kind: EntityKind, id: &str) -> ApiResult<Document> {
        let filter = id_filter(kind, id)?;
        self.store
            .find_one(kind.collection_name(), &filter)
            .await?
            .ok_or_else(|| not_found(kind, id))
    }

    pub async fn get_appliance(&self, appliance_id: &str) -> ApiResult<Appliance> {
        let doc = self.get_by_id(EntityKind::Appliances, appliance_id).await?;
        decode(EntityKind::Appliances, doc)
    }

    pub async fn get_fuel(&self, fuel_id: &str) -> ApiResult<Fuel> {
        let doc = self.get_by_id(EntityKind::Fuels, fuel_id).await?;
        decode(EntityKind::Fuels, doc)
    }

    pub async fn get_user(&self, user_id: &str) -> ApiResult<User> {
        let doc = self.get_by_id(EntityKind::Users, user_id).await?;
        decode(EntityKind::Users, doc)
    }

    /// Appliance plus every user linked to it
    pub async fn appliance_with_users(&self, appliance_id: &str) -> ApiResult<ApplianceWithUsers> {
        let appliance = self.get_appliance(appliance_id).await?;
        let users = self
            .assigned_users(EntityKind::UserAppliances, fields::APPLIANCE_ID, appliance_id)
            .await?;
        Ok(ApplianceWithUsers { appliance, users })
    }

    /// Fuel plus every user linked to it
    pub async fn fuel_with_users(&self, fuel_id: &str) -> ApiResult<FuelWithUsers> {
        let fuel = self.get_fuel(fuel_id).await?;
        let users = self
            .assigned_users(EntityKind::UserFuels, fields::FUEL_ID, fuel_id)
            .await?;
        Ok(FuelWithUsers { fuel, users })
    }

    /// User plus linked appliances and fuels
    ///
    /// Links whose partner record no longer exists are left out.
    pub async fn user_with_relations(&self, user_id: &str) -> ApiResult<UserWithRelations> {
        let user = self.get_user(user_id).await?;

        let mut appliances = Vec::new();
        for link in self.links(EntityKind::UserAppliances, fields::USER_ID, user_id).await? {
            let Some(appliance_id) = str_field(&link, fields::APPLIANCE_ID).map(str::to_string) else {
                continue;
            };
            if let Some(appliance) = self
                .find_typed::<Appliance>(EntityKind::Appliances, fields::APPLIANCE_ID, &appliance_id)
                .await?
            {
                appliances.push(AssignedAppliance {
                    appliance,
                    assignment: decode(EntityKind::UserAppliances, link)?,
                });
            }
        }

        let mut fuels = Vec::new();
        for link in self.links(EntityKind::UserFuels, fields::USER_ID, user_id).await? {
            let Some(fuel_id) = str_field(&link, fields::FUEL_ID).map(str::to_string) else {
                continue;
            };
            if let Some(fuel) = self
                .find_typed::<Fuel>(EntityKind::Fuels, fields::FUEL_ID, &fuel_id)
                .await?
            {
                fuels.push(AssignedFuel {
                    fuel,
                    assignment: decode(EntityKind::UserFuels, link)?,
                });
            }
        }

        Ok(UserWithRelations {
            user,
            appliances,
            fuels,
        })
    }

    /// Deletes a record by business id
    pub async fn delete(&self, kind: EntityKind, id: &str) -> ApiResult<()> {
        let filter = id_filter(kind, id)?;
        if !self.store.delete_one(kind.collection_name(), &filter).await? {
            return Err(not_found(kind, id));
        }
        info!(collection = kind.collection_name(), id, "record deleted");
        Ok(())
    }

    pub async fn count(&self, kind: EntityKind) -> ApiResult<u64> {
        Ok(self.store.count(kind.collection_name()).await?)
    }

    // ===== helpers =====

    async fn links(&self, link: EntityKind, field: &str, value: &str) -> ApiResult<Vec<Document>> {
        Ok(self
            .store
            .find_many(link.collection_name(), &Filter::new().eq(field, value), Page::all())
            .await?)
    }

    async fn find_typed<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        field: &str,
        value: &str,
    ) -> ApiResult<Option<T>> {
        self.store
            .find_one(kind.collection_name(), &Filter::new().eq(field, value))
            .await?
            .map(|doc| decode(kind, doc))
            .transpose()
    }

    async fn assigned_users<L: DeserializeOwned>(
        &self,
        link: EntityKind,
        partner_field: &str,
        partner_id: &str,
    ) -> ApiResult<Vec<AssignedUser<L>>> {
        let mut users = Vec::new();
        for doc in self.links(link, partner_field, partner_id).await? {
            let Some(user_id) = str_field(&doc, fields::USER_ID).map(str::to_string) else {
                continue;
            };
            if let Some(user) = self
                .find_typed::<User>(EntityKind::Users, fields::USER_ID, &user_id)
                .await?
            {
                users.push(AssignedUser {
                    user,
                    assignment: decode(link, doc)?,
                });
            }
        }
        Ok(users)
    }
}

fn paged(data: Vec<Document>, page: u64, limit: u64, total: u64) -> PagedDocuments {
    PagedDocuments {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }
}

fn id_filter(kind: EntityKind, id: &str) -> ApiResult<Filter> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::InvalidInput("id must not be empty".to_string()));
    }
    match kind.key_spec() {
        KeySpec::Single(field) => Ok(Filter::new().eq(field, id)),
        KeySpec::Composite => Err(ApiError::InvalidInput(format!(
            "{} records have no single id",
            kind.type_name()
        ))),
    }
}

fn not_found(kind: EntityKind, id: &str) -> ApiError {
    ApiError::NotFound(format!("{} {}", kind.collection_name(), id.trim()))
}

fn decode<T: DeserializeOwned>(kind: EntityKind, doc: Document) -> ApiResult<T> {
    from_document(doc).map_err(|e| {
        ApiError::InternalError(format!("stored {} document unreadable: {}", kind.collection_name(), e))
    })
}
