// ==========================================
// Appliance Registry - API layer
// ==========================================
// Responsibility: read/delete operations over imported records
// ==========================================

pub mod error;
pub mod registry_api;

pub use error::{ApiError, ApiResult};
pub use registry_api::{
    ApplianceWithUsers, AssignedAppliance, AssignedFuel, AssignedUser, FuelWithUsers,
    PagedDocuments, Pagination, RegistryApi, UserWithRelations, DEFAULT_PAGE_LIMIT,
    MIN_SEARCH_LENGTH,
};
