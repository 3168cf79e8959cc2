//! Restaurant repository interface

use async_trait::async_trait;

use super::model::Restaurant;
use crate::domain::DomainResult;

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Find restaurant by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Restaurant>>;

    /// Insert or replace a restaurant (seeding / admin tooling)
    async fn save(&self, restaurant: Restaurant) -> DomainResult<()>;
}
