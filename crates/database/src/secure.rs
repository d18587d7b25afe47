use crate::components::DataComponents;
use crate::conditions::CrimeFilter;
use crate::error::DbError;
use core_types::{Capabilities, Frequency, GroupedRow, Permission, Scope, User};

/// Permission-checked access on top of any [`DataComponents`].
///
/// Every place a caller can name is checked against the places their
/// capabilities grant before a query runs.
pub struct SecureData<'a> {
    data: &'a dyn DataComponents,
}

impl<'a> SecureData<'a> {
    pub fn new(data: &'a dyn DataComponents) -> Self {
        Self { data }
    }

    /// The widest set of places the caller may query: every area for
    /// `SEE_ALL` holders, otherwise the caller's own area. The own area is
    /// always included, even before it has any records.
    pub async fn permitted_places(
        &self,
        user: &User,
        caps: &Capabilities,
    ) -> Result<Vec<String>, DbError> {
        if !caps.contains(Scope::All.required_permission()) {
            return Ok(vec![user.area.clone()]);
        }
        let mut places = self.data.all_places().await?;
        if !places.contains(&user.area) {
            places.push(user.area.clone());
            places.sort();
        }
        Ok(places)
    }

    /// Places visible under the requested scope.
    pub async fn get_secure_unique_places(
        &self,
        user: &User,
        caps: &Capabilities,
        scope: Scope,
    ) -> Result<Vec<String>, DbError> {
        match scope {
            Scope::Local => Ok(vec![user.area.clone()]),
            Scope::All if caps.contains(scope.required_permission()) => {
                self.permitted_places(user, caps).await
            }
            Scope::All => Err(DbError::MissingPermission(scope.required_permission())),
        }
    }

    /// Runs the grouped aggregation restricted to the caller's places.
    ///
    /// Any requested place outside the permitted set rejects the whole
    /// request. With no requested places the query covers the permitted set.
    pub async fn secure_fetch_grouped_data(
        &self,
        user: &User,
        caps: &Capabilities,
        filter: CrimeFilter,
        frequency: Frequency,
    ) -> Result<Vec<GroupedRow>, DbError> {
        let permitted = self.permitted_places(user, caps).await?;

        if let Some(requested) = filter.places() {
            if let Some(denied) = requested.iter().find(|p| !permitted.contains(p)) {
                tracing::warn!(email = %user.email, place = %denied, "Rejected place outside scope.");
                return Err(DbError::PlaceNotPermitted(denied.clone()));
            }
        }

        let filter = if filter.places().is_some() || caps.contains(Permission::SeeAll) {
            filter
        } else {
            filter.with_places(permitted)
        };

        self.data.fetch_grouped_data(&filter, frequency).await
    }
}
