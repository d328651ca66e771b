//! User record manager: the sole authority for create/read/update/delete
//! decisions over user records.
//!
//! Uniqueness of email and phone is pre-checked here to report the exact
//! conflicting field. The store's unique constraints remain the final
//! authority: a concurrent writer that slips past the pre-check surfaces as
//! [`UserPersistenceError::UniqueViolation`], which maps to
//! [`UserRecordError::Conflict`] rather than an internal error. The manager
//! holds no state between calls and takes no locks.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{
    UserPersistenceError, UserRecordError, UserRecordsCommand, UserRecordsQuery, UserRepository,
};
use crate::domain::{
    CreateUserInput, NewUser, UserField, UserId, UserPatch, UserRecord, validate_create_fields,
    validate_update_fields,
};

/// Service implementing the user record driving ports.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use user_registry::domain::UserRecordManager;
/// use user_registry::outbound::persistence::InMemoryUserRepository;
///
/// let manager = UserRecordManager::new(
///     Arc::new(InMemoryUserRepository::default()),
///     Arc::new(DefaultClock),
/// );
/// # let _ = manager;
/// ```
#[derive(Clone)]
pub struct UserRecordManager<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserRecordManager<R> {
    /// Create a manager over `repository`, stamping creation dates from `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> UserRecordManager<R>
where
    R: UserRepository,
{
    fn map_persistence_error(error: UserPersistenceError) -> UserRecordError {
        if matches!(error, UserPersistenceError::UniqueViolation { .. }) {
            let field = error.conflicting_field();
            debug!(?field, %error, "store rejected write on uniqueness");
            return UserRecordError::Conflict { field };
        }
        error!(%error, "user store failure");
        UserRecordError::Internal(error.to_string())
    }

    async fn require(&self, external_id: &UserId) -> Result<UserRecord, UserRecordError> {
        self.repository
            .find_by_external_id(external_id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                debug!(%external_id, "user record not found");
                UserRecordError::NotFound
            })
    }

    async fn ensure_email_free(
        &self,
        email: &str,
        owner: Option<&UserId>,
    ) -> Result<(), UserRecordError> {
        let holder = self
            .repository
            .find_by_email(email)
            .await
            .map_err(Self::map_persistence_error)?;
        Self::ensure_unclaimed(holder, owner, UserField::Email)
    }

    async fn ensure_phone_free(
        &self,
        phone: &str,
        owner: Option<&UserId>,
    ) -> Result<(), UserRecordError> {
        let holder = self
            .repository
            .find_by_phone(phone)
            .await
            .map_err(Self::map_persistence_error)?;
        Self::ensure_unclaimed(holder, owner, UserField::Phone)
    }

    fn ensure_unclaimed(
        holder: Option<UserRecord>,
        owner: Option<&UserId>,
        field: UserField,
    ) -> Result<(), UserRecordError> {
        match holder {
            Some(holder) if Some(holder.external_id()) != owner => {
                debug!(%field, holder = %holder.external_id(), "value already registered");
                Err(UserRecordError::conflict(field))
            }
            _ => Ok(()),
        }
    }

    /// Every stored record, in store order.
    pub async fn list_all(&self) -> Result<Vec<UserRecord>, UserRecordError> {
        self.repository
            .find_all()
            .await
            .map_err(Self::map_persistence_error)
    }

    /// The record addressed by `external_id`.
    pub async fn get_by_external_id(
        &self,
        external_id: &UserId,
    ) -> Result<UserRecord, UserRecordError> {
        self.require(external_id).await
    }

    /// Validate and store a new record with a fresh external identifier.
    pub async fn create(&self, input: CreateUserInput) -> Result<UserRecord, UserRecordError> {
        let fields = validate_create_fields(&input.trimmed())?;

        self.ensure_email_free(&fields.email, None).await?;
        self.ensure_phone_free(&fields.phone, None).await?;

        let new_user = NewUser {
            external_id: UserId::random(),
            full_name: fields.full_name,
            email: fields.email,
            phone: fields.phone,
            created_at: self.clock.utc().date_naive(),
        };
        let record = self
            .repository
            .insert(&new_user)
            .await
            .map_err(Self::map_persistence_error)?;
        debug!(external_id = %record.external_id(), "user record created");
        Ok(record)
    }

    /// Apply the present fields of `patch` to the addressed record.
    ///
    /// Values equal to the stored ones are no-ops and skip the uniqueness
    /// check, since they can only collide with the record itself.
    pub async fn update(
        &self,
        external_id: &UserId,
        patch: UserPatch,
    ) -> Result<UserRecord, UserRecordError> {
        let mut record = self.require(external_id).await?;
        let patch = patch.trimmed();
        validate_update_fields(&patch)?;

        let UserPatch {
            full_name,
            email,
            phone,
        } = patch;

        if let Some(full_name) = full_name.filter(|value| value != record.full_name()) {
            record.set_full_name(full_name);
        }
        if let Some(email) = email.filter(|value| value != record.email()) {
            self.ensure_email_free(&email, Some(external_id)).await?;
            record.set_email(email);
        }
        if let Some(phone) = phone.filter(|value| value != record.phone()) {
            self.ensure_phone_free(&phone, Some(external_id)).await?;
            record.set_phone(phone);
        }

        let updated = self
            .repository
            .update(&record)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                debug!(%external_id, "user record vanished before update");
                UserRecordError::NotFound
            })?;
        debug!(%external_id, "user record updated");
        Ok(updated)
    }

    /// Hard-delete the addressed record.
    pub async fn delete(&self, external_id: &UserId) -> Result<(), UserRecordError> {
        let record = self.require(external_id).await?;
        let removed = self
            .repository
            .delete(&record)
            .await
            .map_err(Self::map_persistence_error)?;
        if !removed {
            debug!(%external_id, "user record vanished before delete");
            return Err(UserRecordError::NotFound);
        }
        debug!(%external_id, "user record deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> UserRecordsQuery for UserRecordManager<R>
where
    R: UserRepository,
{
    async fn list_all(&self) -> Result<Vec<UserRecord>, UserRecordError> {
        UserRecordManager::list_all(self).await
    }

    async fn get_by_external_id(&self, external_id: &UserId) -> Result<UserRecord, UserRecordError> {
        UserRecordManager::get_by_external_id(self, external_id).await
    }
}

#[async_trait]
impl<R> UserRecordsCommand for UserRecordManager<R>
where
    R: UserRepository,
{
    async fn create(&self, input: CreateUserInput) -> Result<UserRecord, UserRecordError> {
        UserRecordManager::create(self, input).await
    }

    async fn update(
        &self,
        external_id: &UserId,
        patch: UserPatch,
    ) -> Result<UserRecord, UserRecordError> {
        UserRecordManager::update(self, external_id, patch).await
    }

    async fn delete(&self, external_id: &UserId) -> Result<(), UserRecordError> {
        UserRecordManager::delete(self, external_id).await
    }
}

#[cfg(test)]
#[path = "user_record_manager_tests.rs"]
mod tests;
