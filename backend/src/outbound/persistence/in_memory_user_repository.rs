//! Process-local `UserRepository` used when no database is configured.
//!
//! Every port call runs inside one critical section, so the uniqueness check
//! and the write it guards cannot interleave with another writer. Violations
//! are reported under the same constraint names PostgreSQL uses.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    EMAIL_UNIQUE_CONSTRAINT, PHONE_UNIQUE_CONSTRAINT, UserPersistenceError, UserRepository,
};
use crate::domain::{NewUser, RecordId, UserId, UserRecord};

const EXTERNAL_ID_UNIQUE_CONSTRAINT: &str = "users_external_id_key";

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<RecordId, UserRecord>,
    last_id: i64,
}

impl Table {
    /// Name of the constraint `candidate` would break, ignoring the row
    /// keyed by `skip`.
    fn violated_constraint(
        &self,
        candidate_email: &str,
        candidate_phone: &str,
        candidate_external_id: &UserId,
        skip: Option<RecordId>,
    ) -> Option<&'static str> {
        let others = self.rows.values().filter(|row| Some(row.id()) != skip);
        for row in others {
            if row.external_id() == candidate_external_id {
                return Some(EXTERNAL_ID_UNIQUE_CONSTRAINT);
            }
            if row.email() == candidate_email {
                return Some(EMAIL_UNIQUE_CONSTRAINT);
            }
            if row.phone() == candidate_phone {
                return Some(PHONE_UNIQUE_CONSTRAINT);
            }
        }
        None
    }
}

/// In-memory user store keyed by ascending [`RecordId`].
///
/// # Examples
/// ```
/// use user_registry::outbound::persistence::InMemoryUserRepository;
///
/// let repository = InMemoryUserRepository::default();
/// # let _ = repository;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Table>, UserPersistenceError> {
        self.table.lock().map_err(|_| {
            warn!("in-memory user table lock poisoned");
            UserPersistenceError::query("user table lock poisoned")
        })
    }

    fn find_where(
        &self,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let table = self.lock()?;
        Ok(table.rows.values().find(|row| predicate(row)).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, UserPersistenceError> {
        let table = self.lock()?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_external_id(
        &self,
        external_id: &UserId,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.find_where(|row| row.external_id() == external_id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.find_where(|row| row.email() == email)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.find_where(|row| row.phone() == phone)
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, UserPersistenceError> {
        let table = self.lock()?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn insert(&self, user: &NewUser) -> Result<UserRecord, UserPersistenceError> {
        let mut table = self.lock()?;
        if let Some(constraint) =
            table.violated_constraint(&user.email, &user.phone, &user.external_id, None)
        {
            return Err(UserPersistenceError::unique_violation(constraint));
        }

        table.last_id += 1;
        let record = UserRecord::from_new(RecordId::new(table.last_id), user.clone());
        table.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>, UserPersistenceError> {
        let mut table = self.lock()?;
        if !table.rows.contains_key(&user.id()) {
            return Ok(None);
        }
        if let Some(constraint) = table.violated_constraint(
            user.email(),
            user.phone(),
            user.external_id(),
            Some(user.id()),
        ) {
            return Err(UserPersistenceError::unique_violation(constraint));
        }

        let Some(stored) = table.rows.get_mut(&user.id()) else {
            return Ok(None);
        };
        stored.set_full_name(user.full_name().to_owned());
        stored.set_email(user.email().to_owned());
        stored.set_phone(user.phone().to_owned());
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, user: &UserRecord) -> Result<bool, UserPersistenceError> {
        let mut table = self.lock()?;
        Ok(table.rows.remove(&user.id()).is_some())
    }
}
