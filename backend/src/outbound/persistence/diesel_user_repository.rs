//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Each port call is a single statement, so email/phone uniqueness is decided
//! by the `users_email_key` and `users_phone_key` constraints at write time.
//! A violation is reported with the constraint name so the domain can tell
//! which field lost the race.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, RecordId, UserId, UserRecord};

use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch the single row matched by `query`, if any.
    async fn find_one(
        &self,
        query: users::BoxedQuery<'static, Pg>,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = query
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(UserRecord::from))
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserPersistenceError::unique_violation(info.constraint_name().unwrap_or("unknown"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserPersistenceError::query("database error"),
        _ => UserPersistenceError::query("database error"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.find_one(users::table.into_boxed().filter(users::id.eq(id.get())))
            .await
    }

    async fn find_by_external_id(
        &self,
        external_id: &UserId,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.find_one(
            users::table
                .into_boxed()
                .filter(users::external_id.eq(*external_id.as_uuid())),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.find_one(
            users::table
                .into_boxed()
                .filter(users::email.eq(email.to_owned())),
        )
        .await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.find_one(
            users::table
                .into_boxed()
                .filter(users::phone.eq(phone.to_owned())),
        )
        .await
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn insert(&self, user: &NewUser) -> Result<UserRecord, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row.into())
    }

    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.filter(users::id.eq(user.id().get())))
            .set(UserUpdate::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(UserRecord::from))
    }

    async fn delete(&self, user: &UserRecord) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(users::table.filter(users::id.eq(user.id().get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;
    use crate::domain::UserField;
    use crate::domain::ports::{EMAIL_UNIQUE_CONSTRAINT, PHONE_UNIQUE_CONSTRAINT};

    struct ConstraintInfo(&'static str);

    impl DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("users")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(err, UserPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    #[case(EMAIL_UNIQUE_CONSTRAINT, Some(UserField::Email))]
    #[case(PHONE_UNIQUE_CONSTRAINT, Some(UserField::Phone))]
    #[case("users_external_id_key", None)]
    fn unique_violation_keeps_constraint_name(
        #[case] constraint: &'static str,
        #[case] field: Option<UserField>,
    ) {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintInfo(constraint)),
        ));

        assert_eq!(err, UserPersistenceError::unique_violation(constraint));
        assert_eq!(err.conflicting_field(), field);
    }

    #[rstest]
    fn unique_violation_without_constraint_is_unattributed() {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        ));

        assert_eq!(err, UserPersistenceError::unique_violation("unknown"));
        assert_eq!(err.conflicting_field(), None);
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));

        assert!(matches!(err, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::DatabaseError(
        DatabaseErrorKind::CheckViolation,
        Box::new("check failed".to_owned()),
    ))]
    fn other_failures_map_to_query_error(#[case] error: DieselError) {
        assert!(matches!(
            map_diesel_error(error),
            UserPersistenceError::Query { .. }
        ));
    }
}
