//! Internal Diesel row structs for the `users` table.
//!
//! These never leave the persistence layer.

use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{NewUser, RecordId, UserId, UserRecord};

use super::schema::users;

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub external_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: NaiveDate,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord::from_new(
            RecordId::new(row.id),
            NewUser {
                external_id: UserId::from_uuid(row.external_id),
                full_name: row.full_name,
                email: row.email,
                phone: row.phone,
                created_at: row.created_at,
            },
        )
    }
}

/// Insertable row for a new user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub external_id: Uuid,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub created_at: NaiveDate,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            external_id: *user.external_id.as_uuid(),
            full_name: &user.full_name,
            email: &user.email,
            phone: &user.phone,
            created_at: user.created_at,
        }
    }
}

/// Changeset for the mutable user columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

impl<'a> From<&'a UserRecord> for UserUpdate<'a> {
    fn from(user: &'a UserRecord) -> Self {
        Self {
            full_name: user.full_name(),
            email: user.email(),
            phone: user.phone(),
        }
    }
}
