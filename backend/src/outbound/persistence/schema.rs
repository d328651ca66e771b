//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `migrations/` exactly; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `email` and `phone` carry the `users_email_key` and `users_phone_key`
    /// unique constraints.
    users (id) {
        /// Store-assigned key.
        id -> Int8,
        /// Caller-facing identifier.
        external_id -> Uuid,
        full_name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        /// Creation date (UTC).
        created_at -> Date,
    }
}
