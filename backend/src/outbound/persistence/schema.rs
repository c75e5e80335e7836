//! Diesel table definitions.
//!
//! Must match `migrations/` exactly. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Sequence-assigned identifier.
        id -> Int8,
        /// Login name, unique (`users_user_name_key`).
        user_name -> Varchar,
        /// Contact mail, unique (`users_mail_key`).
        mail -> Varchar,
        /// Authorization profile code.
        profile -> Int2,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Customers.
    customers (id) {
        /// Sequence-assigned identifier.
        id -> Int8,
        name -> Varchar,
        last_name -> Varchar,
        /// Contact mail, unique (`customers_mail_key`).
        mail -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, customers);
