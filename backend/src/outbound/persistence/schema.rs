//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique (case-insensitive index).
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Text,
        role -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job catalogue, written by the catalogue service and read here.
    jobs (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        location -> Text,
        job_type -> Varchar,
        company -> Text,
        posted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Applications; `(job_id, user_id)` is unique.
    applications (id) {
        id -> Uuid,
        job_id -> Uuid,
        user_id -> Uuid,
        resume_ref -> Varchar,
        message -> Nullable<Text>,
        status -> Varchar,
        applied_at -> Timestamptz,
    }
}

diesel::table! {
    /// Favorite-job membership keyed by `(user_id, job_id)`.
    user_favorites (user_id, job_id) {
        user_id -> Uuid,
        job_id -> Uuid,
        added_at -> Timestamptz,
    }
}

diesel::joinable!(applications -> jobs (job_id));
diesel::joinable!(applications -> users (user_id));
diesel::joinable!(user_favorites -> jobs (job_id));
diesel::joinable!(user_favorites -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, jobs, applications, user_favorites);
