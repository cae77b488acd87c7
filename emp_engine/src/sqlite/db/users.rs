use chrono::Utc;
use emp_common::ObjectId;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{NewUser, User};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, sqlx::Error> {
    let now = Utc::now();
    let user: User = sqlx::query_as::<_, User>(
        r#"
            INSERT INTO users (id, first_name, last_name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *;
        "#,
    )
    .bind(user.id.unwrap_or_default())
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.email)
    .bind(now)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ User {} ({}) saved", user.id, user.email);
    Ok(user)
}

pub async fn fetch_user(id: &ObjectId, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await
}
