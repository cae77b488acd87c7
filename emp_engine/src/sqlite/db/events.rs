use chrono::{DateTime, NaiveDate, Utc};
use emp_common::ObjectId;
use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::db_types::{Event, EventSearch, EventUpdate, NewEvent, PaymentStatus};

/// Inserts a new event with a `pending` payment status. This is not atomic. You can embed this call inside a
/// transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_event(event: NewEvent, conn: &mut SqliteConnection) -> Result<Event, sqlx::Error> {
    let now = Utc::now();
    let event: Event = sqlx::query_as::<_, Event>(
        r#"
            INSERT INTO events (
                id,
                user_id,
                title,
                event_description,
                date,
                city,
                location,
                is_event_venue,
                venue_service_id,
                service_price,
                admin_fee,
                payment_status,
                details,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            RETURNING *;
        "#,
    )
    .bind(event.id)
    .bind(event.user_id)
    .bind(event.title)
    .bind(event.event_description)
    .bind(event.date)
    .bind(event.city)
    .bind(event.location)
    .bind(event.is_event_venue)
    .bind(event.venue_service_id)
    .bind(event.service_price)
    .bind(event.admin_fee)
    .bind(PaymentStatus::Pending)
    .bind(Json(event.details))
    .bind(now)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Event {} [{}] saved for coordinator {}", event.id, event.title, event.user_id);
    Ok(event)
}

pub async fn fetch_event(id: &ObjectId, conn: &mut SqliteConnection) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_events_for_coordinator(
    coordinator_id: &ObjectId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events WHERE user_id = $1 ORDER BY rowid")
        .bind(coordinator_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_events_with_payment_status(
    status: PaymentStatus,
    conn: &mut SqliteConnection,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events WHERE payment_status = $1 ORDER BY rowid").bind(status).fetch_all(conn).await
}

/// Paid events whose date is on or after `from`. Only the `YYYY-MM-DD` prefix of the stored date is compared.
pub async fn fetch_upcoming_paid_events(
    from: NaiveDate,
    limit: u32,
    conn: &mut SqliteConnection,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT * FROM events
            WHERE payment_status = $1 AND date IS NOT NULL AND substr(date, 1, 10) >= $2
            ORDER BY substr(date, 1, 10), rowid
            LIMIT $3;
        "#,
    )
    .bind(PaymentStatus::Paid)
    .bind(from.format("%Y-%m-%d").to_string())
    .bind(limit)
    .fetch_all(conn)
    .await
}

pub async fn search_events(search: &EventSearch, conn: &mut SqliteConnection) -> Result<Vec<Event>, sqlx::Error> {
    let pattern = search.text().map(|text| format!("%{}%", escape_like(text)));
    sqlx::query_as(
        r#"
            SELECT * FROM events
            WHERE ($1 IS NULL OR title LIKE $1 ESCAPE '\' OR location LIKE $1 ESCAPE '\')
              AND ($2 IS NULL OR city = $2 COLLATE NOCASE)
            ORDER BY rowid;
        "#,
    )
    .bind(pattern)
    .bind(search.city())
    .fetch_all(conn)
    .await
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Returns `None` if the event does not exist.
pub async fn update_details(
    id: &ObjectId,
    update: EventUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Event>, sqlx::Error> {
    let event = sqlx::query_as::<_, Event>(
        r#"
            UPDATE events SET
                title = COALESCE($1, title),
                event_description = COALESCE($2, event_description),
                date = COALESCE($3, date),
                city = COALESCE($4, city),
                location = COALESCE($5, location),
                updated_at = $6
            WHERE id = $7
            RETURNING *;
        "#,
    )
    .bind(update.title)
    .bind(update.event_description)
    .bind(update.date)
    .bind(update.city)
    .bind(update.location)
    .bind(Utc::now())
    .bind(id)
    .fetch_all(conn)
    .await?
    .pop();
    if let Some(e) = &event {
        debug!("🗃️ Event {} [{}] details updated", e.id, e.title);
    }
    Ok(event)
}

/// Returns `None` if the event does not exist.
pub async fn update_payment(
    id: &ObjectId,
    status: PaymentStatus,
    reference: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    conn: &mut SqliteConnection,
) -> Result<Option<Event>, sqlx::Error> {
    let event: Option<Event> = sqlx::query_as::<_, Event>(
        r#"
            UPDATE events SET
                payment_status = $1,
                payment_reference = COALESCE($2, payment_reference),
                paid_at = $3,
                updated_at = $4
            WHERE id = $5
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(reference)
    .bind(paid_at)
    .bind(Utc::now())
    .bind(id)
    .fetch_all(conn)
    .await?
    .pop();
    if let Some(e) = &event {
        debug!("🗃️ Event {} payment status is now {}", e.id, e.payment_status);
    }
    Ok(event)
}
