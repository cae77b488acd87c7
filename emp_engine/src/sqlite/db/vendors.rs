use chrono::Utc;
use emp_common::ObjectId;
use log::debug;
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::db_types::{VendorProfile, VendorService};

#[derive(FromRow)]
struct VendorProfileRow {
    user_id: ObjectId,
    services: Json<Vec<VendorService>>,
}

impl From<VendorProfileRow> for VendorProfile {
    fn from(row: VendorProfileRow) -> Self {
        VendorProfile::new(row.user_id, row.services.0)
    }
}

/// Creates the vendor's profile, or replaces the declared services if the vendor is already onboarded.
pub async fn upsert_vendor_profile(
    profile: VendorProfile,
    conn: &mut SqliteConnection,
) -> Result<VendorProfile, sqlx::Error> {
    let now = Utc::now();
    let row: VendorProfileRow = sqlx::query_as::<_, VendorProfileRow>(
        r#"
            INSERT INTO vendor_profiles (user_id, services, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (user_id) DO UPDATE SET services = excluded.services, updated_at = excluded.updated_at
            RETURNING user_id, services;
        "#,
    )
    .bind(profile.user_id)
    .bind(Json(profile.services))
    .bind(now)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Vendor profile for {} saved with {} services", row.user_id, row.services.0.len());
    Ok(row.into())
}

pub async fn fetch_vendor_profile(
    vendor_id: &ObjectId,
    conn: &mut SqliteConnection,
) -> Result<Option<VendorProfile>, sqlx::Error> {
    let row: Option<VendorProfileRow> =
        sqlx::query_as("SELECT user_id, services FROM vendor_profiles WHERE user_id = $1")
            .bind(vendor_id)
            .fetch_optional(conn)
            .await?;
    Ok(row.map(VendorProfile::from))
}

/// Fetches every vendor with at least one declared service in the given main category, in onboarding order.
pub async fn fetch_vendors_with_main_category(
    main_category_id: &ObjectId,
    conn: &mut SqliteConnection,
) -> Result<Vec<VendorProfile>, sqlx::Error> {
    let rows: Vec<VendorProfileRow> = sqlx::query_as(
        r#"
            SELECT user_id, services FROM vendor_profiles
            WHERE EXISTS (
                SELECT 1 FROM json_each(vendor_profiles.services) AS s
                WHERE json_extract(s.value, '$.mainCategoryId') = $1
            )
            ORDER BY rowid;
        "#,
    )
    .bind(main_category_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(VendorProfile::from).collect())
}
