use chrono::{DateTime, Utc};
use sqlx::Row;

use frontdesk_core::domain::business::{Business, BusinessId, Industry, UserId};

use super::{BusinessRepository, RepositoryError};
use crate::DbPool;

const SLUG_SUFFIX_ATTEMPTS: u32 = 50;

const BUSINESS_COLUMNS: &str =
    "id, owner_user_id, slug, name, tagline, description, industry, phone, email, website,
     address, hours, staff, branding, terms, services, faqs, testimonials, knowledge,
     created_at, updated_at";

pub struct SqlBusinessRepository {
    pool: DbPool,
}

impl SqlBusinessRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn get_text(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<String, RepositoryError> {
    row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))
}

pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// JSON columns decode leniently: a malformed or empty column yields the
/// type's default, preserving the always-present invariant for address,
/// hours, branding, and the list fields.
fn json_column<T: Default + serde::de::DeserializeOwned>(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<T, RepositoryError> {
    let raw = get_text(row, column)?;
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

pub(crate) fn row_to_business(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<Business, RepositoryError> {
    let mut business = Business::new(
        UserId(get_text(row, "owner_user_id")?),
        get_text(row, "name")?,
        Industry::parse(&get_text(row, "industry")?),
    );
    business.id = BusinessId(get_text(row, "id")?);
    business.slug = get_text(row, "slug")?;
    business.tagline = get_text(row, "tagline")?;
    business.description = get_text(row, "description")?;
    business.phone = get_text(row, "phone")?;
    business.email = get_text(row, "email")?;
    business.website = get_text(row, "website")?;
    business.address = json_column(row, "address")?;
    business.hours = json_column(row, "hours")?;
    business.staff = json_column(row, "staff")?;
    business.branding = json_column(row, "branding")?;
    business.terms = json_column(row, "terms")?;
    business.services = json_column(row, "services")?;
    business.faqs = json_column(row, "faqs")?;
    business.testimonials = json_column(row, "testimonials")?;
    business.knowledge = json_column(row, "knowledge")?;
    business.created_at = parse_timestamp(&get_text(row, "created_at")?);
    business.updated_at = parse_timestamp(&get_text(row, "updated_at")?);
    Ok(business)
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl BusinessRepository for SqlBusinessRepository {
    async fn find_by_id(&self, id: &BusinessId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM business WHERE id = ?"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_business(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM business WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_business(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Business>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM business
             WHERE owner_user_id = ? ORDER BY created_at, id"
        ))
        .bind(&user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_business).collect()
    }

    async fn create(&self, mut business: Business) -> Result<Business, RepositoryError> {
        let base_slug = business.slug.clone();
        for attempt in 0..SLUG_SUFFIX_ATTEMPTS {
            business.slug = if attempt == 0 {
                base_slug.clone()
            } else {
                format!("{base_slug}-{}", attempt + 1)
            };

            let result = sqlx::query(
                "INSERT INTO business (id, owner_user_id, slug, name, tagline, description,
                                       industry, phone, email, website, address, hours, staff,
                                       branding, terms, services, faqs, testimonials, knowledge,
                                       created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&business.id.0)
            .bind(&business.owner_user_id.0)
            .bind(&business.slug)
            .bind(&business.name)
            .bind(&business.tagline)
            .bind(&business.description)
            .bind(business.industry.as_str())
            .bind(&business.phone)
            .bind(&business.email)
            .bind(&business.website)
            .bind(encode_json(&business.address)?)
            .bind(encode_json(&business.hours)?)
            .bind(encode_json(&business.staff)?)
            .bind(encode_json(&business.branding)?)
            .bind(encode_json(&business.terms)?)
            .bind(encode_json(&business.services)?)
            .bind(encode_json(&business.faqs)?)
            .bind(encode_json(&business.testimonials)?)
            .bind(encode_json(&business.knowledge)?)
            .bind(business.created_at.to_rfc3339())
            .bind(business.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => return Ok(business),
                Err(sqlx::Error::Database(db_error))
                    if db_error.message().contains("business.slug") =>
                {
                    continue;
                }
                Err(other) => return Err(other.into()),
            }
        }
        Err(RepositoryError::SlugExhausted(base_slug))
    }

    async fn update(&self, business: &Business) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE business SET
                 name = ?, tagline = ?, description = ?, industry = ?, phone = ?, email = ?,
                 website = ?, address = ?, hours = ?, staff = ?, branding = ?, terms = ?,
                 services = ?, faqs = ?, testimonials = ?, knowledge = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&business.name)
        .bind(&business.tagline)
        .bind(&business.description)
        .bind(business.industry.as_str())
        .bind(&business.phone)
        .bind(&business.email)
        .bind(&business.website)
        .bind(encode_json(&business.address)?)
        .bind(encode_json(&business.hours)?)
        .bind(encode_json(&business.staff)?)
        .bind(encode_json(&business.branding)?)
        .bind(encode_json(&business.terms)?)
        .bind(encode_json(&business.services)?)
        .bind(encode_json(&business.faqs)?)
        .bind(encode_json(&business.testimonials)?)
        .bind(encode_json(&business.knowledge)?)
        .bind(Utc::now().to_rfc3339())
        .bind(&business.id.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &BusinessId) -> Result<(), RepositoryError> {
        // voice_agent and user_preference rows go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM business WHERE id = ?")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
