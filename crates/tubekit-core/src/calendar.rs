//! Content calendar store
//!
//! Local SQLite table of planned videos. Shares the cache's lifecycle:
//! construct, `init` at startup, `close` on shutdown.

use crate::cache::connect_file;
use crate::error::{Error, Result};
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, info, instrument};

/// Production stage of a planned video
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Rough idea
    Idea,
    /// Script in progress
    Scripting,
    /// Being filmed
    Filming,
    /// Being edited
    Editing,
    /// Ready to publish
    Ready,
    /// Live on the channel
    Published,
}

impl PlanStatus {
    /// All statuses in production order
    pub const ALL: [PlanStatus; 6] = [
        Self::Idea,
        Self::Scripting,
        Self::Filming,
        Self::Editing,
        Self::Ready,
        Self::Published,
    ];

    /// Storage name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Scripting => "scripting",
            Self::Filming => "filming",
            Self::Editing => "editing",
            Self::Ready => "ready",
            Self::Published => "published",
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown plan status: {s}"))
    }
}

/// A stored content plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPlan {
    /// Row id
    pub id: i64,
    /// Working title
    pub title: String,
    /// Target publish date (YYYY-MM-DD)
    pub planned_date: String,
    /// Production stage
    pub status: PlanStatus,
    /// Free-form notes
    pub notes: Option<String>,
    /// RFC 3339 creation time
    pub created_at: String,
    /// RFC 3339 last modification time
    pub updated_at: String,
}

/// Fields for a new plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewContentPlan {
    /// Working title
    pub title: String,
    /// Target publish date (YYYY-MM-DD)
    pub planned_date: String,
    /// Initial stage, `idea` when absent
    pub status: Option<PlanStatus>,
    /// Notes
    pub notes: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPlanUpdate {
    /// New title
    pub title: Option<String>,
    /// New date
    pub planned_date: Option<String>,
    /// New stage
    pub status: Option<PlanStatus>,
    /// New notes
    pub notes: Option<String>,
}

impl ContentPlanUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.planned_date.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFilter {
    /// Only this stage
    pub status: Option<PlanStatus>,
    /// Inclusive lower date bound
    pub date_from: Option<String>,
    /// Inclusive upper date bound
    pub date_to: Option<String>,
}

/// Plans plus a per-status count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanListing {
    /// Matching plans ordered by date
    pub plans: Vec<ContentPlan>,
    /// Number of matching plans
    pub total: usize,
    /// Count per status among the matches
    pub status_summary: BTreeMap<PlanStatus, usize>,
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite content calendar
pub struct CalendarStore {
    location: Location,
    pool: RwLock<Option<SqlitePool>>,
}

impl CalendarStore {
    /// Create a store backed by `db_path`
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(db_path.into()),
            pool: RwLock::new(None),
        }
    }

    /// Create an in-memory store (for testing)
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            pool: RwLock::new(None),
        }
    }

    /// Open the database and create the schema
    pub async fn init(&self) -> Result<()> {
        if self.pool().is_ok() {
            return Ok(());
        }

        let pool = match &self.location {
            Location::File(path) => connect_file(path).await?,
            Location::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await?,
        };

        run_migrations(&pool).await?;
        *self.pool.write().unwrap_or_else(|e| e.into_inner()) = Some(pool);
        info!(location = ?self.location, "Content calendar initialized");
        Ok(())
    }

    /// Close the database. Safe to call repeatedly.
    pub async fn close(&self) {
        let pool = self.pool.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(pool) = pool {
            pool.close().await;
            debug!("Content calendar closed");
        }
    }

    /// Insert a plan and return it
    #[instrument(skip(self, plan), fields(title = %plan.title))]
    pub async fn add(&self, plan: NewContentPlan) -> Result<ContentPlan> {
        let pool = self.pool()?;
        validate_title(&plan.title)?;
        validate_date(&plan.planned_date)?;

        let now = timestamp();
        let status = plan.status.unwrap_or(PlanStatus::Idea);
        let id = sqlx::query(
            r#"
            INSERT INTO content_plans (title, planned_date, status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&plan.title)
        .bind(&plan.planned_date)
        .bind(status.as_str())
        .bind(&plan.notes)
        .bind(&now)
        .bind(&now)
        .execute(&pool)
        .await?
        .last_insert_rowid();

        debug!(id, "Content plan added");
        self.get(id).await
    }

    /// Fetch a plan by id
    pub async fn get(&self, id: i64) -> Result<ContentPlan> {
        let pool = self.pool()?;
        let row = sqlx::query("SELECT * FROM content_plans WHERE id = ?")
            .bind(id)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("content plan {id}")))?;
        row_to_plan(&row)
    }

    /// List plans matching `filter`, earliest date first
    pub async fn list(&self, filter: &PlanFilter) -> Result<PlanListing> {
        let pool = self.pool()?;
        if let Some(from) = &filter.date_from {
            validate_date(from)?;
        }
        if let Some(to) = &filter.date_to {
            validate_date(to)?;
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM content_plans WHERE 1 = 1");
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(from) = &filter.date_from {
            query.push(" AND planned_date >= ").push_bind(from.clone());
        }
        if let Some(to) = &filter.date_to {
            query.push(" AND planned_date <= ").push_bind(to.clone());
        }
        query.push(" ORDER BY planned_date ASC, id ASC");

        let rows = query.build().fetch_all(&pool).await?;
        let plans = rows.iter().map(row_to_plan).collect::<Result<Vec<_>>>()?;

        let mut status_summary = BTreeMap::new();
        for plan in &plans {
            *status_summary.entry(plan.status).or_insert(0) += 1;
        }

        Ok(PlanListing {
            total: plans.len(),
            plans,
            status_summary,
        })
    }

    /// Apply a partial update and return the new row
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: ContentPlanUpdate) -> Result<ContentPlan> {
        let pool = self.pool()?;
        if update.is_empty() {
            return Err(Error::InvalidInput("no fields to update".to_string()));
        }
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(date) = &update.planned_date {
            validate_date(date)?;
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE content_plans SET ");
        let mut fields = query.separated(", ");
        if let Some(title) = update.title {
            fields.push("title = ").push_bind_unseparated(title);
        }
        if let Some(date) = update.planned_date {
            fields.push("planned_date = ").push_bind_unseparated(date);
        }
        if let Some(status) = update.status {
            fields.push("status = ").push_bind_unseparated(status.as_str());
        }
        if let Some(notes) = update.notes {
            fields.push("notes = ").push_bind_unseparated(notes);
        }
        fields.push("updated_at = ").push_bind_unseparated(timestamp());
        query.push(" WHERE id = ").push_bind(id);

        let affected = query.build().execute(&pool).await?.rows_affected();
        if affected == 0 {
            return Err(Error::NotFound(format!("content plan {id}")));
        }

        debug!(id, "Content plan updated");
        self.get(id).await
    }

    /// Delete a plan
    pub async fn delete(&self, id: i64) -> Result<()> {
        let pool = self.pool()?;
        let affected = sqlx::query("DELETE FROM content_plans WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound(format!("content plan {id}")));
        }
        debug!(id, "Content plan deleted");
        Ok(())
    }

    fn pool(&self) -> Result<SqlitePool> {
        self.pool
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| Error::Database("content calendar is not open".to_string()))
    }
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            planned_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'idea',
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_plans_date ON content_plans(planned_date)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_plans_status ON content_plans(status)")
        .execute(pool)
        .await?;

    Ok(())
}

fn row_to_plan(row: &SqliteRow) -> Result<ContentPlan> {
    let status_str: String = row.try_get("status")?;
    let status: PlanStatus = status_str.parse().map_err(Error::Serialization)?;

    Ok(ContentPlan {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        planned_date: row.try_get("planned_date")?,
        status,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("title must not be empty".to_string()));
    }
    Ok(())
}

fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| Error::InvalidInput(format!("invalid date '{date}', expected YYYY-MM-DD")))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> CalendarStore {
        let store = CalendarStore::in_memory();
        store.init().await.unwrap();
        store
    }

    fn plan(title: &str, date: &str, status: Option<PlanStatus>) -> NewContentPlan {
        NewContentPlan {
            title: title.to_string(),
            planned_date: date.to_string(),
            status,
            notes: None,
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("filming".parse::<PlanStatus>(), Ok(PlanStatus::Filming));
        assert!("shipping".parse::<PlanStatus>().is_err());
        assert_eq!(PlanStatus::Ready.to_string(), "ready");
    }

    #[tokio::test]
    async fn test_add_defaults_to_idea() {
        let store = store().await;
        let added = store
            .add(plan("Rust async deep dive", "2024-07-01", None))
            .await
            .unwrap();

        assert_eq!(added.status, PlanStatus::Idea);
        assert_eq!(added.title, "Rust async deep dive");
        assert_eq!(added.created_at, added.updated_at);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_date() {
        let store = store().await;
        let err = store.add(plan("x", "July 1st", None)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let store = store().await;
        store.add(plan("c", "2024-07-20", Some(PlanStatus::Editing))).await.unwrap();
        store.add(plan("a", "2024-07-01", None)).await.unwrap();
        store.add(plan("b", "2024-07-10", Some(PlanStatus::Editing))).await.unwrap();

        let all = store.list(&PlanFilter::default()).await.unwrap();
        let titles: Vec<_> = all.plans.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        assert_eq!(all.total, 3);
        assert_eq!(all.status_summary.get(&PlanStatus::Editing), Some(&2));
        assert_eq!(all.status_summary.get(&PlanStatus::Idea), Some(&1));

        let editing = store
            .list(&PlanFilter {
                status: Some(PlanStatus::Editing),
                date_to: Some("2024-07-15".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(editing.total, 1);
        assert_eq!(editing.plans[0].title, "b");
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let store = store().await;
        let added = store.add(plan("draft", "2024-08-01", None)).await.unwrap();

        let updated = store
            .update(
                added.id,
                ContentPlanUpdate {
                    status: Some(PlanStatus::Scripting),
                    notes: Some("outline done".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "draft");
        assert_eq!(updated.status, PlanStatus::Scripting);
        assert_eq!(updated.notes.as_deref(), Some("outline done"));
    }

    #[tokio::test]
    async fn test_update_errors() {
        let store = store().await;
        let added = store.add(plan("draft", "2024-08-01", None)).await.unwrap();

        let empty = store.update(added.id, ContentPlanUpdate::default()).await;
        assert!(matches!(empty, Err(Error::InvalidInput(_))));

        let missing = store
            .update(
                999,
                ContentPlanUpdate {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store().await;
        let added = store.add(plan("gone", "2024-08-01", None)).await.unwrap();

        store.delete(added.id).await.unwrap();
        assert!(matches!(store.get(added.id).await, Err(Error::NotFound(_))));
        assert!(matches!(store.delete(added.id).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_closed_store_errors() {
        let store = store().await;
        store.close().await;
        store.close().await;
        assert!(matches!(
            store.list(&PlanFilter::default()).await,
            Err(Error::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.db");

        let store = CalendarStore::new(&path);
        store.init().await.unwrap();
        store.add(plan("kept", "2024-09-09", None)).await.unwrap();
        store.close().await;

        let store = CalendarStore::new(&path);
        store.init().await.unwrap();
        assert_eq!(store.list(&PlanFilter::default()).await.unwrap().total, 1);
        store.close().await;
    }
}
