//! PostgreSQL gateways. Every call checks a connection out of the pool for that call only.

use super::{ProfileStore, TodoStore};
use crate::error::StoreError;
use crate::model::{NewProfile, NewTodo, Page, Profile, Todo};
use crate::sql::{self, Filter, OrderBy, PgBindValue, QueryBuf, Table};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

const PROFILES: Table = Table {
    name: "profiles",
    columns: &[
        "id",
        "username",
        "bio",
        "avatar_url",
        "birthdate",
        "user_id",
        "created_at",
        "updated_at",
    ],
};

const TODOS: Table = Table {
    name: "todos",
    columns: &["id", "title", "description", "completed", "created_at", "updated_at"],
};

async fn fetch_optional<T>(pool: &PgPool, q: QueryBuf) -> Result<Option<T>, StoreError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    Ok(query.fetch_optional(pool).await?)
}

async fn fetch_all<T>(pool: &PgPool, q: QueryBuf) -> Result<Vec<T>, StoreError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    Ok(query.fetch_all(pool).await?)
}

async fn fetch_exists(pool: &PgPool, q: QueryBuf) -> Result<bool, StoreError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_scalar::<_, bool>(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    Ok(query.fetch_one(pool).await?)
}

async fn execute(pool: &PgPool, q: QueryBuf) -> Result<u64, StoreError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    Ok(query.execute(pool).await?.rows_affected())
}

fn by_id(table: &Table, id: i64) -> QueryBuf {
    let mut q = sql::select_by_id(table);
    q.params.push(id.into());
    q
}

fn delete_by_id(table: &Table, id: i64) -> QueryBuf {
    let mut q = sql::delete(table);
    q.params.push(id.into());
    q
}

/// A `RETURNING` write that comes back empty means the row was removed concurrently.
fn returned<T>(row: Option<T>) -> Result<T, StoreError> {
    row.ok_or(StoreError::Db(sqlx::Error::RowNotFound))
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        PgProfileStore { pool }
    }

    fn values(
        username: &str,
        bio: &Option<String>,
        avatar_url: &Option<String>,
        birthdate: &Option<String>,
        user_id: &Option<String>,
        timestamps: &crate::model::Timestamps,
    ) -> Vec<PgBindValue> {
        vec![
            username.into(),
            bio.clone().into(),
            avatar_url.clone().into(),
            birthdate.clone().into(),
            user_id.clone().into(),
            timestamps.created_at.into(),
            timestamps.updated_at.into(),
        ]
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn create(&self, p: NewProfile) -> Result<Profile, StoreError> {
        let values = Self::values(&p.username, &p.bio, &p.avatar_url, &p.birthdate, &p.user_id, &p.timestamps);
        returned(fetch_optional(&self.pool, sql::insert(&PROFILES, values)).await?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        fetch_optional(&self.pool, by_id(&PROFILES, id)).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        let q = sql::select_list(
            &PROFILES,
            &[Filter::Eq("username", username.into())],
            &[],
            Page { skip: 0, limit: 1 },
        );
        fetch_optional(&self.pool, q).await
    }

    async fn username_exists(&self, username: &str, exclude_id: Option<i64>) -> Result<bool, StoreError> {
        let mut filters = vec![Filter::Eq("username", username.into())];
        if let Some(id) = exclude_id {
            filters.push(Filter::NotEq("id", id.into()));
        }
        fetch_exists(&self.pool, sql::exists(&PROFILES, &filters)).await
    }

    async fn search_by_username(&self, query: &str, page: Page) -> Result<Vec<Profile>, StoreError> {
        let q = sql::select_list(
            &PROFILES,
            &[Filter::Contains("username", query.to_string())],
            &[OrderBy::asc("username")],
            page,
        );
        fetch_all(&self.pool, q).await
    }

    async fn list(&self, page: Page) -> Result<Vec<Profile>, StoreError> {
        let q = sql::select_list(
            &PROFILES,
            &[],
            &[OrderBy::desc("created_at"), OrderBy::desc("id")],
            page,
        );
        fetch_all(&self.pool, q).await
    }

    async fn update(&self, p: &Profile) -> Result<Profile, StoreError> {
        let values = Self::values(&p.username, &p.bio, &p.avatar_url, &p.birthdate, &p.user_id, &p.timestamps);
        returned(fetch_optional(&self.pool, sql::update(&PROFILES, p.id, values)).await?)
    }

    async fn delete(&self, p: &Profile) -> Result<(), StoreError> {
        execute(&self.pool, delete_by_id(&PROFILES, p.id)).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        PgTodoStore { pool }
    }

    fn values(
        title: &str,
        description: &Option<String>,
        completed: bool,
        timestamps: &crate::model::Timestamps,
    ) -> Vec<PgBindValue> {
        vec![
            title.into(),
            description.clone().into(),
            completed.into(),
            timestamps.created_at.into(),
            timestamps.updated_at.into(),
        ]
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn create(&self, t: NewTodo) -> Result<Todo, StoreError> {
        let values = Self::values(&t.title, &t.description, t.completed, &t.timestamps);
        returned(fetch_optional(&self.pool, sql::insert(&TODOS, values)).await?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        fetch_optional(&self.pool, by_id(&TODOS, id)).await
    }

    async fn list(&self, page: Page, completed: Option<bool>) -> Result<Vec<Todo>, StoreError> {
        let filters: Vec<Filter> = completed
            .map(|c| Filter::Eq("completed", c.into()))
            .into_iter()
            .collect();
        let q = sql::select_list(
            &TODOS,
            &filters,
            &[OrderBy::desc("created_at"), OrderBy::desc("id")],
            page,
        );
        fetch_all(&self.pool, q).await
    }

    async fn update(&self, t: &Todo) -> Result<Todo, StoreError> {
        let values = Self::values(&t.title, &t.description, t.completed, &t.timestamps);
        returned(fetch_optional(&self.pool, sql::update(&TODOS, t.id, values)).await?)
    }

    async fn delete(&self, t: &Todo) -> Result<(), StoreError> {
        execute(&self.pool, delete_by_id(&TODOS, t.id)).await?;
        Ok(())
    }
}
