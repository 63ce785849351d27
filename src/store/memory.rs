//! In-process gateways with the same ordering and uniqueness semantics as the PostgreSQL ones.
//! Used by the test suite and by `DATABASE_URL=memory://`.

use super::{ProfileStore, TodoStore};
use crate::error::StoreError;
use crate::model::{NewProfile, NewTodo, Page, Profile, Todo};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const USERNAME_CONSTRAINT: &str = "profiles_username_key";

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn read<T>(lock: &RwLock<Table<T>>) -> Result<RwLockReadGuard<'_, Table<T>>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
}

fn write<T>(lock: &RwLock<Table<T>>) -> Result<RwLockWriteGuard<'_, Table<T>>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
}

/// Newest first; ids break ties between rows created in the same instant.
fn newest_first<T, F>(rows: &mut [T], key: F)
where
    F: Fn(&T) -> (chrono::DateTime<chrono::Utc>, i64),
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[derive(Default)]
pub struct MemoryProfileStore {
    table: RwLock<Table<Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn taken(table: &Table<Profile>, username: &str, exclude_id: Option<i64>) -> bool {
        table
            .rows
            .values()
            .any(|p| p.username == username && Some(p.id) != exclude_id)
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let mut table = write(&self.table)?;
        if Self::taken(&table, &profile.username, None) {
            return Err(StoreError::UniqueViolation(USERNAME_CONSTRAINT.into()));
        }
        let id = table.allocate_id();
        let profile = profile.into_profile(id);
        table.rows.insert(id, profile.clone());
        Ok(profile)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        Ok(read(&self.table)?
            .rows
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str, exclude_id: Option<i64>) -> Result<bool, StoreError> {
        Ok(Self::taken(&*read(&self.table)?, username, exclude_id))
    }

    async fn search_by_username(&self, query: &str, page: Page) -> Result<Vec<Profile>, StoreError> {
        let needle = query.to_lowercase();
        let mut hits: Vec<Profile> = read(&self.table)?
            .rows
            .values()
            .filter(|p| p.username.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(page.slice(&hits))
    }

    async fn list(&self, page: Page) -> Result<Vec<Profile>, StoreError> {
        let mut all: Vec<Profile> = read(&self.table)?.rows.values().cloned().collect();
        newest_first(&mut all, |p| (p.timestamps.created_at, p.id));
        Ok(page.slice(&all))
    }

    async fn update(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut table = write(&self.table)?;
        if !table.rows.contains_key(&profile.id) {
            return Err(StoreError::Db(sqlx::Error::RowNotFound));
        }
        if Self::taken(&table, &profile.username, Some(profile.id)) {
            return Err(StoreError::UniqueViolation(USERNAME_CONSTRAINT.into()));
        }
        table.rows.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn delete(&self, profile: &Profile) -> Result<(), StoreError> {
        write(&self.table)?.rows.remove(&profile.id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTodoStore {
    table: RwLock<Table<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn create(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut table = write(&self.table)?;
        let id = table.allocate_id();
        let todo = todo.into_todo(id);
        table.rows.insert(id, todo.clone());
        Ok(todo)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn list(&self, page: Page, completed: Option<bool>) -> Result<Vec<Todo>, StoreError> {
        let mut hits: Vec<Todo> = read(&self.table)?
            .rows
            .values()
            .filter(|t| completed.map_or(true, |c| t.completed == c))
            .cloned()
            .collect();
        newest_first(&mut hits, |t| (t.timestamps.created_at, t.id));
        Ok(page.slice(&hits))
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, StoreError> {
        let mut table = write(&self.table)?;
        match table.rows.get_mut(&todo.id) {
            Some(row) => {
                *row = todo.clone();
                Ok(todo.clone())
            }
            None => Err(StoreError::Db(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete(&self, todo: &Todo) -> Result<(), StoreError> {
        write(&self.table)?.rows.remove(&todo.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamps;

    fn new_profile(username: &str) -> NewProfile {
        NewProfile {
            username: username.into(),
            bio: None,
            avatar_url: None,
            birthdate: None,
            user_id: None,
            timestamps: Timestamps::now(),
        }
    }

    #[tokio::test]
    async fn enforces_username_uniqueness_on_write() {
        let store = MemoryProfileStore::new();
        store.create(new_profile("jane")).await.unwrap();
        let err = store.create(new_profile("jane")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        // Case-sensitive: a different case is a different username.
        assert!(store.create(new_profile("Jane")).await.is_ok());
    }

    #[tokio::test]
    async fn update_rejects_taking_another_username() {
        let store = MemoryProfileStore::new();
        store.create(new_profile("jane")).await.unwrap();
        let mut bob = store.create(new_profile("bob")).await.unwrap();
        bob.username = "jane".into();
        assert!(matches!(
            store.update(&bob).await,
            Err(StoreError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn exists_honours_exclusion() {
        let store = MemoryProfileStore::new();
        let jane = store.create(new_profile("jane")).await.unwrap();
        assert!(store.username_exists("jane", None).await.unwrap());
        assert!(!store.username_exists("jane", Some(jane.id)).await.unwrap());
        assert!(!store.username_exists("JANE", None).await.unwrap());
    }

    #[tokio::test]
    async fn todo_ids_are_sequential() {
        let store = MemoryTodoStore::new();
        let make = |title: &str| NewTodo {
            title: title.into(),
            description: None,
            completed: false,
            timestamps: Timestamps::now(),
        };
        let a = store.create(make("a")).await.unwrap();
        let b = store.create(make("b")).await.unwrap();
        assert_eq!(b.id, a.id + 1);
        store.delete(&a).await.unwrap();
        assert!(store.get_by_id(a.id).await.unwrap().is_none());
    }
}
