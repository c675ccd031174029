use std::{collections::BTreeMap, sync::Arc};

use async_graphql::{Context, Error, InputObject, Object, Result, SimpleObject};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct User {
    pub username: String,
    pub enabled: bool,
    pub plan: Option<String>,
}

#[derive(Debug, InputObject)]
pub struct UserInput {
    pub username: String,
    #[graphql(default = true)]
    pub enabled: bool,
    pub plan: Option<String>,
}

/// Users administered through the schema, keyed and ordered by username.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl UserStore {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|user| (user.username.clone(), user)).collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.values().cloned().collect()
    }

    pub async fn get(&self, username: &str) -> Option<User> {
        self.users.read().await.get(username).cloned()
    }

    pub async fn upsert(&self, user: User) -> User {
        self.users.write().await.insert(user.username.clone(), user.clone());
        user
    }

    /// Removes the given users and returns how many existed.
    pub async fn delete(&self, usernames: &[String]) -> usize {
        let mut users = self.users.write().await;

        usernames
            .iter()
            .filter(|username| users.remove(username.as_str()).is_some())
            .count()
    }
}

#[derive(Debug, Default)]
pub struct UsersQuery;

#[Object]
impl UsersQuery {
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        Ok(ctx.data::<UserStore>()?.list().await)
    }

    async fn user(&self, ctx: &Context<'_>, username: String) -> Result<Option<User>> {
        Ok(ctx.data::<UserStore>()?.get(&username).await)
    }
}

#[derive(Debug, Default)]
pub struct UsersMutation;

#[Object]
impl UsersMutation {
    async fn create_or_update_user(&self, ctx: &Context<'_>, input: UserInput) -> Result<User> {
        let username = input.username.trim();

        if username.is_empty() {
            return Err(Error::new("username must not be empty"));
        }

        let user = User {
            username: username.to_string(),
            enabled: input.enabled,
            plan: input.plan,
        };

        tracing::info!(username = %user.username, enabled = user.enabled, "user created or updated");

        Ok(ctx.data::<UserStore>()?.upsert(user).await)
    }

    async fn delete_users(&self, ctx: &Context<'_>, usernames: Vec<String>) -> Result<u32> {
        let deleted = ctx.data::<UserStore>()?.delete(&usernames).await;

        tracing::info!(deleted, "users deleted");

        Ok(u32::try_from(deleted).unwrap_or(u32::MAX))
    }
}
