use crate::domain::product::Product;
use crate::domain::user::{Bookmark, DEFAULT_HISTORY_LIMIT, SessionUser, UserProfile};
use crate::repository::profile_repository::ProfileRepository;
use anyhow::{Context, Result};
use tracing::info;

/// Active user's search history and bookmarks, mirrored to durable storage.
///
/// Without a logged-in user every mutation is a no-op.
#[derive(Clone)]
pub struct UserProfileStore {
    repository: ProfileRepository,
    active: Option<UserProfile>,
    history_limit: usize,
}

impl UserProfileStore {
    pub fn new(repository: ProfileRepository) -> Self {
        Self::with_history_limit(repository, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(repository: ProfileRepository, history_limit: usize) -> Self {
        Self {
            repository,
            active: None,
            history_limit,
        }
    }

    pub fn active(&self) -> Option<&UserProfile> {
        self.active.as_ref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.active.as_ref().map(|p| &p.user)
    }

    pub fn search_history(&self) -> &[String] {
        self.active
            .as_ref()
            .map(|p| p.search_history.as_slice())
            .unwrap_or_default()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        self.active
            .as_ref()
            .map(|p| p.bookmarks.as_slice())
            .unwrap_or_default()
    }

    pub fn is_bookmarked(&self, product_id: &str) -> bool {
        self.active.as_ref().is_some_and(|p| p.is_bookmarked(product_id))
    }

    /// Activates `user`, loading their stored collections and recording the session.
    pub async fn login(&mut self, user: SessionUser) -> Result<()> {
        let name = user.name.clone();
        let history = self.repository.load_history(&name).await?;
        let bookmarks = self.repository.load_bookmarks(&name).await?;

        self.active = Some(UserProfile::new(user, history, bookmarks));
        if let Some(profile) = &self.active {
            self.repository
                .save_session(&profile.user)
                .await
                .context("Failed to record session")?;
        }

        info!(
            user = %name,
            history = self.search_history().len(),
            bookmarks = self.bookmarks().len(),
            "User logged in"
        );
        Ok(())
    }

    /// Restores the session recorded by a previous process, if any.
    pub async fn restore_session(&mut self) -> Result<bool> {
        match self.repository.load_session().await? {
            Some(user) => {
                self.login(user).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops the in-memory profile. Per-user records stay in storage.
    pub async fn logout(&mut self) -> Result<()> {
        if let Some(profile) = self.active.take() {
            info!(user = %profile.display_name(), "User logged out");
        }
        self.repository.clear_session().await
    }

    pub async fn record_search(&mut self, query: &str) -> Result<()> {
        let limit = self.history_limit;
        let Some(profile) = self.active.as_mut() else {
            return Ok(());
        };
        profile.push_search(query.to_string(), limit);
        self.persist().await
    }

    /// Returns whether the product is bookmarked afterwards.
    pub async fn toggle_bookmark(&mut self, product: &Product) -> Result<bool> {
        let Some(profile) = self.active.as_mut() else {
            return Ok(false);
        };
        let bookmarked = profile.toggle_bookmark(Bookmark::from(product));
        self.persist().await?;
        Ok(bookmarked)
    }

    async fn persist(&self) -> Result<()> {
        let Some(profile) = &self.active else {
            return Ok(());
        };
        let name = profile.display_name();

        self.repository
            .save_history(name, &profile.search_history)
            .await
            .with_context(|| format!("Failed to save search history for {}", name))?;
        self.repository
            .save_bookmarks(name, &profile.bookmarks)
            .await
            .with_context(|| format!("Failed to save bookmarks for {}", name))?;
        self.repository.save_session(&profile.user).await?;
        Ok(())
    }
}
