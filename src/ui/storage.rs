//! Bookmarks backed by `localStorage`

use chrono::Utc;
use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::core::bookmarks::BOOKMARKS_STORAGE_KEY;
use crate::core::bookmarks::{Bookmark, BookmarkStorage, Bookmarks};
use crate::core::models::PollutionDeclaration;
use crate::ui::auth::AuthContext;

/// The browser's `localStorage`; a no-op on the server
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl BookmarkStorage for LocalStorage {
    #[cfg(feature = "hydrate")]
    fn load(&self) -> Option<String> {
        local_storage()?.get_item(BOOKMARKS_STORAGE_KEY).ok().flatten()
    }

    #[cfg(not(feature = "hydrate"))]
    fn load(&self) -> Option<String> {
        None
    }

    #[cfg(feature = "hydrate")]
    fn save(&self, data: &str) -> Result<(), String> {
        local_storage()
            .ok_or_else(|| "localStorage unavailable".to_string())?
            .set_item(BOOKMARKS_STORAGE_KEY, data)
            .map_err(|e| format!("{:?}", e))
    }

    #[cfg(not(feature = "hydrate"))]
    fn save(&self, _data: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Bookmarks of the signed-in user
#[derive(Clone, Copy)]
pub struct BookmarksContext {
    // Loaded after hydration so the server and client render the same count
    bookmarks: RwSignal<Option<Bookmarks<LocalStorage>>>,
    auth: AuthContext,
}

impl BookmarksContext {
    fn user_id(&self) -> Option<i64> {
        self.auth.user().map(|u| u.id)
    }

    fn user_id_untracked(&self) -> Option<i64> {
        self.auth.user_untracked().map(|u| u.id)
    }

    pub fn list(&self) -> Vec<Bookmark> {
        let Some(user_id) = self.user_id() else {
            return Vec::new();
        };
        self.bookmarks
            .with(|b| b.as_ref().map(|b| b.list(user_id).to_vec()))
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        let Some(user_id) = self.user_id() else {
            return 0;
        };
        self.bookmarks
            .with(|b| b.as_ref().map(|b| b.count(user_id)))
            .unwrap_or(0)
    }

    pub fn contains(&self, pollution_id: i64) -> bool {
        let Some(user_id) = self.user_id() else {
            return false;
        };
        self.bookmarks
            .with(|b| b.as_ref().is_some_and(|b| b.contains(user_id, pollution_id)))
    }

    /// Returns whether the declaration is now bookmarked
    pub fn toggle(&self, declaration: &PollutionDeclaration) -> bool {
        let Some(user_id) = self.user_id_untracked() else {
            return false;
        };
        let mut now_bookmarked = false;
        self.bookmarks.update(|b| {
            if let Some(b) = b {
                now_bookmarked = b.toggle(user_id, declaration, Utc::now());
            }
        });
        now_bookmarked
    }

    pub fn remove(&self, pollution_id: i64) {
        let Some(user_id) = self.user_id_untracked() else {
            return;
        };
        self.bookmarks.update(|b| {
            if let Some(b) = b {
                b.remove(user_id, pollution_id);
            }
        });
    }

    pub fn clear(&self) {
        let Some(user_id) = self.user_id_untracked() else {
            return;
        };
        self.bookmarks.update(|b| {
            if let Some(b) = b {
                b.clear(user_id);
            }
        });
    }
}

pub fn provide_bookmarks(auth: AuthContext) -> BookmarksContext {
    let bookmarks = RwSignal::new(None);
    Effect::new(move |_| bookmarks.set(Some(Bookmarks::load(LocalStorage))));

    let ctx = BookmarksContext { bookmarks, auth };
    provide_context(ctx);
    ctx
}

pub fn use_bookmarks() -> BookmarksContext {
    expect_context::<BookmarksContext>()
}
