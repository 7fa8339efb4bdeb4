//! Toast notifications
//!
//! A [`NotificationManager`] is provided at the root of the app. Pages push
//! [`Notice`]s into it after every mutation; the container renders them in the
//! top right corner and removes them after their dismiss delay.

use std::collections::VecDeque;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::ApiError;
use crate::core::notice::{Notice, NoticeKind};
use crate::ui::timer::sleep_ms;

/// Maximum number of notifications to show at once
const MAX_NOTIFICATIONS: usize = 5;

/// Notification item with unique ID for tracking
#[derive(Clone, Debug)]
pub struct NotificationItem {
    pub id: u64,
    pub notice: Notice,
}

#[component]
pub fn NotificationsContainer() -> impl IntoView {
    let manager = use_notifications();
    let notifications = manager.notifications();

    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            <For
                each=move || notifications.get()
                key=|item| item.id
                children=move |item| view! { <NotificationToast item=item /> }
            />
        </div>
    }
}

#[component]
fn NotificationToast(item: NotificationItem) -> impl IntoView {
    let manager = use_notifications();
    let id = item.id;
    let (is_exiting, set_is_exiting) = signal(false);

    if let Some(ms) = item.notice.auto_dismiss_ms {
        spawn_local(async move {
            sleep_ms(ms).await;
            set_is_exiting.set(true);
            // Wait for exit animation
            sleep_ms(300).await;
            manager.dismiss(id);
        });
    }

    let class = format!("toast {}", item.notice.kind.css_class());
    let symbol = match item.notice.kind {
        NoticeKind::Success => "✓",
        NoticeKind::Error => "✕",
        NoticeKind::Warning => "!",
        NoticeKind::Info => "i",
    };

    view! {
        <div class=class class:toast-exiting=move || is_exiting.get()>
            <span class="toast-symbol">{symbol}</span>
            <p class="toast-message">{item.notice.message.clone()}</p>
            <button
                class="toast-close"
                aria-label="Fermer"
                on:click=move |_| manager.dismiss(id)
            >
                "×"
            </button>
        </div>
    }
}

/// Handle to the toast queue, cheap to copy into closures
#[derive(Clone, Copy)]
pub struct NotificationManager {
    notifications: RwSignal<VecDeque<NotificationItem>>,
    next_id: StoredValue<u64>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: RwSignal::new(VecDeque::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn notifications(&self) -> RwSignal<VecDeque<NotificationItem>> {
        self.notifications
    }

    pub fn notify(&self, notice: Notice) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.notifications.update(|n| {
            n.push_back(NotificationItem { id, notice });

            // Remove oldest if we exceed max
            while n.len() > MAX_NOTIFICATIONS {
                n.pop_front();
            }
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Notice::warning(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notice::info(message));
    }

    /// Toast for a failed API call
    pub fn api_error(&self, err: &ApiError) {
        leptos::logging::warn!("API call failed: {}", err);
        self.notify(Notice::from(err));
    }

    pub fn dismiss(&self, id: u64) {
        self.notifications.update(|n| n.retain(|i| i.id != id));
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_notifications() -> NotificationManager {
    let manager = NotificationManager::new();
    provide_context(manager);
    manager
}

pub fn use_notifications() -> NotificationManager {
    expect_context::<NotificationManager>()
}
