use std::time::{Duration, Instant};

use dioxus::prelude::*;

/// Backend errors stay up longer; they are often a full sentence to read.
const INFO_TTL: Duration = Duration::from_secs(5);
const ERROR_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    fn ttl(self) -> Duration {
        match self {
            ToastKind::Info => INFO_TTL,
            ToastKind::Error => ERROR_TTL,
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "notification-toast notif-info",
            ToastKind::Error => "notification-toast notif-error",
        }
    }
}

#[derive(Store, Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// App-wide toasts. Replaces the blocking alert for failed requests and
/// rejected pulls.
#[derive(Store, Clone, PartialEq, Default)]
pub struct NotificationService {
    pub toasts: Vec<Toast>,
    pub next_id: u32,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[store(pub)]
impl Store<NotificationService> {
    fn push(&mut self, message: String, kind: ToastKind) {
        let id = self.next_id().cloned();
        self.next_id().set(id.wrapping_add(1));
        tracing::debug!(id, ?kind, "toast");
        self.toasts().push(Toast {
            id,
            message,
            kind,
            expires_at: Instant::now() + kind.ttl(),
        });
    }

    fn info(&mut self, message: String) {
        self.push(message, ToastKind::Info);
    }

    fn error(&mut self, message: String) {
        self.push(message, ToastKind::Error);
    }

    fn dismiss(&mut self, id: u32) {
        self.toasts().retain(|t| t.id != id);
    }

    fn expire(&mut self) {
        let now = Instant::now();
        self.toasts().retain(|t| t.expires_at > now);
    }
}

/// Newest toast on top. Click anywhere on a toast to dismiss it.
#[component]
pub fn NotificationLayer(mut notifs: Store<NotificationService>) -> Element {
    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            notifs.expire();
        }
    });

    let toasts = notifs.toasts().cloned();
    if toasts.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "notification-stack",
            for toast in toasts.into_iter().rev() {
                {
                    let id = toast.id;
                    rsx! {
                        div {
                            key: "{id}",
                            class: toast.kind.class(),
                            onclick: move |_| notifs.dismiss(id),
                            span { class: "notif-message", "{toast.message}" }
                            span { class: "notif-close", "\u{2715}" }
                        }
                    }
                }
            }
        }
    }
}
