use dioxus::prelude::*;
use nebula_core::actions::DestructiveAction;
use nebula_core::partition::BucketId;
use nebula_core::reassign::{self, DragEntity, DropDecision};
use nebula_core::render::{render_dashboard, Card, DashboardView, Interaction, RackGroup};
use nebula_core::session::ModalRequest;
use nebula_core::Session;
use tracing::{debug, info};

use crate::app::{use_api, Reload};
use crate::ui::cards::{DeviceCardView, ServerCardView};
use crate::ui::confirm::ConfirmDialog;
use crate::ui::modals::ModalHost;
use crate::ui::notification::{NotificationService, NotificationServiceStoreImplExt};
use crate::ui::settings::SettingsPanel;

// ─── Page ─────────────────────────────────────────────────────

#[component]
pub fn Dashboard() -> Element {
    let api = use_api();
    let mut session = use_context::<Signal<Option<Session>>>();
    let reload = use_context::<Reload>();
    let notifs = use_context::<Store<NotificationService>>();
    let mut modal = use_signal(|| None::<ModalRequest>);
    let confirm = use_signal(|| None::<DestructiveAction>);
    let mut settings_open = use_signal(|| false);

    let on_interact = move |interaction: Interaction| {
        let request = session
            .write()
            .as_mut()
            .and_then(|s| s.dispatch(&interaction));
        modal.set(request);
    };

    let on_drag_start = move |entity: DragEntity| {
        if let Some(s) = session.write().as_mut() {
            s.reassign.begin(entity);
        }
    };

    let on_drag_end = move |_: ()| {
        if let Some(s) = session.write().as_mut() {
            s.reassign.cancel();
        }
    };

    let on_enter = move |target: BucketId| {
        // dragover fires continuously; only write on change
        let already = session
            .read()
            .as_ref()
            .is_some_and(|s| s.reassign.is_hovered(&target));
        if already {
            return;
        }
        if let Some(s) = session.write().as_mut() {
            s.reassign.enter(target);
        }
    };

    let on_leave = move |target: BucketId| {
        if let Some(s) = session.write().as_mut() {
            s.reassign.leave(&target);
        }
    };

    let on_drop = use_callback(move |target: BucketId| {
        let decision = match session.write().as_mut() {
            Some(s) => s.reassign.drop(&target, &s.snapshot),
            None => return,
        };
        let DropDecision::Reassign(re) = decision else {
            return;
        };
        let api = api.clone();
        let mut notifs = notifs;
        spawn(async move {
            match reassign::commit(api.as_ref(), &re).await {
                Ok(()) => {
                    info!(id = re.id(), "moved");
                    reload.bump();
                }
                Err(e) => notifs.error(e.alert_text("Failed to move item.")),
            }
        });
    });

    let Some(current) = session.read().clone() else {
        return rsx! {};
    };
    let view = render_dashboard(&current.snapshot);
    let enable_racks = current.snapshot.settings.enable_racks();
    debug!(cards = view.card_count(), "render dashboard");

    rsx! {
        div { class: "page dashboard",
            div { class: "toolbar",
                h2 { "Infrastructure" }
                div { class: "toolbar-actions",
                    if enable_racks {
                        button {
                            class: "btn-secondary",
                            onclick: move |_| {
                                let request = session.write().as_mut().map(|s| s.add_rack());
                                modal.set(request);
                            },
                            "+ Add Rack"
                        }
                    }
                    button {
                        class: "btn-primary",
                        onclick: move |_| {
                            let request = session.write().as_mut().map(|s| s.add_server());
                            modal.set(request);
                        },
                        "+ Add Server"
                    }
                    button {
                        class: "btn-ghost",
                        onclick: move |_| settings_open.set(true),
                        "Settings"
                    }
                }
            }

            match view {
                DashboardView::Empty { message } => rsx! {
                    div { class: "empty-state", "{message}" }
                },
                DashboardView::Flat { cards, placeholder } => rsx! {
                    div { class: "card-grid",
                        for card in cards {
                            CardView {
                                key: "{card.id()}",
                                card: card.clone(),
                                on_interact,
                                on_drag_start,
                                on_drag_end,
                            }
                        }
                    }
                    if let Some(text) = placeholder {
                        div { class: "empty-state", "{text}" }
                    }
                },
                DashboardView::Racks { groups } => rsx! {
                    div { class: "rack-list",
                        for group in groups {
                            RackGroupView {
                                key: "{group.header.name}-{bucket_key(&group.bucket)}",
                                hovered: current.reassign.is_hovered(&group.bucket),
                                group: group.clone(),
                                on_interact,
                                on_drag_start,
                                on_drag_end,
                                on_enter,
                                on_leave,
                                on_drop,
                            }
                        }
                    }
                },
            }

            ModalHost { modal, confirm }
            ConfirmDialog { pending: confirm, on_done: move |_: ()| modal.set(None) }
            if settings_open() {
                SettingsPanel { open: settings_open, confirm }
            }
        }
    }
}

fn bucket_key(bucket: &BucketId) -> &str {
    match bucket {
        BucketId::Rack(id) => id,
        BucketId::Unassigned => "unassigned",
    }
}

// ─── Rack group ───────────────────────────────────────────────

#[component]
fn RackGroupView(
    group: RackGroup,
    hovered: bool,
    on_interact: EventHandler<Interaction>,
    on_drag_start: EventHandler<DragEntity>,
    on_drag_end: EventHandler,
    on_enter: EventHandler<BucketId>,
    on_leave: EventHandler<BucketId>,
    on_drop: EventHandler<BucketId>,
) -> Element {
    let header_click = group.header.on_click.clone();
    let over = group.bucket.clone();
    let left = group.bucket.clone();
    let dropped = group.bucket.clone();
    let class = if hovered { "rack-group drag-over" } else { "rack-group" };

    rsx! {
        section {
            class: "{class}",
            ondragover: move |e: DragEvent| {
                e.prevent_default();
                on_enter.call(over.clone());
            },
            ondragleave: move |_| on_leave.call(left.clone()),
            ondrop: move |e: DragEvent| {
                e.prevent_default();
                on_drop.call(dropped.clone());
            },

            div {
                class: if header_click.is_some() { "rack-header clickable" } else { "rack-header" },
                onclick: move |_| {
                    if let Some(target) = header_click.clone() {
                        on_interact.call(target);
                    }
                },
                h3 { class: "rack-name", "{group.header.name}" }
                if let Some(loc) = &group.header.location {
                    span { class: "rack-location", "{loc}" }
                }
            }
            div { class: "rack-body",
                for card in group.cards.iter() {
                    CardView {
                        key: "{card.id()}",
                        card: card.clone(),
                        on_interact,
                        on_drag_start,
                        on_drag_end,
                    }
                }
                if group.cards.is_empty() {
                    div { class: "rack-empty", "Drop servers or devices here" }
                }
            }
        }
    }
}

#[component]
fn CardView(
    card: Card,
    on_interact: EventHandler<Interaction>,
    on_drag_start: EventHandler<DragEntity>,
    on_drag_end: EventHandler,
) -> Element {
    match card {
        Card::Server(card) => rsx! {
            ServerCardView { card, on_interact, on_drag_start, on_drag_end }
        },
        Card::Device(card) => rsx! {
            DeviceCardView { card, on_interact, on_drag_start, on_drag_end }
        },
    }
}
