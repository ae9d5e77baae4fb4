use dioxus::prelude::*;
use nebula_core::actions::DestructiveAction;
use nebula_core::pull::{self, Credentials, PullBusy};
use nebula_core::reassign::DragEntity;
use nebula_core::render::{device_summary, render_device_inventory, Interaction};
use nebula_core::session::ModalRequest;
use nebula_core::Session;
use tracing::info;

use crate::app::{use_api, Reload};
use crate::ui::cards::DeviceCardView;
use crate::ui::confirm::{request_action, use_action_runner, ConfirmDialog};
use crate::ui::modals::ModalHost;
use crate::ui::notification::{NotificationService, NotificationServiceStoreImplExt};

// ─── Page ─────────────────────────────────────────────────────

#[component]
pub fn Network() -> Element {
    let mut session = use_context::<Signal<Option<Session>>>();
    let mut modal = use_signal(|| None::<ModalRequest>);
    let confirm = use_signal(|| None::<DestructiveAction>);

    let on_interact = move |interaction: Interaction| {
        let request = session
            .write()
            .as_mut()
            .and_then(|s| s.dispatch(&interaction));
        modal.set(request);
    };

    let Some(current) = session.read().clone() else {
        return rsx! {};
    };
    let cards = render_device_inventory(&current.snapshot);
    let summary = device_summary(&current.snapshot);
    let settings = current.snapshot.settings.clone();

    rsx! {
        div { class: "page network",
            div { class: "toolbar",
                div {
                    h2 { "Infrastructure & Manual Devices" }
                    span { class: "device-summary", "{summary}" }
                }
                div { class: "toolbar-actions",
                    button {
                        class: "btn-primary",
                        onclick: move |_| {
                            let request = session.write().as_mut().map(|s| s.add_device());
                            modal.set(request);
                        },
                        "+ Add Manual Device"
                    }
                }
            }

            div { class: "network-layout",
                div { class: "card-grid",
                    for card in cards {
                        DeviceCardView {
                            key: "{card.id}",
                            card: card.clone(),
                            on_interact,
                            on_drag_start: move |_: DragEntity| {},
                            on_drag_end: move |_: ()| {},
                        }
                    }
                    if current.snapshot.network_devices.is_empty() {
                        div { class: "empty-state", "No network devices yet." }
                    }
                }
                aside { class: "unifi-panel",
                    match settings.unifi_host() {
                        Some(host) => rsx! {
                            UnifiInfo {
                                host: host.to_string(),
                                user: settings.unifi_user().unwrap_or_default().to_string(),
                                confirm,
                            }
                        },
                        None => rsx! {},
                    }
                    UnifiConnect { defaults: pull::unifi_form_defaults(&settings) }
                }
            }

            ModalHost { modal, confirm }
            ConfirmDialog { pending: confirm, on_done: move |_: ()| modal.set(None) }
        }
    }
}

// ─── UniFi ────────────────────────────────────────────────────

#[component]
fn UnifiInfo(host: String, user: String, confirm: Signal<Option<DestructiveAction>>) -> Element {
    let runner = use_action_runner(use_callback(|_: ()| {}));

    rsx! {
        div { class: "unifi-info",
            h3 { "UniFi Controller" }
            div { class: "info-row",
                span { class: "info-label", "Host" }
                span { "{host}" }
            }
            if !user.is_empty() {
                div { class: "info-row",
                    span { class: "info-label", "User" }
                    span { "{user}" }
                }
            }
            button {
                class: "btn-danger",
                onclick: move |_| request_action(DestructiveAction::DisconnectUnifi, confirm, runner),
                "Disconnect"
            }
        }
    }
}

/// Sync devices from a UniFi controller. The backend stores them; a reload
/// shows them.
#[component]
fn UnifiConnect(defaults: Credentials) -> Element {
    let api = use_api();
    let reload = use_context::<Reload>();
    let mut notifs = use_context::<Store<NotificationService>>();
    let mut creds = use_signal(|| defaults.clone());
    let mut busy = use_signal(|| false);
    let state = PullBusy(busy());
    let current = creds.read().clone();

    let submit = move |e: FormEvent| {
        e.prevent_default();
        let api = api.clone();
        let attempt = creds.read().clone();
        busy.set(true);
        spawn(async move {
            let result = pull::pull_unifi(api.as_ref(), &attempt).await;
            busy.set(false);
            match result {
                Ok(()) => {
                    info!(host = %attempt.host, "unifi sync done");
                    creds.write().password.clear();
                    notifs.info("UniFi devices synced.".to_string());
                    reload.bump();
                }
                Err(e) => notifs.error(e.alert_text()),
            }
        });
    };

    rsx! {
        form { class: "unifi-connect", onsubmit: submit,
            h3 { "Connect UniFi" }
            div { class: "form-row",
                label { "Controller" }
                input {
                    value: "{current.host}",
                    placeholder: "192.168.1.1",
                    required: true,
                    oninput: move |e| creds.write().host = e.value(),
                }
            }
            div { class: "form-row",
                label { "Username" }
                input {
                    value: "{current.user}",
                    required: true,
                    oninput: move |e| creds.write().user = e.value(),
                }
            }
            div { class: "form-row",
                label { "Password" }
                input {
                    r#type: "password",
                    value: "{current.password}",
                    required: true,
                    oninput: move |e| creds.write().password = e.value(),
                }
            }
            div { class: "form-actions",
                button {
                    r#type: "submit",
                    class: "btn-primary",
                    disabled: state.disabled(),
                    "{state.label()}"
                }
            }
        }
    }
}
