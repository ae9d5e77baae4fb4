use dioxus::prelude::*;
use nebula_core::actions::DestructiveAction;
use nebula_core::{Palette, Session, SettingsPatch};

use crate::app::{use_api, Reload};
use crate::ui::confirm::{request_action, use_action_runner};
use crate::ui::notification::{NotificationService, NotificationServiceStoreImplExt};

#[component]
pub fn SettingsPanel(mut open: Signal<bool>, confirm: Signal<Option<DestructiveAction>>) -> Element {
    let api = use_api();
    let session = use_context::<Signal<Option<Session>>>();
    let mut palette = use_context::<Signal<Palette>>();
    let reload = use_context::<Reload>();
    let notifs = use_context::<Store<NotificationService>>();
    let runner = use_action_runner(use_callback(move |_: ()| open.set(false)));

    let save = use_callback(move |patch: SettingsPatch| {
        let api = api.clone();
        let mut notifs = notifs;
        spawn(async move {
            match api.update_settings(&patch).await {
                Ok(()) => reload.bump(),
                Err(e) => {
                    tracing::warn!("settings update failed: {e}");
                    notifs.error(e.alert_text("Failed to save settings."));
                }
            }
        });
    });

    let (enable_racks, show_network) = match session.read().as_ref() {
        Some(s) => (
            s.snapshot.settings.enable_racks(),
            s.snapshot.settings.show_network_in_dashboard(),
        ),
        None => (false, false),
    };
    let current = palette();

    rsx! {
        div { class: "modal-backdrop", onclick: move |_| open.set(false),
            div {
                class: "modal settings-panel",
                onclick: move |e: MouseEvent| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { "Settings" }
                    button { class: "modal-close", onclick: move |_| open.set(false), "\u{2715}" }
                }

                div { class: "form-row",
                    label { "Color palette" }
                    select {
                        onchange: move |e| {
                            let Some(next) = Palette::parse(&e.value()) else {
                                return;
                            };
                            palette.set(next);
                            save.call(SettingsPatch::new().palette(next));
                        },
                        for p in Palette::ALL {
                            option {
                                key: "{p.as_str()}",
                                value: p.as_str(),
                                selected: p == current,
                                "{p.label()}"
                            }
                        }
                    }
                }

                label { class: "toggle-row",
                    input {
                        r#type: "checkbox",
                        checked: enable_racks,
                        onchange: move |e| save.call(SettingsPatch::new().enable_racks(e.checked())),
                    }
                    "Organize servers into racks"
                }

                if enable_racks {
                    label { class: "toggle-row",
                        input {
                            r#type: "checkbox",
                            checked: show_network,
                            onchange: move |e| {
                                save.call(SettingsPatch::new().show_network_in_dashboard(e.checked()))
                            },
                        }
                        "Show network devices on the dashboard"
                    }
                }

                div { class: "danger-zone",
                    h3 { "Danger zone" }
                    button {
                        class: "btn-danger",
                        onclick: move |_| request_action(DestructiveAction::ResetAll, confirm, runner),
                        "Reset all servers and services"
                    }
                }
            }
        }
    }
}
