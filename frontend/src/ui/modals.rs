use dioxus::prelude::*;
use nebula_core::actions::DestructiveAction;
use nebula_core::forms::{rack_options, DeviceForm, RackForm, ServerForm, ServiceForm};
use nebula_core::pull::{self, ProxmoxVm, PullBusy};
use nebula_core::session::ModalRequest;
use nebula_core::{ApiError, Session};

use crate::app::{use_api, Reload};
use crate::ui::confirm::{request_action, use_action_runner};
use crate::ui::notification::{NotificationService, NotificationServiceStoreImplExt};

// ─── Host ─────────────────────────────────────────────────────

/// Renders the open add/edit modal, if any. Delete buttons inside go
/// through `confirm` when the action asks for it.
#[component]
pub fn ModalHost(
    mut modal: Signal<Option<ModalRequest>>,
    confirm: Signal<Option<DestructiveAction>>,
) -> Element {
    let close = use_callback(move |_: ()| modal.set(None));
    let runner = use_action_runner(close);

    let Some(request) = modal() else {
        return rsx! {};
    };
    let title = request.title();
    let key = modal_key(&request);

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| close.call(()),
            div {
                class: "modal",
                onclick: move |e: MouseEvent| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { "{title}" }
                    button {
                        class: "modal-close",
                        onclick: move |_| close.call(()),
                        "\u{2715}"
                    }
                }
                match request {
                    ModalRequest::Server { server_id, form } => rsx! {
                        ServerModal { key: "{key}", server_id, form, on_close: close, confirm, runner }
                    },
                    ModalRequest::Service { server_id, service_id, form } => rsx! {
                        ServiceModal { key: "{key}", server_id, service_id, form, on_close: close, confirm, runner }
                    },
                    ModalRequest::Rack { rack_id, form } => rsx! {
                        RackModal { key: "{key}", rack_id, form, on_close: close, confirm, runner }
                    },
                    ModalRequest::Device { device_id, form } => rsx! {
                        DeviceModal { key: "{key}", device_id, form, on_close: close, confirm, runner }
                    },
                }
            }
        }
    }
}

fn modal_key(request: &ModalRequest) -> String {
    let id = match request {
        ModalRequest::Server { server_id, .. } => server_id.as_deref(),
        ModalRequest::Service { service_id, .. } => service_id.as_deref(),
        ModalRequest::Rack { rack_id, .. } => rack_id.as_deref(),
        ModalRequest::Device { device_id, .. } => device_id.as_deref(),
    };
    format!("{}-{}", request.title(), id.unwrap_or("new"))
}

/// What every save does afterwards: close and reload, or report and keep
/// the form open.
#[derive(Clone, Copy)]
struct Saver {
    on_close: EventHandler,
    reload: Reload,
    notifs: Store<NotificationService>,
}

fn use_saver(on_close: EventHandler) -> Saver {
    Saver {
        on_close,
        reload: use_context::<Reload>(),
        notifs: use_context::<Store<NotificationService>>(),
    }
}

impl Saver {
    fn finish(mut self, result: Result<(), ApiError>, fallback: &str) {
        match result {
            Ok(()) => {
                self.on_close.call(());
                self.reload.bump();
            }
            Err(e) => {
                tracing::warn!("save failed: {e}");
                self.notifs.error(e.alert_text(fallback));
            }
        }
    }
}

#[component]
fn Field(
    label: &'static str,
    value: String,
    oninput: EventHandler<String>,
    #[props(default)] required: bool,
    #[props(default = "text")] kind: &'static str,
    #[props(default)] placeholder: String,
) -> Element {
    rsx! {
        div { class: "form-row",
            label { "{label}" }
            input {
                r#type: kind,
                value: "{value}",
                placeholder: "{placeholder}",
                required,
                oninput: move |e| oninput.call(e.value()),
            }
        }
    }
}

#[component]
fn FormButtons(
    #[props(default)] on_delete: Option<EventHandler>,
    #[props(default = "Delete")] delete_label: &'static str,
) -> Element {
    rsx! {
        div { class: "form-actions",
            if let Some(on_delete) = on_delete {
                button {
                    r#type: "button",
                    class: "btn-danger",
                    onclick: move |_| on_delete.call(()),
                    "{delete_label}"
                }
            }
            button {
                r#type: "submit",
                class: "btn-primary",
                "Save"
            }
        }
    }
}

// ─── Server ───────────────────────────────────────────────────

#[component]
fn ServerModal(
    server_id: Option<String>,
    form: ServerForm,
    on_close: EventHandler,
    confirm: Signal<Option<DestructiveAction>>,
    runner: Callback<(DestructiveAction, bool)>,
) -> Element {
    let api = use_api();
    let session = use_context::<Signal<Option<Session>>>();
    let mut state = use_signal(|| form.clone());
    let saver = use_saver(on_close);

    let (enable_racks, options) = match session.read().as_ref() {
        Some(s) => (
            s.snapshot.settings.enable_racks(),
            rack_options(&s.snapshot.racks),
        ),
        None => (false, Vec::new()),
    };

    let id = server_id.clone();
    let submit = move |e: FormEvent| {
        e.prevent_default();
        let draft = state.read().to_draft(enable_racks);
        let api = api.clone();
        let id = id.clone();
        spawn(async move {
            let result = match id.as_deref() {
                Some(id) => api.update_server(id, &draft).await,
                None => api.create_server(&draft).await,
            };
            saver.finish(result, "Failed to save server.");
        });
    };

    let on_delete = server_id.clone().map(|server_id| {
        EventHandler::new(move |_: ()| {
            request_action(DestructiveAction::DeleteServer { server_id: server_id.clone() }, confirm, runner)
        })
    });
    let current = state.read().clone();

    rsx! {
        form { class: "modal-form", onsubmit: submit,
            Field {
                label: "Name",
                value: current.name,
                required: true,
                oninput: move |v: String| state.write().name = v,
            }
            Field {
                label: "IP Address",
                value: current.ip,
                placeholder: "192.168.1.10",
                oninput: move |v: String| state.write().ip = v,
            }
            Field {
                label: "Description",
                value: current.description,
                oninput: move |v: String| state.write().description = v,
            }
            if enable_racks {
                div { class: "form-row",
                    label { "Rack" }
                    select {
                        value: "{current.rack_id}",
                        onchange: move |e| state.write().rack_id = e.value(),
                        for (value, text) in options {
                            option {
                                key: "{value}",
                                value: "{value}",
                                selected: value == current.rack_id,
                                "{text}"
                            }
                        }
                    }
                }
            }
            FormButtons { on_delete, delete_label: "Delete Server" }
        }
    }
}

// ─── Service ──────────────────────────────────────────────────

#[component]
fn ServiceModal(
    server_id: String,
    service_id: Option<String>,
    form: ServiceForm,
    on_close: EventHandler,
    confirm: Signal<Option<DestructiveAction>>,
    runner: Callback<(DestructiveAction, bool)>,
) -> Element {
    let api = use_api();
    let mut state = use_signal(|| form.clone());
    let saver = use_saver(on_close);

    let id = service_id.clone();
    let submit = move |e: FormEvent| {
        e.prevent_default();
        let draft = state.read().to_draft();
        let api = api.clone();
        let id = id.clone();
        spawn(async move {
            let result = match id.as_deref() {
                Some(id) => api.update_service(id, &draft).await,
                None => api.create_service(&draft).await,
            };
            saver.finish(result, "Failed to save service.");
        });
    };

    let on_delete = service_id.clone().map(|service_id| {
        EventHandler::new(move |_: ()| {
            request_action(DestructiveAction::DeleteService { service_id: service_id.clone() }, confirm, runner)
        })
    });
    let on_pick = move |vm: ProxmoxVm| state.write().apply_vm(&vm);
    let current = state.read().clone();

    rsx! {
        form { class: "modal-form", onsubmit: submit,
            ProxmoxImport { server_id, on_pick }
            Field {
                label: "Name",
                value: current.name,
                required: true,
                oninput: move |v: String| state.write().name = v,
            }
            div { class: "form-grid",
                Field {
                    label: "VM ID",
                    value: current.vmid,
                    kind: "number",
                    oninput: move |v: String| state.write().vmid = v,
                }
                Field {
                    label: "IP Address",
                    value: current.ip,
                    oninput: move |v: String| state.write().ip = v,
                }
                Field {
                    label: "VLAN",
                    value: current.vlan,
                    kind: "number",
                    oninput: move |v: String| state.write().vlan = v,
                }
                Field {
                    label: "CPU Cores",
                    value: current.cpu,
                    kind: "number",
                    oninput: move |v: String| state.write().cpu = v,
                }
                Field {
                    label: "RAM (GB)",
                    value: current.ram,
                    kind: "number",
                    oninput: move |v: String| state.write().ram = v,
                }
                Field {
                    label: "Storage (GB)",
                    value: current.storage,
                    kind: "number",
                    oninput: move |v: String| state.write().storage = v,
                }
            }
            Field {
                label: "Description",
                value: current.description,
                oninput: move |v: String| state.write().description = v,
            }
            FormButtons { on_delete, delete_label: "Delete Service" }
        }
    }
}

/// Lists VMs from the owning server's Proxmox host. Picking one fills the
/// service form; nothing is saved until submit.
#[component]
fn ProxmoxImport(server_id: String, on_pick: EventHandler<ProxmoxVm>) -> Element {
    let api = use_api();
    let session = use_context::<Signal<Option<Session>>>();
    let mut notifs = use_context::<Store<NotificationService>>();
    let mut user = use_signal(|| String::from("root@pam"));
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut vms = use_signal(Vec::<ProxmoxVm>::new);
    let state = PullBusy(busy());

    let connect = move |_| {
        let server = session
            .read()
            .as_ref()
            .and_then(|s| s.snapshot.server(&server_id).cloned());
        let Some(server) = server else {
            notifs.error("Server no longer exists.".to_string());
            return;
        };
        let api = api.clone();
        busy.set(true);
        spawn(async move {
            let result = pull::pull_proxmox(api.as_ref(), &server, &user(), &password()).await;
            busy.set(false);
            match result {
                Ok(list) => vms.set(list),
                Err(e) => {
                    vms.set(Vec::new());
                    notifs.error(e.alert_text());
                }
            }
        });
    };

    rsx! {
        fieldset { class: "proxmox-import",
            legend { "Import from Proxmox" }
            div { class: "form-grid",
                Field {
                    label: "User",
                    value: user(),
                    oninput: move |v: String| user.set(v),
                }
                Field {
                    label: "Password",
                    value: password(),
                    kind: "password",
                    oninput: move |v: String| password.set(v),
                }
            }
            button {
                r#type: "button",
                class: "btn-secondary",
                disabled: state.disabled(),
                onclick: connect,
                "{state.label()}"
            }
            if !vms.read().is_empty() {
                ul { class: "vm-list",
                    for (i, vm) in vms().into_iter().enumerate() {
                        {
                            let summary = vm.summary();
                            rsx! {
                                li {
                                    key: "{i}",
                                    class: "vm-row clickable",
                                    onclick: move |_| {
                                        on_pick.call(vm.clone());
                                        vms.set(Vec::new());
                                    },
                                    "{summary}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ─── Rack ─────────────────────────────────────────────────────

#[component]
fn RackModal(
    rack_id: Option<String>,
    form: RackForm,
    on_close: EventHandler,
    confirm: Signal<Option<DestructiveAction>>,
    runner: Callback<(DestructiveAction, bool)>,
) -> Element {
    let api = use_api();
    let mut state = use_signal(|| form.clone());
    let saver = use_saver(on_close);

    let id = rack_id.clone();
    let submit = move |e: FormEvent| {
        e.prevent_default();
        let draft = state.read().to_draft();
        let api = api.clone();
        let id = id.clone();
        spawn(async move {
            let result = match id.as_deref() {
                Some(id) => api.update_rack(id, &draft).await,
                None => api.create_rack(&draft).await,
            };
            saver.finish(result, "Failed to save rack.");
        });
    };

    let on_delete = rack_id.clone().map(|rack_id| {
        EventHandler::new(move |_: ()| {
            request_action(DestructiveAction::DeleteRack { rack_id: rack_id.clone() }, confirm, runner)
        })
    });
    let current = state.read().clone();

    rsx! {
        form { class: "modal-form", onsubmit: submit,
            Field {
                label: "Name",
                value: current.name,
                required: true,
                oninput: move |v: String| state.write().name = v,
            }
            Field {
                label: "Location",
                value: current.location,
                placeholder: "Basement, closet...",
                oninput: move |v: String| state.write().location = v,
            }
            FormButtons { on_delete, delete_label: "Delete Rack" }
        }
    }
}

// ─── Network device ───────────────────────────────────────────

#[component]
fn DeviceModal(
    device_id: Option<String>,
    form: DeviceForm,
    on_close: EventHandler,
    confirm: Signal<Option<DestructiveAction>>,
    runner: Callback<(DestructiveAction, bool)>,
) -> Element {
    let api = use_api();
    let mut state = use_signal(|| form.clone());
    let saver = use_saver(on_close);

    let id = device_id.clone();
    let submit = move |e: FormEvent| {
        e.prevent_default();
        let draft = state.read().to_draft();
        let api = api.clone();
        let id = id.clone();
        spawn(async move {
            let result = match id.as_deref() {
                Some(id) => api.update_device(id, &draft).await,
                None => api.create_device(&draft).await,
            };
            saver.finish(result, "Failed to save device.");
        });
    };

    let on_delete = device_id.clone().map(|device_id| {
        EventHandler::new(move |_: ()| {
            request_action(DestructiveAction::DeleteDevice { device_id: device_id.clone() }, confirm, runner)
        })
    });
    let current = state.read().clone();

    rsx! {
        form { class: "modal-form", onsubmit: submit,
            Field {
                label: "Name",
                value: current.name,
                required: true,
                oninput: move |v: String| state.write().name = v,
            }
            Field {
                label: "Type",
                value: current.kind,
                required: true,
                placeholder: "Switch, Router, AP...",
                oninput: move |v: String| state.write().kind = v,
            }
            div { class: "form-grid",
                Field {
                    label: "Brand",
                    value: current.brand,
                    oninput: move |v: String| state.write().brand = v,
                }
                Field {
                    label: "Model",
                    value: current.model,
                    oninput: move |v: String| state.write().model = v,
                }
                Field {
                    label: "IP Address",
                    value: current.ip,
                    oninput: move |v: String| state.write().ip = v,
                }
                Field {
                    label: "Serial",
                    value: current.serial,
                    oninput: move |v: String| state.write().serial = v,
                }
            }
            FormButtons { on_delete, delete_label: "Delete Device" }
        }
    }
}
