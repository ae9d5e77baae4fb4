use dioxus::prelude::*;
use nebula_core::reassign::DragEntity;
use nebula_core::render::{DeviceCard, Interaction, ServerCard, ServiceRow};

// ─── Server card ──────────────────────────────────────────────

#[component]
pub fn ServerCardView(
    card: ServerCard,
    on_interact: EventHandler<Interaction>,
    on_drag_start: EventHandler<DragEntity>,
    on_drag_end: EventHandler,
) -> Element {
    let draggable = card.draggable;
    let id = card.id.clone();
    let edit = card.on_click.clone();
    let add = card.add_service.clone();

    rsx! {
        div {
            class: if draggable { "card server-card draggable" } else { "card server-card" },
            draggable: if draggable { "true" } else { "false" },
            ondragstart: move |_| {
                if draggable {
                    on_drag_start.call(DragEntity::server(id.clone()));
                }
            },
            ondragend: move |_| on_drag_end.call(()),

            div {
                class: "card-header clickable",
                onclick: move |_| on_interact.call(edit.clone()),
                h3 { class: "card-title", "{card.name}" }
                span { class: "card-ip", "{card.ip_text}" }
            }
            if let Some(desc) = &card.description {
                p { class: "card-desc", "{desc}" }
            }
            ul { class: "service-list",
                for (i, row) in card.services.iter().enumerate() {
                    ServiceRowView { key: "{i}", row: row.clone(), on_interact }
                }
            }
            button {
                class: "btn-add-service",
                onclick: move |e: MouseEvent| {
                    e.stop_propagation();
                    on_interact.call(add.clone());
                },
                "+ Add Service"
            }
        }
    }
}

#[component]
fn ServiceRowView(row: ServiceRow, on_interact: EventHandler<Interaction>) -> Element {
    let target = row.on_click.clone();
    rsx! {
        li {
            class: "service-row clickable",
            onclick: move |_| on_interact.call(target.clone()),
            span { class: "service-name", "{row.name}" }
            if let Some(ip) = &row.ip {
                span { class: "service-ip", "{ip}" }
            }
            if let Some(vm) = &row.vm_label {
                span { class: "service-vmid", "{vm}" }
            }
        }
    }
}

// ─── Device card ──────────────────────────────────────────────

#[component]
pub fn DeviceCardView(
    card: DeviceCard,
    on_interact: EventHandler<Interaction>,
    on_drag_start: EventHandler<DragEntity>,
    on_drag_end: EventHandler,
) -> Element {
    let draggable = card.draggable;
    let id = card.id.clone();
    let edit = card.on_click.clone();
    let origin = if card.is_manual { "Manual" } else { "Synced" };
    let mut class = String::from("card device-card");
    if edit.is_some() {
        class.push_str(" clickable");
    }
    if draggable {
        class.push_str(" draggable");
    }

    rsx! {
        div {
            class: "{class}",
            draggable: if draggable { "true" } else { "false" },
            ondragstart: move |_| {
                if draggable {
                    on_drag_start.call(DragEntity::device(id.clone()));
                }
            },
            ondragend: move |_| on_drag_end.call(()),
            onclick: move |_| {
                if let Some(target) = edit.clone() {
                    on_interact.call(target);
                }
            },

            div { class: "card-header",
                h3 { class: "card-title", "{card.name}" }
                span { class: "card-ip", "{card.ip_text}" }
            }
            div { class: "device-meta",
                span { class: "device-model", "{card.subtitle}" }
                span { class: "device-type", "{card.kind}" }
                if let Some(brand) = &card.brand {
                    span { class: "device-brand", "{brand}" }
                }
                span { class: "device-origin", "{origin}" }
            }
        }
    }
}
