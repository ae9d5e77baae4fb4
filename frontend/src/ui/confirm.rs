use dioxus::prelude::*;
use nebula_core::actions::{DestructiveAction, Outcome};

use crate::app::{use_api, Reload};
use crate::ui::notification::{NotificationService, NotificationServiceStoreImplExt};

/// Runs `(action, confirmed)` and reloads on success. `on_done` fires only
/// when the request actually went out and succeeded.
pub fn use_action_runner(on_done: EventHandler) -> Callback<(DestructiveAction, bool)> {
    let api = use_api();
    let reload = use_context::<Reload>();
    let notifs = use_context::<Store<NotificationService>>();

    use_callback(move |(action, confirmed): (DestructiveAction, bool)| {
        let api = api.clone();
        let mut notifs = notifs;
        spawn(async move {
            match action.run(api.as_ref(), confirmed).await {
                Ok(Outcome::Done) => {
                    on_done.call(());
                    reload.bump();
                }
                Ok(Outcome::Aborted) => {}
                Err(e) => {
                    tracing::warn!(?action, "action failed: {e}");
                    notifs.error(e.alert_text("Request failed."));
                }
            }
        });
    })
}

/// Route a delete button: ask first when the action wants it, run
/// directly otherwise.
pub fn request_action(
    action: DestructiveAction,
    mut confirm: Signal<Option<DestructiveAction>>,
    runner: Callback<(DestructiveAction, bool)>,
) {
    if action.requires_confirmation() {
        confirm.set(Some(action));
    } else {
        runner.call((action, false));
    }
}

// ─── Confirm dialog ───────────────────────────────────────────

/// Shows whatever is in `pending` and clears it on either answer.
#[component]
pub fn ConfirmDialog(mut pending: Signal<Option<DestructiveAction>>, on_done: EventHandler) -> Element {
    let runner = use_action_runner(on_done);

    let Some(action) = pending() else {
        return rsx! {};
    };
    let prompt = action.prompt();

    rsx! {
        div { class: "modal-backdrop confirm-backdrop",
            div { class: "modal confirm-dialog",
                p { class: "confirm-prompt", "{prompt}" }
                div { class: "form-actions",
                    button {
                        class: "btn-ghost",
                        onclick: move |_| pending.set(None),
                        "Cancel"
                    }
                    button {
                        class: "btn-danger",
                        onclick: move |_| {
                            pending.set(None);
                            runner.call((action.clone(), true));
                        },
                        "Confirm"
                    }
                }
            }
        }
    }
}
