use std::sync::Arc;

use dioxus::prelude::*;
use nebula_core::{InventoryApi, Palette, Session};

use crate::ui::{
	dashboard::Dashboard,
	network::Network,
	notification::{NotificationLayer, NotificationService, NotificationServiceStoreImplExt},
	topology::Topology,
};

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Backend client shared by every page.
#[derive(Clone)]
pub struct ApiHandle(pub Arc<dyn InventoryApi>);

#[derive(Clone)]
pub struct ConfigProblem(pub String);

/// Bump to throw away the current session and fetch a fresh snapshot.
#[derive(Clone, Copy)]
pub struct Reload(Signal<u32>);

impl Reload {
	pub fn tick(&self) -> u32 {
		(self.0)()
	}

	pub fn bump(mut self) {
		*self.0.write() += 1;
	}
}

pub fn use_api() -> Arc<dyn InventoryApi> {
	use_context::<ApiHandle>().0
}

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
	#[layout(Shell)]
	#[route("/")]
	Dashboard {},
	#[route("/network")]
	Network {},
	#[route("/topology")]
	Topology {},
}

#[component]
pub fn ConfigErrorApp() -> Element {
	let err = use_context::<ConfigProblem>();

	rsx! {
		document::Stylesheet { href: MAIN_CSS }
		div { class: "app palette-blue",
			div { class: "header",
				h1 { "Nebula" }
			}
			div { class: "config-error-banner", "{err.0}" }
		}
	}
}

#[component]
pub fn App() -> Element {
	rsx! {
		document::Stylesheet { href: MAIN_CSS }
		Router::<Route> {}
	}
}

/// Owns the session for whichever page is showing. Every mutation ends
/// with `Reload::bump`, which replaces the session wholesale.
#[component]
fn Shell() -> Element {
	let api = use_context::<ApiHandle>();
	let notifs = use_store(|| NotificationService::new());
	use_context_provider(|| notifs);
	let refresh_tick = use_signal(|| 0u32);
	let reload = use_context_provider(|| Reload(refresh_tick));
	let mut session = use_signal(|| None::<Session>);
	use_context_provider(|| session);
	let mut palette = use_signal(Palette::default);
	use_context_provider(|| palette);

	use_effect(move || {
		let _tick = reload.tick();
		let api = api.0.clone();
		let mut notifs = notifs;
		spawn(async move {
			match Session::load(api.as_ref()).await {
				Ok(fresh) => {
					palette.set(fresh.snapshot.settings.palette());
					session.set(Some(fresh));
				}
				Err(e) => {
					tracing::error!("snapshot load failed: {e}");
					notifs.error(e.alert_text("Failed to load inventory."));
				}
			}
		});
	});

	let palette_class = palette().css_class();

	rsx! {
		div { class: "app {palette_class}",
			div { class: "header",
				h1 { "Nebula" }
				nav { class: "nav-links",
					Link { to: Route::Dashboard {}, "Dashboard" }
					Link { to: Route::Network {}, "Network" }
					Link { to: Route::Topology {}, "Topology" }
				}
			}
			if session.read().is_some() {
				Outlet::<Route> {}
			} else {
				div { class: "loading", "Loading inventory..." }
			}
			NotificationLayer { notifs }
		}
	}
}
