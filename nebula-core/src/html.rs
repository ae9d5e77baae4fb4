//! Static HTML rendering of the dashboard tree, used for exports.
//!
//! All user-supplied text goes through [`escape_html`] before it is written.

use std::fmt::Write;

use crate::render::{Card, DashboardView, DeviceCard, RackGroup, ServerCard};

pub fn escape_html(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	for c in raw.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}

fn server_html(out: &mut String, card: &ServerCard) {
	let _ = write!(
		out,
		r#"<div class="card server-card" data-id="{}"><h3>{}</h3><p class="ip">{}</p>"#,
		escape_html(&card.id),
		escape_html(&card.name),
		escape_html(&card.ip_text),
	);
	if let Some(desc) = &card.description {
		let _ = write!(out, r#"<p class="desc">{}</p>"#, escape_html(desc));
	}
	out.push_str(r#"<ul class="services">"#);
	for row in &card.services {
		let _ = write!(out, "<li><span>{}</span>", escape_html(&row.name));
		if let Some(ip) = &row.ip {
			let _ = write!(out, r#"<span class="ip">{}</span>"#, escape_html(ip));
		}
		if let Some(vm) = &row.vm_label {
			let _ = write!(out, r#"<span class="vmid">{}</span>"#, escape_html(vm));
		}
		out.push_str("</li>");
	}
	out.push_str(r#"</ul><button class="add-service">+ Add Service</button></div>"#);
}

fn device_html(out: &mut String, card: &DeviceCard) {
	let _ = write!(
		out,
		r#"<div class="card device-card" data-id="{}"><h3>{}</h3><p class="ip">{}</p><p class="model">{}</p><p class="type">{}</p>"#,
		escape_html(&card.id),
		escape_html(&card.name),
		escape_html(&card.ip_text),
		escape_html(&card.subtitle),
		escape_html(&card.kind),
	);
	if let Some(brand) = &card.brand {
		let _ = write!(out, r#"<p class="brand">{}</p>"#, escape_html(brand));
	}
	out.push_str("</div>");
}

fn card_html(out: &mut String, card: &Card) {
	match card {
		Card::Server(c) => server_html(out, c),
		Card::Device(c) => device_html(out, c),
	}
}

fn group_html(out: &mut String, group: &RackGroup) {
	out.push_str(r#"<section class="rack-group"><header>"#);
	let _ = write!(out, "<h2>{}</h2>", escape_html(&group.header.name));
	if let Some(loc) = &group.header.location {
		let _ = write!(out, r#"<span class="location">{}</span>"#, escape_html(loc));
	}
	out.push_str(r#"</header><div class="rack-body">"#);
	for card in &group.cards {
		card_html(out, card);
	}
	out.push_str("</div></section>");
}

/// Body fragment for a dashboard view.
pub fn render_html(view: &DashboardView) -> String {
	let mut out = String::new();
	match view {
		DashboardView::Empty { message } => {
			let _ = write!(out, r#"<p class="empty">{}</p>"#, escape_html(message));
		}
		DashboardView::Flat { cards, placeholder } => {
			out.push_str(r#"<div class="grid">"#);
			for card in cards {
				card_html(&mut out, card);
			}
			if let Some(text) = placeholder {
				let _ = write!(out, r#"<p class="empty">{}</p>"#, escape_html(text));
			}
			out.push_str("</div>");
		}
		DashboardView::Racks { groups } => {
			for group in groups {
				group_html(&mut out, group);
			}
		}
	}
	out
}

/// Standalone page with the palette class on `<body>`.
pub fn render_document(view: &DashboardView, palette_class: &str, generated_at: &str) -> String {
	format!(
		"<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Nebula Inventory</title></head>\
		 <body class=\"{}\"><h1>Nebula Inventory</h1><p class=\"generated\">{}</p>{}</body></html>\n",
		escape_html(palette_class),
		escape_html(generated_at),
		render_html(view)
	)
}
