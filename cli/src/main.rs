mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use nebula_core::actions::{DestructiveAction, Outcome};
use nebula_core::pull::{self, Credentials};
use nebula_core::render::render_dashboard;
use nebula_core::{html, topology, ClientConfig, HttpInventoryApi, InventoryApi, Palette, SettingsPatch};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nebula-cli")]
#[command(about = "Terminal client for the Nebula homelab inventory")]
struct Cli {
	/// Backend base URL. Overrides the config file and NEBULA_API_URL.
	#[arg(long, global = true)]
	api_url: Option<String>,

	/// Debug logging on stderr
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Entity counts and layout settings
	Snapshot,

	/// Dashboard tree: racks, their servers and devices
	Buckets,

	/// Topology edges, or the full node/edge model as JSON
	Topology {
		#[arg(long)]
		json: bool,
	},

	/// Save the backend's CSV export
	ExportCsv {
		/// Defaults to nebula_inventory.csv in the downloads directory
		path: Option<PathBuf>,
	},

	/// Write the dashboard as a standalone HTML page
	ExportHtml {
		/// Defaults to nebula_dashboard.html in the downloads directory
		path: Option<PathBuf>,
	},

	/// Change layout settings. Prints current settings when given nothing.
	Settings {
		#[arg(long)]
		palette: Option<String>,
		#[arg(long)]
		racks: Option<bool>,
		#[arg(long)]
		show_network: Option<bool>,
	},

	/// List Proxmox VMs on a server's host
	Proxmox {
		server_id: String,
		#[arg(long, default_value = "root@pam")]
		user: String,
		#[arg(long)]
		password: String,
	},

	/// Sync network devices from a UniFi controller
	UnifiSync {
		/// Defaults to the stored controller host
		#[arg(long)]
		host: Option<String>,
		#[arg(long)]
		user: Option<String>,
		#[arg(long)]
		password: String,
	},

	/// Delete every server and service
	Reset {
		/// Required; there is no interactive prompt
		#[arg(long)]
		yes: bool,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let default_level = if cli.verbose { "debug" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
		.with_writer(std::io::stderr)
		.init();

	let mut config = ClientConfig::load().context("loading client config")?;
	if let Some(url) = cli.api_url {
		config.override_api_url(url);
	}
	let api = HttpInventoryApi::from_config(&config).context("invalid backend URL")?;
	tracing::debug!(base = %api.base(), "using backend");

	run(&api, cli.command).await
}

async fn run(api: &dyn InventoryApi, command: Command) -> Result<()> {
	match command {
		Command::Snapshot => {
			let snapshot = api.fetch_snapshot().await.context("fetching snapshot")?;
			print!("{}", output::snapshot_summary(&snapshot));
		}

		Command::Buckets => {
			let snapshot = api.fetch_snapshot().await.context("fetching snapshot")?;
			print!("{}", output::dashboard_tree(&render_dashboard(&snapshot)));
		}

		Command::Topology { json } => {
			let snapshot = api.fetch_snapshot().await.context("fetching snapshot")?;
			let graph = topology::project(&snapshot);
			if json {
				println!("{}", serde_json::to_string_pretty(&graph)?);
			} else {
				print!("{}", output::topology_lines(&graph));
			}
		}

		Command::ExportCsv { path } => {
			let csv = api.export_csv().await.context("requesting CSV export")?;
			let path = path.unwrap_or_else(|| default_export_path("nebula_inventory.csv"));
			write_export(&path, &csv)?;
			println!("{} {}", style("Saved").green().bold(), path.display());
		}

		Command::ExportHtml { path } => {
			let snapshot = api.fetch_snapshot().await.context("fetching snapshot")?;
			let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
			let page = html::render_document(
				&render_dashboard(&snapshot),
				&snapshot.settings.palette().css_class(),
				&format!("Generated {generated}"),
			);
			let path = path.unwrap_or_else(|| default_export_path("nebula_dashboard.html"));
			write_export(&path, &page)?;
			println!("{} {}", style("Saved").green().bold(), path.display());
		}

		Command::Settings { palette, racks, show_network } => {
			let patch = settings_patch(palette.as_deref(), racks, show_network)?;
			if patch.is_empty() {
				let snapshot = api.fetch_snapshot().await.context("fetching snapshot")?;
				let settings = &snapshot.settings;
				println!("palette:      {}", settings.palette().label());
				println!("racks:        {}", settings.enable_racks());
				println!("show network: {}", settings.show_network_in_dashboard());
				if let Some(host) = settings.unifi_host() {
					println!("unifi:        {} ({})", host, settings.unifi_user().unwrap_or("-"));
				}
				return Ok(());
			}
			api.update_settings(&patch).await.context("updating settings")?;
			println!("{} {}", style("Updated").green().bold(), patch.keys().collect::<Vec<_>>().join(", "));
		}

		Command::Proxmox { server_id, user, password } => {
			let snapshot = api.fetch_snapshot().await.context("fetching snapshot")?;
			let Some(server) = snapshot.server(&server_id) else {
				bail!("no server with id {server_id}");
			};
			let vms = pull::pull_proxmox(api, server, &user, &password)
				.await
				.map_err(|e| anyhow::anyhow!(e.alert_text()))?;
			println!("{}", style(format!("{} VMs on {}", vms.len(), server.name)).bold());
			for vm in &vms {
				println!("  {}", vm.summary());
			}
		}

		Command::UnifiSync { host, user, password } => {
			let snapshot = api.fetch_snapshot().await.context("fetching snapshot")?;
			let mut creds = pull::unifi_form_defaults(&snapshot.settings);
			if let Some(host) = host {
				creds.host = host;
			}
			if let Some(user) = user {
				creds.user = user;
			}
			if creds.host.is_empty() || creds.user.is_empty() {
				bail!("controller host and user are required");
			}
			creds.password = password;
			sync_unifi(api, &creds).await?;
		}

		Command::Reset { yes } => {
			match DestructiveAction::ResetAll.run(api, yes).await.context("resetting inventory")? {
				Outcome::Done => println!("{}", style("All servers and services deleted.").red().bold()),
				Outcome::Aborted => {
					eprintln!("{}", DestructiveAction::ResetAll.prompt());
					eprintln!("Re-run with {} to confirm.", style("--yes").bold());
				}
			}
		}
	}
	Ok(())
}

async fn sync_unifi(api: &dyn InventoryApi, creds: &Credentials) -> Result<()> {
	pull::pull_unifi(api, creds)
		.await
		.map_err(|e| anyhow::anyhow!(e.alert_text()))?;
	let snapshot = api.fetch_snapshot().await.context("reloading snapshot")?;
	println!(
		"{} {} synced devices",
		style("Synced").green().bold(),
		snapshot.synced_device_count()
	);
	Ok(())
}

fn settings_patch(palette: Option<&str>, racks: Option<bool>, show_network: Option<bool>) -> Result<SettingsPatch> {
	let mut patch = SettingsPatch::new();
	if let Some(raw) = palette {
		let Some(p) = Palette::parse(raw) else {
			let names: Vec<&str> = Palette::ALL.iter().map(|p| p.as_str()).collect();
			bail!("unknown palette {raw:?}; expected one of {}", names.join(", "));
		};
		patch = patch.palette(p);
	}
	if let Some(on) = racks {
		patch = patch.enable_racks(on);
	}
	if let Some(on) = show_network {
		patch = patch.show_network_in_dashboard(on);
	}
	Ok(patch)
}

fn default_export_path(file_name: &str) -> PathBuf {
	dirs::download_dir()
		.unwrap_or_else(|| PathBuf::from("."))
		.join(file_name)
}

fn write_export(path: &Path, contents: &str) -> Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
	}
	std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
