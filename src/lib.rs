//! Mutiny desktop shell.
//!
//! Hosts the Mutiny web client in a native window and bridges it to the OS:
//! tray, unread badges, screen-share source picking, rich presence, deep
//! links and autostart.

pub mod app;
pub mod badge;
pub mod commands;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod picker;
pub mod presence;

use tauri::{AppHandle, Manager};
use tauri_plugin_autostart::MacosLauncher;
use tauri_plugin_deep_link::DeepLinkExt;

use app::deep_link::deliver;
use app::window::dispatch;
use app::Shell;
use config::{server_url_from_args, ConfigStore, ShellConfig};
use error::ShellResult;
use lifecycle::deep_link::{find_deep_link, DeepLinkSource};
use lifecycle::WindowEvent;
use picker::window::PICKER_SCHEME;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let app = tauri::Builder::default()
        // Must be registered first so a second instance exits before doing anything else.
        .plugin(tauri_plugin_single_instance::init(|app, args, _cwd| {
            log::info!("[APP] Second instance started with {:?}", args);
            match find_deep_link(&args) {
                Some(url) => deliver(app, url, DeepLinkSource::SecondInstance),
                None => {
                    dispatch(app, WindowEvent::Activate);
                },
            }
        }))
        .plugin(tauri_plugin_deep_link::init())
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_autostart::init(MacosLauncher::LaunchAgent, None))
        .register_uri_scheme_protocol(PICKER_SCHEME, |ctx, request| {
            let app = ctx.app_handle();
            picker::window::handle_protocol(app, ctx.webview_label(), &app.state::<Shell>().picker, &request)
        })
        .on_window_event(app::events::handle_window_event)
        .invoke_handler(tauri::generate_handler![
            // Settings commands
            commands::settings::query_autostart,
            commands::settings::set_autostart,
            commands::settings::get_config,
            commands::settings::set_config,
            commands::settings::toggle_spellcheck,
            commands::settings::open_external,
            // Window commands
            commands::window::window_minimize,
            commands::window::window_toggle_maximize,
            commands::window::window_close,
            // Badge and picker
            commands::badge::set_badge_count,
            commands::picker::show_screen_picker,
            // Logging commands
            commands::logging::write_log,
            commands::logging::write_logs,
            commands::logging::get_log_dir,
        ])
        .setup(|app| {
            setup(app.handle())?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(app::events::handle_run_event);
}

fn setup(app: &AppHandle) -> ShellResult<()> {
    if let Err(e) = commands::logging::init_logging(app) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let server_url = server_url_from_args(std::env::args());
    let config = ConfigStore::open(app);
    log::info!(
        "Starting Mutiny for Desktop {} against {}",
        env!("CARGO_PKG_VERSION"),
        server_url
    );

    // Webview switches must be in place before the first webview exists.
    apply_hardware_acceleration(&config.get());

    app.manage(Shell::new(config, server_url));
    let shell = app.state::<Shell>();

    #[cfg(any(target_os = "linux", target_os = "windows"))]
    if let Err(e) = app.deep_link().register(lifecycle::deep_link::SCHEME) {
        log::warn!("[DEEPLINK] Failed to register scheme: {}", e);
    }

    handle_first_launch(app, &shell)?;

    app::tray::init_tray(app)?;

    let restore_maximized = shell.config.read(|config| config.window_state.is_maximised);
    dispatch(app, WindowEvent::CreateRequested { restore_maximized });

    let handle = app.clone();
    app.deep_link().on_open_url(move |event| {
        for url in event.urls() {
            deliver(&handle, url.to_string(), DeepLinkSource::OpenUrlEvent);
        }
    });

    if let Some(url) = find_deep_link(std::env::args()) {
        deliver(app, url, DeepLinkSource::LaunchArgs);
    }

    let presence_enabled = shell.config.read(|config| config.discord_rpc);
    let handle = app.clone();
    tauri::async_runtime::spawn(async move {
        handle.state::<Shell>().presence.init(presence_enabled);
    });

    Ok(())
}

/// Disable GPU compositing in the webview when the user turned it off.
fn apply_hardware_acceleration(config: &ShellConfig) {
    if config.hardware_acceleration {
        return;
    }
    log::info!("Hardware acceleration disabled");

    #[cfg(target_os = "windows")]
    std::env::set_var("WEBVIEW2_ADDITIONAL_BROWSER_ARGUMENTS", "--disable-gpu");
    #[cfg(target_os = "linux")]
    std::env::set_var("WEBKIT_DISABLE_COMPOSITING_MODE", "1");
}

/// Enable autostart on the first run (Windows and macOS), then clear the flag.
fn handle_first_launch(app: &AppHandle, shell: &Shell) -> ShellResult<()> {
    if !shell.config.read(|config| config.first_launch) {
        return Ok(());
    }
    log::info!("First launch");

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    if let Err(e) = commands::settings::apply_autostart(app, true) {
        log::warn!("[SETTINGS] Could not enable autostart on first launch: {}", e);
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let _ = app;

    shell.config.update(|config| config.first_launch = false)?;
    Ok(())
}
