//! Main window lifecycle state machine.
//!
//! Every OS or in-app window event is fed through [`WindowLifecycle::handle`],
//! which updates [`WindowState`] and returns the side effects to perform on
//! the live window. The adapter in `app::window` executes those effects; this
//! module never touches Tauri, so the hide-vs-quit rules are testable without
//! a window.

/// Observable state of the single main window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowState {
    /// A main window currently exists (created and not yet destroyed).
    pub exists: bool,
    pub visible: bool,
    pub maximized: bool,
    /// Set by `quit()` or an app-level exit request so the next close is not
    /// converted into a hide.
    pub should_quit: bool,
}

/// Inputs to the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Build the main window, restoring the persisted maximise flag.
    CreateRequested { restore_maximized: bool },
    /// Bring the app to the front: tray click, second instance, dock reopen.
    Activate,
    /// The user (or `window_close`) asked to close the window.
    CloseRequested { minimise_to_tray: bool },
    /// In-app quit (tray "Quit App").
    QuitRequested,
    /// The OS or runtime is exiting the process.
    AppExitRequested,
    Show,
    Hide,
    ToggleVisibility,
    Minimize,
    ToggleMaximize,
    /// Maximised state observed after a resize.
    Resized { maximized: bool },
    Destroyed,
}

/// Side effects the adapter performs, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEffect {
    CreateWindow { maximized: bool },
    /// Intercept the pending close request.
    PreventClose,
    /// Ask the window to close (goes through `CloseRequested` again).
    Close,
    Show,
    Hide,
    Focus,
    Unminimize,
    Minimize,
    Maximize,
    Unmaximize,
    ResyncTray,
    PersistMaximized(bool),
    ExitProcess,
}

/// Owner of [`WindowState`].
#[derive(Debug)]
pub struct WindowLifecycle {
    state: WindowState,
    /// Whether the process ends when the main window is destroyed. False on
    /// macOS, where the app stays in the dock.
    exit_when_closed: bool,
}

impl WindowLifecycle {
    pub fn new(exit_when_closed: bool) -> Self {
        Self {
            state: WindowState::default(),
            exit_when_closed,
        }
    }

    /// Lifecycle with the platform's default close behaviour.
    pub fn for_current_platform() -> Self {
        Self::new(!cfg!(target_os = "macos"))
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Whether an automatic exit (last window gone) should be held back.
    pub fn keeps_running_without_window(&self) -> bool {
        !self.exit_when_closed && !self.state.should_quit
    }

    pub fn handle(&mut self, event: WindowEvent) -> Vec<WindowEffect> {
        use WindowEffect as E;

        let state = &mut self.state;
        match event {
            WindowEvent::CreateRequested { restore_maximized } => {
                if state.exists {
                    log::warn!("[WINDOW] Main window already exists, ignoring create request");
                    return Vec::new();
                }
                state.exists = true;
                state.visible = true;
                state.maximized = restore_maximized;
                vec![
                    E::CreateWindow {
                        maximized: restore_maximized,
                    },
                    E::ResyncTray,
                ]
            },

            WindowEvent::Activate => {
                if !state.exists {
                    return self.handle(WindowEvent::CreateRequested {
                        restore_maximized: self.state.maximized,
                    });
                }
                state.visible = true;
                vec![E::Unminimize, E::Show, E::Focus, E::ResyncTray]
            },

            WindowEvent::CloseRequested { minimise_to_tray } => {
                if !state.exists {
                    return Vec::new();
                }
                if minimise_to_tray && !state.should_quit {
                    state.visible = false;
                    vec![E::PreventClose, E::Hide, E::ResyncTray]
                } else {
                    // Let the close proceed; `Destroyed` follows.
                    Vec::new()
                }
            },

            WindowEvent::QuitRequested => {
                state.should_quit = true;
                if state.exists {
                    vec![E::Close]
                } else {
                    vec![E::ExitProcess]
                }
            },

            WindowEvent::AppExitRequested => {
                state.should_quit = true;
                Vec::new()
            },

            WindowEvent::Show => {
                if !state.exists {
                    return self.handle(WindowEvent::Activate);
                }
                state.visible = true;
                vec![E::Show, E::ResyncTray]
            },

            WindowEvent::Hide => {
                if !state.exists {
                    return Vec::new();
                }
                state.visible = false;
                vec![E::Hide, E::ResyncTray]
            },

            WindowEvent::ToggleVisibility => {
                if state.exists && state.visible {
                    self.handle(WindowEvent::Hide)
                } else {
                    self.handle(WindowEvent::Show)
                }
            },

            WindowEvent::Minimize => {
                if !state.exists {
                    return Vec::new();
                }
                vec![E::Minimize]
            },

            WindowEvent::ToggleMaximize => {
                if !state.exists {
                    return Vec::new();
                }
                // State is updated when the resize is observed.
                if state.maximized {
                    vec![E::Unmaximize]
                } else {
                    vec![E::Maximize]
                }
            },

            WindowEvent::Resized { maximized } => {
                if !state.exists || state.maximized == maximized {
                    return Vec::new();
                }
                state.maximized = maximized;
                vec![E::PersistMaximized(maximized)]
            },

            WindowEvent::Destroyed => {
                if !state.exists {
                    return Vec::new();
                }
                state.exists = false;
                state.visible = false;
                if state.should_quit || self.exit_when_closed {
                    vec![E::ResyncTray, E::ExitProcess]
                } else {
                    vec![E::ResyncTray]
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WindowEffect as E;

    fn created(exit_when_closed: bool) -> WindowLifecycle {
        let mut lifecycle = WindowLifecycle::new(exit_when_closed);
        lifecycle.handle(WindowEvent::CreateRequested {
            restore_maximized: false,
        });
        lifecycle
    }

    #[test]
    fn test_create_restores_maximized() {
        let mut lifecycle = WindowLifecycle::new(true);
        let effects = lifecycle.handle(WindowEvent::CreateRequested {
            restore_maximized: true,
        });

        assert_eq!(effects, vec![E::CreateWindow { maximized: true }, E::ResyncTray]);
        let state = lifecycle.state();
        assert!(state.exists && state.visible && state.maximized);
    }

    #[test]
    fn test_second_create_is_ignored() {
        let mut lifecycle = created(true);
        let effects = lifecycle.handle(WindowEvent::CreateRequested {
            restore_maximized: true,
        });
        assert!(effects.is_empty());
        assert!(!lifecycle.state().maximized);
    }

    #[test]
    fn test_close_with_tray_hides() {
        let mut lifecycle = created(true);
        let effects = lifecycle.handle(WindowEvent::CloseRequested {
            minimise_to_tray: true,
        });

        assert_eq!(effects, vec![E::PreventClose, E::Hide, E::ResyncTray]);
        assert!(!effects.contains(&E::ExitProcess));
        let state = lifecycle.state();
        assert!(state.exists);
        assert!(!state.visible);
    }

    #[test]
    fn test_close_without_tray_destroys_and_exits() {
        let mut lifecycle = created(true);
        let effects = lifecycle.handle(WindowEvent::CloseRequested {
            minimise_to_tray: false,
        });
        assert!(effects.is_empty());

        let effects = lifecycle.handle(WindowEvent::Destroyed);
        assert_eq!(effects, vec![E::ResyncTray, E::ExitProcess]);
        assert!(!lifecycle.state().exists);
    }

    #[test]
    fn test_quit_bypasses_tray() {
        let mut lifecycle = created(true);
        assert_eq!(lifecycle.handle(WindowEvent::QuitRequested), vec![E::Close]);

        // The close triggered by quit must not be intercepted.
        let effects = lifecycle.handle(WindowEvent::CloseRequested {
            minimise_to_tray: true,
        });
        assert!(!effects.contains(&E::PreventClose));

        let effects = lifecycle.handle(WindowEvent::Destroyed);
        assert!(effects.contains(&E::ExitProcess));
    }

    #[test]
    fn test_app_exit_request_sets_quit_intent() {
        let mut lifecycle = created(true);
        lifecycle.handle(WindowEvent::AppExitRequested);
        let effects = lifecycle.handle(WindowEvent::CloseRequested {
            minimise_to_tray: true,
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_quit_without_window_exits() {
        let mut lifecycle = WindowLifecycle::new(false);
        assert_eq!(lifecycle.handle(WindowEvent::QuitRequested), vec![E::ExitProcess]);
    }

    #[test]
    fn test_macos_close_keeps_process_and_reactivate_recreates() {
        let mut lifecycle = created(false);
        lifecycle.handle(WindowEvent::CloseRequested {
            minimise_to_tray: false,
        });
        let effects = lifecycle.handle(WindowEvent::Destroyed);
        assert_eq!(effects, vec![E::ResyncTray]);
        assert!(lifecycle.keeps_running_without_window());

        let effects = lifecycle.handle(WindowEvent::Activate);
        assert!(matches!(effects[0], E::CreateWindow { .. }));
        assert!(lifecycle.state().exists);
    }

    #[test]
    fn test_activate_existing_shows_and_focuses() {
        let mut lifecycle = created(true);
        lifecycle.handle(WindowEvent::Hide);

        let effects = lifecycle.handle(WindowEvent::Activate);
        assert_eq!(effects, vec![E::Unminimize, E::Show, E::Focus, E::ResyncTray]);
        assert!(lifecycle.state().visible);
    }

    #[test]
    fn test_every_visibility_change_resyncs_tray() {
        let mut lifecycle = created(true);
        for event in [WindowEvent::Hide, WindowEvent::Show, WindowEvent::ToggleVisibility] {
            let effects = lifecycle.handle(event);
            assert_eq!(effects.last(), Some(&E::ResyncTray), "{:?}", event);
        }
        assert!(!lifecycle.state().visible);
    }

    #[test]
    fn test_maximize_transitions_persist_once() {
        let mut lifecycle = created(true);
        assert_eq!(lifecycle.handle(WindowEvent::ToggleMaximize), vec![E::Maximize]);

        let effects = lifecycle.handle(WindowEvent::Resized { maximized: true });
        assert_eq!(effects, vec![E::PersistMaximized(true)]);

        // Plain resizes while maximised do not persist again.
        assert!(lifecycle.handle(WindowEvent::Resized { maximized: true }).is_empty());

        assert_eq!(lifecycle.handle(WindowEvent::ToggleMaximize), vec![E::Unmaximize]);
        assert_eq!(
            lifecycle.handle(WindowEvent::Resized { maximized: false }),
            vec![E::PersistMaximized(false)]
        );
    }

    #[test]
    fn test_events_without_window_are_noops() {
        let mut lifecycle = WindowLifecycle::new(true);
        for event in [
            WindowEvent::Hide,
            WindowEvent::Minimize,
            WindowEvent::ToggleMaximize,
            WindowEvent::Resized { maximized: true },
            WindowEvent::Destroyed,
            WindowEvent::CloseRequested {
                minimise_to_tray: true,
            },
        ] {
            assert!(lifecycle.handle(event).is_empty(), "{:?}", event);
        }
    }
}
