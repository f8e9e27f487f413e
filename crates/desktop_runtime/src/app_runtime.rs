//! Per-window app session state owned by the desktop shell.
//!
//! Every managed window gets a lifecycle signal its app can observe. Sessions
//! are pruned when their window leaves the live set, after the window's
//! `Closing` event has been delivered.

use std::collections::{BTreeSet, HashMap};

use desktop_app_contract::AppLifecycleEvent;
use leptos::*;

use crate::model::{WindowId, WindowRecord};

#[derive(Clone, Copy)]
/// Reactive per-window app session signals.
pub struct WindowAppSession {
    /// Latest lifecycle value for the window.
    pub lifecycle: RwSignal<AppLifecycleEvent>,
}

#[derive(Default)]
/// Runtime-owned app session state.
pub struct AppRuntimeState {
    sessions: HashMap<WindowId, WindowAppSession>,
}

impl AppRuntimeState {
    fn ensure_session(&mut self, window_id: WindowId) -> WindowAppSession {
        if let Some(session) = self.sessions.get(&window_id).copied() {
            return session;
        }

        let session = WindowAppSession {
            lifecycle: create_rw_signal(AppLifecycleEvent::Mounted),
        };
        self.sessions.insert(window_id, session);
        session
    }

    fn set_lifecycle(&mut self, window_id: WindowId, event: AppLifecycleEvent) {
        let session = self.ensure_session(window_id);
        session.lifecycle.set(event);
    }

    fn sync_windows(&mut self, windows: &[WindowRecord]) {
        let active: BTreeSet<WindowId> = windows.iter().map(|win| win.id).collect();

        for window_id in &active {
            self.ensure_session(*window_id);
        }

        self.sessions
            .retain(|window_id, _| active.contains(window_id));
    }
}

/// Ensures and returns a per-window runtime app session.
pub fn ensure_window_session(
    runtime_state: RwSignal<AppRuntimeState>,
    window_id: WindowId,
) -> WindowAppSession {
    if let Some(session) =
        runtime_state.with_untracked(|state| state.sessions.get(&window_id).copied())
    {
        return session;
    }

    let mut session = None;
    runtime_state.update(|state| {
        session = Some(state.ensure_session(window_id));
    });
    session.expect("window app session ensured")
}

/// Syncs app session state with the currently open windows.
pub fn sync_runtime_sessions(runtime_state: RwSignal<AppRuntimeState>, windows: &[WindowRecord]) {
    runtime_state.update(|state| state.sync_windows(windows));
}

/// Applies an app lifecycle event to a window session.
pub fn set_window_lifecycle(
    runtime_state: RwSignal<AppRuntimeState>,
    window_id: WindowId,
    event: AppLifecycleEvent,
) {
    runtime_state.update(|state| state.set_lifecycle(window_id, event));
}
