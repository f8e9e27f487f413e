//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container and app-session state;
//! UI composition stays in [`crate::components`].

use leptos::*;

use crate::{
    app_runtime::{set_window_lifecycle, sync_runtime_sessions, AppRuntimeState},
    model::{DesktopState, InteractionState},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching
/// [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Runtime app-session state.
    pub app_runtime: RwSignal<AppRuntimeState>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(children: Children) -> impl IntoView {
    let state = create_rw_signal(DesktopState::default());
    let interaction = create_rw_signal(InteractionState::default());
    let app_runtime = create_rw_signal(AppRuntimeState::default());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(effects) => {
                // Deliver lifecycle effects before pruning sessions so a
                // closing window still observes its Closing event.
                for effect in effects {
                    match effect {
                        RuntimeEffect::AppLifecycle(window_id, event) => {
                            set_window_lifecycle(app_runtime, window_id, event);
                        }
                    }
                }
                let windows_changed = desktop.windows != previous_desktop.windows;
                if desktop != previous_desktop {
                    state.set(desktop.clone());
                }
                if ui != previous_ui {
                    interaction.set(ui);
                }
                if windows_changed {
                    sync_runtime_sessions(app_runtime, &desktop.windows);
                }
            }
            Err(err) => logging::warn!("desktop reducer dropped action: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        state,
        interaction,
        app_runtime,
        dispatch,
    };

    provide_context(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
