//! Reducer actions, side-effect intents, and transition logic for the
//! desktop window manager.

use desktop_app_contract::AppLifecycleEvent;
use thiserror::Error;

use crate::model::{
    DesktopState, DragSession, InteractionState, OpenWindowRequest, PointerPosition,
    ResizeSession, WindowId, WindowRecord, WindowRect, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH, WINDOW_CASCADE_ORIGIN, WINDOW_CASCADE_STEP,
};
use crate::window_manager::{
    clamp_dragged_rect, focus_window_internal, normalize_focus, resize_rect, topmost_visible,
    MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window using the supplied request.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window and hand focus to the topmost remaining window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Restore a minimized window and focus it.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize into the viewport, or restore the pre-maximize geometry.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
        /// Viewport rectangle to maximize into.
        viewport: WindowRect,
    },
    /// Taskbar button behavior: restore if minimized, minimize if focused,
    /// focus otherwise.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Toggle the start menu open/closed.
    ToggleStartMenu,
    /// Close the start menu if open.
    CloseStartMenu,
    /// Begin dragging a window by its titlebar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
        /// Desktop viewport used to clamp the drag.
        viewport: WindowRect,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window from its corner handle.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to
/// execute, in order.
pub enum RuntimeEffect {
    /// Deliver a lifecycle event to the app mounted in a window.
    AppLifecycle(WindowId, AppLifecycleEvent),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing
/// window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting
/// side effects.
///
/// This function is the authoritative state transition engine for window
/// management. Lifecycle effects are ordered: a window's `Closing` event is
/// emitted before any effect caused by its removal.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a
/// window that is not present. The state is left unchanged in that case.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let window_id = next_window_id(state);
            let cascade = WINDOW_CASCADE_STEP * state.windows.len() as i32;
            let rect = WindowRect {
                x: req.x.unwrap_or(WINDOW_CASCADE_ORIGIN.0 + cascade),
                y: req.y.unwrap_or(WINDOW_CASCADE_ORIGIN.1 + cascade),
                w: req.width.unwrap_or(DEFAULT_WINDOW_WIDTH),
                h: req.height.unwrap_or(DEFAULT_WINDOW_HEIGHT),
            }
            .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
            let record = WindowRecord {
                id: window_id,
                app_id: req.app_id,
                title: req.title.unwrap_or_else(|| "Untitled".to_string()),
                icon_glyph: req
                    .icon_glyph
                    .unwrap_or_else(|| req.app_id.icon_glyph().to_string()),
                rect,
                restore_rect: None,
                z_index: 0,
                is_focused: false,
                minimized: false,
                maximized: false,
                resizable: req.resizable,
                launch_params: req.launch_params,
            };
            state.windows.push(record);
            focus_and_track(state, &mut effects, window_id)?;
            state.start_menu_open = false;
        }
        DesktopAction::CloseWindow { window_id } => {
            let index = state
                .windows
                .iter()
                .position(|w| w.id == window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            effects.push(RuntimeEffect::AppLifecycle(
                window_id,
                AppLifecycleEvent::Closing,
            ));
            state.windows.remove(index);
            clear_interaction_for(interaction, window_id);
            if let Some(next) = topmost_visible(state) {
                focus_and_track(state, &mut effects, next)?;
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            focus_and_track(state, &mut effects, window_id)?;
            state.start_menu_open = false;
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.minimized = true;
            window.is_focused = false;
            effects.push(RuntimeEffect::AppLifecycle(
                window_id,
                AppLifecycleEvent::Minimized,
            ));
            if let Some(next) = topmost_visible(state) {
                focus_and_track(state, &mut effects, next)?;
            }
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.minimized {
                effects.push(RuntimeEffect::AppLifecycle(
                    window_id,
                    AppLifecycleEvent::Restored,
                ));
            }
            focus_and_track(state, &mut effects, window_id)?;
        }
        DesktopAction::ToggleMaximize {
            window_id,
            viewport,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.resizable {
                return Ok(effects);
            }
            if window.maximized {
                if let Some(restore_rect) = window.restore_rect.take() {
                    window.rect = restore_rect;
                }
                window.maximized = false;
                effects.push(RuntimeEffect::AppLifecycle(
                    window_id,
                    AppLifecycleEvent::Restored,
                ));
            } else {
                // Snapshot exactly once per maximize cycle; a stale snapshot
                // must never be clobbered with maximized geometry.
                if window.restore_rect.is_none() {
                    window.restore_rect = Some(window.rect);
                }
                window.rect = viewport.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
                window.maximized = true;
                window.minimized = false;
                effects.push(RuntimeEffect::AppLifecycle(
                    window_id,
                    AppLifecycleEvent::Maximized,
                ));
            }
            focus_and_track(state, &mut effects, window_id)?;
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let focused = state.focused_window_id() == Some(window_id);
            let minimized = state
                .window(window_id)
                .map(|w| w.minimized)
                .ok_or(ReducerError::WindowNotFound)?;
            let follow_up = if minimized {
                DesktopAction::RestoreWindow { window_id }
            } else if focused {
                DesktopAction::MinimizeWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            effects.extend(reduce_desktop(state, interaction, follow_up)?);
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::BeginMove {
            window_id,
            pointer,
            viewport,
        } => {
            let (rect_start, maximized) = state
                .window(window_id)
                .map(|w| (w.rect, w.maximized))
                .ok_or(ReducerError::WindowNotFound)?;
            focus_and_track(state, &mut effects, window_id)?;
            if !maximized {
                interaction.dragging = Some(DragSession {
                    window_id,
                    pointer_start: pointer,
                    rect_start,
                    viewport,
                });
            }
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let dragged = session.rect_start.offset(dx, dy);
                let clamped = clamp_dragged_rect(dragged, session.viewport);
                let window = find_window_mut(state, session.window_id)?;
                if !window.maximized {
                    window.rect = clamped;
                }
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::BeginResize { window_id, pointer } => {
            let (rect_start, resizable, maximized) = state
                .window(window_id)
                .map(|w| (w.rect, w.resizable, w.maximized))
                .ok_or(ReducerError::WindowNotFound)?;
            focus_and_track(state, &mut effects, window_id)?;
            if resizable && !maximized {
                interaction.resizing = Some(ResizeSession {
                    window_id,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let resized = resize_rect(session.rect_start, dx, dy);
                let window = find_window_mut(state, session.window_id)?;
                if !window.maximized && window.resizable {
                    window.rect = resized;
                }
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
    }

    normalize_focus(state);
    Ok(effects)
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound)
}

/// Focuses `window_id` and records the Blurred/Focused lifecycle pair when
/// focus actually moved.
fn focus_and_track(
    state: &mut DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    window_id: WindowId,
) -> Result<(), ReducerError> {
    let previously = state.focused_window_id();
    if !focus_window_internal(state, window_id) {
        return Err(ReducerError::WindowNotFound);
    }
    if previously != Some(window_id) {
        if let Some(previous) = previously {
            effects.push(RuntimeEffect::AppLifecycle(
                previous,
                AppLifecycleEvent::Blurred,
            ));
        }
        effects.push(RuntimeEffect::AppLifecycle(
            window_id,
            AppLifecycleEvent::Focused,
        ));
    }
    Ok(())
}

fn clear_interaction_for(interaction: &mut InteractionState, window_id: WindowId) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.resizing = None;
    }
}
