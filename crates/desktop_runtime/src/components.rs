//! Desktop shell UI composition and interaction surfaces.

mod taskbar;
mod window;

use leptos::*;

use self::{taskbar::Taskbar, window::DesktopWindow};
use crate::{
    apps,
    model::{PointerPosition, WindowRect},
    reducer::DesktopAction,
    runtime_context::{use_desktop_runtime, DesktopRuntimeContext},
    window_manager::{MIN_WINDOW_HEIGHT, TASKBAR_HEIGHT},
};

pub(crate) const TASKBAR_HEIGHT_PX: i32 = TASKBAR_HEIGHT;

/// Full browser viewport; the drag clamp reserves the taskbar strip itself.
pub(crate) fn full_viewport_rect() -> WindowRect {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let w = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(1280.0) as i32;
            let h = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(720.0) as i32;
            return WindowRect { x: 0, y: 0, w, h };
        }
    }

    WindowRect {
        x: 0,
        y: 0,
        w: 1280,
        h: 720,
    }
}

/// Desktop working area: the viewport minus the taskbar strip. Maximize
/// target.
pub(crate) fn desktop_viewport_rect() -> WindowRect {
    let full = full_viewport_rect();
    WindowRect {
        h: (full.h - TASKBAR_HEIGHT_PX).max(MIN_WINDOW_HEIGHT),
        ..full
    }
}

pub(crate) fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

pub(crate) fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext) {
    let interaction = runtime.interaction.get_untracked();
    if interaction.dragging.is_some() {
        runtime.dispatch_action(DesktopAction::EndMove);
    }
    if interaction.resizing.is_some() {
        runtime.dispatch_action(DesktopAction::EndResize);
    }
}

#[component]
/// Renders the full desktop shell: wallpaper surface, desktop icons, managed
/// windows, and the taskbar.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let interaction = runtime.interaction.get_untracked();

        if interaction.dragging.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateMove { pointer });
        }
        if interaction.resizing.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateResize { pointer });
        }
    };
    let on_pointer_end = move |_| end_active_pointer_interaction(runtime);

    view! {
        <div
            class="desktop-shell"
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div
                class="desktop"
                on:mousedown=move |_| {
                    if state.get_untracked().start_menu_open {
                        runtime.dispatch_action(DesktopAction::CloseStartMenu);
                    }
                }
            >
                <DesktopIcons />
                <For each=move || state.get().windows key=|win| win.id let:win>
                    <DesktopWindow window_id=win.id />
                </For>
            </div>
            <Taskbar />
        </div>
    }
}

#[component]
fn DesktopIcons() -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <div class="desktop-icons">
            <For
                each=move || apps::desktop_icon_apps()
                key=|app| app.app_id.slug()
                let:app
            >
                <button
                    class="desktop-icon"
                    on:dblclick=move |_| {
                        runtime.dispatch_action(DesktopAction::OpenWindow(apps::launch_request(
                            app.app_id,
                        )));
                    }
                >
                    <span class="desktop-icon-glyph">{app.app_id.icon_glyph()}</span>
                    <span class="desktop-icon-label">{app.launcher_label}</span>
                </button>
            </For>
        </div>
    }
}
