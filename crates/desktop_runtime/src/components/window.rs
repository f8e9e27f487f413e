use super::*;
use crate::app_runtime::ensure_window_session;
use crate::model::WindowId;
use desktop_app_contract::AppMountContext;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let window = Signal::derive(move || {
        runtime
            .state
            .get()
            .windows
            .into_iter()
            .find(|w| w.id == window_id)
    });

    let focus = move |_| {
        let should_focus = window
            .get()
            .map(|w| !w.is_focused || w.minimized)
            .unwrap_or(false);
        if should_focus {
            runtime.dispatch_action(DesktopAction::FocusWindow { window_id });
        }
    };
    let minimize = move |_| runtime.dispatch_action(DesktopAction::MinimizeWindow { window_id });
    let close = move |_| runtime.dispatch_action(DesktopAction::CloseWindow { window_id });
    let toggle_maximize = move |_| {
        runtime.dispatch_action(DesktopAction::ToggleMaximize {
            window_id,
            viewport: desktop_viewport_rect(),
        });
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id,
            pointer: pointer_from_pointer_event(&ev),
            viewport: full_viewport_rect(),
        });
    };
    let begin_resize = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id,
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let titlebar_double_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        let resizable = window.get().map(|w| w.resizable).unwrap_or(false);
        if resizable {
            runtime.dispatch_action(DesktopAction::ToggleMaximize {
                window_id,
                viewport: desktop_viewport_rect(),
            });
        }
    };

    view! {
        <Show when=move || window.get().is_some() fallback=|| ()>
            {move || {
                let win = window.get().expect("window exists while shown");
                let style = format!(
                    "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
                    win.rect.x, win.rect.y, win.rect.w, win.rect.h, win.z_index
                );
                let focused_class = if win.is_focused { " focused" } else { "" };
                let minimized_class = if win.minimized { " minimized" } else { "" };
                let maximized_class = if win.maximized { " maximized" } else { "" };

                view! {
                    <section
                        class=format!(
                            "window{}{}{}",
                            focused_class,
                            minimized_class,
                            maximized_class
                        )
                        style=style
                        on:pointerdown=focus
                    >
                        <header
                            class="window-titlebar"
                            on:pointerdown=begin_move
                            on:dblclick=titlebar_double_click
                        >
                            <div class="window-title">
                                <span class="window-icon">{win.icon_glyph.clone()}</span>
                                <span class="window-title-text">{win.title.clone()}</span>
                            </div>
                            <div class="window-controls">
                                <button
                                    class="window-button minimize-btn"
                                    title="Minimize"
                                    on:pointerdown=move |ev: web_sys::PointerEvent| {
                                        ev.prevent_default();
                                        ev.stop_propagation();
                                    }
                                    on:mousedown=move |ev| stop_mouse_event(&ev)
                                    on:click=move |ev| {
                                        stop_mouse_event(&ev);
                                        minimize(ev);
                                    }
                                >
                                    "_"
                                </button>
                                <Show
                                    when=move || {
                                        window.get().map(|w| w.resizable).unwrap_or(false)
                                    }
                                    fallback=|| ()
                                >
                                    <button
                                        class="window-button maximize-btn"
                                        title="Maximize"
                                        on:pointerdown=move |ev: web_sys::PointerEvent| {
                                            ev.prevent_default();
                                            ev.stop_propagation();
                                        }
                                        on:mousedown=move |ev| stop_mouse_event(&ev)
                                        on:click=move |ev| {
                                            stop_mouse_event(&ev);
                                            toggle_maximize(ev);
                                        }
                                    >
                                        "\u{25A1}"
                                    </button>
                                </Show>
                                <button
                                    class="window-button close-btn"
                                    title="Close"
                                    on:pointerdown=move |ev: web_sys::PointerEvent| {
                                        ev.prevent_default();
                                        ev.stop_propagation();
                                    }
                                    on:mousedown=move |ev| stop_mouse_event(&ev)
                                    on:click=move |ev| {
                                        stop_mouse_event(&ev);
                                        close(ev);
                                    }
                                >
                                    "\u{00D7}"
                                </button>
                            </div>
                        </header>
                        <div class="window-content">
                            <WindowBody window_id=window_id />
                        </div>
                        <Show
                            when=move || {
                                window
                                    .get()
                                    .map(|w| w.resizable && !w.maximized)
                                    .unwrap_or(false)
                            }
                            fallback=|| ()
                        >
                            <div class="window-resize-handle" on:pointerdown=begin_resize />
                        </Show>
                    </section>
                }
                    .into_view()
            }}
        </Show>
    }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let session = ensure_window_session(runtime.app_runtime, window_id);

    let contents = runtime
        .state
        .get_untracked()
        .windows
        .iter()
        .find(|w| w.id == window_id)
        .map(|w| {
            apps::render_window_contents(
                w,
                AppMountContext {
                    window_id: w.id.0,
                    launch_params: w.launch_params.clone(),
                    lifecycle: session.lifecycle.read_only(),
                },
            )
        })
        .unwrap_or_else(|| view! { <p>"Closed"</p> }.into_view());

    view! { <div class="window-body-content">{contents}</div> }
}
