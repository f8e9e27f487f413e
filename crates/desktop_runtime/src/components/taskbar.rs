use std::time::Duration;

use super::*;
use crate::model::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaskbarClockSnapshot {
    hour: u32,
    minute: u32,
}

impl TaskbarClockSnapshot {
    fn now() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let date = js_sys::Date::new_0();
            return Self {
                hour: date.get_hours(),
                minute: date.get_minutes(),
            };
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self { hour: 0, minute: 0 }
        }
    }
}

fn format_taskbar_clock(snapshot: TaskbarClockSnapshot) -> String {
    let mut hour = snapshot.hour % 12;
    if hour == 0 {
        hour = 12;
    }
    let suffix = if snapshot.hour >= 12 { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, snapshot.minute, suffix)
}

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let clock = create_rw_signal(TaskbarClockSnapshot::now());
    if let Ok(interval) = set_interval_with_handle(
        move || clock.set(TaskbarClockSnapshot::now()),
        Duration::from_secs(1),
    ) {
        on_cleanup(move || interval.clear());
    }

    let toggle_start = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.dispatch_action(DesktopAction::ToggleStartMenu);
    };

    view! {
        <footer class="taskbar">
            <button
                class="start-button"
                class:active=move || state.get().start_menu_open
                on:mousedown=move |ev| ev.stop_propagation()
                on:click=toggle_start
            >
                "Start"
            </button>
            <Show when=move || state.get().start_menu_open fallback=|| ()>
                <StartMenu />
            </Show>
            <div class="taskbar-windows">
                <For each=move || state.get().windows key=|win| win.id let:win>
                    <TaskbarWindowButton window_id=win.id />
                </For>
            </div>
            <div class="taskbar-clock">{move || format_taskbar_clock(clock.get())}</div>
        </footer>
    }
}

#[component]
fn TaskbarWindowButton(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let window = Signal::derive(move || {
        state
            .get()
            .windows
            .into_iter()
            .find(|w| w.id == window_id)
    });

    view! {
        <Show when=move || window.get().is_some() fallback=|| ()>
            {move || {
                let win = window.get().expect("window exists while shown");
                let active_class = if win.is_focused { " active" } else { "" };
                view! {
                    <button
                        class=format!("taskbar-window-button{}", active_class)
                        on:click=move |_| {
                            runtime
                                .dispatch_action(DesktopAction::ToggleTaskbarWindow { window_id });
                        }
                    >
                        <span class="taskbar-window-icon">{win.icon_glyph.clone()}</span>
                        <span class="taskbar-window-title">{win.title.clone()}</span>
                    </button>
                }
                    .into_view()
            }}
        </Show>
    }
}

#[component]
fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <nav class="start-menu" on:mousedown=move |ev| ev.stop_propagation()>
            <For
                each=move || apps::app_registry().to_vec()
                key=|app| app.app_id.slug()
                let:app
            >
                <button
                    class="start-menu-item"
                    on:click=move |_| {
                        runtime.dispatch_action(DesktopAction::OpenWindow(apps::launch_request(
                            app.app_id,
                        )));
                    }
                >
                    <span class="start-menu-icon">{app.app_id.icon_glyph()}</span>
                    <span class="start-menu-label">{app.launcher_label}</span>
                </button>
            </For>
        </nav>
    }
}
