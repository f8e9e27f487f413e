//! Falling-block puzzle app: an interval-driven frame loop feeds the engine
//! elapsed time, a global key listener maps controls, and the board renders
//! from state every frame. The listener and interval are torn down on
//! unmount so repeated open/close cycles never double-fire input.

mod engine;

use std::{cell::Cell, rc::Rc, time::Duration};

use desktop_app_contract::{AppLifecycleEvent, AppModule, AppMountContext};
use engine::{BlockfallGame, COLS, ROWS};
use leptos::*;

const HIGH_SCORE_GAME_ID: &str = "blockfall";
const FRAME_INTERVAL_MS: u64 = 16;

/// Registry entry for the desktop runtime.
pub fn app_module() -> AppModule {
    AppModule::new(mount)
}

fn mount(context: AppMountContext) -> View {
    view! { <BlockfallApp lifecycle=context.lifecycle /> }.into_view()
}

fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        0.0
    }
}

#[component]
fn BlockfallApp(lifecycle: ReadSignal<AppLifecycleEvent>) -> impl IntoView {
    let game = create_rw_signal(BlockfallGame::new());
    let high_score =
        create_rw_signal(platform_host::load_high_score(HIGH_SCORE_GAME_ID).unwrap_or(0));

    let last_frame = Rc::new(Cell::new(now_ms()));
    if let Ok(interval) = set_interval_with_handle(
        {
            let last_frame = last_frame.clone();
            move || {
                let now = now_ms();
                let elapsed = (now - last_frame.replace(now)).max(0.0);
                game.update(|g| g.tick(elapsed));
            }
        },
        Duration::from_millis(FRAME_INTERVAL_MS),
    ) {
        on_cleanup(move || interval.clear());
    }

    create_effect(move |_| {
        let score = game.with(|g| g.score());
        if score > high_score.get_untracked()
            && platform_host::record_high_score(HIGH_SCORE_GAME_ID, score)
        {
            high_score.set(score);
        }
    });

    // The shell keeps ticking intervals for hidden windows; pause instead of
    // dropping pieces nobody can see.
    create_effect(move |_| {
        if lifecycle.get() == AppLifecycleEvent::Minimized {
            game.update(|g| g.pause());
        }
    });

    let key_listener = window_event_listener(ev::keydown, move |ev| {
        let key = ev.key();
        if key == "r" || key == "R" {
            ev.prevent_default();
            game.update(|g| g.restart());
            return;
        }
        if game.with_untracked(|g| g.is_game_over()) {
            return;
        }
        if key == "p" || key == "P" {
            ev.prevent_default();
            game.update(|g| g.toggle_pause());
            return;
        }
        if game.with_untracked(|g| g.is_paused()) {
            return;
        }
        match key.as_str() {
            "ArrowLeft" => {
                ev.prevent_default();
                game.update(|g| {
                    g.move_left();
                });
            }
            "ArrowRight" => {
                ev.prevent_default();
                game.update(|g| {
                    g.move_right();
                });
            }
            "ArrowDown" => {
                ev.prevent_default();
                game.update(|g| g.soft_drop());
            }
            "ArrowUp" => {
                ev.prevent_default();
                game.update(|g| {
                    g.rotate();
                });
            }
            " " => {
                ev.prevent_default();
                game.update(|g| g.hard_drop());
            }
            _ => {}
        }
    });
    on_cleanup(move || key_listener.remove());

    view! {
        <div class="app app-blockfall">
            <div class="bf-playfield">
                <div
                    class="bf-board"
                    style=format!("grid-template-columns:repeat({}, 1fr);", COLS)
                >
                    <For each=move || 0..ROWS key=|row| *row let:row>
                        <For each=move || 0..COLS key=|col| *col let:col>
                            {move || {
                                match game.with(|g| g.cell_color(row, col)) {
                                    Some(color) => {
                                        view! {
                                            <div
                                                class="bf-cell filled"
                                                style=format!("background:{};", color)
                                            ></div>
                                        }
                                            .into_view()
                                    }
                                    None => view! { <div class="bf-cell"></div> }.into_view(),
                                }
                            }}
                        </For>
                    </For>
                </div>

                <Show when=move || game.get().is_paused() fallback=|| ()>
                    <div class="bf-overlay">
                        <p class="bf-overlay-title">"PAUSED"</p>
                        <p>"Press P to resume"</p>
                    </div>
                </Show>
                <Show when=move || game.get().is_game_over() fallback=|| ()>
                    <div class="bf-overlay">
                        <p class="bf-overlay-title">"GAME OVER"</p>
                        <p>{move || format!("Final score {}", game.get().score())}</p>
                        <p>"Press R to restart"</p>
                    </div>
                </Show>
            </div>

            <aside class="bf-panel">
                <div class="bf-stat">
                    <span class="bf-stat-label">"SCORE"</span>
                    <span class="bf-stat-value">{move || game.get().score()}</span>
                </div>
                <div class="bf-stat">
                    <span class="bf-stat-label">"HIGH"</span>
                    <span class="bf-stat-value">{move || high_score.get()}</span>
                </div>
                <div class="bf-stat">
                    <span class="bf-stat-label">"LEVEL"</span>
                    <span class="bf-stat-value">{move || game.get().level()}</span>
                </div>
                <div class="bf-stat">
                    <span class="bf-stat-label">"LINES"</span>
                    <span class="bf-stat-value">{move || game.get().lines()}</span>
                </div>

                <div class="bf-next">
                    <span class="bf-stat-label">"NEXT"</span>
                    {move || {
                        let kind = game.with(|g| g.next_kind());
                        let shape = kind.base_shape();
                        let color = kind.color();
                        shape
                            .into_iter()
                            .map(|row| {
                                let cells = row
                                    .into_iter()
                                    .map(|filled| {
                                        if filled {
                                            view! {
                                                <div
                                                    class="bf-cell filled"
                                                    style=format!("background:{};", color)
                                                ></div>
                                            }
                                                .into_view()
                                        } else {
                                            view! { <div class="bf-cell"></div> }.into_view()
                                        }
                                    })
                                    .collect_view();
                                view! { <div class="bf-next-row">{cells}</div> }.into_view()
                            })
                            .collect_view()
                    }}
                </div>

                <div class="bf-controls">
                    <p class="bf-stat-label">"CONTROLS"</p>
                    <p>"\u{2190} \u{2192} move"</p>
                    <p>"\u{2191} rotate"</p>
                    <p>"\u{2193} soft drop"</p>
                    <p>"Space hard drop"</p>
                    <p>"P pause / R restart"</p>
                </div>
            </aside>
        </div>
    }
}
