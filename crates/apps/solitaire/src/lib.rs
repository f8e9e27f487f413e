//! Klondike solitaire app: a menu bar, the board rendered from engine state,
//! and a status line. All game rules live in [`engine`]; this layer only
//! forwards clicks and re-renders.

mod engine;

use desktop_app_contract::{AppModule, AppMountContext};
use engine::{Card, SolitaireGame, Suit, FOUNDATION_COUNT, TABLEAU_COUNT};
use leptos::*;

const TABLEAU_FAN_OFFSET_PX: i32 = 22;

/// Registry entry for the desktop runtime.
pub fn app_module() -> AppModule {
    AppModule::new(mount)
}

fn mount(_context: AppMountContext) -> View {
    view! { <SolitaireApp /> }.into_view()
}

fn card_view(card: Card, selected: bool) -> View {
    if card.face_up {
        let color_class = if card.suit.is_red() { " red" } else { " black" };
        let selected_class = if selected { " selected" } else { "" };
        view! {
            <div class=format!("sol-card face-up{}{}", color_class, selected_class)>
                <span class="sol-card-corner">
                    {card.rank_label()}
                    {card.suit.glyph()}
                </span>
                <span class="sol-card-pip">{card.suit.glyph()}</span>
            </div>
        }
        .into_view()
    } else {
        view! { <div class="sol-card face-down"></div> }.into_view()
    }
}

fn empty_slot_view(label: &'static str) -> View {
    view! { <div class="sol-slot">{label}</div> }.into_view()
}

#[component]
fn SolitaireApp() -> impl IntoView {
    let game = create_rw_signal(SolitaireGame::new_game(&mut rand::thread_rng()));
    let new_game = move |_| game.set(SolitaireGame::new_game(&mut rand::thread_rng()));

    view! {
        <div class="app app-solitaire">
            <div class="sol-menubar">
                <button class="sol-menu-option" on:click=new_game>
                    "New Game"
                </button>
                // Permanently disabled; no undo stack or hint engine exists.
                <button class="sol-menu-option" disabled=true>
                    "Undo"
                </button>
                <button class="sol-menu-option" disabled=true>
                    "Hint"
                </button>
            </div>

            <Show when=move || game.get().is_won() fallback=|| ()>
                <div class="sol-win-banner">
                    {move || {
                        let g = game.get();
                        format!("You win! Score {} in {} moves", g.score(), g.moves())
                    }}
                </div>
            </Show>

            <div
                class="sol-board"
                on:click=move |_| game.update(|g| g.clear_selection())
            >
                <div class="sol-upper-row">
                    <div
                        class="sol-cell sol-stock"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            game.update(|g| g.draw_from_stock());
                        }
                    >
                        {move || {
                            if game.get().stock_len() > 0 {
                                view! { <div class="sol-card face-down"></div> }.into_view()
                            } else {
                                empty_slot_view("\u{21BB}")
                            }
                        }}
                    </div>

                    <div
                        class="sol-cell sol-waste"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            game.update(|g| g.click_waste());
                        }
                    >
                        {move || {
                            let g = game.get();
                            match g.waste_top() {
                                Some(card) => card_view(card, g.is_waste_selected()),
                                None => empty_slot_view(""),
                            }
                        }}
                    </div>

                    <div class="sol-foundations">
                        <For each=move || 0..FOUNDATION_COUNT key=|index| *index let:index>
                            <div
                                class="sol-cell sol-foundation"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    game.update(|g| g.click_foundation(index));
                                }
                            >
                                {move || {
                                    match game.get().foundation(index).last().copied() {
                                        Some(card) => card_view(card, false),
                                        None => empty_slot_view(Suit::ALL[index].glyph()),
                                    }
                                }}
                            </div>
                        </For>
                    </div>
                </div>

                <div class="sol-tableau">
                    <For each=move || 0..TABLEAU_COUNT key=|pile| *pile let:pile>
                        <div
                            class="sol-pile"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                game.update(|g| g.click_empty_tableau(pile));
                            }
                        >
                            <For
                                each=move || 0..game.with(|g| g.tableau_pile(pile).len())
                                key=|card_index| *card_index
                                let:card_index
                            >
                                {move || {
                                    let g = game.get();
                                    let Some(card) =
                                        g.tableau_pile(pile).get(card_index).copied()
                                    else {
                                        return ().into_view();
                                    };
                                    let selected = g.is_tableau_card_selected(pile, card_index);
                                    let offset = card_index as i32 * TABLEAU_FAN_OFFSET_PX;
                                    view! {
                                        <div
                                            class="sol-stacked"
                                            style=format!("top:{}px;", offset)
                                            on:click=move |ev| {
                                                ev.stop_propagation();
                                                game.update(|g| {
                                                    g.click_tableau_card(pile, card_index)
                                                });
                                            }
                                        >
                                            {card_view(card, selected)}
                                        </div>
                                    }
                                        .into_view()
                                }}
                            </For>
                        </div>
                    </For>
                </div>
            </div>

            <div class="app-statusbar">
                <span>{move || format!("Score: {}", game.get().score())}</span>
                <span>{move || format!("Moves: {}", game.get().moves())}</span>
            </div>
        </div>
    }
}
