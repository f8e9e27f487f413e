//! Klondike solitaire state machine.
//!
//! All 52 cards live in exactly one of five container groups (stock, waste,
//! four foundations, seven tableau piles) at all times. Mutation happens only
//! through the click/draw protocol below; every operation either applies
//! atomically or leaves the state untouched. Illegal placements are normal
//! interaction outcomes and are silently rejected.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const FOUNDATION_COUNT: usize = 4;
pub const TABLEAU_COUNT: usize = 7;
pub const DECK_SIZE: usize = 52;

const TABLEAU_CARD_SCORE: u32 = 5;
const FOUNDATION_CARD_SCORE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn is_red(self) -> bool {
        matches!(self, Self::Hearts | Self::Diamonds)
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Hearts => "\u{2665}",
            Self::Diamonds => "\u{2666}",
            Self::Clubs => "\u{2663}",
            Self::Spades => "\u{2660}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    /// Ordinal rank, Ace = 1 through King = 13.
    pub rank: u8,
    pub face_up: bool,
}

impl Card {
    pub fn rank_label(self) -> &'static str {
        const LABELS: [&str; 13] = [
            "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
        ];
        LABELS[(self.rank - 1) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A container a selection can originate from. Foundations are destinations
/// only; the click protocol never lifts cards back off them.
pub enum SelectionSource {
    Waste,
    Tableau(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A contiguous run of `count` cards at the top of `source`.
pub struct Selection {
    pub source: SelectionSource,
    pub count: usize,
}

/// Returns whether `cards` is an unbroken alternating-color run descending by
/// exactly one rank per step.
pub fn is_valid_sequence(cards: &[Card]) -> bool {
    cards.windows(2).all(|pair| {
        let (upper, lower) = (pair[0], pair[1]);
        upper.suit.is_red() != lower.suit.is_red() && upper.rank == lower.rank + 1
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolitaireGame {
    stock: Vec<Card>,
    waste: Vec<Card>,
    foundations: [Vec<Card>; FOUNDATION_COUNT],
    tableau: [Vec<Card>; TABLEAU_COUNT],
    selection: Option<Selection>,
    score: u32,
    moves: u32,
    won: bool,
}

impl SolitaireGame {
    /// Shuffles a fresh deck (Fisher-Yates via [`SliceRandom::shuffle`]) and
    /// deals the Klondike layout: pile `i` receives `i + 1` cards with only
    /// the last face-up, the remainder forms the face-down stock.
    pub fn new_game<R: Rng>(rng: &mut R) -> Self {
        let mut deck: Vec<Card> = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in 1..=13 {
                deck.push(Card {
                    suit,
                    rank,
                    face_up: false,
                });
            }
        }
        deck.shuffle(rng);

        let mut tableau: [Vec<Card>; TABLEAU_COUNT] = Default::default();
        for i in 0..TABLEAU_COUNT {
            for (j, pile) in tableau.iter_mut().enumerate().skip(i) {
                let mut card = deck.pop().expect("deck holds enough cards for the deal");
                card.face_up = i == j;
                pile.push(card);
            }
        }

        Self {
            stock: deck,
            waste: Vec::new(),
            foundations: Default::default(),
            tableau,
            selection: None,
            score: 0,
            moves: 0,
            won: false,
        }
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn waste_top(&self) -> Option<Card> {
        self.waste.last().copied()
    }

    pub fn foundation(&self, index: usize) -> &[Card] {
        &self.foundations[index]
    }

    pub fn tableau_pile(&self, index: usize) -> &[Card] {
        &self.tableau[index]
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Whether the card at `card_index` of tableau pile `pile` is part of the
    /// current selection. Presentation derives highlights from this.
    pub fn is_tableau_card_selected(&self, pile: usize, card_index: usize) -> bool {
        match self.selection {
            Some(Selection {
                source: SelectionSource::Tableau(selected_pile),
                count,
            }) => selected_pile == pile && card_index >= self.tableau[pile].len() - count,
            _ => false,
        }
    }

    pub fn is_waste_selected(&self) -> bool {
        matches!(
            self.selection,
            Some(Selection {
                source: SelectionSource::Waste,
                ..
            })
        )
    }

    pub fn can_place_on_foundation(&self, card: Card, index: usize) -> bool {
        match self.foundations[index].last() {
            None => card.rank == 1,
            Some(top) => card.suit == top.suit && card.rank == top.rank + 1,
        }
    }

    pub fn can_place_on_tableau(&self, card: Card, index: usize) -> bool {
        match self.tableau[index].last() {
            None => card.rank == 13,
            Some(top) => {
                card.suit.is_red() != top.suit.is_red() && card.rank == top.rank - 1
            }
        }
    }

    /// Draws one card from the stock onto the waste, or recycles the waste
    /// back into the stock (reversed, face-down) when the stock is empty.
    pub fn draw_from_stock(&mut self) {
        if self.won {
            return;
        }
        self.selection = None;
        if let Some(mut card) = self.stock.pop() {
            card.face_up = true;
            self.waste.push(card);
        } else if !self.waste.is_empty() {
            self.stock = std::mem::take(&mut self.waste);
            self.stock.reverse();
            for card in &mut self.stock {
                card.face_up = false;
            }
        }
    }

    /// Click on the top waste card: auto-move to a foundation when legal,
    /// otherwise make it the selection.
    pub fn click_waste(&mut self) {
        if self.won || self.selection.is_some() {
            return;
        }
        let Some(card) = self.waste_top() else {
            return;
        };
        if !self.try_auto_move_to_foundation(card, SelectionSource::Waste) {
            self.selection = Some(Selection {
                source: SelectionSource::Waste,
                count: 1,
            });
        }
    }

    /// Click on a face-up tableau card.
    ///
    /// With a selection from another container this attempts the placement
    /// (clearing the selection on an illegal target). Without one, a single
    /// card first tries the foundations in index order; a run becomes the
    /// selection only when it validates as an alternating descending
    /// sequence.
    pub fn click_tableau_card(&mut self, pile: usize, card_index: usize) {
        if self.won || pile >= TABLEAU_COUNT || card_index >= self.tableau[pile].len() {
            return;
        }
        if !self.tableau[pile][card_index].face_up {
            return;
        }

        if let Some(selection) = self.selection {
            if selection.source != SelectionSource::Tableau(pile) {
                let first = self.selected_cards(selection)[0];
                if self.can_place_on_tableau(first, pile) {
                    self.move_selection_to_tableau(selection, pile);
                } else {
                    self.selection = None;
                }
                return;
            }
            // Re-clicking the source pile restarts selection below.
            self.selection = None;
        }

        let run = &self.tableau[pile][card_index..];
        if run.len() == 1 {
            let card = run[0];
            if self.try_auto_move_to_foundation(card, SelectionSource::Tableau(pile)) {
                return;
            }
        }
        let run = &self.tableau[pile][card_index..];
        if is_valid_sequence(run) {
            self.selection = Some(Selection {
                source: SelectionSource::Tableau(pile),
                count: self.tableau[pile].len() - card_index,
            });
        }
    }

    /// Click on an empty tableau pile slot: place the selection when legal.
    pub fn click_empty_tableau(&mut self, pile: usize) {
        if self.won || pile >= TABLEAU_COUNT || !self.tableau[pile].is_empty() {
            return;
        }
        if let Some(selection) = self.selection {
            let first = self.selected_cards(selection)[0];
            if self.can_place_on_tableau(first, pile) {
                self.move_selection_to_tableau(selection, pile);
            }
        }
    }

    /// Click on a foundation slot: place a single selected card when legal.
    pub fn click_foundation(&mut self, index: usize) {
        if self.won || index >= FOUNDATION_COUNT {
            return;
        }
        if let Some(selection) = self.selection {
            if selection.count != 1 {
                return;
            }
            let card = self.selected_cards(selection)[0];
            if self.can_place_on_foundation(card, index) {
                self.execute_move(selection, Destination::Foundation(index));
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn selected_cards(&self, selection: Selection) -> &[Card] {
        match selection.source {
            SelectionSource::Waste => {
                let len = self.waste.len();
                &self.waste[len - selection.count..]
            }
            SelectionSource::Tableau(pile) => {
                let len = self.tableau[pile].len();
                &self.tableau[pile][len - selection.count..]
            }
        }
    }

    fn try_auto_move_to_foundation(&mut self, card: Card, source: SelectionSource) -> bool {
        for index in 0..FOUNDATION_COUNT {
            if self.can_place_on_foundation(card, index) {
                self.execute_move(
                    Selection { source, count: 1 },
                    Destination::Foundation(index),
                );
                return true;
            }
        }
        false
    }

    fn move_selection_to_tableau(&mut self, selection: Selection, pile: usize) {
        self.execute_move(selection, Destination::Tableau(pile));
    }

    /// Atomic move protocol: detach the run from its source (flipping the
    /// newly exposed tableau card), append it to the destination, score per
    /// card, bump the move counter, and clear the selection.
    fn execute_move(&mut self, selection: Selection, destination: Destination) {
        let run: Vec<Card> = match selection.source {
            SelectionSource::Waste => {
                let len = self.waste.len();
                self.waste.split_off(len - selection.count)
            }
            SelectionSource::Tableau(pile) => {
                let len = self.tableau[pile].len();
                let run = self.tableau[pile].split_off(len - selection.count);
                if let Some(top) = self.tableau[pile].last_mut() {
                    top.face_up = true;
                }
                run
            }
        };

        let moved = run.len() as u32;
        match destination {
            Destination::Tableau(pile) => {
                self.tableau[pile].extend(run);
                self.score += TABLEAU_CARD_SCORE * moved;
            }
            Destination::Foundation(index) => {
                self.foundations[index].extend(run);
                self.score += FOUNDATION_CARD_SCORE * moved;
            }
        }
        self.moves += 1;
        self.selection = None;

        self.won = self.foundations.iter().all(|f| f.len() == 13);
    }
}

#[derive(Debug, Clone, Copy)]
enum Destination {
    Tableau(usize),
    Foundation(usize),
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn card(suit: Suit, rank: u8) -> Card {
        Card {
            suit,
            rank,
            face_up: true,
        }
    }

    fn empty_game() -> SolitaireGame {
        SolitaireGame {
            stock: Vec::new(),
            waste: Vec::new(),
            foundations: Default::default(),
            tableau: Default::default(),
            selection: None,
            score: 0,
            moves: 0,
            won: false,
        }
    }

    fn all_cards(game: &SolitaireGame) -> Vec<(Suit, u8)> {
        let mut cards: Vec<(Suit, u8)> = game
            .stock
            .iter()
            .chain(game.waste.iter())
            .chain(game.foundations.iter().flatten())
            .chain(game.tableau.iter().flatten())
            .map(|c| (c.suit, c.rank))
            .collect();
        cards.sort();
        cards
    }

    fn full_deck() -> Vec<(Suit, u8)> {
        let mut cards: Vec<(Suit, u8)> = Suit::ALL
            .iter()
            .flat_map(|&suit| (1..=13).map(move |rank| (suit, rank)))
            .collect();
        cards.sort();
        cards
    }

    #[test]
    fn deal_produces_klondike_layout() {
        let game = SolitaireGame::new_game(&mut StdRng::seed_from_u64(7));

        for (i, pile) in (0..TABLEAU_COUNT).map(|i| (i, game.tableau_pile(i))) {
            assert_eq!(pile.len(), i + 1);
            let (face_down, face_up) = pile.split_at(pile.len() - 1);
            assert!(face_down.iter().all(|c| !c.face_up));
            assert!(face_up[0].face_up);
        }
        assert_eq!(game.stock_len(), 24);
        assert_eq!(game.waste_top(), None);
        assert_eq!(game.score(), 0);
        assert_eq!(game.moves(), 0);
        assert!(!game.is_won());
    }

    #[test]
    fn deal_conserves_the_full_deck_without_duplicates() {
        let game = SolitaireGame::new_game(&mut StdRng::seed_from_u64(11));
        let cards = all_cards(&game);
        assert_eq!(cards.len(), DECK_SIZE);
        assert_eq!(
            cards.iter().collect::<BTreeSet<_>>().len(),
            DECK_SIZE,
            "no duplicate cards"
        );
        assert_eq!(cards, full_deck());
    }

    #[test]
    fn deck_is_conserved_across_draws_recycles_and_moves() {
        let mut game = SolitaireGame::new_game(&mut StdRng::seed_from_u64(3));

        for _ in 0..60 {
            game.draw_from_stock();
            assert_eq!(all_cards(&game), full_deck());
        }
        for pile in 0..TABLEAU_COUNT {
            let top = game.tableau_pile(pile).len().saturating_sub(1);
            game.click_tableau_card(pile, top);
            assert_eq!(all_cards(&game), full_deck());
        }
    }

    #[test]
    fn empty_foundation_accepts_only_an_ace() {
        let game = empty_game();
        assert!(game.can_place_on_foundation(card(Suit::Hearts, 1), 0));
        assert!(!game.can_place_on_foundation(card(Suit::Hearts, 2), 0));
        assert!(!game.can_place_on_foundation(card(Suit::Spades, 13), 0));
    }

    #[test]
    fn foundation_requires_same_suit_ascending_by_one() {
        let mut game = empty_game();
        game.foundations[0].push(card(Suit::Hearts, 4));

        assert!(game.can_place_on_foundation(card(Suit::Hearts, 5), 0));
        assert!(!game.can_place_on_foundation(card(Suit::Diamonds, 5), 0));
        assert!(!game.can_place_on_foundation(card(Suit::Hearts, 6), 0));
        assert!(!game.can_place_on_foundation(card(Suit::Hearts, 4), 0));
    }

    #[test]
    fn empty_tableau_accepts_only_a_king() {
        let game = empty_game();
        assert!(game.can_place_on_tableau(card(Suit::Clubs, 13), 0));
        assert!(!game.can_place_on_tableau(card(Suit::Clubs, 12), 0));
    }

    #[test]
    fn tableau_requires_alternating_color_descending_by_one() {
        let mut game = empty_game();
        game.tableau[2].push(card(Suit::Spades, 9));

        assert!(game.can_place_on_tableau(card(Suit::Hearts, 8), 2));
        assert!(game.can_place_on_tableau(card(Suit::Diamonds, 8), 2));
        assert!(!game.can_place_on_tableau(card(Suit::Clubs, 8), 2));
        assert!(!game.can_place_on_tableau(card(Suit::Hearts, 7), 2));
        assert!(!game.can_place_on_tableau(card(Suit::Hearts, 10), 2));
    }

    #[test]
    fn sequence_validator_accepts_alternating_descending_runs_only() {
        assert!(is_valid_sequence(&[
            card(Suit::Spades, 7),
            card(Suit::Hearts, 6),
            card(Suit::Clubs, 5),
        ]));
        // Same color pair.
        assert!(!is_valid_sequence(&[
            card(Suit::Spades, 7),
            card(Suit::Clubs, 6),
        ]));
        // Rank gap.
        assert!(!is_valid_sequence(&[
            card(Suit::Spades, 7),
            card(Suit::Hearts, 5),
        ]));
        // Ascending.
        assert!(!is_valid_sequence(&[
            card(Suit::Spades, 6),
            card(Suit::Hearts, 7),
        ]));
        assert!(is_valid_sequence(&[card(Suit::Spades, 7)]));
        assert!(is_valid_sequence(&[]));
    }

    #[test]
    fn clicking_a_single_card_auto_moves_to_the_first_legal_foundation() {
        let mut game = empty_game();
        // Foundations 0 and 1 both accept the next club; index 0 must win.
        game.foundations[0].push(card(Suit::Clubs, 3));
        game.foundations[1].push(card(Suit::Clubs, 3));
        game.tableau[0].push(card(Suit::Clubs, 4));

        game.click_tableau_card(0, 0);

        assert_eq!(game.foundation(0).len(), 2);
        assert_eq!(game.foundation(1).len(), 1);
        assert!(game.tableau_pile(0).is_empty());
        assert_eq!(game.selection(), None);
        assert_eq!(game.score(), FOUNDATION_CARD_SCORE);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn card_with_no_legal_foundation_becomes_the_selection() {
        let mut game = empty_game();
        game.tableau[3].push(card(Suit::Hearts, 9));

        game.click_tableau_card(3, 0);

        assert_eq!(
            game.selection(),
            Some(Selection {
                source: SelectionSource::Tableau(3),
                count: 1,
            })
        );
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn invalid_run_is_never_selectable() {
        let mut game = empty_game();
        game.tableau[1].push(card(Suit::Spades, 9));
        game.tableau[1].push(card(Suit::Clubs, 8)); // same color break

        game.click_tableau_card(1, 0);
        assert_eq!(game.selection(), None);
    }

    #[test]
    fn moving_a_run_flips_the_exposed_card_and_scores_per_card() {
        let mut game = empty_game();
        game.tableau[0].push(Card {
            suit: Suit::Diamonds,
            rank: 11,
            face_up: false,
        });
        game.tableau[0].push(card(Suit::Spades, 8));
        game.tableau[0].push(card(Suit::Hearts, 7));
        game.tableau[0].push(card(Suit::Clubs, 6));
        game.tableau[4].push(card(Suit::Diamonds, 9));

        game.click_tableau_card(0, 1);
        assert_eq!(
            game.selection(),
            Some(Selection {
                source: SelectionSource::Tableau(0),
                count: 3,
            })
        );

        game.click_tableau_card(4, 0);

        assert_eq!(game.tableau_pile(4).len(), 4);
        assert_eq!(game.tableau_pile(0).len(), 1);
        assert!(game.tableau_pile(0)[0].face_up, "exposed card flips");
        assert_eq!(game.score(), TABLEAU_CARD_SCORE * 3);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.selection(), None);
    }

    #[test]
    fn illegal_tableau_target_clears_the_selection_and_moves_nothing() {
        let mut game = empty_game();
        game.tableau[0].push(card(Suit::Hearts, 5));
        game.tableau[1].push(card(Suit::Spades, 9));

        game.click_tableau_card(0, 0);
        assert!(game.selection().is_some());

        game.click_tableau_card(1, 0);
        assert_eq!(game.selection(), None);
        assert_eq!(game.tableau_pile(0).len(), 1);
        assert_eq!(game.tableau_pile(1).len(), 1);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn only_a_king_run_moves_onto_an_empty_pile() {
        let mut game = empty_game();
        game.tableau[0].push(card(Suit::Hearts, 13));
        game.tableau[1].push(card(Suit::Hearts, 12));

        game.click_tableau_card(1, 0);
        game.click_empty_tableau(2);
        assert!(game.tableau_pile(2).is_empty(), "queen rejected");

        game.clear_selection();
        game.click_tableau_card(0, 0);
        game.click_empty_tableau(2);
        assert_eq!(game.tableau_pile(2).len(), 1, "king accepted");
    }

    #[test]
    fn draw_moves_one_card_face_up_and_recycle_restores_the_stock() {
        let mut game = empty_game();
        game.stock.push(Card {
            suit: Suit::Hearts,
            rank: 2,
            face_up: false,
        });
        game.stock.push(Card {
            suit: Suit::Spades,
            rank: 5,
            face_up: false,
        });

        game.draw_from_stock();
        assert_eq!(game.stock_len(), 1);
        assert_eq!(game.waste_top(), Some(card(Suit::Spades, 5)));

        game.draw_from_stock();
        assert_eq!(game.stock_len(), 0);
        assert_eq!(game.waste_top(), Some(card(Suit::Hearts, 2)));

        // Stock empty, waste non-empty: recycle reverses and flips down.
        game.draw_from_stock();
        assert_eq!(game.stock_len(), 2);
        assert_eq!(game.waste_top(), None);
        assert!(game.stock.iter().all(|c| !c.face_up));
        assert_eq!(game.stock[0].rank, 2, "waste reversed onto stock");
        assert_eq!(game.stock[1].rank, 5);
    }

    #[test]
    fn waste_click_auto_moves_or_selects() {
        let mut game = empty_game();
        game.waste.push(card(Suit::Hearts, 1));
        game.click_waste();
        assert_eq!(game.foundation(0).len(), 1, "ace auto-moved");
        assert_eq!(game.waste_top(), None);

        game.waste.push(card(Suit::Spades, 9));
        game.click_waste();
        assert!(game.is_waste_selected());
    }

    #[test]
    fn win_fires_exactly_when_all_four_foundations_complete_and_blocks_mutation() {
        let mut game = empty_game();
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            let top = if i < 3 { 13 } else { 11 };
            for rank in 1..=top {
                game.foundations[i].push(card(suit, rank));
            }
        }
        game.tableau[0].push(card(Suit::Spades, 12));
        game.tableau[1].push(card(Suit::Spades, 13));

        // Queen auto-moves; three foundations at 13 plus one at 12 is no win.
        game.click_tableau_card(0, 0);
        assert_eq!(game.foundation(3).len(), 12);
        assert!(!game.is_won());

        // The king completes the last foundation.
        game.click_tableau_card(1, 0);
        assert_eq!(game.foundation(3).len(), 13);
        assert!(game.is_won());

        // Terminal: no further mutation is accepted.
        let before = game.clone();
        game.draw_from_stock();
        game.click_waste();
        game.click_foundation(0);
        game.click_empty_tableau(0);
        game.click_tableau_card(0, 0);
        assert_eq!(game, before);
    }
}
