//! The game state value.
//!
//! ## GameState
//!
//! An immutable snapshot of one game: board occupancy and resources, the two
//! player records, the combat deck, the pending-action stack, whose turn it
//! is, per-turn flags, and the result once finished.
//!
//! All collections are `im` persistent structures and the static board and
//! config sit behind `Arc`, so cloning a state is O(1) and a clone shares
//! everything it does not change. Rules never mutate a state they were
//! given: they clone it, edit the clone through the helpers below, and
//! return it.
//!
//! ## Piece bookkeeping
//!
//! Piece locations are stored twice: `pieces` maps each piece to its space
//! and `occupants` maps each space to the pieces on it. `place_piece` and
//! `remove_piece` are the only writers and always update both.

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::faction::Faction;
use super::piece::{PieceKey, PieceKind, Structure};
use super::player::{Player, StarKind, MAX_POPULARITY, MAX_POWER, MAX_WORKERS, STAR_LIMIT, STARTING_WORKERS};
use super::resources::Resources;
use crate::actions::{Action, Choice};
use crate::board::{Adjacency, BoardMap, SpaceId};
use crate::core::{GameConfig, GameOver, GameRng, Outcome, PlayerId, PlayerMap};

/// Combat deck composition: `(value, copies)`.
pub const COMBAT_DECK: [(u8, u8); 4] = [(2, 16), (3, 12), (4, 8), (5, 6)];

/// Final outcome of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Highest scoring faction, `None` on a tie.
    pub winner: Option<Faction>,
    /// Final score per seat.
    pub scores: PlayerMap<i32>,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    config: Arc<GameConfig>,
    board: Arc<BoardMap>,

    // === Players ===
    /// Per-seat records.
    pub players: PlayerMap<Player>,

    // === Board ===
    pieces: OrdMap<PieceKey, SpaceId>,
    occupants: OrdMap<SpaceId, OrdSet<PieceKey>>,
    resources: OrdMap<SpaceId, Resources>,

    // === Combat deck ===
    deck: Vector<u8>,
    discard: Vector<u8>,
    /// Streams of the game seed consumed so far.
    rng_counter: u64,

    // === Flow ===
    stack: Vector<Action>,
    current: PlayerId,
    /// Player turns completed.
    turn: u32,
    moved_this_turn: OrdSet<PieceKey>,
    coercion_used: bool,
    result: Option<GameResult>,
}

impl GameState {
    /// Set up a new game.
    ///
    /// Each faction starts with its character on its home base and one
    /// worker on each home exit. The first seat is to take a turn.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let board = Arc::new(BoardMap::standard());
        let active = [
            config.factions[PlayerId::new(0)],
            config.factions[PlayerId::new(1)],
        ];
        let players = PlayerMap::new(|p| {
            let faction = config.factions[p];
            let adjacency = Adjacency::build(&board, faction, &[], None, &active);
            Player::new(faction, config.mats[p], Arc::new(adjacency))
        });

        let mut deck: Vec<u8> = COMBAT_DECK
            .iter()
            .flat_map(|&(value, copies)| std::iter::repeat(value).take(usize::from(copies)))
            .collect();
        GameRng::new(config.seed).shuffle(&mut deck);

        let mut state = Self {
            config: Arc::new(config),
            board,
            players,
            pieces: OrdMap::new(),
            occupants: OrdMap::new(),
            resources: OrdMap::new(),
            deck: Vector::from(deck),
            discard: Vector::new(),
            rng_counter: 0,
            stack: Vector::new(),
            current: PlayerId::new(0),
            turn: 0,
            moved_this_turn: OrdSet::new(),
            coercion_used: false,
            result: None,
        };

        for p in PlayerId::both() {
            let faction = state.faction_of(p);
            state.place_piece(PieceKey::character(faction), faction.home());
            let exits = state.board.exits(faction).to_vec();
            for (id, exit) in (0..STARTING_WORKERS).zip(exits) {
                state.place_piece(PieceKey::worker(faction, id), exit);
                state.players[p].workers.insert(id);
            }
            state.draw_cards(p, faction.starting_cards());
        }

        state.push(Action::Choice(Choice::TakeTurn { player: PlayerId::new(0) }));
        state
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &BoardMap {
        &self.board
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn current(&self) -> PlayerId {
        self.current
    }

    /// Player turns completed so far.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn player(&self, seat: PlayerId) -> &Player {
        &self.players[seat]
    }

    pub fn player_mut(&mut self, seat: PlayerId) -> &mut Player {
        &mut self.players[seat]
    }

    #[must_use]
    pub fn faction_of(&self, seat: PlayerId) -> Faction {
        self.players[seat].faction
    }

    /// Seat playing `faction`, if it is in the game.
    #[must_use]
    pub fn seat_of(&self, faction: Faction) -> Option<PlayerId> {
        PlayerId::both().find(|&p| self.faction_of(p) == faction)
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// Winning faction of a finished game (`None` while running or on a tie).
    #[must_use]
    pub fn winner(&self) -> Option<Faction> {
        self.result.as_ref().and_then(|r| r.winner)
    }

    pub(crate) fn set_result(&mut self, result: GameResult) {
        self.stack.clear();
        self.result = Some(result);
    }

    // === Action stack ===

    /// Pending actions, top of stack last.
    #[must_use]
    pub fn stack(&self) -> &Vector<Action> {
        &self.stack
    }

    #[must_use]
    pub fn top(&self) -> Option<&Action> {
        self.stack.back()
    }

    /// Push an action onto the stack.
    pub fn push(&mut self, action: Action) {
        self.stack.push_back(action);
    }

    /// Remove and return the top action.
    pub fn pop(&mut self) -> Option<Action> {
        self.stack.pop_back()
    }

    // === Turn flow ===

    #[must_use]
    pub fn has_moved(&self, piece: PieceKey) -> bool {
        self.moved_this_turn.contains(&piece)
    }

    pub(crate) fn mark_moved(&mut self, piece: PieceKey) {
        self.moved_this_turn.insert(piece);
    }

    /// Whether the flexible payer has substituted a card this turn.
    #[must_use]
    pub fn coercion_used(&self) -> bool {
        self.coercion_used
    }

    pub(crate) fn set_coercion_used(&mut self) {
        self.coercion_used = true;
    }

    /// Clear per-turn flags and pass the turn to the other seat.
    pub(crate) fn advance_turn(&mut self) {
        self.moved_this_turn = OrdSet::new();
        self.coercion_used = false;
        self.current = self.current.other();
        self.turn += 1;
    }

    // === Pieces ===

    /// Space a piece is on.
    #[must_use]
    pub fn location(&self, piece: PieceKey) -> Option<SpaceId> {
        self.pieces.get(&piece).copied()
    }

    /// Every piece and its space, in key order.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceKey, SpaceId)> + '_ {
        self.pieces.iter().map(|(&k, &s)| (k, s))
    }

    /// Pieces on a space, in key order.
    pub fn occupants(&self, space: SpaceId) -> impl Iterator<Item = PieceKey> + '_ {
        self.occupants.get(&space).into_iter().flat_map(|set| set.iter().copied())
    }

    /// Spaces with at least one piece.
    pub fn occupied_spaces(&self) -> impl Iterator<Item = SpaceId> + '_ {
        self.occupants.keys().copied()
    }

    /// Units (not structures) of `faction` on a space.
    pub fn units_at(&self, space: SpaceId, faction: Faction) -> impl Iterator<Item = PieceKey> + '_ {
        self.occupants(space)
            .filter(move |k| k.faction == faction && k.is_unit())
    }

    /// Pieces of `faction` of the given kind, with their spaces.
    pub fn pieces_of(
        &self,
        faction: Faction,
        kind: PieceKind,
    ) -> impl Iterator<Item = (PieceKey, SpaceId)> + '_ {
        self.pieces()
            .filter(move |(k, _)| k.faction == faction && k.kind == kind)
    }

    /// The structure on a space, if any.
    #[must_use]
    pub fn structure_at(&self, space: SpaceId) -> Option<PieceKey> {
        self.occupants(space).find(|k| k.kind == PieceKind::Structure)
    }

    /// Whether any unit of a faction other than `faction` is on the space.
    #[must_use]
    pub fn has_enemy_units(&self, space: SpaceId, faction: Faction) -> bool {
        self.occupants(space).any(|k| k.faction != faction && k.is_unit())
    }

    /// Whether a mech or character of a faction other than `faction` is on
    /// the space.
    #[must_use]
    pub fn has_enemy_plastic(&self, space: SpaceId, faction: Faction) -> bool {
        self.occupants(space).any(|k| k.faction != faction && k.is_plastic())
    }

    /// Put a piece on a space, moving it if it is already on the board.
    pub fn place_piece(&mut self, piece: PieceKey, to: SpaceId) {
        if let Some(from) = self.pieces.insert(piece, to) {
            self.detach(piece, from);
        }
        let mut set = self.occupants.get(&to).cloned().unwrap_or_default();
        set.insert(piece);
        self.occupants.insert(to, set);
    }

    /// Take a piece off the board.
    pub fn remove_piece(&mut self, piece: PieceKey) -> Option<SpaceId> {
        let from = self.pieces.remove(&piece)?;
        self.detach(piece, from);
        Some(from)
    }

    fn detach(&mut self, piece: PieceKey, from: SpaceId) {
        if let Some(set) = self.occupants.get(&from) {
            let rest = set.without(&piece);
            if rest.is_empty() {
                self.occupants.remove(&from);
            } else {
                self.occupants.insert(from, rest);
            }
        }
    }

    /// Add a worker for `seat` on `space`. Returns `None` at the worker cap.
    pub fn add_worker(&mut self, seat: PlayerId, space: SpaceId) -> Option<PieceKey> {
        let player = &self.players[seat];
        if player.workers.len() >= usize::from(MAX_WORKERS) {
            return None;
        }
        let id = (0..MAX_WORKERS).find(|id| !player.workers.contains(id))?;
        let key = PieceKey::worker(player.faction, id);
        self.players[seat].workers.insert(id);
        self.place_piece(key, space);
        Some(key)
    }

    /// Rebuild a seat's movement table from its abilities and mine.
    pub fn rebuild_adjacency(&mut self, seat: PlayerId) {
        let faction = self.faction_of(seat);
        let mine = self.location(PieceKey::structure(faction, Structure::Mine));
        let active = [self.faction_of(PlayerId::new(0)), self.faction_of(PlayerId::new(1))];
        let abilities = self.players[seat].abilities();
        let adjacency = Adjacency::build(&self.board, faction, &abilities, mine, &active);
        self.players[seat].adjacency = Arc::new(adjacency);
    }

    // === Resources ===

    #[must_use]
    pub fn resources_at(&self, space: SpaceId) -> Resources {
        self.resources.get(&space).copied().unwrap_or_default()
    }

    /// Spaces holding resources.
    pub fn resource_spaces(&self) -> impl Iterator<Item = (SpaceId, Resources)> + '_ {
        self.resources.iter().map(|(&s, &r)| (s, r))
    }

    pub fn add_resources(&mut self, space: SpaceId, added: Resources) {
        let mut here = self.resources_at(space);
        here.add(added);
        if !here.is_empty() {
            self.resources.insert(space, here);
        }
    }

    pub fn remove_resources(&mut self, space: SpaceId, removed: Resources) {
        let mut here = self.resources_at(space);
        here.remove(removed);
        if here.is_empty() {
            self.resources.remove(&space);
        } else {
            self.resources.insert(space, here);
        }
    }

    // === Combat deck ===

    /// Cards left in the draw pile.
    #[must_use]
    pub fn deck(&self) -> &Vector<u8> {
        &self.deck
    }

    #[must_use]
    pub fn discard_pile(&self) -> &Vector<u8> {
        &self.discard
    }

    /// Draw up to `count` cards into a seat's hand, reshuffling the discard
    /// pile when the deck runs out.
    pub fn draw_cards(&mut self, seat: PlayerId, count: u8) {
        for _ in 0..count {
            if self.deck.is_empty() {
                self.reshuffle();
            }
            match self.deck.pop_back() {
                Some(card) => self.players[seat].hand.push_back(card),
                None => break,
            }
        }
    }

    /// Move cards to the discard pile.
    pub fn discard_cards(&mut self, cards: impl IntoIterator<Item = u8>) {
        self.discard.extend(cards);
    }

    fn reshuffle(&mut self) {
        if self.discard.is_empty() {
            return;
        }
        let mut cards: Vec<u8> = std::mem::take(&mut self.discard).into_iter().collect();
        self.next_rng().shuffle(&mut cards);
        self.deck = Vector::from(cards);
    }

    /// Fresh deterministic stream for a rule that needs randomness.
    pub(crate) fn next_rng(&mut self) -> GameRng {
        let rng = GameRng::stream(self.config.seed, self.rng_counter);
        self.rng_counter += 1;
        rng
    }

    // === Stars ===

    /// Place any milestone stars both seats have earned.
    ///
    /// Returns `GameOver` once a seat has six stars.
    pub fn settle_stars(mut self) -> Outcome {
        for seat in PlayerId::both() {
            let player = &self.players[seat];
            let earned = [
                (StarKind::Upgrades, player.upgrades.len() >= 6),
                (StarKind::Mechs, player.mechs.len() >= 4),
                (StarKind::Structures, player.structures.len() >= 4),
                (StarKind::Recruits, player.recruits.len() >= 4),
                (StarKind::Workers, player.workers.len() >= usize::from(MAX_WORKERS)),
                (StarKind::Popularity, player.popularity >= MAX_POPULARITY),
                (StarKind::Power, player.power >= MAX_POWER),
            ];
            for (kind, reached) in earned {
                if reached && !self.players[seat].stars.has(kind) {
                    self.players[seat].stars.place(kind);
                }
            }
        }

        if PlayerId::both().any(|p| self.players[p].stars.count() >= STAR_LIMIT) {
            Err(GameOver(Box::new(self)))
        } else {
            Ok(self)
        }
    }

    /// Place a combat star unless the seat is at its faction's limit.
    pub fn award_combat_star(&mut self, seat: PlayerId) {
        let player = &mut self.players[seat];
        let below_limit = player
            .faction
            .combat_star_limit()
            .map_or(true, |limit| player.stars.combat < limit);
        if below_limit {
            player.stars.place(StarKind::Combat);
        }
    }
}

#[cfg(test)]
impl GameState {
    /// Panic unless the piece map and the per-space occupant sets agree.
    pub(crate) fn assert_bookkeeping(&self) {
        let mut rebuilt = std::collections::BTreeMap::new();
        for space in self.occupied_spaces() {
            assert!(self.occupants(space).next().is_some(), "empty occupant set at {space}");
            for piece in self.occupants(space) {
                let previous = rebuilt.insert(piece, space);
                assert!(previous.is_none(), "{piece:?} on {space} and {previous:?}");
            }
        }
        let pieces: std::collections::BTreeMap<PieceKey, SpaceId> = self.pieces().collect();
        assert_eq!(rebuilt, pieces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(GameConfig::default())
    }

    #[test]
    fn test_setup() {
        let state = state();
        assert_eq!(state.stack().len(), 1);
        assert!(matches!(
            state.top(),
            Some(Action::Choice(Choice::TakeTurn { .. }))
        ));
        for seat in PlayerId::both() {
            let faction = state.faction_of(seat);
            assert_eq!(state.player(seat).workers.len(), 2);
            assert_eq!(state.player(seat).stars.count(), 0);
            assert_eq!(
                state.location(PieceKey::character(faction)),
                Some(faction.home())
            );
            assert_eq!(
                state.player(seat).card_count(),
                usize::from(faction.starting_cards())
            );
        }
    }

    #[test]
    fn test_deck_size() {
        let state = state();
        let dealt: usize = PlayerId::both().map(|p| state.player(p).card_count()).sum();
        assert_eq!(state.deck().len() + dealt, 42);
    }

    #[test]
    fn test_place_piece_keeps_both_maps() {
        let mut state = state();
        let worker = PieceKey::worker(Faction::Nordic, 0);
        let from = state.location(worker).unwrap();
        let to = SpaceId::grid(1, 1);

        state.place_piece(worker, to);
        state.assert_bookkeeping();

        assert_eq!(state.location(worker), Some(to));
        assert!(state.occupants(to).any(|k| k == worker));
        assert!(!state.occupants(from).any(|k| k == worker));

        assert_eq!(state.remove_piece(worker), Some(to));
        assert_eq!(state.occupants(to).count(), 0);
        state.assert_bookkeeping();
    }

    #[test]
    fn test_resources() {
        let mut state = state();
        let space = SpaceId::grid(0, 0);
        state.add_resources(space, Resources::of(crate::game::Resource::Metal, 3));
        state.remove_resources(space, Resources::of(crate::game::Resource::Metal, 1));
        assert_eq!(state.resources_at(space)[crate::game::Resource::Metal], 2);
        state.remove_resources(space, Resources::of(crate::game::Resource::Metal, 2));
        assert_eq!(state.resource_spaces().count(), 0);
    }

    #[test]
    fn test_reshuffle_when_deck_runs_out() {
        let mut state = state();
        let seat = PlayerId::new(0);
        let remaining = state.deck().len() as u8;
        state.draw_cards(seat, remaining);
        assert!(state.deck().is_empty());

        state.discard_cards([2, 3, 4]);
        state.draw_cards(seat, 2);
        assert_eq!(state.deck().len(), 1);
        assert!(state.discard_pile().is_empty());
    }

    #[test]
    fn test_clone_shares_and_diverges() {
        let original = state();
        let mut copy = original.clone();
        assert_eq!(original, copy);
        copy.player_mut(PlayerId::new(0)).coins += 1;
        assert_ne!(original, copy);
    }

    #[test]
    fn test_settle_stars_and_game_over() {
        let mut state = state();
        let seat = PlayerId::new(1);
        state.player_mut(seat).popularity = MAX_POPULARITY;
        let state = state.settle_stars().unwrap();
        assert!(state.player(seat).stars.popularity);

        let mut state = state;
        {
            let stars = &mut state.player_mut(seat).stars;
            stars.power = true;
            stars.mechs = true;
            stars.workers = true;
            stars.combat = 2;
        }
        assert!(state.settle_stars().is_err());
    }

    #[test]
    fn test_combat_star_limit() {
        let mut state = state();
        let seat = PlayerId::new(0);
        for _ in 0..3 {
            state.award_combat_star(seat);
        }
        assert_eq!(state.player(seat).stars.combat, 2);
    }

    #[test]
    fn test_add_worker_cap() {
        let mut state = state();
        let seat = PlayerId::new(0);
        let space = SpaceId::grid(0, 4);
        for _ in 0..6 {
            assert!(state.add_worker(seat, space).is_some());
        }
        assert!(state.add_worker(seat, space).is_none());
        assert_eq!(state.player(seat).workers.len(), 8);
    }
}
