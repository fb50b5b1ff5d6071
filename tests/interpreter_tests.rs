//! Interpreter integration tests: full games driven through `apply_move`.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_factions::agents::Agent;
use rust_factions::rules::{pending_choice, skip_empty_choices};
use rust_factions::{
    apply_move, deciding_player, legal_moves, run_game, Action, Choice, GameConfig, GameMove,
    GameState, PlayerId, PlayerMap, RandomAgent, RulesError, StateChange, Verbosity,
};

fn random_agents(seed: u64) -> PlayerMap<Box<dyn Agent>> {
    PlayerMap::new(|p| Box::new(RandomAgent::new(seed + u64::from(p.0))) as Box<dyn Agent>)
}

/// Rebuild piece locations from the per-space occupants and compare them
/// with the piece map.
fn assert_locations_agree(state: &GameState) {
    let mut rebuilt = BTreeMap::new();
    for space in state.occupied_spaces() {
        for piece in state.occupants(space) {
            let previous = rebuilt.insert(piece, space);
            assert!(previous.is_none(), "{piece:?} listed on {space} and {previous:?}");
        }
    }
    let pieces: BTreeMap<_, _> = state.pieces().collect();
    assert_eq!(rebuilt, pieces);
}

/// Play uniformly random moves, checking the stack and piece locations
/// after every one.
fn checked_playout(mut state: GameState, seed: u64) -> GameState {
    let mut agents = random_agents(seed);
    assert_locations_agree(&state);
    while let Some(seat) = deciding_player(&state) {
        let mv = agents[seat].select_move(&state).unwrap();
        state = apply_move(&state, mv, Verbosity::Silent).unwrap();
        assert_locations_agree(&state);
        if !state.is_over() {
            assert!(
                matches!(state.top(), Some(Action::Choice(_))),
                "stack top must be a choice between moves"
            );
        }
    }
    state
}

// =============================================================================
// Stack Protocol
// =============================================================================

#[test]
fn test_every_move_stops_on_a_choice() {
    for seed in 0..4 {
        let state = GameState::new(GameConfig::default().with_turn_limit(16).with_seed(seed));
        let done = checked_playout(state, seed);
        assert!(done.is_over());
        assert!(done.stack().is_empty());
    }
}

#[test]
fn test_finished_game_rejects_moves() {
    let state = GameState::new(GameConfig::default().with_turn_limit(2));
    let done = run_game(state, &mut random_agents(5), Verbosity::Silent).unwrap();
    assert!(legal_moves(&done).is_empty());
    assert_eq!(deciding_player(&done), None);
    assert_eq!(
        apply_move(&done, Some(GameMove::Pass), Verbosity::Silent),
        Err(RulesError::GameFinished)
    );
}

#[test]
fn test_illegal_move_leaves_state_unchanged() {
    let state = GameState::new(GameConfig::default());
    let before = state.clone();
    let err = apply_move(&state, Some(GameMove::Int(9)), Verbosity::Silent);
    assert!(matches!(err, Err(RulesError::IllegalMove { .. })));
    assert_eq!(state, before);
}

#[test]
fn test_null_move_only_for_empty_choices() {
    let state = GameState::new(GameConfig::default());
    assert!(apply_move(&state, None, Verbosity::Silent).is_err());

    let mut state = state;
    let p = PlayerId::new(0);
    state.pop();
    for recruit in rust_factions::game::BottomAction::ALL {
        state.player_mut(p).recruits.insert(recruit);
    }
    state.push(Choice::ChooseRecruit { player: p }.into());
    assert!(apply_move(&state, Some(GameMove::Int(0)), Verbosity::Silent).is_err());
    let next = skip_empty_choices(state, Verbosity::Silent).unwrap();
    assert_eq!(pending_choice(&next).map(Choice::name), Ok("TakeTurn"));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seeds_same_game() {
    let play = || {
        let state = GameState::new(GameConfig::default().with_turn_limit(20).with_seed(7));
        run_game(state, &mut random_agents(11), Verbosity::Silent).unwrap()
    };
    let a = play();
    let b = play();
    assert_eq!(a.result(), b.result());
    assert_eq!(a.turn(), b.turn());
    assert_eq!(a, b);
}

#[test]
fn test_apply_move_is_pure() {
    let state = GameState::new(GameConfig::default());
    let first = apply_move(&state, Some(GameMove::Int(1)), Verbosity::Silent).unwrap();
    let again = apply_move(&state, Some(GameMove::Int(1)), Verbosity::Silent).unwrap();
    assert_eq!(first, again);
    assert_eq!(deciding_player(&state), Some(PlayerId::new(0)));
}

// =============================================================================
// Turn Flow
// =============================================================================

#[test]
fn test_turns_alternate_between_seats() {
    let mut state = GameState::new(GameConfig::default().with_turn_limit(6));
    let mut agents = random_agents(3);
    let mut seen = Vec::new();
    while let Some(seat) = deciding_player(&state) {
        if pending_choice(&state).map(Choice::name) == Ok("TakeTurn") {
            seen.push((state.turn(), seat));
        }
        let mv = agents[seat].select_move(&state).unwrap();
        state = apply_move(&state, mv, Verbosity::Silent).unwrap();
    }
    assert_eq!(seen.len(), 6);
    for (turn, seat) in seen {
        assert_eq!(seat, PlayerId::new((turn % 2) as u8));
    }
}

#[test]
fn test_last_turn_decides_the_winner() {
    let mut state = GameState::new(GameConfig::default().with_turn_limit(1));
    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    state.pop();
    state.push(
        Choice::Boolean {
            player: p0,
            yes: Arc::new(StateChange::GainCoins { player: p0, amount: 50 }.into()),
            no: Arc::new(StateChange::GainCoins { player: p1, amount: 50 }.into()),
        }
        .into(),
    );

    let yes = apply_move(&state, Some(GameMove::Bool(true)), Verbosity::Silent).unwrap();
    let no = apply_move(&state, Some(GameMove::Bool(false)), Verbosity::Silent).unwrap();
    assert_eq!(yes.winner(), Some(state.faction_of(p0)));
    assert_eq!(no.winner(), Some(state.faction_of(p1)));
}

#[test]
fn test_verbose_game_logs_without_panicking() {
    let _ = env_logger::builder().is_test(true).try_init();
    let state = GameState::new(GameConfig::default().with_turn_limit(4));
    let done = run_game(state, &mut random_agents(1), Verbosity::Actions).unwrap();
    assert!(done.is_over());
}
