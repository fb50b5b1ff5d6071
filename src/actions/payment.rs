//! Choices raised while paying a cost.

use crate::core::PlayerId;
use crate::game::{GameMove, GameState, Resource, Resources};

/// Controlled spaces holding `resource`.
#[must_use]
pub fn spend_options(state: &GameState, player: PlayerId, resource: Resource) -> Vec<GameMove> {
    state
        .spaces_with_resource(player, resource)
        .into_iter()
        .map(GameMove::Space)
        .collect()
}

/// Remove one unit of `resource` from the chosen space.
pub fn spend_resource(mut state: GameState, resource: Resource, mv: GameMove) -> GameState {
    if let GameMove::Space(space) = mv {
        state.remove_resources(space, Resources::of(resource, 1));
    }
    state
}

/// Distinct card values in hand, ascending.
#[must_use]
pub fn coercion_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    let mut values: Vec<u8> = state.player(player).hand.iter().copied().collect();
    values.sort_unstable();
    values.dedup();
    values.into_iter().map(GameMove::Int).collect()
}

/// Discard the chosen card in place of the missing resource.
pub fn coercion(mut state: GameState, player: PlayerId, mv: GameMove) -> GameState {
    if let GameMove::Int(value) = mv {
        if state.player_mut(player).remove_card(value) {
            state.discard_cards([value]);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::game::Faction;

    #[test]
    fn test_spend_resource() {
        let mut state = GameState::new(GameConfig::default());
        let p = PlayerId::new(0);
        let exit = state.board().exits(Faction::Nordic)[1];
        state.add_resources(exit, Resources::of(Resource::Metal, 2));

        assert_eq!(spend_options(&state, p, Resource::Metal), vec![GameMove::Space(exit)]);
        let state = spend_resource(state, Resource::Metal, GameMove::Space(exit));
        assert_eq!(state.resources_at(exit)[Resource::Metal], 1);
    }

    #[test]
    fn test_coercion_discards_chosen_card() {
        let mut state = GameState::new(GameConfig::new(Faction::Crimea, Faction::Saxony));
        let p = PlayerId::new(0);
        state.player_mut(p).hand = im::Vector::from(vec![5, 2, 5]);

        assert_eq!(
            coercion_options(&state, p),
            vec![GameMove::Int(2), GameMove::Int(5)]
        );
        let state = coercion(state, p, GameMove::Int(5));
        assert_eq!(state.player(p).hand, im::Vector::from(vec![2, 5]));
        assert_eq!(state.discard_pile().back(), Some(&5));
    }
}
