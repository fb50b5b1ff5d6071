//! Cost affordability and charging.
//!
//! Scalar costs (coins, power, popularity, combat cards) come from the
//! player record. Resource costs come from resources on spaces the payer
//! controls.
//!
//! ## Coercion
//!
//! The flexible payer may cover a total shortfall of exactly one resource
//! unit with one combat card, once per turn. This is only offered to the
//! seat whose turn it is.

use crate::actions::Choice;
use crate::core::PlayerId;
use crate::game::{Cost, GameState, Resource, Resources};

/// Resource units owed beyond what `player` controls.
#[must_use]
pub fn shortfall(state: &GameState, player: PlayerId, cost: &Cost) -> u32 {
    let controlled = state.controlled_resources(player);
    Resource::ALL
        .iter()
        .map(|&r| u32::from(cost.resource_amount(r).saturating_sub(controlled[r])))
        .sum()
}

/// Whether `player` can pay `cost` now.
#[must_use]
pub fn can_pay(state: &GameState, player: PlayerId, cost: &Cost) -> bool {
    let p = state.player(player);
    if u32::from(cost.coins) > p.coins
        || cost.power > p.power
        || cost.popularity > p.popularity
        || usize::from(cost.combat_cards) > p.card_count()
    {
        return false;
    }
    match shortfall(state, player, cost) {
        0 => true,
        1 => can_coerce(state, player, cost),
        _ => false,
    }
}

fn can_coerce(state: &GameState, player: PlayerId, cost: &Cost) -> bool {
    let p = state.player(player);
    p.faction.is_flexible_payer()
        && !state.coercion_used()
        && player == state.current()
        && p.card_count() > usize::from(cost.combat_cards)
}

/// Deduct `cost` from `player`.
///
/// Scalars are deducted at once, combat cards lowest first. For each
/// resource type: with more under control than owed, one `SpendResource`
/// choice is pushed per unit; with exactly enough, everything is removed;
/// one short, everything is removed and a `Coercion` choice is pushed.
pub fn charge(mut state: GameState, player: PlayerId, cost: &Cost) -> GameState {
    {
        let p = state.player_mut(player);
        p.coins = p.coins.saturating_sub(u32::from(cost.coins));
        p.lose_power(cost.power);
        p.lose_popularity(cost.popularity);
    }
    let cards = state.player_mut(player).take_lowest_cards(cost.combat_cards);
    state.discard_cards(cards);

    if cost.uses_no_resources() {
        return state;
    }

    let controlled = state.controlled_resources(player);
    for resource in Resource::ALL {
        let owed = cost.resource_amount(resource);
        let have = controlled[resource];
        if owed == 0 {
            continue;
        }
        if have > owed {
            for _ in 0..owed {
                state.push(Choice::SpendResource { player, resource }.into());
            }
            continue;
        }
        for space in state.spaces_with_resource(player, resource) {
            let here = state.resources_at(space)[resource];
            state.remove_resources(space, Resources::of(resource, here));
        }
        if have < owed {
            state.set_coercion_used();
            state.push(Choice::Coercion { player }.into());
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::core::GameConfig;
    use crate::game::Faction;

    fn empty_stack(config: GameConfig) -> GameState {
        let mut state = GameState::new(config);
        while state.top().is_some() {
            state.pop();
        }
        state
    }

    #[test]
    fn test_scalar_costs() {
        let state = empty_stack(GameConfig::default());
        let p = PlayerId::new(0);
        assert!(can_pay(&state, p, &Cost::coins(4)));
        assert!(!can_pay(&state, p, &Cost::coins(5)));
        assert!(can_pay(&state, p, &Cost::power(4)));
        assert!(!can_pay(&state, p, &Cost::power(5)));
    }

    #[test]
    fn test_resources_must_be_controlled() {
        let mut state = empty_stack(GameConfig::default());
        let p = PlayerId::new(0);
        let exit = state.board().exits(Faction::Nordic)[0];
        let cost = Cost::resource(Resource::Oil, 2);

        state.add_resources(crate::board::SpaceId::grid(5, 5), Resources::of(Resource::Oil, 5));
        assert!(!can_pay(&state, p, &cost));

        state.add_resources(exit, Resources::of(Resource::Oil, 2));
        assert!(can_pay(&state, p, &cost));
    }

    #[test]
    fn test_charge_exact_removes_directly() {
        let mut state = empty_stack(GameConfig::default());
        let p = PlayerId::new(0);
        let exits = state.board().exits(Faction::Nordic).to_vec();
        state.add_resources(exits[0], Resources::of(Resource::Wood, 1));
        state.add_resources(exits[1], Resources::of(Resource::Wood, 1));

        let state = charge(state, p, &Cost::resource(Resource::Wood, 2));
        assert_eq!(state.controlled_resources(p)[Resource::Wood], 0);
        assert!(state.stack().is_empty());
    }

    #[test]
    fn test_charge_surplus_pushes_spend_choices() {
        let mut state = empty_stack(GameConfig::default());
        let p = PlayerId::new(0);
        let exits = state.board().exits(Faction::Nordic).to_vec();
        state.add_resources(exits[0], Resources::of(Resource::Wood, 2));
        state.add_resources(exits[1], Resources::of(Resource::Wood, 1));

        let state = charge(state, p, &Cost::resource(Resource::Wood, 2));
        assert_eq!(state.stack().len(), 2);
        assert!(state
            .stack()
            .iter()
            .all(|a| matches!(a, Action::Choice(Choice::SpendResource { .. }))));
        assert_eq!(state.controlled_resources(p)[Resource::Wood], 3);
    }

    #[test]
    fn test_charge_discards_lowest_cards() {
        let mut state = empty_stack(GameConfig::default());
        let p = PlayerId::new(0);
        state.player_mut(p).hand = im::Vector::from(vec![4, 2, 5]);
        let cost = Cost { combat_cards: 2, ..Cost::FREE };
        let state = charge(state, p, &cost);
        assert_eq!(state.player(p).hand, im::Vector::from(vec![5]));
        assert_eq!(state.discard_pile().len(), 2);
    }

    #[test]
    fn test_coercion_current_player_only() {
        let config = GameConfig::new(Faction::Crimea, Faction::Nordic);
        let mut state = empty_stack(config);
        let crimea = PlayerId::new(0);
        state.player_mut(crimea).hand = im::Vector::from(vec![3]);
        let cost = Cost::resource(Resource::Food, 1);

        assert!(can_pay(&state, crimea, &cost));
        assert!(!can_pay(&state, crimea, &Cost::resource(Resource::Food, 2)));

        let state = charge(state, crimea, &cost);
        assert!(state.coercion_used());
        assert!(matches!(
            state.top(),
            Some(Action::Choice(Choice::Coercion { .. }))
        ));
        assert!(!can_pay(&state, crimea, &cost));
    }

    #[test]
    fn test_coercion_needs_a_card_and_the_turn() {
        let config = GameConfig::new(Faction::Nordic, Faction::Crimea);
        let mut state = empty_stack(config);
        let crimea = PlayerId::new(1);
        state.player_mut(crimea).hand = im::Vector::from(vec![3]);
        assert!(!can_pay(&state, crimea, &Cost::resource(Resource::Food, 1)));
    }
}
