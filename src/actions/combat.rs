//! Combat.
//!
//! A combat starts on every grid space holding plastic (mechs or a
//! character) of both factions after the Move action. It runs in stages,
//! each a choice or an automatic step:
//!
//! | Stage           | Who      | What |
//! |-----------------|----------|------|
//! | `AttackerPower` | attacker | commit 0..=7 power, at most what is owned |
//! | `AttackerCards` | attacker | accept or skip each card in hand order |
//! | `Abilities`     | -        | Disarm, Scout, then the Artillery offer |
//! | `DefenderPower` | defender | as above |
//! | `DefenderCards` | defender | as above |
//! | `Resolve`       | -        | compare totals, pay, retreat, award |
//!
//! A side may commit at most one card per mech or character it has in the
//! combat, plus one with People's Army when one of its workers is present.
//! Committed power and cards are only paid at resolution.
//!
//! Ability adjustments are recorded as a penalty on the target's total.

use smallvec::SmallVec;
use std::sync::Arc;

use crate::board::SpaceId;
use crate::core::PlayerId;
use crate::game::{Faction, GameMove, GameState, MechAbility, PieceKey, PieceKind};

use super::{Action, Choice, StateChange};

/// Most power a side may commit.
pub const MAX_COMBAT_POWER: u8 = 7;

/// Penalty from Disarm and from Artillery.
const ABILITY_PENALTY: u8 = 2;

/// What one side has put into a combat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Commitment {
    pub power: u8,
    pub cards: SmallVec<[u8; 4]>,
    pub penalty: u8,
}

impl Commitment {
    /// Power plus card values, less penalties, floored at zero.
    #[must_use]
    pub fn total(&self) -> u32 {
        let cards: u32 = self.cards.iter().map(|&c| u32::from(c)).sum();
        (u32::from(self.power) + cards).saturating_sub(u32::from(self.penalty))
    }

    fn has_committed(&self) -> bool {
        self.power > 0 || !self.cards.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatStage {
    AttackerPower,
    AttackerCards,
    Abilities,
    DefenderPower,
    DefenderCards,
    Resolve,
}

impl CombatStage {
    fn next(self) -> Self {
        match self {
            CombatStage::AttackerPower => CombatStage::AttackerCards,
            CombatStage::AttackerCards => CombatStage::Abilities,
            CombatStage::Abilities => CombatStage::DefenderPower,
            CombatStage::DefenderPower => CombatStage::DefenderCards,
            CombatStage::DefenderCards | CombatStage::Resolve => CombatStage::Resolve,
        }
    }
}

/// An ongoing combat, carried by value from stage to stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatContext {
    pub space: SpaceId,
    pub attacker: PlayerId,
    pub stage: CombatStage,
    pub attack: Commitment,
    pub defence: Commitment,
    /// Hand index of the next card offered in a card stage.
    pub next_card: u8,
}

impl CombatContext {
    #[must_use]
    pub fn new(space: SpaceId, attacker: PlayerId) -> Self {
        Self {
            space,
            attacker,
            stage: CombatStage::AttackerPower,
            attack: Commitment::default(),
            defence: Commitment::default(),
            next_card: 0,
        }
    }

    #[must_use]
    pub fn defender(&self) -> PlayerId {
        self.attacker.other()
    }

    /// Seat deciding at the current stage.
    #[must_use]
    pub fn acting(&self) -> PlayerId {
        match self.stage {
            CombatStage::DefenderPower | CombatStage::DefenderCards => self.defender(),
            _ => self.attacker,
        }
    }

    #[must_use]
    pub fn commitment(&self, seat: PlayerId) -> &Commitment {
        if seat == self.attacker {
            &self.attack
        } else {
            &self.defence
        }
    }

    pub fn commitment_mut(&mut self, seat: PlayerId) -> &mut Commitment {
        if seat == self.attacker {
            &mut self.attack
        } else {
            &mut self.defence
        }
    }

    fn advance(&mut self) {
        self.stage = self.stage.next();
        self.next_card = 0;
    }
}

// =============================================================================
// Setup
// =============================================================================

/// Queue a combat on each grid space where both factions have plastic.
pub fn check_combat(mut state: GameState, attacker: PlayerId) -> GameState {
    let combats: Vec<Action> = contested_spaces(&state)
        .into_iter()
        .map(|space| StateChange::StartCombat { space, attacker }.into())
        .collect();
    if !combats.is_empty() {
        state.push(Action::sequence(combats));
    }
    state
}

/// Grid spaces holding plastic of both factions, in id order.
#[must_use]
pub fn contested_spaces(state: &GameState) -> Vec<SpaceId> {
    state
        .occupied_spaces()
        .filter(|s| !s.is_home() && is_contested(state, *s))
        .collect()
}

fn is_contested(state: &GameState, space: SpaceId) -> bool {
    PlayerId::both().all(|p| plastic_at(state, space, state.faction_of(p)) > 0)
}

fn plastic_at(state: &GameState, space: SpaceId, faction: Faction) -> usize {
    state.units_at(space, faction).filter(PieceKey::is_plastic).count()
}

/// Begin a queued combat if the space is still contested.
pub fn start_combat(mut state: GameState, space: SpaceId, attacker: PlayerId) -> GameState {
    if is_contested(&state, space) {
        let step = next_step(&state, CombatContext::new(space, attacker));
        state.push(step);
    }
    state
}

/// Cards `seat` may commit in this combat.
#[must_use]
pub fn card_limit(state: &GameState, space: SpaceId, seat: PlayerId) -> usize {
    let faction = state.faction_of(seat);
    let mut limit = plastic_at(state, space, faction);
    let has_worker = state
        .units_at(space, faction)
        .any(|k| k.kind == PieceKind::Worker);
    if has_worker && state.player(seat).has_ability(MechAbility::PeoplesArmy) {
        limit += 1;
    }
    limit
}

/// The action for the context's stage, skipping card stages with nothing
/// left to offer.
#[must_use]
pub fn next_step(state: &GameState, mut ctx: CombatContext) -> Action {
    loop {
        match ctx.stage {
            CombatStage::AttackerPower | CombatStage::DefenderPower => {
                return Choice::CombatPower(ctx).into();
            }
            CombatStage::AttackerCards | CombatStage::DefenderCards => {
                let seat = ctx.acting();
                let in_hand = usize::from(ctx.next_card) < state.player(seat).hand.len();
                let below_limit =
                    ctx.commitment(seat).cards.len() < card_limit(state, ctx.space, seat);
                if in_hand && below_limit {
                    return Choice::CombatCard(ctx).into();
                }
                ctx.advance();
            }
            CombatStage::Abilities => return StateChange::CombatAbilities(ctx).into(),
            CombatStage::Resolve => return StateChange::ResolveCombat(ctx).into(),
        }
    }
}

// =============================================================================
// Commitments
// =============================================================================

#[must_use]
pub fn power_options(state: &GameState, ctx: &CombatContext) -> Vec<GameMove> {
    let most = state.player(ctx.acting()).power.min(MAX_COMBAT_POWER);
    (0..=most).map(GameMove::Int).collect()
}

pub fn commit_power(mut state: GameState, mut ctx: CombatContext, mv: GameMove) -> GameState {
    if let GameMove::Int(power) = mv {
        let seat = ctx.acting();
        ctx.commitment_mut(seat).power = power;
        ctx.advance();
        let step = next_step(&state, ctx);
        state.push(step);
    }
    state
}

/// `true` commits the offered card, `false` skips it.
pub fn commit_card(mut state: GameState, mut ctx: CombatContext, mv: GameMove) -> GameState {
    let GameMove::Bool(accept) = mv else {
        return state;
    };
    let seat = ctx.acting();
    if accept {
        if let Some(&card) = state.player(seat).hand.get(usize::from(ctx.next_card)) {
            ctx.commitment_mut(seat).cards.push(card);
        }
    }
    ctx.next_card += 1;
    let step = next_step(&state, ctx);
    state.push(step);
    state
}

// =============================================================================
// Abilities
// =============================================================================

/// Apply Disarm and Scout for both sides, then hand over to the defender,
/// offering Artillery first when it is usable.
pub fn combat_abilities(mut state: GameState, mut ctx: CombatContext) -> GameState {
    let on_tunnel = state.board().is_tunnel(ctx.space);

    for seat in [ctx.attacker, ctx.defender()] {
        let opponent = seat.other();
        if on_tunnel && state.player(seat).has_ability(MechAbility::Disarm) {
            ctx.commitment_mut(opponent).penalty += ABILITY_PENALTY;
        }
        if state.player(seat).has_ability(MechAbility::Scout) {
            scout(&mut state, &ctx, seat);
        }
    }
    ctx.advance();

    let gunner = [ctx.attacker, ctx.defender()].into_iter().find(|&seat| {
        let p = state.player(seat);
        p.has_ability(MechAbility::Artillery) && p.power > ctx.commitment(seat).power
    });

    let step = match gunner {
        Some(seat) => {
            let mut fired = ctx.clone();
            fired.commitment_mut(seat.other()).penalty += ABILITY_PENALTY;
            Choice::Boolean {
                player: seat,
                yes: Arc::new(Action::sequence(vec![
                    StateChange::LosePower { player: seat, amount: 1 }.into(),
                    next_step(&state, fired),
                ])),
                no: Arc::new(next_step(&state, ctx)),
            }
            .into()
        }
        None => next_step(&state, ctx),
    };
    state.push(step);
    state
}

/// Take one random uncommitted card from the opponent.
fn scout(state: &mut GameState, ctx: &CombatContext, seat: PlayerId) {
    let victim = seat.other();
    let mut spare: Vec<u8> = state.player(victim).hand.iter().copied().collect();
    for card in &ctx.commitment(victim).cards {
        if let Some(i) = spare.iter().position(|c| c == card) {
            spare.swap_remove(i);
        }
    }
    if spare.is_empty() {
        return;
    }
    spare.sort_unstable();
    let pick = state.next_rng().gen_range_usize(0..spare.len());
    let card = spare[pick];
    if state.player_mut(victim).remove_card(card) {
        state.player_mut(seat).hand.push_back(card);
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Settle a combat. The attacker wins ties.
pub fn resolve_combat(mut state: GameState, ctx: &CombatContext) -> GameState {
    let attacker_wins = ctx.attack.total() >= ctx.defence.total();
    let (winner, loser) = if attacker_wins {
        (ctx.attacker, ctx.defender())
    } else {
        (ctx.defender(), ctx.attacker)
    };
    log::trace!(
        "combat at {}: {} vs {}, {} wins",
        ctx.space,
        ctx.attack.total(),
        ctx.defence.total(),
        winner
    );

    for seat in PlayerId::both() {
        let commitment = ctx.commitment(seat);
        state.player_mut(seat).lose_power(commitment.power);
        for &card in &commitment.cards {
            if state.player_mut(seat).remove_card(card) {
                state.discard_cards([card]);
            }
        }
    }

    let loser_faction = state.faction_of(loser);
    let retreating: Vec<PieceKey> = state.units_at(ctx.space, loser_faction).collect();
    let workers = retreating
        .iter()
        .filter(|k| k.kind == PieceKind::Worker)
        .count();
    for &piece in &retreating {
        state.place_piece(piece, loser_faction.home());
    }

    let winner_faction = state.faction_of(winner);
    if workers > 0 && !winner_faction.ignores_worker_penalty() {
        state.player_mut(winner).lose_popularity(u8::try_from(workers).unwrap_or(u8::MAX));
    }
    if ctx.commitment(loser).has_committed() {
        state.draw_cards(loser, 1);
    }
    state.award_combat_star(winner);
    state
}
