//! The action catalogue.
//!
//! Every rule of the game is an `Action` value sitting on the state's
//! pending-action stack. An action is either:
//!
//! - a `StateChange`: applied automatically, needs no input, or
//! - a `Choice`: suspends the interpreter until an agent supplies one of
//!   its legal options.
//!
//! Applying either kind may push further actions, so a rule like "pay, then
//! pick a space, then build there, then collect the reward" is a short
//! chain of small actions rather than one function. Actions are immutable
//! values; parameters that would be expensive to clone sit behind `Arc`.
//!
//! ## Dispatch
//!
//! The variant set is closed. `Choice` and `StateChange` dispatch by
//! `match` to the submodule that owns the rule:
//!
//! | Module        | Rules |
//! |---------------|-------|
//! | `combinators` | Sequence, Boolean, Optional, MaybePayCost |
//! | `turn`        | choosing a mat section, building the turn's actions |
//! | `movement`    | Move/Gain, unit selection, carrying, destinations |
//! | `economy`     | coins/power/popularity/cards, Trade, Produce |
//! | `development` | Upgrade, Deploy, Build, Enlist, rewards |
//! | `combat`      | combat setup, commitments, abilities, resolution |
//! | `payment`     | spending controlled resources, Coercion |
//!
//! Every application ends with `GameState::settle_stars`, which is where a
//! sixth star turns into `Err(GameOver)`.

pub mod combat;
pub mod combinators;
pub mod development;
pub mod economy;
pub mod movement;
pub mod payment;
pub mod turn;

use smallvec::SmallVec;
use std::sync::Arc;

use crate::board::SpaceId;
use crate::core::{Outcome, PlayerId};
use crate::game::{
    BottomAction, Cost, EnlistBonus, GameMove, GameState, OptionDomain, PieceKey, Resource,
    Structure, TopUpgrade,
};

pub use combat::{CombatContext, CombatStage, Commitment};
pub use movement::Cargo;

/// A pending action.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Change(StateChange),
    Choice(Choice),
}

impl Action {
    /// Ordered composition. A single action is returned as is.
    #[must_use]
    pub fn sequence(mut actions: Vec<Action>) -> Action {
        if actions.len() == 1 {
            if let Some(only) = actions.pop() {
                return only;
            }
        }
        Action::Change(StateChange::Sequence(actions.into()))
    }

    /// Take `action` at the option of `player`, paying `cost` if it has one.
    #[must_use]
    pub fn maybe_pay(player: PlayerId, cost: Cost, action: Action) -> Action {
        let action = Arc::new(action);
        if cost.is_free() {
            Action::Choice(Choice::Optional { player, action })
        } else {
            Action::Choice(Choice::MaybePayCost { player, cost, action })
        }
    }

    /// Short name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Change(c) => c.name(),
            Action::Choice(c) => c.name(),
        }
    }

    /// Whether taking this action would do anything.
    ///
    /// A choice is available when it has at least one option other than
    /// `Pass`; a sequence when its first action is. Other state changes are
    /// always available.
    #[must_use]
    pub fn is_available(&self, state: &GameState) -> bool {
        match self {
            Action::Choice(c) => c.is_available(state),
            Action::Change(StateChange::Sequence(actions)) => {
                actions.first().map_or(true, |a| a.is_available(state))
            }
            Action::Change(_) => true,
        }
    }
}

impl From<StateChange> for Action {
    fn from(change: StateChange) -> Self {
        Action::Change(change)
    }
}

impl From<Choice> for Action {
    fn from(choice: Choice) -> Self {
        Action::Choice(choice)
    }
}

/// Actions applied without external input.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    // === Combinators ===
    /// Push the actions so that the first runs first.
    Sequence(Arc<[Action]>),
    /// Deduct a cost, pushing resource-spending choices as needed.
    Charge { player: PlayerId, cost: Cost },

    // === Economy ===
    GainCoins { player: PlayerId, amount: u8 },
    GainPower { player: PlayerId, amount: u8 },
    LosePower { player: PlayerId, amount: u8 },
    GainPopularity { player: PlayerId, amount: u8 },
    DrawCombatCards { player: PlayerId, count: u8 },
    /// Produce on one space; `extra` adds phantom workers (the Mill).
    ProduceOn { player: PlayerId, space: SpaceId, extra: u8 },

    // === Movement ===
    MovePiece { player: PlayerId, piece: PieceKey, to: SpaceId, cargo: Cargo },
    /// Start a combat on every contested space.
    CheckCombat { attacker: PlayerId },

    // === Development ===
    ApplyUpgrade { player: PlayerId, top: TopUpgrade, bottom: BottomAction },
    DeployMech { player: PlayerId, slot: u8, space: SpaceId },
    BuildStructure { player: PlayerId, structure: Structure, space: SpaceId },
    Enlist { player: PlayerId, recruit: BottomAction, bonus: EnlistBonus },
    BottomReward { player: PlayerId, action: BottomAction },
    /// Ongoing recruit bonuses for every seat with a recruit under `action`.
    RecruitBonuses { action: BottomAction },

    // === Combat ===
    StartCombat { space: SpaceId, attacker: PlayerId },
    CombatAbilities(CombatContext),
    ResolveCombat(CombatContext),
}

impl StateChange {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StateChange::Sequence(_) => "Sequence",
            StateChange::Charge { .. } => "Charge",
            StateChange::GainCoins { .. } => "GainCoins",
            StateChange::GainPower { .. } => "GainPower",
            StateChange::LosePower { .. } => "LosePower",
            StateChange::GainPopularity { .. } => "GainPopularity",
            StateChange::DrawCombatCards { .. } => "DrawCombatCards",
            StateChange::ProduceOn { .. } => "ProduceOn",
            StateChange::MovePiece { .. } => "MovePiece",
            StateChange::CheckCombat { .. } => "CheckCombat",
            StateChange::ApplyUpgrade { .. } => "ApplyUpgrade",
            StateChange::DeployMech { .. } => "DeployMech",
            StateChange::BuildStructure { .. } => "BuildStructure",
            StateChange::Enlist { .. } => "Enlist",
            StateChange::BottomReward { .. } => "BottomReward",
            StateChange::RecruitBonuses { .. } => "RecruitBonuses",
            StateChange::StartCombat { .. } => "StartCombat",
            StateChange::CombatAbilities(_) => "CombatAbilities",
            StateChange::ResolveCombat(_) => "ResolveCombat",
        }
    }

    /// Apply to a state this action has already been popped from.
    pub fn apply(self, state: GameState) -> Outcome {
        let state = match self {
            StateChange::Sequence(actions) => combinators::sequence(state, &actions),
            StateChange::Charge { player, cost } => crate::rules::payment::charge(state, player, &cost),
            StateChange::GainCoins { player, amount } => economy::gain_coins(state, player, amount),
            StateChange::GainPower { player, amount } => economy::gain_power(state, player, amount),
            StateChange::LosePower { player, amount } => economy::lose_power(state, player, amount),
            StateChange::GainPopularity { player, amount } => {
                economy::gain_popularity(state, player, amount)
            }
            StateChange::DrawCombatCards { player, count } => {
                economy::draw_combat_cards(state, player, count)
            }
            StateChange::ProduceOn { player, space, extra } => {
                economy::produce_on(state, player, space, extra)
            }
            StateChange::MovePiece { player, piece, to, cargo } => {
                movement::move_piece(state, player, piece, to, &cargo)
            }
            StateChange::CheckCombat { attacker } => combat::check_combat(state, attacker),
            StateChange::ApplyUpgrade { player, top, bottom } => {
                development::apply_upgrade(state, player, top, bottom)
            }
            StateChange::DeployMech { player, slot, space } => {
                development::deploy_mech(state, player, slot, space)
            }
            StateChange::BuildStructure { player, structure, space } => {
                development::build_structure(state, player, structure, space)
            }
            StateChange::Enlist { player, recruit, bonus } => {
                development::enlist(state, player, recruit, bonus)
            }
            StateChange::BottomReward { player, action } => {
                development::bottom_reward(state, player, action)
            }
            StateChange::RecruitBonuses { action } => development::recruit_bonuses(state, action),
            StateChange::StartCombat { space, attacker } => {
                combat::start_combat(state, space, attacker)
            }
            StateChange::CombatAbilities(ctx) => combat::combat_abilities(state, ctx),
            StateChange::ResolveCombat(ctx) => combat::resolve_combat(state, &ctx),
        };
        state.settle_stars()
    }
}

/// Actions that wait for an agent's decision.
#[derive(Clone, Debug, PartialEq)]
pub enum Choice {
    // === Turn ===
    /// Pick a mat section.
    TakeTurn { player: PlayerId },

    // === Combinators ===
    Boolean { player: PlayerId, yes: Arc<Action>, no: Arc<Action> },
    Optional { player: PlayerId, action: Arc<Action> },
    MaybePayCost { player: PlayerId, cost: Cost, action: Arc<Action> },

    // === Movement ===
    /// Move (`true`) or gain coins (`false`).
    MoveGain { player: PlayerId },
    ChooseMover { player: PlayerId, remaining: u8 },
    CarryWorker { player: PlayerId, piece: PieceKey, from: SpaceId, cargo: Cargo },
    CarryResource { player: PlayerId, piece: PieceKey, from: SpaceId, cargo: Cargo },
    ChooseDestination { player: PlayerId, piece: PieceKey, from: SpaceId, cargo: Cargo },

    // === Economy ===
    ChooseTradeResource { player: PlayerId, remaining: u8 },
    ChooseTradeSpace { player: PlayerId, resource: Resource },
    ChooseProduceSpace { player: PlayerId, remaining: u8, chosen: SmallVec<[SpaceId; 3]> },

    // === Development ===
    ChooseTopUpgrade { player: PlayerId },
    ChooseBottomUpgrade { player: PlayerId, top: TopUpgrade },
    ChooseMech { player: PlayerId },
    ChooseDeploySpace { player: PlayerId, slot: u8 },
    ChooseStructure { player: PlayerId },
    ChooseBuildSpace { player: PlayerId, structure: Structure },
    ChooseRecruit { player: PlayerId },
    ChooseEnlistBonus { player: PlayerId, recruit: BottomAction },

    // === Payment ===
    SpendResource { player: PlayerId, resource: Resource },
    /// Discard a combat card in place of a missing resource.
    Coercion { player: PlayerId },

    // === Combat ===
    CombatPower(CombatContext),
    CombatCard(CombatContext),
}

impl Choice {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Choice::TakeTurn { .. } => "TakeTurn",
            Choice::Boolean { .. } => "Boolean",
            Choice::Optional { .. } => "Optional",
            Choice::MaybePayCost { .. } => "MaybePayCost",
            Choice::MoveGain { .. } => "MoveGain",
            Choice::ChooseMover { .. } => "ChooseMover",
            Choice::CarryWorker { .. } => "CarryWorker",
            Choice::CarryResource { .. } => "CarryResource",
            Choice::ChooseDestination { .. } => "ChooseDestination",
            Choice::ChooseTradeResource { .. } => "ChooseTradeResource",
            Choice::ChooseTradeSpace { .. } => "ChooseTradeSpace",
            Choice::ChooseProduceSpace { .. } => "ChooseProduceSpace",
            Choice::ChooseTopUpgrade { .. } => "ChooseTopUpgrade",
            Choice::ChooseBottomUpgrade { .. } => "ChooseBottomUpgrade",
            Choice::ChooseMech { .. } => "ChooseMech",
            Choice::ChooseDeploySpace { .. } => "ChooseDeploySpace",
            Choice::ChooseStructure { .. } => "ChooseStructure",
            Choice::ChooseBuildSpace { .. } => "ChooseBuildSpace",
            Choice::ChooseRecruit { .. } => "ChooseRecruit",
            Choice::ChooseEnlistBonus { .. } => "ChooseEnlistBonus",
            Choice::SpendResource { .. } => "SpendResource",
            Choice::Coercion { .. } => "Coercion",
            Choice::CombatPower(_) => "CombatPower",
            Choice::CombatCard(_) => "CombatCard",
        }
    }

    /// Seat that decides this choice.
    #[must_use]
    pub fn chooser(&self) -> PlayerId {
        match self {
            Choice::TakeTurn { player }
            | Choice::Boolean { player, .. }
            | Choice::Optional { player, .. }
            | Choice::MaybePayCost { player, .. }
            | Choice::MoveGain { player }
            | Choice::ChooseMover { player, .. }
            | Choice::CarryWorker { player, .. }
            | Choice::CarryResource { player, .. }
            | Choice::ChooseDestination { player, .. }
            | Choice::ChooseTradeResource { player, .. }
            | Choice::ChooseTradeSpace { player, .. }
            | Choice::ChooseProduceSpace { player, .. }
            | Choice::ChooseTopUpgrade { player }
            | Choice::ChooseBottomUpgrade { player, .. }
            | Choice::ChooseMech { player }
            | Choice::ChooseDeploySpace { player, .. }
            | Choice::ChooseStructure { player }
            | Choice::ChooseBuildSpace { player, .. }
            | Choice::ChooseRecruit { player }
            | Choice::ChooseEnlistBonus { player, .. }
            | Choice::SpendResource { player, .. }
            | Choice::Coercion { player } => *player,
            Choice::CombatPower(ctx) | Choice::CombatCard(ctx) => ctx.acting(),
        }
    }

    /// Shape of this choice's options.
    #[must_use]
    pub fn domain(&self) -> OptionDomain {
        match self {
            Choice::TakeTurn { .. } => OptionDomain::Integer { max: 3 },
            Choice::Boolean { .. }
            | Choice::Optional { .. }
            | Choice::MaybePayCost { .. }
            | Choice::MoveGain { .. }
            | Choice::CombatCard(_) => OptionDomain::Boolean,
            Choice::ChooseMover { .. } | Choice::CarryWorker { .. } => OptionDomain::Piece,
            Choice::CarryResource { .. } | Choice::ChooseTradeResource { .. } => {
                OptionDomain::Resource
            }
            Choice::ChooseDestination { .. }
            | Choice::ChooseTradeSpace { .. }
            | Choice::ChooseProduceSpace { .. }
            | Choice::ChooseDeploySpace { .. }
            | Choice::ChooseBuildSpace { .. }
            | Choice::SpendResource { .. } => OptionDomain::Space,
            Choice::ChooseTopUpgrade { .. } => OptionDomain::Integer { max: 5 },
            Choice::ChooseBottomUpgrade { .. }
            | Choice::ChooseMech { .. }
            | Choice::ChooseRecruit { .. }
            | Choice::ChooseEnlistBonus { .. } => OptionDomain::Integer { max: 3 },
            Choice::ChooseStructure { .. } => OptionDomain::Structure,
            Choice::Coercion { .. } => OptionDomain::Integer { max: 5 },
            Choice::CombatPower(_) => OptionDomain::Integer { max: 7 },
        }
    }

    /// Legal options in a deterministic order. May be empty.
    #[must_use]
    pub fn legal_options(&self, state: &GameState) -> Vec<GameMove> {
        match self {
            Choice::TakeTurn { player } => turn::section_options(state, *player),
            Choice::Boolean { yes, no, .. } => combinators::boolean_options(state, yes, no),
            Choice::Optional { action, .. } => combinators::optional_options(state, action),
            Choice::MaybePayCost { player, cost, action } => {
                combinators::maybe_pay_options(state, *player, cost, action)
            }
            Choice::MoveGain { player } => movement::move_gain_options(state, *player),
            Choice::ChooseMover { player, .. } => movement::mover_options(state, *player),
            Choice::CarryWorker { player, from, cargo, .. } => {
                movement::carry_worker_options(state, *player, *from, cargo)
            }
            Choice::CarryResource { from, cargo, .. } => {
                movement::carry_resource_options(state, *from, cargo)
            }
            Choice::ChooseDestination { player, piece, from, cargo } => {
                movement::destinations(state, *player, *piece, *from, cargo)
                    .into_iter()
                    .map(GameMove::Space)
                    .collect()
            }
            Choice::ChooseTradeResource { player, .. } => {
                economy::trade_resource_options(state, *player)
            }
            Choice::ChooseTradeSpace { player, .. } => economy::trade_space_options(state, *player),
            Choice::ChooseProduceSpace { player, chosen, .. } => {
                economy::produce_space_options(state, *player, chosen)
            }
            Choice::ChooseTopUpgrade { player } => development::top_upgrade_options(state, *player),
            Choice::ChooseBottomUpgrade { player, .. } => {
                development::bottom_upgrade_options(state, *player)
            }
            Choice::ChooseMech { player } => development::mech_options(state, *player),
            Choice::ChooseDeploySpace { player, .. } => {
                development::deploy_space_options(state, *player)
            }
            Choice::ChooseStructure { player } => development::structure_options(state, *player),
            Choice::ChooseBuildSpace { player, .. } => {
                development::build_space_options(state, *player)
            }
            Choice::ChooseRecruit { player } => development::recruit_options(state, *player),
            Choice::ChooseEnlistBonus { player, .. } => {
                development::enlist_bonus_options(state, *player)
            }
            Choice::SpendResource { player, resource } => {
                payment::spend_options(state, *player, *resource)
            }
            Choice::Coercion { player } => payment::coercion_options(state, *player),
            Choice::CombatPower(ctx) => combat::power_options(state, ctx),
            Choice::CombatCard(_) => vec![GameMove::Bool(true), GameMove::Bool(false)],
        }
    }

    /// Whether at least one option other than `Pass` exists.
    #[must_use]
    pub fn is_available(&self, state: &GameState) -> bool {
        self.legal_options(state).iter().any(|m| *m != GameMove::Pass)
    }

    /// Apply `mv` to a state this choice has already been popped from.
    ///
    /// `mv` is `None` only when the choice has no legal options, in which
    /// case the choice is skipped.
    pub fn apply(self, state: GameState, mv: Option<GameMove>) -> Outcome {
        let Some(mv) = mv else {
            return state.settle_stars();
        };
        let state = match self {
            Choice::TakeTurn { player } => turn::take_turn(state, player, mv),
            Choice::Boolean { yes, no, .. } => combinators::boolean(state, &yes, &no, mv),
            Choice::Optional { action, .. } => combinators::optional(state, &action, mv),
            Choice::MaybePayCost { player, cost, action } => {
                combinators::maybe_pay(state, player, cost, &action, mv)
            }
            Choice::MoveGain { player } => movement::move_gain(state, player, mv),
            Choice::ChooseMover { player, remaining } => {
                movement::choose_mover(state, player, remaining, mv)
            }
            Choice::CarryWorker { player, piece, from, cargo } => {
                movement::carry_worker(state, player, piece, from, cargo, mv)
            }
            Choice::CarryResource { player, piece, from, cargo } => {
                movement::carry_resource(state, player, piece, from, cargo, mv)
            }
            Choice::ChooseDestination { player, piece, cargo, .. } => {
                movement::choose_destination(state, player, piece, cargo, mv)
            }
            Choice::ChooseTradeResource { player, remaining } => {
                economy::choose_trade_resource(state, player, remaining, mv)
            }
            Choice::ChooseTradeSpace { resource, .. } => {
                economy::choose_trade_space(state, resource, mv)
            }
            Choice::ChooseProduceSpace { player, remaining, chosen } => {
                economy::choose_produce_space(state, player, remaining, chosen, mv)
            }
            Choice::ChooseTopUpgrade { player } => development::choose_top_upgrade(state, player, mv),
            Choice::ChooseBottomUpgrade { player, top } => {
                development::choose_bottom_upgrade(state, player, top, mv)
            }
            Choice::ChooseMech { player } => development::choose_mech(state, player, mv),
            Choice::ChooseDeploySpace { player, slot } => {
                development::choose_deploy_space(state, player, slot, mv)
            }
            Choice::ChooseStructure { player } => development::choose_structure(state, player, mv),
            Choice::ChooseBuildSpace { player, structure } => {
                development::choose_build_space(state, player, structure, mv)
            }
            Choice::ChooseRecruit { player } => development::choose_recruit(state, player, mv),
            Choice::ChooseEnlistBonus { player, recruit } => {
                development::choose_enlist_bonus(state, player, recruit, mv)
            }
            Choice::SpendResource { resource, .. } => payment::spend_resource(state, resource, mv),
            Choice::Coercion { player } => payment::coercion(state, player, mv),
            Choice::CombatPower(ctx) => combat::commit_power(state, ctx, mv),
            Choice::CombatCard(ctx) => combat::commit_card(state, ctx, mv),
        };
        state.settle_stars()
    }
}
