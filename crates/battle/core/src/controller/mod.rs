//! The top-level battle state machine.
//!
//! `NotStarted -> Initiative -> RoundLoop -> Ended` collapses into the
//! controller's lifecycle: construction runs the initiative phase, then the
//! embedder calls [`BattleController::tick`] once per frame. Waiting for a
//! human never blocks; the tick reports `AwaitingPlayer` and the embedder
//! re-enters through [`BattleController::submit_action`] when the menu
//! produces something.

mod initiative;
mod rewards;

pub use rewards::Rewards;

use std::collections::VecDeque;

use crate::ai::{self, EnemyAction};
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::error::{ActionRejected, SetupError};
use crate::events::BattleEvent;
use crate::random::RandomSource;
use crate::resolve::{
    ActionOutcome, cast_imbued, resolve_attack, resolve_skill, resolve_spell,
};
use crate::schedule::{TickEvent, advance_gauges};
use crate::state::{
    Battle, BattleOutcome, HeroSeed, HeroWriteback, ItemId, MonsterId, Side, SkillId, Slot,
    SpellId, StatusKind, TargetSelection,
};
use crate::stats::effective_stats;

/// Everything needed to start one battle.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSetup {
    pub heroes: Vec<HeroSeed>,
    pub monsters: Vec<MonsterId>,
    /// Random encounters roll surprise; scripted battles never do.
    pub random_encounter: bool,
    /// Whether run/warp can end this battle.
    pub escape_allowed: bool,
}

/// An action submitted for a hero's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    Attack { target: Slot },
    Spell {
        spell: SpellId,
        target: TargetSelection,
    },
    Item {
        item: ItemId,
        target: TargetSelection,
    },
    Defend,
    Run,
}

/// What the engine wants from the embedder after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickFlow {
    /// Keep calling `tick` each frame.
    Running,
    /// A hero's gauge is full; supply an action via `submit_action`.
    AwaitingPlayer(Slot),
    Ended(BattleOutcome),
}

/// Final report for the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    /// Present only after a heroes' win.
    pub rewards: Option<Rewards>,
    pub heroes: Vec<HeroWriteback>,
    /// The repulse spell was cast; the overworld should suppress random
    /// encounters for a while.
    pub repulse_armed: bool,
}

enum PreAction {
    Proceed,
    TurnConsumed,
}

/// Owns one battle from setup to its outcome.
pub struct BattleController {
    battle: Battle,
    config: BattleConfig,
    frame: u32,
    pending: VecDeque<Slot>,
    awaiting: Option<Slot>,
    events: Vec<BattleEvent>,
    repulse_armed: bool,
    concluded: bool,
    rewards: Option<Rewards>,
}

impl BattleController {
    /// Build the roster and run the initiative phase.
    pub fn new(
        setup: BattleSetup,
        config: BattleConfig,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SetupError> {
        let heroes = setup
            .heroes
            .into_iter()
            .map(HeroSeed::into_combatant)
            .collect();
        let enemies = setup
            .monsters
            .iter()
            .map(|&id| {
                env.monster(id)
                    .map(|t| t.spawn())
                    .ok_or(SetupError::UnknownMonster(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut battle = Battle::new(heroes, enemies)?;
        battle.escape_allowed = setup.escape_allowed;

        let mut controller = Self {
            battle,
            config,
            frame: 0,
            pending: VecDeque::new(),
            awaiting: None,
            events: Vec::new(),
            repulse_armed: false,
            concluded: false,
            rewards: None,
        };

        let report = initiative::roll_initiative(
            &mut controller.battle,
            &controller.config,
            setup.random_encounter,
            env,
            rng,
        );
        controller.events.push(BattleEvent::BattleStarted {
            surprised: report.surprised,
        });
        for (slot, outcome) in report.outcomes {
            controller.emit_outcome(slot, outcome);
        }
        Ok(controller)
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Take the queued presentation events.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Report for the persistence collaborator, once the battle is over.
    pub fn result(&self) -> Option<BattleResult> {
        let outcome = self.battle.outcome()?;
        let heroes = self
            .battle
            .side_slots(Side::Heroes)
            .map(|slot| {
                let c = self.battle.combatant(slot);
                let earns = c.is_alive() && !c.status.has(StatusKind::Stone);
                let xp = match (&self.rewards, earns) {
                    (Some(r), true) => r.xp_per_hero,
                    _ => 0,
                };
                HeroWriteback::from_combatant(c, xp)
            })
            .collect();
        Some(BattleResult {
            outcome,
            rewards: self.rewards.clone(),
            heroes,
            repulse_armed: self.repulse_armed,
        })
    }

    /// Advance one frame. Gauges move every tenth frame; eligible
    /// combatants are serviced, in ascending slot order, before the next
    /// gauge update.
    pub fn tick(&mut self, env: &BattleEnv<'_>, rng: &mut dyn RandomSource) -> TickFlow {
        if let Some(outcome) = self.battle.outcome() {
            self.conclude(rng);
            return TickFlow::Ended(outcome);
        }
        if let Some(slot) = self.awaiting {
            return TickFlow::AwaitingPlayer(slot);
        }
        if let Some(flow) = self.service_pending(env, rng) {
            return flow;
        }

        self.frame += 1;
        if self.frame >= BattleConfig::GAUGE_FRAMES {
            self.frame = 0;
            let tick = advance_gauges(&mut self.battle, rng);
            for event in tick.events {
                self.events.push(match event {
                    TickEvent::Poison { slot, amount } => BattleEvent::PoisonTick { slot, amount },
                    TickEvent::Regen { slot, amount } => BattleEvent::RegenTick { slot, amount },
                    TickEvent::StatusExpired { slot, status } => {
                        BattleEvent::StatusRemoved { slot, status }
                    }
                });
            }
            for slot in tick.ready {
                self.events.push(BattleEvent::TurnReady(slot));
                self.pending.push_back(slot);
            }
            if let Some(flow) = self.service_pending(env, rng) {
                return flow;
            }
        }
        TickFlow::Running
    }

    /// Resolve the awaited hero's chosen action. A rejected submission
    /// leaves the engine waiting so the menu can re-query.
    pub fn submit_action(
        &mut self,
        slot: Slot,
        action: PlayerAction,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<(), ActionRejected> {
        let expected = self.awaiting.ok_or(ActionRejected::NotAwaitingInput)?;
        if expected != slot {
            return Err(ActionRejected::WrongSlot {
                expected,
                submitted: slot,
            });
        }
        self.validate(slot, &action, env)?;
        self.awaiting = None;

        match action {
            PlayerAction::Attack { target } => self.do_attack(slot, target, env, rng),
            PlayerAction::Spell { spell, target } => {
                self.do_spell(slot, spell, target, false, env, rng)
            }
            PlayerAction::Item { item, target } => self.do_item(slot, item, target, env, rng),
            PlayerAction::Defend => self.do_defend(slot),
            PlayerAction::Run => self.attempt_flee(slot, rng),
        }

        self.finish_turn(slot);
        self.check_end(rng);
        Ok(())
    }

    fn validate(
        &self,
        slot: Slot,
        action: &PlayerAction,
        env: &BattleEnv<'_>,
    ) -> Result<(), ActionRejected> {
        match *action {
            PlayerAction::Attack { target } => {
                match self.battle.get(target) {
                    Some(t) if t.is_alive() => Ok(()),
                    _ => Err(ActionRejected::InvalidTarget),
                }
            }
            PlayerAction::Spell { spell, .. } => {
                let def = env.try_spell(spell).ok_or(ActionRejected::UnknownSpell(spell))?;
                let caster = self.battle.combatant(slot);
                if caster.status.has(StatusKind::Mute) {
                    return Err(ActionRejected::Silenced);
                }
                let cost = (def.mp_cost * caster.mp_rate / 100).max(1);
                if caster.mp < cost {
                    return Err(ActionRejected::NotEnoughMp);
                }
                Ok(())
            }
            PlayerAction::Item { item, .. } => match env.item(item) {
                Some(def) if def.usable_in_battle && def.spell.is_some() => Ok(()),
                _ => Err(ActionRejected::ItemNotUsable),
            },
            PlayerAction::Run => {
                if self.battle.escape_allowed {
                    Ok(())
                } else {
                    Err(ActionRejected::FleeForbidden)
                }
            }
            PlayerAction::Defend => Ok(()),
        }
    }

    /// Service queued eligible combatants until the queue drains, a hero
    /// needs input, or the battle ends.
    fn service_pending(
        &mut self,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) -> Option<TickFlow> {
        while let Some(&slot) = self.pending.front() {
            // Stale entries: killed or incapacitated since queueing.
            let can_act = self
                .battle
                .get(slot)
                .map(|c| c.is_alive() && c.ready && !c.is_incapacitated())
                .unwrap_or(false);
            if !can_act {
                self.pending.pop_front();
                continue;
            }

            match self.pre_action(slot, env, rng) {
                PreAction::TurnConsumed => {
                    self.finish_turn(slot);
                    self.pending.pop_front();
                }
                PreAction::Proceed => {
                    if slot.is_hero() {
                        self.pending.pop_front();
                        self.awaiting = Some(slot);
                        return Some(TickFlow::AwaitingPlayer(slot));
                    }
                    let action = ai::choose_action(&mut self.battle, slot, env, rng);
                    self.perform(slot, action, env, rng);
                    self.finish_turn(slot);
                    self.pending.pop_front();
                }
            }

            if let Some(outcome) = self.check_end(rng) {
                return Some(TickFlow::Ended(outcome));
            }
        }
        None
    }

    /// Shared pre-action pipeline: defend reset, per-turn imbued casts,
    /// malison stumble, charm auto-pilot.
    fn pre_action(
        &mut self,
        slot: Slot,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) -> PreAction {
        self.battle.combatant_mut(slot).defend = false;

        let imbued = self.battle.combatant(slot).imbued;
        for item in imbued.into_iter().flatten() {
            if let Some(outcome) = cast_imbued(
                &mut self.battle,
                slot,
                item,
                1,
                TargetSelection::One(slot),
                env,
                rng,
            ) {
                self.emit_outcome(slot, outcome);
            }
        }

        let malison = self.battle.combatant(slot).status.get(StatusKind::Malison);
        if malison > 0 && rng.percent(malison * 5) {
            self.events.push(BattleEvent::Stumbled(slot));
            return PreAction::TurnConsumed;
        }

        if self.battle.combatant(slot).status.has(StatusKind::Charm) {
            self.battle
                .combatant_mut(slot)
                .status
                .adjust(StatusKind::Charm, -1);
            let action = ai::charm_action(&mut self.battle, slot, rng);
            self.perform(slot, action, env, rng);
            return PreAction::TurnConsumed;
        }

        PreAction::Proceed
    }

    fn perform(
        &mut self,
        slot: Slot,
        action: EnemyAction,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) {
        match action {
            EnemyAction::Nothing => self.events.push(BattleEvent::Dithered(slot)),
            EnemyAction::Defend => self.do_defend(slot),
            EnemyAction::Attack { target } => self.do_attack(slot, target, env, rng),
            EnemyAction::Spell { spell, target } => {
                self.do_spell(slot, spell, target, false, env, rng)
            }
            EnemyAction::Skill { skill, target } => self.do_skill(slot, skill, target, env, rng),
        }
    }

    fn do_attack(
        &mut self,
        slot: Slot,
        target: Slot,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) {
        let alive = self.battle.get(target).map(|c| c.is_alive()).unwrap_or(false);
        if !alive {
            tracing::debug!(%slot, %target, "attack against a corpse, wasted turn");
            return;
        }
        let outcome = resolve_attack(&mut self.battle, slot, target, env, rng);
        self.events.push(BattleEvent::AttackLanded {
            attacker: slot,
            defender: target,
            critical: outcome.critical,
        });
        self.emit_outcome(slot, outcome);
    }

    fn do_spell(
        &mut self,
        slot: Slot,
        spell: SpellId,
        target: TargetSelection,
        as_item: bool,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) {
        let def = env.spell(spell);
        self.events.push(BattleEvent::ActionAnnounced {
            slot,
            name: def.name.clone(),
            fx: def.fx,
        });
        self.events.push(BattleEvent::SpellCast { slot, spell });
        let outcome = resolve_spell(&mut self.battle, slot, spell, target, env, rng, as_item);
        self.emit_outcome(slot, outcome);
    }

    fn do_item(
        &mut self,
        slot: Slot,
        item: ItemId,
        target: TargetSelection,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) {
        let Some(spell) = env.item(item).and_then(|d| d.spell) else {
            tracing::debug!(item = item.0, "item invokes no spell, wasted turn");
            return;
        };
        self.events.push(BattleEvent::ItemUsed { slot, item });
        self.do_spell(slot, spell, target, true, env, rng);
    }

    fn do_skill(
        &mut self,
        slot: Slot,
        skill: SkillId,
        target: Option<Slot>,
        env: &BattleEnv<'_>,
        rng: &mut dyn RandomSource,
    ) {
        let def = env.skill(skill);
        self.events.push(BattleEvent::ActionAnnounced {
            slot,
            name: def.name.clone(),
            fx: def.fx,
        });
        self.events.push(BattleEvent::SkillUsed { slot, skill });
        let outcome = resolve_skill(&mut self.battle, slot, skill, target, env, rng);
        self.emit_outcome(slot, outcome);
    }

    fn do_defend(&mut self, slot: Slot) {
        self.battle.combatant_mut(slot).defend = true;
        self.events.push(BattleEvent::Defended(slot));
    }

    /// Escape roll: base chance plus the speed differential between the
    /// living sides, clamped so neither certainty exists.
    fn attempt_flee(&mut self, slot: Slot, rng: &mut dyn RandomSource) {
        let avg_speed = |side: Side| -> i32 {
            let mut total = 0;
            let mut n = 0;
            for s in self.battle.living_slots(side) {
                total += effective_stats(self.battle.combatant(s)).speed;
                n += 1;
            }
            if n > 0 { total / n } else { 0 }
        };
        let chance =
            (self.config.flee_base + avg_speed(Side::Heroes) - avg_speed(Side::Enemies))
                .clamp(5, 95);
        let success = rng.percent(chance);
        self.events.push(BattleEvent::FleeAttempted { slot, success });
        if success {
            self.battle.end(BattleOutcome::Escaped);
        }
    }

    /// Turn epilogue: the automaton goes `ActionCommitted -> Idle`.
    fn finish_turn(&mut self, slot: Slot) {
        let c = self.battle.combatant_mut(slot);
        c.gauge = 0;
        c.last_spell = None;
    }

    /// Translate an outcome into presentation events and side effects.
    fn emit_outcome(&mut self, _actor: Slot, outcome: ActionOutcome) {
        for report in &outcome.reports {
            self.events.push(BattleEvent::AmountShown {
                slot: report.slot,
                amount: report.amount,
                resource: report.resource,
            });
            if report.died {
                self.events.push(BattleEvent::Died(report.slot));
            }
        }
        for (slot, status) in outcome.applied {
            self.events.push(BattleEvent::StatusApplied { slot, status });
        }
        for (slot, status) in outcome.removed {
            self.events.push(BattleEvent::StatusRemoved { slot, status });
        }
        if outcome.vision {
            self.events.push(BattleEvent::VisionRevealed);
        }
        if outcome.repulse {
            self.repulse_armed = true;
            self.events.push(BattleEvent::RepulseArmed);
        }
        if outcome.escaped {
            self.battle.end(BattleOutcome::Escaped);
        }
    }

    /// Check victory conditions and conclude at most once.
    fn check_end(&mut self, rng: &mut dyn RandomSource) -> Option<BattleOutcome> {
        if self.battle.outcome().is_none() {
            if self.battle.side_defeated(Side::Heroes) {
                self.battle.end(BattleOutcome::EnemiesWin);
            } else if self.battle.side_defeated(Side::Enemies) {
                self.battle.end(BattleOutcome::HeroesWin);
            }
        }
        let outcome = self.battle.outcome()?;
        self.conclude(rng);
        Some(outcome)
    }

    fn conclude(&mut self, rng: &mut dyn RandomSource) {
        if self.concluded {
            return;
        }
        let Some(outcome) = self.battle.outcome() else {
            return;
        };
        self.concluded = true;
        self.awaiting = None;
        self.pending.clear();
        self.events.push(BattleEvent::BattleEnded { outcome });
        if outcome == BattleOutcome::HeroesWin {
            let rewards = rewards::distribute(&self.battle, rng);
            self.events.push(BattleEvent::RewardsGranted {
                xp_per_hero: rewards.xp_per_hero,
                gold: rewards.gold,
                drops: rewards.drops.clone(),
            });
            self.rewards = Some(rewards);
        }
    }
}
