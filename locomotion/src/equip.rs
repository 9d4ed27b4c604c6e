use log::{debug, warn};

use crate::anim::{AnimParam, Animator};
use crate::blend::{BlendStep, TimedBlend};
use crate::query::WeaponRig;
use crate::settings::EquipSettings;

/// Timer and progress of an in-flight equip or unarm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub remaining: f32,
    /// The animation reached the pose where the weapon changes hands.
    pub pose_reached: bool,
}

impl Transition {
    fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            pose_reached: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EquipState {
    #[default]
    Unequipped,
    Equipping(Transition),
    Equipped,
    Unequipping(Transition),
}

impl EquipState {
    pub fn in_flight(&self) -> bool {
        matches!(self, EquipState::Equipping(_) | EquipState::Unequipping(_))
    }

    /// The weapon is in hand: drawn and not yet put away.
    pub fn is_armed(&self) -> bool {
        match self {
            EquipState::Unequipped => false,
            EquipState::Equipping(t) => t.pose_reached,
            EquipState::Equipped => true,
            EquipState::Unequipping(t) => !t.pose_reached,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EquipEvent {
    EquipStarted,
    UnarmStarted,
    WeaponDrawn,
    WeaponSheathed,
    Equipped,
    Unequipped,
    /// The transition ran out before its pose callback; the weapon stayed where it was.
    TimedOut { drawing: bool },
}

/// Draw/sheathe lifecycle of the character's weapon.
#[derive(Clone, Debug)]
pub struct WeaponEquipStateMachine {
    settings: EquipSettings,
    state: EquipState,
    layer_blend: Option<TimedBlend>,
}

impl WeaponEquipStateMachine {
    pub fn new(settings: EquipSettings) -> Self {
        Self {
            settings,
            state: EquipState::Unequipped,
            layer_blend: None,
        }
    }

    pub fn state(&self) -> &EquipState {
        &self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    /// Current weapon layer blend, if one is running.
    pub fn layer_blend(&self) -> Option<&TimedBlend> {
        self.layer_blend.as_ref()
    }

    /// Spawn presentation: sheathed weapon, no layer weight.
    pub fn present_initial(&self, weapon: &mut dyn WeaponRig, anim: &mut Animator<'_>) {
        weapon.set_weapon_drawn(false);
        anim.flag(AnimParam::Equipping, false);
        anim.layer_weight(self.settings.weapon_layer, 0.0);
    }

    /// Attack input. Starts drawing when unequipped; returns whether a transition started.
    pub fn request_equip(&mut self, anim: &mut Animator<'_>) -> bool {
        match self.state {
            EquipState::Unequipped => {
                self.state = EquipState::Equipping(Transition::new(self.settings.equip_duration));
                anim.flag(AnimParam::Equipping, true);
                anim.trigger(AnimParam::Equip);
                debug!("equip started");
                true
            }
            s if s.in_flight() => {
                debug!("equip request ignored, transition in flight");
                false
            }
            _ => false,
        }
    }

    /// Unarm input. Starts sheathing when equipped; returns whether a transition started.
    pub fn request_unarm(&mut self, anim: &mut Animator<'_>) -> bool {
        match self.state {
            EquipState::Equipped => {
                self.state =
                    EquipState::Unequipping(Transition::new(self.settings.equip_duration));
                anim.flag(AnimParam::Equipping, true);
                anim.trigger(AnimParam::Unarm);
                debug!("unarm started");
                true
            }
            s if s.in_flight() => {
                debug!("unarm request ignored, transition in flight");
                false
            }
            _ => false,
        }
    }

    /// The draw animation reached the hand-off pose.
    pub fn on_equip_pose(
        &mut self,
        idle: bool,
        weapon: &mut dyn WeaponRig,
        anim: &mut Animator<'_>,
    ) -> Option<EquipEvent> {
        match self.state {
            EquipState::Equipping(ref mut t) if !t.pose_reached => t.pose_reached = true,
            EquipState::Unequipped => {
                debug!("late equip pose applied");
                self.state = EquipState::Equipped;
            }
            _ => return None,
        }
        self.present(true, idle, weapon, anim);
        Some(EquipEvent::WeaponDrawn)
    }

    /// The sheathe animation reached the hand-off pose.
    pub fn on_unarm_pose(
        &mut self,
        idle: bool,
        weapon: &mut dyn WeaponRig,
        anim: &mut Animator<'_>,
    ) -> Option<EquipEvent> {
        match self.state {
            EquipState::Unequipping(ref mut t) if !t.pose_reached => t.pose_reached = true,
            EquipState::Equipped => {
                debug!("late unarm pose applied");
                self.state = EquipState::Unequipped;
            }
            _ => return None,
        }
        self.present(false, idle, weapon, anim);
        Some(EquipEvent::WeaponSheathed)
    }

    fn present(
        &mut self,
        drawn: bool,
        idle: bool,
        weapon: &mut dyn WeaponRig,
        anim: &mut Animator<'_>,
    ) {
        weapon.set_weapon_drawn(drawn);
        anim.flag(AnimParam::Equipping, false);

        let duration = if idle {
            self.settings.layer_blend_idle
        } else {
            self.settings.layer_blend_moving
        };
        let (start, target) = if drawn { (0.0, 1.0) } else { (1.0, 0.0) };
        self.layer_blend = Some(TimedBlend::new(start, target, duration));
    }

    /// Advance the layer blend and the transition timer.
    pub fn tick(&mut self, dt: f32, anim: &mut Animator<'_>) -> Option<EquipEvent> {
        if let Some(blend) = self.layer_blend.as_mut() {
            let step = blend.step(dt);
            anim.layer_weight(self.settings.weapon_layer, step.value());
            if let BlendStep::Done(_) = step {
                self.layer_blend = None;
            }
        }

        let (t, drawing) = match &mut self.state {
            EquipState::Equipping(t) => (t, true),
            EquipState::Unequipping(t) => (t, false),
            _ => return None,
        };
        t.remaining -= dt;
        if t.remaining > 0.0 {
            return None;
        }

        let pose_reached = t.pose_reached;
        let (next, event) = match (drawing, pose_reached) {
            (true, true) => (EquipState::Equipped, EquipEvent::Equipped),
            (false, true) => (EquipState::Unequipped, EquipEvent::Unequipped),
            (true, false) => (EquipState::Unequipped, EquipEvent::TimedOut { drawing }),
            (false, false) => (EquipState::Equipped, EquipEvent::TimedOut { drawing }),
        };
        if !pose_reached {
            warn!("weapon transition timed out before its pose (drawing: {drawing})");
            anim.flag(AnimParam::Equipping, false);
        } else {
            debug!("weapon transition finished: {next:?}");
        }
        self.state = next;
        Some(event)
    }
}
