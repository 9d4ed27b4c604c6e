use bevy::prelude::*;
use locomotion::WeaponRig;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(PostUpdate, sync_weapon_visibility);
}

/// Which of the two weapon models the controller last asked for.
#[derive(Component, Debug, Default)]
pub struct WeaponVisuals {
    pub drawn: bool,
}

impl WeaponRig for WeaponVisuals {
    fn set_weapon_drawn(&mut self, drawn: bool) {
        self.drawn = drawn;
    }
}

/// Weapon model held in the hand.
#[derive(Component)]
pub struct HandWeapon;

/// Weapon model on the back.
#[derive(Component)]
pub struct SheathedWeapon;

fn sync_weapon_visibility(
    owners: Query<(&WeaponVisuals, &Children), Changed<WeaponVisuals>>,
    mut hand: Query<&mut Visibility, (With<HandWeapon>, Without<SheathedWeapon>)>,
    mut sheath: Query<&mut Visibility, (With<SheathedWeapon>, Without<HandWeapon>)>,
) {
    for (visuals, children) in &owners {
        let (shown, hidden) = if visuals.drawn {
            (Visibility::Inherited, Visibility::Hidden)
        } else {
            (Visibility::Hidden, Visibility::Inherited)
        };
        for child in children.iter() {
            if let Ok(mut v) = hand.get_mut(child) {
                *v = shown;
            }
            if let Ok(mut v) = sheath.get_mut(child) {
                *v = hidden;
            }
        }
    }
}
