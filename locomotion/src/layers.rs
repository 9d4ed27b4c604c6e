use num_traits::{One, PrimInt};

/// Trait implemented by collision layer enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) is the bit index inside a [`LayerMask`].
/// The backing integer type is chosen with the associated `Storage`.
pub trait LayerBit {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must stay below the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// Set of collision layers a query is allowed to hit.
///
/// Physics queries test a collider's layer against this mask; an empty mask hits nothing.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct LayerMask<T: PrimInt = u32> {
    pub bits: T,
}

impl<T: PrimInt> LayerMask<T> {
    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    pub fn everything() -> Self {
        Self {
            bits: !T::zero(),
        }
    }

    pub fn from_layers<U: LayerBit<Storage = T> + Copy>(layers: &[U]) -> Self {
        let bits = layers.iter().fold(T::zero(), |acc, l| acc | l.mask());
        Self { bits }
    }

    /// Returns a copy of this mask with `layer` added.
    pub fn with<U: LayerBit<Storage = T>>(mut self, layer: U) -> Self {
        self.bits = self.bits | layer.mask();
        self
    }

    /// Returns a copy of this mask with `layer` removed.
    pub fn without<U: LayerBit<Storage = T>>(mut self, layer: U) -> Self {
        self.bits = self.bits & !layer.mask();
        self
    }

    pub fn contains<U: LayerBit<Storage = T>>(&self, layer: U) -> bool {
        (self.bits & layer.mask()) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a layer enum and implement [`LayerBit`] for it.
///
/// Besides the trait impl, the generated enum gets an `ALL` table, a `from_index` lookup
/// (used when decoding collider tags) and a stable `name`.
///
/// Example:
/// ```rust
/// locomotion::define_layers!(ArenaLayer, u16, {
///     Floor,
///     Enemy,
///     Trigger,
/// });
/// assert_eq!(ArenaLayer::from_index(1), Some(ArenaLayer::Enemy));
/// ```
#[macro_export]
macro_rules! define_layers {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn from_index(index: u8) -> Option<Self> {
                Self::ALL.get(index as usize).copied()
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),*
                }
            }
        }

        impl $crate::layers::LayerBit for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_layers!(Layer, u32, {
    Default,
    Ground,
    Player,
    LockOnTarget,
    Prop,
});
