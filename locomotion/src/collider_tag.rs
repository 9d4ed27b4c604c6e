/// Identity of a static collider, stored in Rapier's per-collider `user_data`.
///
/// Queries only get collider handles back from the physics backend. The tag lets them
/// recover which host entity was hit and which layer it belongs to without a side table.
///
/// # Bit layout
/// This `u128` is a packed value with the following layout (least-significant bit = bit 0):
///
/// - bits 0..=63   : `EntityId` (u64)
/// - bits 64..=71  : `Layer` index (u8) plus one, so an untagged collider (0) never decodes
/// - bits 72..=127 : reserved (must be zero)
///
/// # Invariants
/// - Two different `(entity, layer)` pairs never produce the same tag.
/// - A tag of `0` (Rapier's default `user_data`) has no layer.
pub type ColliderTag = u128;

use crate::layers::{Layer, LayerBit};
use crate::types::EntityId;

const LAYER_SHIFT: u32 = u64::BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagError {
    ReservedBitsSet,
    UnknownLayer,
}

/// Packs an entity and its collision layer into a [`ColliderTag`].
pub fn pack_collider_tag(entity: EntityId, layer: Layer) -> ColliderTag {
    (entity.0 as u128) | (((layer.bit_index() as u128) + 1) << LAYER_SHIFT)
}

/// Extracts the entity encoded in a tag.
///
/// Note: this does not validate the layer.
pub fn unpack_entity(tag: ColliderTag) -> EntityId {
    const ID_MASK: u128 = u64::MAX as u128;
    EntityId((tag & ID_MASK) as u64)
}

/// Extracts the layer encoded in a tag, or `None` for untagged or unknown values.
pub fn try_unpack_layer(tag: ColliderTag) -> Option<Layer> {
    const LAYER_MASK: u128 = u8::MAX as u128;
    let raw = ((tag >> LAYER_SHIFT) & LAYER_MASK) as u8;
    raw.checked_sub(1).and_then(Layer::from_index)
}

/// Checks that a tag conforms to the packing contract.
pub fn validate_collider_tag(tag: ColliderTag) -> Result<(), TagError> {
    const RESERVED_MASK: u128 = !0u128 << 72;
    if (tag & RESERVED_MASK) != 0 {
        return Err(TagError::ReservedBitsSet);
    }
    if try_unpack_layer(tag).is_none() {
        return Err(TagError::UnknownLayer);
    }
    Ok(())
}
