//! The static layer stack of a tile.
//!
//! Every tile carries six layers: ground, floor, floor decor, wall, wall
//! decor, roof. Walkability and sight derive **solely** from the wall
//! layer's flags; the decor layers are purely cosmetic.

/// Number of static layers per tile.
pub const LAYER_COUNT: usize = 6;

/// Which layer of a tile's stack is being addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerSlot {
    Ground,
    Floor,
    FloorDecor,
    Wall,
    WallDecor,
    Roof,
}

impl LayerSlot {
    /// All slots, bottom to top.
    pub const ALL: [LayerSlot; LAYER_COUNT] = [
        LayerSlot::Ground,
        LayerSlot::Floor,
        LayerSlot::FloorDecor,
        LayerSlot::Wall,
        LayerSlot::WallDecor,
        LayerSlot::Roof,
    ];

    /// Index of this slot within a tile's layer array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One layer of a tile: a type identifier (0 = empty), a packed
/// sprite-variant/flags nibble pair, and a damage byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    pub kind: u16,
    /// High nibble: sprite variant. Low nibble: flags.
    pub vf: u8,
    pub damage: u8,
}

impl Layer {
    /// The empty layer (type identifier 0).
    pub const EMPTY: Self = Self {
        kind: 0,
        vf: 0,
        damage: 0,
    };

    /// Flag bit: the layer blocks movement.
    pub const FLAG_BLOCKS_MOVE: u8 = 1 << 0;
    /// Flag bit: the layer blocks sight.
    pub const FLAG_BLOCKS_SIGHT: u8 = 1 << 1;

    /// Create a layer of the given type with no variant, flags, or damage.
    #[inline]
    pub const fn new(kind: u16) -> Self {
        Self {
            kind,
            vf: 0,
            damage: 0,
        }
    }

    /// Set the sprite variant nibble (builder).
    #[inline]
    pub const fn with_variant(mut self, variant: u8) -> Self {
        self.vf = (self.vf & 0x0F) | ((variant & 0x0F) << 4);
        self
    }

    /// Set the flags nibble (builder).
    #[inline]
    pub const fn with_flags(mut self, flags: u8) -> Self {
        self.vf = (self.vf & 0xF0) | (flags & 0x0F);
        self
    }

    /// Set the damage byte (builder).
    #[inline]
    pub const fn with_damage(mut self, damage: u8) -> Self {
        self.damage = damage;
        self
    }

    /// Whether this layer is empty (type identifier 0).
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.kind == 0
    }

    /// Sprite variant nibble.
    #[inline]
    pub const fn variant(self) -> u8 {
        self.vf >> 4
    }

    /// Flags nibble.
    #[inline]
    pub const fn flags(self) -> u8 {
        self.vf & 0x0F
    }

    /// Whether the given flag bits are all set. Empty layers carry no
    /// effective flags.
    #[inline]
    pub const fn has_flags(self, flags: u8) -> bool {
        !self.is_empty() && (self.flags() & flags) == flags
    }
}

/// The full static stack of one tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRecord {
    layers: [Layer; LAYER_COUNT],
}

impl TileRecord {
    /// A tile with every layer empty.
    pub const EMPTY: Self = Self {
        layers: [Layer::EMPTY; LAYER_COUNT],
    };

    /// The layer in the given slot.
    #[inline]
    pub const fn layer(&self, slot: LayerSlot) -> Layer {
        self.layers[slot.index()]
    }

    /// Replace the layer in the given slot.
    #[inline]
    pub const fn set_layer(&mut self, slot: LayerSlot, layer: Layer) {
        self.layers[slot.index()] = layer;
    }

    /// Whether this tile blocks movement. Only the wall layer counts;
    /// decor never participates in walkability.
    #[inline]
    pub const fn is_blocking(&self) -> bool {
        self.layer(LayerSlot::Wall).has_flags(Layer::FLAG_BLOCKS_MOVE)
    }

    /// Whether this tile blocks sight. Only the wall layer counts.
    #[inline]
    pub const fn blocks_sight(&self) -> bool {
        self.layer(LayerSlot::Wall).has_flags(Layer::FLAG_BLOCKS_SIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibble_packing_round_trips() {
        let l = Layer::new(7).with_variant(0xA).with_flags(0x3);
        assert_eq!(l.variant(), 0xA);
        assert_eq!(l.flags(), 0x3);
        assert_eq!(l.vf, 0xA3);
    }

    #[test]
    fn empty_layer_has_no_effective_flags() {
        let l = Layer::EMPTY.with_flags(Layer::FLAG_BLOCKS_MOVE);
        assert!(l.is_empty());
        assert!(!l.has_flags(Layer::FLAG_BLOCKS_MOVE));
    }

    #[test]
    fn only_the_wall_layer_blocks() {
        let blocking = Layer::new(1).with_flags(Layer::FLAG_BLOCKS_MOVE | Layer::FLAG_BLOCKS_SIGHT);

        let mut tile = TileRecord::EMPTY;
        tile.set_layer(LayerSlot::WallDecor, blocking);
        tile.set_layer(LayerSlot::FloorDecor, blocking);
        tile.set_layer(LayerSlot::Roof, blocking);
        assert!(!tile.is_blocking());
        assert!(!tile.blocks_sight());

        tile.set_layer(LayerSlot::Wall, blocking);
        assert!(tile.is_blocking());
        assert!(tile.blocks_sight());
    }

    #[test]
    fn sight_and_movement_flags_are_independent() {
        // A window: blocks movement but not sight.
        let window = Layer::new(2).with_flags(Layer::FLAG_BLOCKS_MOVE);
        let mut tile = TileRecord::EMPTY;
        tile.set_layer(LayerSlot::Wall, window);
        assert!(tile.is_blocking());
        assert!(!tile.blocks_sight());
    }

    #[test]
    fn slot_indices_are_stable() {
        for (i, slot) in LayerSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }
}
