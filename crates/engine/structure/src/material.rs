//! Material catalog abstraction
//!
//! The compiler never talks to the host world's registry directly; it looks
//! materials up through [`MaterialCatalog`]. A [`Material`] describes which
//! state slots a cell of that material exposes and when in the write order
//! it must be placed.

use std::collections::HashMap;

/// State slots a material's cell-state exposes.
///
/// The property resolver only applies a symbolic assignment when the
/// matching slot is present; everything else is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertySlots {
    /// 4-way horizontal orientation (stairs, doors, furnaces)
    pub horizontal_facing: bool,
    /// Full 6-way orientation (dispenser-like)
    pub full_facing: bool,
    /// Upper/lower half of a two-cell vertical pair (doors, tall plants)
    pub double_half: bool,
    /// Top/bottom placement of a single cell (stairs, trapdoors)
    pub top_bottom_half: bool,
    /// Bottom/top/double slab variants
    pub slab_type: bool,
    pub open: bool,
    pub powered: bool,
    pub waterlogged: bool,
    pub lit: bool,
    /// Left/right door hinge
    pub hinge: bool,
    /// X/Y/Z pillar axis
    pub axis: bool,
    /// Straight/inner/outer stair shape
    pub stairs_shape: bool,
}

/// When in the write order a material must be placed.
///
/// The target world resolves part of a cell's final state from its
/// neighbors at write time, so dependent cells go after their support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementClass {
    /// Plain structural cell, written first
    Structural,
    /// Empty state used to carve openings
    Clearing,
    /// Occupies two linked cells (doors, beds); needs surrounding structure
    MultiPart,
    /// Needs a supporting adjacent cell to orient (torches, ladders, signs)
    Attached,
    /// Ground or shelf dependent decoration (carpets, pressure plates, pots)
    SurfaceDecor,
}

impl PlacementClass {
    /// Priority band for the compiled write order. Stable within a band.
    pub fn band(self) -> u8 {
        match self {
            PlacementClass::Structural => 0,
            PlacementClass::Clearing => 1,
            PlacementClass::MultiPart => 2,
            PlacementClass::Attached | PlacementClass::SurfaceDecor => 3,
        }
    }
}

/// A placeable material with its supported state slots
#[derive(Debug, Clone)]
pub struct Material {
    pub id: String,
    pub class: PlacementClass,
    pub slots: PropertySlots,
    /// Whether this multi-part material marks a structure entrance (doors
    /// do, beds do not)
    pub entrance: bool,
}

impl Material {
    pub fn new(id: impl Into<String>, class: PlacementClass) -> Self {
        Self {
            id: id.into(),
            class,
            slots: PropertySlots::default(),
            entrance: false,
        }
    }

    pub fn structural(id: impl Into<String>) -> Self {
        Self::new(id, PlacementClass::Structural)
    }

    pub fn with_slots(mut self, slots: PropertySlots) -> Self {
        self.slots = slots;
        self
    }

    pub fn entrance(mut self) -> Self {
        self.entrance = true;
        self
    }

    pub fn is_clearing(&self) -> bool {
        self.class == PlacementClass::Clearing
    }
}

/// External material lookup consumed by the compiler and validator
pub trait MaterialCatalog {
    /// Resolve a material id. `None` means the id is unknown and the
    /// fragment referencing it is skipped.
    fn get(&self, id: &str) -> Option<&Material>;
}

/// In-memory catalog with a small default palette
///
/// Hosts embed their own registry-backed catalog; this one backs the
/// test-suite and the offline tool.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    materials: HashMap<String, Material>,
}

impl BuiltinCatalog {
    pub fn empty() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    pub fn insert(&mut self, material: Material) {
        self.materials.insert(material.id.clone(), material);
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.insert(material);
        self
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();

        catalog.insert(Material::new("air", PlacementClass::Clearing));

        for id in [
            "stone",
            "cobblestone",
            "stone_bricks",
            "oak_planks",
            "spruce_planks",
            "bricks",
            "glass",
            "glass_pane",
            "glowstone",
            "dirt",
            "sandstone",
        ] {
            catalog.insert(Material::structural(id));
        }

        for id in ["oak_log", "spruce_log", "birch_log"] {
            catalog.insert(Material::structural(id).with_slots(PropertySlots {
                axis: true,
                ..Default::default()
            }));
        }

        for id in ["oak_stairs", "stone_brick_stairs", "cobblestone_stairs"] {
            catalog.insert(Material::structural(id).with_slots(PropertySlots {
                horizontal_facing: true,
                top_bottom_half: true,
                stairs_shape: true,
                waterlogged: true,
                ..Default::default()
            }));
        }

        for id in ["oak_slab", "stone_brick_slab"] {
            catalog.insert(Material::structural(id).with_slots(PropertySlots {
                slab_type: true,
                waterlogged: true,
                ..Default::default()
            }));
        }

        catalog.insert(Material::structural("furnace").with_slots(PropertySlots {
            horizontal_facing: true,
            lit: true,
            ..Default::default()
        }));

        catalog.insert(Material::structural("oak_trapdoor").with_slots(PropertySlots {
            horizontal_facing: true,
            top_bottom_half: true,
            open: true,
            powered: true,
            waterlogged: true,
            ..Default::default()
        }));

        for id in ["oak_door", "spruce_door", "iron_door"] {
            catalog.insert(
                Material::new(id, PlacementClass::MultiPart)
                    .with_slots(PropertySlots {
                        horizontal_facing: true,
                        double_half: true,
                        open: true,
                        powered: true,
                        hinge: true,
                        ..Default::default()
                    })
                    .entrance(),
            );
        }

        for id in ["red_bed", "white_bed"] {
            catalog.insert(Material::new(id, PlacementClass::MultiPart).with_slots(
                PropertySlots {
                    horizontal_facing: true,
                    ..Default::default()
                },
            ));
        }

        catalog.insert(Material::new("torch", PlacementClass::Attached));
        catalog.insert(Material::new("lantern", PlacementClass::Attached));
        for id in ["wall_torch", "ladder", "oak_wall_sign", "lever"] {
            catalog.insert(Material::new(id, PlacementClass::Attached).with_slots(
                PropertySlots {
                    horizontal_facing: true,
                    ..Default::default()
                },
            ));
        }

        for id in ["white_carpet", "red_carpet", "flower_pot"] {
            catalog.insert(Material::new(id, PlacementClass::SurfaceDecor));
        }
        catalog.insert(
            Material::new("stone_pressure_plate", PlacementClass::SurfaceDecor).with_slots(
                PropertySlots {
                    powered: true,
                    ..Default::default()
                },
            ),
        );

        catalog
    }
}

impl MaterialCatalog for BuiltinCatalog {
    fn get(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }
}
