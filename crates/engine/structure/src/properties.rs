//! Symbolic property resolution
//!
//! The generator describes orientation with loose string key/value pairs
//! (`"facing": "south"`, `"side": "top"`, ...). Resolution maps them onto
//! the slots the material actually has, tolerating aliases and dropping
//! anything unrecognized: the source is generated content and a bad
//! property must never sink the whole structure.

use std::collections::{BTreeMap, HashMap};

use crate::facing::{BlockAxis, Facing};
use crate::material::{Material, PlacementClass};

/// Recognized property kinds after alias resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    Facing,
    Half,
    Type,
    Open,
    Powered,
    Waterlogged,
    Lit,
    Hinge,
    Axis,
    Shape,
}

impl PropertyKey {
    /// Resolve a raw key, case-insensitive, through the alias table.
    /// Unknown keys yield `None` and are ignored by the resolver.
    pub fn resolve(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "facing" | "direction" | "orientation" => Some(PropertyKey::Facing),
            "half" | "side" => Some(PropertyKey::Half),
            "type" | "slab_type" => Some(PropertyKey::Type),
            "open" => Some(PropertyKey::Open),
            "powered" => Some(PropertyKey::Powered),
            "waterlogged" => Some(PropertyKey::Waterlogged),
            "lit" => Some(PropertyKey::Lit),
            "hinge" | "door_hinge" => Some(PropertyKey::Hinge),
            "axis" => Some(PropertyKey::Axis),
            "shape" => Some(PropertyKey::Shape),
            _ => None,
        }
    }
}

/// Upper/lower for two-cell pairs, top/bottom for single half-cells.
/// Which family applies is decided by the material's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HalfValue {
    Upper,
    Lower,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlabType {
    Bottom,
    Top,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HingeSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StairShape {
    Straight,
    InnerLeft,
    InnerRight,
    OuterLeft,
    OuterRight,
}

/// A resolved, typed property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyValue {
    Facing(Facing),
    Half(HalfValue),
    Slab(SlabType),
    Bool(bool),
    Hinge(HingeSide),
    Axis(BlockAxis),
    Shape(StairShape),
}

/// A material id with its resolved properties: the concrete cell-state
/// written into the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    pub material: String,
    pub class: PlacementClass,
    pub props: BTreeMap<PropertyKey, PropertyValue>,
}

impl BlockState {
    /// Default state of a material, no properties applied
    pub fn of(material: &Material) -> Self {
        Self {
            material: material.id.clone(),
            class: material.class,
            props: BTreeMap::new(),
        }
    }

    /// The empty state used to carve openings and as the world's default
    pub fn air() -> Self {
        Self {
            material: "air".into(),
            class: PlacementClass::Clearing,
            props: BTreeMap::new(),
        }
    }

    pub fn is_clearing(&self) -> bool {
        self.class == PlacementClass::Clearing
    }

    pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.props.get(&key)
    }
}

/// Resolve a raw property map onto `material`'s default state.
///
/// Unsupported slots and unknown keys are dropped without error; booleans
/// parse permissively (anything that is not `true` is false).
pub fn resolve_state(material: &Material, raw: &HashMap<String, String>) -> BlockState {
    let mut state = BlockState::of(material);
    for (key, value) in raw {
        let Some(kind) = PropertyKey::resolve(key) else {
            tracing::debug!(key, value, material = %material.id, "dropping unknown property key");
            continue;
        };
        apply_property(&mut state, material, kind, value);
    }
    state
}

/// Apply a legacy single `facing` field (older region encoding)
pub fn resolve_legacy_facing(material: &Material, facing: Option<&str>) -> BlockState {
    let mut state = BlockState::of(material);
    if let Some(value) = facing {
        if !value.is_empty() {
            apply_property(&mut state, material, PropertyKey::Facing, value);
        }
    }
    state
}

fn apply_property(state: &mut BlockState, material: &Material, kind: PropertyKey, value: &str) {
    let slots = &material.slots;
    let resolved = match kind {
        PropertyKey::Facing => Facing::parse(value).and_then(|dir| {
            if slots.horizontal_facing && dir.is_horizontal() {
                Some(PropertyValue::Facing(dir))
            } else if slots.full_facing {
                Some(PropertyValue::Facing(dir))
            } else {
                None
            }
        }),
        PropertyKey::Half => {
            // Pick the family the material actually has: doors pair two
            // cells (upper/lower), stairs occupy half a cell (top/bottom).
            if slots.double_half {
                let half = if value.eq_ignore_ascii_case("upper") {
                    HalfValue::Upper
                } else {
                    HalfValue::Lower
                };
                Some(PropertyValue::Half(half))
            } else if slots.top_bottom_half {
                let half = if value.eq_ignore_ascii_case("top") {
                    HalfValue::Top
                } else {
                    HalfValue::Bottom
                };
                Some(PropertyValue::Half(half))
            } else {
                None
            }
        }
        PropertyKey::Type => slots.slab_type.then(|| {
            PropertyValue::Slab(match value.to_ascii_lowercase().as_str() {
                "top" => SlabType::Top,
                "double" => SlabType::Double,
                _ => SlabType::Bottom,
            })
        }),
        PropertyKey::Open => bool_value(slots.open, value),
        PropertyKey::Powered => bool_value(slots.powered, value),
        PropertyKey::Waterlogged => bool_value(slots.waterlogged, value),
        PropertyKey::Lit => bool_value(slots.lit, value),
        PropertyKey::Hinge => slots.hinge.then(|| {
            PropertyValue::Hinge(if value.eq_ignore_ascii_case("right") {
                HingeSide::Right
            } else {
                HingeSide::Left
            })
        }),
        PropertyKey::Axis => slots.axis.then(|| PropertyValue::Axis(BlockAxis::parse(value))),
        PropertyKey::Shape => slots.stairs_shape.then(|| {
            PropertyValue::Shape(match value.to_ascii_lowercase().as_str() {
                "inner_left" => StairShape::InnerLeft,
                "inner_right" => StairShape::InnerRight,
                "outer_left" => StairShape::OuterLeft,
                "outer_right" => StairShape::OuterRight,
                _ => StairShape::Straight,
            })
        }),
    };

    match resolved {
        Some(value) => {
            state.props.insert(kind, value);
        }
        None => {
            tracing::debug!(
                ?kind,
                value,
                material = %material.id,
                "dropping unsupported property assignment"
            );
        }
    }
}

fn bool_value(supported: bool, value: &str) -> Option<PropertyValue> {
    supported.then(|| PropertyValue::Bool(value.eq_ignore_ascii_case("true")))
}
