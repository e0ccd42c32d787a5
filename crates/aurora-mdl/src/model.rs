//! In-memory model graph: nodes, geometry, animations and the model root.
//!
//! A [`Model`] is either populated by one parse pass over a file or built
//! field by field through the constructors here; once export begins it is
//! only read, so a fully built model is safe to share between threads.

use crate::error::MdlError;
use crate::property;
use crate::schema::{self, NodeKind, PropertyDescriptor, PropertyKind};
use crate::value::{Element, Value};

/// One property slot of a node: the schema entry plus the value, if set.
///
/// The `Option` doubles as the written flag: an explicit `shadow 0` is a
/// populated slot and re-exports, while a never-populated slot is omitted
/// entirely.
#[derive(Debug, Clone)]
pub struct PropertySlot {
    /// Schema entry backing this slot.
    pub desc: &'static PropertyDescriptor,
    /// Current value; `None` until populated by a parse or [`Node::set`].
    pub value: Option<Value>,
}

/// A named, typed element of the geometry or animation tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Kind of the node, fixing its property schema.
    pub kind: NodeKind,
    /// Node name, unique within its block in well-formed files.
    pub name: String,
    slots: Vec<PropertySlot>,
}

impl Node {
    /// Create an empty node with schema-derived property slots.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let slots = schema::properties_for(kind)
            .iter()
            .map(|desc| PropertySlot {
                desc: *desc,
                value: None,
            })
            .collect();
        Self {
            kind,
            name: name.into(),
            slots,
        }
    }

    /// Value of a property, if set. Names match case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|slot| slot.desc.name.eq_ignore_ascii_case(name))
            .and_then(|slot| slot.value.as_ref())
    }

    /// The node's parent name, if its `parent` property is set.
    pub fn parent(&self) -> Option<&str> {
        self.get("parent").and_then(Value::as_str)
    }

    /// Set a property value.
    ///
    /// The name must exist in this node kind's schema and the value's tag
    /// must match the declared kind; a tag mismatch is a bug in the caller
    /// and panics. Enum values may use either the symbolic name or the file
    /// token and are stored canonically.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), MdlError> {
        let kind = self.kind;
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.desc.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| MdlError::UnknownProperty {
                kind: format!("{kind:?}"),
                property: name.to_owned(),
            })?;
        let value = match (slot.desc.kind, value) {
            (PropertyKind::Enum(pairs), Value::Enum(token)) => {
                let pair = property::resolve_enum(pairs, &token).ok_or_else(|| {
                    MdlError::invalid_value(
                        None,
                        slot.desc.name,
                        token,
                        property::accepted_tokens(pairs),
                    )
                })?;
                Value::Enum(pair.name.to_owned())
            }
            (kind, value) => {
                assert!(
                    value_matches_kind(&value, kind),
                    "property '{}' expects {:?}, got {:?}",
                    slot.desc.name,
                    slot.desc.kind,
                    value
                );
                value
            }
        };
        slot.value = Some(value);
        Ok(())
    }

    /// Populated slots in schema order, which is also write order.
    pub fn set_properties(&self) -> impl Iterator<Item = (&'static PropertyDescriptor, &Value)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.value.as_ref().map(|value| (slot.desc, value)))
    }

    /// Store an already-typed value from the parser, bypassing validation.
    pub(crate) fn set_raw(&mut self, name: &str, value: Value) {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.desc.name.eq_ignore_ascii_case(name))
        {
            slot.value = Some(value);
        }
    }
}

fn value_matches_kind(value: &Value, kind: PropertyKind) -> bool {
    match (kind, value) {
        (PropertyKind::Scalar(Element::String), Value::String(_)) => true,
        (PropertyKind::Scalar(Element::Int), Value::Int(_)) => true,
        (PropertyKind::Scalar(Element::Float), Value::Float(_)) => true,
        (PropertyKind::Scalar(Element::Bool), Value::Bool(_)) => true,
        (PropertyKind::Vector(_), Value::FloatVector(_)) => true,
        (PropertyKind::Matrix(Element::Float | Element::Bool), Value::FloatMatrix(_)) => true,
        (PropertyKind::Matrix(Element::Int), Value::IntMatrix(_)) => true,
        (PropertyKind::Matrix(Element::String), Value::StringMatrix(_)) => true,
        (PropertyKind::AabbTree, Value::Aabb(_)) => true,
        _ => false,
    }
}

/// The geometry block: named nodes in file order.
///
/// Parent links are by name only; discovery order happens to be
/// parent-before-children in files written by the reference exporter, but
/// nothing here depends on it.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// Geometry name; matches the model name in well-formed files.
    pub name: String,
    /// Nodes in discovery order.
    pub nodes: Vec<Node>,
}

impl Geometry {
    /// Find a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

/// One animation clip.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Animation name.
    pub name: String,
    /// Name of the model this animation belongs to.
    pub model_name: String,
    /// Clip length in seconds.
    pub length: f64,
    /// Blend time from the previously playing animation.
    pub transtime: f64,
    /// Entry node of the animation tree, or `NULL`.
    pub animroot: String,
    /// Timed event tags in file order; duplicate times are legal.
    pub events: Vec<(f64, String)>,
    /// Animation nodes in file order, which must round-trip.
    pub nodes: Vec<Node>,
}

impl Animation {
    /// Create an empty animation.
    pub fn new(name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_name: model_name.into(),
            length: 0.0,
            transtime: 0.0,
            animroot: "NULL".into(),
            events: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Find an animation node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

/// Model classification: its in-game role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    /// Animated creature or NPC model.
    #[default]
    Character,
    /// Static environment tile.
    Tile,
    /// Spell or visual effect model.
    Effects,
    /// Inventory item model.
    Item,
}

impl Classification {
    /// Parse a classification token, case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "character" => Some(Classification::Character),
            "tile" => Some(Classification::Tile),
            "effects" => Some(Classification::Effects),
            "item" => Some(Classification::Item),
            _ => None,
        }
    }

    /// Token written to the file.
    pub fn token(&self) -> &'static str {
        match self {
            Classification::Character => "character",
            Classification::Tile => "tile",
            Classification::Effects => "effects",
            Classification::Item => "item",
        }
    }
}

/// Root aggregate of one MDL file.
#[derive(Debug, Clone)]
pub struct Model {
    /// Model name.
    pub name: String,
    /// Parent model to inherit geometry and animations from, or `NULL`.
    pub supermodel: String,
    /// In-game role of the model.
    pub classification: Classification,
    /// Global scale applied to animation lengths, when present.
    pub animationscale: Option<f64>,
    /// The geometry block.
    pub geometry: Geometry,
    /// Animation clips in file order.
    pub animations: Vec<Animation>,
}

impl Model {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            geometry: Geometry {
                name: name.clone(),
                nodes: Vec::new(),
            },
            name,
            supermodel: "NULL".into(),
            classification: Classification::default(),
            animationscale: None,
            animations: Vec::new(),
        }
    }

    /// Append a fresh geometry node and return it for population.
    pub fn new_node(&mut self, kind: NodeKind, name: impl Into<String>) -> &mut Node {
        self.geometry.nodes.push(Node::new(kind, name));
        let last = self.geometry.nodes.len() - 1;
        &mut self.geometry.nodes[last]
    }

    /// Append a fresh animation and return it for population.
    pub fn new_animation(&mut self, name: impl Into<String>) -> &mut Animation {
        self.animations.push(Animation::new(name, self.name.clone()));
        let last = self.animations.len() - 1;
        &mut self.animations[last]
    }

    /// Find an animation by name.
    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|anim| anim.name == name)
    }

    /// Field-for-field differences against another model.
    ///
    /// Geometry and animation nodes are matched by name, so two models
    /// whose nodes were discovered in different orders still compare equal.
    /// Returns human-readable lines, empty when the models match.
    pub fn diff(&self, other: &Model) -> Vec<String> {
        let mut diffs = Vec::new();
        if self.name != other.name {
            diffs.push(format!("model name: {} vs {}", self.name, other.name));
        }
        if self.supermodel != other.supermodel {
            diffs.push(format!(
                "supermodel: {} vs {}",
                self.supermodel, other.supermodel
            ));
        }
        if self.classification != other.classification {
            diffs.push(format!(
                "classification: {} vs {}",
                self.classification.token(),
                other.classification.token()
            ));
        }
        if self.animationscale != other.animationscale {
            diffs.push(format!(
                "animationscale: {:?} vs {:?}",
                self.animationscale, other.animationscale
            ));
        }
        diff_nodes("node", &self.geometry.nodes, &other.geometry.nodes, &mut diffs);
        for anim in &self.animations {
            match other.animation(&anim.name) {
                None => diffs.push(format!("animation {} missing from right model", anim.name)),
                Some(other_anim) => {
                    if anim.length != other_anim.length {
                        diffs.push(format!(
                            "animation {} length: {} vs {}",
                            anim.name, anim.length, other_anim.length
                        ));
                    }
                    if anim.events != other_anim.events {
                        diffs.push(format!("animation {} events differ", anim.name));
                    }
                    diff_nodes(
                        &format!("animation {} node", anim.name),
                        &anim.nodes,
                        &other_anim.nodes,
                        &mut diffs,
                    );
                }
            }
        }
        for anim in &other.animations {
            if self.animation(&anim.name).is_none() {
                diffs.push(format!("animation {} missing from left model", anim.name));
            }
        }
        diffs
    }
}

fn diff_nodes(label: &str, left: &[Node], right: &[Node], diffs: &mut Vec<String>) {
    for node in left {
        let Some(other) = right.iter().find(|n| n.name == node.name) else {
            diffs.push(format!("{label} {} missing from right model", node.name));
            continue;
        };
        if node.kind != other.kind {
            diffs.push(format!(
                "{label} {} kind: {:?} vs {:?}",
                node.name, node.kind, other.kind
            ));
            continue;
        }
        for (desc, value) in node.set_properties() {
            match other.get(desc.name) {
                None => diffs.push(format!(
                    "{label} {} property {} missing from right model",
                    node.name, desc.name
                )),
                Some(other_value) if other_value != value => diffs.push(format!(
                    "{label} {} property {} differs",
                    node.name, desc.name
                )),
                Some(_) => {}
            }
        }
        for (desc, _) in other.set_properties() {
            if node.get(desc.name).is_none() {
                diffs.push(format!(
                    "{label} {} property {} missing from left model",
                    node.name, desc.name
                ));
            }
        }
    }
    for node in right {
        if !left.iter().any(|n| n.name == node.name) {
            diffs.push(format!("{label} {} missing from left model", node.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_slots_per_node() {
        let mut a = Node::new(NodeKind::Trimesh, "a");
        let b = Node::new(NodeKind::Trimesh, "b");
        a.set("alpha", Value::Float(0.5)).unwrap();
        assert!(a.get("alpha").is_some());
        assert!(b.get("alpha").is_none());
    }

    #[test]
    fn test_set_unknown_property() {
        let mut node = Node::new(NodeKind::Dummy, "base");
        let err = node.set("verts", Value::FloatMatrix(vec![])).unwrap_err();
        assert!(matches!(err, MdlError::UnknownProperty { .. }));
    }

    #[test]
    #[should_panic(expected = "expects")]
    fn test_set_mismatched_tag_panics() {
        let mut node = Node::new(NodeKind::Trimesh, "mesh");
        let _ = node.set("alpha", Value::String("high".into()));
    }

    #[test]
    fn test_set_enum_accepts_either_side() {
        let mut node = Node::new(NodeKind::Emitter, "smoke");
        node.set("p2p_type", Value::Enum("Gravity".into())).unwrap();
        assert_eq!(node.get("p2p_type"), Some(&Value::Enum("gravity".into())));
        node.set("p2p_type", Value::Enum("bezier".into())).unwrap();
        assert_eq!(node.get("p2p_type"), Some(&Value::Enum("bezier".into())));
        let err = node
            .set("p2p_type", Value::Enum("spline".into()))
            .unwrap_err();
        assert!(matches!(err, MdlError::InvalidValue { line: None, .. }));
    }

    #[test]
    fn test_parent_accessor() {
        let mut node = Node::new(NodeKind::Dummy, "hand");
        assert_eq!(node.parent(), None);
        node.set("parent", Value::String("arm".into())).unwrap();
        assert_eq!(node.parent(), Some("arm"));
    }

    #[test]
    fn test_builder_seam() {
        let mut model = Model::new("box");
        model
            .new_node(NodeKind::Dummy, "box")
            .set("parent", Value::String("NULL".into()))
            .unwrap();
        let anim = model.new_animation("spin");
        anim.length = 1.5;
        assert_eq!(model.geometry.node("box").unwrap().kind, NodeKind::Dummy);
        assert_eq!(model.animation("spin").unwrap().model_name, "box");
    }

    #[test]
    fn test_diff_reports_property_change() {
        let mut left = Model::new("m");
        left.new_node(NodeKind::Trimesh, "mesh")
            .set("alpha", Value::Float(1.0))
            .unwrap();
        let mut right = left.clone();
        assert!(left.diff(&right).is_empty());
        right.geometry.nodes[0]
            .set("alpha", Value::Float(0.5))
            .unwrap();
        let diffs = left.diff(&right);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].contains("alpha"));
    }
}
