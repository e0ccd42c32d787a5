//! Static property schema: which node kinds exist and which typed
//! properties each kind carries.
//!
//! The tables below are the single source of truth for the format. Every
//! node instance copies its slots from here, so two nodes of the same kind
//! never alias property storage, and the writer emits properties in table
//! order.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::value::Element;

/// Kinds of nodes a model can contain.
///
/// Animation nodes use the same file tokens as their geometry counterparts
/// (`node dummy …` appears in both blocks); the enclosing block decides
/// which schema applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Transform-only grouping node.
    Dummy,
    /// Static triangle mesh.
    Trimesh,
    /// Mesh with spring-simulated vertices.
    Danglymesh,
    /// Mesh deformed by bone weights.
    Skin,
    /// Particle emitter.
    Emitter,
    /// Light source.
    Light,
    /// Walkmesh carrying a bounding-box tree.
    Aabb,
    /// Placeholder that pulls in another model file.
    Reference,
    /// Animation channel holder for a dummy node.
    AnimDummy,
    /// Animation channel holder for a trimesh node.
    AnimTrimesh,
    /// Animation channel holder for a danglymesh node.
    AnimDanglymesh,
    /// Animation channel holder for a skin node.
    AnimSkin,
    /// Animation channel holder for an emitter node.
    AnimEmitter,
    /// Animation channel holder for a light node.
    AnimLight,
}

impl NodeKind {
    /// Resolve a kind token inside a geometry block.
    pub fn geometry_kind(token: &str) -> Option<NodeKind> {
        match token.to_ascii_lowercase().as_str() {
            "dummy" => Some(NodeKind::Dummy),
            "trimesh" => Some(NodeKind::Trimesh),
            "danglymesh" => Some(NodeKind::Danglymesh),
            "skin" => Some(NodeKind::Skin),
            "emitter" => Some(NodeKind::Emitter),
            "light" => Some(NodeKind::Light),
            "aabb" => Some(NodeKind::Aabb),
            "reference" => Some(NodeKind::Reference),
            _ => None,
        }
    }

    /// Resolve a kind token inside an animation block.
    pub fn animation_kind(token: &str) -> Option<NodeKind> {
        match token.to_ascii_lowercase().as_str() {
            "dummy" => Some(NodeKind::AnimDummy),
            "trimesh" => Some(NodeKind::AnimTrimesh),
            "danglymesh" => Some(NodeKind::AnimDanglymesh),
            "skin" => Some(NodeKind::AnimSkin),
            "emitter" => Some(NodeKind::AnimEmitter),
            "light" => Some(NodeKind::AnimLight),
            _ => None,
        }
    }

    /// Token used in `node` declarations.
    pub fn token(&self) -> &'static str {
        match self {
            NodeKind::Dummy | NodeKind::AnimDummy => "dummy",
            NodeKind::Trimesh | NodeKind::AnimTrimesh => "trimesh",
            NodeKind::Danglymesh | NodeKind::AnimDanglymesh => "danglymesh",
            NodeKind::Skin | NodeKind::AnimSkin => "skin",
            NodeKind::Emitter | NodeKind::AnimEmitter => "emitter",
            NodeKind::Light | NodeKind::AnimLight => "light",
            NodeKind::Aabb => "aabb",
            NodeKind::Reference => "reference",
        }
    }

    /// True for animation-block kinds.
    pub fn is_animation(&self) -> bool {
        matches!(
            self,
            NodeKind::AnimDummy
                | NodeKind::AnimTrimesh
                | NodeKind::AnimDanglymesh
                | NodeKind::AnimSkin
                | NodeKind::AnimEmitter
                | NodeKind::AnimLight
        )
    }
}

/// One `(symbolic name, file token)` pair of an enum property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumPair {
    /// Name used by the in-memory model (and any host UI).
    pub name: &'static str,
    /// Token written to the file.
    pub token: &'static str,
}

/// Container shape and element type of a property.
///
/// Shape and element are independent axes; `Scalar(Float)` and
/// `Matrix(Float)` share the element codec but not the line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// One value on the declaration line.
    Scalar(Element),
    /// A row of values on the declaration line.
    Vector(Element),
    /// A variable number of rows on the following lines.
    Matrix(Element),
    /// A scalar restricted to a closed token set.
    Enum(&'static [EnumPair]),
    /// Inline bounding-box tree (walkmesh nodes only).
    AabbTree,
}

/// Schema entry for one named property.
#[derive(Debug)]
pub struct PropertyDescriptor {
    /// Property name as it appears in the file.
    pub name: &'static str,
    /// Container shape and element type.
    pub kind: PropertyKind,
    /// Node kinds this property applies to.
    pub nodes: &'static [NodeKind],
}

const fn scalar(
    name: &'static str,
    element: Element,
    nodes: &'static [NodeKind],
) -> PropertyDescriptor {
    PropertyDescriptor {
        name,
        kind: PropertyKind::Scalar(element),
        nodes,
    }
}

const fn vector(
    name: &'static str,
    element: Element,
    nodes: &'static [NodeKind],
) -> PropertyDescriptor {
    PropertyDescriptor {
        name,
        kind: PropertyKind::Vector(element),
        nodes,
    }
}

const fn matrix(
    name: &'static str,
    element: Element,
    nodes: &'static [NodeKind],
) -> PropertyDescriptor {
    PropertyDescriptor {
        name,
        kind: PropertyKind::Matrix(element),
        nodes,
    }
}

const fn enumeration(
    name: &'static str,
    pairs: &'static [EnumPair],
    nodes: &'static [NodeKind],
) -> PropertyDescriptor {
    PropertyDescriptor {
        name,
        kind: PropertyKind::Enum(pairs),
        nodes,
    }
}

const fn pair(name: &'static str, token: &'static str) -> EnumPair {
    EnumPair { name, token }
}

use Element::{Bool, Float, Int, String as Str};
use NodeKind::*;

const ALL_GEOMETRY: &[NodeKind] = &[
    Dummy, Trimesh, Danglymesh, Skin, Emitter, Light, Aabb, Reference,
];
const MESHES: &[NodeKind] = &[Trimesh, Danglymesh, Skin, Aabb];
const RENDERED_MESHES: &[NodeKind] = &[Trimesh, Danglymesh, Skin];
const DANGLY: &[NodeKind] = &[Danglymesh];
const SKIN: &[NodeKind] = &[Skin];
const WALKMESH: &[NodeKind] = &[Aabb];
const EMITTER: &[NodeKind] = &[Emitter];
const LIGHT: &[NodeKind] = &[Light];
const REF: &[NodeKind] = &[Reference];
const ALL_ANIM: &[NodeKind] = &[
    AnimDummy,
    AnimTrimesh,
    AnimDanglymesh,
    AnimSkin,
    AnimEmitter,
    AnimLight,
];
const ANIM_EMITTER: &[NodeKind] = &[AnimEmitter];

const UPDATE_MODES: &[EnumPair] = &[pair("fountain", "Fountain")];
const RENDER_MODES: &[EnumPair] = &[
    pair("normal", "Normal"),
    pair("linked", "Linked"),
    pair("motion_blur", "Motion_blur"),
];
const BLEND_MODES: &[EnumPair] = &[pair("normal", "Normal"), pair("lighten", "Lighten")];
const P2P_TYPES: &[EnumPair] = &[pair("bezier", "Bezier"), pair("gravity", "Gravity")];
const WIND_FLAGS: &[EnumPair] = &[pair("true", "true"), pair("false", "false")];

/// Properties of geometry-block nodes, in write order.
static GEOMETRY_PROPERTIES: &[PropertyDescriptor] = &[
    scalar("parent", Str, ALL_GEOMETRY),
    vector("position", Float, ALL_GEOMETRY),
    vector("orientation", Float, ALL_GEOMETRY),
    // mesh
    vector("ambient", Float, MESHES),
    vector("diffuse", Float, MESHES),
    vector("specular", Float, MESHES),
    scalar("shininess", Int, MESHES),
    scalar("shadow", Bool, MESHES),
    scalar("bitmap", Str, MESHES),
    matrix("verts", Float, MESHES),
    matrix("tverts", Float, MESHES),
    matrix("faces", Int, MESHES),
    scalar("alpha", Float, RENDERED_MESHES),
    scalar("scale", Float, RENDERED_MESHES),
    vector("selfillumcolor", Float, RENDERED_MESHES),
    scalar("rotatetexture", Bool, RENDERED_MESHES),
    scalar("tilefade", Bool, RENDERED_MESHES),
    scalar("transparencyhint", Bool, MESHES),
    scalar("beaming", Bool, RENDERED_MESHES),
    scalar("inheritcolor", Bool, RENDERED_MESHES),
    scalar("center", Bool, RENDERED_MESHES),
    scalar("render", Bool, RENDERED_MESHES),
    vector("colors", Float, RENDERED_MESHES),
    // danglymesh
    scalar("displacement", Float, DANGLY),
    scalar("period", Int, DANGLY),
    scalar("tightness", Int, DANGLY),
    matrix("constraints", Int, DANGLY),
    // skin
    matrix("weights", Str, SKIN),
    // walkmesh
    PropertyDescriptor {
        name: "aabb",
        kind: PropertyKind::AabbTree,
        nodes: WALKMESH,
    },
    // reference
    scalar("refmodel", Str, REF),
    scalar("reattachable", Bool, REF),
    // emitter
    vector("colorstart", Float, EMITTER),
    vector("colorend", Float, EMITTER),
    scalar("alphastart", Float, EMITTER),
    scalar("alphaend", Float, EMITTER),
    scalar("sizestart", Float, EMITTER),
    scalar("sizeend", Float, EMITTER),
    scalar("sizestart_y", Float, EMITTER),
    scalar("sizeend_y", Float, EMITTER),
    scalar("framestart", Int, EMITTER),
    scalar("frameend", Int, EMITTER),
    scalar("birthrate", Int, EMITTER),
    scalar("spawntype", Int, EMITTER),
    scalar("lifeexp", Float, EMITTER),
    scalar("mass", Float, EMITTER),
    scalar("spread", Float, EMITTER),
    scalar("particlerot", Float, EMITTER),
    scalar("velocity", Float, EMITTER),
    scalar("randvel", Float, EMITTER),
    scalar("fps", Int, EMITTER),
    scalar("random", Bool, EMITTER),
    scalar("inherit", Bool, EMITTER),
    scalar("inherit_local", Bool, EMITTER),
    scalar("inherit_part", Bool, EMITTER),
    scalar("inheritvel", Bool, EMITTER),
    scalar("xsize", Int, EMITTER),
    scalar("ysize", Int, EMITTER),
    scalar("bounce", Bool, EMITTER),
    scalar("bounce_co", Float, EMITTER),
    scalar("loop", Bool, EMITTER),
    enumeration("update", UPDATE_MODES, EMITTER),
    enumeration("render", RENDER_MODES, EMITTER),
    enumeration("blend", BLEND_MODES, EMITTER),
    scalar("update_sel", Bool, EMITTER),
    scalar("render_sel", Bool, EMITTER),
    scalar("blend_sel", Bool, EMITTER),
    scalar("deadspace", Float, EMITTER),
    scalar("opacity", Float, EMITTER),
    scalar("blurlength", Float, EMITTER),
    scalar("lightningdelay", Float, EMITTER),
    scalar("lightningradius", Float, EMITTER),
    scalar("lightningscale", Float, EMITTER),
    scalar("blastradius", Float, EMITTER),
    scalar("blastlength", Float, EMITTER),
    scalar("twosidedtex", Bool, EMITTER),
    scalar("p2p", Bool, EMITTER),
    scalar("p2p_sel", Bool, EMITTER),
    enumeration("p2p_type", P2P_TYPES, EMITTER),
    scalar("p2p_bezier2", Float, EMITTER),
    scalar("p2p_bezier3", Float, EMITTER),
    scalar("combinetime", Float, EMITTER),
    scalar("drag", Float, EMITTER),
    scalar("grav", Float, EMITTER),
    scalar("threshold", Float, EMITTER),
    scalar("texture", Str, EMITTER),
    scalar("xgrid", Int, EMITTER),
    scalar("ygrid", Int, EMITTER),
    enumeration("affectedbywind", WIND_FLAGS, EMITTER),
    scalar("m_istinted", Bool, EMITTER),
    scalar("renderorder", Int, EMITTER),
    scalar("splat", Bool, EMITTER),
    // light
    vector("color", Float, LIGHT),
    scalar("multiplier", Float, LIGHT),
    scalar("radius", Float, LIGHT),
    scalar("ambientonly", Bool, LIGHT),
    scalar("isdynamic", Bool, LIGHT),
    scalar("affectdynamic", Bool, LIGHT),
    scalar("lightpriority", Int, LIGHT),
    scalar("shadow", Bool, LIGHT),
    scalar("lensflares", Bool, LIGHT),
    scalar("flareradius", Float, LIGHT),
    scalar("fadinglight", Bool, LIGHT),
];

/// Properties of animation-block nodes, in write order.
static ANIMATION_PROPERTIES: &[PropertyDescriptor] = &[
    scalar("parent", Str, ALL_ANIM),
    matrix("orientationkey", Float, ALL_ANIM),
    matrix("positionkey", Float, ALL_ANIM),
    // animated emitter scalars
    matrix("alphaEndkey", Float, ANIM_EMITTER),
    matrix("alphaStartkey", Float, ANIM_EMITTER),
    matrix("alphakey", Float, ANIM_EMITTER),
    matrix("birthratekey", Float, ANIM_EMITTER),
    matrix("colorEndkey", Float, ANIM_EMITTER),
    matrix("colorStartkey", Float, ANIM_EMITTER),
    matrix("colorkey", Float, ANIM_EMITTER),
    matrix("fpskey", Float, ANIM_EMITTER),
    matrix("frameEndkey", Float, ANIM_EMITTER),
    matrix("frameStartkey", Float, ANIM_EMITTER),
    matrix("lifeExpkey", Float, ANIM_EMITTER),
    matrix("masskey", Float, ANIM_EMITTER),
    matrix("radiuskey", Float, ANIM_EMITTER),
    matrix("randvelkey", Float, ANIM_EMITTER),
    matrix("sizeEndkey", Float, ANIM_EMITTER),
    matrix("sizeStartkey", Float, ANIM_EMITTER),
    matrix("spreadkey", Float, ANIM_EMITTER),
    matrix("velocitykey", Float, ANIM_EMITTER),
    matrix("xsizekey", Float, ANIM_EMITTER),
    matrix("ysizekey", Float, ANIM_EMITTER),
];

/// Ordered property list for one node kind.
///
/// The per-kind index is built once on first use; the schema never changes
/// at runtime.
pub fn properties_for(kind: NodeKind) -> &'static [&'static PropertyDescriptor] {
    static REGISTRY: OnceLock<HashMap<NodeKind, Vec<&'static PropertyDescriptor>>> =
        OnceLock::new();
    let registry = REGISTRY.get_or_init(|| {
        let mut map: HashMap<NodeKind, Vec<&'static PropertyDescriptor>> = HashMap::new();
        for desc in GEOMETRY_PROPERTIES.iter().chain(ANIMATION_PROPERTIES) {
            for kind in desc.nodes {
                map.entry(*kind).or_default().push(desc);
            }
        }
        map
    });
    registry.get(&kind).map(Vec::as_slice).unwrap_or(&[])
}

/// Look up a property by name within one node kind's schema.
///
/// Names match case-insensitively; mixed-case keys like `colorEndkey`
/// appear in the wild with varying capitalization.
pub fn find_property(kind: NodeKind, name: &str) -> Option<&'static PropertyDescriptor> {
    properties_for(kind)
        .iter()
        .copied()
        .find(|desc| desc.name.eq_ignore_ascii_case(name))
}
