//! Bounding-box tree codec for walkmesh nodes.
//!
//! Walkmesh (`aabb`) nodes carry a binary spatial index over their faces,
//! stored inline as a pre-order sequence of `x1 y1 z1 x2 y2 z2 face` lines.
//! The tree has no delimiters: a lookahead line with exactly seven tokens is
//! the next tree node, anything else ends the tree. `face` is -1 for
//! internal nodes and the index of the single bounded face for leaves.

use crate::cursor::{LineCursor, TokenLine};
use crate::error::MdlError;
use crate::value;

/// One node of a bounding-box tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AabbNode {
    /// Minimum corner of the box.
    pub min: [f64; 3],
    /// Maximum corner of the box.
    pub max: [f64; 3],
    /// -1 for internal nodes, otherwise the index of the bounded face.
    pub face: i32,
    /// Left child; present exactly when `face` is -1.
    pub left: Option<Box<AabbNode>>,
    /// Right child; present exactly when `face` is -1.
    pub right: Option<Box<AabbNode>>,
}

impl AabbNode {
    /// Create a childless node.
    pub fn new(min: [f64; 3], max: [f64; 3], face: i32) -> Self {
        Self {
            min,
            max,
            face,
            left: None,
            right: None,
        }
    }

    /// True for nodes bounding exactly one face.
    pub fn is_leaf(&self) -> bool {
        self.face >= 0
    }
}

/// Node parsed from seven tokens, children still as arena indices.
struct RawNode {
    min: [f64; 3],
    max: [f64; 3],
    face: i32,
    left: Option<usize>,
    right: Option<usize>,
}

fn raw_from_tokens(tokens: &[String]) -> Option<RawNode> {
    let mut coords = [0f64; 6];
    for (slot, token) in coords.iter_mut().zip(tokens) {
        *slot = value::parse_float(token)?;
    }
    let face = value::parse_int(tokens.get(6)?)? as i32;
    Some(RawNode {
        min: [coords[0], coords[1], coords[2]],
        max: [coords[3], coords[4], coords[5]],
        face,
        left: None,
        right: None,
    })
}

/// Parse a bounding-box tree whose root fields sit on the declaration line
/// (`aabb x1 y1 z1 x2 y2 z2 face`).
///
/// Tree depth is data dependent, so both directions of this codec use
/// explicit stacks instead of recursion. The parse stack holds internal
/// nodes still waiting for their second child: each seven-token line
/// attaches to the innermost open node, left slot first, and an internal
/// node closes when its right slot fills. A tree that ends with open
/// internal nodes (a one-child internal node) would desynchronize the
/// parser and is rejected.
pub(crate) fn read_tree(line: &TokenLine, cursor: &mut LineCursor) -> Result<AabbNode, MdlError> {
    if line.len() != 8 {
        return Err(MdlError::malformed(
            line.number,
            "aabb declaration needs 6 coordinates and a face index",
        ));
    }
    let root = raw_from_tokens(&line.tokens[1..]).ok_or_else(|| {
        MdlError::malformed(line.number, "non-numeric field in aabb node")
    })?;

    let mut arena = vec![root];
    let mut open: Vec<usize> = Vec::new();
    if arena[0].face == -1 {
        open.push(0);
    }

    while !open.is_empty() {
        let Some(next) = cursor.peek() else { break };
        if next.len() != 7 {
            break;
        }
        let next = cursor.next_line().expect("peeked line");
        let raw = raw_from_tokens(&next.tokens).ok_or_else(|| {
            MdlError::malformed(next.number, "non-numeric field in aabb node")
        })?;
        let face = raw.face;
        let idx = arena.len();
        arena.push(raw);

        let parent = *open.last().expect("open internal node");
        if arena[parent].left.is_none() {
            arena[parent].left = Some(idx);
        } else {
            arena[parent].right = Some(idx);
            open.pop();
        }
        if face == -1 {
            open.push(idx);
        }
    }

    if !open.is_empty() {
        return Err(MdlError::malformed(
            line.number,
            "aabb tree ends with an internal node missing a child",
        ));
    }

    Ok(assemble(arena))
}

/// Convert the index arena into an owned tree.
///
/// Children always sit at higher indices than their parent (the stream is
/// pre-order), so walking the arena back to front has every child built
/// before its parent needs it.
fn assemble(arena: Vec<RawNode>) -> AabbNode {
    let mut built: Vec<Option<AabbNode>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);
    for i in (0..arena.len()).rev() {
        let raw = &arena[i];
        let node = AabbNode {
            min: raw.min,
            max: raw.max,
            face: raw.face,
            left: raw
                .left
                .map(|j| Box::new(built[j].take().expect("child built"))),
            right: raw
                .right
                .map(|j| Box::new(built[j].take().expect("child built"))),
        };
        built[i] = Some(node);
    }
    built[0].take().expect("root built")
}

fn fmt_fields(node: &AabbNode) -> String {
    format!(
        "{:.7} {:.7} {:.7} {:.7} {:.7} {:.7} {}",
        node.min[0], node.min[1], node.min[2], node.max[0], node.max[1], node.max[2], node.face
    )
}

/// Serialize a tree in pre-order, indentation level = depth.
///
/// The work stack is seeded right child first so popping yields left before
/// right. Coordinates use 7 decimal digits, unlike the 9 significant digits
/// used everywhere else.
pub(crate) fn write_tree(root: &AabbNode, indent: &str, out: &mut Vec<String>) {
    out.push(format!("{indent}aabb {}", fmt_fields(root)));
    let mut stack: Vec<(usize, &AabbNode)> = Vec::new();
    if let Some(right) = &root.right {
        stack.push((2, right));
    }
    if let Some(left) = &root.left {
        stack.push((2, left));
    }
    while let Some((depth, node)) = stack.pop() {
        out.push(format!("{}{}", indent.repeat(depth), fmt_fields(node)));
        if let Some(right) = &node.right {
            stack.push((depth + 1, right));
        }
        if let Some(left) = &node.left {
            stack.push((depth + 1, left));
        }
    }
}
