//! MDL reader: parses tokenized lines into a [`Model`].
//!
//! The top level is a dispatch loop keyed on each line's first token.
//! Unknown top-level keywords and unknown properties inside nodes are
//! ignored, and whole nodes of unregistered kinds are skipped, so files
//! written by newer tools still parse.

use std::path::Path;

use crate::cursor::{LineCursor, TokenLine};
use crate::error::MdlError;
use crate::model::{Animation, Classification, Geometry, Model, Node};
use crate::property;
use crate::schema::{self, NodeKind};
use crate::value;

/// Read a model from a file.
///
/// # Arguments
///
/// * `path` - Path to the ASCII `.mdl` file
///
/// # Returns
///
/// The parsed model, or an error with no partial model.
pub fn read_mdl(path: impl AsRef<Path>) -> Result<Model, MdlError> {
    let data = std::fs::read(path)?;
    read_mdl_from_str(&String::from_utf8_lossy(&data))
}

/// Read a model from raw file text.
pub fn read_mdl_from_str(text: &str) -> Result<Model, MdlError> {
    let mut cursor = LineCursor::from_text(text);
    parse_model(&mut cursor)
}

fn parse_model(cursor: &mut LineCursor) -> Result<Model, MdlError> {
    let mut model = Model::new("");
    while let Some(line) = cursor.next_line() {
        let Some(first) = line.first() else { continue };
        match first.to_ascii_lowercase().as_str() {
            "newmodel" => {
                if let Some(name) = line.get(1) {
                    model.name = name.to_owned();
                    model.geometry.name = name.to_owned();
                }
            }
            // the value is the second argument; the first repeats the
            // model name
            "setsupermodel" => {
                if let Some(supermodel) = line.get(2) {
                    model.supermodel = supermodel.to_owned();
                }
            }
            "classification" => {
                if let Some(token) = line.get(1) {
                    model.classification = Classification::parse(token).ok_or_else(|| {
                        MdlError::invalid_value(
                            Some(line.number),
                            "classification",
                            token,
                            "character, tile, effects, item",
                        )
                    })?;
                }
            }
            "setanimationscale" => {
                if let Some(scale) = line.get(1).and_then(value::parse_float) {
                    model.animationscale = Some(scale);
                }
            }
            "beginmodelgeom" => {
                if let Some(name) = line.get(1) {
                    model.geometry.name = name.to_owned();
                }
                parse_geometry(&mut model.geometry, cursor)?;
            }
            "newanim" => {
                let Some(name) = line.get(1) else { continue };
                let model_name = line.get(2).unwrap_or(model.name.as_str());
                let mut animation = Animation::new(name, model_name);
                parse_animation(&mut animation, cursor)?;
                model.animations.push(animation);
            }
            "donemodel" => break,
            // forward compatibility: unknown keywords are ignored
            _ => {}
        }
    }
    Ok(model)
}

fn parse_geometry(geometry: &mut Geometry, cursor: &mut LineCursor) -> Result<(), MdlError> {
    while let Some(line) = cursor.next_line() {
        let Some(first) = line.first() else { continue };
        if first.eq_ignore_ascii_case("endmodelgeom") {
            break;
        }
        if first.eq_ignore_ascii_case("node") {
            if let Some(node) = parse_node(&line, cursor, false)? {
                geometry.nodes.push(node);
            }
        }
    }
    Ok(())
}

fn parse_animation(animation: &mut Animation, cursor: &mut LineCursor) -> Result<(), MdlError> {
    while let Some(line) = cursor.next_line() {
        let Some(first) = line.first() else { continue };
        match first.to_ascii_lowercase().as_str() {
            "doneanim" => break,
            "length" => {
                if let Some(length) = line.get(1).and_then(value::parse_float) {
                    animation.length = length;
                }
            }
            "transtime" => {
                if let Some(transtime) = line.get(1).and_then(value::parse_float) {
                    animation.transtime = transtime;
                }
            }
            "animroot" => {
                if let Some(animroot) = line.get(1) {
                    animation.animroot = animroot.to_owned();
                }
            }
            "event" => {
                if let (Some(time), Some(tag)) =
                    (line.get(1).and_then(value::parse_float), line.get(2))
                {
                    animation.events.push((time, tag.to_owned()));
                }
            }
            "node" => {
                if let Some(node) = parse_node(&line, cursor, true)? {
                    animation.nodes.push(node);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Parse one `node … endnode` block.
///
/// Returns `Ok(None)` for unregistered node kinds: the body is skipped up
/// to its `endnode` so newer node kinds pass through harmlessly.
fn parse_node(
    header: &TokenLine,
    cursor: &mut LineCursor,
    animation: bool,
) -> Result<Option<Node>, MdlError> {
    let kind = header.get(1).and_then(|token| {
        if animation {
            NodeKind::animation_kind(token)
        } else {
            NodeKind::geometry_kind(token)
        }
    });
    let Some(kind) = kind else {
        skip_node(cursor);
        return Ok(None);
    };
    let mut node = Node::new(kind, header.get(2).unwrap_or_default());

    while let Some(line) = cursor.next_line() {
        let Some(first) = line.first() else { continue };
        if first.eq_ignore_ascii_case("endnode") {
            break;
        }
        // early exporters misspelled this property; keep reading the old form
        let name = if first.eq_ignore_ascii_case("setfillumcolor") {
            "selfillumcolor"
        } else {
            first
        };
        // unknown property names are ignored, not errors
        let Some(desc) = schema::find_property(kind, name) else {
            continue;
        };
        if let Some(value) = property::read_value(desc, &line, cursor)? {
            node.set_raw(desc.name, value);
        }
    }
    Ok(Some(node))
}

fn skip_node(cursor: &mut LineCursor) {
    while let Some(line) = cursor.next_line() {
        if line
            .first()
            .is_some_and(|t| t.eq_ignore_ascii_case("endnode"))
        {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    const MINIMAL: &str = "newmodel test\n\
                           setsupermodel test NULL\n\
                           classification character\n\
                           beginmodelgeom test\n\
                           node dummy test\n\
                           parent NULL\n\
                           endnode\n\
                           endmodelgeom test\n\
                           donemodel test\n";

    #[test]
    fn test_minimal_model() {
        let model = read_mdl_from_str(MINIMAL).unwrap();
        assert_eq!(model.name, "test");
        assert_eq!(model.supermodel, "NULL");
        assert_eq!(model.classification, Classification::Character);
        assert_eq!(model.animationscale, None);
        assert!(model.animations.is_empty());
        assert_eq!(model.geometry.nodes.len(), 1);
        let node = &model.geometry.nodes[0];
        assert_eq!(node.kind, NodeKind::Dummy);
        assert_eq!(node.name, "test");
        assert_eq!(node.parent(), Some("NULL"));
    }

    #[test]
    fn test_mesh_node_with_matrices() {
        let text = "newmodel box\n\
                    beginmodelgeom box\n\
                    node trimesh cube\n\
                    parent box\n\
                    bitmap crate01\n\
                    verts 3\n\
                    0 0 0\n\
                    1 0 0\n\
                    1 1 0\n\
                    faces 1\n\
                    0 1 2 1 0 1 2 1\n\
                    endnode\n\
                    endmodelgeom box\n\
                    donemodel box\n";
        let model = read_mdl_from_str(text).unwrap();
        let node = model.geometry.node("cube").unwrap();
        assert_eq!(
            node.get("verts").and_then(Value::as_float_matrix).map(|m| m.len()),
            Some(3)
        );
        assert_eq!(
            node.get("faces"),
            Some(&Value::IntMatrix(vec![vec![0, 1, 2, 1, 0, 1, 2, 1]]))
        );
        assert_eq!(node.get("bitmap").and_then(Value::as_str), Some("crate01"));
    }

    #[test]
    fn test_unknown_property_line_is_ignored() {
        let text = "newmodel m\n\
                    beginmodelgeom m\n\
                    node dummy base\n\
                    parent NULL\n\
                    frobnicate 12 13\n\
                    position 1 2 3\n\
                    endnode\n\
                    endmodelgeom m\n\
                    donemodel m\n";
        let model = read_mdl_from_str(text).unwrap();
        let node = model.geometry.node("base").unwrap();
        assert_eq!(node.parent(), Some("NULL"));
        assert_eq!(
            node.get("position"),
            Some(&Value::FloatVector(vec![1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn test_unknown_node_kind_is_skipped() {
        let text = "newmodel m\n\
                    beginmodelgeom m\n\
                    node gizmo widget\n\
                    whatever 1 2 3\n\
                    endnode\n\
                    node dummy base\n\
                    parent NULL\n\
                    endnode\n\
                    endmodelgeom m\n\
                    donemodel m\n";
        let model = read_mdl_from_str(text).unwrap();
        assert_eq!(model.geometry.nodes.len(), 1);
        assert_eq!(model.geometry.nodes[0].name, "base");
    }

    #[test]
    fn test_misspelled_selfillumcolor_is_corrected() {
        let text = "newmodel m\n\
                    beginmodelgeom m\n\
                    node trimesh mesh\n\
                    setfillumcolor 1 0 0\n\
                    endnode\n\
                    endmodelgeom m\n\
                    donemodel m\n";
        let model = read_mdl_from_str(text).unwrap();
        let node = model.geometry.node("mesh").unwrap();
        assert_eq!(
            node.get("selfillumcolor"),
            Some(&Value::FloatVector(vec![1.0, 0.0, 0.0]))
        );
        assert!(node.get("setfillumcolor").is_none());
    }

    #[test]
    fn test_animation_block() {
        let text = "newmodel m\n\
                    classification character\n\
                    beginmodelgeom m\n\
                    node dummy rootdummy\n\
                    parent NULL\n\
                    endnode\n\
                    endmodelgeom m\n\
                    newanim walk m\n\
                    length 2.5\n\
                    transtime 0.25\n\
                    animroot rootdummy\n\
                    event 0.1 snd_footstep\n\
                    event 0.1 cast\n\
                    event 0.6 snd_footstep\n\
                    node dummy rootdummy\n\
                    parent NULL\n\
                    positionkey 2\n\
                    0 0 0 0\n\
                    1.5 0 0 1\n\
                    endnode\n\
                    doneanim walk m\n\
                    donemodel m\n";
        let model = read_mdl_from_str(text).unwrap();
        let anim = model.animation("walk").unwrap();
        assert_eq!(anim.model_name, "m");
        assert_eq!(anim.length, 2.5);
        assert_eq!(anim.transtime, 0.25);
        assert_eq!(anim.animroot, "rootdummy");
        // duplicate times are legal and order is preserved
        assert_eq!(
            anim.events,
            vec![
                (0.1, "snd_footstep".to_owned()),
                (0.1, "cast".to_owned()),
                (0.6, "snd_footstep".to_owned()),
            ]
        );
        let node = anim.node("rootdummy").unwrap();
        assert_eq!(node.kind, NodeKind::AnimDummy);
        assert_eq!(
            node.get("positionkey"),
            Some(&Value::FloatMatrix(vec![
                vec![0.0, 0.0, 0.0, 0.0],
                vec![1.5, 0.0, 0.0, 1.0],
            ]))
        );
    }

    #[test]
    fn test_invalid_classification_is_fatal() {
        let text = "newmodel m\nclassification scenery\ndonemodel m\n";
        let result = read_mdl_from_str(text);
        assert!(matches!(result, Err(MdlError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_enum_value_is_fatal() {
        let text = "newmodel m\n\
                    beginmodelgeom m\n\
                    node emitter sparks\n\
                    blend darken\n\
                    endnode\n\
                    endmodelgeom m\n\
                    donemodel m\n";
        let result = read_mdl_from_str(text);
        assert!(matches!(result, Err(MdlError::InvalidValue { .. })));
    }

    #[test]
    fn test_content_after_donemodel_is_ignored() {
        let text = format!("{MINIMAL}node dummy stray\nendnode\n");
        let model = read_mdl_from_str(&text).unwrap();
        assert_eq!(model.geometry.nodes.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_mdl("/nonexistent/path/model.mdl");
        assert!(matches!(result, Err(MdlError::Io(_))));
    }

    #[test]
    fn test_walkmesh_node() {
        let text = "newmodel m\n\
                    classification tile\n\
                    beginmodelgeom m\n\
                    node aabb walkmesh\n\
                    parent m\n\
                    aabb -1 -1 -1 1 1 1 -1\n\
                    -1 -1 -1 0 1 1 0\n\
                    0 -1 -1 1 1 1 1\n\
                    endnode\n\
                    endmodelgeom m\n\
                    donemodel m\n";
        let model = read_mdl_from_str(text).unwrap();
        assert_eq!(model.classification, Classification::Tile);
        let node = model.geometry.node("walkmesh").unwrap();
        let tree = node.get("aabb").and_then(Value::as_aabb).unwrap();
        assert_eq!(tree.face, -1);
        assert_eq!(tree.left.as_ref().unwrap().face, 0);
        assert_eq!(tree.right.as_ref().unwrap().face, 1);
        // the endnode after the tree was still honored
        assert_eq!(node.parent(), Some("m"));
    }
}
