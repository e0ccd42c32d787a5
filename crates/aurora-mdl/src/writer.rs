//! MDL writer: serializes a [`Model`] back to the ASCII layout.
//!
//! Fields come out in canonical order regardless of how the source file
//! ordered them, so a rewritten file is field-for-field equivalent to its
//! source, not byte-for-byte.

use std::path::Path;

use crate::error::MdlError;
use crate::model::{Animation, Geometry, Model, Node};
use crate::property::{self, INDENT};
use crate::value::fmt_g9;

/// Serialize a model to a file.
///
/// The text is built in memory and renamed into place only on success, so a
/// failed export never leaves a truncated file at `path`.
pub fn write_mdl(model: &Model, path: impl AsRef<Path>) -> Result<(), MdlError> {
    let path = path.as_ref();
    let text = write_mdl_to_string(model);
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    std::fs::write(&tmp, text)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Serialize a model to a string.
pub fn write_mdl_to_string(model: &Model) -> String {
    let mut out = Vec::new();
    out.push(format!("newmodel {}", model.name));
    out.push(format!("setsupermodel {} {}", model.name, model.supermodel));
    out.push(format!("classification {}", model.classification.token()));
    if let Some(scale) = model.animationscale {
        out.push(format!("setanimationscale {}", fmt_g9(scale)));
    }
    write_geometry(&model.geometry, &mut out);
    for animation in &model.animations {
        write_animation(animation, &mut out);
    }
    out.push(format!("donemodel {}", model.name));
    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn write_geometry(geometry: &Geometry, out: &mut Vec<String>) {
    out.push(format!("beginmodelgeom {}", geometry.name));
    for node in &geometry.nodes {
        write_node(node, out);
    }
    out.push(format!("endmodelgeom {}", geometry.name));
}

fn write_node(node: &Node, out: &mut Vec<String>) {
    out.push(format!("node {} {}", node.kind.token(), node.name));
    for (desc, value) in node.set_properties() {
        property::write_value(desc, value, out);
    }
    out.push("endnode".to_owned());
}

fn write_animation(animation: &Animation, out: &mut Vec<String>) {
    out.push(format!("newanim {} {}", animation.name, animation.model_name));
    out.push(format!("{INDENT}length {}", fmt_g9(animation.length)));
    out.push(format!("{INDENT}transtime {}", fmt_g9(animation.transtime)));
    out.push(format!("{INDENT}animroot {}", animation.animroot));
    for (time, tag) in &animation.events {
        out.push(format!("{INDENT}event {} {}", fmt_g9(*time), tag));
    }
    for node in &animation.nodes {
        write_node(node, out);
    }
    out.push(format!(
        "doneanim {} {}",
        animation.name, animation.model_name
    ));
}
