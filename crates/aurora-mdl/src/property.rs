//! Token codecs for each property kind.
//!
//! Reading takes the declaration line plus the shared cursor (matrix-shaped
//! kinds pull additional lines); writing produces exactly the lines the
//! property occupies. The two directions are symmetric, so a parsed model
//! re-exports with the layout the reference exporter produces.

use crate::aabb;
use crate::cursor::{LineCursor, TokenLine};
use crate::error::MdlError;
use crate::schema::{EnumPair, PropertyDescriptor, PropertyKind};
use crate::value::{self, fmt_g9, Element, Value};

/// One indentation unit. Nested rows sit at unit × nesting depth.
pub(crate) const INDENT: &str = "  ";

/// Read one property value.
///
/// `line` is the declaration line whose first token is the property name;
/// the cursor is left at the first unconsumed line. Returns `Ok(None)` for
/// locally recoverable malformed lines (missing or unparseable fields, a
/// matrix cut short by end of file): the slot stays unset and the
/// surrounding parse continues. Enum mismatches and malformed bounding-box
/// trees are fatal.
pub(crate) fn read_value(
    desc: &PropertyDescriptor,
    line: &TokenLine,
    cursor: &mut LineCursor,
) -> Result<Option<Value>, MdlError> {
    match desc.kind {
        PropertyKind::Scalar(element) => Ok(read_scalar(element, line)),
        PropertyKind::Vector(element) => Ok(read_vector(element, line)),
        PropertyKind::Matrix(element) => Ok(read_matrix(element, line, cursor)),
        PropertyKind::Enum(pairs) => read_enum(desc.name, pairs, line),
        PropertyKind::AabbTree => aabb::read_tree(line, cursor).map(Value::Aabb).map(Some),
    }
}

fn read_scalar(element: Element, line: &TokenLine) -> Option<Value> {
    let token = line.get(1)?;
    match element {
        Element::String => Some(Value::String(token.to_owned())),
        Element::Int => value::parse_int(token).map(Value::Int),
        Element::Float => value::parse_float(token).map(Value::Float),
        Element::Bool => value::parse_bool(token).map(Value::Bool),
    }
}

fn read_vector(element: Element, line: &TokenLine) -> Option<Value> {
    if line.len() < 2 {
        return None;
    }
    match element {
        // every vector property in the schema is a numeric row; integer
        // elements ride through the float path and format back without
        // decimals
        Element::Float | Element::Int | Element::Bool => line.tokens[1..]
            .iter()
            .map(|token| value::parse_float(token))
            .collect::<Option<Vec<f64>>>()
            .map(Value::FloatVector),
        Element::String => None,
    }
}

fn read_matrix(element: Element, line: &TokenLine, cursor: &mut LineCursor) -> Option<Value> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    if line.len() < 2 {
        // no row count given: rows run until an `endlist` sentinel, which
        // is consumed but not stored
        loop {
            let next = cursor.next_line()?;
            if next.is_empty() {
                continue;
            }
            if next.first().is_some_and(|t| t.eq_ignore_ascii_case("endlist")) {
                break;
            }
            rows.push(next.tokens);
        }
    } else {
        // the row count is the last token on the declaration line
        let mut remaining = value::parse_int(line.tokens.last()?)?.max(0);
        while remaining > 0 {
            let next = cursor.next_line()?;
            if next.is_empty() {
                continue;
            }
            rows.push(next.tokens);
            remaining -= 1;
        }
    }
    match element {
        Element::Float | Element::Bool => rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|token| value::parse_float(token))
                    .collect::<Option<Vec<f64>>>()
            })
            .collect::<Option<Vec<_>>>()
            .map(Value::FloatMatrix),
        Element::Int => rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|token| value::parse_int(token))
                    .collect::<Option<Vec<i64>>>()
            })
            .collect::<Option<Vec<_>>>()
            .map(Value::IntMatrix),
        Element::String => Some(Value::StringMatrix(rows)),
    }
}

fn read_enum(
    property: &str,
    pairs: &'static [EnumPair],
    line: &TokenLine,
) -> Result<Option<Value>, MdlError> {
    let Some(token) = line.get(1) else {
        return Ok(None);
    };
    let pair = resolve_enum(pairs, token).ok_or_else(|| {
        MdlError::invalid_value(Some(line.number), property, token, accepted_tokens(pairs))
    })?;
    Ok(Some(Value::Enum(pair.name.to_owned())))
}

/// Match a token against either side of an enum map, case-insensitively.
pub(crate) fn resolve_enum(pairs: &'static [EnumPair], token: &str) -> Option<&'static EnumPair> {
    pairs
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(token) || p.token.eq_ignore_ascii_case(token))
}

/// Comma-joined file tokens of an enum map, for error messages.
pub(crate) fn accepted_tokens(pairs: &[EnumPair]) -> String {
    pairs
        .iter()
        .map(|p| p.token)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format one populated property as output lines.
///
/// The value's tag matches the descriptor's kind by construction; the match
/// below dispatches on the value alone.
pub(crate) fn write_value(desc: &PropertyDescriptor, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(format!("{INDENT}{} {}", desc.name, s)),
        Value::Int(v) => out.push(format!("{INDENT}{} {}", desc.name, v)),
        Value::Float(v) => out.push(format!("{INDENT}{} {}", desc.name, fmt_g9(*v))),
        Value::Bool(v) => out.push(format!("{INDENT}{} {}", desc.name, u8::from(*v))),
        Value::FloatVector(row) => {
            out.push(format!("{INDENT}{} {}", desc.name, join_floats(row)));
        }
        Value::FloatMatrix(rows) => write_rows(desc.name, rows, |row| join_floats(row), out),
        Value::IntMatrix(rows) => write_rows(desc.name, rows, |row| join_ints(row), out),
        Value::StringMatrix(rows) => write_rows(desc.name, rows, |row| row.join(" "), out),
        Value::Enum(name) => {
            // stored canonically as the name side; emit the file token
            let token: Option<&str> = match desc.kind {
                PropertyKind::Enum(pairs) => resolve_enum(pairs, name).map(|p| p.token),
                _ => None,
            };
            out.push(format!("{INDENT}{} {}", desc.name, token.unwrap_or(name)));
        }
        Value::Aabb(root) => aabb::write_tree(root, INDENT, out),
    }
}

fn write_rows<R>(name: &str, rows: &[R], join: impl Fn(&R) -> String, out: &mut Vec<String>) {
    out.push(format!("{INDENT}{name} {}", rows.len()));
    for row in rows {
        out.push(format!("{}{}", INDENT.repeat(2), join(row)));
    }
}

fn join_floats(row: &[f64]) -> String {
    row.iter().map(|v| fmt_g9(*v)).collect::<Vec<_>>().join(" ")
}

fn join_ints(row: &[i64]) -> String {
    row.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::tokenize;
    use crate::schema::{find_property, NodeKind};

    fn read(kind: NodeKind, name: &str, text: &str) -> Result<Option<Value>, MdlError> {
        let desc = find_property(kind, name).unwrap();
        let mut cursor = LineCursor::new(tokenize(text));
        let decl = cursor.next_line().unwrap();
        read_value(desc, &decl, &mut cursor)
    }

    fn write(kind: NodeKind, name: &str, value: &Value) -> Vec<String> {
        let desc = find_property(kind, name).unwrap();
        let mut out = Vec::new();
        write_value(desc, value, &mut out);
        out
    }

    #[test]
    fn test_vector_roundtrip() {
        let value = read(NodeKind::Trimesh, "ambient", "ambient 1 0.5 0")
            .unwrap()
            .unwrap();
        assert_eq!(value, Value::FloatVector(vec![1.0, 0.5, 0.0]));
        assert_eq!(
            write(NodeKind::Trimesh, "ambient", &value),
            vec!["  ambient 1 0.5 0"]
        );
    }

    #[test]
    fn test_matrix_count_prefixed() {
        let value = read(NodeKind::Trimesh, "verts", "verts 2\n   0 0 0\n   1 0 0")
            .unwrap()
            .unwrap();
        assert_eq!(
            value,
            Value::FloatMatrix(vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]])
        );
        assert_eq!(
            write(NodeKind::Trimesh, "verts", &value),
            vec!["  verts 2", "    0 0 0", "    1 0 0"]
        );
    }

    #[test]
    fn test_matrix_both_forms_parse_identically() {
        let counted = read(NodeKind::Trimesh, "verts", "verts 2\n 0 0 0\n 1 0 0").unwrap();
        let sentinel = read(NodeKind::Trimesh, "verts", "verts\n 0 0 0\n 1 0 0\nendlist").unwrap();
        assert_eq!(counted, sentinel);
    }

    #[test]
    fn test_matrix_skips_empty_lines() {
        let value = read(NodeKind::Trimesh, "verts", "verts 2\n\n 0 0 0\n\n 1 0 0").unwrap();
        assert_eq!(
            value,
            Some(Value::FloatMatrix(vec![
                vec![0.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0]
            ]))
        );
    }

    #[test]
    fn test_matrix_short_of_rows_is_unset() {
        let value = read(NodeKind::Trimesh, "verts", "verts 3\n 0 0 0").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_weights_keep_bone_names() {
        let value = read(
            NodeKind::Skin,
            "weights",
            "weights 2\n torso 0.75 neck 0.25\n neck 1.0",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            value,
            Value::StringMatrix(vec![
                vec!["torso".into(), "0.75".into(), "neck".into(), "0.25".into()],
                vec!["neck".into(), "1.0".into()],
            ])
        );
    }

    #[test]
    fn test_bool_scalar_leniency() {
        for text in ["shadow 1", "shadow 1.0"] {
            let value = read(NodeKind::Trimesh, "shadow", text).unwrap().unwrap();
            assert_eq!(value, Value::Bool(true));
        }
        let value = read(NodeKind::Trimesh, "shadow", "shadow 0.0")
            .unwrap()
            .unwrap();
        assert_eq!(value, Value::Bool(false));
        assert_eq!(
            write(NodeKind::Trimesh, "shadow", &Value::Bool(false)),
            vec!["  shadow 0"]
        );
    }

    #[test]
    fn test_int_scalar_accepts_float_syntax() {
        let value = read(NodeKind::Trimesh, "shininess", "shininess 3.0")
            .unwrap()
            .unwrap();
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn test_malformed_scalar_is_unset() {
        assert!(read(NodeKind::Trimesh, "alpha", "alpha").unwrap().is_none());
        assert!(read(NodeKind::Trimesh, "alpha", "alpha x")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_float_scalar_nine_significant_digits() {
        let value = Value::Float(1.0 / 3.0);
        assert_eq!(
            write(NodeKind::Trimesh, "alpha", &value),
            vec!["  alpha 0.333333333"]
        );
    }

    #[test]
    fn test_enum_accepts_both_sides() {
        for text in ["blend lighten", "blend Lighten"] {
            let value = read(NodeKind::Emitter, "blend", text).unwrap().unwrap();
            assert_eq!(value, Value::Enum("lighten".into()));
        }
        let value = Value::Enum("lighten".into());
        assert_eq!(
            write(NodeKind::Emitter, "blend", &value),
            vec!["  blend Lighten"]
        );
    }

    #[test]
    fn test_enum_rejects_unknown_token() {
        let result = read(NodeKind::Emitter, "blend", "blend darken");
        match result {
            Err(MdlError::InvalidValue {
                property,
                value,
                accepted,
                ..
            }) => {
                assert_eq!(property, "blend");
                assert_eq!(value, "darken");
                assert!(accepted.contains("Lighten"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}
