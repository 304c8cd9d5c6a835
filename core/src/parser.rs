use crate::{
    types::{Field, FieldType, Schema, TypeDecl},
    utils::quote,
    verifier::verify_schema,
    error::ExportError,
};
use avro_csv_schema::Primitive;
use serde::Deserialize;
use serde_json::Value as Json;

#[derive(Deserialize)]
struct RawSchema {
    #[serde(rename = "type")]
    kind:      String,
    name:      String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    fields:    Vec<RawField>,
}

#[derive(Deserialize)]
struct RawField {
    name:  String,
    #[serde(rename = "type")]
    type_: Json,
}

/// Parse the JSON schema embedded in a container header into a `Schema`.
/// Field order is kept exactly as declared.
pub fn parse_schema(raw: &[u8]) -> Result<Schema, ExportError> {
    let raw: RawSchema = serde_json::from_slice(raw)?;

    if raw.kind != "record" {
        return Err(ExportError::SchemaError(format!(
            "Expected a record schema but found {}",
            quote(&raw.kind)
        )));
    }

    let mut fields = Vec::with_capacity(raw.fields.len());
    for raw_field in &raw.fields {
        let decl = parse_decl(&raw_field.name, &raw_field.type_)?;
        let effective = effective_type(&raw_field.name, &decl)?;
        fields.push(Field {
            name: raw_field.name.clone(),
            decl,
            effective,
        });
    }

    let schema = Schema {
        name:      raw.name,
        namespace: raw.namespace,
        kind:      raw.kind,
        fields,
    };
    verify_schema(&schema)?;
    Ok(schema)
}

fn parse_decl(field: &str, json: &Json) -> Result<TypeDecl, ExportError> {
    match json {
        Json::Array(items) => {
            let branches = items
                .iter()
                .map(|item| parse_branch(field, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeDecl::Union(branches))
        }
        other => Ok(TypeDecl::Primitive(parse_branch(field, other)?)),
    }
}

fn parse_branch(field: &str, json: &Json) -> Result<Primitive, ExportError> {
    match json {
        Json::String(name) => primitive_named(field, name),

        Json::Array(_) => Err(ExportError::SchemaError(format!(
            "Unions may not immediately contain other unions (field {})",
            quote(field)
        ))),

        // `{"type": "long", "logicalType": ...}` is still a long on the wire.
        Json::Object(map) => match map.get("type") {
            Some(Json::String(name)) => primitive_named(field, name),
            _ => Err(ExportError::SchemaError(format!(
                "Complex types are not supported for field {}",
                quote(field)
            ))),
        },

        other => Err(ExportError::SchemaError(format!(
            "Invalid type declaration {} for field {}",
            other,
            quote(field)
        ))),
    }
}

fn primitive_named(field: &str, name: &str) -> Result<Primitive, ExportError> {
    Primitive::from_name(name).ok_or_else(|| {
        ExportError::SchemaError(format!(
            "The type {} is not supported for field {}",
            quote(name),
            quote(field)
        ))
    })
}

fn effective_type(field: &str, decl: &TypeDecl) -> Result<FieldType, ExportError> {
    let branches = match decl {
        TypeDecl::Primitive(p) => {
            return Ok(FieldType {
                nullable:  *p == Primitive::Null,
                primitive: *p,
            })
        }
        TypeDecl::Union(branches) => branches,
    };

    if branches.is_empty() {
        return Err(ExportError::SchemaError(format!(
            "The union for field {} is empty",
            quote(field)
        )));
    }

    let non_null: Vec<Primitive> = branches
        .iter()
        .copied()
        .filter(|p| *p != Primitive::Null)
        .collect();
    let nullable = non_null.len() != branches.len();

    match non_null.as_slice() {
        [] => Ok(FieldType { nullable, primitive: Primitive::Null }),
        [primitive] => Ok(FieldType { nullable, primitive: *primitive }),
        _ => {
            let joined: String = non_null.iter().map(|p| p.name()).collect();
            Err(ExportError::SchemaError(format!(
                "The union {} for field {} has more than one non-null type",
                quote(&joined),
                quote(field)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"{
        "type": "record",
        "name": "Event",
        "namespace": "com.example",
        "fields": [
            {"name": "id", "type": ["long"]},
            {"name": "note", "type": ["null", "string"]},
            {"name": "active", "type": "boolean"},
            {"name": "score", "type": ["double", "null"]},
            {"name": "created", "type": {"type": "long", "logicalType": "timestamp-millis"}}
        ]
    }"#;

    #[test]
    fn parses_fields_in_order() {
        let schema = parse_schema(EXAMPLE.as_bytes()).expect("parse_schema failed");

        assert_eq!(schema.name, "Event");
        assert_eq!(schema.namespace.as_deref(), Some("com.example"));
        assert_eq!(schema.kind, "record");
        assert_eq!(schema.full_name(), "com.example.Event");
        assert_eq!(schema.column_names(), ["id", "note", "active", "score", "created"]);

        assert_eq!(schema.fields[0].decl, TypeDecl::Union(vec![Primitive::Long]));
        assert_eq!(schema.fields[0].effective, FieldType { nullable: false, primitive: Primitive::Long });

        assert_eq!(schema.fields[1].decl.type_names(), ["null", "string"]);
        assert_eq!(schema.fields[1].effective, FieldType { nullable: true, primitive: Primitive::String });

        assert_eq!(schema.fields[2].decl, TypeDecl::Primitive(Primitive::Boolean));
        assert!(!schema.fields[2].effective.nullable);

        assert_eq!(schema.fields[3].effective, FieldType { nullable: true, primitive: Primitive::Double });
        assert_eq!(schema.fields[4].decl, TypeDecl::Primitive(Primitive::Long));
    }

    #[test]
    fn keeps_declared_order() {
        let schema = parse_schema(
            br#"{"type":"record","name":"R","fields":[
                {"name":"c","type":"string"},
                {"name":"a","type":"string"},
                {"name":"b","type":"long"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(schema.column_names(), ["c", "a", "b"]);
        assert_eq!(schema.namespace, None);
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let err = parse_schema(
            br#"{"type":"record","name":"R","fields":[
                {"name":"b","type":"string"},
                {"name":"b","type":"long"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::SchemaError(_)));
        assert!(err.to_string().contains("\"b\" is defined twice"), "{}", err);
    }

    #[test]
    fn accepts_primitives_outside_the_projection_set() {
        let schema = parse_schema(
            br#"{"type":"record","name":"R","fields":[
                {"name":"n","type":["null","int"]},
                {"name":"only_null","type":["null"]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(schema.fields[0].effective.primitive, Primitive::Int);
        assert_eq!(schema.fields[1].effective, FieldType { nullable: true, primitive: Primitive::Null });
    }

    #[test]
    fn rejects_multi_member_unions() {
        let err = parse_schema(
            br#"{"type":"record","name":"R","fields":[{"name":"x","type":["string","null","long"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::SchemaError(_)));
        assert!(err.to_string().contains("stringlong"), "{}", err);
        assert!(err.to_string().contains("\"x\""), "{}", err);
    }

    #[test]
    fn rejects_empty_union() {
        let err = parse_schema(br#"{"type":"record","name":"R","fields":[{"name":"x","type":[]}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("is empty"), "{}", err);
    }

    #[test]
    fn rejects_complex_and_unknown_types() {
        let complex = parse_schema(
            br#"{"type":"record","name":"R","fields":[{"name":"x","type":{"type":"array","items":"long"}}]}"#,
        )
        .unwrap_err();
        assert!(complex.to_string().contains("\"array\""), "{}", complex);

        let named = parse_schema(br#"{"type":"record","name":"R","fields":[{"name":"x","type":"Other"}]}"#)
            .unwrap_err();
        assert!(named.to_string().contains("\"Other\""), "{}", named);

        let nested = parse_schema(
            br#"{"type":"record","name":"R","fields":[{"name":"x","type":["null",["long"]]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(nested, ExportError::SchemaError(_)));

        let number = parse_schema(br#"{"type":"record","name":"R","fields":[{"name":"x","type":5}]}"#)
            .unwrap_err();
        assert!(matches!(number, ExportError::SchemaError(_)));
    }

    #[test]
    fn rejects_non_records_and_bad_json() {
        let err = parse_schema(br#"{"type":"enum","name":"E","symbols":["A"]}"#).unwrap_err();
        assert!(err.to_string().contains("\"enum\""), "{}", err);

        assert!(matches!(parse_schema(b"{\"type\": \"record\""), Err(ExportError::SchemaJson(_))));
        assert!(matches!(parse_schema(b"\"long\""), Err(ExportError::SchemaJson(_))));
        assert!(matches!(
            parse_schema(br#"{"type":"record","fields":[]}"#),
            Err(ExportError::SchemaJson(_))
        ));
    }
}
