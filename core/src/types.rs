use avro_csv_schema::Primitive;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub name:      String,
    pub namespace: Option<String>,
    pub kind:      String,
    pub fields:    Vec<Field>,
}

/// How a field's type was written in the schema. The distinction matters on
/// the wire: union values are prefixed with a branch index, bare primitives
/// are not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDecl {
    Primitive(Primitive),
    Union(Vec<Primitive>),
}

/// The single primitive left once `null` is taken out of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldType {
    pub nullable:  bool,
    pub primitive: Primitive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:      String,
    pub decl:      TypeDecl,
    pub effective: FieldType,
}

impl Schema {
    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// `namespace.name`, or just the name when there is no namespace.
    pub fn full_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() && !self.name.contains('.') => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

impl TypeDecl {
    /// The declared type names, in order.
    pub fn type_names(&self) -> Vec<&'static str> {
        match self {
            TypeDecl::Primitive(p) => vec![p.name()],
            TypeDecl::Union(branches) => branches.iter().map(|p| p.name()).collect(),
        }
    }
}
