//! typescript declarations
//!
//! every model entity renders as a standalone `export type` declaration.
//! output is consumed by the code generator; only well-formedness matters.

use super::{
    EnumType, FieldDescriptor, FieldType, InputType, ObjectType, Primitive, RequestDescriptor,
    ScalarType, UnionType,
};

impl ScalarType {
    pub fn render(&self) -> String {
        let mut out = doc_comment(self.description.as_deref(), "");
        out.push_str(&format!(
            "export type {} = {};\n",
            self.name,
            self.primitive.as_str()
        ));
        out
    }
}

impl EnumType {
    pub fn render(&self) -> String {
        let mut out = doc_comment(self.description.as_deref(), "");
        let body = if self.values.is_empty() {
            "never".to_string()
        } else {
            self.values
                .iter()
                .map(|value| format!("\"{value}\""))
                .collect::<Vec<_>>()
                .join(" | ")
        };
        out.push_str(&format!("export type {} = {};\n", self.name, body));
        out
    }
}

impl ObjectType {
    pub fn render(&self) -> String {
        render_struct(&self.name, self.description.as_deref(), &self.fields)
    }
}

impl InputType {
    pub fn render(&self) -> String {
        render_struct(&self.name, self.description.as_deref(), &self.fields)
    }
}

impl UnionType {
    pub fn render(&self) -> String {
        let mut out = doc_comment(self.description.as_deref(), "");
        let body = if self.members.is_empty() {
            "never".to_string()
        } else {
            self.members.join(" | ")
        };
        out.push_str(&format!("export type {} = {};\n", self.name, body));
        out
    }
}

impl RequestDescriptor {
    /// the synthesized argument type for this request
    pub fn render(&self) -> String {
        render_struct(&self.input_type, self.description.as_deref(), &self.arguments)
    }
}

impl FieldDescriptor {
    /// typescript type of the field value, without nullability
    pub fn ts_type(&self) -> String {
        let base = match &self.kind {
            FieldType::Scalar(name) => match Primitive::for_scalar(name) {
                Primitive::Any if !is_builtin(name) => name.clone(),
                primitive => primitive.as_str().to_string(),
            },
            FieldType::Unresolved(_) => "any".to_string(),
            other => other.name().to_string(),
        };
        if self.is_list {
            format!("{base}[]")
        } else {
            base
        }
    }
}

fn is_builtin(name: &str) -> bool {
    super::BUILTIN_SCALARS.contains(&name)
}

fn render_struct(name: &str, description: Option<&str>, fields: &[FieldDescriptor]) -> String {
    let mut out = doc_comment(description, "");
    if fields.is_empty() {
        out.push_str(&format!("export type {name} = {{}};\n"));
        return out;
    }
    out.push_str(&format!("export type {name} = {{\n"));
    for field in fields {
        out.push_str(&doc_comment(field.description.as_deref(), "  "));
        if field.non_null {
            out.push_str(&format!("  {}: {};\n", field.name, field.ts_type()));
        } else {
            out.push_str(&format!("  {}?: {} | null;\n", field.name, field.ts_type()));
        }
    }
    out.push_str("};\n");
    out
}

fn doc_comment(description: Option<&str>, indent: &str) -> String {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return String::new();
    };
    let description = description.replace("*/", "*\\/");
    if !description.contains('\n') {
        return format!("{indent}/** {description} */\n");
    }
    let mut out = format!("{indent}/**\n");
    for line in description.lines() {
        out.push_str(&format!("{indent} * {}\n", line.trim_end()).replace(" * \n", " *\n"));
    }
    out.push_str(&format!("{indent} */\n"));
    out
}
