//! HCL rendering of exported resources.
//!
//! Renders records as Terraform `resource` blocks in 0.11 or 0.12 syntax.
//!
//! | Value | 0.12 | 0.11 |
//! |-------|------|------|
//! | string | `"text"` | `"text"` |
//! | bool, number | `true`, `16` | `"true"`, `"16"` |
//! | `compartment_id` | `var.compartment_ocid` | `"${var.compartment_ocid}"` |
//! | string list | `["a", "b"]` | `["a", "b"]` |
//! | map | `{ key = "v" }` | `{ "key" = "v" }` |
//! | list of maps | repeated nested blocks | repeated nested blocks |
//! | map of maps, mixed list | multi-line `{ }` / `[ ]` | multi-line `{ }` / `[ ]` |
//!
//! Null values and the computed attributes `id`, `state` and
//! `time_created` are left out, as are attributes whose names are not HCL
//! identifiers.

use std::collections::{BTreeMap, HashSet};

use tenancy_filter::{AttrValue, Record};
use tracing::warn;

use crate::args::TfVersion;

/// Attributes the provider computes; they never appear in configuration.
pub const COMPUTED_ATTRIBUTES: &[&str] = &["id", "state", "time_created"];

const COMPARTMENT_ATTRIBUTE: &str = "compartment_id";
const COMPARTMENT_VARIABLE: &str = "var.compartment_ocid";
const INDENT: &str = "  ";

/// A discovered resource ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedResource {
    /// Terraform resource type, e.g. `oci_core_vcn`.
    pub resource_type: String,
    /// Terraform resource name, unique per type.
    pub label: String,
    pub record: Record,
}

impl ExportedResource {
    /// OCID of the resource, if the record has one.
    pub fn id(&self) -> Option<&str> {
        self.record.get("id").and_then(AttrValue::as_str)
    }
}

/// Hands out resource labels that are unique per resource type.
///
/// Labels come from `display_name`, else `name`, else the resource type,
/// sanitised to `[A-Za-z0-9_]` and prefixed with `export_`. Repeats get a
/// numeric suffix: `export_web`, `export_web_1`, `export_web_2`.
#[derive(Debug, Default)]
pub struct Labeler {
    used: HashSet<(String, String)>,
}

impl Labeler {
    pub fn new() -> Self {
        Labeler::default()
    }

    pub fn label(&mut self, resource_type: &str, record: &Record) -> String {
        let source = ["display_name", "name"]
            .iter()
            .find_map(|key| record.get(*key).and_then(AttrValue::as_str))
            .filter(|name| !name.is_empty())
            .unwrap_or(resource_type);
        let base = format!("export_{}", sanitize(source));

        let mut label = base.clone();
        let mut suffix = 1;
        while self.used.contains(&(resource_type.to_string(), label.clone())) {
            label = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert((resource_type.to_string(), label.clone()));
        label
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// A list rendered as repeated nested blocks: non-empty and made of maps
/// only.
fn is_block_list(items: &[AttrValue]) -> bool {
    let mut items = items.iter().filter(|item| !item.is_null()).peekable();
    items.peek().is_some() && items.all(|item| matches!(item, AttrValue::Map(_)))
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Quotes and escapes a string literal.
pub fn quote(s: &str, version: TfVersion) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => out.push_str("$$"),
            '%' if version == TfVersion::V0_12 && chars.peek() == Some(&'{') => {
                out.push_str("%%")
            }
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

struct Renderer {
    version: TfVersion,
    out: String,
}

impl Renderer {
    fn new(version: TfVersion) -> Self {
        Renderer {
            version,
            out: String::new(),
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn scalar(&self, bare: String) -> String {
        match self.version {
            TfVersion::V0_12 => bare,
            TfVersion::V0_11 => format!("\"{bare}\""),
        }
    }

    fn map_key(&self, key: &str) -> String {
        match self.version {
            TfVersion::V0_12 if is_identifier(key) => key.to_string(),
            _ => quote(key, self.version),
        }
    }

    /// Renders a value that fits on one line, or `None` for maps and
    /// lists of maps.
    fn inline(&self, value: &AttrValue) -> Option<String> {
        match value {
            AttrValue::String(s) => Some(quote(s, self.version)),
            AttrValue::Bool(b) => Some(self.scalar(b.to_string())),
            AttrValue::Int(n) => Some(self.scalar(n.to_string())),
            AttrValue::Float(f) => Some(self.scalar(f.to_string())),
            AttrValue::StringList(items) => Some(format!(
                "[{}]",
                items
                    .iter()
                    .map(|s| quote(s, self.version))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            AttrValue::List(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| self.inline(item))
                .collect::<Option<Vec<_>>>()
                .map(|items| format!("[{}]", items.join(", "))),
            AttrValue::Map(map) if map.is_empty() => Some("{}".to_string()),
            AttrValue::Map(_) | AttrValue::Null => None,
        }
    }

    fn attributes<'r>(
        &mut self,
        depth: usize,
        entries: impl Iterator<Item = (&'r String, &'r AttrValue)>,
    ) {
        for (key, value) in entries {
            if value.is_null() {
                continue;
            }
            if !is_identifier(key) {
                warn!(attribute = %key, "skipping attribute that is not a valid HCL identifier");
                continue;
            }
            match value {
                AttrValue::List(items) if is_block_list(items) => {
                    for item in items {
                        if let AttrValue::Map(block) = item {
                            self.block(depth, key, block);
                        }
                    }
                }
                _ => self.assign(depth, key, value),
            }
        }
    }

    /// Writes `key = value`, spreading maps and lists of maps over several
    /// lines.
    fn assign(&mut self, depth: usize, key: &str, value: &AttrValue) {
        if let Some(text) = self.inline(value) {
            self.line(depth, &format!("{key} = {text}"));
            return;
        }
        match value {
            AttrValue::Map(map) => {
                self.line(depth, &format!("{key} = {{"));
                self.map_entries(depth + 1, map);
                self.line(depth, "}");
            }
            AttrValue::List(items) => {
                self.line(depth, &format!("{key} = ["));
                self.list_items(depth + 1, items);
                self.line(depth, "]");
            }
            _ => {}
        }
    }

    fn map_entries(&mut self, depth: usize, map: &BTreeMap<String, AttrValue>) {
        for (entry, value) in map {
            if value.is_null() {
                continue;
            }
            let entry = self.map_key(entry);
            self.assign(depth, &entry, value);
        }
    }

    fn list_items(&mut self, depth: usize, items: &[AttrValue]) {
        for item in items.iter().filter(|item| !item.is_null()) {
            if let Some(text) = self.inline(item) {
                self.line(depth, &format!("{text},"));
                continue;
            }
            match item {
                AttrValue::Map(map) => {
                    self.line(depth, "{");
                    self.map_entries(depth + 1, map);
                    self.line(depth, "},");
                }
                AttrValue::List(inner) => {
                    self.line(depth, "[");
                    self.list_items(depth + 1, inner);
                    self.line(depth, "],");
                }
                _ => {}
            }
        }
    }

    fn block(&mut self, depth: usize, name: &str, body: &BTreeMap<String, AttrValue>) {
        self.line(depth, &format!("{name} {{"));
        self.attributes(depth + 1, body.iter());
        self.line(depth, "}");
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Renders one resource block.
pub fn render_resource(resource: &ExportedResource, version: TfVersion) -> String {
    let mut renderer = Renderer::new(version);
    renderer.line(
        0,
        &format!(
            "resource {} {} {{",
            quote(&resource.resource_type, version),
            quote(&resource.label, version)
        ),
    );

    if resource.record.contains_key(COMPARTMENT_ATTRIBUTE) {
        let reference = match version {
            TfVersion::V0_12 => COMPARTMENT_VARIABLE.to_string(),
            TfVersion::V0_11 => format!("\"${{{COMPARTMENT_VARIABLE}}}\""),
        };
        renderer.line(1, &format!("{COMPARTMENT_ATTRIBUTE} = {reference}"));
    }

    let entries = resource.record.iter().filter(|(key, _)| {
        key.as_str() != COMPARTMENT_ATTRIBUTE && !COMPUTED_ATTRIBUTES.contains(&key.as_str())
    });
    renderer.attributes(1, entries);
    renderer.line(0, "}");
    renderer.finish()
}

/// Renders the resource blocks of one service file.
pub fn render_service_file(resources: &[ExportedResource], version: TfVersion) -> String {
    let mut out = String::from("## This configuration was generated by tenancy-export\n");
    for resource in resources {
        out.push('\n');
        if let Some(id) = resource.id() {
            out.push_str(&format!("## {id}\n"));
        }
        out.push_str(&render_resource(resource, version));
    }
    out
}

/// Renders `vars.tf`: the exported compartment and the provider region.
pub fn render_vars(compartment_id: &str, version: TfVersion) -> String {
    let mut renderer = Renderer::new(version);
    renderer.line(0, "variable \"region\" {}");
    renderer.line(0, "");
    renderer.line(0, "variable \"compartment_ocid\" {");
    renderer.line(1, &format!("default = {}", quote(compartment_id, version)));
    renderer.line(0, "}");
    renderer.finish()
}

/// Renders `provider.tf`.
pub fn render_provider(version: TfVersion) -> String {
    let region = match version {
        TfVersion::V0_12 => "var.region".to_string(),
        TfVersion::V0_11 => "\"${var.region}\"".to_string(),
    };
    let mut renderer = Renderer::new(version);
    renderer.line(0, "provider \"oci\" {");
    renderer.line(1, &format!("region = {region}"));
    renderer.line(0, "}");
    renderer.finish()
}
