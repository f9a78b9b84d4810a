//! `generate` tables: manifest-declared `generateMetadata`.
//!
//! String values may reference route props and the parent's resolved
//! metadata with `{...}` placeholders:
//!
//! | Placeholder            | Value                            |
//! |------------------------|----------------------------------|
//! | `{params.<name>}`      | route param                      |
//! | `{search.<name>}`      | search param                     |
//! | `{parent.title}`       | parent's resolved title          |
//! | `{parent.description}` | parent's resolved description    |
//!
//! Unknown placeholders are kept verbatim. The parent is only awaited when
//! a placeholder references it.

use serde_json::Value;

use crate::accumulate::ParentMetadata;
use crate::metadata::{GeneratorFuture, Metadata, MetadataGenerator, ResolvedMetadata, RouteProps};

const PARENT_PREFIX: &str = "{parent.";

#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    template: Metadata,
    needs_parent: bool,
}

impl TemplateGenerator {
    pub fn new(template: Metadata) -> Self {
        let needs_parent = template.iter().any(|(_, value)| references_parent(value));
        Self {
            template,
            needs_parent,
        }
    }
}

impl MetadataGenerator for TemplateGenerator {
    fn generate(&self, props: RouteProps, parent: ParentMetadata) -> GeneratorFuture {
        let template = self.template.clone();
        let needs_parent = self.needs_parent;
        Box::pin(async move {
            let parent = if needs_parent {
                Some(parent.resolve().await?)
            } else {
                None
            };
            let cx = Placeholders {
                props: &props,
                parent: parent.as_deref(),
            };
            let mut generated = Metadata::new();
            for (key, value) in template.iter() {
                generated.insert(key, cx.expand(value));
            }
            anyhow::Ok(generated)
        })
    }
}

fn references_parent(value: &Value) -> bool {
    match value {
        Value::String(text) => text.contains(PARENT_PREFIX),
        Value::Array(items) => items.iter().any(references_parent),
        Value::Object(map) => map.values().any(references_parent),
        _ => false,
    }
}

struct Placeholders<'a> {
    props: &'a RouteProps,
    parent: Option<&'a ResolvedMetadata>,
}

impl Placeholders<'_> {
    fn expand(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.expand_str(text)),
            Value::Array(items) => items.iter().map(|item| self.expand(item)).collect(),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.expand(item)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn expand_str(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                rest = &rest[start..];
                break;
            };
            let key = &after[..end];
            match self.lookup(key) {
                Some(replacement) => out.push_str(replacement),
                None => {
                    out.push('{');
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        let (scope, name) = key.split_once('.')?;
        match scope {
            "params" => Some(self.props.param(name).unwrap_or_default()),
            "search" => Some(
                self.props
                    .search_params
                    .get(name)
                    .map(String::as_str)
                    .unwrap_or_default(),
            ),
            "parent" => {
                let parent = self.parent;
                let value = match name {
                    "title" => parent.and_then(ResolvedMetadata::title_text),
                    "description" => parent.and_then(|p| p.description.as_deref()),
                    _ => return None,
                };
                Some(value.unwrap_or_default())
            }
            _ => None,
        }
    }
}
