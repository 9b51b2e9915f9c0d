//! Export extraction from component source files.
//!
//! Component modules in the catalog directory are TSX/JSX files. Their export
//! tables are recovered with regex patterns, which is enough for the export
//! shapes component authors actually write. Each extracted export renders as
//! a mount element that the client bundle hydrates.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::exports::{Component, ExportValue, ModuleExports};
use crate::paths::asset_path;
use crate::slug::Slug;
use crate::traits::LoadError;

// Regex patterns for extraction
static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+default\s+(.*)$").expect("Invalid default export regex")
});

static DEFAULT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // function Name( / async function Name( / class Name / Name;
    Regex::new(r"^(?:(?:async\s+)?function\s*\*?\s*|(?:abstract\s+)?class\s+)?([A-Za-z_$][\w$]*)")
        .expect("Invalid default name regex")
});

static NAMED_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)")
        .expect("Invalid named function regex")
});

static NAMED_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)")
        .expect("Invalid named class regex")
});

static NAMED_BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=\n]+)?=\s*(.*)$")
        .expect("Invalid named binding regex")
});

static EXPORT_LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s*\{([^}]*)\}").expect("Invalid export list regex")
});

static LOCAL_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:async\s+)?(?:function\s*\*?\s*|class\s+)([A-Za-z_$][\w$]*)")
        .expect("Invalid local function regex")
});

static LOCAL_BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=\n]+)?=\s*(.*)$")
        .expect("Invalid local binding regex")
});

static FUNCTION_INIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Arrow functions, function expressions and the React wrappers that
    // return components.
    Regex::new(
        r"^(?:async\s+)?(?:function\b|\(|<|[A-Za-z_$][\w$]*\s*=>|(?:React\.)?(?:forwardRef|memo|lazy)\s*[(<])",
    )
    .expect("Invalid function initializer regex")
});

/// Read a component source file and extract its export table.
///
/// The file is read on every call; nothing is cached between loads.
pub fn load_source_module(slug: &Slug, path: &Path) -> Result<ModuleExports, LoadError> {
    let source = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    Ok(parse_exports(slug, &source))
}

/// A named export found in the source, before it becomes an [`ExportValue`].
struct FoundExport {
    offset: usize,
    name: String,
    is_function: bool,
    initializer: Option<String>,
}

/// Extract the export table of a component module from its source.
pub fn parse_exports(slug: &Slug, source: &str) -> ModuleExports {
    let mut exports = ModuleExports::new();

    if let Some(rest) = DEFAULT_RE.captures(source).and_then(|c| c.get(1)) {
        let name = DEFAULT_NAME_RE
            .captures(rest.as_str().trim())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|name| !matches!(*name, "function" | "class" | "async" | "extends"))
            .unwrap_or("default");
        exports.set_default(mount(slug, name));
    }

    let mut found: Vec<FoundExport> = Vec::new();

    for re in [&*NAMED_FN_RE, &*NAMED_CLASS_RE] {
        for m in re.captures_iter(source).filter_map(|c| c.get(1)) {
            found.push(FoundExport {
                offset: m.start(),
                name: m.as_str().to_string(),
                is_function: true,
                initializer: None,
            });
        }
    }

    for cap in NAMED_BINDING_RE.captures_iter(source) {
        let Some(m) = cap.get(1) else { continue };
        let init = cap.get(2).map(|i| i.as_str().trim()).unwrap_or("");
        found.push(FoundExport {
            offset: m.start(),
            name: m.as_str().to_string(),
            is_function: FUNCTION_INIT_RE.is_match(init),
            initializer: Some(init.to_string()),
        });
    }

    let local_functions = local_functions(source);

    for list in EXPORT_LIST_RE.captures_iter(source).filter_map(|c| c.get(1)) {
        for (index, item) in list.as_str().split(',').enumerate() {
            let item = item.trim();
            if item.is_empty() || item.starts_with("type ") {
                continue;
            }

            let (local, exported) = match item.split_once(" as ") {
                Some((local, exported)) => (local.trim(), exported.trim()),
                None => (item, item),
            };

            if exported == "default" {
                exports.set_default(mount(slug, local));
                continue;
            }

            found.push(FoundExport {
                offset: list.start() + index,
                name: exported.to_string(),
                is_function: local_functions.contains(local),
                initializer: None,
            });
        }
    }

    found.sort_by_key(|export| export.offset);

    for export in found {
        let value = if !export.is_function {
            ExportValue::data(export.initializer.unwrap_or_default())
        } else if starts_lowercase(&export.name) {
            // Hooks and helpers are never mounted as components.
            ExportValue::helper(mount(slug, &export.name))
        } else {
            ExportValue::component(mount(slug, &export.name))
        };
        exports.insert(export.name, value);
    }

    exports
}

/// Names of locally declared functions, classes and function-valued bindings.
fn local_functions(source: &str) -> HashSet<&str> {
    let mut names: HashSet<&str> = LOCAL_FN_RE
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    for cap in LOCAL_BINDING_RE.captures_iter(source) {
        let init = cap.get(2).map(|i| i.as_str().trim()).unwrap_or("");
        if FUNCTION_INIT_RE.is_match(init) {
            if let Some(name) = cap.get(1) {
                names.insert(name.as_str());
            }
        }
    }

    names
}

fn starts_lowercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_lowercase())
}

/// Component that renders the client mount point for an export.
fn mount(slug: &Slug, export: &str) -> Component {
    let slug = slug.clone();
    let export_name = export.to_string();

    Component::new(export, move |ctx| {
        let bundle = asset_path(&ctx.base_path, &format!("/components/{}.js", slug));
        format!(
            r#"<div class="component-root" data-component="{}" data-export="{}" data-bundle="{}"></div>"#,
            html_escape(slug.as_str()),
            html_escape(&export_name),
            html_escape(&bundle)
        )
    })
}

/// Escape HTML special characters for attribute values.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RenderContext;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn slug() -> Slug {
        Slug::new("agent-card")
    }

    #[test]
    fn extracts_named_default_function() {
        let source = r#"
"use client"

import { AgentCard } from "@/components/agents-ui/agent-card"

export default function AgentCardBasic() {
  return <AgentCard name="Research Assistant" />
}
"#;

        let exports = parse_exports(&slug(), source);

        assert_eq!(exports.default_export().unwrap().name(), "AgentCardBasic");
        assert!(exports.names().is_empty());
    }

    #[test]
    fn extracts_anonymous_default() {
        let exports = parse_exports(&slug(), "export default function() { return null }");
        assert_eq!(exports.default_export().unwrap().name(), "default");

        let exports = parse_exports(&slug(), "export default () => <div />");
        assert_eq!(exports.default_export().unwrap().name(), "default");
    }

    #[test]
    fn extracts_identifier_default() {
        let source = "const Card = () => <div />\nexport default Card\n";
        let exports = parse_exports(&slug(), source);
        assert_eq!(exports.default_export().unwrap().name(), "Card");
    }

    #[test]
    fn extracts_named_exports_in_order() {
        let source = r#"
export const VERSION = "1.2.0"

export function useAgentState() {
  return null
}

export type AgentCardProps = { name: string }

export const AgentCard = ({ name }: AgentCardProps) => {
  return <div>{name}</div>
}

export class AgentErrorBoundary extends React.Component {}
"#;

        let exports = parse_exports(&slug(), source);

        assert!(exports.default_export().is_none());
        assert_eq!(
            exports.names(),
            vec!["VERSION", "useAgentState", "AgentCard", "AgentErrorBoundary"]
        );
        assert!(matches!(exports.get("VERSION"), Some(ExportValue::Data(_))));
        assert!(!exports.get("useAgentState").unwrap().is_component_like());
        assert!(exports.get("useAgentState").unwrap().as_function().is_some());
        assert!(exports.get("AgentCard").unwrap().is_component_like());
        assert!(exports.get("AgentErrorBoundary").unwrap().is_component_like());
    }

    #[test]
    fn recognizes_react_wrappers() {
        let source = r#"
export const Composer = React.forwardRef<HTMLDivElement, Props>((props, ref) => null)
export const Memoized = memo(Inner)
export const Typed: React.FC<Props> = (props) => null
export const options = { compact: true }
"#;

        let exports = parse_exports(&slug(), source);

        assert!(exports.get("Composer").unwrap().is_component_like());
        assert!(exports.get("Memoized").unwrap().is_component_like());
        assert!(exports.get("Typed").unwrap().is_component_like());
        assert!(matches!(exports.get("options"), Some(ExportValue::Data(_))));
    }

    #[test]
    fn follows_export_lists() {
        let source = r#"
function Panel() { return null }
const limits = { max: 3 }
const StatusBadge = () => null

export { limits, Panel as AgentStatusPanel, StatusBadge }
export type { PanelProps }
"#;

        let exports = parse_exports(&slug(), source);

        assert_eq!(exports.names(), vec!["limits", "AgentStatusPanel", "StatusBadge"]);
        assert!(matches!(exports.get("limits"), Some(ExportValue::Data(_))));
        assert!(exports.get("AgentStatusPanel").unwrap().is_component_like());
        assert_eq!(
            exports.get("AgentStatusPanel").unwrap().as_function().unwrap().name(),
            "AgentStatusPanel"
        );
    }

    #[test]
    fn export_list_can_name_the_default() {
        let source = "function Scanner() { return null }\nexport { Scanner as default }\n";
        let exports = parse_exports(&slug(), source);
        assert_eq!(exports.default_export().unwrap().name(), "Scanner");
    }

    #[test]
    fn renders_mount_element() {
        let exports = parse_exports(&slug(), "export function AgentCard() {}");
        let component = exports.get("AgentCard").unwrap().as_function().unwrap();

        let html = component.render(&RenderContext {
            slug: slug(),
            base_path: "/agents-kit".to_string(),
        });

        assert_eq!(
            html,
            r#"<div class="component-root" data-component="agent-card" data-export="AgentCard" data-bundle="/agents-kit/components/agent-card.js"></div>"#
        );
    }

    #[test]
    fn escapes_mount_attributes() {
        let slug = Slug::from_file_name(r#"card"onload="x.tsx"#).unwrap();
        let exports = parse_exports(&slug, "export default function Card() {}");

        let html = exports.default_export().unwrap().render(&RenderContext {
            slug: slug.clone(),
            base_path: String::new(),
        });

        assert!(html.contains(r#"data-component="card&quot;onload=&quot;x""#));
        assert!(!html.contains(r#"onload="x""#));
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("ghost.tsx");

        let result = load_source_module(&Slug::new("ghost"), &path);

        assert!(matches!(result, Err(LoadError::NotFound(p)) if p == path));
    }

    #[test]
    fn loads_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("weird-widget.tsx");
        fs::write(&path, "export default function() {}\nexport const Other = () => null\n").unwrap();

        let exports = load_source_module(&Slug::new("weird-widget"), &path).unwrap();

        assert!(exports.default_export().is_some());
        assert_eq!(exports.names(), vec!["Other"]);
    }
}
