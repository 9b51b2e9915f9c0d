//! Module export tables.

use std::fmt;
use std::sync::Arc;

use crate::traits::RenderContext;

/// Render function shared by every clone of a [`Component`].
pub type RenderFn = Arc<dyn Fn(&RenderContext) -> String + Send + Sync>;

/// A renderable export.
#[derive(Clone)]
pub struct Component {
    name: String,
    render: RenderFn,
}

impl Component {
    /// Create a component from its export name and render function.
    pub fn new(
        name: impl Into<String>,
        render: impl Fn(&RenderContext) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            render: Arc::new(render),
        }
    }

    /// Declared name of the export (`default` for anonymous defaults).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the component markup.
    pub fn render(&self, ctx: &RenderContext) -> String {
        (self.render)(ctx)
    }

    /// Whether both values are clones of the same registered export.
    pub fn same_export(&self, other: &Component) -> bool {
        Arc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Value bound to a named export.
#[derive(Debug, Clone)]
pub enum ExportValue {
    /// Function-typed export.
    Function {
        component: Component,
        /// Set for functions known not to be components (hooks, helpers).
        non_component: bool,
    },

    /// Anything that is not callable: constants, config objects.
    Data(serde_json::Value),
}

impl ExportValue {
    /// A function export that may be rendered as a component.
    pub fn component(component: Component) -> Self {
        Self::Function {
            component,
            non_component: false,
        }
    }

    /// A function export explicitly flagged as not being a component.
    pub fn helper(component: Component) -> Self {
        Self::Function {
            component,
            non_component: true,
        }
    }

    pub fn data(value: impl Into<serde_json::Value>) -> Self {
        Self::Data(value.into())
    }

    /// The callable behind this export, if it is function-typed.
    pub fn as_function(&self) -> Option<&Component> {
        match self {
            Self::Function { component, .. } => Some(component),
            Self::Data(_) => None,
        }
    }

    /// Function-typed and not flagged as a non-component.
    pub fn is_component_like(&self) -> bool {
        matches!(
            self,
            Self::Function {
                non_component: false,
                ..
            }
        )
    }
}

/// Export table of one module.
///
/// Named exports keep their declaration order, which is the enumeration
/// order used by the resolver's fallback scan.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    default: Option<Component>,
    named: Vec<(String, ExportValue)>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default export.
    pub fn with_default(mut self, component: Component) -> Self {
        self.set_default(component);
        self
    }

    /// Add a named export.
    pub fn with_named(mut self, name: impl Into<String>, value: ExportValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn set_default(&mut self, component: Component) {
        self.default = Some(component);
    }

    /// Insert a named export. Re-exporting an existing name replaces its
    /// value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: ExportValue) {
        let name = name.into();
        match self.named.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.named.push((name, value)),
        }
    }

    pub fn default_export(&self) -> Option<&Component> {
        self.default.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&ExportValue> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Named exports in enumeration order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &ExportValue)> {
        self.named.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> Vec<&str> {
        self.named.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.named.is_empty()
    }
}
