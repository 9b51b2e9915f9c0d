//! Asset pipeline for the page shell CSS and JavaScript.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Layout only; component styling ships with the component bundles.
const DEFAULT_CSS: &str = r#"/* agents-kit page shell */

:root {
  --sidebar-width: 260px;
  --content-max-width: 960px;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans, system-ui, -apple-system, sans-serif);
  background: var(--background, #fff);
  color: var(--foreground, #111);
  line-height: 1.6;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

.sidebar {
  border-right: 1px solid var(--border, #e4e4e7);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-logo {
  font-weight: 450;
  text-transform: lowercase;
  color: inherit;
  text-decoration: none;
}

.nav-list,
.nav-children {
  list-style: none;
}

.nav-children {
  margin-left: 1rem;
}

.nav-item a {
  display: block;
  padding: 0.25rem 0.5rem;
  color: inherit;
  text-decoration: none;
}

.nav-item.active > a {
  font-weight: 600;
}

.main {
  padding: 2rem;
  max-width: var(--content-max-width);
}

.page-shell {
  position: relative;
  isolation: isolate;
  min-height: 100vh;
}

.pager {
  display: flex;
  justify-content: space-between;
  margin-top: 2rem;
}

@media (max-width: 1024px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    display: none;
  }
}
"#;

const DEFAULT_JS: &str = r#"// agents-kit runtime
(function() {
  'use strict';

  // Highlight current nav item
  const currentPath = window.location.pathname;
  document.querySelectorAll('.nav-item a').forEach(link => {
    if (link.getAttribute('href') === currentPath) {
      link.parentElement.classList.add('active');
    }
  });

  // Load the bundle for every component mount point
  document.querySelectorAll('.component-root[data-bundle]').forEach(root => {
    import(root.dataset.bundle)
      .then(mod => {
        const mount = mod[root.dataset.export] || mod.default;
        if (typeof mount === 'function') {
          mount(root);
        }
      })
      .catch(err => console.error('Failed to load component bundle:', err));
  });
})();
"#;
