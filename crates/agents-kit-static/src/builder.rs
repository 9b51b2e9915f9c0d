//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use agents_kit_catalog::{
    asset_path, normalize_base_path, page_path, ComponentResolver, Manifest, ResolvedComponent,
    Route, RouteKind, RouteParam, RouteTable, Slug,
};

use crate::assets::AssetPipeline;
use crate::templates::{build_nav, nav_links, NavLink, PageContext, TemplateEngine};

/// Default site description.
pub const DEFAULT_DESCRIPTION: &str =
    "Advanced UI components for building AI agent interfaces.";

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding one module file per component
    pub components_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Deployment base path (e.g. "/agents-kit"), empty at the root
    pub base_path: String,

    /// Site title
    pub title: String,

    /// Site description
    pub description: String,

    /// Minify CSS output
    pub minify: bool,

    /// Extra navigation routes shown before the component pages
    pub routes: Vec<Route>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("components/blocks"),
            output_dir: PathBuf::from("out"),
            base_path: String::new(),
            title: "agents-ui-kit".to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            minify: true,
            routes: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of component pages generated
    pub pages: usize,

    /// Number of enumerated slugs that did not resolve
    pub not_found: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    manifest: Manifest,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a builder whose manifest is generated from the components
    /// directory.
    pub fn new(config: BuildConfig) -> Self {
        let manifest = Manifest::from_directory(&config.components_dir);
        Self::with_manifest(config, manifest)
    }

    /// Create a builder over an explicitly registered manifest.
    pub fn with_manifest(mut config: BuildConfig, manifest: Manifest) -> Self {
        config.base_path = normalize_base_path(&config.base_path);
        Self {
            config,
            manifest,
            templates: TemplateEngine::new(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        // Ensure output directory exists
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        self.check_manifest();

        let params = self.manifest.route_params();
        let resolver = ComponentResolver::new(&self.manifest);

        // Resolve every slug first; navigation only links to written pages
        let resolved: Vec<ResolvedComponent> = params
            .par_iter()
            .filter_map(|param| match resolver.resolve(param.component_slug.as_str()) {
                Ok(resolved) => Some(resolved),
                Err(e) => {
                    tracing::warn!("Skipping page for {}: {}", param.component_slug, e);
                    None
                }
            })
            .collect();

        let not_found = params.len() - resolved.len();
        let rendered: Vec<Slug> = resolved.iter().map(|r| r.slug.clone()).collect();
        let pages: Vec<RouteParam> = rendered.iter().cloned().map(RouteParam::new).collect();
        let table = catalog_routes(&self.config.routes, &pages);

        // Render pages in parallel
        resolved
            .par_iter()
            .map(|component| self.build_page(component, &table))
            .collect::<Result<Vec<()>, BuildError>>()?;

        self.write_index(&rendered, &table)?;
        self.write_not_found(&table)?;
        self.generate_assets()?;
        self.write_route_params(&params)?;
        self.generate_sitemap(&rendered)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: rendered.len(),
            not_found,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Warn about registered slugs and component files that disagree.
    fn check_manifest(&self) {
        if !self.config.components_dir.is_dir() {
            return;
        }

        let diff = self.manifest.validate_against(&self.config.components_dir);
        for slug in &diff.missing_files {
            tracing::warn!("Registered component {} has no source file", slug);
        }
        for slug in &diff.unregistered {
            tracing::warn!("Component file for {} is not in the manifest", slug);
        }
    }

    /// Output path of the page for a slug.
    fn page_output_path(&self, slug: &Slug) -> PathBuf {
        self.config
            .output_dir
            .join("c")
            .join(slug.as_str())
            .join("index.html")
    }

    /// Render the page for one resolved component.
    fn build_page(
        &self,
        resolved: &ResolvedComponent,
        table: &RouteTable,
    ) -> Result<(), BuildError> {
        let slug = &resolved.slug;

        let route_path = page_path("", slug.as_str());
        let (prev, next) = nav_links(table.navigation(&route_path), &self.config.base_path);

        let context = PageContext {
            title: slug.title(),
            content: resolved.render(&self.config.base_path),
            nav: build_nav(table, &self.config.base_path, &route_path),
            prev,
            next,
            slug: Some(slug.to_string()),
            ..self.site_context()
        };

        let html = self
            .templates
            .render_page("component.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_file(&self.page_output_path(slug), &html)?;

        tracing::debug!("Rendered {} ({} via {})", slug, resolved.export, resolved.rule);

        Ok(())
    }

    fn site_context(&self) -> PageContext {
        PageContext::site(
            &self.config.title,
            &self.config.description,
            &self.config.base_path,
        )
    }

    /// Write the catalog index page.
    fn write_index(&self, rendered: &[Slug], table: &RouteTable) -> Result<(), BuildError> {
        let context = PageContext {
            nav: build_nav(table, &self.config.base_path, "/"),
            links: rendered
                .iter()
                .map(|slug| NavLink {
                    title: slug.title(),
                    path: page_path(&self.config.base_path, slug.as_str()),
                })
                .collect(),
            ..self.site_context()
        };

        let html = self
            .templates
            .render_page("index.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_file(&self.config.output_dir.join("index.html"), &html)
    }

    /// Write the page served for every unknown or unresolvable path.
    fn write_not_found(&self, table: &RouteTable) -> Result<(), BuildError> {
        let context = PageContext {
            title: "Not Found".to_string(),
            nav: build_nav(table, &self.config.base_path, ""),
            ..self.site_context()
        };

        let html = self
            .templates
            .render_page("404.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_file(&self.config.output_dir.join("404.html"), &html)
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Failed to minify CSS: {}", e);
                css
            })
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), &css)?;

        write_file(&assets_dir.join("main.js"), &AssetPipeline::generate_js())
    }

    /// Write the enumerated route params as JSON.
    fn write_route_params(&self, params: &[RouteParam]) -> Result<(), BuildError> {
        let json = serde_json::to_string_pretty(params)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_file(&self.config.output_dir.join("routes.json"), &json)
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, rendered: &[Slug]) -> Result<(), BuildError> {
        let urls: Vec<String> = std::iter::once(asset_path(&self.config.base_path, "/"))
            .chain(
                rendered
                    .iter()
                    .map(|slug| page_path(&self.config.base_path, slug.as_str())),
            )
            .map(|url| format!("  <url>\n    <loc>{}</loc>\n  </url>", escape_xml(&url)))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        write_file(&self.config.output_dir.join("sitemap.xml"), &sitemap)
    }
}

/// Configured routes followed by one block route per component page.
pub fn catalog_routes(configured: &[Route], params: &[RouteParam]) -> RouteTable {
    let mut table = RouteTable::new(configured.to_vec());
    for param in params {
        table.push(
            page_path("", param.component_slug.as_str()),
            param.component_slug.title(),
            RouteKind::Block,
        );
    }
    table
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Write a file, creating its parent directories.
fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }

    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
