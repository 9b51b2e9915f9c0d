//! Template engine for rendering catalog pages.

use minijinja::{context, Environment};

use agents_kit_catalog::{
    asset_path, normalize_base_path, Navigation, Route, RouteKind, RouteTable,
};

/// A navigation item.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path, base path included
    pub path: String,
    /// Child items
    pub children: Vec<NavItem>,
    /// Whether this is the active page
    pub active: bool,
}

/// A previous/next link.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavLink {
    pub title: String,
    pub path: String,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Site description
    pub description: String,
    /// Rendered component markup
    pub content: String,
    /// Navigation items
    pub nav: Vec<NavItem>,
    /// Previous page
    pub prev: Option<NavLink>,
    /// Next page
    pub next: Option<NavLink>,
    /// Deployment base path
    pub base_path: String,
    /// Slug of the component page
    pub slug: Option<String>,
    /// Catalog links listed on the index page
    pub links: Vec<NavLink>,
}

impl PageContext {
    /// Context with the site-wide fields filled in. The base path is
    /// normalized so templates can append `/assets/...` to it.
    pub fn site(site_title: &str, description: &str, base_path: &str) -> Self {
        Self {
            site_title: site_title.to_string(),
            description: description.to_string(),
            base_path: normalize_base_path(base_path),
            ..Default::default()
        }
    }
}

/// Build the sidebar from a route table, grouping routes by section.
///
/// `current` is a site-relative path without the base path.
pub fn build_nav(table: &RouteTable, base_path: &str, current: &str) -> Vec<NavItem> {
    let sections = [
        (RouteKind::Core, None),
        (RouteKind::Component, Some("Components")),
        (RouteKind::Agent, Some("Agents")),
        (RouteKind::Block, Some("Blocks")),
    ];

    let item = |route: &Route| NavItem {
        title: route.label.clone(),
        path: asset_path(base_path, &route.path),
        children: Vec::new(),
        active: route.path == current,
    };

    let mut nav = Vec::new();

    for (kind, heading) in sections {
        let items: Vec<NavItem> = table.by_kind(kind).map(item).collect();
        match heading {
            None => nav.extend(items),
            Some(_) if items.is_empty() => {}
            Some(title) => {
                let active = items.iter().any(|i| i.active);
                nav.push(NavItem {
                    title: title.to_string(),
                    path: items[0].path.clone(),
                    children: items,
                    active,
                });
            }
        }
    }

    nav
}

/// Previous/next links for a page.
pub fn nav_links(
    navigation: Option<Navigation<'_>>,
    base_path: &str,
) -> (Option<NavLink>, Option<NavLink>) {
    let link = |route: &Route| NavLink {
        title: route.label.clone(),
        path: asset_path(base_path, &route.path),
    };

    match navigation {
        Some(nav) => (nav.prev.map(link), nav.next.map(link)),
        None => (None, None),
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("component.html".to_string(), COMPONENT_TEMPLATE.to_string())
            .expect("Failed to add component template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        env.add_template_owned("404.html".to_string(), NOT_FOUND_TEMPLATE.to_string())
            .expect("Failed to add not found template");

        env.add_template_owned("nav.html".to_string(), NAV_TEMPLATE.to_string())
            .expect("Failed to add nav template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &PageContext,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            site_title => &context.site_title,
            description => &context.description,
            content => &context.content,
            nav => &context.nav,
            prev => &context.prev,
            next => &context.next,
            base_path => &context.base_path,
            slug => &context.slug,
            links => &context.links,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title %}{{ title }} - {% endif %}{{ site_title }}</title>
  <meta name="description" content="{{ description }}">
  <link rel="stylesheet" href="{{ base_path }}/assets/main.css">
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
  <script src="{{ base_path }}/assets/main.js"></script>
</body>
</html>"##;

const COMPONENT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<div class="page-shell" data-slug="{{ slug }}">
  {{ content | safe }}
</div>
{% if prev or next %}
<footer class="pager">
  {% if prev %}<a class="pager-prev" href="{{ prev.path }}">{{ prev.title }}</a>{% endif %}
  {% if next %}<a class="pager-next" href="{{ next.path }}">{{ next.title }}</a>{% endif %}
</footer>
{% endif %}
{% endblock %}"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc">
  <h1>{{ site_title }}</h1>
  <p>{{ description }}</p>
  {% if links %}
  <ul class="catalog">
  {% for link in links %}
    <li><a href="{{ link.path }}">{{ link.title }}</a></li>
  {% endfor %}
  </ul>
  {% else %}
  <p>No components found.</p>
  {% endif %}
</article>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc not-found">
  <h1>404</h1>
  <p>This page could not be found.</p>
  <a href="{{ base_path }}/">Back to the catalog</a>
</article>
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ base_path }}/" class="nav-logo">{{ site_title }}</a>
</div>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item{% if item.active %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
    {% if item.children %}
    <ul class="nav-children">
      {% for child in item.children %}
      <li class="nav-item{% if child.active %} active{% endif %}">
        <a href="{{ child.path }}">{{ child.title }}</a>
      </li>
      {% endfor %}
    </ul>
    {% endif %}
  </li>
{% endfor %}
</ul>"##;
