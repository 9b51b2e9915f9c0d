//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use agents_kit_catalog::{
    asset_path, normalize_base_path, page_path, ComponentResolver, Manifest, ResolvedComponent,
    Route, RouteParam, RouteTable,
};
use agents_kit_static::assets::AssetPipeline;
use agents_kit_static::builder::DEFAULT_DESCRIPTION;
use agents_kit_static::{build_nav, catalog_routes, nav_links, NavLink, PageContext, TemplateEngine};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory containing component modules
    pub components_dir: PathBuf,

    /// Directory of static files served as-is
    pub public_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Deployment base path, empty at the root
    pub base_path: String,

    /// Site title
    pub title: String,

    /// Site description
    pub description: String,

    /// Extra navigation routes
    pub routes: Vec<Route>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("components/blocks"),
            public_dir: PathBuf::from("public"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            base_path: String::new(),
            title: "agents-ui-kit".to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            routes: vec![],
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}: {1}")]
    InvalidAddress(String, String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    hmr: HmrHub,
    manifest: Manifest,
    templates: TemplateEngine,
}

type SharedState = Arc<RwLock<ServerState>>;

fn shared_state(mut config: DevServerConfig) -> SharedState {
    config.base_path = normalize_base_path(&config.base_path);
    let manifest = Manifest::from_directory(&config.components_dir);
    Arc::new(RwLock::new(ServerState {
        config,
        hmr: HmrHub::new(),
        manifest,
        templates: TemplateEngine::new(),
    }))
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(mut config: DevServerConfig) -> Self {
        config.base_path = normalize_base_path(&config.base_path);
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let host_port = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = host_port
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ServerError::InvalidAddress(host_port.clone(), e.to_string())
            })?;

        let state = shared_state(self.config.clone());

        {
            let state = state.read().await;
            tracing::info!(
                "Serving {} components from {}",
                state.manifest.len(),
                self.config.components_dir.display()
            );
        }

        let (watcher, mut rx) = FileWatcher::new(&[self.config.components_dir.clone()])
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, &self.config);

        let url = format!("http://{}{}", addr, asset_path(&self.config.base_path, "/"));
        tracing::info!("Starting dev server at {}", url);

        if self.config.open {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Build the router, mounted under the base path when one is set.
fn router(state: SharedState, config: &DevServerConfig) -> Router {
    let site = Router::new()
        .route("/", get(index_handler))
        .route("/c/{slug}", get(component_handler))
        .route("/c/{slug}/", get(component_handler))
        .route("/assets/main.css", get(css_handler))
        .route("/assets/main.js", get(js_handler))
        .route("/__hmr", get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler))
        .fallback_service(ServeDir::new(&config.public_dir))
        .with_state(state);

    let base = normalize_base_path(&config.base_path);
    if base.is_empty() {
        site
    } else {
        Router::new().nest(&base, site)
    }
}

/// Handle file watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    if event.changes_routes() {
        let mut state = state.write().await;
        let manifest = Manifest::from_directory(&state.config.components_dir);
        state.manifest = manifest;

        let routes = state
            .manifest
            .slugs()
            .into_iter()
            .map(|slug| slug.to_string())
            .collect();

        tracing::info!("Catalog changed: {} components", state.manifest.len());
        state.hmr.send(HmrMessage::RoutesChanged { routes });
        return;
    }

    let state = state.read().await;
    match event {
        WatchEvent::ComponentModified(path) => {
            tracing::info!("Component modified: {}", path.display());
        }
        WatchEvent::Other(path) => {
            tracing::debug!("Changed: {}", path.display());
        }
        WatchEvent::ComponentAdded(_)
        | WatchEvent::ComponentRemoved(_)
        | WatchEvent::ComponentRenamed(_) => {}
    }
    state.hmr.send(HmrMessage::Reload);
}

impl ServerState {
    fn site_context(&self) -> PageContext {
        PageContext::site(
            &self.config.title,
            &self.config.description,
            &self.config.base_path,
        )
    }

    /// Navigation over the configured routes and the pages that resolve.
    fn route_table(&self, catalog: &[ResolvedComponent]) -> RouteTable {
        let pages: Vec<RouteParam> = catalog
            .iter()
            .map(|resolved| RouteParam::new(resolved.slug.clone()))
            .collect();
        catalog_routes(&self.config.routes, &pages)
    }

    /// Render the page for a resolved component.
    fn render_component(
        &self,
        resolved: &ResolvedComponent,
        catalog: &[ResolvedComponent],
    ) -> Option<String> {
        let table = self.route_table(catalog);
        let route_path = page_path("", resolved.slug.as_str());
        let base_path = &self.config.base_path;
        let (prev, next) = nav_links(table.navigation(&route_path), base_path);

        let context = PageContext {
            title: resolved.slug.title(),
            content: resolved.render(base_path),
            nav: build_nav(&table, base_path, &route_path),
            prev,
            next,
            slug: Some(resolved.slug.to_string()),
            ..self.site_context()
        };

        self.render("component.html", &context)
    }

    fn render_index(&self, catalog: &[ResolvedComponent]) -> Option<String> {
        let table = self.route_table(catalog);
        let base_path = &self.config.base_path;

        let context = PageContext {
            nav: build_nav(&table, base_path, "/"),
            links: catalog
                .iter()
                .map(|resolved| NavLink {
                    title: resolved.slug.title(),
                    path: page_path(base_path, resolved.slug.as_str()),
                })
                .collect(),
            ..self.site_context()
        };

        self.render("index.html", &context)
    }

    fn render_not_found(&self, catalog: &[ResolvedComponent]) -> String {
        let table = self.route_table(catalog);
        let context = PageContext {
            title: "Not Found".to_string(),
            nav: build_nav(&table, &self.config.base_path, ""),
            ..self.site_context()
        };

        self.render("404.html", &context)
            .unwrap_or_else(|| "<h1>404</h1>".to_string())
    }

    fn render(&self, template: &str, context: &PageContext) -> Option<String> {
        match self.templates.render_page(template, context) {
            Ok(html) => Some(with_hmr_script(&html, &self.config.base_path)),
            Err(e) => {
                tracing::error!("Failed to render {}: {}", template, e);
                None
            }
        }
    }
}

/// Inject the HMR client into a rendered page.
fn with_hmr_script(html: &str, base_path: &str) -> String {
    let script = format!(
        r#"<script src="{}"></script></body>"#,
        asset_path(base_path, "/__hmr.js")
    );
    html.replacen("</body>", &script, 1)
}

/// Resolve every registered slug afresh.
///
/// Module loads read source files, so they run on the blocking pool over a
/// snapshot of the manifest, with the state lock released.
async fn resolve_catalog(state: &SharedState) -> Vec<ResolvedComponent> {
    let manifest = state.read().await.manifest.clone();

    let result = tokio::task::spawn_blocking(move || {
        let resolver = ComponentResolver::new(&manifest);
        manifest
            .route_params()
            .iter()
            .filter_map(|param| resolver.resolve(param.component_slug.as_str()).ok())
            .collect::<Vec<_>>()
    })
    .await;

    match result {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Component resolution task failed: {}", e);
            Vec::new()
        }
    }
}

/// Handler for the catalog index.
async fn index_handler(State(state): State<SharedState>) -> (StatusCode, Html<String>) {
    let catalog = resolve_catalog(&state).await;
    let state = state.read().await;

    match state.render_index(&catalog) {
        Some(html) => (StatusCode::OK, Html(html)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(state.render_not_found(&catalog)),
        ),
    }
}

/// Handler for a component page.
async fn component_handler(
    Path(slug): Path<String>,
    State(state): State<SharedState>,
) -> (StatusCode, Html<String>) {
    let catalog = resolve_catalog(&state).await;
    let state = state.read().await;

    let page = match catalog.iter().find(|resolved| resolved.slug.as_str() == slug) {
        Some(resolved) => state.render_component(resolved, &catalog),
        None => {
            tracing::warn!("No page for {:?}", slug);
            None
        }
    };

    match page {
        Some(html) => (StatusCode::OK, Html(html)),
        None => (StatusCode::NOT_FOUND, Html(state.render_not_found(&catalog))),
    }
}

async fn css_handler() -> impl IntoResponse {
    ([("content-type", "text/css")], AssetPipeline::generate_css())
}

async fn js_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        AssetPipeline::generate_js(),
    )
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.hmr.subscribe()
    };

    if !send_message(&mut socket, &HmrMessage::Connected).await {
        return;
    }

    // Forward HMR messages to the client
    while let Ok(hmr_msg) = rx.recv().await {
        if !send_message(&mut socket, &hmr_msg).await {
            break;
        }
    }
}

/// Send one message; false once the client is gone.
async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode HMR message: {}", e);
            return false;
        }
    };

    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the HMR client script.
async fn hmr_script_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let script = hmr_client_script(&asset_path(&state.config.base_path, "/__hmr"));
    ([("content-type", "application/javascript")], script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn fixture() -> (TempDir, SharedState) {
        let temp = tempdir().unwrap();
        let blocks = temp.path().join("blocks");
        fs::create_dir_all(&blocks).unwrap();
        fs::write(
            blocks.join("agent-card.tsx"),
            "export default function AgentCard() { return null }\n",
        )
        .unwrap();
        fs::write(blocks.join("tokens.tsx"), "export const SPACING = 4\n").unwrap();

        let state = shared_state(DevServerConfig {
            components_dir: blocks,
            public_dir: temp.path().join("public"),
            open: false,
            ..Default::default()
        });
        (temp, state)
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.components_dir, PathBuf::from("components/blocks"));
    }

    #[tokio::test]
    async fn renders_component_page() {
        let (_temp, state) = fixture();

        let (status, Html(html)) =
            component_handler(Path("agent-card".to_string()), State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"data-export="AgentCard""#));
        assert!(html.contains("__hmr.js"));
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let (_temp, state) = fixture();

        let (status, Html(html)) =
            component_handler(Path("missing".to_string()), State(state)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("This page could not be found."));
    }

    #[tokio::test]
    async fn module_without_component_is_not_found() {
        let (_temp, state) = fixture();

        let (status, _) = component_handler(Path("tokens".to_string()), State(state)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn picks_up_edits_without_restart() {
        let (temp, state) = fixture();
        fs::write(
            temp.path().join("blocks/tokens.tsx"),
            "export const SPACING = 4\nexport function Tokens() { return null }\n",
        )
        .unwrap();

        let (status, Html(html)) =
            component_handler(Path("tokens".to_string()), State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"data-export="Tokens""#));
    }

    #[tokio::test]
    async fn added_component_changes_routes() {
        let (temp, state) = fixture();
        let mut rx = state.read().await.hmr.subscribe();

        let path = temp.path().join("blocks/agent-status.tsx");
        fs::write(&path, "export function AgentStatus() {}\n").unwrap();
        handle_watch_event(&state, WatchEvent::ComponentAdded(path)).await;

        assert!(state.read().await.manifest.contains("agent-status"));
        match rx.try_recv() {
            Ok(HmrMessage::RoutesChanged { routes }) => {
                assert_eq!(routes, vec!["agent-card", "agent-status", "tokens"]);
            }
            other => panic!("Expected RoutesChanged, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn navigation_skips_unresolvable_pages() {
        let (_temp, state) = fixture();

        let (_, Html(page)) =
            component_handler(Path("agent-card".to_string()), State(Arc::clone(&state))).await;
        let (_, Html(index)) = index_handler(State(state)).await;

        for html in [page, index] {
            assert!(!html.contains("tokens"));
            assert!(!html.contains("Tokens"));
        }
    }

    #[tokio::test]
    async fn component_renamed_into_place_is_served() {
        let (temp, state) = fixture();
        let mut rx = state.read().await.hmr.subscribe();

        let staged = temp.path().join("agent-status.tsx.tmp");
        fs::write(&staged, "export function AgentStatus() {}\n").unwrap();
        let path = temp.path().join("blocks/agent-status.tsx");
        fs::rename(&staged, &path).unwrap();

        handle_watch_event(&state, WatchEvent::ComponentRenamed(path)).await;

        assert!(matches!(rx.try_recv(), Ok(HmrMessage::RoutesChanged { .. })));
        let (status, _) =
            component_handler(Path("agent-status".to_string()), State(state)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn relative_base_path_is_nested() {
        let (_temp, state) = fixture();
        let config = DevServerConfig {
            base_path: "agents-kit".to_string(),
            ..Default::default()
        };

        // Building the router must not panic on a path without a leading slash
        let _router = router(state, &config);

        let server = DevServer::new(config);
        assert_eq!(server.config.base_path, "/agents-kit");
    }

    #[tokio::test]
    async fn modification_reloads() {
        let (temp, state) = fixture();
        let mut rx = state.read().await.hmr.subscribe();

        let path = temp.path().join("blocks/agent-card.tsx");
        handle_watch_event(&state, WatchEvent::ComponentModified(path)).await;

        assert_eq!(rx.try_recv().ok(), Some(HmrMessage::Reload));
    }

    #[tokio::test]
    async fn index_lists_components() {
        let (_temp, state) = fixture();

        let (status, Html(html)) = index_handler(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Agent Card</a>"));
    }

    #[test]
    fn injects_hmr_script() {
        let html = with_hmr_script("<html><body></body></html>", "/agents-kit");
        assert_eq!(
            html,
            r#"<html><body><script src="/agents-kit/__hmr.js"></script></body></html>"#
        );
    }
}
