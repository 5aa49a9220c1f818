//! Route registry
//!
//! Filled during setup, then split into the dispatcher's controller table
//! and the handler bindings. Nothing here is touched once serving starts.

use std::any::type_name;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use crate::controller::{is_reachable_action_name, Action, Context, Controller, ResponseWriter};
use crate::error::{ActionError, RegistryError};
use crate::handler::{FileServer, Handler, StripPrefix};
use crate::logger;

/// Type-erased controller: builds an instance per request and runs one action
pub(crate) trait Archetype: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn has_action(&self, name: &str) -> bool;

    /// Construct a fresh controller from `ctx` and run `name` on it
    ///
    /// `None` when the action does not exist.
    fn invoke(&self, name: &str, ctx: Context) -> Option<Result<ResponseWriter, ActionError>>;
}

struct ControllerArchetype<C> {
    actions: HashMap<String, Action<C>>,
    _controller: PhantomData<fn() -> C>,
}

impl<C: Controller> ControllerArchetype<C> {
    fn build(key: &str) -> Result<Self, RegistryError> {
        let table = C::actions();
        if table.is_empty() {
            return Err(RegistryError::EmptyActionTable {
                key: key.to_string(),
            });
        }

        let mut actions = HashMap::with_capacity(table.len());
        for (name, action) in table.into_entries() {
            if !is_reachable_action_name(&name) {
                return Err(RegistryError::UnreachableAction {
                    key: key.to_string(),
                    name,
                });
            }
            if actions.insert(name.clone(), action).is_some() {
                return Err(RegistryError::DuplicateAction {
                    key: key.to_string(),
                    name,
                });
            }
        }

        Ok(Self {
            actions,
            _controller: PhantomData,
        })
    }
}

impl<C: Controller> Archetype for ControllerArchetype<C> {
    fn type_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    fn invoke(&self, name: &str, ctx: Context) -> Option<Result<ResponseWriter, ActionError>> {
        let action = *self.actions.get(name)?;
        let mut controller = C::from_context(ctx);
        Some(action(&mut controller).map(|()| controller.into_context().response))
    }
}

/// A registered controller key and its archetype
pub(crate) struct RouteEntry {
    pub(crate) key: String,
    pub(crate) archetype: Arc<dyn Archetype>,
}

/// Handler bindings: exact paths, or subtrees for patterns ending in `/`
#[derive(Default, Clone)]
pub struct HandlerBindings {
    exact: HashMap<String, Arc<dyn Handler>>,
    /// Longest pattern first
    subtree: Vec<(String, Arc<dyn Handler>)>,
}

impl HandlerBindings {
    fn bind(&mut self, pattern: String, handler: Arc<dyn Handler>) {
        if !pattern.ends_with('/') {
            self.exact.insert(pattern, handler);
            return;
        }
        match self.subtree.iter_mut().find(|(p, _)| *p == pattern) {
            Some(slot) => slot.1 = handler,
            None => self.subtree.push((pattern, handler)),
        }
        self.subtree.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Handler bound to `path`: an exact binding, else the longest subtree
    pub fn find(&self, path: &str) -> Option<&Arc<dyn Handler>> {
        self.exact.get(path).or_else(|| {
            self.subtree
                .iter()
                .find(|(pattern, _)| path.starts_with(pattern.as_str()))
                .map(|(_, handler)| handler)
        })
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.subtree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Setup-time collection of controller routes and handler bindings
#[derive(Default)]
pub struct RouteRegistry {
    controllers: Vec<RouteEntry>,
    handlers: HandlerBindings,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind controller `C` under `path`, normalized to `/a/b` form
    ///
    /// Re-registering a key replaces the earlier controller.
    pub fn register_controller<C: Controller>(&mut self, path: &str) -> Result<(), RegistryError> {
        let key = normalize_path_key(path);
        if key == "/" {
            return Err(RegistryError::EmptyKey {
                path: path.to_string(),
            });
        }

        let archetype = ControllerArchetype::<C>::build(&key)?;
        let action_count = archetype.actions.len();
        let archetype: Arc<dyn Archetype> = Arc::new(archetype);

        if let Some(existing) = self.controllers.iter_mut().find(|e| e.key == key) {
            logger::log_warning(&format!(
                "Controller key {key} re-registered: {} replaces {}",
                archetype.type_name(),
                existing.archetype.type_name()
            ));
            existing.archetype = archetype;
        } else {
            logger::log_controller_registered(&key, archetype.type_name(), action_count);
            self.controllers.push(RouteEntry { key, archetype });
        }
        Ok(())
    }

    /// Bind `handler` to `pattern`; patterns ending in `/` cover their subtree
    pub fn register_handler<H: Handler>(&mut self, pattern: &str, handler: H) {
        let pattern = if pattern.starts_with('/') {
            pattern.to_string()
        } else {
            format!("/{pattern}")
        };
        logger::log_handler_registered(&pattern);
        self.handlers.bind(pattern, Arc::new(handler));
    }

    /// Serve files from `directory` under `prefix`, which gains a trailing `/`
    pub fn register_static_route(&mut self, prefix: &str, directory: impl Into<PathBuf>) {
        let mut prefix = if prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        let handler = StripPrefix::new(prefix.clone(), FileServer::new(directory));
        self.register_handler(&prefix, handler);
    }

    /// Registered controller keys, in registration order
    pub fn controller_keys(&self) -> impl Iterator<Item = &str> {
        self.controllers.iter().map(|e| e.key.as_str())
    }

    pub const fn handlers(&self) -> &HandlerBindings {
        &self.handlers
    }

    pub(crate) fn into_parts(self) -> (Vec<RouteEntry>, HandlerBindings) {
        (self.controllers, self.handlers)
    }
}

/// Normalize a controller key: one leading `/`, no trailing `/`, no empty segments
///
/// # Examples
/// ```
/// use rust_dispatcher::routing::normalize_path_key;
/// assert_eq!(normalize_path_key("ct"), "/ct");
/// assert_eq!(normalize_path_key("//admin//users/"), "/admin/users");
/// ```
pub fn normalize_path_key(path: &str) -> String {
    let mut key = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        key.push('/');
        key.push_str(segment);
    }
    if key.is_empty() {
        key.push('/');
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ActionTable;
    use crate::error::ActionResult;
    use crate::http::Body;
    use hyper::{Request, Response};

    struct Hello {
        ctx: Context,
    }

    impl Hello {
        fn hello(&mut self) -> ActionResult {
            self.ctx.response.render_string("hello");
            Ok(())
        }
    }

    impl Controller for Hello {
        fn from_context(ctx: Context) -> Self {
            Self { ctx }
        }

        fn into_context(self) -> Context {
            self.ctx
        }

        fn actions() -> ActionTable<Self> {
            ActionTable::new().action("HelloAction", Self::hello)
        }
    }

    struct Empty(Context);

    impl Controller for Empty {
        fn from_context(ctx: Context) -> Self {
            Self(ctx)
        }

        fn into_context(self) -> Context {
            self.0
        }

        fn actions() -> ActionTable<Self> {
            ActionTable::new()
        }
    }

    struct Misnamed(Context);

    impl Misnamed {
        fn run(&mut self) -> ActionResult {
            Ok(())
        }
    }

    impl Controller for Misnamed {
        fn from_context(ctx: Context) -> Self {
            Self(ctx)
        }

        fn into_context(self) -> Context {
            self.0
        }

        fn actions() -> ActionTable<Self> {
            ActionTable::new()
                .action("RunAction", Self::run)
                .action("run", Self::run)
        }
    }

    struct Twice(Context);

    impl Twice {
        fn run(&mut self) -> ActionResult {
            Ok(())
        }
    }

    impl Controller for Twice {
        fn from_context(ctx: Context) -> Self {
            Self(ctx)
        }

        fn into_context(self) -> Context {
            self.0
        }

        fn actions() -> ActionTable<Self> {
            ActionTable::new()
                .action("RunAction", Self::run)
                .action("RunAction", Self::run)
        }
    }

    fn marker(body: &'static str) -> impl Handler {
        move |_req: Request<()>| async move { Response::new(Body::from(body)) }
    }

    #[test]
    fn test_normalize_path_key() {
        assert_eq!(normalize_path_key("/ct"), "/ct");
        assert_eq!(normalize_path_key("ct/"), "/ct");
        assert_eq!(normalize_path_key("/api//users/"), "/api/users");
        assert_eq!(normalize_path_key(""), "/");
        assert_eq!(normalize_path_key("//"), "/");
    }

    #[test]
    fn test_register_normalizes_key() {
        let mut registry = RouteRegistry::new();
        registry.register_controller::<Hello>("ct/").unwrap();
        registry.register_controller::<Hello>("/admin//users").unwrap();
        assert_eq!(
            registry.controller_keys().collect::<Vec<_>>(),
            ["/ct", "/admin/users"]
        );
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = RouteRegistry::new();
        registry.register_controller::<Hello>("/ct").unwrap();
        registry.register_controller::<Hello>("ct").unwrap();
        assert_eq!(registry.controller_keys().count(), 1);
    }

    #[test]
    fn test_rejects_bad_tables_and_keys() {
        let mut registry = RouteRegistry::new();
        assert!(matches!(
            registry.register_controller::<Empty>("/e"),
            Err(RegistryError::EmptyActionTable { .. })
        ));
        assert!(matches!(
            registry.register_controller::<Misnamed>("/m"),
            Err(RegistryError::UnreachableAction { name, .. }) if name == "run"
        ));
        assert!(matches!(
            registry.register_controller::<Twice>("/t"),
            Err(RegistryError::DuplicateAction { .. })
        ));
        assert!(matches!(
            registry.register_controller::<Hello>("/"),
            Err(RegistryError::EmptyKey { .. })
        ));
        assert_eq!(registry.controller_keys().count(), 0);
    }

    #[test]
    fn test_archetype_builds_fresh_instance_per_invoke() {
        let archetype = ControllerArchetype::<Hello>::build("/ct").unwrap();
        assert!(archetype.has_action("HelloAction"));
        assert!(!archetype.has_action("ByeAction"));

        for _ in 0..2 {
            let req = Request::builder().uri("/ct/hello").body(()).unwrap();
            let writer = archetype
                .invoke("HelloAction", Context::new(req))
                .unwrap()
                .unwrap();
            assert_eq!(writer.body(), b"hello");
        }

        let req = Request::builder().uri("/ct/bye").body(()).unwrap();
        assert!(archetype.invoke("ByeAction", Context::new(req)).is_none());
    }

    #[tokio::test]
    async fn test_handler_bindings_exact_and_longest_subtree() {
        let mut registry = RouteRegistry::new();
        registry.register_handler("/assets/", marker("assets"));
        registry.register_handler("/assets/img/", marker("img"));
        registry.register_handler("robots.txt", marker("robots"));
        let handlers = registry.handlers();
        assert_eq!(handlers.len(), 3);

        let call = |path: &str| {
            let handler = handlers.find(path).map(Arc::clone);
            let req = Request::builder().uri(path).body(()).unwrap();
            async move {
                match handler {
                    Some(h) => {
                        let bytes = http_body_util::BodyExt::collect(h.call(req).await.into_body())
                            .await
                            .unwrap()
                            .to_bytes();
                        Some(String::from_utf8(bytes.to_vec()).unwrap())
                    }
                    None => None,
                }
            }
        };

        assert_eq!(call("/assets/site.css").await.as_deref(), Some("assets"));
        assert_eq!(call("/assets/img/logo.png").await.as_deref(), Some("img"));
        assert_eq!(call("/robots.txt").await.as_deref(), Some("robots"));
        assert_eq!(call("/robots.txt/x").await, None);
        assert_eq!(call("/assets").await, None);
    }

    #[test]
    fn test_static_route_prefix_gets_slashes() {
        let mut registry = RouteRegistry::new();
        registry.register_static_route("static", "/tmp");
        assert!(registry.handlers().find("/static/app.js").is_some());
        assert!(registry.handlers().find("/static").is_none());
    }
}
