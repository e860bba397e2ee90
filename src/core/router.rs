//! Hash-based view router.
//!
//! Resolves a view path to a fragment, swaps it into the mount point with a
//! fade, records it in history and hands the new subtree to the page
//! behaviors.
//!
//! # Failure policy
//!
//! Every failure (bad status, network error, extraction error, behavior
//! error) is logged and ends the navigation: the outbound fade is undone
//! and the previous view stays in place. Nothing is retried.
//!
//! # Overlapping navigations
//!
//! Each call to [`Router::load_view`] takes a fresh [`NavigationToken`].
//! A call whose token has been superseded when it wakes from a delay or a
//! fetch returns [`NavigationError::Superseded`] without touching the shell.

use crate::config::RouterConfig;
use crate::core::error::NavigationError;
use crate::core::fragment::{ExtractedView, extract_view};
use crate::core::host::{SubtreeInit, ViewHost};
use crate::core::transition::{Generation, NavigationToken, Transition};
use crate::models::ViewPath;

/// Options for a single navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Push a history entry (false when replaying back/forward).
    pub push: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { push: true }
    }
}

impl LoadOptions {
    /// Options for history replay and boot: no new history entry.
    pub fn replay() -> Self {
        Self { push: false }
    }
}

/// Fragment router bound to a [`ViewHost`].
pub struct Router<H: ViewHost> {
    host: H,
    config: RouterConfig,
    behaviors: Option<Box<dyn SubtreeInit<H::Node>>>,
    transition: Transition,
    generation: Generation,
}

impl<H: ViewHost> Router<H> {
    pub fn new(host: H, config: RouterConfig) -> Self {
        Self {
            host,
            config,
            behaviors: None,
            transition: Transition::new(),
            generation: Generation::default(),
        }
    }

    /// Register the per-view initialization run after each swap.
    pub fn with_behaviors(mut self, behaviors: impl SubtreeInit<H::Node> + 'static) -> Self {
        self.behaviors = Some(Box::new(behaviors));
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn normalize(&self, raw: Option<&str>) -> ViewPath {
        ViewPath::normalize_in(raw, &self.config.view_dir, &self.config.default_view)
    }

    /// View named by the current location hash.
    pub fn resolve_current_view(&self) -> ViewPath {
        self.normalize(Some(&self.host.location_hash()))
    }

    /// Load `raw` into the mount point.
    ///
    /// Errors are logged here; callers driving navigation from events can
    /// drop the result.
    pub async fn load_view(
        &self,
        raw: &str,
        options: LoadOptions,
    ) -> Result<ViewPath, NavigationError> {
        let path = self.normalize(Some(raw));
        let token = self.generation.begin();
        log::debug!(target: "router", "loading {} (push: {})", path, options.push);

        // OUT
        self.transition.leave(&self.host);
        self.host.sleep(self.config.leave_delay_ms).await;
        self.ensure_current(token, &path)?;

        let view = match self.fetch_view(&path).await {
            Ok(view) => view,
            Err(err) => {
                if self.generation.is_current(token) {
                    self.transition.abort(&self.host);
                }
                log::error!(target: "router", "{}", err);
                return Err(err);
            }
        };
        self.ensure_current(token, &path)?;

        // SWAP
        self.host.replace_view(&view.view_html);
        self.host.replace_footer(view.footer.as_ref());

        if options.push {
            let url = path.history_url(&self.host.shell_url());
            self.host.push_history(path.as_str(), &url);
        }

        self.run_behaviors();

        // IN
        self.transition.enter(&self.host);
        self.host.sleep(self.config.enter_delay_ms).await;
        if self.generation.is_current(token) {
            self.transition.settle(&self.host);
        }

        Ok(path)
    }

    async fn fetch_view(&self, path: &ViewPath) -> Result<ExtractedView, NavigationError> {
        let base = self.host.shell_url();
        let url = path
            .fragment_url(&base)
            .ok_or_else(|| NavigationError::InvalidUrl {
                path: path.to_string(),
                base: base.clone(),
            })?;

        let html = self
            .host
            .fetch_text(&url)
            .await
            .map_err(|source| NavigationError::Fetch {
                path: path.to_string(),
                source,
            })?;

        Ok(extract_view(&html, path)?)
    }

    fn ensure_current(&self, token: NavigationToken, path: &ViewPath) -> Result<(), NavigationError> {
        if self.generation.is_current(token) {
            Ok(())
        } else {
            log::debug!(target: "router", "dropping superseded navigation to {}", path);
            Err(NavigationError::Superseded(path.to_string()))
        }
    }

    fn run_behaviors(&self) {
        let Some(behaviors) = &self.behaviors else {
            return;
        };
        let Some(mount) = self.host.mount_node() else {
            return;
        };
        if let Err(e) = behaviors.init_subtree(&mount) {
            log::error!(target: "behaviors", "init failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::{BTreeSet, HashMap};
    use std::rc::Rc;

    use super::*;
    use crate::config::transition_classes::{ENTERING, LEAVING, PRE_ENTERING};
    use crate::core::error::{BehaviorError, FetchError};
    use crate::core::fragment::ViewFooter;
    use crate::core::transition::TransitionPhase;

    const SHELL: &str = "https://site.test/";

    #[derive(Default)]
    struct MockHost {
        hash: String,
        responses: HashMap<String, Result<String, FetchError>>,
        requested: RefCell<Vec<String>>,
        classes: RefCell<BTreeSet<String>>,
        ops: RefCell<Vec<String>>,
        mount: RefCell<String>,
        footer: RefCell<(String, String)>,
        history: RefCell<Vec<(String, String)>>,
    }

    impl MockHost {
        fn new() -> Self {
            Self {
                mount: RefCell::new("<p>old view</p>".to_string()),
                footer: RefCell::new(("old footer".to_string(), "footer".to_string())),
                ..Default::default()
            }
        }

        fn respond(mut self, file: &str, result: Result<&str, FetchError>) -> Self {
            self.responses
                .insert(format!("{}{}", SHELL, file), result.map(String::from));
            self
        }
    }

    impl ViewHost for MockHost {
        type Node = String;

        fn shell_url(&self) -> String {
            SHELL.to_string()
        }

        fn location_hash(&self) -> String {
            self.hash.clone()
        }

        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::NetworkError("unreachable".to_string())))
        }

        async fn sleep(&self, ms: u32) {
            self.ops.borrow_mut().push(format!("sleep {}", ms));
            tokio::task::yield_now().await;
        }

        fn add_root_class(&self, class: &str) {
            self.ops.borrow_mut().push(format!("+{}", class));
            self.classes.borrow_mut().insert(class.to_string());
        }

        fn remove_root_class(&self, class: &str) {
            self.ops.borrow_mut().push(format!("-{}", class));
            self.classes.borrow_mut().remove(class);
        }

        fn reflow(&self) {
            self.ops.borrow_mut().push("reflow".to_string());
        }

        fn replace_view(&self, html: &str) {
            *self.mount.borrow_mut() = html.to_string();
        }

        fn replace_footer(&self, footer: Option<&ViewFooter>) {
            *self.footer.borrow_mut() = match footer {
                Some(f) if !f.class.is_empty() => (f.inner_html.clone(), f.class.clone()),
                Some(f) => (f.inner_html.clone(), "footer".to_string()),
                None => (String::new(), "footer".to_string()),
            };
        }

        fn push_history(&self, view: &str, url: &str) {
            self.history
                .borrow_mut()
                .push((view.to_string(), url.to_string()));
        }

        fn mount_node(&self) -> Option<String> {
            Some(self.mount.borrow().clone())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingBehaviors {
        seen: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl SubtreeInit<String> for RecordingBehaviors {
        fn init_subtree(&self, root: &String) -> Result<(), BehaviorError> {
            self.seen.borrow_mut().push(root.clone());
            if self.fail {
                Err(BehaviorError::Dom("boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    const ABOUT: &str = r#"<html><body>
        <main data-view="about"><h1>About</h1>
            <div data-view-footer class="footer footer--about">about footer</div>
        </main></body></html>"#;
    const CV: &str = r#"<main data-view="cv"><h1>CV</h1></main>"#;

    fn router(host: MockHost) -> (Router<MockHost>, RecordingBehaviors) {
        let behaviors = RecordingBehaviors::default();
        let router = Router::new(host, RouterConfig::default()).with_behaviors(behaviors.clone());
        (router, behaviors)
    }

    #[tokio::test]
    async fn test_load_view_swaps_content() {
        let (router, behaviors) = router(MockHost::new().respond("views/about.html", Ok(ABOUT)));

        let loaded = router
            .load_view("about.html", LoadOptions::default())
            .await
            .unwrap();

        let host = router.host();
        assert_eq!(loaded.as_str(), "views/about.html");
        assert_eq!(
            *host.requested.borrow(),
            vec!["https://site.test/views/about.html".to_string()]
        );
        assert!(host.mount.borrow().starts_with("<main data-view=\"about\">"));
        assert!(!host.mount.borrow().contains("about footer"));
        assert_eq!(
            *host.footer.borrow(),
            ("about footer".to_string(), "footer footer--about".to_string())
        );
        assert_eq!(
            *host.history.borrow(),
            vec![(
                "views/about.html".to_string(),
                "https://site.test/#/views/about.html".to_string()
            )]
        );
        assert_eq!(behaviors.seen.borrow().len(), 1);
        assert!(behaviors.seen.borrow()[0].contains("<h1>About</h1>"));
        assert!(host.classes.borrow().is_empty());
        assert_eq!(router.transition().phase(), TransitionPhase::Steady);
    }

    #[tokio::test]
    async fn test_transition_class_sequence() {
        let (router, _) = router(MockHost::new().respond("views/cv.html", Ok(CV)));

        router.load_view("#/views/cv.html", LoadOptions::replay()).await.unwrap();

        let expected: Vec<String> = [
            format!("-{}", ENTERING),
            format!("-{}", PRE_ENTERING),
            format!("+{}", LEAVING),
            "reflow".to_string(),
            "sleep 180".to_string(),
            format!("-{}", LEAVING),
            format!("+{}", PRE_ENTERING),
            "reflow".to_string(),
            format!("+{}", ENTERING),
            format!("-{}", PRE_ENTERING),
            "sleep 240".to_string(),
            format!("-{}", ENTERING),
        ]
        .into_iter()
        .collect();
        assert_eq!(*router.host().ops.borrow(), expected);
    }

    #[tokio::test]
    async fn test_replay_does_not_push_history() {
        let (router, _) = router(MockHost::new().respond("views/cv.html", Ok(CV)));

        router.load_view("cv.html", LoadOptions::replay()).await.unwrap();

        assert!(router.host().history.borrow().is_empty());
        assert_eq!(*router.host().mount.borrow(), CV);
        assert_eq!(
            *router.host().footer.borrow(),
            (String::new(), "footer".to_string())
        );
    }

    #[tokio::test]
    async fn test_http_error_keeps_previous_view() {
        let (router, behaviors) = router(
            MockHost::new().respond("views/missing.html", Err(FetchError::HttpError(404))),
        );

        let err = router
            .load_view("missing.html", LoadOptions::default())
            .await
            .unwrap_err();

        let host = router.host();
        assert_eq!(
            err,
            NavigationError::Fetch {
                path: "views/missing.html".to_string(),
                source: FetchError::HttpError(404),
            }
        );
        assert_eq!(*host.mount.borrow(), "<p>old view</p>");
        assert_eq!(
            *host.footer.borrow(),
            ("old footer".to_string(), "footer".to_string())
        );
        assert!(host.history.borrow().is_empty());
        assert!(host.classes.borrow().is_empty());
        assert!(behaviors.seen.borrow().is_empty());
        assert_eq!(router.transition().phase(), TransitionPhase::Steady);
    }

    #[tokio::test]
    async fn test_network_error_is_not_retried() {
        let (router, _) = router(MockHost::new());

        let err = router
            .load_view("offline.html", LoadOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            NavigationError::Fetch {
                source: FetchError::NetworkError(_),
                ..
            }
        ));
        assert_eq!(router.host().requested.borrow().len(), 1);
        assert_eq!(*router.host().mount.borrow(), "<p>old view</p>");
    }

    #[tokio::test]
    async fn test_behavior_failure_is_swallowed() {
        let behaviors = RecordingBehaviors {
            fail: true,
            ..Default::default()
        };
        let router = Router::new(
            MockHost::new().respond("views/cv.html", Ok(CV)),
            RouterConfig::default(),
        )
        .with_behaviors(behaviors.clone());

        let loaded = router.load_view("cv.html", LoadOptions::default()).await;

        assert!(loaded.is_ok());
        assert_eq!(behaviors.seen.borrow().len(), 1);
        assert_eq!(router.host().history.borrow().len(), 1);
        assert!(router.host().classes.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_missing_behaviors_are_tolerated() {
        let router = Router::new(
            MockHost::new().respond("views/cv.html", Ok(CV)),
            RouterConfig::default(),
        );

        assert!(router.load_view("cv.html", LoadOptions::default()).await.is_ok());
        assert_eq!(*router.host().mount.borrow(), CV);
    }

    #[tokio::test]
    async fn test_newer_navigation_supersedes_older() {
        let (router, behaviors) = router(
            MockHost::new()
                .respond("views/about.html", Ok(ABOUT))
                .respond("views/cv.html", Ok(CV)),
        );

        let (first, second) = tokio::join!(
            router.load_view("about.html", LoadOptions::default()),
            router.load_view("cv.html", LoadOptions::default()),
        );

        assert_eq!(
            first,
            Err(NavigationError::Superseded("views/about.html".to_string()))
        );
        assert_eq!(second.unwrap().as_str(), "views/cv.html");

        let host = router.host();
        assert_eq!(*host.mount.borrow(), CV);
        assert_eq!(host.history.borrow().len(), 1);
        assert_eq!(host.history.borrow()[0].0, "views/cv.html");
        assert_eq!(behaviors.seen.borrow().len(), 1);
        assert!(host.classes.borrow().is_empty());
    }

    #[test]
    fn test_resolve_current_view() {
        let host = MockHost {
            hash: "#/views/projects.html".to_string(),
            ..MockHost::new()
        };
        let router = Router::new(host, RouterConfig::default());
        assert_eq!(router.resolve_current_view().as_str(), "views/projects.html");

        let router = Router::new(MockHost::new(), RouterConfig::default());
        assert_eq!(router.resolve_current_view().as_str(), "views/index.html");
    }
}
