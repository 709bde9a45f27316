//! # Server-Side State With Live View Scopes
//!
//! Saved views reference view scopes held by vs-03. Evicting the last saved
//! view that references a scope must destroy the beans living in it.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::{RequestContext, Session, SystemTimeSource, SerializedView, ViewScopeProvider};
    use vs_02_state_cache::{
        KeyStrategy, ServerStateConfig, StateCache, StateCacheError, StateCacheService, StateConfig,
    };
    use vs_03_scope_storage::{
        BeanHolderViewScopeProvider, BeanManager, CreationalContext, FlowScopeContext, Flow,
        ScopeConfig, ScopeContext, ViewScopeBeanHolder, ViewScopeContext,
    };

    use crate::integration::support::{init_tracing, label, request, Beans, RecordingBean};

    // =========================================================================
    // FIXTURES
    // =========================================================================

    struct App {
        beans: Arc<dyn BeanManager>,
        provider: Arc<BeanHolderViewScopeProvider>,
        cache: StateCacheService,
        view_scope: ViewScopeContext,
    }

    impl App {
        fn new(server: ServerStateConfig, beans: &[&Arc<RecordingBean>]) -> Self {
            init_tracing();
            let beans = Beans::of(beans);
            let provider = Arc::new(BeanHolderViewScopeProvider::new(Arc::clone(&beans)));
            let cache = StateCacheService::new(
                StateConfig::default().with_server(server),
                Some(Arc::clone(&provider) as Arc<dyn ViewScopeProvider>),
                Arc::new(SystemTimeSource),
            )
            .unwrap();
            Self {
                view_scope: ViewScopeContext::new(Arc::clone(&beans)),
                beans,
                provider,
                cache,
            }
        }

        /// Open a fresh view scope for the request.
        fn open_view_scope(&self, ctx: &mut RequestContext) -> String {
            let id = self.provider.generate_view_scope_id(ctx.session());
            self.provider.create_view_scope_map(ctx.session(), &id);
            ctx.set_view_scope_id(Some(id.clone()));
            id
        }

        /// Touch `bean` in the view scope, if the request has one, and save the page.
        fn render(&self, ctx: &mut RequestContext, bean: &Arc<RecordingBean>) -> String {
            if self.view_scope.is_active(ctx) {
                self.view_scope
                    .get(ctx, &bean.handle(), CreationalContext::new_shared())
                    .unwrap();
            }
            let view_id = ctx.view_id().unwrap_or("/page.xhtml").to_string();
            self.cache
                .save_serialized_view(ctx, page(&view_id))
                .unwrap()
        }

        fn restore(&self, session: &Arc<Session>, view_id: &str, token: &str) -> Option<Arc<SerializedView>> {
            self.cache
                .restore_serialized_view(&mut request(session, view_id), view_id, token)
                .unwrap()
        }
    }

    fn page(view_id: &str) -> SerializedView {
        SerializedView::new(view_id)
            .with_tree_structure(b"<h:form id=\"f\"/>".to_vec())
            .with_component_state("f", view_id.as_bytes().to_vec())
    }

    // =========================================================================
    // BOUNDS AND VIEW SCOPE TEARDOWN
    // =========================================================================

    #[test]
    fn test_total_bound_destroys_evicted_view_scope() {
        let bean = RecordingBean::new("form");
        let app = App::new(ServerStateConfig::default().with_views_in_session(1), &[&bean]);
        let session = Session::new_shared();

        let mut first = request(&session, "/page.xhtml");
        let scope_a = app.open_view_scope(&mut first);
        let t1 = app.render(&mut first, &bean);
        assert!(bean.destroyed().is_empty());

        let mut second = request(&session, "/page.xhtml");
        app.open_view_scope(&mut second);
        let t2 = app.render(&mut second, &bean);

        assert_eq!(bean.destroyed(), vec!["form#1".to_string()]);
        assert!(!app.provider.restore_view_scope_map(&session, &scope_a));
        assert!(app.restore(&session, "/page.xhtml", &t1).is_none());
        assert!(app.restore(&session, "/page.xhtml", &t2).is_some());
    }

    #[test]
    fn test_shared_view_scope_survives_partial_eviction() {
        let bean = RecordingBean::new("form");
        let app = App::new(ServerStateConfig::default().with_views_in_session(1), &[&bean]);
        let session = Session::new_shared();

        let mut first = request(&session, "/page.xhtml");
        let scope_a = app.open_view_scope(&mut first);
        app.render(&mut first, &bean);

        let mut ajax = request(&session, "/page.xhtml").with_view_scope_id(scope_a.clone());
        app.render(&mut ajax, &bean);
        assert!(bean.destroyed().is_empty());
        assert_eq!(bean.created(), 1);

        let mut other = request(&session, "/page.xhtml");
        app.open_view_scope(&mut other);
        app.render(&mut other, &bean);

        assert_eq!(bean.destroyed(), vec!["form#1".to_string()]);
    }

    #[test]
    fn test_sequential_chain_bound() {
        let bean = RecordingBean::new("form");
        let app = App::new(
            ServerStateConfig::default()
                .with_views_in_session(2)
                .with_sequential_views_in_session(1),
            &[&bean],
        );
        let session = Session::new_shared();

        let t1 = app.render(&mut request(&session, "/page.xhtml"), &bean);
        let t3 = app.render(&mut request(&session, "/page.xhtml"), &bean);

        let mut postback = request(&session, "/page.xhtml");
        assert!(app
            .cache
            .restore_serialized_view(&mut postback, "/page.xhtml", &t1)
            .unwrap()
            .is_some());
        let t2 = app.render(&mut postback, &bean);

        assert!(app.restore(&session, "/page.xhtml", &t1).is_none());
        assert!(app.restore(&session, "/page.xhtml", &t3).is_some());
        assert!(app.restore(&session, "/page.xhtml", &t2).is_some());
    }

    #[test]
    fn test_cross_view_token_rejected_without_side_effects() {
        let bean = RecordingBean::new("form");
        let app = App::new(
            ServerStateConfig::default().with_key_strategy(KeyStrategy::Random),
            &[&bean],
        );
        let session = Session::new_shared();

        let mut ctx = request(&session, "/a.xhtml");
        app.open_view_scope(&mut ctx);
        let token = app.render(&mut ctx, &bean);

        assert!(app.restore(&session, "/b.xhtml", &token).is_none());
        let restored = app.restore(&session, "/a.xhtml", &token).unwrap();
        assert_eq!(restored.view_id(), "/a.xhtml");
        assert!(bean.destroyed().is_empty());
    }

    #[test]
    fn test_token_from_other_session_rejected() {
        let bean = RecordingBean::new("form");
        let app = App::new(ServerStateConfig::default().with_encrypted_token(true), &[&bean]);
        let alice = Session::new_shared();
        let mallory = Session::new_shared();

        let token = app.render(&mut request(&alice, "/page.xhtml"), &bean);

        assert!(app.restore(&mallory, "/page.xhtml", &token).is_none());
        assert!(app.restore(&alice, "/page.xhtml", &token).is_some());
    }

    // =========================================================================
    // SESSION END
    // =========================================================================

    #[test]
    fn test_session_destroyed_tears_down_every_scope() {
        let form = RecordingBean::new("form");
        let wizard = RecordingBean::new("wizard");
        let app = App::new(ServerStateConfig::default(), &[&form, &wizard]);
        let flow_scope = FlowScopeContext::new(Arc::clone(&app.beans), ScopeConfig::default());
        let session = Session::new_shared();

        let mut ctx = request(&session, "/page.xhtml").with_client_window_id("w1");
        app.open_view_scope(&mut ctx);
        let token = app.render(&mut ctx, &form);

        let checkout = Flow::builder("checkout").build().unwrap();
        flow_scope
            .holder(&ctx)
            .unwrap()
            .create_current_flow_scope(&ctx, &checkout)
            .unwrap();
        let cart = flow_scope
            .get(&ctx, &wizard.handle(), CreationalContext::new_shared())
            .unwrap();
        assert_eq!(label(&cart), "wizard#1");

        app.cache.session_destroyed(&session);

        assert_eq!(form.destroyed(), vec!["form#1".to_string()]);
        assert_eq!(wizard.destroyed(), vec!["wizard#1".to_string()]);
        assert!(!session.is_valid());
        assert!(ViewScopeBeanHolder::existing(&session).is_none());
        assert!(app.restore(&session, "/page.xhtml", &token).is_none());
    }

    #[test]
    fn test_request_finishing_after_session_teardown_leaves_nothing_behind() {
        let form = RecordingBean::new("form");
        let app = App::new(ServerStateConfig::default(), &[&form]);
        let session = Session::new_shared();
        let mut late = request(&session, "/page.xhtml");
        app.open_view_scope(&mut late);
        app.view_scope
            .get(&late, &form.handle(), CreationalContext::new_shared())
            .unwrap();

        app.cache.session_destroyed(&session);
        assert_eq!(form.destroyed(), vec!["form#1".to_string()]);

        let saved = app.cache.save_serialized_view(&mut late, page("/page.xhtml"));
        assert!(matches!(saved, Err(StateCacheError::SessionInvalidated(_))));
        assert!(!app.view_scope.is_active(&late));
        let again = request(&session, "/page.xhtml");
        let reopened = app.provider.generate_view_scope_id(again.session());
        app.provider.create_view_scope_map(again.session(), &reopened);

        assert!(ViewScopeBeanHolder::existing(&session).is_none());
        assert!(session.extensions().is_empty());
        assert_eq!(form.destroyed(), vec!["form#1".to_string()]);
    }

    #[test]
    fn test_concurrent_requests_share_one_view_instance() {
        let bean = RecordingBean::new("form");
        let app = Arc::new(App::new(ServerStateConfig::default(), &[&bean]));
        let session = Session::new_shared();
        let mut first = request(&session, "/page.xhtml");
        let scope = app.open_view_scope(&mut first);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let app = Arc::clone(&app);
                let session = Arc::clone(&session);
                let scope = scope.clone();
                let bean = Arc::clone(&bean);
                std::thread::spawn(move || {
                    let ctx = request(&session, "/page.xhtml").with_view_scope_id(scope);
                    let instance = app
                        .view_scope
                        .get(&ctx, &bean.handle(), CreationalContext::new_shared())
                        .unwrap();
                    label(&instance)
                })
            })
            .collect();
        let labels: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(labels.iter().all(|l| l == &labels[0]));
        assert_eq!(bean.destroyed().len(), bean.created() - 1);
    }
}
