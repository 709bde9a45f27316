//! # Flow Scopes Per Client Window
//!
//! Each browser tab (client window) has its own flow instances. Only the
//! most recently used windows keep theirs.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::{RequestContext, Session};
    use vs_03_scope_storage::{
        CreationalContext, Flow, FlowScopeBeanHolder, FlowScopeContext, ScopeConfig, ScopeContext,
        ScopeError,
    };

    use crate::integration::support::{init_tracing, label, Beans, RecordingBean};

    fn checkout() -> Flow {
        Flow::builder("checkout")
            .defining_document_id("shop")
            .start_node("cart")
            .inbound_parameter("customer")
            .build()
            .unwrap()
    }

    fn tab(session: &Arc<Session>, window: &str) -> RequestContext {
        RequestContext::new(Arc::clone(session)).with_client_window_id(window)
    }

    fn context(bean: &Arc<RecordingBean>, windows: usize) -> FlowScopeContext {
        init_tracing();
        FlowScopeContext::new(
            Beans::of(&[bean]),
            ScopeConfig::default().with_client_windows(windows),
        )
    }

    fn enter(context: &FlowScopeContext, ctx: &RequestContext, bean: &Arc<RecordingBean>) -> String {
        context
            .holder(ctx)
            .unwrap()
            .create_current_flow_scope(ctx, &checkout())
            .unwrap();
        let instance = context
            .get(ctx, &bean.handle(), CreationalContext::new_shared())
            .unwrap();
        label(&instance)
    }

    #[test]
    fn test_windows_get_separate_instances() {
        let bean = RecordingBean::new("cart");
        let flows = context(&bean, 5);
        let session = Session::new_shared();

        let in_w1 = enter(&flows, &tab(&session, "w1"), &bean);
        let in_w2 = enter(&flows, &tab(&session, "w2"), &bean);
        let again_w1 = flows
            .get(&tab(&session, "w1"), &bean.handle(), CreationalContext::new_shared())
            .unwrap();

        assert_ne!(in_w1, in_w2);
        assert_eq!(label(&again_w1), in_w1);
        assert_eq!(
            flows.holder(&tab(&session, "w1")).unwrap().get_active_flow_map_keys("w1"),
            vec!["w1_shop_checkout".to_string()]
        );
    }

    #[test]
    fn test_least_recent_window_loses_its_flows() {
        let bean = RecordingBean::new("cart");
        let flows = context(&bean, 2);
        let session = Session::new_shared();

        let in_w1 = enter(&flows, &tab(&session, "w1"), &bean);
        enter(&flows, &tab(&session, "w2"), &bean);
        assert!(bean.destroyed().is_empty());

        enter(&flows, &tab(&session, "w3"), &bean);

        assert_eq!(bean.destroyed(), vec![in_w1]);
        assert!(!flows.is_active(&tab(&session, "w1")));
        assert!(flows.is_active(&tab(&session, "w2")));
        assert!(flows.is_active(&tab(&session, "w3")));
        assert_eq!(
            flows
                .get(&tab(&session, "w1"), &bean.handle(), CreationalContext::new_shared())
                .unwrap_err(),
            ScopeError::ContextNotActive("flow")
        );
    }

    #[test]
    fn test_refreshed_window_outlives_idle_one() {
        let bean = RecordingBean::new("cart");
        let flows = context(&bean, 2);
        let session = Session::new_shared();

        let in_w1 = enter(&flows, &tab(&session, "w1"), &bean);
        let in_w2 = enter(&flows, &tab(&session, "w2"), &bean);
        assert!(flows.holder(&tab(&session, "w1")).unwrap().refresh_client_window("w1"));
        enter(&flows, &tab(&session, "w3"), &bean);

        assert_eq!(bean.destroyed(), vec![in_w2]);
        let kept = flows
            .get_if_exists(&tab(&session, "w1"), &bean.handle())
            .unwrap()
            .unwrap();
        assert_eq!(label(&kept), in_w1);
    }

    #[test]
    fn test_sessions_do_not_share_flows() {
        let bean = RecordingBean::new("cart");
        let flows = context(&bean, 1);
        let alice = Session::new_shared();
        let bob = Session::new_shared();

        let in_alice = enter(&flows, &tab(&alice, "w1"), &bean);
        let in_bob = enter(&flows, &tab(&bob, "w1"), &bean);

        assert_ne!(in_alice, in_bob);
        assert!(bean.destroyed().is_empty());
        assert!(!Arc::ptr_eq(
            &FlowScopeBeanHolder::existing(&alice).unwrap(),
            &FlowScopeBeanHolder::existing(&bob).unwrap()
        ));
    }
}
