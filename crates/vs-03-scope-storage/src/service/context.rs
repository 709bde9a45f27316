//! # Scope Contexts
//!
//! Resolve the current scope of a request and hand out its instances.
//! View scope is selected by the request's view-scope id, flow scope by the
//! current flow of the request's client window.

use shared_types::RequestContext;
use std::fmt;
use std::sync::Arc;

use super::flow_holder::FlowScopeBeanHolder;
use super::view_holder::ViewScopeBeanHolder;
use crate::domain::{
    ContextualRef, ContextualStorage, CreationalContext, Instance, ScopeConfig, ScopeError,
};
use crate::ports::{BeanManager, ScopeContext};

fn existing_instance(
    storage: Option<Arc<ContextualStorage>>,
    bean: &ContextualRef,
) -> Result<Option<Instance>, ScopeError> {
    let Some(storage) = storage else {
        return Ok(None);
    };
    let key = storage.bean_key(bean)?;
    Ok(storage.get(&key))
}

pub struct ViewScopeContext {
    bean_manager: Arc<dyn BeanManager>,
}

impl ViewScopeContext {
    pub fn new(bean_manager: Arc<dyn BeanManager>) -> Self {
        Self { bean_manager }
    }

    fn storage(
        &self,
        ctx: &RequestContext,
        create_if_absent: bool,
    ) -> Result<Option<Arc<ContextualStorage>>, ScopeError> {
        let view_scope_id = ctx
            .view_scope_id()
            .ok_or(ScopeError::ContextNotActive("view"))?;
        let holder = if create_if_absent {
            ViewScopeBeanHolder::for_session(ctx.session(), &self.bean_manager)
        } else {
            ViewScopeBeanHolder::existing(ctx.session())
        };
        Ok(holder.and_then(|holder| holder.get_contextual_storage(view_scope_id, create_if_absent)))
    }
}

impl ScopeContext for ViewScopeContext {
    fn scope_name(&self) -> &'static str {
        "view"
    }

    fn is_active(&self, ctx: &RequestContext) -> bool {
        ctx.session().is_valid() && ctx.view_scope_id().is_some()
    }

    fn get(
        &self,
        ctx: &RequestContext,
        bean: &ContextualRef,
        creational_context: Arc<CreationalContext>,
    ) -> Result<Instance, ScopeError> {
        if !ctx.session().is_valid() {
            return Err(ScopeError::ContextNotActive("view"));
        }
        let storage = self
            .storage(ctx, true)?
            .ok_or(ScopeError::ContextNotActive("view"))?;
        storage.create_contextual_instance(bean, creational_context)
    }

    fn get_if_exists(
        &self,
        ctx: &RequestContext,
        bean: &ContextualRef,
    ) -> Result<Option<Instance>, ScopeError> {
        existing_instance(self.storage(ctx, false)?, bean)
    }
}

impl fmt::Debug for ViewScopeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewScopeContext").finish_non_exhaustive()
    }
}

pub struct FlowScopeContext {
    bean_manager: Arc<dyn BeanManager>,
    config: ScopeConfig,
}

impl FlowScopeContext {
    pub fn new(bean_manager: Arc<dyn BeanManager>, config: ScopeConfig) -> Self {
        Self {
            bean_manager,
            config,
        }
    }

    /// The session's flow holder, created on first use. `None` once the
    /// session is invalidated.
    pub fn holder(&self, ctx: &RequestContext) -> Option<Arc<FlowScopeBeanHolder>> {
        FlowScopeBeanHolder::for_session(ctx.session(), &self.bean_manager, &self.config)
    }
}

impl ScopeContext for FlowScopeContext {
    fn scope_name(&self) -> &'static str {
        "flow"
    }

    fn is_active(&self, ctx: &RequestContext) -> bool {
        ctx.session().is_valid()
            && FlowScopeBeanHolder::existing(ctx.session())
                .and_then(|holder| holder.current_flow_storage(ctx))
                .is_some()
    }

    fn get(
        &self,
        ctx: &RequestContext,
        bean: &ContextualRef,
        creational_context: Arc<CreationalContext>,
    ) -> Result<Instance, ScopeError> {
        if ctx.client_window_id().is_none() {
            return Err(ScopeError::MissingClientWindow);
        }
        let storage = self
            .holder(ctx)
            .and_then(|holder| holder.current_flow_storage(ctx))
            .ok_or(ScopeError::ContextNotActive("flow"))?;
        storage.create_contextual_instance(bean, creational_context)
    }

    fn get_if_exists(
        &self,
        ctx: &RequestContext,
        bean: &ContextualRef,
    ) -> Result<Option<Instance>, ScopeError> {
        let storage = FlowScopeBeanHolder::existing(ctx.session())
            .and_then(|holder| holder.current_flow_storage(ctx));
        existing_instance(storage, bean)
    }
}

impl fmt::Debug for FlowScopeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowScopeContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
