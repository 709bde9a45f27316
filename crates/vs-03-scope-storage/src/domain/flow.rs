//! # Flow Definitions
//!
//! A flow is an immutable value describing a multi-page flow. Instances of
//! its flow scope are keyed per client window, see
//! [`Flow::client_window_flow_id`].

use std::collections::HashSet;
use std::fmt;

use super::errors::ScopeError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Flow {
    id: String,
    defining_document_id: String,
    start_node_id: String,
    inbound_parameters: Vec<String>,
}

impl Flow {
    pub fn builder(id: impl Into<String>) -> FlowBuilder {
        FlowBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Document that defines the flow; empty for flows defined in code.
    pub fn defining_document_id(&self) -> &str {
        &self.defining_document_id
    }

    pub fn start_node_id(&self) -> &str {
        &self.start_node_id
    }

    pub fn inbound_parameters(&self) -> &[String] {
        &self.inbound_parameters
    }

    /// Flow-map key of this flow within `client_window`.
    pub fn client_window_flow_id(&self, client_window: &str) -> String {
        format!(
            "{}_{}_{}",
            client_window, self.defining_document_id, self.id
        )
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.defining_document_id.is_empty() {
            f.write_str(&self.id)
        } else {
            write!(f, "{}:{}", self.defining_document_id, self.id)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlowBuilder {
    id: String,
    defining_document_id: String,
    start_node_id: Option<String>,
    inbound_parameters: Vec<String>,
}

impl FlowBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn defining_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.defining_document_id = document_id.into();
        self
    }

    /// Defaults to a node named after the flow.
    pub fn start_node(mut self, node_id: impl Into<String>) -> Self {
        self.start_node_id = Some(node_id.into());
        self
    }

    pub fn inbound_parameter(mut self, name: impl Into<String>) -> Self {
        self.inbound_parameters.push(name.into());
        self
    }

    pub fn build(self) -> Result<Flow, ScopeError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ScopeError::InvalidFlow("flow id is empty".into()));
        }

        let start_node_id = match self.start_node_id {
            Some(node) if node.trim().is_empty() => {
                return Err(ScopeError::InvalidFlow(format!(
                    "flow {id} has an empty start node"
                )))
            }
            Some(node) => node,
            None => id.to_string(),
        };

        let mut seen = HashSet::new();
        for name in &self.inbound_parameters {
            if name.trim().is_empty() {
                return Err(ScopeError::InvalidFlow(format!(
                    "flow {id} has an unnamed inbound parameter"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ScopeError::InvalidFlow(format!(
                    "flow {id} declares inbound parameter {name} twice"
                )));
            }
        }

        Ok(Flow {
            id: id.to_string(),
            defining_document_id: self.defining_document_id,
            start_node_id,
            inbound_parameters: self.inbound_parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults_start_node() {
        let flow = Flow::builder("checkout").build().unwrap();
        assert_eq!(flow.start_node_id(), "checkout");
        assert_eq!(flow.defining_document_id(), "");
        assert_eq!(flow.to_string(), "checkout");
    }

    #[test]
    fn test_client_window_flow_id() {
        let flow = Flow::builder("checkout")
            .defining_document_id("shop")
            .build()
            .unwrap();
        assert_eq!(flow.client_window_flow_id("w1"), "w1_shop_checkout");
        assert_eq!(flow.to_string(), "shop:checkout");
    }

    #[test]
    fn test_rejects_empty_id() {
        let err = Flow::builder("  ").build().unwrap_err();
        assert!(matches!(err, ScopeError::InvalidFlow(_)));
    }

    #[test]
    fn test_rejects_duplicate_parameter() {
        let err = Flow::builder("checkout")
            .inbound_parameter("cart")
            .inbound_parameter("cart")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("cart"));
    }

    #[test]
    fn test_rejects_blank_start_node() {
        assert!(Flow::builder("checkout").start_node("").build().is_err());
    }

    #[test]
    fn test_keeps_parameter_order() {
        let flow = Flow::builder("checkout")
            .start_node("cart")
            .inbound_parameter("b")
            .inbound_parameter("a")
            .build()
            .unwrap();
        assert_eq!(flow.inbound_parameters(), &["b".to_string(), "a".to_string()]);
        assert_eq!(flow.start_node_id(), "cart");
    }
}
