//! # Integration Scenarios

#[cfg(test)]
mod support;

mod client_state;
mod flow_scope;
mod server_state;
