//! # Integration Flows

mod broadcast_flows;
mod configuration_flows;
mod deliver_flows;
