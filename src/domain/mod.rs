//! Domain tool integrations
//!
//! Provides the fixed tool set exposed over the MCP protocol

pub mod tools;
