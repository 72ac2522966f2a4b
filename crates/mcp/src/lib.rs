// MCP (Model Context Protocol) server exposing the stock research tools

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::{research_tools, Tool, ToolRegistry};
