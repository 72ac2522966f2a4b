pub mod analysts;
pub mod filings;
pub mod market;
pub mod news;
mod registry;

pub use analysts::AnalystRatingsTool;
pub use filings::SecFilingsTool;
pub use market::{CompareStocksTool, FetchStockDataTool, RunDcfTool};
pub use news::NewsTool;
pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_integer, json_schema_number,
    json_schema_object, json_schema_string, Tool, ToolRegistry,
};

use std::sync::Arc;
use stock_research_sdk::ResearchService;

/// Registry with the six research tools in their published order
pub fn research_tools(service: &ResearchService) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FetchStockDataTool::new(service.clone())));
    registry.register(Arc::new(RunDcfTool::new(service.clone())));
    registry.register(Arc::new(CompareStocksTool::new(service.clone())));
    registry.register(Arc::new(SecFilingsTool::new(service.clone())));
    registry.register(Arc::new(NewsTool::new(service.clone())));
    registry.register(Arc::new(AnalystRatingsTool::new(service.clone())));
    registry
}
