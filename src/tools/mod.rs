//! The two tools the model can call: semantic product search and
//! structured catalog queries.

mod registry;

pub use registry::{
    format_tools_for_llm, ToolFuture, ToolHandler, ToolRegistry, ToolSpec, QUERY_ARGUMENT,
};

use std::sync::Arc;

use crate::retrieval::SemanticRetriever;
use crate::structured::StructuredQueryEngine;

pub const PRODUCT_SEARCH_TOOL: &str = "ProductSearch";
pub const STRUCTURED_QUERY_TOOL: &str = "query_product_data";

pub const PRODUCT_SEARCH_DESCRIPTION: &str =
    "Use this to look up products from Flipkart by category, name, specs, etc.";
pub const STRUCTURED_QUERY_DESCRIPTION: &str =
    "Use this to answer product-wide questions like price range, top brands, and filtering.";

pub fn product_search_tool(retriever: Arc<SemanticRetriever>) -> ToolSpec {
    let handler: ToolHandler = Box::new(move |query: String| -> ToolFuture {
        let retriever = Arc::clone(&retriever);
        Box::pin(async move { retriever.search_text(&query).await })
    });
    ToolSpec::text_tool(
        PRODUCT_SEARCH_TOOL,
        PRODUCT_SEARCH_DESCRIPTION,
        "query to look up in the product catalog",
        handler,
    )
}

pub fn structured_query_tool(engine: Arc<StructuredQueryEngine>) -> ToolSpec {
    let handler: ToolHandler = Box::new(move |question: String| -> ToolFuture {
        let engine = Arc::clone(&engine);
        Box::pin(async move { Ok(engine.answer(&question)) })
    });
    ToolSpec::text_tool(
        STRUCTURED_QUERY_TOOL,
        STRUCTURED_QUERY_DESCRIPTION,
        "the product-wide question to compute over the dataset",
        handler,
    )
}

/// Registry holding exactly the two catalog tools.
pub fn catalog_tools(
    retriever: Arc<SemanticRetriever>,
    engine: Arc<StructuredQueryEngine>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(product_search_tool(retriever));
    registry.register(structured_query_tool(engine));
    registry
}
