mod common;

use std::sync::Arc;

use common::{sample_catalog, sample_snippets, FixedIndex};
use serde_json::json;
use shopchat::error::ChatbotError;
use shopchat::retrieval::SemanticRetriever;
use shopchat::structured::StructuredQueryEngine;
use shopchat::tools::{
    catalog_tools, format_tools_for_llm, ToolFuture, ToolHandler, ToolRegistry, ToolSpec,
    PRODUCT_SEARCH_DESCRIPTION, PRODUCT_SEARCH_TOOL, STRUCTURED_QUERY_DESCRIPTION,
    STRUCTURED_QUERY_TOOL,
};

fn registry() -> ToolRegistry {
    let index = Arc::new(FixedIndex {
        snippets: sample_snippets(),
    });
    catalog_tools(
        Arc::new(SemanticRetriever::new(index)),
        Arc::new(StructuredQueryEngine::new(sample_catalog())),
    )
}

fn echo_tool(name: &str, reply: &'static str) -> ToolSpec {
    let handler: ToolHandler = Box::new(move |_query: String| -> ToolFuture {
        Box::pin(async move { Ok(reply.to_string()) })
    });
    ToolSpec::text_tool(name, "echo", "anything", handler)
}

#[test]
fn test_catalog_tools_are_registered_in_order() {
    let registry = registry();
    assert_eq!(registry.names(), vec![PRODUCT_SEARCH_TOOL, STRUCTURED_QUERY_TOOL]);
}

#[test]
fn test_format_tools_for_llm() {
    let definitions = format_tools_for_llm(&registry());
    assert_eq!(definitions.len(), 2);
    assert_eq!(definitions[0]["type"], "function");
    assert_eq!(definitions[0]["function"]["name"], PRODUCT_SEARCH_TOOL);
    assert_eq!(definitions[0]["function"]["description"], PRODUCT_SEARCH_DESCRIPTION);
    assert_eq!(definitions[1]["function"]["description"], STRUCTURED_QUERY_DESCRIPTION);
    assert_eq!(
        definitions[1]["function"]["parameters"]["required"],
        json!(["query"])
    );
}

#[test]
fn test_validate_arguments_success() {
    let registry = registry();
    let result = registry.validate_arguments(PRODUCT_SEARCH_TOOL, &json!({ "query": "jeans" }));
    assert!(result.is_ok());
}

#[test]
fn test_validate_arguments_missing_query() {
    let registry = registry();
    let result = registry.validate_arguments(PRODUCT_SEARCH_TOOL, &json!({}));
    assert!(result.is_err());
}

#[test]
fn test_validate_arguments_wrong_type() {
    let registry = registry();
    let result = registry.validate_arguments(STRUCTURED_QUERY_TOOL, &json!({ "query": 42 }));
    assert!(result.is_err());
}

#[test]
fn test_validate_arguments_rejects_extra_properties() {
    let registry = registry();
    let result = registry.validate_arguments(
        STRUCTURED_QUERY_TOOL,
        &json!({ "query": "price range", "limit": 3 }),
    );
    assert!(result.is_err());
}

#[test]
fn test_validate_arguments_unknown_tool() {
    let result = registry().validate_arguments("nope", &json!({ "query": "x" }));
    assert!(result.unwrap_err().contains("not found"));
}

#[test]
fn test_parse_query() {
    let registry = registry();
    assert_eq!(
        registry.parse_query(PRODUCT_SEARCH_TOOL, r#"{"query": "red shoes"}"#),
        Ok("red shoes".to_string())
    );
    assert!(registry
        .parse_query(PRODUCT_SEARCH_TOOL, "{broken")
        .unwrap_err()
        .contains("failed to parse arguments"));
}

#[test]
fn test_register_replaces_same_name() {
    let mut registry = ToolRegistry::new();
    registry.register(echo_tool("echo", "first"));
    registry.register(echo_tool("other", "x"));
    registry.register(echo_tool("echo", "second"));
    assert_eq!(registry.names(), vec!["other", "echo"]);
}

#[tokio::test]
async fn test_call_product_search() {
    let output = registry().call(PRODUCT_SEARCH_TOOL, "jeans").await.unwrap();
    let blocks: Vec<&str> = output.split("\n\n").collect();
    assert_eq!(blocks.len(), 3);
    assert!(blocks[1].starts_with("Product Name: Slim Jeans"));
    assert!(blocks[1].ends_with("Source: https://www.flipkart.com/slim-jeans"));
}

#[tokio::test]
async fn test_call_structured_query() {
    let output = registry()
        .call(STRUCTURED_QUERY_TOOL, "products under 1000")
        .await
        .unwrap();
    assert_eq!(output, "There are 2 products under ₹1000.");
}

#[tokio::test]
async fn test_call_unknown_tool() {
    let err = registry().call("missing", "x").await.unwrap_err();
    assert!(matches!(err, ChatbotError::UnknownTool(ref name) if name == "missing"));
}
