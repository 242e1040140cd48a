pub mod output;

pub use output::{
    display_answer, display_error, display_report, display_tool_invocation, display_welcome,
    EXAMPLE_QUESTIONS,
};
