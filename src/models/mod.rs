mod message;
mod product;
mod session;
mod tool;

pub use message::{Message, Role};
pub use product::{format_amount, format_rating, ProductRecord};
pub use session::{verify_tool_correlation, Session};
pub use tool::{FunctionCall, ToolCall};
