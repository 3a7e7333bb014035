pub mod error;
pub mod escape;
pub mod extract;
pub mod node;
pub mod options;
pub mod render;
pub mod value;

// Re-export key types for easier usage
pub use error::NodeError;
pub use escape::escape;
pub use node::MarkupNode;
pub use options::{Declaration, Indent, Options, OptionsOverride, STANDARD_DECLARATION};
pub use value::{Element, Scalar, Value};
