pub mod types;
pub mod sanitize;
pub mod policy;
pub mod scope;

pub use policy::PolicyDocument;
pub use sanitize::{normalize_text, sanitize_user_input};
pub use scope::ScopeScreener;
pub use types::{PolicyError, PolicyProvider, PolicyVerdict, ScopeDecision};
