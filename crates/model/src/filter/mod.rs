pub mod condition;
pub mod error;
pub mod node;
pub mod operator;
