//! State Module - Typed variables and the expressions that read them.
//!
//! - **Store** - Id-addressed typed slots with interning and names
//! - **Expression** - Pure scalar evaluation over the store
//! - **Derived** - Slots recomputed from expressions and lookups each frame
//!
//! Components never hold values directly. They hold variable ids, and the
//! store is the only mutable state a document has.

mod derived;
mod expression;
mod store;
mod value;

pub use derived::*;
pub use expression::*;
pub use store::VariableStore;
pub use value::*;
