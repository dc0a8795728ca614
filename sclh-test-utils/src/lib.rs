pub mod builder;
pub mod constant;
pub mod context;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;

pub mod prelude {
    pub use crate::{fixtures::factory, TestBuilder, TestContext};
}
