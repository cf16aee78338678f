pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{TEST_COOKIE_SECRET, TEST_PASSWORD},
        test_setup_with_tables, test_setup_with_user_tables, TestBuilder, TestContext, TestError,
    };
}

/// Creates a [`TestContext`] with the given entity tables.
#[macro_export]
macro_rules! test_setup_with_tables {
    () => {{
        $crate::TestBuilder::new().build().await
    }};

    ($($entity:expr),+ $(,)?) => {{
        $crate::TestBuilder::new()
            $(.with_table($entity))+
            .build()
            .await
    }};
}

/// Creates a [`TestContext`] with the user table plus any extra entity tables.
#[macro_export]
macro_rules! test_setup_with_user_tables {
    () => {{
        $crate::TestBuilder::new().with_user_tables().build().await
    }};

    ($($entity:expr),+ $(,)?) => {{
        $crate::TestBuilder::new()
            .with_user_tables()
            $(.with_table($entity))+
            .build()
            .await
    }};
}
