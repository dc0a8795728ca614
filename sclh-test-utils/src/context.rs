//! Test context produced by [`crate::TestBuilder::build`].

use mockito::{Mock, ServerGuard};

use crate::constant::ZKILL_PREFIX;

/// Mock server with the endpoints registered by the builder.
///
/// ESI endpoints live at the server root and zKillboard endpoints under
/// [`ZKILL_PREFIX`], so one server stands in for both providers.
pub struct TestContext {
    pub server: ServerGuard,
    pub mocks: Vec<Mock>,
}

impl TestContext {
    /// Base URL to configure the ESI client with
    pub fn esi_url(&self) -> String {
        self.server.url()
    }

    /// Base URL to configure the zKillboard client with
    pub fn zkill_url(&self) -> String {
        format!("{}{}", self.server.url(), ZKILL_PREFIX)
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
