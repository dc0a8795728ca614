pub static TEST_USER_AGENT: &str =
    "sclh-tests/1.0 (contact@example.com; +https://github.com/kat1248/sclh)";
pub static TEST_DATASOURCE: &str = "tranquility";

/// Path prefix under which zKillboard endpoints are mocked on the shared server
pub static ZKILL_PREFIX: &str = "/zkill";
