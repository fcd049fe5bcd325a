// End-to-end integration tests for the Speecher job service API
//
// These tests use a shared testcontainers PostgreSQL instance with a database
// pool for test isolation. Each test receives its own isolated database from
// the pool, allowing tests to run in parallel without conflicts.
//
// The storage bucket and the speech model server are wiremock servers started
// per test, so every test can decide how the gateways answer.

mod helpers;
mod test_health;
