/*! Integration tests for jsonpacket.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - packet: Tests for the Packet container, organized by concern
 *   (round trips, materialization, defaults and failures, casts, storage, rendering)
 * - shape: Tests for runtime shape descriptors read through a packet
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("jsonpacket=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}
