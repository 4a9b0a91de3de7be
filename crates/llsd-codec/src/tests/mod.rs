
mod parse_bad;

/// Routes the parsers' `log` output to the test harness. Run with
/// `RUST_LOG=debug` to see parse counts and failure diagnostics.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
