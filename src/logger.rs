//! 日志初始化
//!
//! 使用 `tracing-subscriber`，默认级别 info，可通过 `RUST_LOG` 覆盖。

use tracing_subscriber::EnvFilter;

/// 初始化全局日志（重复调用不会 panic）
pub fn init() {
    init_with_verbose(false);
}

/// 初始化全局日志，`verbose` 为 true 时本 crate 输出 debug 级别
pub fn init_with_verbose(verbose: bool) {
    let default_directive = if verbose {
        "info,pdf_quiz_generator=debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
