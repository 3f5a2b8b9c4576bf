//! 日志初始化
//!
//! 所有 crate 通过 `tracing` 输出日志，应用在入口处调用一次 [`init_logger`]。
//! `RUST_LOG` 环境变量优先于代码中给出的默认过滤规则。

use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub const DEFAULT_FILTER: &str = "info";

/// 以默认规则（`info`）初始化日志
///
/// 重复调用是安全的，只有第一次生效。
///
/// # 返回
///
/// 本次调用是否安装了全局 subscriber
pub fn init_logger() -> bool {
    init_logger_with_filter(DEFAULT_FILTER)
}

/// 以指定规则初始化日志
///
/// # 参数
///
/// - `directives`: `EnvFilter` 规则，如 `"motion_control=debug,info"`；
///   `RUST_LOG` 已设置时忽略，规则非法时退回 [`DEFAULT_FILTER`]
pub fn init_logger_with_filter(directives: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives))
        .try_init()
        .is_ok()
}

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_idempotent() {
        // 第一次可能被其他测试抢先，第二次一定失败
        let _ = init_logger_with_filter("motion_control=trace");
        assert!(!init_logger());
    }

    #[test]
    fn test_invalid_directives_fall_back() {
        // 不 panic 即可
        let _filter = build_filter("=[not a filter");
    }
}
