//! 共享测试工具

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::env;

use feedback_overlay_client::{ApiConfig, HttpFeedbackApi};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_env {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// Organization id used by the live tests.
pub fn test_org_id() -> String {
    env::var("FEEDBACK_API_TEST_ORG_ID").unwrap_or_default()
}

/// API client pointed at `FEEDBACK_API_BASE_URL` or production.
pub fn create_test_api() -> HttpFeedbackApi {
    let config = env::var("FEEDBACK_API_BASE_URL")
        .map(ApiConfig::new)
        .unwrap_or_default();
    HttpFeedbackApi::new(config).expect("failed to build client")
}
