/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 日志级别由 `RUST_LOG` 控制（默认 info），
/// `RUST_LOG_FORMAT=json` 时输出 JSON 格式。
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let result = if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).try_init()
    };
    // 重复初始化（例如测试中）直接忽略
    let _ = result;
}

/// 记录程序启动信息
///
/// # 参数
/// - `bind_addr`: 监听地址
/// - `max_hops`: 单次求解最大页数
pub fn log_startup(bind_addr: &str, max_hops: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 测验链自动求解服务");
    info!("🌐 监听地址: {}", bind_addr);
    info!("🔗 单次最大页数: {}", max_hops);
    info!("{}", "=".repeat(60));
}

/// 记录链路开始信息
pub fn log_chain_start(email: &str, url: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始求解测验链");
    info!("📧 邮箱: {}", email);
    info!("📄 起始页面: {}", url);
    info!("{}", "=".repeat(60));
}

/// 记录链路完成信息
///
/// # 参数
/// - `hops`: 实际访问的页面数
/// - `terminal`: 终止状态描述
pub fn log_chain_complete(hops: usize, terminal: &str) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 测验链结束: 共 {} 页, 终止状态: {}", hops, terminal);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
