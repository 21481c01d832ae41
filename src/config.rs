/// 程序配置
///
/// 启动时构建一次，之后以引用或克隆的方式传入入口服务与遍历引擎，
/// 运行期间不可变。
#[derive(Clone, Debug)]
pub struct Config {
    /// 共享密钥（未配置时入口拒绝所有请求）
    pub secret: Option<String>,
    /// HTTP 入口监听地址
    pub bind_addr: String,
    /// 页面抓取超时（秒）
    pub fetch_timeout_secs: u64,
    /// 提交答案与下载资源的超时（秒）
    pub http_timeout_secs: u64,
    /// 单次求解最多访问的页面数
    pub max_hops: usize,
    // --- 浏览器配置 ---
    /// 是否优先使用无头浏览器渲染
    pub use_browser: bool,
    /// 已运行浏览器的调试端口（设置后连接而不是启动）
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<String>,
    /// 页面导航完成后额外等待脚本执行的毫秒数
    pub render_settle_ms: u64,
    // --- 题型相关 ---
    /// 音频题下载文件名
    pub audio_file: String,
    /// 音频题是否允许在终端等待人工输入
    pub interactive_audio: bool,
    /// UV 题找不到任何域名时使用的默认域名
    pub uv_default_origin: String,
    // --- 日志 ---
    /// 求解记录文件
    pub journal_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: None,
            bind_addr: "0.0.0.0:8000".to_string(),
            fetch_timeout_secs: 20,
            http_timeout_secs: 30,
            max_hops: 50,
            use_browser: true,
            browser_debug_port: None,
            chrome_executable: None,
            render_settle_ms: 200,
            audio_file: "quiz_audio.wav".to_string(),
            interactive_audio: true,
            uv_default_origin: "https://tds-llm-analysis.s-anand.net".to_string(),
            journal_file: "solve_runs.log".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            secret: env_string("QUIZ_SECRET")
                .or_else(|| env_string("TDS_SECRET"))
                .or(default.secret),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(default.bind_addr),
            fetch_timeout_secs: env_parse("FETCH_TIMEOUT_SECS").unwrap_or(default.fetch_timeout_secs),
            http_timeout_secs: env_parse("HTTP_TIMEOUT_SECS").unwrap_or(default.http_timeout_secs),
            max_hops: env_parse("MAX_HOPS").unwrap_or(default.max_hops),
            use_browser: env_parse("USE_BROWSER").unwrap_or(default.use_browser),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").or(default.browser_debug_port),
            chrome_executable: env_string("CHROME_EXECUTABLE").or(default.chrome_executable),
            render_settle_ms: env_parse("RENDER_SETTLE_MS").unwrap_or(default.render_settle_ms),
            audio_file: std::env::var("AUDIO_FILE").unwrap_or(default.audio_file),
            interactive_audio: env_parse("INTERACTIVE_AUDIO").unwrap_or(default.interactive_audio),
            uv_default_origin: std::env::var("UV_DEFAULT_ORIGIN").unwrap_or(default.uv_default_origin),
            journal_file: std::env::var("JOURNAL_FILE").unwrap_or(default.journal_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 使用指定密钥的配置（测试与嵌入调用时使用）
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert!(config.secret.is_none());
        assert_eq!(config.max_hops, 50);
        assert_eq!(config.audio_file, "quiz_audio.wav");
        assert!(config.use_browser);
    }

    #[test]
    fn test_with_secret_keeps_other_defaults() {
        let config = Config::with_secret("s3cr3t");
        assert_eq!(config.secret.as_deref(), Some("s3cr3t"));
        assert_eq!(config.fetch_timeout_secs, 20);
        assert_eq!(config.http_timeout_secs, 30);
    }
}
