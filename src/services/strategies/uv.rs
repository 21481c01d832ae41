//! UV 指令题
//!
//! 答案是一条单行命令，不经过正常的提交流程。

/// 构建 UV 命令
pub fn command(uv_url: &str) -> String {
    format!(r#"uv http get "{}" -H "Accept: application/json""#, uv_url)
}
