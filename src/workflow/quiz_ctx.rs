//! 页面处理上下文
//!
//! 封装"我正在用哪组凭据回答链路中的第几页"这一信息

use std::fmt::{self, Display};

/// 页面处理上下文
///
/// 包含处理单个测验页所需的所有上下文信息
#[derive(Clone)]
pub struct QuizCtx {
    /// 求解邮箱
    pub email: String,

    /// 共享密钥
    pub secret: String,

    /// 当前页面地址
    pub quiz_url: String,

    /// 在链路中的序号（从1开始，仅用于日志显示）
    pub hop: usize,
}

impl QuizCtx {
    /// 创建新的页面上下文
    pub fn new(email: String, secret: String, quiz_url: String, hop: usize) -> Self {
        Self {
            email,
            secret,
            quiz_url,
            hop,
        }
    }

    /// 同一组凭据下的下一页
    pub fn next(&self, quiz_url: String) -> Self {
        Self {
            email: self.email.clone(),
            secret: self.secret.clone(),
            quiz_url,
            hop: self.hop + 1,
        }
    }
}

impl Display for QuizCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[第 {} 页]", self.hop)
    }
}

// 密钥不进入日志
impl fmt::Debug for QuizCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizCtx")
            .field("email", &self.email)
            .field("secret", &"***")
            .field("quiz_url", &self.quiz_url)
            .field("hop", &self.hop)
            .finish()
    }
}
