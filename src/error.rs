use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 测评内容获取错误
    Content(ContentError),
    /// 结果持久化错误
    Persistence(PersistenceError),
    /// 答题引擎状态机错误
    Engine(EngineError),
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Content(e) => write!(f, "内容错误: {}", e),
            AppError::Persistence(e) => write!(f, "持久化错误: {}", e),
            AppError::Engine(e) => write!(f, "引擎错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Content(e) => Some(e),
            AppError::Persistence(e) => Some(e),
            AppError::Engine(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 测评内容获取错误
///
/// 加载阶段的任何一种失败都意味着测评不可开始：
/// 不存在"部分可用"的测评。
#[derive(Debug)]
pub enum ContentError {
    /// 测评不存在
    AssessmentNotFound {
        assessment_id: String,
    },
    /// 内容请求失败
    FetchFailed {
        resource: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 内容解析失败
    DecodeFailed {
        resource: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 测评不包含任何题目
    EmptyAssessment {
        assessment_id: String,
    },
    /// 题目定义不合法
    InvalidQuestion {
        question_id: String,
        reason: String,
    },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::AssessmentNotFound { assessment_id } => {
                write!(f, "测评不存在: {}", assessment_id)
            }
            ContentError::FetchFailed { resource, source } => {
                write!(f, "内容请求失败 ({}): {}", resource, source)
            }
            ContentError::DecodeFailed { resource, source } => {
                write!(f, "内容解析失败 ({}): {}", resource, source)
            }
            ContentError::EmptyAssessment { assessment_id } => {
                write!(f, "测评 {} 不包含任何题目", assessment_id)
            }
            ContentError::InvalidQuestion {
                question_id,
                reason,
            } => {
                write!(f, "题目 {} 定义不合法: {}", question_id, reason)
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::FetchFailed { source, .. } | ContentError::DecodeFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 结果持久化错误
#[derive(Debug)]
pub enum PersistenceError {
    /// 测评结果写入失败
    ResultWriteFailed {
        assessment_id: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 审计事件写入失败
    ActivityWriteFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::ResultWriteFailed {
                assessment_id,
                source,
            } => {
                write!(f, "测评结果写入失败 (测评: {}): {}", assessment_id, source)
            }
            PersistenceError::ActivityWriteFailed { source } => {
                write!(f, "审计事件写入失败: {}", source)
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::ResultWriteFailed { source, .. }
            | PersistenceError::ActivityWriteFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 答题引擎状态机错误
#[derive(Debug)]
pub enum EngineError {
    /// 当前状态不允许该操作
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    /// 选项索引超出范围
    OptionOutOfRange {
        index: usize,
        option_count: usize,
    },
    /// 游标指向不存在的题目
    CursorOutOfRange {
        section_index: usize,
        question_index: usize,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidTransition { action, state } => {
                write!(f, "状态 {} 下不允许操作 {}", state, action)
            }
            EngineError::OptionOutOfRange {
                index,
                option_count,
            } => {
                write!(f, "选项索引 {} 超出范围 [0, {})", index, option_count)
            }
            EngineError::CursorOutOfRange {
                section_index,
                question_index,
            } => {
                write!(
                    f,
                    "游标 ({}, {}) 指向不存在的题目",
                    section_index, question_index
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 门户模式下必须指定测评ID
    AssessmentIdRequired,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::AssessmentIdRequired => {
                write!(f, "门户模式下必须设置 ASSESSMENT_ID")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let resource = err.url().map(|u| u.to_string()).unwrap_or_default();
        AppError::Content(ContentError::FetchFailed {
            resource,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Content(ContentError::DecodeFailed {
            resource: String::new(), // JSON错误通常不包含来源信息
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建测评不存在错误
    pub fn assessment_not_found(assessment_id: impl Into<String>) -> Self {
        AppError::Content(ContentError::AssessmentNotFound {
            assessment_id: assessment_id.into(),
        })
    }

    /// 创建内容请求失败错误
    pub fn fetch_failed(
        resource: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Content(ContentError::FetchFailed {
            resource: resource.into(),
            source: Box::new(source),
        })
    }

    /// 创建题目定义不合法错误
    pub fn invalid_question(question_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Content(ContentError::InvalidQuestion {
            question_id: question_id.into(),
            reason: reason.into(),
        })
    }

    /// 创建测评结果写入失败错误
    pub fn result_write_failed(
        assessment_id: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Persistence(PersistenceError::ResultWriteFailed {
            assessment_id: assessment_id.into(),
            source: Box::new(source),
        })
    }

    /// 创建审计事件写入失败错误
    pub fn activity_write_failed(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Persistence(PersistenceError::ActivityWriteFailed {
            source: Box::new(source),
        })
    }

    /// 创建文件写入失败错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
