/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 候选人ID（写入测评结果与审计事件）
    pub candidate_id: String,
    /// 要参加的测评ID（本地模式下留空则自动选择第一个）
    pub assessment_id: String,
    /// 门户API地址（留空则使用本地内容目录模式）
    pub portal_api_base_url: String,
    /// 门户API令牌
    pub portal_api_token: String,
    /// 本地模式：测评定义TOML存放目录
    pub content_folder: String,
    /// 本地模式：测评结果输出文件（JSON Lines）
    pub result_file: String,
    /// 本地模式：审计事件输出文件（JSON Lines）
    pub activity_file: String,
    /// 及格线（百分比）
    pub pass_threshold: u32,
    /// 洗牌种子（调试用，生产环境留空）
    pub shuffle_seed: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            candidate_id: "demo-candidate".to_string(),
            assessment_id: String::new(),
            portal_api_base_url: String::new(),
            portal_api_token: String::new(),
            content_folder: "assessments_toml".to_string(),
            result_file: "results.jsonl".to_string(),
            activity_file: "activity.jsonl".to_string(),
            pass_threshold: 70,
            shuffle_seed: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            candidate_id: std::env::var("CANDIDATE_ID").unwrap_or(default.candidate_id),
            assessment_id: std::env::var("ASSESSMENT_ID").unwrap_or(default.assessment_id),
            portal_api_base_url: std::env::var("PORTAL_API_BASE_URL").unwrap_or(default.portal_api_base_url),
            portal_api_token: std::env::var("PORTAL_API_TOKEN").unwrap_or(default.portal_api_token),
            content_folder: std::env::var("CONTENT_FOLDER").unwrap_or(default.content_folder),
            result_file: std::env::var("RESULT_FILE").unwrap_or(default.result_file),
            activity_file: std::env::var("ACTIVITY_FILE").unwrap_or(default.activity_file),
            pass_threshold: std::env::var("PASS_THRESHOLD").ok().and_then(|v| v.parse().ok()).unwrap_or(default.pass_threshold),
            shuffle_seed: std::env::var("SHUFFLE_SEED").ok().and_then(|v| v.parse().ok()),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 是否为门户模式（配置了远端API地址）
    pub fn is_portal_mode(&self) -> bool {
        !self.portal_api_base_url.is_empty()
    }
}
