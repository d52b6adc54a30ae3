//! 门户 API 执行器 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端资源，只暴露"调用门户 API"的能力

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// 门户 API 执行器
///
/// 职责：
/// - 持有唯一的 reqwest::Client 资源
/// - 暴露 get / post 能力
/// - 不认识 Assessment / Question
/// - 不处理业务流程
pub struct ApiExecutor {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiExecutor {
    /// 创建新的 API 执行器
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// 发送 GET 请求，返回原始响应
    ///
    /// # 参数
    /// - `path`: 相对于 base_url 的路径
    ///
    /// # 返回
    /// 返回响应对象（404 等状态由调用方判断）
    pub async fn get(&self, path: &str) -> AppResult<reqwest::Response> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .get(&url)
            .header("x-portal-token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::fetch_failed(&url, e))?;
        Ok(response)
    }

    /// 发送 GET 请求并反序列化为指定类型
    ///
    /// 非 2xx 状态视为请求失败。
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.get(path).await?.error_for_status()?;
        let typed_value = response.json().await?;
        Ok(typed_value)
    }

    /// 发送 POST 请求（JSON 载荷）并检查状态
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<StatusCode> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .header("x-portal-token", &self.token)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::fetch_failed(&url, e))?
            .error_for_status()?;
        Ok(response.status())
    }
}
