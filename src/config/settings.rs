// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、作业存储、Webhook 投递、日志和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 作业存储配置
    pub storage: StorageSettings,
    /// Webhook 投递配置
    pub dispatch: DispatchSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 对外可见的根地址，用于拼接排队构建项的绝对 URL
    pub root_url: String,
}

/// 作业存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (file, memory)
    pub storage_type: String,
    /// 作业文件目录 (当 type=file 时使用)
    pub jobs_path: String,
}

/// Webhook 投递配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchSettings {
    /// `Accept` 头中携带的 API 版本
    pub api_version: String,
    /// 签名头名称
    pub signature_header: String,
    /// 出站请求的 User-Agent
    pub user_agent: String,
    /// 单次投递超时（秒）
    pub timeout_secs: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            api_version: "5.0-preview".to_string(),
            signature_header: "X-Teamhook-Signature".to_string(),
            user_agent: concat!("Teamhook-Webhook/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 默认过滤规则
    pub filter: String,
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `TEAMHOOK__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("TEAMHOOK").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let dispatch = DispatchSettings::default();
        Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root_url", "http://localhost:8080/")?
            // Default Storage settings
            .set_default("storage.storage_type", "file")?
            .set_default("storage.jobs_path", "./jobs")?
            // Default Dispatch settings
            .set_default("dispatch.api_version", dispatch.api_version)?
            .set_default("dispatch.signature_header", dispatch.signature_header)?
            .set_default("dispatch.user_agent", dispatch.user_agent)?
            .set_default("dispatch.timeout_secs", dispatch.timeout_secs)?
            // Default Logging settings
            .set_default("logging.filter", "info,teamhook=debug")?
            .set_default("logging.json", false)?
            // Default Metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}
