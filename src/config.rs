// src/config.rs — 配置加载，支持文件覆盖

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 进程级不可变配置：启动时读取一次，此后不再变动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP 监听地址
    pub host: String,
    /// HTTP 监听端口
    pub port: u16,
    /// 调试日志开关
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            debug: false,
        }
    }
}

impl Config {
    /// 按优先级查找并加载配置文件
    pub fn load() -> Result<Self> {
        let candidates = config_candidates();
        for path in &candidates {
            if path.exists() {
                let text = std::fs::read_to_string(path)?;
                let cfg: Config = toml::from_str(&text)?;
                return Ok(cfg);
            }
        }
        Ok(Config::default())
    }
}

fn config_candidates() -> Vec<PathBuf> {
    let mut v = vec![];
    // 同目录下的 config.toml
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            v.push(dir.join("config.toml"));
        }
    }
    // ~/.config/qrlogo/config.toml
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".config/qrlogo/config.toml"));
    }
    v
}
