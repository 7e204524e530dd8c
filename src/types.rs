// src/types.rs — 核心数据类型与错误定义

use thiserror::Error;

/// 服务端固定的模块像素宽度（CLI 可通过 -s 覆盖）
pub const DEFAULT_BOX_SIZE: u32 = 10;

/// 栅格化参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// 每个模块的像素边长
    pub box_size: u32,
    /// 静区宽度（模块数）
    pub border: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { box_size: DEFAULT_BOX_SIZE, border: 4 }
    }
}

/// logo 合成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoStrategy {
    /// 渲染完整矩阵后整块覆盖 logo，依赖 H 级纠错冗余
    Overlay,
    /// 渲染时跳过中心模块，为 logo 预留干净的空白区
    ReserveCenter,
}

/// logo 解码失败时的处理策略，按入口各自选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoPolicy {
    /// 在任何二维码工作开始前整体拒绝（HTTP 入口）
    FailFast,
    /// 记录告警后继续生成不带 logo 的二维码（CLI 入口）
    DegradeGracefully,
}

/// 生成过程中的结构化错误
#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid logo image: {0}")]
    InvalidLogo(String),

    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
