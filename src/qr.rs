// src/qr.rs — 用 qrcode crate 生成模块矩阵（外部黑盒编码器）

use crate::types::GenError;
use qrcode::{EcLevel, QrCode};

/// 二维码模块矩阵：N×N 布尔网格，true 为深色模块
///
/// 生成后不可变，矩阵本身不含静区，静区由栅格化阶段补齐。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    pub fn new(size: usize, modules: Vec<bool>) -> Result<Self, GenError> {
        if size == 0 || modules.len() != size * size {
            return Err(GenError::InvalidParameter(format!(
                "matrix size mismatch: {size}x{size} grid vs {} modules",
                modules.len()
            )));
        }
        Ok(Self { size, modules })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.size + col]
    }

    /// logo 预留区半径（模块数）：至少 2，随符号规模增长
    pub fn logo_radius(&self) -> usize {
        (self.size / 8).max(2)
    }
}

/// 以最高纠错等级（H，约可容忍 30% 模块损毁）编码文本
pub fn encode(text: &str) -> Result<ModuleMatrix, GenError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)?;
    let size = code.width();
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    ModuleMatrix::new(size, modules)
}
