// src/generate.rs — 生成流水线：编码 → 栅格化 → logo 合成

use std::io::Cursor;

use crate::logo;
use crate::qr;
use crate::render;
use crate::types::{GenError, LogoPolicy, LogoStrategy, RenderOptions};
use image::{DynamicImage, ImageFormat, RgbImage};

/// 从 URL 生成二维码位图，可选叠加 logo
///
/// logo 先于任何二维码工作解码：FailFast 入口解码失败时直接拒绝整个请求。
/// ReserveCenter 下即使 logo 退化失败，预留的空白区也保持不变，
/// 与手工渲染工具的既有行为一致。
pub fn generate(
    url: &str,
    opts: &RenderOptions,
    logo_bytes: Option<&[u8]>,
    strategy: LogoStrategy,
    policy: LogoPolicy,
) -> Result<RgbImage, GenError> {
    let logo_img = decode_logo(logo_bytes, policy)?;
    let matrix = qr::encode(url)?;

    match strategy {
        LogoStrategy::Overlay => {
            let mut img = render::render(&matrix, opts, None)?;
            if let Some(logo) = &logo_img {
                logo::overlay_centered(&mut img, logo);
            }
            Ok(img)
        }
        LogoStrategy::ReserveCenter => {
            let radius = matrix.logo_radius();
            let mut img = render::render(&matrix, opts, Some(radius))?;
            if let Some(logo) = &logo_img {
                logo::paste_reserved(&mut img, logo, radius, opts.box_size);
            }
            Ok(img)
        }
    }
}

fn decode_logo(
    bytes: Option<&[u8]>,
    policy: LogoPolicy,
) -> Result<Option<DynamicImage>, GenError> {
    let Some(bytes) = bytes else { return Ok(None) };
    match image::load_from_memory(bytes) {
        Ok(img) => Ok(Some(img)),
        Err(e) => match policy {
            LogoPolicy::FailFast => Err(GenError::InvalidLogo(e.to_string())),
            LogoPolicy::DegradeGracefully => {
                tracing::warn!("logo 解码失败，继续生成不带 logo 的二维码: {e}");
                Ok(None)
            }
        },
    }
}

/// 将位图编码为 PNG 字节
pub fn to_png_bytes(img: &RgbImage) -> Result<Vec<u8>, GenError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
