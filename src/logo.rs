// src/logo.rs — logo 缩放与居中合成

use image::{imageops, DynamicImage, Rgba, RgbaImage, RgbImage};

/// 覆盖式贴标：按底图短边的 1/4 取 logo 边长，居中整块替换
///
/// H 级纠错约可容忍 30% 模块损毁，线性 1/4 覆盖留有余量。
/// 被覆盖的方块外的像素保持原样。
pub fn overlay_centered(base: &mut RgbImage, logo: &DynamicImage) {
    let side = base.width().min(base.height()) / 4;
    if side == 0 {
        return;
    }
    let x = (base.width() - side) / 2;
    let y = (base.height() - side) / 2;
    let flat = flatten_on_white(logo, side);
    imageops::replace(base, &flat, i64::from(x), i64::from(y));
}

/// 预留区贴标：logo 边长取 `radius * 2 * box_size`，贴在图像正中
///
/// 预留区宽 `(2 * radius + 1)` 个模块，logo 略小于它，完全落在空白内。
pub fn paste_reserved(base: &mut RgbImage, logo: &DynamicImage, radius: usize, box_size: u32) {
    let side = (radius as u32 * 2) * box_size;
    if side == 0 || side > base.width().min(base.height()) {
        return;
    }
    let x = base.width() / 2 - side / 2;
    let y = base.height() / 2 - side / 2;
    let flat = flatten_on_white(logo, side);
    imageops::replace(base, &flat, i64::from(x), i64::from(y));
}

/// 缩放到 side×side 并压平透明通道：alpha 以白底线性混合
fn flatten_on_white(logo: &DynamicImage, side: u32) -> RgbImage {
    let resized = logo.resize_exact(side, side, imageops::FilterType::Lanczos3);
    if resized.color().has_alpha() {
        let mut backing = RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255]));
        imageops::overlay(&mut backing, &resized.to_rgba8(), 0, 0);
        DynamicImage::ImageRgba8(backing).to_rgb8()
    } else {
        resized.to_rgb8()
    }
}
