// src/render.rs — 模块矩阵栅格化为 RGB 位图

use crate::qr::ModuleMatrix;
use crate::types::{GenError, RenderOptions};
use image::{Rgb, RgbImage};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 将模块矩阵画成位图，真模块为黑色实心方块，底色白
///
/// `reserved` 为中心预留区半径（模块数）：行列都落在
/// `[N/2 - r, N/2 + r]` 内的模块不绘制，留给 logo。
/// 输出边长恒为 `(N + 2 * border) * box_size`。
pub fn render(
    matrix: &ModuleMatrix,
    opts: &RenderOptions,
    reserved: Option<usize>,
) -> Result<RgbImage, GenError> {
    if opts.box_size == 0 {
        return Err(GenError::InvalidParameter("box_size must be positive".into()));
    }
    let n = matrix.size();
    // border 与 box_size 都来自用户输入，尺寸计算全程检查溢出
    let img_size = opts
        .border
        .checked_mul(2)
        .and_then(|b| b.checked_add(n as u32))
        .and_then(|m| m.checked_mul(opts.box_size))
        .ok_or_else(|| GenError::InvalidParameter("image dimensions overflow".into()))?;

    let mut img = RgbImage::from_pixel(img_size, img_size, WHITE);
    let center = n / 2;

    for row in 0..n {
        for col in 0..n {
            if !matrix.get(row, col) {
                continue;
            }
            if let Some(r) = reserved {
                if center.abs_diff(row) <= r && center.abs_diff(col) <= r {
                    continue;
                }
            }
            let x0 = (opts.border + col as u32) * opts.box_size;
            let y0 = (opts.border + row as u32) * opts.box_size;
            for dy in 0..opts.box_size {
                for dx in 0..opts.box_size {
                    let (px, py) = (x0 + dx, y0 + dy);
                    // 按尺寸公式不会越界，仍保守裁剪
                    if px < img_size && py < img_size {
                        img.put_pixel(px, py, BLACK);
                    }
                }
            }
        }
    }
    Ok(img)
}
