// src/main.rs — 主入口 & CLI 参数
mod config;
mod generate;
mod logo;
mod qr;
mod render;
mod server;
mod types;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use types::{LogoPolicy, LogoStrategy, RenderOptions};

// ════════════════════════════════════════════════════════════════
// CLI 参数
// ════════════════════════════════════════════════════════════════

#[derive(Parser)]
#[command(name = "qrlogo", about = "带中心 logo 的二维码 PNG 生成器", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// 生成二维码 PNG 并保存到文件
    Gen(GenArgs),
    /// 启动 HTTP 服务（POST /generate）
    Serve {
        /// 监听地址，默认取配置文件或 0.0.0.0
        #[arg(long)]
        host: Option<String>,
        /// 监听端口，默认取配置文件或 8080
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct GenArgs {
    /// 要编码的 URL
    url: String,
    /// 输出文件路径
    #[arg(short, long, default_value = "qr_code.png")]
    output: PathBuf,
    /// 每个模块的像素边长
    #[arg(short, long, default_value_t = 10)]
    size: u32,
    /// 静区宽度（模块数）
    #[arg(short, long, default_value_t = 4)]
    border: u32,
    /// 中心 logo 图片路径
    #[arg(short, long)]
    logo: Option<PathBuf>,
    /// 渲染完整矩阵后直接覆盖 logo（默认为 logo 预留中心空白）
    #[arg(long)]
    overlay: bool,
}

// ════════════════════════════════════════════════════════════════
// 入口
// ════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Gen(args) => {
            init_tracing(false);
            run_gen(args)?;
        }
        Cmd::Serve { host, port } => {
            let mut cfg = Config::load().unwrap_or_default();
            if let Some(h) = host {
                cfg.host = h;
            }
            if let Some(p) = port {
                cfg.port = p;
            }
            init_tracing(cfg.debug);
            server::run(&cfg).await?;
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

// ════════════════════════════════════════════════════════════════
// 本地生成
// ════════════════════════════════════════════════════════════════

fn run_gen(args: GenArgs) -> Result<()> {
    // logo 读不到时退化为无 logo 生成，与 HTTP 入口的快速失败相反
    let logo_bytes = match &args.logo {
        Some(path) => match std::fs::read(path) {
            Ok(b) => Some(b),
            Err(e) => {
                eprintln!("读取 logo 失败: {e}，继续生成不带 logo 的二维码");
                None
            }
        },
        None => None,
    };

    let strategy = if args.overlay {
        LogoStrategy::Overlay
    } else if args.logo.is_some() {
        LogoStrategy::ReserveCenter
    } else {
        LogoStrategy::Overlay
    };

    let opts = RenderOptions {
        box_size: args.size,
        border: args.border,
    };
    let img = generate::generate(
        &args.url,
        &opts,
        logo_bytes.as_deref(),
        strategy,
        LogoPolicy::DegradeGracefully,
    )?;
    img.save(&args.output)?;
    println!("二维码已保存到 {}", args.output.display());
    Ok(())
}
