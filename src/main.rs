// ==========================================
// SKU 对账与托盘分配 - 命令行入口
// ==========================================
// 用法:
//   sku-pallet <主台账> <来源文件>... [--output 路径] [--config 路径]
//              [--mode per_row|global] [--report 路径] [--locale zh-CN|en]
// 退出码: 0 成功 / 1 台账结构错误 / 2 参数错误 / 3 其他错误
// ==========================================

use anyhow::Context;
use sku_pallet::i18n::{self, t, t_with_args};
use sku_pallet::{
    logging, AllocationMode, ApiError, ReconcileApi, ReconcileRequest, ReconcileResponse,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// 命令行参数
#[derive(Debug, Default)]
struct CliArgs {
    request: ReconcileRequest,
    config_path: Option<PathBuf>,
    mode: Option<AllocationMode>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut positional: Vec<PathBuf> = Vec::new();
    let mut args = args.peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output" | "-o" | "--config" | "-c" | "--mode" | "-m" | "--report" | "--locale" => {
                let value = args
                    .next()
                    .ok_or_else(|| t_with_args("cli.missing_value", &[("flag", arg.as_str())]))?;
                match arg.as_str() {
                    "--output" | "-o" => cli.request.output_path = Some(PathBuf::from(value)),
                    "--config" | "-c" => cli.config_path = Some(PathBuf::from(value)),
                    "--report" => cli.request.report_path = Some(PathBuf::from(value)),
                    // 已在解析前由 locale_arg 处理
                    "--locale" => {}
                    _ => {
                        let mode = AllocationMode::parse(&value).ok_or_else(|| {
                            t_with_args("cli.invalid_mode", &[("mode", value.as_str())])
                        })?;
                        cli.mode = Some(mode);
                    }
                }
            }
            flag if flag.starts_with('-') => {
                return Err(t_with_args("cli.unknown_flag", &[("flag", flag)]));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    cli.request.ledger_path = positional.next().ok_or_else(|| t("cli.usage"))?;
    cli.request.source_paths = positional.collect();
    Ok(cli)
}

/// 预先取出 --locale，保证参数错误提示也使用指定语言
fn locale_arg(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|a| a == "--locale")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// 错误 → 退出码（结构错误 1，配置错误 2，其他 3）
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ApiError>() {
        Some(e) if e.is_structural() => 1,
        Some(ApiError::ConfigError(_)) => 2,
        _ => 3,
    }
}

/// 加载配置并执行对账
fn run(cli: &CliArgs) -> anyhow::Result<ReconcileResponse> {
    let mut api = ReconcileApi::from_config_file(cli.config_path.as_deref()).with_context(|| {
        match &cli.config_path {
            Some(path) => format!("加载配置失败: {}", path.display()),
            None => "加载配置失败".to_string(),
        }
    })?;
    if let Some(mode) = cli.mode {
        api.config_mut().allocation_mode = mode;
    }

    let response = api
        .reconcile(&cli.request)
        .with_context(|| format!("对账失败: {}", cli.request.ledger_path.display()))?;
    Ok(response)
}

fn main() -> ExitCode {
    logging::init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(locale) = locale_arg(&raw_args) {
        i18n::set_locale(locale);
    }
    if raw_args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", t("cli.usage"));
        return ExitCode::SUCCESS;
    }

    let cli = match parse_args(raw_args.into_iter()) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", t("cli.usage"));
            return ExitCode::from(2);
        }
    };

    tracing::info!(
        "{} v{} - 台账: {}, 来源文件: {}",
        sku_pallet::APP_NAME,
        sku_pallet::VERSION,
        cli.request.ledger_path.display(),
        cli.request.source_paths.len()
    );

    match run(&cli) {
        Ok(response) => {
            for line in i18n::summary_lines(&response.report) {
                println!("{}", line);
            }
            if let Some(report_path) = &cli.request.report_path {
                let path = report_path.display().to_string();
                println!("{}", t_with_args("run.report", &[("path", path.as_str())]));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "运行失败");
            eprintln!("{}: {:#}", t("common.failed"), e);
            ExitCode::from(exit_code(&e))
        }
    }
}
