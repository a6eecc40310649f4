//! Standalone market-data collector CLI.

use std::path::PathBuf;
use std::sync::Arc;

use auret_core::logging::{init_logging, LogConfig};
use auret_collector::{run_daemon, CollectionRound, Collector, CollectorConfig, Sources};
use auret_data::InfluxWriter;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "auret-collector")]
#[command(about = "Auret market-data collector (Yahoo Finance, CoinGecko, CNB → InfluxDB)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// 설정 파일 경로 (기본: config/collector.toml, 없으면 기본값 + 환경변수)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 데몬 모드: 설정된 주기로 수집 후 InfluxDB에 기록
    Daemon,

    /// 한 라운드만 수집하고 기록
    RunOnce {
        /// 수집한 스냅샷을 JSON으로 출력
        #[arg(long)]
        print: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(LogConfig::new(cli.log_level.as_str()).with_env_format())?;

    tracing::info!("Auret Collector 시작");

    // 설정 로드
    let config = CollectorConfig::load(cli.config.as_deref())?;
    tracing::debug!(
        influx_url = %config.influx.url,
        bucket = %config.influx.bucket,
        stocks = config.roster.stocks.len(),
        cryptocurrencies = config.roster.cryptocurrencies.len(),
        "설정 로드 완료"
    );

    // 저장소 연결
    let writer = Arc::new(InfluxWriter::new(config.influx_config()?)?);
    if let Err(e) = writer.health().await {
        tracing::warn!(error = %e, "InfluxDB 상태 확인 실패, 계속 진행합니다");
    }

    let sources = Sources::from_config(&config.sources)?;
    let collector = Collector::new(
        CollectionRound::new(sources, config.roster.clone()),
        writer,
        config.writer.missing_values,
    );

    match cli.command {
        Commands::Daemon => {
            let stats = run_daemon(&collector, config.daemon.interval(), shutdown_signal()).await;
            tracing::info!(rounds = stats.rounds, "데몬 모드 종료");
        }
        Commands::RunOnce { print } => {
            let (snapshot, stats) = collector.collect_once().await;
            stats.log_summary("단일 라운드");

            if print {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
        }
    }

    tracing::info!("Auret Collector 종료");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // 신호를 받을 수 없으면 프로세스 종료 시까지 계속 실행
        tracing::error!(error = %e, "종료 신호 핸들러 등록 실패");
        std::future::pending::<()>().await;
    }
}
