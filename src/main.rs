use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use snapsheet::cli::{Cli, Commands};
use snapsheet::config::Config;
use snapsheet::error::Result;
use snapsheet::extract::GeminiExtractor;
use snapsheet::state::{ExtractState, Session};
use snapsheet::{batch, csv, files};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { inputs, output, concurrency, no_csv } => {
            println!("📋 snapsheet - 表抽出\n");

            // 1. 入力ファイル収集
            println!("[1/3] 入力ファイルを収集中...");
            let paths = files::collect_inputs(&inputs)?;
            if paths.is_empty() {
                return Err(snapsheet::SnapsheetError::NoInputFiles(
                    inputs
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                ));
            }
            println!("✔ {}件の入力を検出\n", paths.len());

            // 2. エンコード（非対応・読込失敗はスキップ）
            println!("[2/3] ファイルをエンコード中...");
            let encoded = files::encode_batch(&paths).await?;
            if encoded.is_empty() {
                return Err(snapsheet::SnapsheetError::NoInputFiles(
                    "対応形式のファイルがバッチに残っていません".into(),
                ));
            }
            println!("✔ {}件をエンコード\n", encoded.len());

            // 3. AI抽出
            println!("[3/3] AI抽出中...");
            let api_key = config.get_api_key()?;
            let extractor = Arc::new(GeminiExtractor::new(
                api_key,
                config.model.clone(),
                config.timeout_seconds,
                cli.verbose,
            )?);

            let mut session = Session::new();
            session.begin(encoded.iter().map(|f| f.file_name.clone()).collect());

            let progress = ProgressBar::new(encoded.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let progress_clone = progress.clone();

            let max_concurrency = concurrency.unwrap_or(config.max_concurrency);
            let result = batch::run_batch(extractor, encoded, max_concurrency, move |done, _| {
                progress_clone.set_position(done as u64);
            })
            .await;
            progress.finish_and_clear();

            session.finish(result);

            match session.state() {
                ExtractState::Success(table) => {
                    println!("✔ 抽出完了（{}行）\n", table.len());
                    println!("{}\n", table.render());

                    if !no_csv {
                        if let Some(path) = csv::export_csv(table, output.as_deref())? {
                            println!("✔ CSVを保存: {}", path.display());
                        }
                    }

                    println!("\n✅ 完了");
                }
                ExtractState::Error(message) => {
                    eprintln!("❌ {}", message);
                    std::process::exit(1);
                }
                // begin→finish後はSuccessかErrorのどちらかにしかならない
                _ => unreachable!("extraction finished without a terminal state"),
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  同時実行数: {}", config.max_concurrency);
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
