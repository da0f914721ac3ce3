use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapsheet")]
#[command(about = "画像・PDFから表データをAI抽出してCSV出力するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像・PDFから表を抽出してCSVに出力
    Extract {
        /// 入力ファイルまたはフォルダ（画像 jpg/png/webp/gif、PDF）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 出力CSVファイル（デフォルト: snapsheet-export.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 同時API呼び出し数の上限（省略時は設定値）
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// CSVを書き出さず表の表示のみ行う
        #[arg(long)]
        no_csv: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
