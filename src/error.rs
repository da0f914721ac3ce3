use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapsheetError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`snapsheet config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応ファイルが見つかりません: {0}")]
    NoInputFiles(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    /// 抽出失敗（バッチ全体）。ユーザー向けの汎用メッセージのみを持ち、
    /// 元のエラー詳細はログにのみ出力される
    #[error("Failed to process the files. Please ensure the files are clear and contain tables.")]
    ExtractionFailed,

    /// 抽出は成功したが、表が1つも見つからなかった
    #[error("Couldn't find any tables in the uploaded files. Please try again.")]
    NoTableFound,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SnapsheetError>;
