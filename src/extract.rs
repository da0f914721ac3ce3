//! Gemini APIによる表抽出
//!
//! 1ファイル = 1リクエスト。レスポンスは array-of-arrays-of-strings を
//! `responseSchema` でサーバー側にも強制する

use crate::error::{Result, SnapsheetError};
use crate::files::EncodedFile;
use crate::table::TableData;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// 抽出プロンプト（固定）
const EXTRACTION_PROMPT: &str = r#"You are an expert data entry specialist. Your task is to accurately extract tabular data from a file.
- Analyze the provided file to identify the main table.
- Extract all data from the table, including the complete header row.
- Represent the extracted data as a JSON array of arrays. Each inner array must represent a single row from the table.
- Each element within a row's array must be a string representing the content of a single cell.
- Pay close attention to details: preserve the original order of rows and columns.
- If a cell spans multiple rows or columns (merged cells), repeat its value for each corresponding cell in the output grid to ensure a consistent rectangular structure.
- If a cell appears empty, represent it as an empty string "".
- Return ONLY the JSON data. Do not include any introductory text, markdown formatting (like ```json), or explanations.
- If you cannot find any table in the file, return an empty JSON array: []."#;

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Schema,
}

/// レスポンススキーマ（Gemini REST APIのSchema形式のサブセット）
#[derive(Serialize)]
struct Schema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,
}

impl Schema {
    /// ARRAY of ARRAY of STRING
    fn table() -> Self {
        Schema {
            schema_type: "ARRAY",
            items: Some(Box::new(Schema {
                schema_type: "ARRAY",
                items: Some(Box::new(Schema {
                    schema_type: "STRING",
                    items: None,
                })),
            })),
        }
    }
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// 表抽出の能力インターフェース
///
/// 「Base64 + MIMEタイプを受け取り、TableDataを返すか失敗する」。
/// テストではモック実装に差し替える
#[async_trait::async_trait]
pub trait TableExtractor: Send + Sync {
    async fn extract(&self, file: &EncodedFile) -> Result<TableData>;
}

/// Gemini API実装
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    verbose: bool,
}

impl GeminiExtractor {
    pub fn new(api_key: String, model: String, timeout_seconds: u64, verbose: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| SnapsheetError::ApiCall(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model,
            verbose,
        })
    }

    fn build_request(file: &EncodedFile) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: file.mime_type.clone(),
                            data: file.base64.clone(),
                        },
                    },
                    Part::Text {
                        text: EXTRACTION_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json".to_string(),
                response_schema: Schema::table(),
            },
        }
    }

    async fn call_api(&self, request: &GeminiRequest) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SnapsheetError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SnapsheetError::ApiCall(format!(
                "APIステータス {}: {}",
                status, body
            )));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| SnapsheetError::ApiParse(e.to_string()))?;

        payload
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| SnapsheetError::ApiParse("レスポンスが空です".to_string()))
    }
}

#[async_trait::async_trait]
impl TableExtractor for GeminiExtractor {
    /// 1ファイルを抽出する。リトライなし（1回 = 1試行）
    ///
    /// 通信エラー・パースエラーの詳細はログにのみ出力し、
    /// 呼び出し元には汎用の抽出失敗エラーを返す
    async fn extract(&self, file: &EncodedFile) -> Result<TableData> {
        let request = Self::build_request(file);

        let result = self
            .call_api(&request)
            .await
            .and_then(|text| parse_table_response(&text));

        match result {
            Ok(mut table) => {
                if self.verbose {
                    eprintln!("  {} -> {}行", file.file_name, table.len());
                }
                table.normalize();
                Ok(table)
            }
            Err(e) => {
                eprintln!("⚠ 抽出エラー ({}): {}", file.file_name, e);
                Err(SnapsheetError::ExtractionFailed)
            }
        }
    }
}

/// レスポンステキストから表データをパースする
///
/// プロンプトはfence禁止を指示しているが、markdownフェンスや
/// 前後のテキストが混ざっていても剥がしてからパースする
pub fn parse_table_response(text: &str) -> Result<TableData> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim());
    let table: TableData = serde_json::from_str(json_str)
        .map_err(|e| SnapsheetError::ApiParse(format!("表JSONのパースエラー: {}", e)))?;
    Ok(table)
}

/// レスポンスからJSON配列部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
fn extract_json(response: &str) -> Option<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7;
        if let Some(end_offset) = response[start..].find("```") {
            return Some(response[start..start + end_offset].trim());
        }
    }

    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if end >= start {
        Some(&response[start..=end])
    } else {
        None
    }
}
