//! バッチ抽出オーケストレーター
//!
//! バッチ内の全ファイルを並行に抽出し、提出順で1つの表に結合する。
//! 1件でも失敗したらバッチ全体を失敗とする（部分成功なし）

use crate::error::{Result, SnapsheetError};
use crate::extract::TableExtractor;
use crate::files::EncodedFile;
use crate::table::TableData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// バッチ全体を抽出して結合済みの表を返す
///
/// 同時実行数は `max_concurrency` のセマフォで制限する。
/// 完了順は不定だが、結果はインデックスで提出順に並べ直してから結合する。
/// 結合結果が空でも `Ok`（表なし判定は呼び出し元の状態機械が行う）
///
/// # Arguments
/// * `extractor` - 抽出実装（本番はGemini、テストはモック）
/// * `files` - エンコード済みバッチ
/// * `max_concurrency` - 同時に実行する抽出呼び出し数の上限
/// * `on_progress` - 完了件数コールバック (done, total)
pub async fn run_batch(
    extractor: Arc<dyn TableExtractor>,
    files: Vec<EncodedFile>,
    max_concurrency: usize,
    on_progress: impl Fn(usize, usize) + Send + Sync + 'static,
) -> Result<TableData> {
    if files.is_empty() {
        return Ok(TableData::default());
    }

    let total = files.len();
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let done = Arc::new(AtomicUsize::new(0));
    let on_progress = Arc::new(on_progress);

    let mut set = JoinSet::new();

    for (index, file) in files.into_iter().enumerate() {
        let extractor = Arc::clone(&extractor);
        let semaphore = Arc::clone(&semaphore);
        let done = Arc::clone(&done);
        let on_progress = Arc::clone(&on_progress);

        set.spawn(async move {
            // クローズは起こらないためacquireは失敗しない
            let _permit = semaphore.acquire().await;
            let result = extractor.extract(&file).await;
            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            on_progress(finished, total);
            (index, result)
        });
    }

    let mut slots: Vec<Option<TableData>> = vec![None; total];
    let mut first_error: Option<SnapsheetError> = None;

    while let Some(joined) = set.join_next().await {
        let (index, result) = joined
            .map_err(|e| SnapsheetError::ApiCall(format!("抽出タスクの実行に失敗: {}", e)))?;
        match result {
            Ok(table) => slots[index] = Some(table),
            Err(e) => {
                // 全タスクの完了は待つが、バッチとしては失敗
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    let tables: Vec<TableData> = slots.into_iter().flatten().collect();
    Ok(TableData::concat(tables))
}
