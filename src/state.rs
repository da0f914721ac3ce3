//! 抽出セッションの状態機械
//!
//! Idle → Loading → {Success | Error} → Idle（reset）。
//! 状態は必ず1つだけ有効（Loading中のErrorなどの矛盾を型で排除する）

use crate::error::SnapsheetError;
use crate::table::TableData;

/// セッション状態（タグ付きユニオン）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractState {
    /// 初期状態。入力待ち
    Idle,
    /// 抽出実行中（file_names = 提出されたバッチ）
    Loading { file_names: Vec<String> },
    /// 抽出成功。結合済みの表（1行以上）を保持
    Success(TableData),
    /// 抽出失敗または表なし。ユーザー向けメッセージを保持
    Error(String),
}

impl Default for ExtractState {
    fn default() -> Self {
        ExtractState::Idle
    }
}

/// 状態遷移を管理するストア
///
/// すべての更新はこの型を経由する。フィールドの個別更新はできないため、
/// フラグの組み合わせ矛盾は起こらない
#[derive(Debug, Default)]
pub struct Session {
    state: ExtractState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExtractState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ExtractState::Loading { .. })
    }

    /// バッチ提出。Loading状態に遷移する
    ///
    /// Loading中の再提出は拒否する（falseを返し状態は変わらない）
    pub fn begin(&mut self, file_names: Vec<String>) -> bool {
        if self.is_loading() {
            return false;
        }
        self.state = ExtractState::Loading { file_names };
        true
    }

    /// バッチ完了。Success または Error に遷移する
    ///
    /// 結合結果が空の表なら「表なし」エラーとして扱う
    /// （空のSuccessは存在しない）
    pub fn finish(&mut self, result: Result<TableData, SnapsheetError>) {
        self.state = match result {
            Ok(table) if !table.is_empty() => ExtractState::Success(table),
            Ok(_) => ExtractState::Error(SnapsheetError::NoTableFound.to_string()),
            Err(e) => ExtractState::Error(e.to_string()),
        };
    }

    /// 初期状態に戻す
    ///
    /// Loading中のリセットは無視する（アップロード操作はLoading中無効）
    pub fn reset(&mut self) {
        if self.is_loading() {
            return;
        }
        self.state = ExtractState::Idle;
    }
}
