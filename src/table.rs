//! 抽出結果の表データ型とテキストレンダリング
//!
//! 行0をヘッダー、行1以降をボディとして扱う。
//! セルは常に文字列（空セルは空文字列）。

use serde::{Deserialize, Serialize};

/// 表の1行（セルの順序 = 列の順序）
pub type TableRow = Vec<String>;

/// 抽出された表全体
///
/// APIレスポンスの JSON array-of-arrays をそのままデシリアライズできる
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableData {
    pub rows: Vec<TableRow>,
}

impl TableData {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// ヘッダー行（行0）
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// ボディ行（行1以降）
    pub fn body(&self) -> &[TableRow] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    /// 複数の表を提出順に連結して1つの表にする
    pub fn concat(tables: Vec<TableData>) -> TableData {
        let rows = tables.into_iter().flat_map(|t| t.rows).collect();
        TableData { rows }
    }

    /// 行の長さを最長行に揃える（短い行は空セルでパディング）
    ///
    /// AIの出力は矩形グリッドを要求しているが保証はされないため、
    /// 不揃いな行は拒否せずパディングで吸収する
    pub fn normalize(&mut self) {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    /// 表を整形済みテキストにレンダリングする
    ///
    /// 行0をヘッダー、以降をボディとして列幅を揃えて表示する。
    /// 空の表は空文字列を返す。
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let cols = self.rows.iter().map(Vec::len).max().unwrap_or(0);

        // 列ごとの表示幅を計算（セル内改行はスペース扱い）
        let mut widths = vec![0usize; cols];
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let w = cell.replace('\n', " ").chars().count();
                if w > widths[i] {
                    widths[i] = w;
                }
            }
        }

        let format_row = |row: &TableRow| -> String {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    // セル内改行はスペースに潰して1行で表示
                    let cell = row
                        .get(i)
                        .map(|c| c.replace('\n', " "))
                        .unwrap_or_default();
                    format!("{:<width$}", cell, width = w)
                })
                .collect();
            format!("| {} |", cells.join(" | "))
        };

        let mut out = String::new();
        out.push_str(&format_row(&self.rows[0]));
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&format!("|-{}-|", rule.join("-|-")));

        for row in self.body() {
            out.push('\n');
            out.push_str(&format_row(row));
        }

        out
    }
}

impl From<Vec<TableRow>> for TableData {
    fn from(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> TableData {
        TableData::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    // =============================================
    // ヘッダー/ボディ テスト
    // =============================================

    #[test]
    fn test_header_and_body() {
        let t = table(&[&["Name", "Age"], &["Alice", "30"]]);
        assert_eq!(t.header().unwrap(), &vec!["Name".to_string(), "Age".to_string()]);
        assert_eq!(t.body().len(), 1);
        assert_eq!(t.body()[0][0], "Alice");
    }

    #[test]
    fn test_empty_table() {
        let t = TableData::default();
        assert!(t.is_empty());
        assert!(t.header().is_none());
        assert!(t.body().is_empty());
    }

    #[test]
    fn test_header_only() {
        let t = table(&[&["A", "B"]]);
        assert!(t.header().is_some());
        assert!(t.body().is_empty());
    }

    // =============================================
    // concat / normalize テスト
    // =============================================

    #[test]
    fn test_concat_preserves_order() {
        let a = table(&[&["H1"], &["a1"]]);
        let b = table(&[&["H2"], &["b1"]]);
        let combined = TableData::concat(vec![a, b]);
        assert_eq!(combined.len(), 4);
        assert_eq!(combined.rows[0][0], "H1");
        assert_eq!(combined.rows[2][0], "H2");
    }

    #[test]
    fn test_concat_with_empty() {
        let a = table(&[&["H"]]);
        let combined = TableData::concat(vec![TableData::default(), a]);
        assert_eq!(combined.len(), 1);
    }

    #[test]
    fn test_normalize_pads_short_rows() {
        let mut t = table(&[&["A", "B", "C"], &["1"]]);
        t.normalize();
        assert_eq!(t.rows[1], vec!["1".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn test_normalize_empty() {
        let mut t = TableData::default();
        t.normalize();
        assert!(t.is_empty());
    }

    // =============================================
    // レンダリングテスト
    // =============================================

    #[test]
    fn test_render_header_and_body() {
        let t = table(&[&["Name", "Age"], &["Alice", "30"]]);
        let rendered = t.render();
        let lines: Vec<&str> = rendered.lines().collect();

        // ヘッダー1行 + 区切り1行 + ボディ1行
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Name"));
        assert!(lines[1].starts_with("|-"));
        assert!(lines[2].contains("Alice"));
    }

    #[test]
    fn test_render_empty_is_empty_string() {
        assert_eq!(TableData::default().render(), "");
    }

    #[test]
    fn test_render_aligns_columns() {
        let t = table(&[&["A", "Header"], &["LongValue", "x"]]);
        let rendered = t.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].len(), lines[2].len());
    }

    #[test]
    fn test_serde_array_of_arrays() {
        let json = r#"[["Name","Age"],["Alice","30"]]"#;
        let t: TableData = serde_json::from_str(json).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(serde_json::to_string(&t).unwrap(), json);
    }
}
