//! 从模型回复中定位 JSON 对象
//!
//! 模型常在 JSON 前后附带说明文字或 ```json 代码块。从第一个 `{` 开始按括号深度扫描，
//! 直到与之匹配的 `}`；字符串字面量（含转义）内的括号不计入深度。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// 字符串字面量之外
    Structure,
    /// 字符串字面量之内
    InString,
    /// 字符串内紧跟在反斜杠之后
    Escape,
}

/// 返回从第一个 `{` 到其匹配 `}` 的切片；没有 `{` 或括号不闭合时返回 None
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut state = ScanState::Structure;
    let mut depth: usize = 0;

    for (offset, ch) in text[start..].char_indices() {
        state = match (state, ch) {
            (ScanState::Escape, _) => ScanState::InString,
            (ScanState::InString, '\\') => ScanState::Escape,
            (ScanState::InString, '"') => ScanState::Structure,
            (ScanState::InString, _) => ScanState::InString,
            (ScanState::Structure, '"') => ScanState::InString,
            (ScanState::Structure, '{') => {
                depth += 1;
                ScanState::Structure
            }
            (ScanState::Structure, '}') => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
                ScanState::Structure
            }
            (ScanState::Structure, _) => ScanState::Structure,
        };
    }

    None
}
