/// 去除前後空白，並把 `< > " ' &` 換成 HTML entity。
///
/// 不是冪等的：對已轉義的字串再呼叫一次會把 `&` 重複轉義，
/// 所以每個值只能清理一次。
pub fn sanitize_input(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => sanitized.push_str("&lt;"),
            '>' => sanitized.push_str("&gt;"),
            '"' => sanitized.push_str("&quot;"),
            '\'' => sanitized.push_str("&#x27;"),
            '&' => sanitized.push_str("&amp;"),
            other => sanitized.push(other),
        }
    }
    // entity 不含空白，先轉義後 trim 與先 trim 結果相同
    sanitized.trim().to_string()
}
