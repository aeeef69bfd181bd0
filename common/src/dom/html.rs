//! 簡易HTMLローダー
//!
//! 保存したATSのフォームページを [`MemoryPage`] に読み込む。仕様準拠のパーサーではなく、
//! タグ・属性・テキストの木を作れれば十分という前提。

use super::memory::{MemoryPage, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// `html` を解析して `page` のルート直下に追加する
pub(super) fn load(page: &MemoryPage, html: &str) {
    let mut stack: Vec<(NodeId, String)> = vec![(page.root(), String::new())];
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map(|i| &after[i + 3..]).unwrap_or("");
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = rest.find('>').map(|i| &rest[i + 1..]).unwrap_or("");
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_lowercase();
            close_element(&mut stack, &name);
            rest = after.get(end + 1..).unwrap_or("");
            continue;
        }

        if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = find_tag_end(rest);
            let body = &rest[1..end];
            rest = rest.get(end + 1..).unwrap_or("");

            let (name, attrs, self_closing) = parse_tag(body);

            // <option> と <p> は同種の開始タグで暗黙に閉じる
            if matches!(name.as_str(), "option" | "p" | "li") {
                if let Some((_, top)) = stack.last() {
                    if *top == name {
                        stack.pop();
                    }
                }
            }

            let parent = stack.last().map(|(id, _)| *id).unwrap_or(page.root());
            let id = page.append_element(parent, &name, attrs);

            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let closing = format!("</{}", name);
                let lower = rest.to_ascii_lowercase();
                let text_end = lower.find(&closing).unwrap_or(rest.len());
                page.append_text(id, &rest[..text_end]);
                rest = &rest[text_end..];
                if let Some(close_end) = rest.find('>') {
                    rest = &rest[close_end + 1..];
                }
                continue;
            }

            if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                stack.push((id, name));
            }
            continue;
        }

        // テキスト（先頭の '<' がタグでなければ文字として扱う）
        let skip = if rest.starts_with('<') { 1 } else { 0 };
        let end = rest[skip..].find('<').map(|i| i + skip).unwrap_or(rest.len());
        let text = &rest[..end];
        if !text.trim().is_empty() {
            let parent = stack.last().map(|(id, _)| *id).unwrap_or(page.root());
            page.append_text(parent, &decode_entities(text));
        }
        rest = &rest[end..];
    }
}

fn close_element(stack: &mut Vec<(NodeId, String)>, name: &str) {
    // 対応する開始タグがなければ無視する
    if let Some(pos) = stack.iter().rposition(|(_, tag)| tag == name) {
        if pos > 0 {
            stack.truncate(pos);
        }
    }
}

/// 引用符の中の '>' を無視してタグの終端を探す
fn find_tag_end(input: &str) -> usize {
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return i,
            _ => {}
        }
    }
    input.len()
}

fn parse_tag(body: &str) -> (String, Vec<(String, String)>, bool) {
    let trimmed = body.trim_end();
    let self_closing = trimmed.ends_with('/');
    let trimmed = trimmed.trim_end_matches('/');

    let chars: Vec<char> = trimmed.chars().collect();
    let mut pos = 0;
    while pos < chars.len() && !chars[pos].is_whitespace() {
        pos += 1;
    }
    let name: String = chars[..pos].iter().collect::<String>().to_lowercase();

    let mut attrs = Vec::new();
    loop {
        while pos < chars.len() && (chars[pos].is_whitespace() || chars[pos] == '/') {
            pos += 1;
        }
        if pos >= chars.len() {
            break;
        }

        let start = pos;
        while pos < chars.len() && !chars[pos].is_whitespace() && chars[pos] != '=' {
            pos += 1;
        }
        let attr_name: String = chars[start..pos].iter().collect::<String>().to_lowercase();

        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }

        let mut value = String::new();
        if pos < chars.len() && chars[pos] == '=' {
            pos += 1;
            while pos < chars.len() && chars[pos].is_whitespace() {
                pos += 1;
            }
            if pos < chars.len() && (chars[pos] == '"' || chars[pos] == '\'') {
                let quote = chars[pos];
                pos += 1;
                let value_start = pos;
                while pos < chars.len() && chars[pos] != quote {
                    pos += 1;
                }
                value = chars[value_start..pos].iter().collect();
                pos += 1;
            } else {
                let value_start = pos;
                while pos < chars.len() && !chars[pos].is_whitespace() {
                    pos += 1;
                }
                value = chars[value_start..pos].iter().collect();
            }
        }

        if !attr_name.is_empty() {
            attrs.push((attr_name, decode_entities(&value)));
        }
    }

    (name, attrs, self_closing)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Page;

    #[test]
    fn test_nested_structure() {
        let page = MemoryPage::from_html(
            r#"<div class="a"><p>One<p>Two</div><input type=text name=q disabled><span>x</span>"#,
        );
        let div = page.query(".a").unwrap();
        assert_eq!(page.text_content(&div), "One Two");
        let input = page.query("input").unwrap();
        assert_eq!(page.attribute(&input, "type").as_deref(), Some("text"));
        assert_eq!(page.attribute(&input, "disabled").as_deref(), Some(""));
        // input は空要素なので span は兄弟になる
        assert!(page.query_within(&input, "span").is_none());
    }

    #[test]
    fn test_implicit_option_close() {
        let page = MemoryPage::from_html("<select><option>No<option>Yes</select>");
        let select = page.query("select").unwrap();
        let texts: Vec<String> = page.options(&select).into_iter().map(|o| o.text).collect();
        assert_eq!(texts, vec!["No", "Yes"]);
    }

    #[test]
    fn test_comments_scripts_and_entities() {
        let page = MemoryPage::from_html(
            "<!DOCTYPE html><body><!-- <input name=x> --><script>if (a < b) {}</script><p title=\"a &amp; b\">Tom &amp; Jerry</p></body>",
        );
        assert!(page.query("input").is_none());
        let p = page.query("p").unwrap();
        assert_eq!(page.text_content(&p), "Tom & Jerry");
        assert_eq!(page.attribute(&p, "title").as_deref(), Some("a & b"));
        assert_eq!(page.body_text(), "Tom & Jerry");
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let page = MemoryPage::from_html(r#"<button aria-label="Next > Submit">Go</button>"#);
        let button = page.query("button").unwrap();
        assert_eq!(page.attribute(&button, "aria-label").as_deref(), Some("Next > Submit"));
        assert_eq!(page.text_content(&button), "Go");
    }
}
