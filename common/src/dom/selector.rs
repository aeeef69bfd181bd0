//! 複合セレクタ（`tag.class#id[attr*="v"]` をカンマ区切り）の解析と照合
//!
//! ATSのフォーム照合で使う範囲だけを扱う。子孫結合子や疑似クラスは対象外。

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Contains,
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Class(String),
    Id(String),
    Attr { name: String, op: AttrOp, value: String },
}

/// 1つの複合セレクタ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    parts: Vec<Part>,
}

/// カンマ区切りのセレクタ列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Selector>);

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        let selectors = split_top_level(input)
            .into_iter()
            .map(|s| Selector::parse(s.trim()))
            .collect::<Result<Vec<_>>>()?;

        if selectors.is_empty() {
            return Err(Error::Parse(format!("空のセレクタ: {:?}", input)));
        }
        Ok(Self(selectors))
    }

    /// タグ名と属性参照関数で照合
    pub fn matches<'a>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.0.iter().any(|s| s.matches(tag, &attr))
    }
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let chars: Vec<char> = input.chars().collect();
        if chars.is_empty() {
            return Err(Error::Parse("空のセレクタ".into()));
        }

        let mut pos = 0;
        let tag = if chars[0] == '*' {
            pos = 1;
            None
        } else {
            let name = read_ident(&chars, &mut pos);
            (!name.is_empty()).then(|| name.to_lowercase())
        };

        let mut parts = Vec::new();
        while pos < chars.len() {
            match chars[pos] {
                '.' => {
                    pos += 1;
                    parts.push(Part::Class(read_ident(&chars, &mut pos)));
                }
                '#' => {
                    pos += 1;
                    parts.push(Part::Id(read_ident(&chars, &mut pos)));
                }
                '[' => {
                    pos += 1;
                    parts.push(parse_attr(&chars, &mut pos, input)?);
                }
                c => {
                    return Err(Error::Parse(format!(
                        "未対応のセレクタ文字 '{}': {}",
                        c, input
                    )))
                }
            }
        }

        Ok(Self { tag, parts })
    }

    fn matches<'a>(&self, tag: &str, attr: &impl Fn(&str) -> Option<&'a str>) -> bool {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        self.parts.iter().all(|part| match part {
            Part::Class(class) => attr("class")
                .map(|c| c.split_whitespace().any(|x| x == class))
                .unwrap_or(false),
            Part::Id(id) => attr("id") == Some(id.as_str()),
            Part::Attr { name, op, value } => match attr(name) {
                None => false,
                Some(actual) => match op {
                    AttrOp::Exists => true,
                    AttrOp::Equals => actual == value,
                    AttrOp::Contains => !value.is_empty() && actual.contains(value.as_str()),
                    AttrOp::Prefix => !value.is_empty() && actual.starts_with(value.as_str()),
                    AttrOp::Suffix => !value.is_empty() && actual.ends_with(value.as_str()),
                },
            },
        })
    }
}

fn read_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() {
        let c = chars[*pos];
        if c.is_alphanumeric() || c == '-' || c == '_' {
            *pos += 1;
        } else {
            break;
        }
    }
    chars[start..*pos].iter().collect()
}

fn parse_attr(chars: &[char], pos: &mut usize, input: &str) -> Result<Part> {
    let unterminated = || Error::Parse(format!("属性セレクタが閉じていません: {}", input));

    skip_spaces(chars, pos);
    let name = read_ident(chars, pos).to_lowercase();
    if name.is_empty() {
        return Err(Error::Parse(format!("属性名がありません: {}", input)));
    }
    skip_spaces(chars, pos);

    let op = match chars.get(*pos).copied() {
        Some(']') => {
            *pos += 1;
            return Ok(Part::Attr { name, op: AttrOp::Exists, value: String::new() });
        }
        Some('=') => {
            *pos += 1;
            AttrOp::Equals
        }
        Some(c @ ('*' | '^' | '$')) if chars.get(*pos + 1) == Some(&'=') => {
            let op = match c {
                '*' => AttrOp::Contains,
                '^' => AttrOp::Prefix,
                _ => AttrOp::Suffix,
            };
            *pos += 2;
            op
        }
        Some(_) => return Err(Error::Parse(format!("未対応の属性演算子: {}", input))),
        None => return Err(unterminated()),
    };

    skip_spaces(chars, pos);
    let value = match chars.get(*pos).copied() {
        Some(quote @ ('"' | '\'')) => {
            *pos += 1;
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != quote {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return Err(unterminated());
            }
            let value: String = chars[start..*pos].iter().collect();
            *pos += 1;
            value
        }
        Some(_) => read_ident(chars, pos),
        None => return Err(unterminated()),
    };

    skip_spaces(chars, pos);
    if chars.get(*pos) != Some(&']') {
        return Err(unterminated());
    }
    *pos += 1;

    Ok(Part::Attr { name, op, value })
}

fn skip_spaces(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

/// 角括弧と引用符の外にあるカンマで分割
fn split_top_level(input: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                result.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    result.push(&input[start..]);
    result.into_iter().filter(|s| !s.trim().is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> {
        move |name| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    #[test]
    fn test_tag_and_attribute_equals() {
        let list = SelectorList::parse(r#"input[type="text"]"#).unwrap();
        assert!(list.matches("input", attrs(&[("type", "text")])));
        assert!(!list.matches("input", attrs(&[("type", "email")])));
        assert!(!list.matches("textarea", attrs(&[("type", "text")])));
    }

    #[test]
    fn test_contains_operator() {
        let list = SelectorList::parse(r#"[data-automation-id*="workExperience"]"#).unwrap();
        assert!(list.matches("div", attrs(&[("data-automation-id", "workExperience-3")])));
        // 属性値の照合は大文字小文字を区別する
        assert!(!list.matches("div", attrs(&[("data-automation-id", "workexperience-3")])));
    }

    #[test]
    fn test_class_and_list() {
        let list = SelectorList::parse(".experience-component, .job-history").unwrap();
        assert!(list.matches("div", attrs(&[("class", "card job-history")])));
        assert!(!list.matches("div", attrs(&[("class", "job-history-title")])));
    }

    #[test]
    fn test_comma_inside_quotes() {
        let list = SelectorList::parse(r#"button[aria-label="Add, Another"], .add"#).unwrap();
        assert!(list.matches("button", attrs(&[("aria-label", "Add, Another")])));
        assert!(list.matches("a", attrs(&[("class", "add")])));
    }

    #[test]
    fn test_id_and_prefix_suffix() {
        let list = SelectorList::parse(r#"#apply, [name^="cand"], [name$="_url"]"#).unwrap();
        assert!(list.matches("button", attrs(&[("id", "apply")])));
        assert!(list.matches("input", attrs(&[("name", "candidate")])));
        assert!(list.matches("input", attrs(&[("name", "github_url")])));
        assert!(!list.matches("input", attrs(&[("name", "url_github")])));
    }

    #[test]
    fn test_parse_errors() {
        assert!(SelectorList::parse("").is_err());
        assert!(SelectorList::parse(r#"input[type="text""#).is_err());
        assert!(SelectorList::parse("div > input").is_err());
    }
}
