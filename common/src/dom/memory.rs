//! メモリ上のDOM
//!
//! ブラウザなしでエンジン全体を動かすためのページ実装。CLIのプレビューと
//! テストで使う。ノードはアリーナに置き、`NodeId` で参照する。

use super::html;
use super::selector::SelectorList;
use super::{normalize_text, DomEvent, Page, SelectOption};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;

/// ノードID（アリーナ内の添字）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    /// 書き込まれた値（None なら value 属性／子テキストが初期値）
    value: Option<String>,
    selected: Option<usize>,
    styles: Vec<(String, String)>,
    events: Vec<DomEvent>,
    presses: usize,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// ボタン押下時の動作（ホストページのスクリプトの代わり）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressAction {
    /// セレクタに一致する最後のブロックを複製して直後に挿入する。
    /// `max` に達したらボタンを隠す（行数上限のあるATSを再現）。
    CloneLast {
        block_selector: String,
        max: Option<usize>,
    },
}

/// 入力された欄（プレビュー表示用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledField {
    pub element: String,
    pub value: String,
}

/// メモリ上のページ
#[derive(Debug)]
pub struct MemoryPage {
    nodes: RefCell<Vec<Node>>,
    actions: RefCell<HashMap<NodeId, PressAction>>,
    url: String,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// 空の文書
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }]),
            actions: RefCell::new(HashMap::new()),
            url: String::new(),
        }
    }

    /// HTMLから構築（壊れたマークアップも読める範囲で読む）
    pub fn from_html(html: &str) -> Self {
        let page = Self::new();
        html::load(&page, html);
        page.wire_clone_attributes();
        page
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// 要素を末尾に追加
    pub fn append_element(&self, parent: NodeId, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        let data = ElementData {
            tag: tag.to_lowercase(),
            attrs,
            ..Default::default()
        };
        self.push_node(parent, NodeKind::Element(data))
    }

    pub fn append_text(&self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    fn push_node(&self, parent: NodeId, kind: NodeKind) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        nodes[parent.0].children.push(id);
        id
    }

    /// 押下時の動作を登録
    pub fn on_press(&self, element: NodeId, action: PressAction) {
        self.actions.borrow_mut().insert(element, action);
    }

    /// `data-sidekick-clones="<ブロックのセレクタ>"` を持つ要素に複製動作を登録する
    ///
    /// `data-max` があれば行数上限として使う。戻り値は登録した要素数。
    pub fn wire_clone_attributes(&self) -> usize {
        let buttons = self.query_all("[data-sidekick-clones]");
        for button in &buttons {
            let block_selector = self
                .attribute(button, "data-sidekick-clones")
                .unwrap_or_default();
            let max = self
                .attribute(button, "data-max")
                .and_then(|m| m.trim().parse().ok());
            self.on_press(*button, PressAction::CloneLast { block_selector, max });
        }
        buttons.len()
    }

    /// change イベントを受けた欄と現在の値（文書順）
    pub fn filled_fields(&self) -> Vec<FilledField> {
        self.query_all("input, textarea, select")
            .into_iter()
            .filter(|id| self.events(*id).contains(&DomEvent::Change))
            .map(|id| FilledField {
                element: self.describe(id),
                value: self.value(&id),
            })
            .collect()
    }

    /// 発火されたイベントの履歴
    pub fn events(&self, element: NodeId) -> Vec<DomEvent> {
        self.with_element(element, |e| e.events.clone()).unwrap_or_default()
    }

    /// 押された回数
    pub fn press_count(&self, element: NodeId) -> usize {
        self.with_element(element, |e| e.presses).unwrap_or(0)
    }

    pub fn style(&self, element: NodeId, property: &str) -> Option<String> {
        self.with_element(element, |e| {
            e.styles
                .iter()
                .find(|(k, _)| k == property)
                .map(|(_, v)| v.clone())
        })
        .flatten()
    }

    pub fn set_attribute(&self, element: NodeId, name: &str, value: &str) {
        self.with_element_mut(element, |e| {
            match e.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(slot) => slot.1 = value.to_string(),
                None => e.attrs.push((name.to_lowercase(), value.to_string())),
            }
        });
    }

    /// 人が読める要素の説明（`input[name=first_name]` 形式）
    pub fn describe(&self, element: NodeId) -> String {
        self.with_element(element, |e| {
            let key = ["name", "id", "aria-label", "placeholder"]
                .iter()
                .find_map(|attr| e.attr(attr).filter(|v| !v.is_empty()).map(|v| (*attr, v)));
            match key {
                Some((attr, value)) => format!("{}[{}={}]", e.tag, attr, value),
                None => e.tag.clone(),
            }
        })
        .unwrap_or_default()
    }

    fn with_element<R>(&self, id: NodeId, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        let nodes = self.nodes.borrow();
        match &nodes.get(id.0)?.kind {
            NodeKind::Element(data) => Some(f(data)),
            _ => None,
        }
    }

    fn with_element_mut<R>(&self, id: NodeId, f: impl FnOnce(&mut ElementData) -> R) -> Option<R> {
        let mut nodes = self.nodes.borrow_mut();
        match &mut nodes.get_mut(id.0)?.kind {
            NodeKind::Element(data) => Some(f(data)),
            _ => None,
        }
    }

    /// `scope` の子孫を文書順で列挙（`scope` 自身は含まない）
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        result
    }

    fn select_in(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let list = match SelectorList::parse(selector) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("セレクタを解釈できません: {}", e);
                return Vec::new();
            }
        };

        let candidates = self.descendants(scope);
        let nodes = self.nodes.borrow();
        candidates
            .into_iter()
            .filter(|id| match &nodes[id.0].kind {
                NodeKind::Element(data) => list.matches(&data.tag, |name| data.attr(name)),
                _ => false,
            })
            .collect()
    }

    fn raw_text(&self, id: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        collect_text(&nodes, id, &mut out);
        out
    }

    fn option_nodes(&self, select: NodeId) -> Vec<NodeId> {
        self.select_in(select, "option")
    }

    fn default_selected(&self, select: NodeId) -> Option<usize> {
        let options = self.option_nodes(select);
        if options.is_empty() {
            return None;
        }
        let preselected = options.iter().position(|id| {
            self.with_element(*id, |e| e.attr("selected").is_some())
                .unwrap_or(false)
        });
        Some(preselected.unwrap_or(0))
    }

    fn clone_subtree(&self, source: NodeId, parent: NodeId) -> NodeId {
        let (kind, children) = {
            let nodes = self.nodes.borrow();
            let node = &nodes[source.0];
            let kind = match &node.kind {
                // 複製したブロックは初期状態（値・イベント・装飾なし）
                NodeKind::Element(data) => NodeKind::Element(ElementData {
                    tag: data.tag.clone(),
                    attrs: data.attrs.clone(),
                    ..Default::default()
                }),
                other => other.clone(),
            };
            (kind, node.children.clone())
        };

        let id = {
            let mut nodes = self.nodes.borrow_mut();
            let id = NodeId(nodes.len());
            nodes.push(Node {
                parent: Some(parent),
                children: Vec::new(),
                kind,
            });
            id
        };
        for child in children {
            let cloned = self.clone_subtree(child, id);
            self.nodes.borrow_mut()[id.0].children.push(cloned);
        }
        id
    }

    fn clone_last(&self, button: NodeId, block_selector: &str, max: Option<usize>) {
        let blocks = self.query_all(block_selector);
        let Some(&last) = blocks.last() else {
            return;
        };
        if max.is_some_and(|m| blocks.len() >= m) {
            self.set_attribute(button, "hidden", "");
            return;
        }

        let Some(parent) = self.nodes.borrow()[last.0].parent else {
            return;
        };
        let cloned = self.clone_subtree(last, parent);
        {
            let mut nodes = self.nodes.borrow_mut();
            let siblings = &mut nodes[parent.0].children;
            if let Some(pos) = siblings.iter().position(|id| *id == last) {
                siblings.insert(pos + 1, cloned);
            }
        }

        if max.is_some_and(|m| blocks.len() + 1 >= m) {
            self.set_attribute(button, "hidden", "");
        }
    }
}

fn collect_text(nodes: &[Node], id: NodeId, out: &mut String) {
    match &nodes[id.0].kind {
        NodeKind::Text(text) => {
            out.push_str(text);
            out.push(' ');
        }
        NodeKind::Element(data) if matches!(data.tag.as_str(), "script" | "style") => {}
        _ => {
            for child in &nodes[id.0].children {
                collect_text(nodes, *child, out);
            }
        }
    }
}

impl Page for MemoryPage {
    type Element = NodeId;

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select_in(self.root(), selector)
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.select_in(*scope, selector).into_iter().next()
    }

    fn tag_name(&self, element: &NodeId) -> String {
        self.with_element(*element, |e| e.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.with_element(*element, |e| e.attr(name).map(str::to_string))
            .flatten()
    }

    fn value(&self, element: &NodeId) -> String {
        match self.tag_name(element).as_str() {
            "input" => self
                .with_element(*element, |e| {
                    e.value
                        .clone()
                        .unwrap_or_else(|| e.attr("value").unwrap_or_default().to_string())
                })
                .unwrap_or_default(),
            "textarea" => match self.with_element(*element, |e| e.value.clone()).flatten() {
                Some(value) => value,
                None => self.raw_text(*element).trim().to_string(),
            },
            "select" => {
                let options = self.options(element);
                self.selected_index(element)
                    .and_then(|i| options.get(i))
                    .map(|o| o.value.clone())
                    .unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    fn set_value(&self, element: &NodeId, value: &str) {
        match self.tag_name(element).as_str() {
            "input" | "textarea" => {
                self.with_element_mut(*element, |e| e.value = Some(value.to_string()));
            }
            "select" => {
                if let Some(index) = self.options(element).iter().position(|o| o.value == value) {
                    self.select_index(element, index);
                }
            }
            _ => {}
        }
    }

    fn text_content(&self, element: &NodeId) -> String {
        normalize_text(&self.raw_text(*element))
    }

    fn is_visible(&self, element: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(*element);
        while let Some(id) = current {
            if let NodeKind::Element(data) = &nodes[id.0].kind {
                if data.attr("hidden").is_some() {
                    return false;
                }
                if data.tag == "input" && data.attr("type") == Some("hidden") {
                    return false;
                }
                let style = data.attr("style").unwrap_or_default().replace(' ', "");
                if style.contains("display:none") || style.contains("visibility:hidden") {
                    return false;
                }
            }
            current = nodes[id.0].parent;
        }
        true
    }

    fn in_form(&self, element: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        if let NodeKind::Element(data) = &nodes[element.0].kind {
            if data.attr("form").is_some() {
                return true;
            }
        }
        let mut current = nodes[element.0].parent;
        while let Some(id) = current {
            if let NodeKind::Element(data) = &nodes[id.0].kind {
                if data.tag == "form" {
                    return true;
                }
            }
            current = nodes[id.0].parent;
        }
        false
    }

    fn options(&self, select: &NodeId) -> Vec<SelectOption> {
        self.option_nodes(*select)
            .into_iter()
            .map(|id| {
                let text = normalize_text(&self.raw_text(id));
                let value = self
                    .with_element(id, |e| e.attr("value").map(str::to_string))
                    .flatten()
                    .unwrap_or_else(|| text.clone());
                SelectOption { text, value }
            })
            .collect()
    }

    fn selected_index(&self, select: &NodeId) -> Option<usize> {
        self.with_element(*select, |e| e.selected)
            .flatten()
            .or_else(|| self.default_selected(*select))
    }

    fn select_index(&self, select: &NodeId, index: usize) {
        if index < self.option_nodes(*select).len() {
            self.with_element_mut(*select, |e| e.selected = Some(index));
        }
    }

    fn label_for(&self, id: &str) -> Option<String> {
        self.query_all("label")
            .into_iter()
            .find(|label| self.attribute(label, "for").as_deref() == Some(id))
            .map(|label| self.text_content(&label))
    }

    fn dispatch(&self, element: &NodeId, event: DomEvent) {
        self.with_element_mut(*element, |e| e.events.push(event));
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) {
        self.with_element_mut(*element, |e| {
            match e.styles.iter_mut().find(|(k, _)| k == property) {
                Some(slot) => slot.1 = value.to_string(),
                None => e.styles.push((property.to_string(), value.to_string())),
            }
        });
    }

    fn press(&self, element: &NodeId) {
        let disabled = self
            .with_element_mut(*element, |e| {
                e.presses += 1;
                e.attr("disabled").is_some()
            })
            .unwrap_or(true);
        if disabled {
            return;
        }

        let action = self.actions.borrow().get(element).cloned();
        match action {
            Some(PressAction::CloneLast { block_selector, max }) => {
                self.clone_last(*element, &block_selector, max)
            }
            None => {}
        }
    }

    fn body_text(&self) -> String {
        let scope = self.query("body").unwrap_or(self.root());
        normalize_text(&self.raw_text(scope))
    }

    fn title(&self) -> String {
        self.query("title")
            .map(|t| self.text_content(&t))
            .unwrap_or_default()
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
        <html><head><title>Engineer - Acme Careers</title></head>
        <body>
          <div class="job-history"><input name="title"></div>
          <button class="add-experience-button">Add</button>
          <select id="auth"><option value="">Select</option><option value="y">Yes</option><option value="n" selected>No</option></select>
          <label for="auth">Work authorization</label>
          <textarea name="cover">Hello</textarea>
          <div style="display: none"><input name="secret"></div>
        </body></html>
    "#;

    #[test]
    fn test_query_and_values() {
        let page = MemoryPage::from_html(FORM);
        let input = page.query(r#"input[name="title"]"#).unwrap();
        assert_eq!(page.value(&input), "");
        page.set_value(&input, "Engineer");
        assert_eq!(page.value(&input), "Engineer");

        let textarea = page.query("textarea").unwrap();
        assert_eq!(page.value(&textarea), "Hello");
    }

    #[test]
    fn test_select_state() {
        let page = MemoryPage::from_html(FORM);
        let select = page.query("select").unwrap();
        assert_eq!(page.selected_index(&select), Some(2));
        assert_eq!(page.value(&select), "n");
        page.select_index(&select, 1);
        assert_eq!(page.value(&select), "y");
        assert_eq!(page.options(&select)[1].text, "Yes");
        assert_eq!(page.label_for("auth").as_deref(), Some("Work authorization"));
    }

    #[test]
    fn test_visibility() {
        let page = MemoryPage::from_html(FORM);
        let hidden = page.query(r#"input[name="secret"]"#).unwrap();
        let visible = page.query(r#"input[name="title"]"#).unwrap();
        assert!(!page.is_visible(&hidden));
        assert!(page.is_visible(&visible));
    }

    #[test]
    fn test_clone_last_press_action() {
        let page = MemoryPage::from_html(FORM);
        let button = page.query(".add-experience-button").unwrap();
        page.on_press(
            button,
            PressAction::CloneLast { block_selector: ".job-history".into(), max: Some(2) },
        );

        let first = page.query(r#"input[name="title"]"#).unwrap();
        page.set_value(&first, "filled");

        page.press(&button);
        let blocks = page.query_all(".job-history");
        assert_eq!(blocks.len(), 2);
        // 複製は値を引き継がない
        let cloned = page.query_within(&blocks[1], "input").unwrap();
        assert_eq!(page.value(&cloned), "");
        // 上限に達したのでボタンは隠れる
        assert!(!page.is_visible(&button));
        assert_eq!(page.press_count(button), 1);
    }

    #[test]
    fn test_title_and_body_text() {
        let page = MemoryPage::from_html(FORM);
        assert_eq!(page.title(), "Engineer - Acme Careers");
        assert!(page.body_text().contains("Work authorization"));
        assert!(!page.body_text().contains("Acme Careers"));
    }

    #[test]
    fn test_describe() {
        let page = MemoryPage::from_html(FORM);
        let input = page.query("input").unwrap();
        assert_eq!(page.describe(input), "input[name=title]");
    }

    #[test]
    fn test_clone_attributes_from_markup() {
        let page = MemoryPage::from_html(
            r#"<div class="edu"><input name="school"></div>
               <button data-sidekick-clones=".edu" data-max="2">Add Education</button>"#,
        );
        let button = page.query("button").unwrap();
        page.press(&button);
        page.press(&button);
        assert_eq!(page.query_all(".edu").len(), 2);
        assert!(!page.is_visible(&button));
    }

    #[test]
    fn test_filled_fields_lists_changed_controls() {
        let page = MemoryPage::from_html(FORM);
        let input = page.query(r#"input[name="title"]"#).unwrap();
        page.set_value(&input, "Engineer");
        page.dispatch(&input, DomEvent::Input);
        assert!(page.filled_fields().is_empty());

        page.dispatch(&input, DomEvent::Change);
        assert_eq!(
            page.filled_fields(),
            vec![FilledField { element: "input[name=title]".into(), value: "Engineer".into() }]
        );
    }

    #[test]
    fn test_in_form() {
        let page = MemoryPage::from_html(
            r#"<form id="apply"><div><button>Add</button></div></form>
               <button>Outside</button>
               <button form="apply">Owned</button>"#,
        );
        let buttons = page.query_all("button");
        assert!(page.in_form(&buttons[0]));
        assert!(!page.in_form(&buttons[1]));
        assert!(page.in_form(&buttons[2]));
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let page = MemoryPage::from_html(FORM);
        assert!(page.query_all("div > input").is_empty());
    }
}
