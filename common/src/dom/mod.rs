//! ページ操作の抽象化
//!
//! エンジンはこのトレイト越しにだけページへ触れる。ブラウザ実装は `web-sys`、
//! テストとCLIプレビューはメモリ上のDOM（[`MemoryPage`]）を使う。

mod html;
mod memory;
mod selector;

pub use memory::{FilledField, MemoryPage, NodeId, PressAction};
pub use selector::{Selector, SelectorList};

use std::future::Future;
use std::time::Duration;

/// エンジンが発火するイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Input,
    Change,
}

impl DomEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
        }
    }
}

/// プルダウンの選択肢
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// 表示テキスト
    pub text: String,
    pub value: String,
}

/// エンジンから見たページ
///
/// 要素ハンドルは待機をまたいで保持しない。ホストページの再描画で要素が
/// 差し替わるため、各フェーズで問い合わせ直す。
pub trait Page {
    type Element: Clone;

    /// セレクタに一致する要素を文書順で返す
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// `scope` の子孫で最初に一致する要素
    fn query_within(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn query(&self, selector: &str) -> Option<Self::Element> {
        self.query_all(selector).into_iter().next()
    }

    /// 小文字のタグ名
    fn tag_name(&self, element: &Self::Element) -> String;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// 入力値（プルダウンは選択中の option の value）
    fn value(&self, element: &Self::Element) -> String;

    fn set_value(&self, element: &Self::Element, value: &str);

    /// 表示テキスト
    fn text_content(&self, element: &Self::Element) -> String;

    fn is_visible(&self, element: &Self::Element) -> bool;

    /// フォームに属しているか（祖先の form か `form` 属性による指定）
    fn in_form(&self, element: &Self::Element) -> bool;

    fn options(&self, select: &Self::Element) -> Vec<SelectOption>;

    fn selected_index(&self, select: &Self::Element) -> Option<usize>;

    fn select_index(&self, select: &Self::Element, index: usize);

    /// `label[for=id]` のテキスト
    fn label_for(&self, id: &str) -> Option<String>;

    /// バブリングするイベントを発火
    fn dispatch(&self, element: &Self::Element, event: DomEvent);

    fn set_style(&self, element: &Self::Element, property: &str, value: &str);

    /// ページ側の「追加」ボタンを押す
    ///
    /// 呼び出し元はブロック複製だけ。送信系のボタンは `replicator` 側で拒否する。
    fn press(&self, element: &Self::Element);

    /// 本文全体のテキスト
    fn body_text(&self) -> String;

    fn title(&self) -> String;

    fn url(&self) -> String;
}

/// 待機の抽象化（テストでは待たない実装に差し替える）
pub trait Clock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// 待機しない時計
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Clock for NoDelay {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> {
        std::future::ready(())
    }
}

/// 空白を1つにまとめて前後を削る
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
