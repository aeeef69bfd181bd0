//! ブラウザDOM上のページ実装

use gloo::timers::future::TimeoutFuture;
use sidekick_common::dom::{normalize_text, Clock, DomEvent, Page, SelectOption};
use std::future::Future;
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventInit, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTextAreaElement, NodeList,
};

/// 表示中の文書
#[derive(Debug, Clone)]
pub struct WebPage {
    document: Document,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// 利用者の操作によるイベントか（スクリプトの `click()` や `dispatchEvent` は偽）
pub fn is_user_action(event: &Event) -> bool {
    event.is_trusted()
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Page for WebPage {
    type Element = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(e) => {
                tracing::warn!("セレクタを解釈できません: {} ({:?})", selector, e);
                Vec::new()
            }
        }
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name().to_lowercase()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn value(&self, element: &Element) -> String {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, element: &Element, value: &str) {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn text_content(&self, element: &Element) -> String {
        let text = match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.inner_text(),
            None => element.text_content().unwrap_or_default(),
        };
        normalize_text(&text)
    }

    fn is_visible(&self, element: &Element) -> bool {
        if element.closest("[hidden]").ok().flatten().is_some() {
            return false;
        }
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return true;
        };

        let style = web_sys::window().and_then(|w| w.get_computed_style(element).ok().flatten());
        let computed = |property: &str| {
            style
                .as_ref()
                .and_then(|s| s.get_property_value(property).ok())
                .unwrap_or_default()
        };

        if computed("visibility") == "hidden" {
            return false;
        }
        // display:none の祖先があると offsetParent は null（fixed 配置は例外）
        html.offset_parent().is_some() || computed("position") == "fixed"
    }

    fn in_form(&self, element: &Element) -> bool {
        element.has_attribute("form") || element.closest("form").ok().flatten().is_some()
    }

    fn options(&self, select: &Element) -> Vec<SelectOption> {
        let Some(select) = select.dyn_ref::<HtmlSelectElement>() else {
            return Vec::new();
        };
        let options = select.options();
        (0..options.length())
            .filter_map(|i| options.item(i))
            .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
            .map(|opt| SelectOption {
                text: normalize_text(&opt.text()),
                value: opt.value(),
            })
            .collect()
    }

    fn selected_index(&self, select: &Element) -> Option<usize> {
        let index = select.dyn_ref::<HtmlSelectElement>()?.selected_index();
        usize::try_from(index).ok()
    }

    fn select_index(&self, select: &Element, index: usize) {
        if let (Some(select), Ok(index)) = (select.dyn_ref::<HtmlSelectElement>(), i32::try_from(index)) {
            select.set_selected_index(index);
        }
    }

    fn label_for(&self, id: &str) -> Option<String> {
        self.query_all("label")
            .into_iter()
            .find(|label| label.get_attribute("for").as_deref() == Some(id))
            .map(|label| self.text_content(&label))
    }

    fn dispatch(&self, element: &Element, event: DomEvent) {
        let init = EventInit::new();
        init.set_bubbles(true);
        let result = Event::new_with_event_init_dict(event.as_str(), &init)
            .and_then(|ev| element.dispatch_event(&ev));
        if let Err(e) = result {
            tracing::warn!("{} イベントを発火できません: {:?}", event.as_str(), e);
        }
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn press(&self, element: &Element) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            html.click();
        }
    }

    fn body_text(&self) -> String {
        self.document
            .body()
            .map(|body| normalize_text(&body.inner_text()))
            .unwrap_or_default()
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn url(&self) -> String {
        self.document
            .location()
            .and_then(|location| location.href().ok())
            .unwrap_or_default()
    }
}

/// setTimeout による待機
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis)
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(html: &str) -> WebPage {
        let page = WebPage::new().expect("document");
        let body = page.document().body().expect("body");
        body.set_inner_html(html);
        page
    }

    #[wasm_bindgen_test]
    fn wasm_value_roundtrip_and_events() {
        let page = mount(r#"<input name="first_name">"#);
        let input = page.query("input").expect("input");
        page.set_value(&input, "Ada");
        page.dispatch(&input, DomEvent::Input);
        assert_eq!(page.value(&input), "Ada");
    }

    #[wasm_bindgen_test]
    fn wasm_select_and_label() {
        let page = mount(
            r#"<label for="auth">Work authorization</label>
               <select id="auth"><option value="">Select</option><option value="y">Yes</option></select>"#,
        );
        let select = page.query("select").expect("select");
        assert_eq!(page.selected_index(&select), Some(0));
        page.select_index(&select, 1);
        assert_eq!(page.value(&select), "y");
        assert_eq!(page.label_for("auth").as_deref(), Some("Work authorization"));
    }

    #[wasm_bindgen_test]
    fn wasm_scripted_clicks_are_not_user_actions() {
        use std::cell::RefCell;
        use std::rc::Rc;
        use wasm_bindgen::closure::Closure;

        let page = mount(r#"<button type="button">Submit Application</button>"#);
        let button = page.query("button").expect("button");

        let seen: Rc<RefCell<Vec<bool>>> = Rc::default();
        let sink = seen.clone();
        let listener = Closure::wrap(Box::new(move |event: Event| {
            sink.borrow_mut().push(is_user_action(&event));
        }) as Box<dyn FnMut(_)>);
        button
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .expect("listener");

        let click = Event::new("click").expect("event");
        button.dispatch_event(&click).expect("dispatch");
        page.press(&button);

        assert_eq!(*seen.borrow(), vec![false, false]);
        listener.forget();
    }

    #[wasm_bindgen_test]
    fn wasm_hidden_elements_are_invisible() {
        let page = mount(r#"<div style="display:none"><button>Add</button></div><button hidden>Add</button>"#);
        for button in page.query_all("button") {
            assert!(!page.is_visible(&button));
        }
    }
}
