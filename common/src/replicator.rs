//! 繰り返しブロックの複製
//!
//! プロフィールの職歴などが3件あるのにページにブロックが1つしかなければ、
//! ページ側の「追加」ボタンを押して揃える。押すのはこのモジュールだけで、
//! 送信につながりうるボタンは押さない。

use crate::dom::{Clock, Page};
use crate::guard;
use std::time::Duration;

/// ブロック数が増えなかった押下を何回まで許すか
const STALL_ALLOWANCE: usize = 2;

/// 押してよい「追加」ボタンを探す（候補セレクタの順に、表示中のもの）
pub fn find_add_control<P: Page>(page: &P, add_selectors: &[&str]) -> Option<P::Element> {
    add_selectors.iter().find_map(|selector| {
        page.query_all(selector)
            .into_iter()
            .find(|el| page.is_visible(el) && !guard::may_submit(page, el))
    })
}

/// ブロックが `target` 個になるまで「追加」を押す。最終的なブロック数を返す
///
/// ボタンがない・消えた・押しても増えない場合は途中で諦める。
/// 押下回数は `target - 現在数 + 2` 回が上限。
pub async fn ensure_blocks<P: Page, C: Clock>(
    page: &P,
    clock: &C,
    block_selector: &str,
    add_selectors: &[&str],
    target: usize,
    settle: Duration,
) -> usize {
    let mut count = page.query_all(block_selector).len();
    let mut presses_left = target.saturating_sub(count) + STALL_ALLOWANCE;

    while count < target {
        if presses_left == 0 {
            tracing::warn!("ブロックが増えません: {} / {}（{}）", count, target, block_selector);
            break;
        }

        // 再描画でボタンが差し替わるので毎回探し直す
        let Some(button) = find_add_control(page, add_selectors) else {
            tracing::debug!("追加ボタンが見つかりません: {} / {}", count, target);
            break;
        };

        page.press(&button);
        presses_left -= 1;
        clock.sleep(settle).await;
        count = page.query_all(block_selector).len();
    }

    count
}
