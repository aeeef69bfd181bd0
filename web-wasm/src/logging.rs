//! tracing の出力先をブラウザのコンソールにする

use std::io;
use wasm_bindgen::JsValue;

/// 1イベント = 1回の console.log
struct ConsoleWriter;

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn init() {
    // wasm32 では時刻が取れないので without_time
    let result = tracing_subscriber::fmt()
        .with_writer(|| ConsoleWriter)
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .try_init();

    if result.is_err() {
        web_sys::console::warn_1(&JsValue::from_str("Sidekick: logger already initialised"));
    }
}
