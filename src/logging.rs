//! ログ出力の初期化

use tracing_subscriber::EnvFilter;

/// `--verbose` なら debug、なければ `RUST_LOG`、それもなければ warn
pub fn filter_directives(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => "warn".to_string(),
    }
}

/// 標準エラーへ出力する subscriber を登録する
pub fn init(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_rust_log() {
        assert_eq!(filter_directives(true, Some("error")), "debug");
        assert_eq!(filter_directives(true, None), "debug");
    }

    #[test]
    fn test_rust_log_then_default() {
        assert_eq!(filter_directives(false, Some("sidekick_common=trace")), "sidekick_common=trace");
        assert_eq!(filter_directives(false, Some("  ")), "warn");
        assert_eq!(filter_directives(false, None), "warn");
    }
}
