use thiserror::Error;

#[derive(Error, Debug)]
pub enum SidekickError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("プロフィールが見つかりません: {0}（`sidekick profile init` で作成してください）")]
    ProfileNotFound(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力処理エラー: {0}")]
    Engine(String),
}

impl From<sidekick_common::Error> for SidekickError {
    fn from(err: sidekick_common::Error) -> Self {
        match err {
            sidekick_common::Error::Io(e) => SidekickError::Io(e),
            sidekick_common::Error::Json(e) => SidekickError::JsonParse(e),
            sidekick_common::Error::Config(msg) => SidekickError::Config(msg),
            sidekick_common::Error::Parse(msg) => SidekickError::Engine(msg),
        }
    }
}

impl From<dialoguer::Error> for SidekickError {
    fn from(err: dialoguer::Error) -> Self {
        SidekickError::Io(std::io::Error::new(std::io::ErrorKind::Other, err))
    }
}

pub type Result<T> = std::result::Result<T, SidekickError>;
