//! エラー型のテスト

use sidekick_rust::error::SidekickError;
use sidekick_rust::profile_store::{load_profile, save_profile};
use sidekick_common::Profile;
use tempfile::tempdir;

/// プロフィールがなければ作成方法を案内する
#[test]
fn test_profile_not_found() {
    let dir = tempdir().unwrap();
    let err = load_profile(&dir.path().join("profile.json")).unwrap_err();
    assert!(matches!(err, SidekickError::ProfileNotFound(_)));
    assert!(err.to_string().contains("sidekick profile init"));
}

/// 壊れたプロフィールはJSONエラー
#[test]
fn test_broken_profile() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("profile.json");
    std::fs::write(&path, "[1, 2").unwrap();
    let err = load_profile(&path).unwrap_err();
    assert!(matches!(err, SidekickError::JsonParse(_)));
}

/// 保存したプロフィールを読み戻せる
#[test]
fn test_profile_roundtrip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sub").join("profile.json");
    let profile = Profile {
        first_name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        ..Default::default()
    };
    save_profile(&path, &profile).unwrap();
    assert_eq!(load_profile(&path).unwrap(), profile);
}

/// エンジン側のエラーは対応する種類に変換する
#[test]
fn test_from_common_error() {
    let err: SidekickError = sidekick_common::Error::Parse("bad selector".to_string()).into();
    assert!(matches!(err, SidekickError::Engine(_)));
    assert_eq!(err.to_string(), "入力処理エラー: bad selector");

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: SidekickError = sidekick_common::Error::Io(io).into();
    assert!(matches!(err, SidekickError::Io(_)));
}

#[test]
fn test_error_display() {
    let err = SidekickError::ApiCall("http://localhost:8000 (500): boom".to_string());
    assert_eq!(err.to_string(), "API呼び出しエラー: http://localhost:8000 (500): boom");
}
