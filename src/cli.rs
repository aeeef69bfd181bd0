use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sidekick")]
#[command(about = "求人応募フォーム自動入力アシスタント（送信は必ず本人が行う）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 保存した応募フォームHTMLで入力内容をプレビュー（送信はしない）
    Preview {
        /// 応募フォームのHTMLファイル
        #[arg(short, long, required = true)]
        form: PathBuf,

        /// プロフィールJSON（デフォルト: 設定ファイルの場所）
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// 「追加」ボタンのブロック複製を再現しない
        #[arg(long)]
        static_page: bool,
    },

    /// プロフィールの表示・作成・点検
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// 求人との相性を診断
    Analyze {
        /// ジョブ記述（.txt または保存した求人ページ .html）
        #[arg(long, required = true)]
        jd: PathBuf,

        /// プロフィールJSON
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },

    /// 面接の想定質問を生成
    Prep {
        /// ジョブ記述（.txt / .html）
        #[arg(long, required = true)]
        jd: PathBuf,
    },

    /// カバーレター・リクルーター宛メッセージを生成
    Write {
        /// 文章の種類（"Cover Letter" / "Recruiter DM"）
        #[arg(short, long, default_value = "Cover Letter")]
        context: String,

        /// ジョブ記述（.txt / .html）
        #[arg(long, required = true)]
        jd: PathBuf,

        /// プロフィールJSON
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 応募済みとしてトラッカーに記録
    Track {
        /// 応募したページのHTMLファイル（会社名・職種名を拾う）
        #[arg(short, long, required = true)]
        form: PathBuf,

        /// 応募ページのURL
        #[arg(short, long, default_value = "")]
        url: String,
    },

    /// 設定を表示・変更
    Config {
        /// 現在の設定を表示
        #[arg(long)]
        show: bool,

        /// バックエンドURLを設定
        #[arg(long)]
        set_backend: Option<String>,

        /// セッションIDを設定
        #[arg(long)]
        set_session: Option<String>,

        /// 既定のプロフィールJSONを設定
        #[arg(long)]
        set_profile: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// プロフィールを表示
    Show {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// 対話形式でプロフィールを作成
    Init {
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// 既存ファイルを上書き
        #[arg(long)]
        force: bool,
    },

    /// 入力に影響する抜け漏れを点検
    Check {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}
