use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sidekick_common::{EngineConfig, MemoryPage, TrackingRecord};
use sidekick_rust::backend::BackendClient;
use sidekick_rust::{cli, config, error, job_text, logging, preview, profile_store};
use cli::{Cli, Commands, ProfileAction};
use config::Config;
use error::{Result, SidekickError};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load()?;
    let engine = EngineConfig {
        backend_url: config.backend_url(),
        ..EngineConfig::default()
    };

    match cli.command {
        Commands::Preview { form, profile, json, static_page } => {
            let profile_path = config.profile_path(profile.as_deref())?;
            let profile = profile_store::load_profile(&profile_path)?;

            let report = preview::preview_file(&form, &profile, !static_page).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("🧩 sidekick - 入力プレビュー\n");
                println!("フォーム: {}", form.display());
                println!("プロフィール: {}\n", profile_path.display());
                preview::print_report(&report);
                println!("\n✅ プレビュー完了（送信は行っていません）");
            }
        }

        Commands::Profile { action } => match action {
            ProfileAction::Show { path } => {
                let path = config.profile_path(path.as_deref())?;
                let profile = profile_store::load_profile(&path)?;
                println!("{}", profile.to_json_pretty()?);
            }
            ProfileAction::Init { path, force } => {
                let path = config.profile_path(path.as_deref())?;
                if path.exists() && !force {
                    return Err(SidekickError::Config(format!(
                        "{} は既に存在します（上書きは --force）",
                        path.display()
                    )));
                }

                println!("👤 sidekick - プロフィール作成\n");
                let profile = profile_store::init_interactive()?;
                profile_store::save_profile(&path, &profile)?;
                println!("\n✔ 保存: {}", path.display());

                let issues = profile_store::check(&profile);
                if !issues.is_empty() {
                    println!("\n⚠ 未入力の項目があります（`sidekick profile check` で再確認できます）");
                }
            }
            ProfileAction::Check { path } => {
                let path = config.profile_path(path.as_deref())?;
                let profile = profile_store::load_profile(&path)?;
                let issues = profile_store::check(&profile);

                println!("🔍 {} を点検\n", path.display());
                println!(
                    "職歴 {}件 / 学歴 {}件 / 資格 {}件",
                    profile.experiences.len(),
                    profile.educations.len(),
                    profile.certifications.len()
                );
                if issues.is_empty() {
                    println!("\n✅ 問題は見つかりませんでした");
                } else {
                    println!();
                    for issue in &issues {
                        println!("  ⚠ {}", issue);
                    }
                    println!("\n{}件の注意点があります", issues.len());
                }
            }
        },

        Commands::Analyze { jd, profile } => {
            let profile = profile_store::load_profile(&config.profile_path(profile.as_deref())?)?;
            let job_description = job_text::load_job_description(&jd, &engine)?;
            let backend = BackendClient::from_config(&config)?;

            let spinner = spinner("相性を診断中...");
            let analysis = backend.analyze_job(&job_description, &profile).await;
            spinner.finish_and_clear();
            let analysis = analysis?;

            println!("🎯 Sidekick Vibe Check\n");
            println!("マッチ度: {}% ({:?})", analysis.match_score.round(), analysis.band());
            if !analysis.missing_keywords.is_empty() {
                println!("\n不足キーワード:");
                for keyword in &analysis.missing_keywords {
                    println!("  - {}", keyword);
                }
            }
            if !analysis.red_flags.is_empty() {
                println!("\n注意点:");
                for flag in &analysis.red_flags {
                    println!("  🚩 {}", flag);
                }
            }
        }

        Commands::Prep { jd } => {
            let job_description = job_text::load_job_description(&jd, &engine)?;
            let backend = BackendClient::from_config(&config)?;

            let spinner = spinner("想定質問を生成中...");
            let prep = backend.interview_prep(&job_description).await;
            spinner.finish_and_clear();
            let prep = prep?;

            println!("🎤 面接対策 ({}問)\n", prep.questions.len());
            for (i, q) in prep.questions.iter().enumerate() {
                println!("Q{}: {}", i + 1, q.question);
                println!("   → {}\n", q.answer_guide);
            }
        }

        Commands::Write { context, jd, profile, output } => {
            let profile = profile_store::load_profile(&config.profile_path(profile.as_deref())?)?;
            let job_description = job_text::load_job_description(&jd, &engine)?;
            let backend = BackendClient::from_config(&config)?;

            let spinner = spinner(&format!("{} を生成中...", context));
            let generated = backend.generate_text(&context, &job_description, &profile).await;
            spinner.finish_and_clear();
            let generated = generated?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &generated.text)?;
                    println!("✔ 保存: {}", path.display());
                }
                None => println!("{}", generated.text),
            }
        }

        Commands::Track { form, url } => {
            if !form.exists() {
                return Err(SidekickError::FileNotFound(form.display().to_string()));
            }
            let html = std::fs::read_to_string(&form)?;
            let page = MemoryPage::from_html(&html).with_url(url);
            let date = chrono::Local::now().format("%Y-%m-%d").to_string();
            let record = TrackingRecord::from_page(&page, date);

            let backend = BackendClient::from_config(&config)?;
            backend.sync_tracker(&record).await?;
            println!("✔ 応募を記録: {} / {} ({})", record.company, record.title, record.date);
        }

        Commands::Config { show, set_backend, set_session, set_profile } => {
            let mut changed = false;
            if let Some(url) = set_backend {
                config.backend_url = Some(url);
                changed = true;
            }
            if let Some(session) = set_session {
                config.session_id = Some(session);
                changed = true;
            }
            if let Some(path) = set_profile {
                config.profile_path = Some(path);
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("バックエンドURL: {}", config.backend_url());
                println!("セッションID: {}", config.session_id());
                println!("プロフィール: {}", config.profile_path(None)?.display());
            }
        }
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
