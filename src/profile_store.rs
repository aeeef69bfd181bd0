//! プロフィールファイルの読み書きと対話作成
//!
//! 拡張機能のストレージと同じ camelCase JSON をそのまま使うので、
//! CLIで作ったファイルはオプション画面から読み込める。

use crate::error::{Result, SidekickError};
use dialoguer::{Confirm, Input, Select};
use sidekick_common::profile::{Education, Experience, Numeric};
use sidekick_common::{Answer, Profile};
use std::path::Path;

pub fn load_profile(path: &Path) -> Result<Profile> {
    if !path.exists() {
        return Err(SidekickError::ProfileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Profile::from_json(&content)?)
}

pub fn save_profile(path: &Path, profile: &Profile) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, profile.to_json_pretty()?)?;
    Ok(())
}

/// 入力精度に影響する抜け漏れを列挙する
pub fn check(profile: &Profile) -> Vec<String> {
    let mut issues = Vec::new();

    if profile.display_name().trim().is_empty() {
        issues.push("氏名が未設定です".to_string());
    }
    if profile.email.is_empty() {
        issues.push("メールアドレスが未設定です".to_string());
    } else if !profile.email.contains('@') {
        issues.push(format!("メールアドレスの形式が不正です: {}", profile.email));
    }
    if profile.phone.is_empty() {
        issues.push("電話番号が未設定です".to_string());
    }

    for (i, exp) in profile.experiences.iter().enumerate() {
        if is_blank(&exp.title) && is_blank(&exp.company) {
            issues.push(format!("職歴{}: 職種と会社名が両方とも空です", i + 1));
        }
    }
    for (i, edu) in profile.educations.iter().enumerate() {
        if is_blank(&edu.institution) {
            issues.push(format!("学歴{}: 学校名が空です", i + 1));
        }
    }
    for (i, cert) in profile.certifications.iter().enumerate() {
        if is_blank(&cert.name) {
            issues.push(format!("資格{}: 資格名が空です", i + 1));
        }
    }

    let unanswered = [profile.work_auth, profile.visa_sponsorship, profile.age18]
        .iter()
        .filter(|a| !a.is_set())
        .count();
    if unanswered > 0 {
        issues.push(format!(
            "基本のはい/いいえ質問に未回答が{}件あります（該当プルダウンは変更されません）",
            unanswered
        ));
    }

    issues
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

/// 対話形式でプロフィールを作る
pub fn init_interactive() -> Result<Profile> {
    let mut profile = Profile {
        first_name: ask("名 (First name)")?,
        last_name: ask("姓 (Last name)")?,
        email: ask("メールアドレス")?,
        phone: ask("電話番号")?,
        city: ask("市区町村 (City)")?,
        state: ask("州・都道府県 (State)")?,
        country: ask("国 (Country)")?,
        linkedin_url: ask("LinkedIn URL")?,
        github_url: ask("GitHub URL")?,
        ..Default::default()
    };
    profile.full_name = format!("{} {}", profile.first_name, profile.last_name)
        .trim()
        .to_string();
    profile.years_exp = Numeric::new(&ask("経験年数")?);
    profile.skills_list = ask("スキル（カンマ区切り）")?;

    profile.work_auth = ask_answer("就労資格がありますか")?;
    profile.visa_sponsorship = ask_answer("ビザのスポンサーが必要ですか")?;
    profile.age18 = ask_answer("18歳以上ですか")?;
    profile.relocate = ask_answer("転居できますか")?;

    while Confirm::new()
        .with_prompt("職歴を追加しますか")
        .default(profile.experiences.is_empty())
        .interact()?
    {
        profile.experiences.push(Experience {
            title: non_empty(ask("  職種")?),
            company: non_empty(ask("  会社名")?),
            location: non_empty(ask("  勤務地")?),
            start: non_empty(ask("  開始 (YYYY-MM)")?),
            end: non_empty(ask("  終了 (YYYY-MM, 在職中は空)")?),
            ..Default::default()
        });
    }

    while Confirm::new()
        .with_prompt("学歴を追加しますか")
        .default(profile.educations.is_empty())
        .interact()?
    {
        profile.educations.push(Education {
            institution: non_empty(ask("  学校名")?),
            degree: non_empty(ask("  学位・専攻")?),
            year: Numeric::new(&ask("  卒業年")?),
            ..Default::default()
        });
    }

    if let Some(first) = profile.educations.first() {
        profile.university = first.institution.clone().unwrap_or_default();
        profile.degree = first.degree.clone().unwrap_or_default();
        profile.grad_year = first.year.clone();
    }

    Ok(profile)
}

fn ask(prompt: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(input.trim().to_string())
}

fn ask_answer(prompt: &str) -> Result<Answer> {
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&["Yes", "No", "未回答"])
        .default(2)
        .interact()?;
    Ok(match choice {
        0 => Answer::Yes,
        1 => Answer::No,
        _ => Answer::Unset,
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
