//! フィールド照合ルール
//!
//! ルール表はデータとして定義し、評価関数は先勝ち（first-match-wins）で1件だけ返す。
//! 新しいATSに対応するときは表に行を追加する。

use crate::profile::{Answer, Profile};

/// テキスト入力に書き込むプロフィール項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    City,
    State,
    ZipCode,
    Country,
    LinkedIn,
    Portfolio,
    GitHub,
    University,
    Degree,
    GradYear,
    SalaryExpectation,
    NoticePeriod,
    YearsOfExperience,
    Skills,
    LatestTitle,
    LatestCompany,
}

impl ProfileField {
    /// 呼び出し時点のプロフィールから値を取り出す
    pub fn resolve(&self, profile: &Profile) -> String {
        let latest = profile.latest_experience();
        match self {
            ProfileField::FirstName => profile.first_name.clone(),
            ProfileField::LastName => profile.last_name.clone(),
            ProfileField::FullName => profile.display_name(),
            ProfileField::Email => profile.email.clone(),
            ProfileField::Phone => profile.phone.clone(),
            ProfileField::City => profile.city.clone(),
            ProfileField::State => profile.state.clone(),
            ProfileField::ZipCode => profile.zip_code.clone(),
            ProfileField::Country => profile.country.clone(),
            ProfileField::LinkedIn => profile.linkedin_url.clone(),
            ProfileField::Portfolio => profile.portfolio_url.clone(),
            ProfileField::GitHub => profile.github_url.clone(),
            ProfileField::University => profile.university.clone(),
            ProfileField::Degree => profile.degree.clone(),
            ProfileField::GradYear => profile.grad_year.as_str().to_string(),
            ProfileField::SalaryExpectation => profile.salary_exp.as_str().to_string(),
            ProfileField::NoticePeriod => profile.notice_period.as_str().to_string(),
            ProfileField::YearsOfExperience => profile.years_exp.as_str().to_string(),
            ProfileField::Skills => profile.skills_list.clone(),
            ProfileField::LatestTitle => latest.and_then(|e| e.title.clone()).unwrap_or_default(),
            ProfileField::LatestCompany => latest.and_then(|e| e.company.clone()).unwrap_or_default(),
        }
    }
}

/// はい/いいえ で答える質問の項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerField {
    VisaSponsorship,
    WorkAuthorization,
    BackgroundCheck,
    AgeOver18,
    Relocation,
    PreviousEmployment,
    NonCompete,
    ContactEmployer,
    WorkdaySystem,
    GovernmentEmployee,
    ExportControl,
    RelatedToEmployee,
    RelatedToOfficial,
}

impl AnswerField {
    pub fn resolve(&self, profile: &Profile) -> Answer {
        match self {
            AnswerField::VisaSponsorship => profile.visa_sponsorship,
            AnswerField::WorkAuthorization => profile.work_auth,
            AnswerField::BackgroundCheck => profile.background_check,
            AnswerField::AgeOver18 => profile.age18,
            AnswerField::Relocation => profile.relocate,
            AnswerField::PreviousEmployment => profile.prev_employment,
            AnswerField::NonCompete => profile.non_compete,
            AnswerField::ContactEmployer => profile.contact_employer,
            AnswerField::WorkdaySystem => profile.wd_system,
            AnswerField::GovernmentEmployee => profile.wd_govt,
            AnswerField::ExportControl => profile.wd_export,
            AnswerField::RelatedToEmployee => profile.wd_rel_employee,
            AnswerField::RelatedToOfficial => profile.wd_rel_govt,
        }
    }
}

/// 静的なテキストフィールドルール
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub keys: &'static [&'static str],
    pub exclude: &'static [&'static str],
    pub field: ProfileField,
}

/// 静的なはい/いいえルール
#[derive(Debug, Clone, Copy)]
pub struct BooleanRule {
    pub keys: &'static [&'static str],
    pub field: AnswerField,
}

/// テキストフィールドのルール表（上から順に評価）
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule { keys: &["first_name", "fname", "first name", "given name"], exclude: &["local"], field: ProfileField::FirstName },
    FieldRule { keys: &["last_name", "lname", "last name", "family name", "surname"], exclude: &["local"], field: ProfileField::LastName },
    FieldRule {
        keys: &["name", "full name"],
        exclude: &["company", "middle", "local", "first", "last", "given", "family", "user", "manager", "school", "university", "preferred"],
        field: ProfileField::FullName,
    },
    FieldRule { keys: &["email", "e-mail"], exclude: &[], field: ProfileField::Email },
    FieldRule { keys: &["phone", "mobile", "cell", "telephone"], exclude: &[], field: ProfileField::Phone },
    FieldRule { keys: &["city", "location"], exclude: &[], field: ProfileField::City },
    FieldRule { keys: &["state", "province"], exclude: &[], field: ProfileField::State },
    FieldRule { keys: &["zip", "postal"], exclude: &[], field: ProfileField::ZipCode },
    FieldRule { keys: &["country"], exclude: &[], field: ProfileField::Country },
    FieldRule { keys: &["linkedin"], exclude: &[], field: ProfileField::LinkedIn },
    FieldRule { keys: &["portfolio", "website", "url"], exclude: &[], field: ProfileField::Portfolio },
    FieldRule { keys: &["github", "gitlab", "git"], exclude: &[], field: ProfileField::GitHub },
    FieldRule { keys: &["university", "college", "school"], exclude: &[], field: ProfileField::University },
    FieldRule { keys: &["degree", "major", "concentration"], exclude: &[], field: ProfileField::Degree },
    FieldRule { keys: &["grad", "year"], exclude: &[], field: ProfileField::GradYear },
    FieldRule { keys: &["salary", "compensation", "expectation"], exclude: &[], field: ProfileField::SalaryExpectation },
    FieldRule { keys: &["notice", "start date", "available"], exclude: &[], field: ProfileField::NoticePeriod },
    FieldRule { keys: &["experience"], exclude: &[], field: ProfileField::YearsOfExperience },
    FieldRule { keys: &["skills", "expertise"], exclude: &[], field: ProfileField::Skills },
    FieldRule { keys: &["title", "role"], exclude: &[], field: ProfileField::LatestTitle },
    FieldRule { keys: &["company", "employer"], exclude: &[], field: ProfileField::LatestCompany },
];

/// プルダウンのはい/いいえルール表（上から順に評価）
pub const BOOLEAN_RULES: &[BooleanRule] = &[
    BooleanRule { keys: &["sponsor", "visa"], field: AnswerField::VisaSponsorship },
    BooleanRule { keys: &["authorize", "work auth", "legally auth"], field: AnswerField::WorkAuthorization },
    BooleanRule { keys: &["background"], field: AnswerField::BackgroundCheck },
    BooleanRule { keys: &["18", "older", "age"], field: AnswerField::AgeOver18 },
    BooleanRule { keys: &["relocat"], field: AnswerField::Relocation },
    BooleanRule { keys: &["previous", "employ"], field: AnswerField::PreviousEmployment },
    BooleanRule { keys: &["compete", "agreement"], field: AnswerField::NonCompete },
    BooleanRule { keys: &["contact", "employer"], field: AnswerField::ContactEmployer },
    BooleanRule { keys: &["workday system"], field: AnswerField::WorkdaySystem },
    BooleanRule { keys: &["government employee", "united states government"], field: AnswerField::GovernmentEmployee },
    BooleanRule { keys: &["export control", "sanctions", "cuba", "iran", "syria"], field: AnswerField::ExportControl },
    BooleanRule { keys: &["related to a current workday employee"], field: AnswerField::RelatedToEmployee },
    BooleanRule { keys: &["related to an employee of a customer", "government official"], field: AnswerField::RelatedToOfficial },
];

/// 値を解決済みのテキストルール（1回の入力処理の間だけ存在する）
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFieldRule {
    pub keys: Vec<&'static str>,
    pub exclude: Vec<&'static str>,
    pub value: String,
}

impl ResolvedFieldRule {
    pub fn new(keys: &[&'static str], exclude: &[&'static str], value: impl Into<String>) -> Self {
        Self {
            keys: keys.to_vec(),
            exclude: exclude.to_vec(),
            value: value.into(),
        }
    }

    /// キーワードが含まれ、除外語が含まれないか
    pub fn matches(&self, key: &str) -> bool {
        self.keys.iter().any(|k| key.contains(k)) && !self.exclude.iter().any(|e| key.contains(e))
    }
}

/// 値を解決済みのはい/いいえルール
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBooleanRule {
    pub keys: Vec<&'static str>,
    pub answer: Answer,
}

impl ResolvedBooleanRule {
    pub fn new(keys: &[&'static str], answer: Answer) -> Self {
        Self { keys: keys.to_vec(), answer }
    }

    pub fn matches(&self, context: &str) -> bool {
        self.keys.iter().any(|k| context.contains(k))
    }
}

/// プロフィールからテキストルールを組み立てる
pub fn resolve_field_rules(rules: &[FieldRule], profile: &Profile) -> Vec<ResolvedFieldRule> {
    rules
        .iter()
        .map(|rule| ResolvedFieldRule::new(rule.keys, rule.exclude, rule.field.resolve(profile)))
        .collect()
}

/// プロフィールからはい/いいえルールを組み立てる
pub fn resolve_boolean_rules(rules: &[BooleanRule], profile: &Profile) -> Vec<ResolvedBooleanRule> {
    rules
        .iter()
        .map(|rule| ResolvedBooleanRule::new(rule.keys, rule.field.resolve(profile)))
        .collect()
}

/// 最初に適用できるテキストルールを返す
///
/// 値が空のルールは飛ばして次のルールを見る。
pub fn first_field_match<'a>(rules: &'a [ResolvedFieldRule], key: &str) -> Option<&'a ResolvedFieldRule> {
    rules.iter().find(|rule| !rule.value.is_empty() && rule.matches(key))
}

/// 最初に適用できるはい/いいえルールを返す（未設定の回答は対象外）
pub fn first_boolean_match<'a>(rules: &'a [ResolvedBooleanRule], context: &str) -> Option<&'a ResolvedBooleanRule> {
    rules.iter().find(|rule| rule.answer.is_set() && rule.matches(context))
}

/// EEOなど自由記述で答えるプルダウンの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceCategory {
    Gender,
    Race,
    Veteran,
    Disability,
    EducationLevel,
}

impl ComplianceCategory {
    /// 文脈文字列から分類を判定（先勝ち）
    pub fn detect(context: &str) -> Option<Self> {
        const TABLE: &[(&[&str], ComplianceCategory)] = &[
            (&["gender", "sex"], ComplianceCategory::Gender),
            (&["race", "ethnic"], ComplianceCategory::Race),
            (&["veteran"], ComplianceCategory::Veteran),
            (&["disability"], ComplianceCategory::Disability),
            (&["education", "degree"], ComplianceCategory::EducationLevel),
        ];

        TABLE
            .iter()
            .find(|(keys, _)| keys.iter().any(|k| context.contains(k)))
            .map(|(_, category)| *category)
    }

    pub fn resolve<'a>(&self, profile: &'a Profile) -> &'a str {
        match self {
            ComplianceCategory::Gender => &profile.eeo_gender,
            ComplianceCategory::Race => &profile.eeo_race,
            ComplianceCategory::Veteran => &profile.eeo_veteran,
            ComplianceCategory::Disability => &profile.eeo_disability,
            ComplianceCategory::EducationLevel => &profile.education_level,
        }
    }
}
