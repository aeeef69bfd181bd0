//! 応募者プロフィールの型定義
//!
//! 拡張機能のストレージに保存されるJSON（camelCaseキー）と互換。
//! エンジンは呼び出しごとに受け取ったプロフィールを読むだけで、変更も保存もしない。

use crate::error::Result;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// はい/いいえ/未設定 の三値回答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Answer {
    Yes,
    No,
    #[default]
    Unset,
}

impl Answer {
    /// 文字列から解釈（大文字小文字は無視、"true"/"false"も受け付ける）
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "yes" | "true" | "y" => Answer::Yes,
            "no" | "false" | "n" => Answer::No,
            _ => Answer::Unset,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Answer::Unset)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::Unset => "",
        }
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Bool(true)) => Answer::Yes,
            Some(Raw::Bool(false)) => Answer::No,
            Some(Raw::Text(text)) => Answer::parse(&text),
            None => Answer::Unset,
        })
    }
}

/// 数値項目（経験年数・卒業年・希望年収・退職予告期間）
///
/// 数値として解釈できる値は桁区切りなしの10進表記に正規化して保持する。
/// "2 weeks" のような自由記述はそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Numeric(String);

impl Numeric {
    pub fn new(text: &str) -> Self {
        let trimmed = text.trim();
        let Some(compact) = strip_grouping(trimmed) else {
            return Numeric(trimmed.to_string());
        };

        if let Ok(int) = compact.parse::<i64>() {
            return Numeric(int.to_string());
        }
        if let Ok(int) = compact.parse::<u64>() {
            return Numeric(int.to_string());
        }
        match compact.parse::<f64>() {
            Ok(value) if value.is_finite() && !compact.is_empty() => Self::from_number(value),
            _ => Numeric(trimmed.to_string()),
        }
    }

    pub fn from_number(value: f64) -> Self {
        // f64のDisplayは指数表記も桁区切りも使わない（5.0 -> "5"）
        Numeric(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 整数部の桁区切り（`,` `_` 空白）を外す
///
/// 区切りの後ろがちょうど3桁のときだけ桁区切りとみなす。"1,5" のような表記は
/// 数値として扱わない。
fn strip_grouping(text: &str) -> Option<String> {
    let (int_part, frac) = match text.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (text, None),
    };

    let groups: Vec<&str> = int_part.split([',', '_', ' ']).collect();
    if let Some((first, rest)) = groups.split_first() {
        let lead = first.trim_start_matches(['-', '+']);
        let grouped = !rest.is_empty();
        if grouped
            && (lead.is_empty()
                || lead.len() > 3
                || rest
                    .iter()
                    .any(|g| g.len() != 3 || !g.bytes().all(|b| b.is_ascii_digit())))
        {
            return None;
        }
    }

    let mut compact = groups.concat();
    if let Some(frac) = frac {
        compact.push('.');
        compact.push_str(frac);
    }
    Some(compact)
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            return serializer.serialize_none();
        }
        if let Ok(int) = self.0.parse::<i64>() {
            return serializer.serialize_i64(int);
        }
        if let Ok(int) = self.0.parse::<u64>() {
            return serializer.serialize_u64(int);
        }
        if let Ok(float) = self.0.parse::<f64>() {
            return serializer.serialize_f64(float);
        }
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Unsigned(u64),
            Float(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Int(int)) => Numeric(int.to_string()),
            Some(Raw::Unsigned(int)) => Numeric(int.to_string()),
            Some(Raw::Float(float)) => Numeric::from_number(float),
            Some(Raw::Text(text)) => Numeric::new(&text),
            None => Numeric::default(),
        })
    }
}

/// 職歴
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub title: Option<String>,
    pub company: Option<String>,
    /// 勤務地（未設定ならプロフィールの都市を使う）
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub current: bool,
    pub description: Option<String>,
}

/// 学歴
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(rename = "university", alias = "institution", alias = "school")]
    pub institution: Option<String>,
    #[serde(alias = "major")]
    pub degree: Option<String>,
    /// 卒業年
    pub year: Numeric,
    /// 学位区分（Bachelors / Masters など）
    pub level: Option<String>,
}

/// 資格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: Option<String>,
    #[serde(rename = "number", alias = "identifier")]
    pub identifier: Option<String>,
    #[serde(rename = "start", alias = "issued")]
    pub issued: Option<String>,
    #[serde(rename = "end", alias = "expires")]
    pub expires: Option<String>,
}

/// 応募者プロフィール
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    // 本人情報
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,

    // 所在地
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,

    // リンク
    pub linkedin_url: String,
    pub portfolio_url: String,
    pub github_url: String,

    // 最終学歴（ブロック外の単独フィールド用）
    pub university: String,
    pub degree: String,
    pub grad_year: Numeric,
    pub education_level: String,

    // キャリア
    pub years_exp: Numeric,
    pub salary_exp: Numeric,
    pub notice_period: Numeric,
    pub skills_list: String,

    // EEO（任意回答）
    pub eeo_gender: String,
    pub eeo_race: String,
    pub eeo_veteran: String,
    pub eeo_disability: String,

    // はい/いいえ 質問
    pub work_auth: Answer,
    pub visa_sponsorship: Answer,
    pub background_check: Answer,
    pub age18: Answer,
    pub relocate: Answer,
    pub prev_employment: Answer,
    pub non_compete: Answer,
    pub contact_employer: Answer,

    // Workday 固有の確認質問
    pub wd_system: Answer,
    pub wd_govt: Answer,
    pub wd_export: Answer,
    pub wd_rel_employee: Answer,
    pub wd_rel_govt: Answer,

    // 繰り返しブロック（順序はユーザーが入力した順）
    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub certifications: Vec<Certification>,
}

impl Profile {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 表示用氏名（姓名が揃っていれば結合、なければ fullName）
    pub fn display_name(&self) -> String {
        if !self.first_name.is_empty() && !self.last_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name).trim().to_string()
        } else {
            self.full_name.clone()
        }
    }

    /// 直近の職歴
    pub fn latest_experience(&self) -> Option<&Experience> {
        self.experiences.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_parse() {
        assert_eq!(Answer::parse("Yes"), Answer::Yes);
        assert_eq!(Answer::parse(" no "), Answer::No);
        assert_eq!(Answer::parse("TRUE"), Answer::Yes);
        assert_eq!(Answer::parse("Prefer not to say"), Answer::Unset);
        assert_eq!(Answer::parse(""), Answer::Unset);
    }

    #[test]
    fn test_numeric_grouping_and_precision() {
        // 3桁区切りでないカンマは小数点の可能性があるので数値にしない
        assert_eq!(Numeric::new("1,5").as_str(), "1,5");
        assert_eq!(Numeric::new("1,20,000").as_str(), "1,20,000");
        assert_eq!(Numeric::new("1 200 000").as_str(), "1200000");
        assert_eq!(Numeric::new("-1,000.25").as_str(), "-1000.25");
        assert_eq!(Numeric::new("9007199254740993").as_str(), "9007199254740993");
        assert_eq!(Numeric::new("18446744073709551615").as_str(), "18446744073709551615");

        let json = serde_json::to_string(&Numeric::new("9007199254740993")).unwrap();
        assert_eq!(json, "9007199254740993");
    }

    #[test]
    fn test_numeric_canonical_form() {
        assert_eq!(Numeric::new("120,000").as_str(), "120000");
        assert_eq!(Numeric::new("5").as_str(), "5");
        assert_eq!(Numeric::new("1.5").as_str(), "1.5");
        assert_eq!(Numeric::new("2 weeks").as_str(), "2 weeks");
        assert!(Numeric::new("  ").is_empty());
        assert_eq!(Numeric::from_number(2024.0).as_str(), "2024");
    }

    #[test]
    fn test_profile_deserialize_extension_keys() {
        let json = r#"{
            "firstName": "Ada",
            "lastName": "Lovelace",
            "zipCode": "94105",
            "linkedinUrl": "https://linkedin.com/in/ada",
            "yearsExp": 7,
            "salaryExp": "150,000",
            "gradYear": 2015.0,
            "workAuth": "Yes",
            "visaSponsorship": false,
            "age18": "yes",
            "gemini_key": "ignored",
            "experiences": [{"title": "Engineer", "company": "Acme", "start": "2020-01"}],
            "educations": [{"university": "MIT", "degree": "CS", "year": "2015"}],
            "certifications": [{"name": "CKA", "number": "LF-1", "start": "2022-03", "end": "2025-03"}]
        }"#;

        let profile = Profile::from_json(json).expect("デシリアライズ失敗");
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.zip_code, "94105");
        assert_eq!(profile.years_exp.as_str(), "7");
        assert_eq!(profile.salary_exp.as_str(), "150000");
        assert_eq!(profile.grad_year.as_str(), "2015");
        assert_eq!(profile.work_auth, Answer::Yes);
        assert_eq!(profile.visa_sponsorship, Answer::No);
        assert_eq!(profile.age18, Answer::Yes);
        assert_eq!(profile.relocate, Answer::Unset);
        assert_eq!(profile.experiences[0].company.as_deref(), Some("Acme"));
        assert_eq!(profile.educations[0].institution.as_deref(), Some("MIT"));
        assert_eq!(profile.certifications[0].identifier.as_deref(), Some("LF-1"));
        assert_eq!(profile.certifications[0].expires.as_deref(), Some("2025-03"));
    }

    #[test]
    fn test_profile_serialize_keys() {
        let profile = Profile {
            first_name: "Ada".to_string(),
            years_exp: Numeric::new("7"),
            work_auth: Answer::Yes,
            ..Default::default()
        };

        let json = serde_json::to_string(&profile).expect("シリアライズ失敗");
        assert!(json.contains("\"firstName\":\"Ada\""));
        assert!(json.contains("\"yearsExp\":7"));
        assert!(json.contains("\"workAuth\":\"Yes\""));
        assert!(json.contains("\"salaryExp\":null"));
    }

    #[test]
    fn test_empty_object_is_valid_profile() {
        let profile = Profile::from_json("{}").unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_display_name() {
        let mut profile = Profile {
            full_name: "Grace Hopper".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "Grace Hopper");

        profile.first_name = "Ada".to_string();
        profile.last_name = "Lovelace".to_string();
        assert_eq!(profile.display_name(), "Ada Lovelace");
    }
}
