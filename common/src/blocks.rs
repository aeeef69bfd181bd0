//! 繰り返しブロック（職歴・学歴・資格）の定義表
//!
//! ブロック自体のセレクタ、「もう1件追加」ボタンの候補、ブロック内の各欄の
//! セレクタをATSごとの表記ゆれ込みで並べる。

use crate::profile::Profile;

/// 繰り返しブロックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Experience,
    Education,
    Certification,
}

/// ブロック内の欄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockField {
    Title,
    Company,
    Location,
    Start,
    End,
    Institution,
    Degree,
    GraduationYear,
    CertificationName,
    CertificationNumber,
    Issued,
    Expires,
}

/// ブロック内の欄とそのセレクタ
#[derive(Debug, Clone, Copy)]
pub struct BlockFieldRule {
    pub selector: &'static str,
    pub field: BlockField,
}

const EXPERIENCE_FIELDS: &[BlockFieldRule] = &[
    BlockFieldRule { selector: r#"input[name*="title"], input[id*="title"], [data-automation-id*="title"]"#, field: BlockField::Title },
    BlockFieldRule { selector: r#"input[name*="company"], input[id*="company"], [data-automation-id*="company"]"#, field: BlockField::Company },
    BlockFieldRule { selector: r#"input[name*="location"], input[id*="location"], [data-automation-id*="location"]"#, field: BlockField::Location },
    BlockFieldRule { selector: r#"input[name*="start"], input[id*="start"], [data-automation-id*="fromDate"]"#, field: BlockField::Start },
    BlockFieldRule { selector: r#"input[name*="end"], input[id*="end"], [data-automation-id*="toDate"]"#, field: BlockField::End },
];

const EDUCATION_FIELDS: &[BlockFieldRule] = &[
    BlockFieldRule { selector: r#"input[name*="school"], input[name*="university"], input[id*="university"], [data-automation-id*="school"]"#, field: BlockField::Institution },
    BlockFieldRule { selector: r#"input[name*="degree"], input[name*="major"], [data-automation-id*="degree"]"#, field: BlockField::Degree },
    BlockFieldRule { selector: r#"input[name*="year"], input[name*="grad"], [data-automation-id*="year"]"#, field: BlockField::GraduationYear },
];

const CERTIFICATION_FIELDS: &[BlockFieldRule] = &[
    BlockFieldRule { selector: r#"input[name*="certification"], input[name*="cert"], input[id*="certification"], [data-automation-id*="certification"]"#, field: BlockField::CertificationName },
    BlockFieldRule { selector: r#"input[name*="number"], input[name*="license"], input[id*="number"], [data-automation-id*="number"]"#, field: BlockField::CertificationNumber },
    BlockFieldRule { selector: r#"input[name*="issue"], input[id*="issue"], [data-automation-id*="issue"]"#, field: BlockField::Issued },
    BlockFieldRule { selector: r#"input[name*="expir"], input[name*="valid"], input[id*="expir"], [data-automation-id*="expir"]"#, field: BlockField::Expires },
];

impl BlockKind {
    /// 処理順（職歴 → 学歴 → 資格）
    pub const ALL: [BlockKind; 3] = [BlockKind::Experience, BlockKind::Education, BlockKind::Certification];

    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Experience => "experience",
            BlockKind::Education => "education",
            BlockKind::Certification => "certification",
        }
    }

    pub fn block_selector(&self) -> &'static str {
        match self {
            BlockKind::Experience => r#".experience-component, .job-history, [data-qa="experience"], [data-automation-id*="workExperience"], [data-automation-id*="Experience"]"#,
            BlockKind::Education => r#".education-component, .education-history, [data-qa="education"], [data-automation-id*="education"]"#,
            BlockKind::Certification => r#".certification-component, .certification-history, [data-qa="certification"], [data-automation-id*="certification"]"#,
        }
    }

    /// 「追加」ボタンの候補（先頭から試す）
    pub fn add_buttons(&self) -> &'static [&'static str] {
        match self {
            BlockKind::Experience => &[
                r#"button[data-automation-id="Add Another Work Experience"]"#,
                r#"button[aria-label="Add Work Experience"]"#,
                ".add-experience-button",
                r#"[data-qa="add-experience"]"#,
            ],
            BlockKind::Education => &[
                r#"button[data-automation-id="Add Another Education"]"#,
                r#"button[aria-label="Add Education"]"#,
                ".add-education-button",
                r#"[data-qa="add-education"]"#,
            ],
            BlockKind::Certification => &[
                r#"button[data-automation-id="Add Another Certification"]"#,
                r#"button[aria-label="Add Certification"]"#,
                ".add-certification-button",
                r#"[data-qa="add-certification"]"#,
            ],
        }
    }

    pub fn fields(&self) -> &'static [BlockFieldRule] {
        match self {
            BlockKind::Experience => EXPERIENCE_FIELDS,
            BlockKind::Education => EDUCATION_FIELDS,
            BlockKind::Certification => CERTIFICATION_FIELDS,
        }
    }

    /// プロフィール中の件数
    pub fn record_count(&self, profile: &Profile) -> usize {
        match self {
            BlockKind::Experience => profile.experiences.len(),
            BlockKind::Education => profile.educations.len(),
            BlockKind::Certification => profile.certifications.len(),
        }
    }
}

impl BlockField {
    /// `index` 番目のレコードから値を取り出す（範囲外や未設定は空文字）
    pub fn resolve(&self, profile: &Profile, index: usize) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        match self {
            BlockField::Title | BlockField::Company | BlockField::Location | BlockField::Start | BlockField::End => {
                let Some(exp) = profile.experiences.get(index) else {
                    return String::new();
                };
                match self {
                    BlockField::Title => text(&exp.title),
                    BlockField::Company => text(&exp.company),
                    BlockField::Location => exp
                        .location
                        .clone()
                        .filter(|l| !l.is_empty())
                        .unwrap_or_else(|| profile.city.clone()),
                    BlockField::Start => text(&exp.start),
                    _ => text(&exp.end),
                }
            }
            BlockField::Institution | BlockField::Degree | BlockField::GraduationYear => {
                let Some(edu) = profile.educations.get(index) else {
                    return String::new();
                };
                match self {
                    BlockField::Institution => text(&edu.institution),
                    BlockField::Degree => text(&edu.degree),
                    _ => edu.year.as_str().to_string(),
                }
            }
            BlockField::CertificationName | BlockField::CertificationNumber | BlockField::Issued | BlockField::Expires => {
                let Some(cert) = profile.certifications.get(index) else {
                    return String::new();
                };
                match self {
                    BlockField::CertificationName => text(&cert.name),
                    BlockField::CertificationNumber => text(&cert.identifier),
                    BlockField::Issued => text(&cert.issued),
                    _ => text(&cert.expires),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::SelectorList;
    use crate::profile::{Education, Experience, Numeric};

    #[test]
    fn test_all_selectors_parse() {
        for kind in BlockKind::ALL {
            assert!(SelectorList::parse(kind.block_selector()).is_ok(), "{}", kind.label());
            for button in kind.add_buttons() {
                assert!(SelectorList::parse(button).is_ok(), "{}", button);
            }
            for rule in kind.fields() {
                assert!(SelectorList::parse(rule.selector).is_ok(), "{}", rule.selector);
            }
        }
    }

    #[test]
    fn test_location_falls_back_to_city() {
        let profile = Profile {
            city: "Berlin".to_string(),
            experiences: vec![
                Experience { location: Some("Paris".to_string()), ..Default::default() },
                Experience::default(),
            ],
            ..Default::default()
        };
        assert_eq!(BlockField::Location.resolve(&profile, 0), "Paris");
        assert_eq!(BlockField::Location.resolve(&profile, 1), "Berlin");
        assert_eq!(BlockField::Location.resolve(&profile, 2), "");
    }

    #[test]
    fn test_graduation_year_is_canonical() {
        let profile = Profile {
            educations: vec![Education { year: Numeric::new("2,015"), ..Default::default() }],
            ..Default::default()
        };
        assert_eq!(BlockField::GraduationYear.resolve(&profile, 0), "2015");
    }
}
