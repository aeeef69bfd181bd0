//! 求人との相性診断ウィジェット

use crate::api::Backend;
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use sidekick_common::jobs::{InterviewPrep, TextPurpose};
use sidekick_common::{JobAnalysis, Profile};

const WIDGET_STYLE: &str = "position: fixed; top: 20px; right: 20px; width: 300px; background-color: #1e1b4b; \
    color: white; padding: 16px; border-radius: 12px; z-index: 999999; border: 1px solid #3730a3; \
    box-shadow: 0 10px 25px -5px rgba(0, 0, 0, 0.5); font-family: system-ui, -apple-system, sans-serif;";

const CHIP_STYLE: &str = "background: rgba(239, 68, 68, 0.2); color: #fca5a5; padding: 2px 6px; \
    border-radius: 4px; font-size: 11px; border: 1px solid rgba(239, 68, 68, 0.3);";

const OUTPUT_STYLE: &str = "margin-top: 12px; font-size: 11px; color: #cbd5e1; white-space: pre-wrap; \
    background: rgba(0,0,0,0.3); padding: 8px; border-radius: 6px; max-height: 200px; overflow-y: auto;";

const ACTION_STYLE: &str = "flex: 1; color: white; border: none; padding: 6px 12px; border-radius: 6px; \
    font-size: 11px; font-weight: bold; cursor: pointer;";

/// 想定質問を読みやすいテキストにする
pub fn format_questions(prep: &InterviewPrep) -> String {
    prep.questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("Q{}: {}\n{}", i + 1, q.question, q.answer_guide))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[component]
pub fn VibeCheck(
    analysis: JobAnalysis,
    backend: Backend,
    profile: Profile,
    job_description: String,
) -> impl IntoView {
    let (visible, set_visible) = signal(true);
    let (output, set_output) = signal(None::<String>);

    let score_color = analysis.band().color();
    let score = format!("{:.0}%", analysis.match_score);
    let missing = analysis.missing_keywords.clone();
    let red_flags = analysis.red_flags.clone();

    let on_prep = {
        let backend = backend.clone();
        let job_description = job_description.clone();
        move |_: MouseEvent| {
            let backend = backend.clone();
            let job_description = job_description.clone();
            set_output.set(Some("Generating likely interview questions...".to_string()));
            spawn_local(async move {
                let text = match backend.interview_prep(&job_description).await {
                    Ok(prep) => format_questions(&prep),
                    Err(e) => {
                        tracing::warn!("面接対策の生成に失敗: {:?}", e);
                        "Error generating prep.".to_string()
                    }
                };
                set_output.set(Some(text));
            });
        }
    };

    let on_dm = move |_: MouseEvent| {
        let backend = backend.clone();
        let profile = profile.clone();
        let job_description = job_description.clone();
        set_output.set(Some("Generating custom Recruiter DM...".to_string()));
        spawn_local(async move {
            let text = match backend
                .generate_text(TextPurpose::RecruiterDm, &job_description, &profile)
                .await
            {
                Ok(generated) => generated.text,
                Err(e) => {
                    tracing::warn!("メッセージ生成に失敗: {:?}", e);
                    "Error generating text.".to_string()
                }
            };
            set_output.set(Some(text));
        });
    };

    view! {
        <Show when=move || visible.get()>
            <div style=WIDGET_STYLE>
                <div style="display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 8px;">
                    <span style="font-size: 14px; font-weight: 700; color: #a5b4fc;">"ATS Vibe Check"</span>
                    <button
                        type="button"
                        style="background: none; border: none; color: #6366f1; cursor: pointer; padding: 0; font-size: 16px;"
                        on:click=move |_| set_visible.set(false)
                    >
                        "×"
                    </button>
                </div>

                <div style="display: flex; align-items: center; justify-content: space-between; background: rgba(0,0,0,0.2); padding: 8px; border-radius: 8px;">
                    <span style="font-size: 13px; color: #cbd5e1;">"Match Score"</span>
                    <span style=format!("font-size: 20px; font-weight: 800; color: {};", score_color)>
                        {score.clone()}
                    </span>
                </div>

                {(!missing.is_empty()).then(|| {
                    let chips = missing
                        .iter()
                        .map(|kw| view! { <span style=CHIP_STYLE>{kw.clone()}</span> })
                        .collect_view();
                    view! {
                        <div style="margin-top: 12px;">
                            <p style="font-size: 11px; color: #a5b4fc; text-transform: uppercase; font-weight: bold; margin: 0 0 4px 0;">
                                "Missing Keywords"
                            </p>
                            <div style="display: flex; flex-wrap: wrap; gap: 4px;">{chips}</div>
                        </div>
                    }
                })}

                {(!red_flags.is_empty()).then(|| {
                    let items = red_flags
                        .iter()
                        .map(|flag| view! { <li>{flag.clone()}</li> })
                        .collect_view();
                    view! {
                        <div style="margin-top: 12px; border-top: 1px solid rgba(245, 158, 11, 0.3); padding-top: 8px;">
                            <p style="font-size: 11px; color: #fbbf24; text-transform: uppercase; font-weight: bold; margin: 0 0 4px 0;">
                                "Red Flags Detected"
                            </p>
                            <ul style="margin: 0; padding-left: 16px; font-size: 11px; color: #fde68a;">{items}</ul>
                        </div>
                    }
                })}

                <div style="margin-top: 16px; display: flex; gap: 8px;">
                    <button type="button" style=format!("{} background: #4f46e5;", ACTION_STYLE) on:click=on_prep.clone()>
                        "Prep Interview"
                    </button>
                    <button type="button" style=format!("{} background: #475569;", ACTION_STYLE) on:click=on_dm.clone()>
                        "Generate DM"
                    </button>
                </div>

                {move || output.get().map(|text| view! { <div style=OUTPUT_STYLE>{text}</div> })}
            </div>
        </Show>
    }
}

pub fn show(analysis: JobAnalysis, backend: Backend, profile: Profile, job_description: String) {
    super::mount_overlay(move || {
        view! {
            <VibeCheck
                analysis=analysis
                backend=backend
                profile=profile
                job_description=job_description
            />
        }
    });
}
