//! Server-side HTML for the form and result cards.
//!
//! One page template: header, the four form sections, then either nothing,
//! an error card, or the quality + prediction cards. All user-supplied text
//! goes through `html_escape` before it reaches the page.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::assess::{Assessment, QualitySource};
use crate::error::InputError;
use crate::features::{bounds, BmiCategory, FormInput, Gender, QualityMode};
use crate::model::Prediction;

const STYLE: &str = r#"
body { background-color: #0f172a; font-family: sans-serif; max-width: 760px; margin: 0 auto; padding: 24px; }
h1, h2, h3, h4, p, label, summary { color: #e5e7eb; }
.hero { background: linear-gradient(135deg,#6366f1,#8b5cf6); padding: 35px; border-radius: 22px; text-align: center; box-shadow: 0px 10px 30px rgba(0,0,0,0.3); }
details { background-color: #111827; border-radius: 14px; padding: 12px 18px; margin-bottom: 12px; }
label { display: block; margin: 10px 0 4px; }
input, select, textarea { width: 100%; padding: 8px; border-radius: 8px; border: 1px solid #374151; background: #1f2937; color: #e5e7eb; }
.row { display: flex; gap: 16px; }
.row > div { flex: 1; }
button { background-color: #6366f1; color: white; font-size: 18px; padding: 12px 28px; border-radius: 14px; border: 0; display: block; margin: 24px auto; }
button:hover { background-color: #4f46e5; }
.card { background-color: #1f2937; padding: 20px; border-radius: 18px; margin-bottom: 15px; color: #e5e7eb; }
.footer { text-align: center; opacity: 0.6; margin-top: 30px; color: #e5e7eb; }
"#;

/// What to show below the form.
enum Outcome<'a> {
    Blank,
    Failed { title: &'static str, message: String },
    Assessed(&'a Assessment),
}

/// Empty form. Defaults follow the widget minimums.
pub fn form_page(mode: QualityMode) -> String {
    page(mode, &default_values(mode), Outcome::Blank)
}

/// Form re-filled with the submission, plus the error card.
pub fn error_page(mode: QualityMode, values: &FormInput, err: &InputError) -> String {
    page(
        mode,
        values,
        Outcome::Failed {
            title: "Invalid input",
            message: err.to_string(),
        },
    )
}

/// Blank form plus an error card, for bodies that could not be decoded.
pub fn rejected_page(mode: QualityMode, message: &str) -> String {
    page(
        mode,
        &default_values(mode),
        Outcome::Failed {
            title: "Invalid input",
            message: message.to_string(),
        },
    )
}

/// Form re-filled with the submission, plus a generic failure card.
pub fn error_page_internal(mode: QualityMode, values: &FormInput) -> String {
    page(
        mode,
        values,
        Outcome::Failed {
            title: "Prediction unavailable",
            message: "The model could not produce a prediction. Please try again later.".into(),
        },
    )
}

/// Form re-filled with the submission, plus quality and prediction cards.
pub fn result_page(mode: QualityMode, values: &FormInput, assessment: &Assessment) -> String {
    page(mode, values, Outcome::Assessed(assessment))
}

/// The mode a submission was made in, judged by which quality field it carries.
pub fn mode_of(values: &FormInput, fallback: QualityMode) -> QualityMode {
    match (&values.sleep_quality_text, values.sleep_quality) {
        (None, Some(_)) => QualityMode::Slider,
        (Some(_), None) => QualityMode::Text,
        _ => fallback,
    }
}

fn default_values(mode: QualityMode) -> FormInput {
    FormInput {
        gender: Gender::CHOICES[0].to_string(),
        age: bounds::AGE.0,
        sleep_duration: bounds::SLEEP_DURATION.0,
        sleep_quality_text: (mode == QualityMode::Text).then(String::new),
        sleep_quality: (mode == QualityMode::Slider).then_some(bounds::SLEEP_QUALITY.0),
        physical_activity: bounds::PHYSICAL_ACTIVITY.0,
        stress_level: bounds::STRESS_LEVEL.0,
        bmi: BmiCategory::CHOICES[0].to_string(),
        heart_rate: bounds::HEART_RATE.0,
        daily_steps: bounds::DAILY_STEPS.0,
        systolic_bp: bounds::SYSTOLIC_BP.0,
        diastolic_bp: bounds::DIASTOLIC_BP.0,
    }
}

fn page(mode: QualityMode, v: &FormInput, outcome: Outcome<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Sleep Disorder Prediction</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str(
        "<div class=\"hero\">\n<h1>Sleep Disorder Prediction System</h1>\n\
         <p style=\"font-size:18px;\">AI-based health dashboard to analyze sleep patterns and lifestyle factors</p>\n\
         </div>\n",
    );

    html.push_str("<form method=\"post\" action=\"/predict\">\n");

    // Personal Information
    html.push_str("<details open>\n<summary>Personal Information</summary>\n");
    select(&mut html, "Gender", "gender", &Gender::CHOICES, &v.gender);
    number(&mut html, "Age", "age", v.age, bounds::AGE);
    html.push_str("</details>\n");

    // Sleep Details
    html.push_str("<details open>\n<summary>Sleep Details</summary>\n");
    let _ = write!(
        html,
        "<label for=\"sleep_duration\">Sleep Duration (hours)</label>\n\
         <input type=\"number\" id=\"sleep_duration\" name=\"sleep_duration\" min=\"{}\" max=\"{}\" step=\"0.1\" value=\"{}\" required>\n",
        bounds::SLEEP_DURATION.0,
        bounds::SLEEP_DURATION.1,
        v.sleep_duration
    );
    match mode {
        QualityMode::Text => {
            let text = v.sleep_quality_text.as_deref().unwrap_or("");
            let _ = write!(
                html,
                "<label for=\"sleep_quality_text\">Describe your sleep quality</label>\n\
                 <textarea id=\"sleep_quality_text\" name=\"sleep_quality_text\" rows=\"5\" \
                 placeholder=\"e.g. frequent waking, difficulty sleeping, nightmares, deep sleep\">{}</textarea>\n",
                encode_text(text)
            );
        }
        QualityMode::Slider => {
            let rating = v.sleep_quality.unwrap_or(bounds::SLEEP_QUALITY.0);
            slider(&mut html, "Quality of Sleep", "sleep_quality", rating, bounds::SLEEP_QUALITY);
        }
    }
    html.push_str("</details>\n");

    // Lifestyle Factors
    html.push_str("<details>\n<summary>Lifestyle Factors</summary>\n");
    slider(
        &mut html,
        "Physical Activity Level",
        "physical_activity",
        v.physical_activity,
        bounds::PHYSICAL_ACTIVITY,
    );
    slider(&mut html, "Stress Level", "stress_level", v.stress_level, bounds::STRESS_LEVEL);
    html.push_str("</details>\n");

    // Health Parameters
    html.push_str("<details>\n<summary>Health Parameters</summary>\n");
    select(&mut html, "BMI Category", "bmi", &BmiCategory::CHOICES, &v.bmi);
    number(&mut html, "Heart Rate (bpm)", "heart_rate", v.heart_rate, bounds::HEART_RATE);
    number(&mut html, "Daily Steps", "daily_steps", v.daily_steps, bounds::DAILY_STEPS);
    html.push_str("<div class=\"row\">\n<div>\n");
    number(&mut html, "Systolic BP", "systolic_bp", v.systolic_bp, bounds::SYSTOLIC_BP);
    html.push_str("</div>\n<div>\n");
    number(&mut html, "Diastolic BP", "diastolic_bp", v.diastolic_bp, bounds::DIASTOLIC_BP);
    html.push_str("</div>\n</div>\n</details>\n");

    html.push_str("<button type=\"submit\">Predict Sleep Disorder</button>\n</form>\n");

    match outcome {
        Outcome::Blank => {}
        Outcome::Failed { title, message } => {
            let _ = write!(
                html,
                "<div class=\"card\" style=\"background:#7f1d1d;\">\n<h3>{}</h3>\n<p>{}</p>\n</div>\n",
                title,
                encode_text(&message)
            );
        }
        Outcome::Assessed(a) => {
            let what = match a.quality.source {
                QualitySource::Derived => "Derived",
                QualitySource::Rated => "Reported",
            };
            let _ = write!(
                html,
                "<div class=\"card\" style=\"text-align:center;\">\n<b>{} Sleep Quality Score:</b> {}/10\n</div>\n",
                what, a.quality.score
            );
            let _ = write!(
                html,
                "<div class=\"card\" style=\"background:{};\">\n<h3>{}</h3>\n<p>{}</p>\n</div>\n",
                card_color(a.prediction),
                a.headline,
                a.advice
            );
        }
    }

    html.push_str(
        "<div class=\"footer\">Sleep Disorder Prediction using Machine Learning</div>\n</body>\n</html>\n",
    );
    html
}

fn card_color(p: Prediction) -> &'static str {
    match p {
        Prediction::NoDisorder => "#064e3b",
        Prediction::Insomnia => "#78350f",
        Prediction::SleepApnea => "#7f1d1d",
    }
}

fn number(html: &mut String, label: &str, name: &str, value: i64, (min, max): (i64, i64)) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\" required>\n"
    );
}

fn slider(html: &mut String, label: &str, name: &str, value: i64, (min, max): (i64, i64)) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\">\n"
    );
}

fn select(html: &mut String, label: &str, name: &str, choices: &[&str], current: &str) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n"
    );
    for c in choices {
        let selected = if c.eq_ignore_ascii_case(current.trim()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            encode_double_quoted_attribute(c),
            selected,
            encode_text(c)
        );
    }
    html.push_str("</select>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::QualityReport;
    use crate::features::FeatureVector;
    use crate::quality::QualityCategory;

    fn assessment(p: Prediction, source: QualitySource, score: u8) -> Assessment {
        Assessment {
            prediction: p,
            label: p.to_string(),
            headline: p.headline(),
            advice: p.advice(),
            quality: QualityReport {
                score,
                source,
                category: Some(QualityCategory::Fragmented),
                keyword: Some("waking"),
            },
            features: FeatureVector::new([0.0; 11]),
            model: "stub".into(),
            evaluated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn text_mode_form_has_textarea_not_slider() {
        let html = form_page(QualityMode::Text);
        assert!(html.contains("name=\"sleep_quality_text\""));
        assert!(!html.contains("name=\"sleep_quality\""));
        assert!(html.contains("frequent waking, difficulty sleeping"));
        for section in [
            "Personal Information",
            "Sleep Details",
            "Lifestyle Factors",
            "Health Parameters",
        ] {
            assert!(html.contains(section), "missing {section}");
        }
    }

    #[test]
    fn slider_mode_form_has_range_input() {
        let html = form_page(QualityMode::Slider);
        assert!(html.contains(
            "name=\"sleep_quality\" min=\"1\" max=\"10\""
        ));
        assert!(!html.contains("<textarea"));
    }

    #[test]
    fn bounds_are_rendered() {
        let html = form_page(QualityMode::Text);
        assert!(html.contains("name=\"daily_steps\" min=\"0\" max=\"30000\""));
        assert!(html.contains("name=\"systolic_bp\" min=\"80\" max=\"200\""));
    }

    #[test]
    fn description_is_escaped() {
        let mut v = default_values(QualityMode::Text);
        v.sleep_quality_text = Some("<script>alert(1)</script> waking".into());
        let a = assessment(Prediction::Insomnia, QualitySource::Derived, 5);
        let html = result_page(QualityMode::Text, &v, &a);
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn result_cards() {
        let v = default_values(QualityMode::Text);
        let html = result_page(
            QualityMode::Text,
            &v,
            &assessment(Prediction::SleepApnea, QualitySource::Derived, 5),
        );
        assert!(html.contains("Derived Sleep Quality Score:</b> 5/10"));
        assert!(html.contains("Sleep Apnea Detected"));
        assert!(html.contains("Medical consultation is recommended."));
        assert!(html.contains("#7f1d1d"));

        let v = default_values(QualityMode::Slider);
        let html = result_page(
            QualityMode::Slider,
            &v,
            &assessment(Prediction::NoDisorder, QualitySource::Rated, 8),
        );
        assert!(html.contains("Reported Sleep Quality Score:</b> 8/10"));
        assert!(html.contains("No Sleep Disorder Detected"));
    }

    #[test]
    fn error_card_keeps_values() {
        let mut v = default_values(QualityMode::Text);
        v.bmi = "Obese".into();
        let err = InputError::OutOfRange {
            field: "age",
            value: 5.0,
            min: 10.0,
            max: 100.0,
        };
        let html = error_page(QualityMode::Text, &v, &err);
        assert!(html.contains("Invalid input"));
        assert!(html.contains("age: 5 out of range [10, 100]"));
        assert!(html.contains("<option value=\"Obese\" selected>"));
    }

    #[test]
    fn numeric_inputs_are_required() {
        let html = form_page(QualityMode::Text);
        assert!(html.contains("name=\"age\" min=\"10\" max=\"100\" step=\"1\" value=\"10\" required>"));
        assert!(html.contains(
            "name=\"sleep_duration\" min=\"0\" max=\"15\" step=\"0.1\" value=\"0\" required>"
        ));
    }

    #[test]
    fn rejected_page_shows_blank_form_and_message() {
        let html = rejected_page(QualityMode::Slider, "age: cannot parse <integer>");
        assert!(html.contains("Invalid input"));
        assert!(html.contains("age: cannot parse &lt;integer&gt;"));
        assert!(html.contains("name=\"sleep_quality\""));
    }

    #[test]
    fn mode_follows_submitted_field() {
        let mut v = default_values(QualityMode::Text);
        assert_eq!(mode_of(&v, QualityMode::Slider), QualityMode::Text);
        v.sleep_quality_text = None;
        v.sleep_quality = Some(4);
        assert_eq!(mode_of(&v, QualityMode::Text), QualityMode::Slider);
        v.sleep_quality = None;
        assert_eq!(mode_of(&v, QualityMode::Slider), QualityMode::Slider);
    }
}
