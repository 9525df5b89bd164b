//! Parser for the "doctorate" panel layout (Bootstrap accordion markup).

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::dom;
use crate::normalize::normalize;
use crate::parsers::ParsedPage;
use crate::types::{HarvestError, PageId, QaRecord};

static HEADLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.headline").expect("valid selector"));
static PANEL_GROUP: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.panel-group.acc-v2").expect("valid selector"));
static ACCORDION_TOGGLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.accordion-toggle").expect("valid selector"));
static PANEL_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.panel-body").expect("valid selector"));

/// Indentation runs the source templates embed inside question anchors.
static QUESTION_INDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\t+\s*").expect("valid regex"));

/// Boilerplate prefixes stripped from the headline to obtain the section
/// title. Both capitalizations occur in the wild.
const TITLE_PREFIXES: [&str; 2] = [
    "Frequently asked questions about ",
    "Frequently Asked Questions about ",
];

/// Extracts all QA pairs from a panel-layout page.
///
/// The page's second headline carries the section title and the second
/// panel group is the active content root. Both are selected by fixed index
/// 1 every time; the always-present first occurrences are never consulted,
/// no matter how well-formed they look.
pub fn parse_panel_page(page: &PageId, html: &str) -> Result<ParsedPage, HarvestError> {
    let document = Html::parse_document(html);

    let headline = dom::nth_match(&document, &HEADLINE, 1, "headline", page)?;
    let mut section_title = dom::text_of(headline);
    for prefix in TITLE_PREFIXES {
        section_title = section_title.replace(prefix, "");
    }

    let root = dom::nth_match(&document, &PANEL_GROUP, 1, "panel group", page)?;

    let mut questions = Vec::new();
    for toggle in root.select(&ACCORDION_TOGGLE) {
        let raw = toggle.text().collect::<String>();
        let question = QUESTION_INDENT.replace_all(&raw, "").trim().to_string();
        if question.is_empty() {
            return Err(HarvestError::structure(page, "empty question text in panel group"));
        }
        questions.push(question);
    }

    let mut answers = Vec::new();
    for body in root.select(&PANEL_BODY) {
        // Two levels of unwrapping: the panel body's second structural child
        // wraps the answer, whose first structural child is the fragment.
        let wrapper = dom::structural_child(body, 1, "panel body", page)?;
        let fragment = dom::structural_child(wrapper, 0, "panel body wrapper", page)?;
        answers.push(normalize(&fragment.html())?);
    }

    if questions.len() != answers.len() {
        return Err(HarvestError::structure(
            page,
            format!(
                "{} questions but {} answers",
                questions.len(),
                answers.len()
            ),
        ));
    }

    tracing::debug!(
        page = %page,
        section = %section_title,
        pairs = questions.len(),
        "panel page extracted"
    );

    Ok(ParsedPage {
        section_title: Some(section_title),
        records: questions
            .into_iter()
            .zip(answers)
            .map(|(question, answer)| QaRecord::new(question, answer))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Language};

    fn page() -> PageId {
        PageId::new(Category::Doctorate, Language::En, 0)
    }

    fn panel_page(title: &str, pairs: &[(&str, &str)]) -> String {
        let mut html = format!(
            "<html><body>\
             <div class=\"headline\"><h1>Site banner</h1></div>\
             <div class=\"headline\"><h2>Frequently asked questions about {title}</h2></div>\
             <div class=\"panel-group acc-v2\"><div class=\"panel\">decoy</div></div>\
             <div class=\"panel-group acc-v2\">"
        );
        for (question, answer) in pairs {
            html.push_str(&format!(
                "<div class=\"panel\">\
                   <div class=\"panel-heading\">\
                     <a class=\"accordion-toggle\" href=\"#\">\n\t\t\t{question}\n\t\t</a>\
                   </div>\
                   <div class=\"panel-body\">\
                     <div class=\"panel-spacer\"></div>\
                     <div class=\"panel-text\">{answer}</div>\
                   </div>\
                 </div>"
            ));
        }
        html.push_str("</div></body></html>");
        html
    }

    #[test]
    fn extracts_pairs_and_section_title() {
        let html = panel_page(
            "the thesis",
            &[
                ("How long is the thesis?", "<p>As long as needed.</p>"),
                ("Who reviews it?", "<p>The committee.</p>"),
            ],
        );
        let parsed = parse_panel_page(&page(), &html).unwrap();
        assert_eq!(parsed.section_title.as_deref(), Some("the thesis"));
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].question, "How long is the thesis?");
        assert_eq!(parsed.records[1].answer, "The committee.\n");
    }

    #[test]
    fn questions_carry_no_tabs_or_edge_newlines() {
        let html = panel_page("deadlines", &[("When is\n\t\t\tthe deadline?", "<p>May.</p>")]);
        let parsed = parse_panel_page(&page(), &html).unwrap();
        let question = &parsed.records[0].question;
        assert!(!question.contains('\t'), "question: {question:?}");
        assert!(!question.starts_with('\n') && !question.ends_with('\n'));
        assert_eq!(question, "When isthe deadline?");
    }

    #[test]
    fn missing_second_panel_group_is_a_structure_error() {
        // Index 0 is perfectly well-formed; selection still demands index 1.
        let html = "<html><body>\
            <div class=\"headline\">A</div><div class=\"headline\">B</div>\
            <div class=\"panel-group acc-v2\">\
              <a class=\"accordion-toggle\">Q?</a>\
              <div class=\"panel-body\"><div></div><div><p>fine</p></div></div>\
            </div></body></html>";
        let err = parse_panel_page(&page(), html).unwrap_err();
        match err {
            HarvestError::Structure { page: failed, detail } => {
                assert_eq!(failed.to_string(), "en/doctorate1");
                assert!(detail.contains("panel group #2"), "detail: {detail}");
            }
            other => panic!("expected structure error, got {other}"),
        }
    }

    #[test]
    fn missing_second_headline_is_a_structure_error() {
        let html = "<html><body><div class=\"headline\">only one</div></body></html>";
        let err = parse_panel_page(&page(), html).unwrap_err();
        assert!(matches!(err, HarvestError::Structure { .. }), "{err}");
    }

    #[test]
    fn shallow_panel_body_is_a_structure_error() {
        let html = "<html><body>\
            <div class=\"headline\">A</div><div class=\"headline\">B</div>\
            <div class=\"panel-group acc-v2\"></div>\
            <div class=\"panel-group acc-v2\">\
              <a class=\"accordion-toggle\">Q?</a>\
              <div class=\"panel-body\"><div>only one child</div></div>\
            </div></body></html>";
        let err = parse_panel_page(&page(), html).unwrap_err();
        match err {
            HarvestError::Structure { detail, .. } => {
                assert!(detail.contains("structural child #2"), "detail: {detail}");
            }
            other => panic!("expected structure error, got {other}"),
        }
    }

    #[test]
    fn question_answer_count_mismatch_fails_the_page() {
        let html = "<html><body>\
            <div class=\"headline\">A</div><div class=\"headline\">B</div>\
            <div class=\"panel-group acc-v2\"></div>\
            <div class=\"panel-group acc-v2\">\
              <a class=\"accordion-toggle\">Q1?</a>\
              <a class=\"accordion-toggle\">Q2?</a>\
              <div class=\"panel-body\"><div></div><div><p>A1</p></div></div>\
            </div></body></html>";
        let err = parse_panel_page(&page(), html).unwrap_err();
        match err {
            HarvestError::Structure { detail, .. } => {
                assert!(detail.contains("2 questions but 1 answers"), "detail: {detail}");
            }
            other => panic!("expected structure error, got {other}"),
        }
    }

    #[test]
    fn capitalized_boilerplate_prefix_is_stripped() {
        let html = panel_page("admission", &[("Q?", "<p>A</p>")])
            .replace("Frequently asked questions", "Frequently Asked Questions");
        let parsed = parse_panel_page(&page(), &html).unwrap();
        assert_eq!(parsed.section_title.as_deref(), Some("admission"));
    }
}
