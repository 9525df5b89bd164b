//! Parser for the "intrel" accordion layout (Elementor markup).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::dom;
use crate::normalize::normalize;
use crate::parsers::ParsedPage;
use crate::types::{HarvestError, PageId, QaRecord};

static SECTION_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.elementor-clearfix").expect("valid selector"));
static ACCORDION_CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-accordion-type="accordion"]"#).expect("valid selector"));
static QUESTION_ICON: Lazy<Selector> =
    Lazy::new(|| Selector::parse("i.fa-accordion-icon").expect("valid selector"));
static ANSWER_BOX: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.eael-accordion-content.clearfix").expect("valid selector"));

/// Extracts all QA pairs from an accordion-layout page.
///
/// Section header containers and accordion content containers are paired by
/// document-order position, so their counts must agree. Within each content
/// container, every question icon must sit inside a `<span>` holding the
/// question text; a marker without one would silently desynchronize the
/// question/answer zip, so it fails the page instead.
pub fn parse_accordion_page(page: &PageId, html: &str) -> Result<ParsedPage, HarvestError> {
    let document = Html::parse_document(html);

    let sections = dom::select_all(&document, &SECTION_TITLE);
    let contents = dom::select_all(&document, &ACCORDION_CONTENT);
    if sections.len() != contents.len() {
        return Err(HarvestError::structure(
            page,
            format!(
                "{} section headers but {} accordion containers",
                sections.len(),
                contents.len()
            ),
        ));
    }

    let mut records = Vec::new();
    for (section_index, content) in contents.iter().enumerate() {
        let questions = section_questions(page, section_index, *content)?;
        let answers = section_answers(*content)?;

        if questions.len() != answers.len() {
            return Err(HarvestError::structure(
                page,
                format!(
                    "section {}: {} questions but {} answers",
                    section_index + 1,
                    questions.len(),
                    answers.len()
                ),
            ));
        }

        tracing::debug!(
            page = %page,
            section = section_index + 1,
            pairs = questions.len(),
            "accordion section extracted"
        );

        records.extend(
            questions
                .into_iter()
                .zip(answers)
                .map(|(question, answer)| QaRecord::new(question, answer)),
        );
    }

    Ok(ParsedPage {
        section_title: None,
        records,
    })
}

fn section_questions(
    page: &PageId,
    section_index: usize,
    content: ElementRef<'_>,
) -> Result<Vec<String>, HarvestError> {
    let mut questions = Vec::new();
    for icon in content.select(&QUESTION_ICON) {
        let span = dom::enclosing(icon, "span").ok_or_else(|| {
            HarvestError::structure(
                page,
                format!(
                    "section {}: question icon has no enclosing span",
                    section_index + 1
                ),
            )
        })?;
        let question = dom::text_of(span);
        if question.is_empty() {
            return Err(HarvestError::structure(
                page,
                format!("section {}: empty question text", section_index + 1),
            ));
        }
        questions.push(question);
    }
    Ok(questions)
}

fn section_answers(content: ElementRef<'_>) -> Result<Vec<String>, HarvestError> {
    let mut answers = Vec::new();
    for answer_box in content.select(&ANSWER_BOX) {
        // The answer's raw content is the box's first element child; a box
        // with no element children is an empty (but present) answer.
        let answer = match dom::child_elements(answer_box).next() {
            Some(fragment) => normalize(&fragment.html())?,
            None => String::new(),
        };
        answers.push(answer);
    }
    Ok(answers)
}
