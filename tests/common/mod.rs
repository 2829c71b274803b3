// tests/common/mod.rs

#![allow(dead_code)]

use qtype_formulas::config::Config;
use qtype_formulas::host::QuestionStore;
use qtype_formulas::models::answer::AnswerPart;
use qtype_formulas::models::format::{AnswerNumbering, TextFormat};
use qtype_formulas::models::options::FormulasOptions;
use qtype_formulas::store::SqliteStore;

/// Fresh in-memory store with the schema applied.
pub async fn memory_store() -> SqliteStore {
    SqliteStore::connect(&Config::default())
        .await
        .expect("Failed to open in-memory SQLite store")
}

pub fn sample_options(questionid: i64) -> FormulasOptions {
    FormulasOptions {
        id: 0,
        questionid,
        varsrandom: "v = {20:100:10};\ndt = {2,3,4};".to_string(),
        varsglobal: "s = v*dt;".to_string(),
        correctfeedback: "<p>Well done &amp; thanks</p>".to_string(),
        correctfeedbackformat: TextFormat::Html,
        partiallycorrectfeedback: "  partly  ".to_string(),
        partiallycorrectfeedbackformat: TextFormat::Markdown,
        incorrectfeedback: String::new(),
        incorrectfeedbackformat: TextFormat::Plain,
        shownumcorrect: true,
        answernumbering: AnswerNumbering::UpperAlpha,
    }
}

pub fn sample_part(questionid: i64, partindex: i64) -> AnswerPart {
    AnswerPart {
        id: 0,
        questionid,
        partindex,
        placeholder: format!("#{}", partindex + 1),
        answermark: 0.5 + partindex as f64,
        answertype: 0,
        numbox: 1,
        vars1: "t = s / v;".to_string(),
        answer: "v * dt".to_string(),
        answernotunique: partindex % 2 == 0,
        vars2: String::new(),
        correctness: "_relerr < 0.01".to_string(),
        unitpenalty: 0.25,
        postunit: "m".to_string(),
        ruleid: 1,
        otherrule: String::new(),
        subqtext: format!("<p>Part {} of the question: x < y</p>", partindex),
        subqtextformat: TextFormat::Html,
        feedback: "Distance is <b>{s}</b> m.".to_string(),
        feedbackformat: TextFormat::Moodle,
        partcorrectfb: "Correct.".to_string(),
        partcorrectfbformat: TextFormat::Html,
        partpartiallycorrectfb: "Nearly.".to_string(),
        partpartiallycorrectfbformat: TextFormat::Html,
        partincorrectfb: "Wrong, \"try\" again.".to_string(),
        partincorrectfbformat: TextFormat::Plain,
        emptyallowed: partindex == 1,
    }
}

/// Inserts a complete question and returns the stored rows.
pub async fn seed_question(
    store: &SqliteStore,
    questionid: i64,
    parts: i64,
) -> (FormulasOptions, Vec<AnswerPart>) {
    store
        .insert_options(&sample_options(questionid))
        .await
        .expect("Failed to insert options");
    for index in 0..parts {
        store
            .insert_answer(&sample_part(questionid, index))
            .await
            .expect("Failed to insert answer");
    }

    let options = store
        .load_options(questionid)
        .await
        .unwrap()
        .expect("Seeded options not found");
    let answers = store.load_answers(questionid).await.unwrap();
    (options, answers)
}

/// Backup XML in the shape written by old releases: no combined feedback,
/// no part feedbacks, no flags, no partindex.
pub fn old_release_backup() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<plugin_qtype_formulas_question>
  <formulas id="31">
    <varsrandom>a = {1,2,3};</varsrandom>
    <varsglobal>b = 2*a;</varsglobal>
  </formulas>
  <formulas_answers>
    <formulas_answer id="301">
      <placeholder/>
      <answermark>2</answermark>
      <answertype>0</answertype>
      <numbox>1</numbox>
      <vars1/>
      <answer>b</answer>
      <vars2/>
      <correctness>_relerr &lt; 0.01</correctness>
      <unitpenalty>1</unitpenalty>
      <postunit/>
      <ruleid>1</ruleid>
      <otherrule/>
      <subqtext>First part</subqtext>
      <feedback/>
    </formulas_answer>
    <formulas_answer id="302">
      <placeholder>#2</placeholder>
      <answermark>1</answermark>
      <answertype>10</answertype>
      <numbox>2</numbox>
      <vars1/>
      <answer>[a, b]</answer>
      <vars2/>
      <correctness>_err == 0</correctness>
      <unitpenalty>0.5</unitpenalty>
      <postunit/>
      <ruleid>1</ruleid>
      <otherrule/>
      <subqtext>Second part</subqtext>
      <feedback>Check b.</feedback>
    </formulas_answer>
  </formulas_answers>
</plugin_qtype_formulas_question>"#
        .to_string()
}
