// tests/backup_restore_tests.rs

mod common;

use qtype_formulas::config::Config;
use qtype_formulas::error::AppError;
use qtype_formulas::handlers::backup::backup_question;
use qtype_formulas::handlers::restore::{
    ANSWER_ITEM, OPTIONS_ITEM, RestoreOutcome, restore_from_xml, restore_question,
};
use qtype_formulas::host::{QuestionStore, RestoreHost};
use qtype_formulas::models::FormulasQuestion;
use qtype_formulas::models::format::{AnswerNumbering, TextFormat};
use qtype_formulas::state::HostState;
use qtype_formulas::xml::parse_backup;

use common::{memory_store, old_release_backup, seed_question};

#[tokio::test]
async fn backup_then_restore_preserves_every_field() {
    // Arrange
    let store = memory_store().await;
    let config = Config::default();
    let (options, answers) = seed_question(&store, 10, 3).await;

    // Act
    let question = FormulasQuestion::from_rows(&options, &answers);
    let xml = backup_question(&question, &mut HostState::new(), &config).unwrap();

    let mut host = HostState::new();
    host.mark_created(77);
    let outcome = restore_from_xml(&xml, 77, &mut host, &store, &config)
        .await
        .unwrap();

    // Assert
    let restored_options = store.load_options(77).await.unwrap().unwrap();
    let restored_answers = store.load_answers(77).await.unwrap();

    let mut expected_options = options.clone();
    expected_options.id = restored_options.id;
    expected_options.questionid = 77;
    assert_eq!(restored_options, expected_options);

    assert_eq!(restored_answers.len(), answers.len());
    for (restored, original) in restored_answers.iter().zip(&answers) {
        let mut expected = original.clone();
        expected.id = restored.id;
        expected.questionid = 77;
        assert_eq!(restored, &expected);
    }

    match outcome {
        RestoreOutcome::Inserted { options: (old, new), answers: pairs } => {
            assert_eq!(old, options.id);
            assert_eq!(new, restored_options.id);
            assert_eq!(host.get_mapping(OPTIONS_ITEM, old), Some(new));
            assert_eq!(pairs.len(), 3);
            for (old, new) in pairs {
                assert_eq!(host.get_mapping(ANSWER_ITEM, old), Some(new));
            }
        }
        RestoreOutcome::Matched => panic!("question was created, rows expected"),
    }
}

#[tokio::test]
async fn matched_question_gets_no_rows() {
    let store = memory_store().await;
    let config = Config::default();
    let (options, answers) = seed_question(&store, 11, 2).await;
    let xml = backup_question(
        &FormulasQuestion::from_rows(&options, &answers),
        &mut HostState::new(),
        &config,
    )
    .unwrap();

    // Question 78 exists already on the target site.
    let mut host = HostState::new();
    let outcome = restore_from_xml(&xml, 78, &mut host, &store, &config)
        .await
        .unwrap();

    assert_eq!(outcome, RestoreOutcome::Matched);
    assert!(store.load_options(78).await.unwrap().is_none());
    assert!(store.load_answers(78).await.unwrap().is_empty());
    assert_eq!(host.mapping_count(), 0);
}

#[tokio::test]
async fn old_release_backup_is_backfilled() {
    let store = memory_store().await;
    let config = Config::default();
    let mut host = HostState::new();
    host.mark_created(90);

    restore_from_xml(&old_release_backup(), 90, &mut host, &store, &config)
        .await
        .unwrap();

    let options = store.load_options(90).await.unwrap().unwrap();
    assert_eq!(options.varsrandom, "a = {1,2,3};");
    assert_eq!(options.correctfeedback, "");
    assert_eq!(options.correctfeedbackformat, TextFormat::Html);
    assert_eq!(options.incorrectfeedbackformat, TextFormat::Html);
    assert!(!options.shownumcorrect);
    assert_eq!(options.answernumbering, AnswerNumbering::Unnumbered);

    let answers = store.load_answers(90).await.unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].partindex, 0);
    assert_eq!(answers[0].subqtext, "First part");
    assert_eq!(answers[0].correctness, "_relerr < 0.01");
    assert_eq!(answers[1].partindex, 1);
    assert_eq!(answers[1].placeholder, "#2");
    for answer in &answers {
        assert!(answer.answernotunique);
        assert!(!answer.emptyallowed);
        assert_eq!(answer.feedbackformat, TextFormat::Html);
        assert_eq!(answer.partcorrectfb, "");
        assert_eq!(answer.partincorrectfbformat, TextFormat::Html);
    }
    assert_eq!(host.get_mapping(ANSWER_ITEM, 302), Some(answers[1].id));
}

#[tokio::test]
async fn empty_flag_elements_restore_as_defaults() {
    let store = memory_store().await;
    let config = Config::default();
    let backup = old_release_backup().replace(
        "<placeholder>#2</placeholder>",
        "<placeholder>#2</placeholder>\n      <answernotunique/>\n      <emptyallowed/>",
    );
    assert!(backup.contains("<answernotunique/>"));

    let mut host = HostState::new();
    host.mark_created(94);
    restore_from_xml(&backup, 94, &mut host, &store, &config)
        .await
        .unwrap();

    let answers = store.load_answers(94).await.unwrap();
    assert_eq!(answers.len(), 2);
    assert!(answers[1].answernotunique);
    assert!(!answers[1].emptyallowed);
}

#[tokio::test]
async fn missing_partindex_follows_highest_stored_index() {
    let store = memory_store().await;
    let config = Config::default();

    let mut tree = parse_backup(&old_release_backup()).unwrap();
    tree.answers[0].fields.set("partindex", 3);

    let mut host = HostState::new();
    host.mark_created(91);
    restore_question(&tree, 91, &mut host, &store, &config)
        .await
        .unwrap();

    let answers = store.load_answers(91).await.unwrap();
    let indices: Vec<i64> = answers.iter().map(|a| a.partindex).collect();
    assert_eq!(indices, vec![3, 4]);
}

#[tokio::test]
async fn missing_required_field_aborts_before_writing() {
    let store = memory_store().await;
    let config = Config::default();

    let mut tree = parse_backup(&old_release_backup()).unwrap();
    tree.answers[1].fields.remove("answer");

    let mut host = HostState::new();
    host.mark_created(92);
    let err = restore_question(&tree, 92, &mut host, &store, &config)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingField(ref f) if f == "answer"));
    assert!(store.load_options(92).await.unwrap().is_none());
    assert!(store.load_answers(92).await.unwrap().is_empty());
    assert_eq!(host.mapping_count(), 0);
}

#[tokio::test]
async fn invalid_numbering_is_rejected() {
    let store = memory_store().await;
    let config = Config::default();

    let mut tree = parse_backup(&old_release_backup()).unwrap();
    tree.options.fields.set("answernumbering", "xyz");

    let mut host = HostState::new();
    host.mark_created(93);
    let err = restore_question(&tree, 93, &mut host, &store, &config)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "answernumbering"));
}
