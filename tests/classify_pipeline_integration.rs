use tempfile::TempDir;
use uptalk::annotation::{
    Token, TokenAnnotation, DEP_AUXILIARY, DEP_NOMINAL_SUBJECT, DEP_ROOT, MORPH_VERB_FORM,
    POS_VERB, VERB_FORM_FINITE,
};
use uptalk::pipeline::{run_classification, ClassifyConfig};
use uptalk::profile::LanguageProfile;
use uptalk::StaticAnnotator;

fn token(text: &str, index: usize, dep: &str, pos: &str, head: usize, finite: bool) -> Token {
    let mut token = Token::word(text, index);
    token.dep = dep.to_string();
    token.pos = pos.to_string();
    token.head = head;
    if finite {
        token.morph.insert(
            MORPH_VERB_FORM.to_string(),
            vec![VERB_FORM_FINITE.to_string()],
        );
    }
    token
}

/// Annotator scripted with parses for the sentences the corpus produces;
/// everything else falls back to bare whitespace tokens
fn scripted_annotator() -> StaticAnnotator {
    let mut annotator = StaticAnnotator::new();
    annotator.insert(
        "Is she coming?",
        TokenAnnotation::new(vec![
            token("Is", 0, DEP_AUXILIARY, "AUX", 2, true),
            token("she", 1, DEP_NOMINAL_SUBJECT, "PRON", 2, false),
            token("coming", 2, DEP_ROOT, POS_VERB, 2, false),
            token("?", 3, "punct", "PUNCT", 2, false),
        ]),
    );
    annotator.insert(
        "She is coming?",
        TokenAnnotation::new(vec![
            token("She", 0, DEP_NOMINAL_SUBJECT, "PRON", 2, false),
            token("is", 1, DEP_AUXILIARY, "AUX", 2, true),
            token("coming", 2, DEP_ROOT, POS_VERB, 2, false),
            token("?", 3, "punct", "PUNCT", 2, false),
        ]),
    );
    annotator
}

fn config_for(dir: &TempDir, corpus: &str) -> ClassifyConfig {
    let input = dir.path().join("corpus.jsonl");
    std::fs::write(&input, corpus).expect("corpus fixture should be writable");
    ClassifyConfig {
        input,
        rd_out: dir.path().join("rd_en.txt"),
        pq_out: dir.path().join("pq_en.txt"),
        rejected_out: dir.path().join("rejected_en.txt"),
        fail_fast: false,
        show_progress: false,
    }
}

const CORPUS: &str = concat!(
    "{\"full_text_cleaned\": \"Is she coming? She is coming? What is happening?\"}\n",
    "{\"full_text_cleaned\": \"He likes it, does he?\"}\n",
    "this line is not json\n",
    "{\"full_text_cleaned\": \"so tired today.\"}\n",
);

#[tokio::test]
async fn classification_pass_routes_and_counts() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, CORPUS);
    let profile = LanguageProfile::english();
    let mut annotator = scripted_annotator();

    let summary = run_classification(&config, &profile, &mut annotator)
        .await
        .expect("pipeline should complete despite the malformed record");

    assert_eq!(summary.records, 4);
    assert_eq!(summary.malformed_records, 1);
    assert_eq!(summary.annotator_failures, 0);
    assert_eq!(summary.total_sentences, 5);
    assert_eq!(summary.rd_count, 1);
    assert_eq!(summary.pq_count, 1);
    assert_eq!(summary.rejected_count, 3);
    assert_eq!(
        summary.total_sentences,
        summary.rd_count + summary.pq_count + summary.rejected_count
    );
}

#[tokio::test]
async fn category_files_carry_ordinal_and_full_message() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, CORPUS);
    let profile = LanguageProfile::english();
    let mut annotator = scripted_annotator();

    run_classification(&config, &profile, &mut annotator)
        .await
        .unwrap();

    let rd = std::fs::read_to_string(&config.rd_out).unwrap();
    assert_eq!(
        rd,
        "RD 1: She is coming?\nFull tweet: Is she coming? She is coming? What is happening?\n\n"
    );

    let pq = std::fs::read_to_string(&config.pq_out).unwrap();
    assert_eq!(
        pq,
        "PQ 1: Is she coming?\nFull tweet: Is she coming? She is coming? What is happening?\n\n"
    );
}

#[tokio::test]
async fn rejection_log_names_every_reason() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, CORPUS);
    let profile = LanguageProfile::english();
    let mut annotator = scripted_annotator();

    run_classification(&config, &profile, &mut annotator)
        .await
        .unwrap();

    let rejected = std::fs::read_to_string(&config.rejected_out).unwrap();
    let lines: Vec<&str> = rejected.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Rejected due to wh-word: What is happening?");
    assert_eq!(
        lines[1],
        "Rejected due to tag question: He likes it, does he?"
    );
    assert_eq!(
        lines[2],
        "Rejected due to length or non-question: so tired today."
    );
}

#[tokio::test]
async fn summary_statistics_reannotate_each_collection() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, CORPUS);
    let profile = LanguageProfile::english();
    let mut annotator = scripted_annotator();

    let summary = run_classification(&config, &profile, &mut annotator)
        .await
        .unwrap();

    // Scripted parses give 4 tokens each; fallback counts whitespace words
    assert_eq!(summary.dataset.sentences, 5);
    assert_eq!(summary.dataset.total_tokens, 4 + 4 + 3 + 5 + 3);
    assert_eq!(summary.questions.sentences, 4);
    assert_eq!(summary.questions.total_tokens, 4 + 4 + 3 + 5);
    assert_eq!(summary.rising_declaratives.sentences, 1);
    assert_eq!(summary.rising_declaratives.total_tokens, 4);
    assert_eq!(summary.polar_questions.sentences, 1);
    assert!((summary.polar_questions.mean_tokens - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn fail_fast_aborts_on_malformed_record() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir, CORPUS);
    config.fail_fast = true;
    let profile = LanguageProfile::english();
    let mut annotator = scripted_annotator();

    let result = run_classification(&config, &profile, &mut annotator).await;
    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("record 3"), "unexpected error: {message}");
}

#[tokio::test]
async fn escaped_characters_round_trip_through_category_files() {
    let dir = TempDir::new().unwrap();
    let corpus = "{\"full_text_cleaned\": \"She is \\\"coming\\\"?\"}\n";
    let config = config_for(&dir, corpus);
    let profile = LanguageProfile::english();

    let mut annotator = StaticAnnotator::new();
    annotator.insert(
        "She is \"coming\"?",
        TokenAnnotation::new(vec![
            token("She", 0, DEP_NOMINAL_SUBJECT, "PRON", 2, false),
            token("is", 1, DEP_AUXILIARY, "AUX", 2, true),
            token("coming", 2, DEP_ROOT, POS_VERB, 2, false),
        ]),
    );

    let summary = run_classification(&config, &profile, &mut annotator)
        .await
        .unwrap();
    assert_eq!(summary.rd_count, 1);

    let rd = std::fs::read_to_string(&config.rd_out).unwrap();
    assert_eq!(
        rd,
        "RD 1: She is &quot;coming&quot;?\nFull tweet: She is &quot;coming&quot;?\n\n"
    );
}

#[tokio::test]
async fn missing_text_field_yields_no_sentences() {
    let dir = TempDir::new().unwrap();
    let corpus = "{\"other_field\": \"Is she coming?\"}\n";
    let config = config_for(&dir, corpus);
    let profile = LanguageProfile::english();
    let mut annotator = StaticAnnotator::new();

    let summary = run_classification(&config, &profile, &mut annotator)
        .await
        .unwrap();
    assert_eq!(summary.records, 1);
    assert_eq!(summary.malformed_records, 0);
    assert_eq!(summary.total_sentences, 0);
    assert_eq!(summary.dataset.mean_tokens, 0.0);
}
