use level_quiz::{
    Advance, EngineConfig, OptionShuffler, Phase, QuizCatalog, QuizEngine, SessionError,
    SessionState, UNKNOWN_LABEL, parse_catalog,
};

/// Rotates options by one so the display order differs from the source.
struct Rotate;

impl OptionShuffler for Rotate {
    fn permute(&self, options: &[String]) -> Vec<String> {
        let mut labels = options.to_vec();
        labels.rotate_left(1);
        labels
    }
}

const TWO_LEVELS: &str = r#"{
    "Level 1": {
        "questions": {
            "What is the main purpose of an O-ring?": ["Sealing", "Decoration", "Conducting electricity"],
            "A common O-ring material?": ["Elastomer", "Steel", "Wood", "Glass"],
            "What shape is an O-ring?": ["Circular", "Square", "Hexagonal"]
        },
        "correct_answers": {
            "What is the main purpose of an O-ring?": "Sealing",
            "A common O-ring material?": "Elastomer",
            "What shape is an O-ring?": "Circular"
        }
    },
    "Level 2": {
        "questions": {
            "Which standard covers O-ring sizes?": ["ISO 3601", "ISO 9001", "DIN 912"],
            "A common O-ring failure mode?": ["Extrusion", "Oxidation", "Corrosion"],
            "Most critical seal factor?": ["Compression ratio", "Colour", "Roundness"]
        },
        "correct_answers": {
            "Which standard covers O-ring sizes?": "ISO 3601",
            "A common O-ring failure mode?": "Extrusion",
            "Most critical seal factor?": "Compression ratio"
        }
    }
}"#;

fn engine() -> QuizEngine<Rotate> {
    let catalog = parse_catalog(TWO_LEVELS).unwrap();
    QuizEngine::with_shuffler(catalog, EngineConfig::default(), Rotate)
}

fn answer_level<S: OptionShuffler>(
    engine: &QuizEngine<S>,
    state: &mut SessionState,
    correct: bool,
) {
    let level = engine.current_level(state).unwrap().clone();
    for question in level.questions() {
        let label = if correct {
            question.correct().to_string()
        } else {
            question
                .options()
                .iter()
                .find(|o| o.as_str() != question.correct())
                .unwrap()
                .clone()
        };
        engine.record_answer(state, question.prompt(), &label).unwrap();
    }
}

#[test]
fn two_level_walkthrough() {
    let engine = engine();
    let mut state = engine.new_session();

    answer_level(&engine, &mut state, true);
    let submission = engine.submit(&mut state).unwrap();
    assert_eq!(submission.result.score, 3);
    assert!(submission.result.passed);
    assert_eq!(state.cumulative_score(), 3);

    assert_eq!(
        engine.advance_if_eligible(&mut state).unwrap(),
        Advance::NextLevel("Level 2".into())
    );
    assert_eq!(state.answered_count(), 0);

    answer_level(&engine, &mut state, false);
    let submission = engine.submit(&mut state).unwrap();
    assert!(!submission.result.passed);
    assert_eq!(state.cumulative_score(), 3);

    let err = engine.advance_if_eligible(&mut state).unwrap_err();
    assert!(matches!(err, SessionError::IllegalTransition { .. }));
    assert_eq!(state.phase(), Phase::Submitted);

    engine.retry(&mut state).unwrap();
    assert_eq!(state.answered_count(), 0);
    answer_level(&engine, &mut state, true);
    engine.submit(&mut state).unwrap();
    assert_eq!(state.cumulative_score(), 6);

    assert_eq!(engine.advance_if_eligible(&mut state).unwrap(), Advance::Complete);
    assert!(state.final_score_available());
    assert_eq!(state.total_score(), 6);
    assert_eq!(engine.total_possible(), 6);
    assert_eq!(state.history().len(), 3);
}

#[test]
fn display_order_is_stable_within_an_attempt() {
    let engine = engine();
    let mut state = engine.new_session();

    let first = state.questions()[0].clone();
    assert_eq!(
        first.labels(),
        [UNKNOWN_LABEL, "Decoration", "Conducting electricity", "Sealing"]
    );

    engine
        .record_answer(&mut state, first.prompt(), "Sealing")
        .unwrap();
    assert_eq!(state.questions()[0].labels(), first.labels());
    assert_eq!(state.questions()[0].selected_index(), Some(3));
}

#[test]
fn restart_from_completion() {
    let engine = engine();
    let mut state = engine.new_session();
    for _ in 0..2 {
        answer_level(&engine, &mut state, true);
        engine.submit(&mut state).unwrap();
        engine.advance_if_eligible(&mut state).unwrap();
    }
    assert!(state.is_complete());

    engine.restart(&mut state);
    assert_eq!(state.level_index(), 0);
    assert_eq!(state.cumulative_score(), 0);
    assert_eq!(state.phase(), Phase::Answering);
    assert!(state.history().is_empty());
}

#[test]
fn bundled_quiz_plays_through() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/quiz_data.json");
    let catalog = QuizCatalog::from_json(path).unwrap();
    let engine = QuizEngine::new(catalog, EngineConfig::default());
    let mut state = engine.new_session();

    loop {
        answer_level(&engine, &mut state, true);
        engine.submit(&mut state).unwrap();
        if engine.advance_if_eligible(&mut state).unwrap() == Advance::Complete {
            break;
        }
    }

    assert_eq!(state.total_score(), 9);
    assert_eq!(engine.total_possible(), 9);
}
