//! Property-based and scenario tests for the transition table

use super::dialogue::{QUIZ_ALREADY_ANSWERED, QUIZ_DONE};
use super::guard::GuardToken;
use super::*;
use crate::catalog::Catalog;
use crate::route::Stage;
use crate::session::Session;
use proptest::prelude::*;

/// Applies transitions to an owned record the way the dispatcher does
struct Driver {
    table: TransitionTable,
    catalog: Catalog,
    session: Option<Session>,
}

impl Driver {
    fn new() -> Self {
        let catalog = Catalog::builtin().unwrap();
        Self {
            table: TransitionTable::new(&catalog).unwrap(),
            catalog,
            session: None,
        }
    }

    fn in_state(state: StateId) -> Self {
        let mut driver = Self::new();
        let mut session = Session::new("p");
        session.state = state;
        session.stage = state.stage();
        driver.session = Some(session);
        driver
    }

    fn send(&mut self, event: &InputEvent) -> Outcome {
        let outcome = self
            .table
            .evaluate(self.session.as_ref(), event, &self.catalog)
            .unwrap();
        if let Outcome::Transition(result) = &outcome {
            if result.effects.contains(&Effect::StartSession) {
                self.session = Some(Session::new("p"));
            }
            if let Some(session) = self.session.as_mut() {
                session.apply(result);
            }
            if result.effects.contains(&Effect::Archive) {
                self.session = None;
            }
        }
        outcome
    }

    fn state(&self) -> Option<StateId> {
        self.session.as_ref().map(|session| session.state)
    }

    fn session(&self) -> &Session {
        self.session.as_ref().unwrap()
    }
}

fn t(text: &str) -> InputEvent {
    InputEvent::text(text)
}

fn b(token: &str) -> InputEvent {
    InputEvent::button(token)
}

fn all_tokens(driver: &Driver) -> Vec<GuardToken> {
    let mut tokens: Vec<GuardToken> = StateId::ALL
        .iter()
        .flat_map(|state| driver.table.accepted_tokens(*state, &driver.catalog))
        .collect();
    tokens.sort();
    tokens.dedup();
    tokens
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_stage1_route_1567_visits_waypoints_in_order() {
    let mut driver = Driver::new();
    driver.send(&InputEvent::start());
    driver.send(&t("1567"));
    assert_eq!(driver.state(), Some(StateId::Stage1Routing));

    let legs = [
        (StateId::MalevichBegin, vec![b("loc"), t("Малевич"), t("0798")]),
        (StateId::KazanBegin, vec![b("loc"), t("1 ядро"), t("4948")]),
        (StateId::PromobotBegin, vec![b("loc"), t("Промобот")]),
        (StateId::OrbionBegin, vec![b("loc"), t("орбион")]),
    ];
    for (queue, (begin, chain)) in legs.iter().enumerate() {
        assert_eq!(driver.session().queue, queue);
        driver.send(&b("yes"));
        assert_eq!(driver.state(), Some(*begin));
        for event in chain {
            assert!(matches!(driver.send(event), Outcome::Transition(_)), "{event:?}");
        }
        assert_eq!(driver.state(), Some(StateId::Stage1Routing));
    }

    driver.send(&b("yes"));
    assert_eq!(driver.state(), Some(StateId::Stage1Final));
    driver.send(&b("loc"));
    assert_eq!(driver.state(), Some(StateId::AwaitingStage2Code));
}

#[test]
fn test_stage2_route_8956_ends_the_quest() {
    let mut driver = Driver::in_state(StateId::AwaitingStage2Code);
    driver.send(&t("8956"));
    assert_eq!(driver.session().stage, Stage::Stage2);
    assert_eq!(driver.session().queue, 0);

    let legs: [(StateId, Vec<InputEvent>); 6] = [
        (StateId::ArArtBegin, vec![b("loc"), t("Окно в прошлое"), t("физика света")]),
        (
            StateId::QuizBegin,
            vec![
                b("loc"),
                t("101"),
                b("tf_true:101"),
                t("202"),
                b("tf_false:202"),
                t("303"),
                b("tf_true:303"),
            ],
        ),
        (
            StateId::HoversurfBegin,
            vec![b("loc"), t("Hoversurf"), t("2354"), t("2021"), t("Термо глас")],
        ),
        (StateId::OvisionBegin, vec![b("loc"), t("6776"), t("1980"), t("2")]),
        (StateId::MotoricaBegin, vec![b("loc"), t("5445"), t("2904"), t("3")]),
        (StateId::ArSuitBegin, vec![b("loc"), t("Пожарный")]),
    ];
    for (queue, (begin, chain)) in legs.iter().enumerate() {
        assert_eq!(driver.session().queue, queue);
        driver.send(&b("yes"));
        assert_eq!(driver.state(), Some(*begin));
        for event in chain {
            assert!(matches!(driver.send(event), Outcome::Transition(_)), "{event:?}");
        }
        assert_eq!(driver.state(), Some(StateId::Stage2Routing));
    }

    let Outcome::Transition(finale) = driver.send(&b("yes")) else {
        panic!("finale not handled");
    };
    assert_eq!(finale.new_state, StateId::OverallComplete);
    assert!(driver.session.is_none());
}

#[test]
fn test_three_question_quiz_with_reanswer() {
    let mut driver = Driver::in_state(StateId::QuizBegin);
    driver.session.as_mut().unwrap().queue = 1;
    driver.send(&b("loc"));
    assert_eq!(driver.state(), Some(StateId::QuizAsking));

    driver.send(&t("101"));
    driver.send(&b("tf_true:101"));
    assert_eq!(driver.session().quiz.get("101"), Some(true));

    // Asking for an answered question is a notice only
    let Outcome::Transition(notice) = driver.send(&t("101")) else {
        panic!("ask not handled");
    };
    assert_eq!(notice.effects, vec![Effect::say(QUIZ_ALREADY_ANSWERED)]);
    assert_eq!(driver.state(), Some(StateId::QuizAsking));

    // A stale button for an answered question changes nothing
    driver.send(&t("202"));
    let before = driver.session().clone();
    let Outcome::Transition(stale) = driver.send(&b("tf_false:101")) else {
        panic!("stale answer not handled");
    };
    assert!(stale.effects.is_empty());
    assert_eq!(driver.session().quiz, before.quiz);
    assert_eq!(driver.state(), Some(StateId::QuizAwaitingAnswer));

    driver.send(&b("tf_true:202"));
    assert_eq!(driver.session().quiz.get("202"), Some(false));

    driver.send(&t("303"));
    let Outcome::Transition(done) = driver.send(&b("tf_false:303")) else {
        panic!("last answer not handled");
    };
    assert!(done
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::Prompt { text, .. } if text == QUIZ_DONE)));
    assert_eq!(driver.state(), Some(StateId::Stage2Routing));
    assert_eq!(driver.session().queue, 2);
    assert_eq!(driver.session().quiz.correct_count(), 1);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_state() -> impl Strategy<Value = StateId> {
    proptest::sample::select(StateId::ALL.to_vec())
}

fn arb_noise() -> impl Strategy<Value = InputEvent> {
    prop_oneof![
        "[a-zA-Zа-яА-Я0-9 :_]{0,12}".prop_map(InputEvent::TextInput),
        "[a-z0-9:_]{0,12}".prop_map(InputEvent::ButtonPress),
    ]
}

proptest! {
    #[test]
    fn prop_unmatched_input_is_unhandled(state in arb_state(), event in arb_noise()) {
        let driver = Driver::in_state(state);
        let accepted = driver.table.accepted_tokens(state, &driver.catalog);
        let as_token = match &event {
            InputEvent::TextInput(text) => GuardToken::Text(text.clone()),
            InputEvent::ButtonPress(token) => GuardToken::Button(token.clone()),
        };
        prop_assume!(!accepted.contains(&as_token) && !event.is_start_command());

        let outcome = driver
            .table
            .evaluate(driver.session.as_ref(), &event, &driver.catalog)
            .unwrap();
        prop_assert_eq!(outcome, Outcome::Unhandled);
    }

    #[test]
    fn prop_queue_monotonic_within_stage(picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..200)) {
        let mut driver = Driver::new();
        let vocabulary = all_tokens(&driver);
        driver.send(&InputEvent::start());

        for pick in picks {
            let event = pick.get(&vocabulary).to_event();
            let before = driver.session.as_ref().map(|s| (s.stage, s.queue));
            let Outcome::Transition(result) = driver.send(&event) else {
                continue;
            };
            let Some(after) = driver.session.as_ref() else {
                continue;
            };
            let restarted = result.effects.iter().any(|effect| {
                matches!(effect, Effect::StartSession | Effect::BeginStage { .. })
            });
            if restarted {
                prop_assert_eq!(after.queue, 0);
            } else if let Some((stage, queue)) = before {
                prop_assert_eq!(after.stage, stage);
                prop_assert!(after.queue >= queue);
                prop_assert!(after.queue <= queue + 1);
            }
        }
    }

    #[test]
    fn prop_quiz_completion_fires_once(picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..80)) {
        let mut driver = Driver::in_state(StateId::QuizBegin);
        driver.send(&b("loc"));
        let vocabulary: Vec<InputEvent> = driver
            .catalog
            .quiz
            .keys()
            .flat_map(|key| {
                [
                    t(key),
                    b(&crate::quiz::answer_token(key, true)),
                    b(&crate::quiz::answer_token(key, false)),
                ]
            })
            .collect();

        let mut completions = 0;
        for pick in picks {
            let Outcome::Transition(result) = driver.send(pick.get(&vocabulary)) else {
                continue;
            };
            if result.effects.contains(&Effect::AdvanceQueue) {
                completions += 1;
            }
        }

        let total = driver.catalog.quiz.len();
        prop_assert!(completions <= 1);
        prop_assert_eq!(completions == 1, driver.session().quiz.len() == total);
        prop_assert_eq!(driver.session().queue, completions);
    }
}
